// Composition root for the events client.
//
// Responsibilities
// - Read settings from defaults, an optional file and the environment.
// - Instantiate the concrete adapters and wire them into the store and the
//   loading service.
// - Spawn background workers (month cache cleanup).

pub mod config;
pub mod state;
pub mod workers;
