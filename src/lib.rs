pub mod shared {
    pub mod core {
        pub mod clock;
    }
}

pub mod modules {
    pub mod events {
        pub mod core {
            pub mod event;
            pub mod filter;
            pub mod local_id;
            pub mod operations;
            pub mod stats;
            pub mod validation;
        }
        pub mod use_cases {
            pub mod unified_store {
                pub mod errors;
                pub mod handler;
                pub mod state;
            }
            pub mod load_events {
                pub mod filters;
                pub mod handler;
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod events_api;
                pub mod month_cache;
                pub mod persistence;
                pub mod snapshot;
            }
        }
    }
}

pub mod shell;
