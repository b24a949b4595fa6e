use astro_events::shell::config::Settings;
use astro_events::shell::state::AppState;
use astro_events::shell::workers::spawn_cache_cleanup;
use chrono::{Datelike, Utc};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let settings = Settings::load()?;
    let state = AppState::build(settings)?;
    let cleanup = spawn_cache_cleanup(state.cache.clone(), state.settings.cache_cleanup_interval());

    state.store.load_persisted_events().await;

    if let Some(user_id) = &state.settings.user_id {
        let today = Utc::now().date_naive();
        if let Err(error) = state
            .store
            .load_month_events(user_id, today.month0(), today.year())
            .await
        {
            tracing::error!(%error, "could not load the current month");
        }
    }

    println!("{}", serde_json::to_string_pretty(&state.store.event_stats())?);
    cleanup.abort();
    Ok(())
}
