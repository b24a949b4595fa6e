use crate::modules::events::adapters::outbound::month_cache::EventCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Sweep expired month cache entries every `every` until the handle is aborted.
pub fn spawn_cache_cleanup(cache: Arc<EventCache>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every.max(Duration::from_millis(1)));
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = cache.cleanup();
            if removed > 0 {
                tracing::debug!(removed, remaining = cache.len(), "expired month cache entries swept");
            }
        }
    })
}
