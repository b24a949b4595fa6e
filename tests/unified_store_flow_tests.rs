// Store flows across a restart: SQLite persistence plus the JSON snapshot.

mod fixtures;

use astro_events::modules::events::adapters::outbound::events_api::in_memory::InMemoryEventsApi;
use astro_events::modules::events::adapters::outbound::month_cache::EventCache;
use astro_events::modules::events::adapters::outbound::persistence::EventPersistence;
use astro_events::modules::events::adapters::outbound::persistence::sqlite::SqliteEventPersistence;
use astro_events::modules::events::adapters::outbound::snapshot::SnapshotStore;
use astro_events::modules::events::adapters::outbound::snapshot::json_file::JsonFileSnapshotStore;
use astro_events::modules::events::core::event::SyncStatus;
use astro_events::modules::events::core::local_id::{LocalIdKind, generate_id};
use astro_events::modules::events::core::operations::to_public_event;
use astro_events::modules::events::use_cases::load_events::filters::{EventTab, tab_count};
use astro_events::modules::events::use_cases::unified_store::handler::UnifiedEventsStore;
use fixtures::{bookmarked, public_event};
use rstest::{fixture, rstest};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::task::JoinSet;

type Store = UnifiedEventsStore<InMemoryEventsApi, SqliteEventPersistence>;
type BeforeEachReturn = (TempDir, Arc<InMemoryEventsApi>);

#[fixture]
fn before_each() -> BeforeEachReturn {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(InMemoryEventsApi::with_events(vec![
        public_event("evt-1", "u1", "2025-01-20"),
        bookmarked(public_event("evt-2", "u1", "2025-01-22")),
        public_event("evt-3", "u1", "2025-02-14"),
    ]));
    (dir, api)
}

fn database(dir: &TempDir) -> PathBuf {
    dir.path().join("events.sqlite3")
}

fn open_store(dir: &TempDir, api: Arc<InMemoryEventsApi>) -> Store {
    UnifiedEventsStore::new(
        api,
        Arc::new(SqliteEventPersistence::new(database(dir))),
        Arc::new(EventCache::default()),
    )
}

#[rstest]
#[tokio::test]
async fn it_should_restore_bookmarks_after_a_restart(before_each: BeforeEachReturn) {
    let (dir, api) = before_each;
    let first = open_store(&dir, api.clone());
    first.load_month_events("u1", 0, 2025).await.unwrap();
    let local_id = generate_id(LocalIdKind::Local);
    let mut local = public_event(&local_id, "u1", "2025-01-25");
    local.details.title = "Journal entry".into();
    first.add_event(bookmarked(local)).await.unwrap();
    first.toggle_bookmark("evt-1").await.unwrap();
    drop(first);

    let second = open_store(&dir, api.clone());
    second.load_persisted_events().await;

    let restored = second.event_by_id(&local_id).expect("bookmarked local event restored");
    assert_eq!(restored.details.title, "Journal entry");
    assert!(second.event_by_id("evt-1").unwrap().metadata.is_bookmarked);
    assert_eq!(second.event_by_id("evt-1").unwrap().metadata.sync_status, SyncStatus::Synced);
    assert_eq!(second.all_events().len(), 2, "month loads are not written to disk");
    assert_eq!(api.calls().save, 0, "local ids never reach the API");
}

#[rstest]
#[tokio::test]
async fn it_should_write_the_unbookmarked_state_back_to_disk(before_each: BeforeEachReturn) {
    let (dir, api) = before_each;
    let store = open_store(&dir, api);
    let id = generate_id(LocalIdKind::Bookmark);
    store.add_event(bookmarked(public_event(&id, "u1", "2025-01-02"))).await.unwrap();

    store.toggle_bookmark(&id).await.unwrap();

    let on_disk = SqliteEventPersistence::new(database(&dir)).load_events().await.unwrap();
    let stored = on_disk.iter().find(|event| event.id() == id).expect("event kept on disk");
    assert!(!stored.metadata.is_bookmarked);
    assert!(!stored.metadata.is_persisted);
}

#[rstest]
#[tokio::test]
async fn it_should_hydrate_the_event_slice_from_the_snapshot_file(before_each: BeforeEachReturn) {
    let (dir, api) = before_each;
    let snapshot_path = dir.path().join("snapshot.json");
    let first = open_store(&dir, api.clone()).with_snapshot_store(Arc::new(JsonFileSnapshotStore::new(&snapshot_path)));
    first.load_month_events("u1", 1, 2025).await.unwrap();
    drop(first);

    let saved = JsonFileSnapshotStore::new(&snapshot_path).load().unwrap().unwrap();
    assert_eq!(saved.all_event_ids, vec!["evt-3"]);

    let second = open_store(&dir, api.clone()).with_snapshot_store(Arc::new(JsonFileSnapshotStore::new(&snapshot_path)));
    assert!(second.event_by_id("evt-3").is_some());
    assert!(second.state().loaded_months.is_empty(), "loaded months are never snapshotted");

    second.load_month_events("u1", 1, 2025).await.unwrap();
    assert_eq!(api.calls().load_month, 2, "the month cache starts cold");
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn it_should_keep_every_concurrent_add_in_the_snapshot_file(before_each: BeforeEachReturn) {
    let (dir, api) = before_each;
    let snapshot_path = dir.path().join("snapshot.json");

    for round in 0..5 {
        let store = Arc::new(
            open_store(&dir, api.clone()).with_snapshot_store(Arc::new(JsonFileSnapshotStore::new(&snapshot_path))),
        );
        let mut adds = JoinSet::new();
        for n in 0..32 {
            let store = store.clone();
            adds.spawn(async move {
                let id = format!("local_{round}_{n}");
                store.add_event(public_event(&id, "u1", "2025-03-01")).await.unwrap();
            });
        }
        while let Some(added) = adds.join_next().await {
            added.unwrap();
        }

        let saved = JsonFileSnapshotStore::new(&snapshot_path).load().unwrap().unwrap();
        let expected = 32 * (round + 1);
        assert_eq!(store.all_events().len(), expected);
        assert_eq!(saved.all_event_ids.len(), expected, "round {round}");
        assert_eq!(saved.all_events.len(), expected, "round {round}");
    }
}

#[rstest]
#[tokio::test]
async fn it_should_count_tabs_over_the_store_contents(before_each: BeforeEachReturn) {
    let (dir, api) = before_each;
    let store = open_store(&dir, api);
    store.load_month_events("u1", 0, 2025).await.unwrap();
    let mut generated = public_event(&generate_id(LocalIdKind::Generated), "u1", "2025-01-09");
    generated.details.generated = true;
    store.add_event(generated).await.unwrap();

    let public: Vec<_> = store
        .all_events()
        .iter()
        .map(to_public_event)
        .collect();

    assert_eq!(tab_count(&public, EventTab::Bookmarked), 1);
    assert_eq!(tab_count(&public, EventTab::Manual), 1);
    assert_eq!(tab_count(&public, EventTab::Generated), 1);
}
