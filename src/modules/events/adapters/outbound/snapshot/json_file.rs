// Snapshot stored as a single JSON file, replaced atomically on every save.

use crate::modules::events::adapters::outbound::snapshot::{SnapshotError, SnapshotStore, StateSnapshot};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

#[derive(Debug)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
    // Saves share one tmp file.
    write_lock: Mutex<()>,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn load(&self) -> Result<Option<StateSnapshot>, SnapshotError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, snapshot: &StateSnapshot) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_vec(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod json_file_snapshot_store_tests {
    use super::*;
    use crate::modules::events::core::event::EventSource;
    use crate::modules::events::core::operations::to_unified_event;
    use crate::tests::fixtures::events::PublicEventBuilder;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn before_each() -> (TempDir, JsonFileSnapshotStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path().join("state").join("events.json"));
        (dir, store)
    }

    #[rstest]
    fn it_should_load_nothing_before_the_first_save(before_each: (TempDir, JsonFileSnapshotStore)) {
        let (_dir, store) = before_each;
        assert!(store.load().unwrap().is_none());
    }

    #[rstest]
    fn it_should_save_and_reload_the_event_slice(before_each: (TempDir, JsonFileSnapshotStore)) {
        let (_dir, store) = before_each;
        let event = to_unified_event(PublicEventBuilder::new().id("e1").build(), EventSource::Manual, true);
        let snapshot = StateSnapshot {
            all_events: [("e1".to_string(), event)].into_iter().collect(),
            all_event_ids: vec!["e1".into()],
        };

        store.save(&snapshot).unwrap();

        assert_eq!(store.load().unwrap(), Some(snapshot));
        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"allEvents\""));
        assert!(raw.contains("\"allEventIds\""));
    }

    #[rstest]
    fn it_should_leave_a_whole_snapshot_after_concurrent_saves(before_each: (TempDir, JsonFileSnapshotStore)) {
        let (_dir, store) = before_each;
        let snapshots: Vec<StateSnapshot> = (0..8)
            .map(|n| {
                let id = format!("e{n}");
                let event = to_unified_event(PublicEventBuilder::new().id(&id).build(), EventSource::Manual, true);
                StateSnapshot {
                    all_events: [(id.clone(), event)].into_iter().collect(),
                    all_event_ids: vec![id],
                }
            })
            .collect();

        std::thread::scope(|scope| {
            for snapshot in &snapshots {
                let store = &store;
                scope.spawn(move || store.save(snapshot).unwrap());
            }
        });

        let loaded = store.load().unwrap().expect("a snapshot on disk");
        assert!(snapshots.contains(&loaded));
    }

    #[rstest]
    fn it_should_fail_on_a_corrupt_file(before_each: (TempDir, JsonFileSnapshotStore)) {
        let (_dir, store) = before_each;
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.load(), Err(SnapshotError::Serialization(_))));
    }
}
