use crate::modules::events::adapters::outbound::snapshot::{SnapshotError, SnapshotStore, StateSnapshot};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Default)]
pub struct InMemorySnapshotStore {
    latest: Mutex<Option<StateSnapshot>>,
    is_offline: AtomicBool,
    saves: AtomicUsize,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: StateSnapshot) -> Self {
        Self {
            latest: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn latest(&self) -> Option<StateSnapshot> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<Option<StateSnapshot>, SnapshotError> {
        Ok(self.latest())
    }

    fn save(&self, snapshot: &StateSnapshot) -> Result<(), SnapshotError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("Snapshot store offline").into());
        }
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
