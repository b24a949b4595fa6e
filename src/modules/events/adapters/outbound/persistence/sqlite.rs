// SQLite implementation of the EventPersistence port.
//
// Responsibilities
// - Open the database lazily on first use and bring its schema up to date.
// - Store each event as a JSON payload keyed by id, with an index on the
//   owning user id for per-user lookups.
// - Run every statement on the blocking pool so callers never stall the runtime.

use crate::modules::events::adapters::outbound::persistence::{EventPersistence, PersistenceError};
use crate::modules::events::core::event::UnifiedEvent;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

const UPSERT_EVENT: &str = "INSERT INTO events (id, user_id, payload, last_modified)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(id) DO UPDATE SET
         user_id = excluded.user_id,
         payload = excluded.payload,
         last_modified = excluded.last_modified";

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

pub struct SqliteEventPersistence {
    location: Location,
    connection: OnceCell<Arc<Mutex<Connection>>>,
}

impl SqliteEventPersistence {
    /// Database file at `path`. Nothing touches the disk until the first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            connection: OnceCell::new(),
        }
    }

    pub fn open_in_memory() -> Self {
        Self {
            location: Location::Memory,
            connection: OnceCell::new(),
        }
    }

    async fn connection(&self) -> Result<Arc<Mutex<Connection>>, PersistenceError> {
        let connection = self
            .connection
            .get_or_try_init(|| {
                let location = self.location.clone();
                async move {
                    let conn = tokio::task::spawn_blocking(move || open(&location))
                        .await
                        .map_err(|e| PersistenceError::Task(e.to_string()))??;
                    Ok::<_, PersistenceError>(Arc::new(Mutex::new(conn)))
                }
            })
            .await?;
        Ok(connection.clone())
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T, PersistenceError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, PersistenceError> + Send + 'static,
    {
        let connection = self.connection().await?;
        tokio::task::spawn_blocking(move || {
            let mut guard = connection.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        })
        .await
        .map_err(|e| PersistenceError::Task(e.to_string()))?
    }
}

fn open(location: &Location) -> Result<Connection, PersistenceError> {
    let conn = match location {
        Location::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| PersistenceError::Backend(format!("create {}: {e}", parent.display())))?;
            }
            Connection::open(path)?
        }
        Location::Memory => Connection::open_in_memory()?,
    };
    migrate(&conn)?;
    tracing::debug!(?location, "event database ready");
    Ok(conn)
}

/// Apply pending schema migrations in order.
fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);")?;
    let current: i64 = conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .optional()?
        .unwrap_or(0);

    if current < 1 {
        migrate_v1(conn)?;
    }
    Ok(())
}

/// v1: events keyed by id, secondary index on the owning user.
fn migrate_v1(conn: &Connection) -> rusqlite::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS events (
             id TEXT PRIMARY KEY NOT NULL,
             user_id TEXT NOT NULL,
             payload TEXT NOT NULL,
             last_modified TEXT NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_events_user_id ON events(user_id);
         DELETE FROM schema_version;
         INSERT INTO schema_version (version) VALUES (1);",
    )?;
    tx.commit()
}

fn upsert(conn: &Connection, event: &UnifiedEvent) -> Result<(), PersistenceError> {
    let payload = serde_json::to_string(event)?;
    conn.execute(
        UPSERT_EVENT,
        params![
            event.id(),
            event.metadata.owning_user_id,
            payload,
            event.metadata.last_modified.to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Rows are `(id, payload)`. A payload that no longer decodes is skipped so
/// one bad row cannot hide the rest.
fn decode_rows(
    conn: &Connection,
    sql: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<UnifiedEvent>, PersistenceError> {
    let mut statement = conn.prepare(sql)?;
    let rows = statement
        .query_map(args, |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows
        .into_iter()
        .filter_map(|(id, payload)| match serde_json::from_str(&payload) {
            Ok(event) => Some(event),
            Err(error) => {
                tracing::warn!(event_id = %id, %error, "skipping undecodable persisted event");
                None
            }
        })
        .collect())
}

#[async_trait::async_trait]
impl EventPersistence for SqliteEventPersistence {
    async fn save_events(&self, events: &[UnifiedEvent]) -> Result<(), PersistenceError> {
        let events = events.to_vec();
        self.with_connection(move |conn| {
            let tx = conn.transaction()?;
            for event in &events {
                upsert(&tx, event)?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn load_events(&self) -> Result<Vec<UnifiedEvent>, PersistenceError> {
        self.with_connection(|conn| decode_rows(conn, "SELECT id, payload FROM events ORDER BY rowid", &[]))
            .await
    }

    async fn save_event(&self, event: &UnifiedEvent) -> Result<(), PersistenceError> {
        let event = event.clone();
        self.with_connection(move |conn| upsert(conn, &event)).await
    }

    async fn remove_event(&self, id: &str) -> Result<(), PersistenceError> {
        let id = id.to_string();
        self.with_connection(move |conn| {
            conn.execute("DELETE FROM events WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
    }

    async fn events_by_user_id(&self, user_id: &str) -> Result<Vec<UnifiedEvent>, PersistenceError> {
        let user_id = user_id.to_string();
        self.with_connection(move |conn| {
            decode_rows(
                conn,
                "SELECT id, payload FROM events WHERE user_id = ?1 ORDER BY rowid",
                &[&user_id as &dyn rusqlite::ToSql],
            )
        })
        .await
    }

    async fn clear(&self) -> Result<(), PersistenceError> {
        self.with_connection(|conn| {
            conn.execute("DELETE FROM events", [])?;
            Ok(())
        })
        .await
    }
}
