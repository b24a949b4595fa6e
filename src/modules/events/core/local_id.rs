// Client-minted identifiers.
//
// Events created on this side before the API knows about them carry a
// prefix-tagged id. Those ids never reach the API's delete, update or bookmark
// endpoints; they only live in memory and in local persistence.

use chrono::Utc;
use uuid::Uuid;

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalIdKind {
    Generated,
    Local,
    Bookmark,
}

impl LocalIdKind {
    pub const ALL: [LocalIdKind; 3] = [
        LocalIdKind::Generated,
        LocalIdKind::Local,
        LocalIdKind::Bookmark,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            LocalIdKind::Generated => "astro_",
            LocalIdKind::Local => "local_",
            LocalIdKind::Bookmark => "bookmark_",
        }
    }
}

pub fn is_local_id(id: &str) -> bool {
    LocalIdKind::ALL
        .iter()
        .any(|kind| id.starts_with(kind.prefix()))
}

/// `{prefix}{unix millis}_{9 random base36 chars}`.
pub fn generate_id(kind: LocalIdKind) -> String {
    let mut entropy = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        suffix.push(BASE36[(entropy % 36) as usize] as char);
        entropy /= 36;
    }
    format!(
        "{}{}_{}",
        kind.prefix(),
        Utc::now().timestamp_millis(),
        suffix
    )
}
