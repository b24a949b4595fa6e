// UI-facing tab and filter rules over public events.

use crate::modules::events::core::event::{Category, PublicEvent};
use crate::modules::events::core::filter::CategoryFilter;
use serde::{Deserialize, Serialize};

/// Score at or above which an event counts as a high-score combo.
pub const COMBO_MIN_SCORE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventTab {
    All,
    Bookmarked,
    Manual,
    Generated,
}

impl EventTab {
    pub fn contains(&self, event: &PublicEvent) -> bool {
        let generated = event.details.generated;
        let bookmarked = event.bookmarked();
        match self {
            EventTab::All => true,
            EventTab::Bookmarked => bookmarked,
            EventTab::Manual => !generated && !bookmarked,
            EventTab::Generated => generated && !bookmarked,
        }
    }
}

/// Which remote load backs a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingStrategy {
    /// Every event of the user.
    User,
    /// A single month.
    Month,
}

pub fn loading_strategy(tab: Option<EventTab>) -> LoadingStrategy {
    match tab {
        Some(EventTab::Bookmarked | EventTab::Manual | EventTab::All) => LoadingStrategy::User,
        Some(EventTab::Generated) | None => LoadingStrategy::Month,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOptions {
    pub tab: Option<EventTab>,
    pub category: CategoryFilter,
    pub hide_challenging: bool,
    pub combos_only: bool,
}

pub fn apply_filters(events: &[PublicEvent], options: &FilterOptions) -> Vec<PublicEvent> {
    events
        .iter()
        .filter(|event| options.tab.is_none_or(|tab| tab.contains(event)))
        .filter(|event| options.category.matches(event.details.category))
        .filter(|event| !options.hide_challenging || event.details.category != Category::Challenging)
        .filter(|event| !options.combos_only || event.details.score >= COMBO_MIN_SCORE)
        .cloned()
        .collect()
}

/// Events that belong to `tab`, ignoring every other filter.
pub fn tab_count(events: &[PublicEvent], tab: EventTab) -> usize {
    events.iter().filter(|event| tab.contains(event)).count()
}
