//! Module dedicated to the persisted pivot filter state.

use tracing::debug;

use crate::{AddressSet, DateRange, FilterConfig};

/// The snapshot latched when the pivot filter gets activated.
///
/// It captures the people and the dates of the selection at that
/// time, so that the search survives subsequent selection changes.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct LatchedSnapshot {
    /// The addresses found in the sender headers of the selection.
    pub senders: AddressSet,
    /// The addresses found in the recipient headers of the selection.
    pub recipients: AddressSet,
    /// The dates spanned by the selection.
    pub date_range: DateRange,
}

/// The pivot filter state, as persisted across sessions.
///
/// The filter is active when a snapshot is latched, inactive
/// otherwise.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case", default)
)]
pub struct PersistedFilterState {
    pub latched: Option<LatchedSnapshot>,
    pub config: FilterConfig,
}

impl PersistedFilterState {
    pub fn is_active(&self) -> bool {
        self.latched.is_some()
    }

    /// Build the state of a new session from the state of the
    /// previous one.
    ///
    /// The configuration is always carried forward, whereas the
    /// latched snapshot is only carried forward when `sticky` is
    /// `true`. A missing previous state is treated as the default
    /// one.
    pub fn propagate(prev: Option<&Self>, sticky: bool) -> Self {
        let Some(prev) = prev else {
            debug!("no previous pivot filter state, using defaults");
            return Self::default();
        };

        Self {
            latched: if sticky { prev.latched.clone() } else { None },
            config: prev.config.clone(),
        }
    }

    /// Drop the latched snapshot.
    ///
    /// Returns `true` if a snapshot was actually dropped.
    pub fn clear(&mut self) -> bool {
        self.latched.take().is_some()
    }
}

/// Drop the latched snapshot of the given state, if any.
///
/// Returns `true` if a snapshot was actually dropped.
pub fn clear_state(state: Option<&mut PersistedFilterState>) -> bool {
    state.map(PersistedFilterState::clear).unwrap_or_default()
}
