//! # Pivot filter
//!
//! This module exposes the [`PivotFilter`], which finds messages
//! related to a selection: messages involving the same people,
//! optionally around the same dates.
//!
//! The filter is a two-state machine. Activating it latches a
//! [`LatchedSnapshot`] of the selection, deactivating it drops the
//! snapshot. While active, the snapshot is replayed into search terms
//! every time the search is rebuilt, whatever happened to the
//! selection in the meantime.

pub mod config;
pub mod state;

use tracing::{debug, info};

use crate::{
    address, date, DateWindow, Identity, MessageRecord, Result, Role, TermMaker, TermSink,
};

use self::{
    config::FilterConfig,
    state::{LatchedSnapshot, PersistedFilterState},
};

/// The pivot filter.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PivotFilter {
    state: PersistedFilterState,
}

impl PivotFilter {
    pub fn new(state: PersistedFilterState) -> Self {
        Self { state }
    }

    /// Build the filter of a new session from the state persisted by
    /// the previous one.
    ///
    /// See [`PersistedFilterState::propagate`].
    pub fn from_previous_session(prev: Option<&PersistedFilterState>, sticky: bool) -> Self {
        Self::new(PersistedFilterState::propagate(prev, sticky))
    }

    pub fn state(&self) -> &PersistedFilterState {
        &self.state
    }

    pub fn into_state(self) -> PersistedFilterState {
        self.state
    }

    pub fn config(&self) -> &FilterConfig {
        &self.state.config
    }

    pub fn config_mut(&mut self) -> &mut FilterConfig {
        &mut self.state.config
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Latch the people and the dates of the given selection.
    ///
    /// Addresses belonging to the given identities are left out of
    /// the latched people. An empty selection cannot be latched and
    /// leaves the filter inactive.
    ///
    /// Returns `true` if the filter is active afterwards.
    pub fn activate(&mut self, selection: &[MessageRecord], ids: &[Identity]) -> Result<bool> {
        if selection.is_empty() {
            debug!("empty selection, leaving pivot filter inactive");
            self.state.latched = None;
            return Ok(false);
        }

        let own = address::extract_own_addresses(ids);
        let (senders, recipients) = address::extract_people(selection, Some(&own));
        let date_range = date::date_range(selection)?;

        info!(
            msgs = selection.len(),
            senders = senders.len(),
            recipients = recipients.len(),
            "activate pivot filter"
        );

        self.state.latched = Some(LatchedSnapshot {
            senders,
            recipients,
            date_range,
        });

        Ok(true)
    }

    /// Drop the latched snapshot.
    ///
    /// Returns `true` if the filter was active, which means the
    /// search needs to be refreshed.
    pub fn deactivate(&mut self) -> bool {
        let deactivated = self.state.clear();

        if deactivated {
            info!("deactivate pivot filter");
        }

        deactivated
    }

    /// Activate or deactivate the filter, depending on whether its
    /// toggle got checked or unchecked.
    ///
    /// Returns `true` if the filter is active afterwards.
    pub fn command(
        &mut self,
        checked: bool,
        selection: &[MessageRecord],
        ids: &[Identity],
    ) -> Result<bool> {
        if checked {
            self.activate(selection, ids)
        } else {
            self.deactivate();
            Ok(false)
        }
    }

    /// Append the search terms of the latched snapshot to the given
    /// sink.
    ///
    /// People are appended as one group of OR-ed terms, followed by a
    /// group restricting the dates when a date window is configured.
    /// Nothing is appended when the filter is inactive.
    pub fn build_terms<S: TermSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        let Some(latched) = &self.state.latched else {
            return Ok(());
        };

        let config = &self.state.config;
        let mut maker = TermMaker::new(sink);

        maker.begin_group();
        maker.people_search(
            &latched.senders,
            config.sender_roles.match_as_sender(),
            config.sender_roles.match_as_recipient(),
        );
        maker.people_search(
            &latched.recipients,
            config.recipient_roles.match_as_sender(),
            config.recipient_roles.match_as_recipient(),
        );
        maker.end_group();

        if let Some(around) = config.date_window.around() {
            maker.time_around(latched.date_range, around)?;
        }

        Ok(())
    }

    /// Describe which toggles should be checked.
    pub fn view(&self) -> FilterView {
        reflect(Some(&self.state))
    }
}

/// The state of the pivot filter toggles.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FilterView {
    /// The filter is active, and its options should be expanded.
    pub active: bool,
    pub senders_as_sender: bool,
    pub senders_as_recipient: bool,
    pub recipients_as_sender: bool,
    pub recipients_as_recipient: bool,
    pub day: bool,
    pub week: bool,
    pub month: bool,
}

/// Describe which toggles should be checked for the given state.
///
/// A missing state is reflected as an inactive filter with every
/// toggle unchecked.
pub fn reflect(state: Option<&PersistedFilterState>) -> FilterView {
    let Some(state) = state else {
        return FilterView::default();
    };

    let config = &state.config;

    FilterView {
        active: state.is_active(),
        senders_as_sender: config.sender_roles.contains(Role::Sender),
        senders_as_recipient: config.sender_roles.contains(Role::Recipient),
        recipients_as_sender: config.recipient_roles.contains(Role::Sender),
        recipients_as_recipient: config.recipient_roles.contains(Role::Recipient),
        day: config.date_window == DateWindow::Day,
        week: config.date_window == DateWindow::Week,
        month: config.date_window == DateWindow::Month,
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        term::{SearchAttribute::*, SearchOperator::*, SearchValue},
        AddressSet, DateRange, DateWindow, FilterConfig, Identity, MessageRecord,
        PersistedFilterState, Role, RoleMask, Term,
    };

    use super::{FilterView, PivotFilter};

    fn selection() -> Vec<MessageRecord> {
        vec![
            MessageRecord::new("Alice <alice@localhost>", "me@localhost", 2_000),
            MessageRecord::new("me@localhost", "alice@localhost", 1_000).with_cc("bob@localhost"),
        ]
    }

    fn ids() -> Vec<Identity> {
        vec![Identity::new("me@localhost")]
    }

    #[test_log::test]
    fn activate() {
        let mut filter = PivotFilter::default();

        assert!(filter.activate(&selection(), &ids()).unwrap());
        assert!(filter.is_active());

        let latched = filter.state().latched.clone().unwrap();
        assert_eq!(
            latched.senders,
            ["alice@localhost"].into_iter().collect::<AddressSet>()
        );
        assert_eq!(
            latched.recipients,
            ["alice@localhost", "bob@localhost"]
                .into_iter()
                .collect::<AddressSet>()
        );
        assert_eq!(latched.date_range, DateRange::new(1_000, 2_000));
    }

    #[test_log::test]
    fn activate_empty_selection() {
        let mut filter = PivotFilter::default();
        filter.activate(&selection(), &ids()).unwrap();

        assert!(!filter.activate(&[], &ids()).unwrap());
        assert!(!filter.is_active());
    }

    #[test_log::test]
    fn deactivate() {
        let mut filter = PivotFilter::default();
        assert!(!filter.deactivate());

        filter.activate(&selection(), &ids()).unwrap();
        assert!(filter.deactivate());
        assert!(!filter.is_active());
        assert!(!filter.deactivate());
    }

    #[test_log::test]
    fn command() {
        let mut filter = PivotFilter::default();

        assert!(filter.command(true, &selection(), &ids()).unwrap());
        assert!(!filter.command(false, &selection(), &ids()).unwrap());
        assert!(!filter.is_active());
    }

    #[test_log::test]
    fn build_terms_inactive() {
        let filter = PivotFilter::default();
        let mut terms = Vec::new();
        filter.build_terms(&mut terms).unwrap();

        assert!(terms.is_empty());
    }

    #[test_log::test]
    fn build_terms_default_config() {
        let mut filter = PivotFilter::default();
        filter.activate(&selection(), &ids()).unwrap();

        let mut terms = Vec::new();
        filter.build_terms(&mut terms).unwrap();

        let people =
            |addr: &str| Term::address_contains(AllAddresses, addr).with_boolean_and(false);

        assert_eq!(
            terms,
            vec![
                Term {
                    begins_grouping: true,
                    ..people("alice@localhost")
                },
                people("alice@localhost"),
                Term {
                    ends_grouping: true,
                    ..people("bob@localhost")
                },
            ]
        );
    }

    #[test_log::test]
    fn build_terms_with_roles_and_window() {
        let mut filter = PivotFilter::default();
        filter.activate(&selection(), &ids()).unwrap();

        let config = filter.config_mut();
        config.sender_roles = RoleMask::NONE.with(Role::Sender);
        config.recipient_roles = RoleMask::NONE.with(Role::Recipient);
        config.date_window = DateWindow::Day;

        let mut terms = Vec::new();
        filter.build_terms(&mut terms).unwrap();

        let day = 86_400_000_000;
        let summary: Vec<_> = terms
            .iter()
            .map(|term| {
                (
                    term.attribute,
                    term.operator,
                    term.value.clone(),
                    term.boolean_and,
                    term.begins_grouping,
                    term.ends_grouping,
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                (Sender, Contains, SearchValue::Str("alice@localhost".into()), false, true, false),
                (ToOrCc, Contains, SearchValue::Str("alice@localhost".into()), false, false, false),
                (ToOrCc, Contains, SearchValue::Str("bob@localhost".into()), false, false, true),
                (Date, IsAfter, SearchValue::Date(1_000 - day), true, true, false),
                (Date, IsBefore, SearchValue::Date(2_000 + day), true, false, true),
            ]
        );
    }

    #[test_log::test]
    fn build_terms_without_roles_nor_window() {
        let mut filter = PivotFilter::new(PersistedFilterState {
            latched: None,
            config: FilterConfig {
                sender_roles: RoleMask::NONE,
                recipient_roles: RoleMask::NONE,
                date_window: DateWindow::Off,
            },
        });
        filter.activate(&selection(), &ids()).unwrap();

        let mut terms = Vec::new();
        filter.build_terms(&mut terms).unwrap();

        assert!(filter.is_active());
        assert!(terms.is_empty());
    }

    #[test_log::test]
    fn build_terms_only_window() {
        let mut filter = PivotFilter::default();
        filter.activate(&selection(), &ids()).unwrap();
        filter.config_mut().sender_roles = RoleMask::NONE;
        filter.config_mut().recipient_roles = RoleMask::NONE;
        filter.config_mut().toggle_date_window(DateWindow::Week, true);

        let mut terms = Vec::new();
        filter.build_terms(&mut terms).unwrap();

        assert_eq!(terms.len(), 2);
        assert!(terms[0].begins_grouping && !terms[0].ends_grouping);
        assert!(!terms[1].begins_grouping && terms[1].ends_grouping);
    }

    #[test_log::test]
    fn reflect() {
        assert_eq!(super::reflect(None), FilterView::default());

        let mut filter = PivotFilter::default();
        filter.config_mut().toggle_sender_role(Role::Recipient, false);
        filter.config_mut().toggle_date_window(DateWindow::Month, true);

        assert_eq!(
            filter.view(),
            FilterView {
                active: false,
                senders_as_sender: true,
                senders_as_recipient: false,
                recipients_as_sender: true,
                recipients_as_recipient: true,
                day: false,
                week: false,
                month: true,
            }
        );

        filter.activate(&selection(), &ids()).unwrap();
        assert!(filter.view().active);
    }
}
