//! # Term maker
//!
//! This module exposes the [`TermMaker`], a builder appending search
//! terms to a [`TermSink`] while taking care of boolean operators and
//! group markers.

use tracing::{debug, trace};

use crate::{DateRange, Error, PrTime, Result};

use super::{SearchAttribute, SearchOperator, Term, TermSink};

/// The search term builder.
///
/// Groups are flat: they cannot be nested. Beginning a group while
/// another one is open simply re-arms the group start marker for the
/// next appended term.
///
/// The group start marker is set on the next appended term rather
/// than on a placeholder, so that a group without any term leaves no
/// marker behind.
pub struct TermMaker<'a, S: TermSink + ?Sized> {
    sink: &'a mut S,
    in_group: bool,
    group_has_terms: bool,
    pending_group_start: bool,
    last_index: Option<usize>,
}

impl<'a, S: TermSink + ?Sized> TermMaker<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self {
            sink,
            in_group: false,
            group_has_terms: false,
            pending_group_start: false,
            last_index: None,
        }
    }

    pub fn in_group(&self) -> bool {
        self.in_group
    }

    /// Open a group.
    ///
    /// The next appended term begins the group. When a group is
    /// already open, it stays open and the terms appended so far
    /// still belong to it.
    pub fn begin_group(&mut self) {
        if !self.in_group {
            self.group_has_terms = false;
        }

        self.pending_group_start = true;
        self.in_group = true;
    }

    /// Close the current group.
    ///
    /// The last term appended inside the group ends it. Closing a
    /// group in which no term was appended is a no-op.
    pub fn end_group(&mut self) {
        if self.in_group && self.group_has_terms {
            if let Some(term) = self.last_index.and_then(|i| self.sink.term_mut(i)) {
                term.ends_grouping = true;
            }
        }

        self.group_has_terms = false;
        self.pending_group_start = false;
        self.in_group = false;
    }

    fn append_term(&mut self, mut term: Term) {
        if self.pending_group_start {
            term.begins_grouping = true;
            self.pending_group_start = false;
        }

        if self.in_group {
            self.group_has_terms = true;
        }

        trace!(?term, "append search term");

        self.last_index = Some(self.sink.terms_count());
        self.sink.append_term(term);
    }

    /// Search for messages involving the given email addresses.
    ///
    /// One term is appended per address. Terms are OR-ed inside a
    /// group (any of these people) and AND-ed outside of a group.
    /// Nothing is appended when neither the sender nor the recipient
    /// role should be matched.
    pub fn people_search<I>(&mut self, addrs: I, match_as_sender: bool, match_as_recipient: bool)
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        let attribute = match (match_as_sender, match_as_recipient) {
            (true, true) => SearchAttribute::AllAddresses,
            (true, false) => SearchAttribute::Sender,
            (false, true) => SearchAttribute::ToOrCc,
            (false, false) => return,
        };

        for addr in addrs {
            let term = Term::address_contains(attribute, addr).with_boolean_and(!self.in_group);
            self.append_term(term);
        }
    }

    fn time_common(&mut self, operator: SearchOperator, date: PrTime) {
        // time bounds are always conjunctive, even inside a group
        self.append_term(Term::date(operator, date).with_boolean_and(true));
    }

    /// Search for messages dated around the given date or range.
    ///
    /// Appends an "is after `earliest - around`" term then an "is
    /// before `latest + around`" term, as their own group. For this
    /// reason, it cannot be called while a group is already open.
    ///
    /// The bounds are computed as is: a negative `around` narrows the
    /// range, and can make the after bound greater than the before
    /// bound, in which case nothing matches.
    pub fn time_around(&mut self, when: impl Into<DateRange>, around: PrTime) -> Result<()> {
        if self.in_group {
            return Err(Error::NestedGroupError);
        }

        let when = when.into();
        let after = when.earliest().saturating_sub(around);
        let before = when.latest().saturating_add(around);
        debug!(?when, around, after, before, "search around time range");

        self.begin_group();
        self.time_common(SearchOperator::IsAfter, after);
        self.time_common(SearchOperator::IsBefore, before);
        self.end_group();

        Ok(())
    }
}
