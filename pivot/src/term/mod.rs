//! # Search terms
//!
//! This module exposes [`Term`], the atomic search predicate handed
//! to search backends, and [`TermSink`], the ordered sequence terms
//! are appended to.
//!
//! A sequence of terms is a flat boolean expression: each term
//! combines with everything before it using its own
//! [`Term::boolean_and`], and runs of consecutive terms can be
//! wrapped into parentheses using [`Term::begins_grouping`] and
//! [`Term::ends_grouping`]. Terms are usually built using the
//! [`maker::TermMaker`].

pub mod maker;
pub mod query;

use std::fmt;

use crate::{date, PrTime};

/// The property of a message a term matches against.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SearchAttribute {
    /// The `From` header.
    Sender,

    /// The `To` and `Cc` headers.
    ToOrCc,

    /// Every address header, senders and recipients alike.
    AllAddresses,

    /// The message date.
    Date,
}

/// The comparison a term applies between the attribute and its
/// value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SearchOperator {
    Contains,
    Is,
    IsBefore,
    IsAfter,
}

/// The value a term compares the attribute with.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SearchValue {
    Str(String),
    Date(PrTime),
}

impl fmt::Display for SearchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(pattern) if pattern.contains(char::is_whitespace) => {
                write!(f, "\"{}\"", pattern.replace('"', "\\\""))
            }
            Self::Str(pattern) => write!(f, "{pattern}"),
            Self::Date(date) => match date::to_datetime(*date) {
                Some(dt) => write!(f, "{}", dt.format("%F")),
                None => write!(f, "{date}"),
            },
        }
    }
}

/// The search term.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Term {
    pub attribute: SearchAttribute,
    pub operator: SearchOperator,
    pub value: SearchValue,

    /// Combine the term with the preceding ones using AND when
    /// `true`, OR otherwise.
    ///
    /// For the first term of a group, this is how the whole group
    /// combines with what precedes it.
    pub boolean_and: bool,

    /// The term opens a parenthesized sub-expression.
    pub begins_grouping: bool,

    /// The term closes a parenthesized sub-expression.
    pub ends_grouping: bool,
}

impl Term {
    pub fn new(attribute: SearchAttribute, operator: SearchOperator, value: SearchValue) -> Self {
        Self {
            attribute,
            operator,
            value,
            boolean_and: true,
            begins_grouping: false,
            ends_grouping: false,
        }
    }

    /// Build a term matching messages whose addresses for the given
    /// attribute contain the given pattern.
    pub fn address_contains(attribute: SearchAttribute, addr: impl ToString) -> Self {
        Self::new(
            attribute,
            SearchOperator::Contains,
            SearchValue::Str(addr.to_string()),
        )
    }

    /// Build a term comparing the message date with the given one.
    pub fn date(operator: SearchOperator, date: PrTime) -> Self {
        Self::new(SearchAttribute::Date, operator, SearchValue::Date(date))
    }

    pub fn with_boolean_and(mut self, and: bool) -> Self {
        self.boolean_and = and;
        self
    }
}

/// The ordered, append-only sequence of terms.
///
/// This is the seam between the term builder and the search backend
/// consuming terms. The builder only needs to append terms and to
/// flag the last term it appended as closing a group.
pub trait TermSink {
    /// Append the given term at the end of the sequence.
    fn append_term(&mut self, term: Term);

    /// Get a mutable reference to the term at the given index.
    fn term_mut(&mut self, index: usize) -> Option<&mut Term>;

    /// Count the terms of the sequence.
    fn terms_count(&self) -> usize;
}

impl TermSink for Vec<Term> {
    fn append_term(&mut self, term: Term) {
        self.push(term)
    }

    fn term_mut(&mut self, index: usize) -> Option<&mut Term> {
        self.get_mut(index)
    }

    fn terms_count(&self) -> usize {
        self.len()
    }
}
