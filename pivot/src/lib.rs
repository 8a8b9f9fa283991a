//! Rust library to build pivot search terms from a selection of
//! emails.
//!
//! A pivot filter answers the question "show me everything related to
//! these messages": it latches the people and the date range of the
//! currently selected messages, then turns that snapshot into a flat
//! sequence of search [`Term`]s that a search backend can evaluate.
//!
//! The library is split into small pieces:
//!
//! 1. [`address`] extracts deduplicated sender and recipient email
//! addresses from a set of [`MessageRecord`]s, optionally excluding
//! the user's own addresses.
//!
//! 2. [`date`] reduces a set of messages to the inclusive
//! [`DateRange`] they span.
//!
//! 3. [`term`] exposes the [`TermMaker`], a small builder that
//! appends terms to a [`TermSink`] while assigning boolean and
//! grouping markers.
//!
//! 4. [`filter`] exposes the [`PivotFilter`], which latches a
//! snapshot on activation and replays it through a [`TermMaker`]
//! whenever the search needs to be rebuilt.

pub mod address;
pub mod date;
pub mod filter;
pub mod message;
pub mod term;

use std::result;

use thiserror::Error;

#[doc(inline)]
pub use self::{
    address::AddressSet,
    date::{DateRange, PrTime},
    filter::{
        config::{DateWindow, FilterConfig, Role, RoleMask},
        state::{LatchedSnapshot, PersistedFilterState},
        FilterView, PivotFilter,
    },
    message::{Identity, MessageRecord},
    term::{
        maker::TermMaker, SearchAttribute, SearchOperator, SearchValue, Term, TermSink,
    },
};

/// The global `Error` enum of the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot compute date range: no message given")]
    EmptyInputError,
    #[error("cannot search around time: a group is already open")]
    NestedGroupError,
    #[error("cannot parse email address(es) from `{0}`")]
    ParseAddressError(String),
    #[error("cannot parse raw message headers")]
    ParseRawMessageError,
    #[error("cannot find or parse raw message date")]
    ParseRawMessageDateError,
}

/// The global `Result` alias of the library.
pub type Result<T> = result::Result<T, Error>;
