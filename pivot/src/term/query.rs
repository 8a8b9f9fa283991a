//! # Search terms query string
//!
//! This module renders a sequence of [`Term`]s as a search emails
//! filter query string, using the same syntax as the search emails
//! query parser (`from`, `to`, `before`, `after`, `date`, `and`, `or`
//! and parentheses).
//!
//! Dates are rendered with a day precision, so the rendered query is
//! meant for logs and previews rather than for exact round trips.

use std::fmt;

use super::{SearchAttribute, SearchOperator, Term};

/// Wrapper around a slice of terms implementing [`fmt::Display`].
pub struct Query<'a>(pub &'a [Term]);

impl fmt::Display for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(if term.boolean_and { " and " } else { " or " })?;
            }

            if term.begins_grouping {
                f.write_str("(")?;
            }

            write!(f, "{term}")?;

            if term.ends_grouping {
                f.write_str(")")?;
            }
        }

        Ok(())
    }
}

/// Render the condition of a single term, ignoring its boolean and
/// grouping markers.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = &self.value;

        match (self.attribute, self.operator) {
            (SearchAttribute::AllAddresses, _) => write!(f, "(from {value} or to {value})"),
            (SearchAttribute::Sender, _) => write!(f, "from {value}"),
            (SearchAttribute::ToOrCc, _) => write!(f, "to {value}"),
            (SearchAttribute::Date, SearchOperator::IsBefore) => write!(f, "before {value}"),
            (SearchAttribute::Date, SearchOperator::IsAfter) => write!(f, "after {value}"),
            (SearchAttribute::Date, _) => write!(f, "date {value}"),
        }
    }
}

/// Render the given terms as a filter query string.
pub fn to_query_string(terms: &[Term]) -> String {
    Query(terms).to_string()
}
