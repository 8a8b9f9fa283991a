//! Module dedicated to email addresses extraction.
//!
//! The core concept of this module is the [`AddressSet`], a
//! deduplicated set of email addresses. Sets are built from message
//! records by [`extract_people`] and from user identities by
//! [`extract_own_addresses`].

use std::{
    collections::BTreeSet,
    ops::{Deref, DerefMut},
};

use mail_parser::{Addr, Address, HeaderName, HeaderValue, MessageParser};
use tracing::{debug, trace, warn};

use crate::{Error, Identity, MessageRecord, Result};

/// The set of email addresses.
///
/// Addresses are deduplicated by exact string equality, after
/// parsing. The set carries no meaningful order, it is only kept
/// sorted so that searches built from it are reproducible.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct AddressSet(BTreeSet<String>);

impl Deref for AddressSet {
    type Target = BTreeSet<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for AddressSet {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T: ToString> FromIterator<T> for AddressSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        AddressSet(iter.into_iter().map(|addr| addr.to_string()).collect())
    }
}

impl IntoIterator for AddressSet {
    type Item = String;
    type IntoIter = <BTreeSet<String> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AddressSet {
    type Item = &'a String;
    type IntoIter = <&'a BTreeSet<String> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parse the email addresses contained in the given header value.
///
/// Groups are flattened and display names are dropped. An empty
/// value gives an empty list, whereas a non-empty value containing
/// no email address at all fails with [`Error::ParseAddressError`].
pub fn parse_addresses(field: impl AsRef<str>) -> Result<Vec<String>> {
    let field = field.as_ref().trim();

    if field.is_empty() {
        return Ok(Vec::new());
    }

    // a line break would start a new header
    let field = field.replace(['\r', '\n'], " ");
    let raw = format!("To: {field}\r\n\r\n");

    let msg = MessageParser::new()
        .parse(raw.as_bytes())
        .ok_or_else(|| Error::ParseAddressError(field.clone()))?;

    let addr = msg
        .headers()
        .iter()
        .find(|header| header.name == HeaderName::To)
        .and_then(|header| match header.value() {
            HeaderValue::Address(addr) => Some(addr),
            _ => None,
        })
        .ok_or_else(|| Error::ParseAddressError(field.clone()))?;

    let addrs = collect_addresses(addr);

    if addrs.is_empty() {
        return Err(Error::ParseAddressError(field));
    }

    Ok(addrs)
}

/// Collect the non-empty email addresses of a parsed address header,
/// flattening groups.
pub(crate) fn collect_addresses(addr: &Address) -> Vec<String> {
    let addrs: Box<dyn Iterator<Item = &Addr> + '_> = match addr {
        Address::List(addrs) => Box::new(addrs.iter()),
        Address::Group(groups) => {
            Box::new(groups.iter().flat_map(|group| group.addresses.iter()))
        }
    };

    addrs
        .filter_map(|addr| addr.address.as_deref())
        .filter(|addr| !addr.trim().is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parse the given header value and insert its addresses into the
/// given set, except the excluded ones.
///
/// Parse errors are logged then skipped: one malformed header must
/// not discard the addresses of the whole selection.
fn slurp(field: &str, excluded: Option<&AddressSet>, set: &mut AddressSet) {
    match parse_addresses(field) {
        Ok(addrs) => {
            for addr in addrs {
                if excluded.is_some_and(|excluded| excluded.contains(&addr)) {
                    trace!("skipping excluded address {addr}");
                    continue;
                }
                set.insert(addr);
            }
        }
        Err(err) => {
            warn!("{err}, skipping it");
            debug!("{err:?}");
        }
    }
}

/// Extract the people involved in the given messages.
///
/// Returns the set of senders (taken from `From` headers) and the set
/// of recipients (taken from `To`, `Cc` and `Bcc` headers). Addresses
/// contained in `excluded` appear in neither set.
pub fn extract_people<'a>(
    msgs: impl IntoIterator<Item = &'a MessageRecord>,
    excluded: Option<&AddressSet>,
) -> (AddressSet, AddressSet) {
    let mut senders = AddressSet::default();
    let mut recipients = AddressSet::default();

    for msg in msgs {
        slurp(&msg.author, excluded, &mut senders);
        slurp(&msg.to, excluded, &mut recipients);
        slurp(&msg.cc, excluded, &mut recipients);
        slurp(&msg.bcc, excluded, &mut recipients);
    }

    debug!(
        senders = senders.len(),
        recipients = recipients.len(),
        "extracted people from messages"
    );

    (senders, recipients)
}

/// Extract the addresses of the given identities.
///
/// Only the first address of the primary and of the reply-to fields
/// is taken, since an identity stands for a single mailbox.
pub fn extract_own_addresses<'a>(ids: impl IntoIterator<Item = &'a Identity>) -> AddressSet {
    let mut own = AddressSet::default();

    for id in ids {
        for field in [&id.email, &id.reply_to].into_iter().flatten() {
            if field.trim().is_empty() {
                continue;
            }

            match parse_addresses(field) {
                Ok(addrs) => {
                    if let Some(addr) = addrs.into_iter().next() {
                        own.insert(addr);
                    }
                }
                Err(err) => {
                    warn!("{err}, skipping identity address");
                    debug!("{err:?}");
                }
            }
        }
    }

    own
}
