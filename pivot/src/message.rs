//! Module dedicated to the message records the pivot filter reads.
//!
//! Records are owned by the host message store. The library only
//! reads their address headers and their date.

use mail_parser::{HeaderName, HeaderValue, MessageParser};
use tracing::debug;

use crate::{address::collect_addresses, date, Error, PrTime, Result};

/// The message record.
///
/// Address fields hold raw, unparsed header values, as found in the
/// message store (for example `"Alice <alice@localhost>, bob@localhost"`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MessageRecord {
    /// The `From` header.
    pub author: String,
    /// The `To` header.
    pub to: String,
    /// The `Cc` header.
    pub cc: String,
    /// The `Bcc` header.
    pub bcc: String,
    /// The message date, in microseconds since the Unix epoch.
    pub date: PrTime,
}

impl MessageRecord {
    pub fn new(author: impl ToString, to: impl ToString, date: PrTime) -> Self {
        Self {
            author: author.to_string(),
            to: to.to_string(),
            date,
            ..Default::default()
        }
    }

    pub fn with_cc(mut self, cc: impl ToString) -> Self {
        self.cc = cc.to_string();
        self
    }

    pub fn with_bcc(mut self, bcc: impl ToString) -> Self {
        self.bcc = bcc.to_string();
        self
    }

    /// Build a message record from a raw message.
    ///
    /// Only the header block matters: address headers are reduced to
    /// their comma-separated email addresses and the `Date` header is
    /// converted into microseconds. A missing or invalid date fails
    /// with [`Error::ParseRawMessageDateError`].
    pub fn from_raw(raw: impl AsRef<[u8]>) -> Result<Self> {
        let msg = MessageParser::new()
            .parse(raw.as_ref())
            .ok_or(Error::ParseRawMessageError)?;

        let mut record = MessageRecord::default();
        let mut msg_date = None;

        for header in msg.headers() {
            let field = match &header.name {
                HeaderName::From => &mut record.author,
                HeaderName::To => &mut record.to,
                HeaderName::Cc => &mut record.cc,
                HeaderName::Bcc => &mut record.bcc,
                HeaderName::Date => {
                    match header.value() {
                        HeaderValue::DateTime(dt) => msg_date = date::from_mail_parser_datetime(dt),
                        value => debug!("cannot parse message date header {value:?}"),
                    };
                    continue;
                }
                _ => continue,
            };

            if let HeaderValue::Address(addr) = header.value() {
                let addrs = collect_addresses(addr).join(", ");
                if !addrs.is_empty() {
                    if !field.is_empty() {
                        field.push_str(", ");
                    }
                    field.push_str(&addrs);
                }
            }
        }

        record.date = msg_date.ok_or(Error::ParseRawMessageDateError)?;

        Ok(record)
    }
}

/// The user identity.
///
/// Represents one configured mailbox of the user. Its addresses are
/// the ones excluded from the people latched by the pivot filter.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Identity {
    /// The optional display name of the identity.
    pub name: Option<String>,
    /// The primary email address of the identity.
    pub email: Option<String>,
    /// The reply-to address of the identity.
    pub reply_to: Option<String>,
}

impl Identity {
    pub fn new(email: impl ToString) -> Self {
        Self {
            email: Some(email.to_string()),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl ToString) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_reply_to(mut self, reply_to: impl ToString) -> Self {
        self.reply_to = Some(reply_to.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::MessageRecord;

    #[test_log::test]
    fn from_raw() {
        let raw = concat!(
            "From: Alice <alice@localhost>\r\n",
            "To: bob@localhost, Carol <carol@localhost>\r\n",
            "Cc: dave@localhost\r\n",
            "Date: Thu, 01 Jan 1970 00:00:01 +0000\r\n",
            "Subject: hello\r\n",
            "\r\n",
            "Hello, world!\r\n",
        );

        let record = MessageRecord::from_raw(raw).unwrap();

        assert_eq!(record.author, "alice@localhost");
        assert_eq!(record.to, "bob@localhost, carol@localhost");
        assert_eq!(record.cc, "dave@localhost");
        assert_eq!(record.bcc, "");
        assert_eq!(record.date, 1_000_000);
    }

    #[test_log::test]
    fn from_raw_without_date() {
        let raw = "From: alice@localhost\r\nSubject: no date\r\n\r\nbody\r\n";

        assert!(matches!(
            MessageRecord::from_raw(raw),
            Err(Error::ParseRawMessageDateError)
        ));
    }

    #[test_log::test]
    fn from_raw_with_invalid_date() {
        let raw = "From: alice@localhost\r\nDate: someday\r\n\r\nbody\r\n";

        assert!(matches!(
            MessageRecord::from_raw(raw),
            Err(Error::ParseRawMessageDateError)
        ));
    }

    #[test_log::test]
    fn from_raw_at_epoch() {
        let raw = "From: alice@localhost\r\nDate: Thu, 01 Jan 1970 00:00:00 +0000\r\n\r\n";
        let record = MessageRecord::from_raw(raw).unwrap();

        assert_eq!(record.date, 0);
    }
}
