//! Module dedicated to the pivot filter configuration.
//!
//! The configuration survives sessions: it says which roles the
//! latched people should be matched against, and which date window
//! should surround the latched date range.

use crate::PrTime;

const PRTIME_DAY: PrTime = 24 * 60 * 60 * 1000 * 1000;
const PRTIME_WEEK: PrTime = 7 * PRTIME_DAY;
const PRTIME_MONTH: PrTime = 31 * PRTIME_DAY;

/// The role an address can be matched against.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Role {
    /// Match the address against the sender header.
    Sender,

    /// Match the address against the recipient headers.
    Recipient,
}

/// The set of roles an address should be matched against.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<Role>", into = "Vec<Role>")
)]
pub struct RoleMask {
    sender: bool,
    recipient: bool,
}

impl RoleMask {
    /// The mask matching no role at all.
    pub const NONE: RoleMask = RoleMask {
        sender: false,
        recipient: false,
    };

    /// The mask matching both roles.
    pub const ALL: RoleMask = RoleMask {
        sender: true,
        recipient: true,
    };

    pub fn contains(&self, role: Role) -> bool {
        match role {
            Role::Sender => self.sender,
            Role::Recipient => self.recipient,
        }
    }

    pub fn set(&mut self, role: Role, enabled: bool) {
        match role {
            Role::Sender => self.sender = enabled,
            Role::Recipient => self.recipient = enabled,
        }
    }

    pub fn with(mut self, role: Role) -> Self {
        self.set(role, true);
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.sender && !self.recipient
    }

    pub fn match_as_sender(&self) -> bool {
        self.sender
    }

    pub fn match_as_recipient(&self) -> bool {
        self.recipient
    }
}

impl Default for RoleMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromIterator<Role> for RoleMask {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        iter.into_iter().fold(RoleMask::NONE, RoleMask::with)
    }
}

impl From<Vec<Role>> for RoleMask {
    fn from(roles: Vec<Role>) -> Self {
        roles.into_iter().collect()
    }
}

impl From<RoleMask> for Vec<Role> {
    fn from(mask: RoleMask) -> Self {
        [Role::Sender, Role::Recipient]
            .into_iter()
            .filter(|role| mask.contains(*role))
            .collect()
    }
}

/// The window of time searched around the latched date range.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum DateWindow {
    /// Do not restrict the search by date.
    #[default]
    Off,

    /// One day before and after.
    Day,

    /// One week before and after.
    Week,

    /// 31 days before and after.
    Month,
}

impl DateWindow {
    /// The amount of microseconds the latched date range is widened
    /// by, if the window is enabled.
    pub fn around(&self) -> Option<PrTime> {
        match self {
            Self::Off => None,
            Self::Day => Some(PRTIME_DAY),
            Self::Week => Some(PRTIME_WEEK),
            Self::Month => Some(PRTIME_MONTH),
        }
    }
}

/// The pivot filter configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case", default)
)]
pub struct FilterConfig {
    /// The roles latched senders are matched against.
    pub sender_roles: RoleMask,

    /// The roles latched recipients are matched against.
    pub recipient_roles: RoleMask,

    /// The window of time searched around the latched dates.
    pub date_window: DateWindow,
}

impl FilterConfig {
    /// Enable or disable matching latched senders against the given
    /// role.
    pub fn toggle_sender_role(&mut self, role: Role, checked: bool) {
        self.sender_roles.set(role, checked)
    }

    /// Enable or disable matching latched recipients against the
    /// given role.
    pub fn toggle_recipient_role(&mut self, role: Role, checked: bool) {
        self.recipient_roles.set(role, checked)
    }

    /// Select or deselect a date window.
    ///
    /// Windows are mutually exclusive: selecting one replaces the
    /// previous one, deselecting one disables the date restriction.
    pub fn toggle_date_window(&mut self, window: DateWindow, checked: bool) {
        self.date_window = if checked { window } else { DateWindow::Off };
    }
}
