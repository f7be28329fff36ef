//! Clients and their category tags.
//!
//! Clients are owned by an external CRM; the salon only reads their name,
//! company flag and tags, and manages membership of the loyalty tag.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, ClientName, TagId, TagName, TypeConstraintError};

/// Name of the loyalty tag granted to frequent clients.
pub const VIP_TAG_NAME: &str = "VIP";
/// Display color used when the loyalty tag has to be created.
pub const VIP_TAG_COLOR: i32 = 3;
/// Number of completed appointments required to hold the loyalty tag.
pub const VIP_THRESHOLD: usize = 5;

/// A category tag that can be attached to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
    pub color: i32,
}

/// Data required to register a [`Tag`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTag {
    pub name: TagName,
    pub color: i32,
}

impl NewTag {
    /// The loyalty tag with its default color.
    pub fn vip() -> Result<Self, TypeConstraintError> {
        Ok(Self {
            name: TagName::new(VIP_TAG_NAME)?,
            color: VIP_TAG_COLOR,
        })
    }
}

/// A salon client together with its tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: ClientName,
    pub is_company: bool,
    pub tags: Vec<Tag>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Client {
    /// Whether any of the client's tags reads "VIP", ignoring case.
    pub fn is_vip(&self) -> bool {
        has_vip_tag(self.tags.iter().map(|tag| tag.name.as_str()))
    }

    /// Whether the client holds the exact loyalty tag managed by the salon.
    pub fn holds_loyalty_tag(&self) -> bool {
        self.tags.iter().any(|tag| tag.name == VIP_TAG_NAME)
    }
}

/// Data required to register a [`Client`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewClient {
    pub name: ClientName,
    pub is_company: bool,
}

/// Case-insensitive lookup of the VIP tag among tag names, using full Unicode
/// uppercasing.
pub fn has_vip_tag<'a, I>(tag_names: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    tag_names
        .into_iter()
        .any(|name| name.to_uppercase() == VIP_TAG_NAME)
}

/// Change required to bring a client's loyalty tag in line with its history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoyaltyAction {
    /// Attach the loyalty tag, creating it if it does not exist yet.
    Grant,
    /// Detach the loyalty tag from the client.
    Revoke,
    /// Nothing to change.
    Keep,
}

/// Decide the loyalty tag change for a client with `done_appointments`
/// completed visits.
pub fn loyalty_action(done_appointments: usize, holds_tag: bool) -> LoyaltyAction {
    match (done_appointments >= VIP_THRESHOLD, holds_tag) {
        (true, false) => LoyaltyAction::Grant,
        (false, true) => LoyaltyAction::Revoke,
        _ => LoyaltyAction::Keep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vip_detection_ignores_case() {
        assert!(has_vip_tag(["Regular", "vip"]));
        assert!(has_vip_tag(["ViP"]));
        assert!(has_vip_tag(["v\u{131}p"]));
        assert!(!has_vip_tag(["VIP Gold", "Regular"]));
        assert!(!has_vip_tag(std::iter::empty::<&str>()));
    }

    #[test]
    fn five_done_appointments_grant_the_tag() {
        assert_eq!(loyalty_action(5, false), LoyaltyAction::Grant);
        assert_eq!(loyalty_action(12, true), LoyaltyAction::Keep);
    }

    #[test]
    fn four_done_appointments_revoke_the_tag() {
        assert_eq!(loyalty_action(4, true), LoyaltyAction::Revoke);
        assert_eq!(loyalty_action(0, false), LoyaltyAction::Keep);
    }
}
