//! Entity owners
//!
//! Cortex accepts three kinds of owner. Each variant carries only the fields
//! that kind understands.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityOwner {
    Email {
        email: String,
        description: Option<String>,
    },
    Group {
        name: String,
        provider: Option<String>,
        description: Option<String>,
        inheritance: Option<String>,
    },
    Slack {
        channel: String,
        notifications_enabled: bool,
        description: Option<String>,
    },
}

/// Discriminator used by descriptors and Terraform configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Email,
    Group,
    Slack,
}

impl OwnerKind {
    pub const ALL: [&'static str; 3] = ["email", "group", "slack"];

    pub fn as_str(self) -> &'static str {
        match self {
            OwnerKind::Email => "email",
            OwnerKind::Group => "group",
            OwnerKind::Slack => "slack",
        }
    }
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OwnerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(OwnerKind::Email),
            "group" => Ok(OwnerKind::Group),
            "slack" => Ok(OwnerKind::Slack),
            other => Err(format!(
                "unknown owner type {:?}, expected one of {:?}",
                other,
                OwnerKind::ALL
            )),
        }
    }
}

impl EntityOwner {
    pub fn kind(&self) -> OwnerKind {
        match self {
            EntityOwner::Email { .. } => OwnerKind::Email,
            EntityOwner::Group { .. } => OwnerKind::Group,
            EntityOwner::Slack { .. } => OwnerKind::Slack,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            EntityOwner::Email { description, .. }
            | EntityOwner::Group { description, .. }
            | EntityOwner::Slack { description, .. } => description.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_kind_parse_is_case_insensitive() {
        assert_eq!("EMAIL".parse::<OwnerKind>().unwrap(), OwnerKind::Email);
        assert_eq!("group".parse::<OwnerKind>().unwrap(), OwnerKind::Group);
        assert!("pager".parse::<OwnerKind>().is_err());
    }

    #[test]
    fn test_owner_kind_matches_variant() {
        let owner = EntityOwner::Slack {
            channel: "eng".to_string(),
            notifications_enabled: true,
            description: None,
        };
        assert_eq!(owner.kind(), OwnerKind::Slack);
        assert_eq!(owner.description(), None);
    }
}
