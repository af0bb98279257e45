/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Permission level attached to a user.
///
/// Variants are declared lowest first so the derived ordering is the rank:
/// `User < Editor < Admin`. Minimum-role checks compare with `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    User,
    Editor,
    Admin,
}

impl Role {
    /// Storage form (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Editor => "editor",
            Role::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::User => "User",
            Role::Editor => "Editor",
            Role::Admin => "Admin",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownVariant { kind: "role", value: s.to_string() }),
        }
    }
}

// Used by sqlx `#[sqlx(try_from = "String")]` on model fields
impl TryFrom<String> for Role {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Kind of tag imported from the board game database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagType {
    Category,
    Mechanic,
}

impl TagType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagType::Category => "category",
            TagType::Mechanic => "mechanic",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagType::Category => f.write_str("Category"),
            TagType::Mechanic => f.write_str("Mechanic"),
        }
    }
}

impl FromStr for TagType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" | "boardgamecategory" => Ok(TagType::Category),
            "mechanic" | "boardgamemechanic" => Ok(TagType::Mechanic),
            _ => Err(UnknownVariant { kind: "tag type", value: s.to_string() }),
        }
    }
}

impl TryFrom<String> for TagType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
