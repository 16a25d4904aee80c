// ── Entity identity ──
//
// Ids on the wire are plain strings, but the backend issues two kinds:
// UUIDs from the newer route groups and 24-hex-char Mongo ObjectIds from
// the older ones. Classification happens once, at construction; on the
// wire the id is always just its string form (`from`/`into` below), so
// the serde layer never sees the enum shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-issued identifier for any Fleetline entity.
///
/// The store layer only compares and displays ids. The classification
/// exists so logs and debugging show which backend generation a record
/// came from, not for routing decisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityId {
    Uuid(Uuid),
    /// Mongo ObjectId: exactly 24 hex characters.
    ObjectId(String),
    /// Anything else the backend hands out. Kept verbatim.
    Raw(String),
}

fn is_object_id(s: &str) -> bool {
    s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => u.fmt(f),
            Self::ObjectId(s) | Self::Raw(s) => f.write_str(s),
        }
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        if let Ok(u) = Uuid::try_parse(&s) {
            return Self::Uuid(u);
        }
        if is_object_id(&s) {
            return Self::ObjectId(s);
        }
        Self::Raw(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.to_string()
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}
