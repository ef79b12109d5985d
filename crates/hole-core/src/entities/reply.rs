use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EntityType;
use crate::errors::CoreError;
use crate::ids::{HoleId, ReplyId};

use super::Entity;

/// A comment attached to a hole. `hole` is a back-reference only; the store
/// checks it against known holes at ingestion time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Reply {
    pub id: ReplyId,
    pub hole: HoleId,
    pub name: String,
    pub text: String,
    /// Opaque flag from the forum (set on the hole author's own replies).
    pub dz: bool,
    pub timestamp: DateTime<Utc>,
    pub tag: Option<String>,
}

impl Entity for Reply {
    type Id = ReplyId;

    const ENTITY_TYPE: EntityType = EntityType::Reply;

    fn id(&self) -> ReplyId {
        self.id
    }

    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }

    fn immutable_conflict(&self, stored: &Self) -> Option<&'static str> {
        if self.id != stored.id {
            Some("id")
        } else if self.hole != stored.hole {
            Some("hole")
        } else if self.name != stored.name {
            Some("name")
        } else if self.dz != stored.dz {
            Some("dz")
        } else if self.timestamp != stored.timestamp {
            Some("timestamp")
        } else {
            None
        }
    }

    fn same_content(&self, other: &Self) -> bool {
        self.text == other.text && self.tag == other.tag
    }
}
