//! Numeric identities for holes and replies.
//!
//! Both are thin `u64` wrappers serialized as plain numbers. Keeping them as
//! distinct types stops a reply id from being used where a hole id is meant.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a hole (`pid` in the forum API).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct HoleId(pub u64);

/// Identity of a reply (`cid` in the forum API).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ReplyId(pub u64);

macro_rules! numeric_id {
    ($the_id:ident) => {
        impl From<u64> for $the_id {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$the_id> for u64 {
            fn from(id: $the_id) -> Self {
                id.0
            }
        }

        impl fmt::Display for $the_id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(HoleId);
numeric_id!(ReplyId);
