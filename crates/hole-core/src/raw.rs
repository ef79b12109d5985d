//! Parsing for the forum API's raw hole and reply pages.
//!
//! The API encodes most numbers as strings, flattens the content kind into
//! `type` + `url`, reports timestamps as epoch seconds, and prefixes reply
//! text with the speaker's display name. These types absorb those quirks and
//! convert into model [`Hole`]s and [`Reply`]s ready for ingestion.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, de::Error as _};

use crate::entities::{Hole, HoleKind, Reply};
use crate::errors::CoreError;
use crate::ids::{HoleId, ReplyId};

// Anchored at the start: a bracketed name quoted later in the text stays.
static SPEAKER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(洞主|\w+?(\s\w+)?)\]\s+").expect("speaker prefix pattern is valid")
});

/// A JSON value the API sends either as a number or as a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    String(String),
}

impl NumberOrString {
    fn parse_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(s) => s.trim().parse().ok(),
        }
    }
}

/// Strict id parsing: an id that is not a non-negative integer is an error.
fn id_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let raw = NumberOrString::deserialize(d)?;
    raw.parse_i64()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| D::Error::custom("id is not a non-negative integer"))
}

/// Lossy counter parsing: anything unparseable counts as zero.
fn lossy_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let raw = NumberOrString::deserialize(d)?;
    Ok(raw
        .parse_i64()
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0))
}

fn epoch_seconds<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = NumberOrString::deserialize(d)?;
    raw.parse_i64()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| D::Error::custom("timestamp is not epoch seconds"))
}

fn optional_epoch_seconds<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<NumberOrString>::deserialize(d)?;
    Ok(raw
        .and_then(|r| r.parse_i64())
        .and_then(|secs| DateTime::from_timestamp(secs, 0)))
}

fn number_to_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Other(NumberOrString),
    }

    Ok(match Flag::deserialize(d)? {
        Flag::Bool(b) => b,
        Flag::Other(raw) => raw.parse_i64().is_some_and(|n| n != 0),
    })
}

fn strip_speaker_prefix<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let s = String::deserialize(d)?;
    Ok(SPEAKER_PREFIX.replace(&s, "").into_owned())
}

/// `data` is a single object for single-hole lookups and an array otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::One(one) => vec![one],
            OneOrMany::Many(many) => many,
        }
    }
}

// ---------------------------------------------------------------------------
// Holes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RawHole {
    #[serde(rename = "pid", deserialize_with = "id_u64")]
    pub id: u64,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(deserialize_with = "epoch_seconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(deserialize_with = "lossy_u64")]
    pub reply: u64,
    #[serde(deserialize_with = "lossy_u64")]
    pub likenum: u64,
    #[serde(default)]
    pub tag: Option<String>,
}

impl TryFrom<RawHole> for Hole {
    type Error = CoreError;

    fn try_from(raw: RawHole) -> Result<Self, Self::Error> {
        let RawHole {
            id,
            text,
            kind,
            url,
            timestamp,
            reply,
            likenum,
            tag,
        } = raw;
        let url = url.unwrap_or_default();
        let kind = match kind.as_str() {
            "text" => HoleKind::Text,
            "image" => HoleKind::image(url)?,
            "audio" => HoleKind::audio(url)?,
            other => {
                return Err(CoreError::InvalidContentKind {
                    kind: other.to_string(),
                    reason: "expected 'text', 'image' or 'audio'".to_string(),
                });
            }
        };
        Ok(Self {
            id: HoleId(id),
            text,
            kind,
            timestamp,
            reply,
            likenum,
            tag,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RawHolePage {
    pub code: i32,
    #[serde(default)]
    pub count: Option<i32>,
    pub data: OneOrMany<RawHole>,
    /// When the API produced the page, if it says.
    #[serde(default, deserialize_with = "optional_epoch_seconds")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RawHolePage {
    /// When the API served the page. Snapshots taken from the page are
    /// stamped with this time when it is present.
    #[must_use]
    pub const fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Convert every hole on the page into an ingestion candidate.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the page reports a non-zero `code`,
    /// or `CoreError::InvalidContentKind` for a malformed hole kind.
    pub fn into_holes(self) -> Result<Vec<Hole>, CoreError> {
        check_code(i64::from(self.code))?;
        Vec::from(self.data).into_iter().map(Hole::try_from).collect()
    }
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RawReply {
    #[serde(rename = "cid", deserialize_with = "id_u64")]
    pub id: u64,
    #[serde(rename = "pid", deserialize_with = "id_u64")]
    pub hole: u64,
    pub name: String,
    #[serde(deserialize_with = "strip_speaker_prefix")]
    pub text: String,
    #[serde(rename = "islz", deserialize_with = "number_to_bool")]
    pub dz: bool,
    #[serde(deserialize_with = "epoch_seconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl From<RawReply> for Reply {
    fn from(raw: RawReply) -> Self {
        let RawReply {
            id,
            hole,
            name,
            text,
            dz,
            timestamp,
            tag,
        } = raw;
        Self {
            id: ReplyId(id),
            hole: HoleId(hole),
            name,
            text,
            dz,
            timestamp,
            tag,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawReplyPage {
    pub code: i32,
    pub data: Vec<RawReply>,
    #[serde(default, deserialize_with = "number_to_bool")]
    pub attention: bool,
}

impl RawReplyPage {
    /// Convert every reply on the page into an ingestion candidate.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the page reports a non-zero `code`.
    pub fn into_replies(self) -> Result<Vec<Reply>, CoreError> {
        check_code(i64::from(self.code))?;
        Ok(self.data.into_iter().map(Reply::from).collect())
    }
}

fn check_code(code: i64) -> Result<(), CoreError> {
    if code == 0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("API page returned code {code}")))
    }
}
