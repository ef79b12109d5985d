use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::enums::{EntityType, TrackedFields};
use crate::errors::CoreError;
use crate::ids::HoleId;

use super::Entity;

/// What a hole carries besides its text. The set is closed: consumers match
/// exhaustively so a new kind is a compile error everywhere it matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HoleKind {
    Text,
    Image { url: String },
    Audio { url: String },
}

/// Wire shape of [`HoleKind`]; deserialized first, then validated.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum KindRepr {
    Text,
    Image { url: String },
    Audio { url: String },
}

impl HoleKind {
    /// Build an image kind.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidContentKind` if `url` is blank.
    pub fn image(url: impl Into<String>) -> Result<Self, CoreError> {
        let url = url.into();
        require_url("image", &url)?;
        Ok(Self::Image { url })
    }

    /// Build an audio kind.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidContentKind` if `url` is blank.
    pub fn audio(url: impl Into<String>) -> Result<Self, CoreError> {
        let url = url.into();
        require_url("audio", &url)?;
        Ok(Self::Audio { url })
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image { .. } => "image",
            Self::Audio { .. } => "audio",
        }
    }

    /// Media URL, if the kind carries one.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Text => None,
            Self::Image { url } | Self::Audio { url } => Some(url),
        }
    }

    /// Decode a `{"type": ..., "url": ...}` value, keeping the failure as a
    /// model error rather than a serde message.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidContentKind` for an unknown or missing
    /// `type`, or a media kind with a blank URL.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, CoreError> {
        let repr = KindRepr::deserialize(value).map_err(|e| CoreError::InvalidContentKind {
            kind: value
                .get("type")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            reason: e.to_string(),
        })?;
        Self::try_from(repr)
    }

    /// Re-check the URL invariant on a value that may have been built
    /// directly from its public variants.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidContentKind` if a media URL is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::Text => Ok(()),
            Self::Image { url } => require_url("image", url),
            Self::Audio { url } => require_url("audio", url),
        }
    }
}

impl TryFrom<KindRepr> for HoleKind {
    type Error = CoreError;

    fn try_from(repr: KindRepr) -> Result<Self, Self::Error> {
        match repr {
            KindRepr::Text => Ok(Self::Text),
            KindRepr::Image { url } => Self::image(url),
            KindRepr::Audio { url } => Self::audio(url),
        }
    }
}

impl<'de> Deserialize<'de> for HoleKind {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let repr = KindRepr::deserialize(d)?;
        Self::try_from(repr).map_err(D::Error::custom)
    }
}

fn require_url(kind: &str, url: &str) -> Result<(), CoreError> {
    if url.trim().is_empty() {
        return Err(CoreError::InvalidContentKind {
            kind: kind.to_string(),
            reason: "url must not be empty".to_string(),
        });
    }
    Ok(())
}

/// A top-level anonymous post.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Hole {
    pub id: HoleId,
    pub text: String,
    pub kind: HoleKind,
    pub timestamp: DateTime<Utc>,
    pub reply: u64,
    pub likenum: u64,
    pub tag: Option<String>,
}

impl Entity for Hole {
    type Id = HoleId;

    const ENTITY_TYPE: EntityType = EntityType::Hole;

    fn id(&self) -> HoleId {
        self.id
    }

    fn validate(&self) -> Result<(), CoreError> {
        self.kind.validate()
    }

    fn immutable_conflict(&self, stored: &Self) -> Option<&'static str> {
        if self.id != stored.id {
            Some("id")
        } else if self.kind != stored.kind {
            Some("kind")
        } else if self.timestamp != stored.timestamp {
            Some("timestamp")
        } else {
            None
        }
    }

    fn same_content(&self, other: &Self) -> bool {
        self.same_tracked_content(other, TrackedFields::ALL)
    }

    fn same_tracked_content(&self, other: &Self, tracked: TrackedFields) -> bool {
        self.text == other.text
            && self.tag == other.tag
            && (!tracked.reply || self.reply == other.reply)
            && (!tracked.likenum || self.likenum == other.likenum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hole(text: &str) -> Hole {
        Hole {
            id: HoleId(1),
            text: text.to_string(),
            kind: HoleKind::Text,
            timestamp: DateTime::from_timestamp(1_653_983_358, 0).unwrap(),
            reply: 0,
            likenum: 1,
            tag: None,
        }
    }

    #[test]
    fn media_kinds_reject_blank_url() {
        assert!(matches!(
            HoleKind::image(""),
            Err(CoreError::InvalidContentKind { .. })
        ));
        assert!(matches!(
            HoleKind::audio("   "),
            Err(CoreError::InvalidContentKind { .. })
        ));
        assert_eq!(
            HoleKind::image("a.jpg").unwrap().url(),
            Some("a.jpg")
        );
    }

    #[test]
    fn kind_serializes_with_type_tag() {
        let kind = HoleKind::audio("clip.mp3").unwrap();
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json, serde_json::json!({"type": "audio", "url": "clip.mp3"}));
        let text = serde_json::to_value(HoleKind::Text).unwrap();
        assert_eq!(text, serde_json::json!({"type": "text"}));
    }

    #[test]
    fn kind_deserialization_validates_url() {
        let err = serde_json::from_str::<HoleKind>(r#"{"type":"image","url":""}"#);
        assert!(err.is_err());
        let ok: HoleKind = serde_json::from_str(r#"{"type":"image","url":"x.png"}"#).unwrap();
        assert_eq!(ok, HoleKind::Image { url: "x.png".into() });
    }

    #[test]
    fn kind_from_value_keeps_model_errors() {
        let blank = HoleKind::from_value(&serde_json::json!({"type": "image", "url": ""}));
        assert!(matches!(blank, Err(CoreError::InvalidContentKind { kind, .. }) if kind == "image"));

        let unknown = HoleKind::from_value(&serde_json::json!({"type": "video"}));
        assert!(matches!(unknown, Err(CoreError::InvalidContentKind { kind, .. }) if kind == "video"));

        let text = HoleKind::from_value(&serde_json::json!({"type": "text"})).unwrap();
        assert_eq!(text, HoleKind::Text);
    }

    #[test]
    fn directly_built_kind_is_rechecked() {
        let kind = HoleKind::Image { url: String::new() };
        assert!(kind.validate().is_err());
    }

    #[test]
    fn counters_and_tag_are_content() {
        let base = hole("a");
        let mut liked = base.clone();
        liked.likenum += 1;
        assert!(!base.same_content(&liked));

        let mut tagged = base.clone();
        tagged.tag = Some("折叠".into());
        assert!(!base.same_content(&tagged));

        assert!(base.same_content(&base.clone()));
    }

    #[test]
    fn untracked_counters_are_not_content() {
        let base = hole("a");
        let mut busy = base.clone();
        busy.reply += 3;
        busy.likenum += 7;

        assert!(base.same_tracked_content(&busy, TrackedFields::NONE));
        let replies_only = TrackedFields {
            reply: true,
            likenum: false,
        };
        assert!(!base.same_tracked_content(&busy, replies_only));

        let mut edited = base.clone();
        edited.text = "b".into();
        assert!(!base.same_tracked_content(&edited, TrackedFields::NONE));
    }

    #[test]
    fn kind_and_timestamp_are_immutable() {
        let base = hole("a");
        let mut image = base.clone();
        image.kind = HoleKind::image("a.jpg").unwrap();
        assert_eq!(image.immutable_conflict(&base), Some("kind"));

        let mut moved = base.clone();
        moved.timestamp = DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(moved.immutable_conflict(&base), Some("timestamp"));

        let mut edited = base.clone();
        edited.text = "b".into();
        assert_eq!(edited.immutable_conflict(&base), None);
    }
}
