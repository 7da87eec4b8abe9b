//! Entity tags, prefix registrations and the token separator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ConfigError;

// =============================================================================
// Entity
// =============================================================================

/// Application-defined tag identifying a kind of object.
///
/// The value `0` is reserved as [`Entity::NULL`] and is never registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Entity(i64);

impl Entity {
    /// The reserved "absent" entity.
    pub const NULL: Self = Self(0);

    /// Creates an entity from its integer tag.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying integer tag.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Returns true for the reserved null entity.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Entity {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Entity> for i64 {
    fn from(entity: Entity) -> Self {
        entity.0
    }
}

impl Serialize for Entity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i64::deserialize(deserializer)?;
        Ok(Self(id))
    }
}

// =============================================================================
// Registrations
// =============================================================================

/// Binds an entity to its token prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixInfo {
    pub entity: Entity,
    pub prefix: String,
}

impl PrefixInfo {
    pub fn new(entity: Entity, prefix: impl Into<String>) -> Self {
        Self {
            entity,
            prefix: prefix.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.entity.is_null() {
            return Err(ConfigError::NullEntity);
        }
        validate_prefix(&self.prefix)
    }
}

/// Defines a composite entity whose payload packs the UUIDs of its
/// components, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiPrefixInfo {
    pub entity: Entity,
    pub prefix: String,
    pub components: Vec<Entity>,
}

impl MultiPrefixInfo {
    pub fn new(entity: Entity, prefix: impl Into<String>, components: Vec<Entity>) -> Self {
        Self {
            entity,
            prefix: prefix.into(),
            components,
        }
    }
}

/// One component of a composite token being serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityUuid {
    pub entity: Entity,
    pub uuid: Uuid,
}

impl EntityUuid {
    pub const fn new(entity: Entity, uuid: Uuid) -> Self {
        Self { entity, uuid }
    }
}

/// Output slot for one component of a composite token being deserialized.
#[derive(Debug)]
pub struct EntityUuidSlot<'a> {
    pub entity: Entity,
    pub uuid: &'a mut Uuid,
}

impl<'a> EntityUuidSlot<'a> {
    pub fn new(entity: Entity, uuid: &'a mut Uuid) -> Self {
        Self { entity, uuid }
    }
}

/// Checks that a prefix is non-empty and matches `[a-z0-9_-]+`.
pub fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    let valid = !prefix.is_empty()
        && prefix
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');

    if !valid {
        return Err(ConfigError::InvalidPrefix {
            prefix: prefix.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Separator
// =============================================================================

/// Delimiter between prefix and payload.
///
/// Only characters outside the base64url alphabet that URLs never
/// percent-encode qualify, which leaves `.` and `~`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Separator {
    #[default]
    Dot,
    Tilde,
}

impl Separator {
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Separator::Dot => '.',
            Separator::Tilde => '~',
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Separator::Dot => ".",
            Separator::Tilde => "~",
        }
    }
}

impl std::fmt::Display for Separator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Separator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "." => Ok(Separator::Dot),
            "~" => Ok(Separator::Tilde),
            other => Err(ConfigError::InvalidSeparator {
                separator: other.to_string(),
            }),
        }
    }
}

impl TryFrom<char> for Separator {
    type Error = ConfigError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => Ok(Separator::Dot),
            '~' => Ok(Separator::Tilde),
            other => Err(ConfigError::InvalidSeparator {
                separator: other.to_string(),
            }),
        }
    }
}

impl Serialize for Separator {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Separator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_prefix() {
        assert!(validate_prefix("user").is_ok());
        assert!(validate_prefix("user_v2").is_ok());
        assert!(validate_prefix("test-prefix_123").is_ok());
        assert!(validate_prefix("0").is_ok());

        assert!(validate_prefix("").is_err());
        assert!(validate_prefix("Test").is_err());
        assert!(validate_prefix("test prefix").is_err());
        assert!(validate_prefix("test@prefix").is_err());
        assert!(validate_prefix("user.v2").is_err());
        assert!(validate_prefix("ünïcode").is_err());
    }

    #[test]
    fn test_prefix_info_rejects_null_entity_first() {
        let info = PrefixInfo::new(Entity::NULL, "Bad Prefix");
        assert_eq!(info.validate(), Err(ConfigError::NullEntity));
    }

    #[test]
    fn test_separator_parse() {
        assert_eq!(".".parse::<Separator>().unwrap(), Separator::Dot);
        assert_eq!("~".parse::<Separator>().unwrap(), Separator::Tilde);

        for bad in ["", ":", "..", ".~", "-", "_", " "] {
            assert!(matches!(
                bad.parse::<Separator>(),
                Err(ConfigError::InvalidSeparator { .. })
            ));
        }
    }

    #[test]
    fn test_separator_try_from_char() {
        assert_eq!(Separator::try_from('~').unwrap().as_char(), '~');
        assert!(Separator::try_from('/').is_err());
    }

    #[test]
    fn test_separator_default_is_dot() {
        assert_eq!(Separator::default().as_str(), ".");
    }

    #[test]
    fn test_entity_json_roundtrip() {
        let entity = Entity::new(42);
        let json = serde_json::to_string(&entity).unwrap();
        assert_eq!(json, "42");
        let parsed: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(entity, parsed);
    }

    #[test]
    fn test_separator_json_rejects_invalid() {
        let parsed: Separator = serde_json::from_str("\"~\"").unwrap();
        assert_eq!(parsed, Separator::Tilde);
        assert!(serde_json::from_str::<Separator>("\":\"").is_err());
    }
}
