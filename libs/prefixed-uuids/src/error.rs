//! Error types for registry configuration and token decoding.

use thiserror::Error;

use crate::Entity;

/// Errors raised while building or reconfiguring a [`Registry`](crate::Registry).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The reserved null entity was used in a registration.
    #[error("entity cannot be NullEntity, use a non-zero value")]
    NullEntity,

    /// The prefix is empty or uses characters outside `[a-z0-9_-]`.
    #[error(
        "prefix must be in lowercase and contain only alphanumeric characters, underscores, and hyphens: got '{prefix}'"
    )]
    InvalidPrefix { prefix: String },

    /// The separator is not exactly `.` or `~`.
    #[error("invalid separator '{separator}': only '.' and '~' are allowed")]
    InvalidSeparator { separator: String },

    /// A composite entity is already registered.
    #[error("entity {entity} is already registered")]
    DuplicateEntity { entity: Entity },

    /// A composite prefix is already registered.
    #[error("prefix '{prefix}' is already registered")]
    DuplicatePrefix { prefix: String },

    /// A composite lists fewer than two components.
    #[error("multi type must have at least 2 component entities, got {count}")]
    TooFewComponents { count: usize },

    /// A composite references an entity with no prefix.
    #[error("component entity {entity} is not registered in the registry")]
    ComponentNotRegistered { entity: Entity },

    /// A declarative configuration document could not be parsed.
    #[error("invalid registry configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Returns true if this error is a collision with an existing registration.
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            ConfigError::DuplicateEntity { .. } | ConfigError::DuplicatePrefix { .. }
        )
    }

    /// Returns true if this error concerns a composite definition.
    pub fn is_composite_error(&self) -> bool {
        matches!(
            self,
            ConfigError::TooFewComponents { .. } | ConfigError::ComponentNotRegistered { .. }
        )
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Errors raised while encoding or decoding prefixed tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The token does not split into exactly a prefix and a payload.
    #[error("invalid prefixed uuid format")]
    InvalidFormat,

    /// The prefix is not registered.
    #[error("unknown prefix '{prefix}'")]
    UnknownPrefix { prefix: String },

    /// The payload is not valid unpadded base64url.
    #[error("invalid uuid bad base64 part: {0}")]
    BadBase64(String),

    /// The decoded payload is not a UUID (or a run of UUIDs) of the right length.
    #[error("invalid uuid format: {0}")]
    InvalidUuid(String),

    /// The token's entity differs from the requested one.
    #[error("entity mismatch: expected {expected}, got {actual}")]
    EntityMismatch { expected: Entity, actual: Entity },

    /// A composite operation was invoked on a plain entity.
    #[error("entity {entity} is not a multi type")]
    NotMultiEntity { entity: Entity },

    /// The number of supplied UUIDs or targets differs from the composite's arity.
    #[error("number of uuids does not match multi type definition: expected {expected}, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    /// A supplied entity sits at the wrong position for the composite.
    #[error(
        "entity at position does not match multi type definition: position {position} expected entity {expected}, got {actual}"
    )]
    OrderMismatch {
        position: usize,
        expected: Entity,
        actual: Entity,
    },

    /// Strict serialization was asked for an entity with no prefix.
    #[error("entity {entity} has no registered prefix")]
    UnregisteredEntity { entity: Entity },
}

impl DecodeError {
    /// Returns true if the token itself is malformed, independent of the request.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            DecodeError::InvalidFormat
                | DecodeError::UnknownPrefix { .. }
                | DecodeError::BadBase64(_)
                | DecodeError::InvalidUuid(_)
        )
    }

    /// Returns true if the caller's request disagrees with the registry.
    pub fn is_request_mismatch(&self) -> bool {
        matches!(
            self,
            DecodeError::EntityMismatch { .. }
                | DecodeError::NotMultiEntity { .. }
                | DecodeError::CountMismatch { .. }
                | DecodeError::OrderMismatch { .. }
        )
    }
}
