//! # prefixed-uuids
//!
//! Compact, human-readable, URL-safe tokens for UUIDs.
//!
//! ## Design Principles
//!
//! - Every token names its entity kind through a short lowercase prefix
//! - Parsing is strict: malformed input reports the earliest failing check
//! - A registry is configured once, then shared read-only
//! - The encoding is reversible and not secret
//!
//! ## Token Format
//!
//! `{prefix}{separator}{payload}` where the payload is the unpadded
//! base64url encoding of the UUID's 16 big-endian bytes, or of several
//! UUIDs back to back for composite entities.
//!
//! Examples:
//! - `user.AZXje_k_dRiprKK-aEY8fg` (27 characters vs. 36 for hex)
//! - `user~AZXje_k_dRiprKK-aEY8fg` with the `~` separator
//!
//! ```
//! use prefixed_uuids::{Entity, PrefixInfo, Registry};
//! use uuid::Uuid;
//!
//! const USER: Entity = Entity::new(1);
//!
//! let registry = Registry::new([PrefixInfo::new(USER, "user")]).unwrap();
//! let id = Uuid::parse_str("0195e37b-f93f-7518-a9ac-a2be68463c7e").unwrap();
//!
//! let token = registry.serialize(USER, id);
//! assert_eq!(token, "user.AZXje_k_dRiprKK-aEY8fg");
//! assert_eq!(registry.deserialize(USER, &token).unwrap(), id);
//! ```

mod config;
mod entity;
mod error;
mod macros;
mod registry;

pub use config::RegistryConfig;
pub use entity::*;
pub use error::{ConfigError, DecodeError};
pub use registry::Registry;

/// Re-export uuid for consumers that need to construct raw UUIDs
pub use uuid::Uuid;
