//! The prefix registry and the token codec built on it.
//!
//! A [`Registry`] is configured once through `&mut self` setup calls and
//! then shared read-only, typically behind an `Arc`. Every encode/decode
//! operation takes `&self`, so the borrow checker rules out reconfiguring
//! a registry while readers hold it.

use std::collections::HashMap;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use tracing::debug;
use uuid::Uuid;

use crate::{
    ConfigError, DecodeError, Entity, EntityUuid, EntityUuidSlot, MultiPrefixInfo, PrefixInfo,
    Separator,
};

/// Size of a UUID's binary encoding.
const UUID_LEN: usize = 16;

/// Bidirectional prefix/entity table plus composite definitions.
#[derive(Debug, Clone)]
pub struct Registry {
    prefixes: HashMap<Entity, String>,
    reverse: HashMap<String, Entity>,
    separator: Separator,
    multi: HashMap<Entity, Vec<Entity>>,
}

impl Registry {
    /// Builds a registry from an initial set of prefixes.
    ///
    /// Duplicate entities or prefixes within the batch are not rejected;
    /// the last registration wins.
    pub fn new<I>(prefixes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = PrefixInfo>,
    {
        let prefixes = prefixes.into_iter();
        let (capacity, _) = prefixes.size_hint();

        let mut registry = Self {
            prefixes: HashMap::with_capacity(capacity),
            reverse: HashMap::with_capacity(capacity),
            separator: Separator::default(),
            multi: HashMap::new(),
        };

        for info in prefixes {
            info.validate()?;
            registry.reverse.insert(info.prefix.clone(), info.entity);
            registry.prefixes.insert(info.entity, info.prefix);
        }

        debug!(entries = registry.prefixes.len(), "prefix registry built");
        Ok(registry)
    }

    /// Changes the separator. Only `"."` and `"~"` are accepted.
    ///
    /// On error the registry is left untouched.
    pub fn with_separator(&mut self, separator: &str) -> Result<&mut Self, ConfigError> {
        self.separator = separator.parse()?;
        debug!(separator = %self.separator, "registry separator changed");
        Ok(self)
    }

    /// Registers a composite entity.
    ///
    /// Checks run in a fixed order and the first failure is returned with
    /// the registry unchanged.
    pub fn add_multi_prefix(&mut self, info: MultiPrefixInfo) -> Result<(), ConfigError> {
        if info.entity.is_null() {
            return Err(ConfigError::NullEntity);
        }
        crate::validate_prefix(&info.prefix)?;
        if self.prefixes.contains_key(&info.entity) {
            return Err(ConfigError::DuplicateEntity {
                entity: info.entity,
            });
        }
        if self.reverse.contains_key(&info.prefix) {
            return Err(ConfigError::DuplicatePrefix {
                prefix: info.prefix,
            });
        }
        if info.components.len() < 2 {
            return Err(ConfigError::TooFewComponents {
                count: info.components.len(),
            });
        }
        if let Some(&entity) = info
            .components
            .iter()
            .find(|e| !self.prefixes.contains_key(*e))
        {
            return Err(ConfigError::ComponentNotRegistered { entity });
        }

        debug!(
            entity = %info.entity,
            prefix = %info.prefix,
            arity = info.components.len(),
            "composite prefix registered"
        );

        self.prefixes.insert(info.entity, info.prefix.clone());
        self.reverse.insert(info.prefix, info.entity);
        self.multi.insert(info.entity, info.components);
        Ok(())
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// The active separator.
    pub fn separator(&self) -> Separator {
        self.separator
    }

    pub fn prefix_of(&self, entity: Entity) -> Option<&str> {
        self.prefixes.get(&entity).map(String::as_str)
    }

    pub fn entity_of(&self, prefix: &str) -> Option<Entity> {
        self.reverse.get(prefix).copied()
    }

    /// Declared components of a composite entity, in order.
    pub fn components_of(&self, entity: Entity) -> Option<&[Entity]> {
        self.multi.get(&entity).map(Vec::as_slice)
    }

    pub fn is_multi(&self, entity: Entity) -> bool {
        self.multi.contains_key(&entity)
    }

    /// Number of registered entities, composites included.
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    // =========================================================================
    // Single entity
    // =========================================================================

    /// Encodes `uuid` as `{prefix}{separator}{base64url}`.
    ///
    /// An unregistered entity yields an empty prefix; use
    /// [`try_serialize`](Self::try_serialize) to reject it instead.
    pub fn serialize(&self, entity: Entity, uuid: Uuid) -> String {
        let prefix = match self.prefix_of(entity) {
            Some(prefix) => prefix,
            None => {
                debug!(%entity, "serializing unregistered entity with an empty prefix");
                ""
            }
        };
        self.encode(prefix, uuid.as_bytes())
    }

    /// Like [`serialize`](Self::serialize) but fails for unregistered entities.
    pub fn try_serialize(&self, entity: Entity, uuid: Uuid) -> Result<String, DecodeError> {
        let prefix = self
            .prefix_of(entity)
            .ok_or(DecodeError::UnregisteredEntity { entity })?;
        Ok(self.encode(prefix, uuid.as_bytes()))
    }

    /// Decodes a token, resolving its entity from the prefix.
    pub fn deserialize_with_entity(&self, token: &str) -> Result<(Entity, Uuid), DecodeError> {
        let (entity, payload) = self.decode_payload(token)?;
        let uuid =
            Uuid::from_slice(&payload).map_err(|e| DecodeError::InvalidUuid(e.to_string()))?;
        Ok((entity, uuid))
    }

    /// Decodes a token that must belong to `expected`.
    pub fn deserialize(&self, expected: Entity, token: &str) -> Result<Uuid, DecodeError> {
        let (actual, uuid) = self.deserialize_with_entity(token)?;
        if actual != expected {
            return Err(DecodeError::EntityMismatch { expected, actual });
        }
        Ok(uuid)
    }

    // =========================================================================
    // Composite entities
    // =========================================================================

    /// Packs the component UUIDs of a composite into one token.
    ///
    /// `pairs` must list the composite's components in declared order.
    pub fn serialize_multi(
        &self,
        entity: Entity,
        pairs: &[EntityUuid],
    ) -> Result<String, DecodeError> {
        let components = self.components_for(entity)?;
        check_components(components, pairs.iter().map(|p| p.entity))?;

        let mut buf = Vec::with_capacity(components.len() * UUID_LEN);
        for pair in pairs {
            buf.extend_from_slice(pair.uuid.as_bytes());
        }

        let prefix = self.prefix_of(entity).unwrap_or_default();
        Ok(self.encode(prefix, &buf))
    }

    /// Unpacks a composite token into its component UUIDs.
    ///
    /// `targets` must list the composite's components in declared order;
    /// the result holds one UUID per target, in the same order.
    pub fn deserialize_multi(
        &self,
        entity: Entity,
        token: &str,
        targets: &[Entity],
    ) -> Result<Vec<Uuid>, DecodeError> {
        let (actual, payload) = self.decode_payload(token)?;
        if actual != entity {
            return Err(DecodeError::EntityMismatch {
                expected: entity,
                actual,
            });
        }

        let components = self.components_for(entity)?;
        check_components(components, targets.iter().copied())?;

        let expected_len = components.len() * UUID_LEN;
        if payload.len() != expected_len {
            return Err(DecodeError::InvalidUuid(format!(
                "expected {} payload bytes, got {}",
                expected_len,
                payload.len()
            )));
        }

        payload
            .chunks_exact(UUID_LEN)
            .map(|chunk| {
                Uuid::from_slice(chunk).map_err(|e| DecodeError::InvalidUuid(e.to_string()))
            })
            .collect()
    }

    /// Slot-based form of [`deserialize_multi`](Self::deserialize_multi).
    ///
    /// Slots are written only when the whole token decodes.
    pub fn deserialize_multi_into(
        &self,
        entity: Entity,
        token: &str,
        slots: &mut [EntityUuidSlot<'_>],
    ) -> Result<(), DecodeError> {
        let targets: Vec<Entity> = slots.iter().map(|slot| slot.entity).collect();
        let uuids = self.deserialize_multi(entity, token, &targets)?;

        for (slot, uuid) in slots.iter_mut().zip(uuids) {
            *slot.uuid = uuid;
        }
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn encode(&self, prefix: &str, payload: &[u8]) -> String {
        format!(
            "{}{}{}",
            prefix,
            self.separator,
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    /// Splits a token and resolves its prefix and raw payload bytes.
    fn decode_payload(&self, token: &str) -> Result<(Entity, Vec<u8>), DecodeError> {
        let mut parts = token.split(self.separator.as_char());
        let (Some(prefix), Some(encoded), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DecodeError::InvalidFormat);
        };

        let entity = self
            .entity_of(prefix)
            .ok_or_else(|| DecodeError::UnknownPrefix {
                prefix: prefix.to_string(),
            })?;

        let payload = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| DecodeError::BadBase64(e.to_string()))?;

        Ok((entity, payload))
    }

    fn components_for(&self, entity: Entity) -> Result<&[Entity], DecodeError> {
        self.components_of(entity)
            .ok_or(DecodeError::NotMultiEntity { entity })
    }
}

/// Checks supplied entities against a composite's declared components:
/// count first, then position by position.
fn check_components<I>(components: &[Entity], supplied: I) -> Result<(), DecodeError>
where
    I: ExactSizeIterator<Item = Entity>,
{
    if supplied.len() != components.len() {
        return Err(DecodeError::CountMismatch {
            expected: components.len(),
            actual: supplied.len(),
        });
    }

    for (position, (&expected, actual)) in components.iter().zip(supplied).enumerate() {
        if expected != actual {
            return Err(DecodeError::OrderMismatch {
                position,
                expected,
                actual,
            });
        }
    }
    Ok(())
}
