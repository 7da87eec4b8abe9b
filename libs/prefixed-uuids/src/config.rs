//! Declarative registry configuration.
//!
//! Lets a registry be described in a TOML document (or any serde format)
//! and validated at load time:
//!
//! ```toml
//! separator = "~"
//!
//! [[prefixes]]
//! entity = 1
//! prefix = "user"
//!
//! [[prefixes]]
//! entity = 2
//! prefix = "post"
//!
//! [[multi]]
//! entity = 10
//! prefix = "up"
//! components = [1, 2]
//! ```

use serde::{Deserialize, Serialize};

use crate::{ConfigError, MultiPrefixInfo, PrefixInfo, Registry, Separator};

/// Serializable description of a [`Registry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub separator: Separator,

    #[serde(default)]
    pub prefixes: Vec<PrefixInfo>,

    /// Composites, applied in listed order.
    #[serde(default)]
    pub multi: Vec<MultiPrefixInfo>,
}

impl RegistryConfig {
    /// Parses a configuration from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Builds the registry: plain prefixes, then the separator, then each
    /// composite. The first failure aborts the build.
    pub fn build(self) -> Result<Registry, ConfigError> {
        let mut registry = Registry::new(self.prefixes)?;
        registry.with_separator(self.separator.as_str())?;
        for info in self.multi {
            registry.add_multi_prefix(info)?;
        }
        Ok(registry)
    }
}

impl TryFrom<RegistryConfig> for Registry {
    type Error = ConfigError;

    fn try_from(config: RegistryConfig) -> Result<Self, Self::Error> {
        config.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Entity;

    const DOC: &str = r#"
separator = "~"

[[prefixes]]
entity = 1
prefix = "user"

[[prefixes]]
entity = 2
prefix = "post"

[[multi]]
entity = 10
prefix = "up"
components = [1, 2]
"#;

    #[test]
    fn test_from_toml_and_build() {
        let config = RegistryConfig::from_toml_str(DOC).unwrap();
        assert_eq!(config.separator, Separator::Tilde);
        assert_eq!(config.prefixes.len(), 2);

        let registry = config.build().unwrap();
        assert_eq!(registry.separator(), Separator::Tilde);
        assert_eq!(registry.entity_of("user"), Some(Entity::new(1)));
        assert_eq!(
            registry.components_of(Entity::new(10)),
            Some(&[Entity::new(1), Entity::new(2)][..])
        );
    }

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::from_toml_str("[[prefixes]]\nentity = 1\nprefix = \"user\"\n")
            .unwrap();
        assert_eq!(config.separator, Separator::Dot);
        assert!(config.multi.is_empty());
    }

    #[test]
    fn test_invalid_separator_is_parse_error() {
        let err = RegistryConfig::from_toml_str("separator = \":\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_build_surfaces_validation_errors() {
        let config = RegistryConfig {
            prefixes: vec![PrefixInfo::new(Entity::new(1), "User")],
            ..Default::default()
        };
        assert!(matches!(
            config.build(),
            Err(ConfigError::InvalidPrefix { .. })
        ));

        let config = RegistryConfig {
            prefixes: vec![PrefixInfo::new(Entity::new(1), "user")],
            multi: vec![MultiPrefixInfo::new(
                Entity::new(10),
                "up",
                vec![Entity::new(1), Entity::new(2)],
            )],
            ..Default::default()
        };
        assert_eq!(
            Registry::try_from(config).unwrap_err(),
            ConfigError::ComponentNotRegistered {
                entity: Entity::new(2)
            }
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let config = RegistryConfig::from_toml_str(DOC).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RegistryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
