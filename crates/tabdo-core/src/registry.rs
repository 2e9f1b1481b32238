//! List registry
//!
//! The fixed set of selectable lists, each bound to a document id in the
//! remote store. Built once per session, usually from [`Config`].

use crate::config::{Config, ListConfig};
use crate::error::RegistryError;

/// Name-to-store-id mapping for the selectable lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRegistry {
    /// Entries in tab order
    entries: Vec<ListConfig>,
    /// Index of the list selected at session start
    default: usize,
}

impl ListRegistry {
    /// Build a registry from `entries`
    ///
    /// `default` names the list selected at session start; the first entry
    /// is used when it is `None`.
    pub fn new(entries: Vec<ListConfig>, default: Option<&str>) -> Result<Self, RegistryError> {
        if entries.is_empty() {
            return Err(RegistryError::Empty);
        }

        for (i, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(RegistryError::BlankName);
            }
            if entry.store_id.trim().is_empty() {
                return Err(RegistryError::BlankStoreId {
                    name: entry.name.clone(),
                });
            }
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(RegistryError::DuplicateName(entry.name.clone()));
            }
        }

        let default = match default {
            Some(name) => entries
                .iter()
                .position(|e| e.name == name)
                .ok_or_else(|| RegistryError::UnknownDefault(name.to_string()))?,
            None => 0,
        };

        Ok(Self { entries, default })
    }

    /// Build the registry described by `config`
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        Self::new(config.lists.clone(), config.default_list.as_deref())
    }

    /// Store id for the list called `name`
    pub fn store_id(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.store_id.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store_id(name).is_some()
    }

    /// List names in tab order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn entries(&self) -> &[ListConfig] {
        &self.entries
    }

    /// Name of the list selected at session start
    pub fn default_list(&self) -> &str {
        &self.entries[self.default].name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<ListConfig> {
        vec![
            ListConfig::new("home", "111"),
            ListConfig::new("work", "222"),
        ]
    }

    #[test]
    fn test_lookup() {
        let registry = ListRegistry::new(entries(), None).unwrap();
        assert_eq!(registry.store_id("work"), Some("222"));
        assert_eq!(registry.store_id("garden"), None);
        assert!(registry.contains("home"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["home", "work"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_default_list() {
        let registry = ListRegistry::new(entries(), None).unwrap();
        assert_eq!(registry.default_list(), "home");

        let registry = ListRegistry::new(entries(), Some("work")).unwrap();
        assert_eq!(registry.default_list(), "work");
    }

    #[test]
    fn test_unknown_default() {
        let err = ListRegistry::new(entries(), Some("garden")).unwrap_err();
        assert_eq!(err, RegistryError::UnknownDefault("garden".to_string()));
    }

    #[test]
    fn test_rejects_bad_entries() {
        assert_eq!(ListRegistry::new(vec![], None), Err(RegistryError::Empty));
        assert_eq!(
            ListRegistry::new(vec![ListConfig::new(" ", "1")], None),
            Err(RegistryError::BlankName)
        );
        assert_eq!(
            ListRegistry::new(vec![ListConfig::new("home", "")], None),
            Err(RegistryError::BlankStoreId {
                name: "home".to_string()
            })
        );
        assert_eq!(
            ListRegistry::new(
                vec![ListConfig::new("home", "1"), ListConfig::new("home", "2")],
                None
            ),
            Err(RegistryError::DuplicateName("home".to_string()))
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.lists = entries();
        config.default_list = Some("work".to_string());

        let registry = ListRegistry::from_config(&config).unwrap();
        assert_eq!(registry.default_list(), "work");
        assert_eq!(registry.entries(), entries().as_slice());
    }
}
