use crate::normalize::{AppRegistry, RegistryError};
use crate::units::DEFAULT_EDITORS;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

pub const DEFAULT_CANONICAL_DOMAIN: &str = "caffeine.xyz";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub canonical_domain: String,
    pub app_registry: Option<PathBuf>,
    pub editable_by: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canonical_domain: DEFAULT_CANONICAL_DOMAIN.to_string(),
            app_registry: None,
            editable_by: DEFAULT_EDITORS.iter().map(|role| role.to_string()).collect(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; bad values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let canonical_domain = match lookup("UNIT_SAFE_CANONICAL_DOMAIN") {
            Some(raw) => {
                let domain = raw.trim().trim_start_matches('.').to_lowercase();
                if is_domain(&domain) {
                    domain
                } else {
                    warn!(
                        target = "unit_safe.config",
                        "ignored malformed UNIT_SAFE_CANONICAL_DOMAIN: {raw}"
                    );
                    defaults.canonical_domain
                }
            }
            None => defaults.canonical_domain,
        };

        let app_registry = lookup("UNIT_SAFE_APP_REGISTRY")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let editable_by = match lookup("UNIT_SAFE_EDITABLE_BY") {
            Some(raw) => {
                let roles: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|role| !role.is_empty())
                    .map(str::to_string)
                    .collect();
                if roles.is_empty() {
                    warn!(
                        target = "unit_safe.config",
                        "UNIT_SAFE_EDITABLE_BY produced no roles; using defaults"
                    );
                    defaults.editable_by
                } else {
                    roles
                }
            }
            None => defaults.editable_by,
        };

        Self {
            canonical_domain,
            app_registry,
            editable_by,
        }
    }

    /// Loads the configured app registry, or an empty one when none is set.
    pub fn load_registry(&self) -> Result<AppRegistry, RegistryError> {
        let Some(path) = &self.app_registry else {
            return Ok(AppRegistry::new(self.canonical_domain.clone(), []));
        };
        let registry = AppRegistry::from_yaml_file(self.canonical_domain.clone(), path)?;
        info!(
            target = "unit_safe.config",
            apps = registry.len(),
            path = %path.display(),
            "loaded app registry"
        );
        Ok(registry)
    }
}

fn is_domain(candidate: &str) -> bool {
    candidate.contains('.')
        && !candidate.ends_with('.')
        && candidate
            .bytes()
            .all(|byte| matches!(byte, b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(settings(&[]), Settings::default());
        assert_eq!(Settings::default().editable_by, vec!["Admin", "Owner"]);
    }

    #[test]
    fn reads_overrides() {
        let loaded = settings(&[
            ("UNIT_SAFE_CANONICAL_DOMAIN", " .Example.ORG "),
            ("UNIT_SAFE_APP_REGISTRY", "apps.yaml"),
            ("UNIT_SAFE_EDITABLE_BY", "Admin, Auditor,,"),
        ]);
        assert_eq!(loaded.canonical_domain, "example.org");
        assert_eq!(loaded.app_registry, Some(PathBuf::from("apps.yaml")));
        assert_eq!(loaded.editable_by, vec!["Admin", "Auditor"]);
    }

    #[test]
    fn malformed_values_fall_back() {
        let loaded = settings(&[
            ("UNIT_SAFE_CANONICAL_DOMAIN", "not a domain"),
            ("UNIT_SAFE_APP_REGISTRY", "  "),
            ("UNIT_SAFE_EDITABLE_BY", " , "),
        ]);
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn empty_registry_without_path() {
        let registry = Settings::default().load_registry().unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.domain(), "caffeine.xyz");
    }
}
