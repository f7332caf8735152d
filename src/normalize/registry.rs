use super::canonical::normalize_canonical_url;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, warn};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppEntry {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read app registry {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid app registry: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlResolution {
    pub original: String,
    pub resolved: String,
    pub is_valid: bool,
    pub was_resolved: bool,
}

/// Known apps and their canonical URLs, all under one domain.
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    domain: String,
    entries: Vec<AppEntry>,
    by_name: HashMap<String, usize>,
}

impl AppRegistry {
    /// Later entries win when two names collide.
    pub fn new(domain: impl Into<String>, entries: impl IntoIterator<Item = AppEntry>) -> Self {
        let entries: Vec<AppEntry> = entries.into_iter().collect();
        let by_name = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (name_key(&entry.name), idx))
            .collect();
        Self {
            domain: domain.into(),
            entries,
            by_name,
        }
    }

    pub fn from_yaml_str(domain: impl Into<String>, yaml: &str) -> Result<Self, RegistryError> {
        let entries: Vec<AppEntry> = serde_yaml::from_str(yaml)?;
        Ok(Self::new(domain, entries))
    }

    pub fn from_yaml_file(domain: impl Into<String>, path: &Path) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(domain, &raw)
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn app_names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn is_valid_app_name(&self, name: &str) -> bool {
        self.by_name.contains_key(&name_key(name))
    }

    /// Normalized URL registered for `name`, matched case-insensitively.
    pub fn canonical_url(&self, name: &str) -> Option<String> {
        let idx = self.by_name.get(&name_key(name))?;
        Some(normalize_canonical_url(&self.entries[*idx].url))
    }

    /// One canonical URL per distinct name.
    pub fn all_canonical_urls(&self) -> Vec<String> {
        let mut indices: Vec<usize> = self.by_name.values().copied().collect();
        indices.sort_unstable();
        indices
            .into_iter()
            .map(|idx| normalize_canonical_url(&self.entries[idx].url))
            .collect()
    }

    /// Canonical URL for `name`, but only if it passes [`validate_url`].
    pub fn resolve_top_app_url(&self, name: &str) -> Option<String> {
        self.canonical_url(name)
            .filter(|url| validate_url(url, &self.domain))
    }

    /// Returns the normalized URL when it is valid, otherwise the best registry
    /// match: by app name first, then by subdomain. An empty string means the
    /// URL could not be resolved and should be dropped.
    pub fn validate_and_resolve(&self, url: &str, app_name: Option<&str>) -> String {
        let sanitized = normalize_canonical_url(url);
        if validate_url(&sanitized, &self.domain) {
            return sanitized;
        }
        warn!(
            target = "unit_safe.normalize",
            url = url,
            "invalid app URL, attempting canonical resolution"
        );

        if let Some(canonical) = app_name.and_then(|name| self.canonical_url(name)) {
            warn!(target = "unit_safe.normalize", resolved = %canonical, "resolved by app name");
            return canonical;
        }

        if let Some(subdomain) = extract_subdomain(&sanitized)
            && let Some(entry) = self
                .entries
                .iter()
                .find(|entry| extract_subdomain(&entry.url).as_deref() == Some(subdomain.as_str()))
        {
            let resolved = normalize_canonical_url(&entry.url);
            warn!(target = "unit_safe.normalize", resolved = %resolved, "resolved by subdomain");
            return resolved;
        }

        error!(
            target = "unit_safe.normalize",
            url = url,
            "could not resolve canonical URL, dropping it"
        );
        String::new()
    }

    /// Resolves each `(url, app_name)` pair and drops the ones that cannot be
    /// resolved.
    pub fn batch_validate<'a, I>(&self, items: I) -> Vec<UrlResolution>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        items
            .into_iter()
            .map(|(url, app_name)| {
                let sanitized = normalize_canonical_url(url);
                let is_valid = validate_url(&sanitized, &self.domain);
                let resolved = if is_valid {
                    sanitized
                } else {
                    self.validate_and_resolve(url, app_name)
                };
                UrlResolution {
                    original: url.to_string(),
                    was_resolved: !is_valid && !resolved.is_empty() && resolved != url,
                    resolved,
                    is_valid,
                }
            })
            .filter(|resolution| !resolution.resolved.is_empty())
            .collect()
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// True when the normalized URL is a single `https://` URL on `domain`.
pub fn validate_url(url: &str, domain: &str) -> bool {
    if url.trim().is_empty() {
        return false;
    }
    let sanitized = normalize_canonical_url(url);
    let suffix = format!(".{}", domain.trim_start_matches('.'));
    sanitized.starts_with("https://")
        && sanitized.matches(suffix.as_str()).count() == 1
        && !sanitized.contains(' ')
        && !sanitized.contains("%20")
        && sanitized.matches("https://").count() == 1
}

/// Raw first host label, only for hosts with at least three labels.
pub fn extract_subdomain(url: &str) -> Option<String> {
    let sanitized = normalize_canonical_url(url);
    let parsed = Url::parse(&sanitized).ok()?;
    let labels: Vec<&str> = parsed.host_str()?.split('.').collect();
    (labels.len() >= 3).then(|| labels[0].to_string())
}

/// Normalized URLs in first-seen order, without duplicates or empties.
pub fn deduplicate_urls<I>(urls: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .map(|url| normalize_canonical_url(url.as_ref()))
        .filter(|url| !url.is_empty() && seen.insert(url.clone()))
        .collect()
}

/// Keeps the first item for each normalized URL.
pub fn deduplicate_by_url<T, F>(items: impl IntoIterator<Item = T>, url_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let url = normalize_canonical_url(url_of(item));
            !url.is_empty() && seen.insert(url)
        })
        .collect()
}
