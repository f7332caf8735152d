pub mod canonical;
pub mod registry;
pub mod subdomain;

use serde_json::Value;

pub use canonical::{batch_normalize_canonical_urls, normalize_canonical_url};
pub use registry::{
    AppEntry, AppRegistry, RegistryError, UrlResolution, deduplicate_by_url, deduplicate_urls,
    extract_subdomain, validate_url,
};
pub use subdomain::{
    batch_normalize_subdomains, extract_subdomain_from_url, is_valid_subdomain,
    normalize_subdomain,
};

/// Batch subdomain normalization over untyped JSON. Anything other than an
/// array yields nothing; non-string entries are skipped.
pub fn batch_normalize_subdomains_json(raw: &Value) -> Vec<String> {
    batch_normalize_subdomains(json_strings(raw))
}

/// Same as [`batch_normalize_subdomains_json`] for canonical URLs.
pub fn batch_normalize_canonical_urls_json(raw: &Value) -> Vec<String> {
    batch_normalize_canonical_urls(json_strings(raw))
}

fn json_strings(raw: &Value) -> impl Iterator<Item = &str> {
    raw.as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_batch_skips_non_strings() {
        assert_eq!(
            batch_normalize_subdomains_json(&json!(["", "Valid-1", null])),
            vec!["valid-1"]
        );
        assert_eq!(
            batch_normalize_canonical_urls_json(&json!(["Example.com", 42, {"url": "x"}])),
            vec!["https://example.com/"]
        );
    }

    #[test]
    fn json_batch_tolerates_non_arrays() {
        assert!(batch_normalize_subdomains_json(&json!("valid-1")).is_empty());
        assert!(batch_normalize_canonical_urls_json(&json!(null)).is_empty());
        assert!(batch_normalize_subdomains_json(&json!({"a": "b"})).is_empty());
    }
}
