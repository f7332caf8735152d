use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

// Leading scheme, repeated or with a wrong number of slashes (`https:////`).
static PROTOCOL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:https?:/*)+").expect("protocol prefix pattern"));

/// Reduces a subdomain, host or URL to a bare lowercase label made of
/// `[a-z0-9-]`. Returns an empty string when nothing usable is left.
pub fn normalize_subdomain(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let without_scheme = PROTOCOL_PREFIX.replace(trimmed, "");
    let without_slashes = without_scheme.replace('/', "");
    let label = without_slashes.split('.').next().unwrap_or_default();
    label
        .to_lowercase()
        .chars()
        .filter(|ch| matches!(ch, 'a'..='z' | '0'..='9' | '-'))
        .collect()
}

pub fn is_valid_subdomain(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .bytes()
            .all(|byte| matches!(byte, b'a'..=b'z' | b'0'..=b'9' | b'-'))
}

/// Subdomain label of a URL. Hosts with three or more labels give their first
/// label; shorter hosts are normalized whole.
pub fn extract_subdomain_from_url(url: &str) -> String {
    let host = Url::parse(url.trim())
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string));
    match host {
        Some(host) => {
            let labels: Vec<&str> = host.split('.').collect();
            if labels.len() >= 3 {
                normalize_subdomain(labels[0])
            } else {
                normalize_subdomain(&host)
            }
        }
        // Unparseable input: strip the scheme by hand and keep everything up to the first dot.
        None => normalize_subdomain(url),
    }
}

pub fn batch_normalize_subdomains<I>(raw: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    raw.into_iter()
        .map(|item| normalize_subdomain(item.as_ref()))
        .filter(|normalized| !normalized.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_malformed_protocol_and_domain() {
        assert_eq!(
            normalize_subdomain("https:////Infytask-MIA.caffeine.xyz/"),
            "infytask-mia"
        );
        assert_eq!(normalize_subdomain("http://http://Map-56B.caffeine.xyz"), "map-56b");
        assert_eq!(normalize_subdomain("  Sitemap_Hub!  "), "sitemaphub");
        assert_eq!(normalize_subdomain("/trends/"), "trends");
    }

    #[test]
    fn empty_or_unusable_input_gives_empty() {
        assert_eq!(normalize_subdomain(""), "");
        assert_eq!(normalize_subdomain("   "), "");
        assert_eq!(normalize_subdomain("https://"), "");
        assert_eq!(normalize_subdomain(".caffeine.xyz"), "");
    }

    #[test]
    fn validity() {
        assert!(is_valid_subdomain("infytask-mia"));
        assert!(is_valid_subdomain("42"));
        assert!(!is_valid_subdomain(""));
        assert!(!is_valid_subdomain("Infytask"));
        assert!(!is_valid_subdomain("a.b"));
    }

    #[test]
    fn extracts_first_label_of_long_hosts() {
        assert_eq!(
            extract_subdomain_from_url("https://Geo-Map-W9S.caffeine.xyz/page"),
            "geo-map-w9s"
        );
        assert_eq!(extract_subdomain_from_url("https://example.com/"), "example");
        assert_eq!(
            extract_subdomain_from_url("networth-htm.caffeine.xyz"),
            "networth-htm"
        );
    }

    #[test]
    fn batch_drops_empty_results() {
        assert_eq!(
            batch_normalize_subdomains(["", "Valid-1", "https://"]),
            vec!["valid-1"]
        );
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in "\\PC{0,40}") {
            let once = normalize_subdomain(&raw);
            prop_assert_eq!(normalize_subdomain(&once), once.clone());
            prop_assert!(once.is_empty() || is_valid_subdomain(&once));
        }

        #[test]
        fn url_shaped_input_is_idempotent(raw in "(https?:/{0,4})?[A-Za-z0-9._-]{0,20}/?") {
            let once = normalize_subdomain(&raw);
            prop_assert_eq!(normalize_subdomain(&once), once);
        }
    }
}
