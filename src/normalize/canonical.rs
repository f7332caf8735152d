use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static LEADING_PROTOCOLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:https?:/+)+").expect("leading protocols pattern"));

// Junk before the scheme, e.g. "Evolved-Ai App.https://".
static PROTOCOL_ARTIFACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[^h]*https?://").expect("protocol artifact pattern"));

static EMBEDDED_PROTOCOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([^:])https?://").expect("embedded protocol pattern"));

static DUPLICATE_SLASHES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^:]/)/+").expect("duplicate slashes pattern"));

/// Rewrites a pasted URL into `https://host/...` form: one `https://`
/// scheme, lowercase host, trailing slash on root URLs.
///
/// Input that still does not parse comes back lowercased as a whole.
pub fn normalize_canonical_url(raw: &str) -> String {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return String::new();
    }

    let mut cleaned = LEADING_PROTOCOLS.replace(&compact, "https://").into_owned();
    cleaned = PROTOCOL_ARTIFACT.replace(&cleaned, "https://").into_owned();
    cleaned = EMBEDDED_PROTOCOL.replace_all(&cleaned, "${1}").into_owned();

    if !cleaned.starts_with("https://") && !cleaned.starts_with("http://") {
        cleaned.insert_str(0, "https://");
    }
    if let Some(rest) = cleaned.strip_prefix("http://") {
        cleaned = format!("https://{rest}");
    }
    cleaned = DUPLICATE_SLASHES.replace_all(&cleaned, "${1}").into_owned();

    match Url::parse(&cleaned) {
        Ok(parsed) => {
            // Root URLs lose query and fragment.
            if matches!(parsed.path(), "" | "/")
                && let Some(host) = parsed.host_str()
            {
                let port = parsed.port().map(|port| format!(":{port}")).unwrap_or_default();
                cleaned = format!("{}://{host}{port}/", parsed.scheme());
            }
            Url::parse(&cleaned)
                .map(|parsed| parsed.to_string())
                .unwrap_or_else(|_| cleaned.to_lowercase())
        }
        Err(_) => {
            let path_started = cleaned.get(8..).is_some_and(|rest| rest.contains('/'));
            if !cleaned.ends_with('/') && !path_started {
                cleaned.push('/');
            }
            cleaned.to_lowercase()
        }
    }
}

pub fn batch_normalize_canonical_urls<I>(raw: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    raw.into_iter()
        .map(|item| normalize_canonical_url(item.as_ref()))
        .filter(|normalized| !normalized.is_empty())
        .collect()
}
