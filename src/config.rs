use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::LazyLock;

use regex::Regex;

/// Application-level constants
pub const APP_NAME: &str = "RaktSetu";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Explicit override for the matching service base URL.
pub const API_BASE_URL_ENV: &str = "RAKTSETU_API_BASE_URL";

/// Name of the landing page `<meta>` tag that carries the base URL.
pub const API_BASE_URL_META: &str = "api-base-url";

/// Matching service address used while developing locally.
pub const LOCAL_DEV_API_URL: &str = "http://localhost:8000";

/// Where the UI adapter listens.
pub const DEFAULT_UI_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8080));

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "raktsetu=info,raktsetu_lib=info,tower_http=warn"
}

// ═══════════════════════════════════════════════════════════
// API base URL resolution
// ═══════════════════════════════════════════════════════════

/// Everything that can contribute to the API base URL, in precedence order.
#[derive(Debug, Clone, Default)]
pub struct BaseUrlSources {
    /// Operator-supplied override (environment).
    pub explicit: Option<String>,
    /// `content` of the landing page `api-base-url` meta tag.
    pub page_meta: Option<String>,
    /// Host name the page is served from.
    pub page_host: Option<String>,
    /// Origin the page is served from (`scheme://host:port`).
    pub page_origin: Option<String>,
}

impl BaseUrlSources {
    /// Collect the sources for a page served at `ui_addr` with the given HTML.
    pub fn gather(ui_addr: SocketAddr, page_html: &str) -> Self {
        Self {
            explicit: std::env::var(API_BASE_URL_ENV).ok(),
            page_meta: page_meta_base_url(page_html),
            page_host: Some(ui_addr.ip().to_string()),
            page_origin: Some(format!("http://{ui_addr}")),
        }
    }
}

/// Resolve the matching service base URL.
///
/// Precedence: explicit override, page metadata, the local development
/// server when the page itself is on localhost, then same-origin.
pub fn resolve_api_base_url(sources: &BaseUrlSources) -> String {
    let non_blank = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let resolved = if let Some(explicit) = non_blank(&sources.explicit) {
        explicit
    } else if let Some(meta) = non_blank(&sources.page_meta) {
        meta
    } else if matches!(
        sources.page_host.as_deref(),
        Some("localhost") | Some("127.0.0.1")
    ) {
        LOCAL_DEV_API_URL.to_string()
    } else if let Some(origin) = non_blank(&sources.page_origin) {
        origin
    } else {
        LOCAL_DEV_API_URL.to_string()
    };

    resolved.trim_end_matches('/').to_string()
}

/// Extract the `api-base-url` meta content from a landing page.
///
/// Attribute order inside the tag does not matter. Returns `None` when the
/// tag is missing or its content is blank.
pub fn page_meta_base_url(html: &str) -> Option<String> {
    static META_TAG: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").unwrap());
    static ATTRIBUTE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"(?is)([a-z][a-z0-9_-]*)\s*=\s*"([^"]*)""#).unwrap());

    META_TAG.find_iter(html).find_map(|tag| {
        let mut name = None;
        let mut content = None;
        for caps in ATTRIBUTE.captures_iter(tag.as_str()) {
            match caps[1].to_ascii_lowercase().as_str() {
                "name" => name = Some(caps[2].trim().to_string()),
                "content" => content = Some(caps[2].trim().to_string()),
                _ => {}
            }
        }
        match (name.as_deref(), content) {
            (Some(API_BASE_URL_META), Some(content)) if !content.is_empty() => Some(content),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> BaseUrlSources {
        BaseUrlSources {
            explicit: None,
            page_meta: None,
            page_host: Some("raktsetu.example.org".into()),
            page_origin: Some("https://raktsetu.example.org".into()),
        }
    }

    #[test]
    fn explicit_override_wins() {
        let s = BaseUrlSources {
            explicit: Some("  https://api.example.org/ ".into()),
            page_meta: Some("https://meta.example.org".into()),
            ..sources()
        };
        assert_eq!(resolve_api_base_url(&s), "https://api.example.org");
    }

    #[test]
    fn meta_used_when_no_override() {
        let s = BaseUrlSources {
            explicit: Some("   ".into()),
            page_meta: Some("https://meta.example.org".into()),
            ..sources()
        };
        assert_eq!(resolve_api_base_url(&s), "https://meta.example.org");
    }

    #[test]
    fn localhost_page_uses_dev_server() {
        let s = BaseUrlSources {
            page_host: Some("127.0.0.1".into()),
            page_origin: Some("http://127.0.0.1:8080".into()),
            ..sources()
        };
        assert_eq!(resolve_api_base_url(&s), LOCAL_DEV_API_URL);

        let s = BaseUrlSources {
            page_host: Some("localhost".into()),
            ..sources()
        };
        assert_eq!(resolve_api_base_url(&s), LOCAL_DEV_API_URL);
    }

    #[test]
    fn falls_back_to_same_origin() {
        assert_eq!(
            resolve_api_base_url(&sources()),
            "https://raktsetu.example.org"
        );
    }

    #[test]
    fn nothing_known_uses_dev_server() {
        assert_eq!(
            resolve_api_base_url(&BaseUrlSources::default()),
            LOCAL_DEV_API_URL
        );
    }

    #[test]
    fn meta_content_parsed_in_any_attribute_order() {
        let html = r#"<head><meta charset="utf-8">
            <meta content=" https://api.raktsetu.in " name="api-base-url"></head>"#;
        assert_eq!(
            page_meta_base_url(html).as_deref(),
            Some("https://api.raktsetu.in")
        );

        let html = r#"<META NAME="api-base-url" CONTENT="https://b.example">"#;
        assert_eq!(page_meta_base_url(html).as_deref(), Some("https://b.example"));
    }

    #[test]
    fn blank_or_missing_meta_is_none() {
        assert_eq!(page_meta_base_url(r#"<meta name="api-base-url" content="">"#), None);
        assert_eq!(page_meta_base_url(r#"<meta name="viewport" content="x">"#), None);
        assert_eq!(page_meta_base_url("<html></html>"), None);
    }

    #[test]
    fn app_name_is_raktsetu() {
        assert_eq!(APP_NAME, "RaktSetu");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }
}
