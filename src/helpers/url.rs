//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/rss.xml") // -> "/cipherflow-visualizer/rss.xml"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog/aes/") // -> "https://example.com/base/blog/aes/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = url_for(config, path);

    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Resolve a root-relative path against the site URL, without `root`
///
/// # Examples
/// ```ignore
/// site_url_for(&config, "/blog/aes/") // -> "https://example.com/blog/aes/"
/// ```
pub fn site_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}/{}", base, path.trim_start_matches('/'))
}

/// Site-relative path of a post page: `/blog/<slug>/`
pub fn post_path(slug: &str) -> String {
    let encoded: Vec<String> = slug
        .split('/')
        .filter(|s| !s.is_empty())
        .map(encode_segment)
        .collect();
    format!("/blog/{}/", encoded.join("/"))
}

/// Percent-encode one URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            root: "/blog-root/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/rss.xml"), "/blog-root/rss.xml");
        assert_eq!(url_for(&config, "about/"), "/blog-root/about/");
        assert_eq!(url_for(&config, ""), "/blog-root/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/about/"),
            "https://example.com/blog-root/about/"
        );

        let config = SiteConfig {
            url: "https://example.com/".to_string(),
            root: "/".to_string(),
            ..Default::default()
        };
        assert_eq!(full_url_for(&config, "/about/"), "https://example.com/about/");
    }

    #[test]
    fn test_site_url_for_skips_root() {
        let config = test_config();
        assert_eq!(
            site_url_for(&config, "/blog/aes/"),
            "https://example.com/blog/aes/"
        );
        assert_eq!(site_url_for(&config, "/"), "https://example.com/");

        let config = SiteConfig {
            url: "https://example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(site_url_for(&config, "rss.xml"), "https://example.com/rss.xml");
    }

    #[test]
    fn test_post_path() {
        assert_eq!(post_path("aes-explained"), "/blog/aes-explained/");
        assert_eq!(post_path("guides/rsa basics"), "/blog/guides/rsa%20basics/");
    }

    #[test]
    fn test_post_path_encodes_unicode() {
        assert_eq!(post_path("café"), "/blog/caf%C3%A9/");
    }
}
