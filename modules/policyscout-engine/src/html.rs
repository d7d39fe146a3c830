//! Synchronous HTML helpers shared by the homepage scraper and the deep
//! scanner. Parsing happens in pure functions returning owned data so the
//! non-`Send` DOM never crosses an await point.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use policyscout_common::LinkContext;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title pattern"));

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style|noscript)[^>]*>.*?</(script|style|noscript)>").expect("valid script pattern"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid ws pattern"));

/// Path fragments that mark login/registration pages; never policy answers.
const AUTH_FRAGMENTS: &[&str] = &[
    "/login",
    "/log-in",
    "/signin",
    "/sign-in",
    "/signup",
    "/sign-up",
    "/register",
    "/auth/",
    "/sso/",
    "/oauth",
    "/account/login",
];

#[derive(Debug, Clone)]
pub struct PageLink {
    /// Absolute http(s) URL, resolved against the page base.
    pub url: String,
    /// Anchor text combined with `title` and `aria-label` attributes.
    pub text: String,
    pub context: LinkContext,
}

/// True when a URL looks like an authentication page.
pub fn is_auth_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    AUTH_FRAGMENTS.iter().any(|f| lower.contains(f))
}

/// Extract the `<title>` content, whitespace-collapsed.
pub fn extract_title(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| WS_RE.replace_all(m.as_str().trim(), " ").into_owned())
        .filter(|t| !t.is_empty())
}

/// Strip scripts, styles, and tags; collapse whitespace. Good enough for
/// keyword counting — not a rendering.
pub fn html_to_text(html: &str) -> String {
    let stripped = SCRIPT_RE.replace_all(html, " ");
    let stripped = TAG_RE.replace_all(&stripped, " ");
    WS_RE.replace_all(&stripped, " ").trim().to_string()
}

fn anchor_text(el: &ElementRef) -> String {
    let mut text: String = el.text().collect::<Vec<_>>().join(" ");
    for attr in ["title", "aria-label"] {
        if let Some(v) = el.value().attr(attr) {
            text.push(' ');
            text.push_str(v);
        }
    }
    WS_RE.replace_all(text.trim(), " ").into_owned()
}

fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }
    let resolved = base.join(href).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }
    Some(resolved.to_string())
}

fn collect_anchors(
    scope: &ElementRef,
    anchor_sel: &Selector,
    base: &Url,
    context: LinkContext,
    out: &mut HashMap<String, PageLink>,
) {
    for a in scope.select(anchor_sel) {
        let href = match a.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        let url = match resolve_href(base, href) {
            Some(u) => u,
            None => continue,
        };
        // First (highest-priority) context wins on duplicates.
        out.entry(url.clone()).or_insert_with(|| PageLink {
            url,
            text: anchor_text(&a),
            context,
        });
    }
}

/// Harvest links from a page in decreasing priority of the given section
/// selector groups; fall back to every anchor (as `Body` context) when
/// fewer than 3 links were found.
fn harvest(html: &str, base_url: &str, groups: &[(&str, LinkContext)]) -> Vec<PageLink> {
    let base = match Url::parse(base_url) {
        Ok(u) => u,
        Err(_) => return Vec::new(),
    };
    let document = Html::parse_document(html);
    let anchor_sel = Selector::parse("a[href]").expect("valid anchor selector");

    let mut found: HashMap<String, PageLink> = HashMap::new();
    for (selectors, context) in groups {
        let sel = match Selector::parse(selectors) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for scope in document.select(&sel) {
            collect_anchors(&scope, &anchor_sel, &base, *context, &mut found);
        }
    }

    if found.len() < 3 {
        let body_sel = Selector::parse("body").expect("valid body selector");
        if let Some(body) = document.select(&body_sel).next() {
            collect_anchors(&body, &anchor_sel, &base, LinkContext::Body, &mut found);
        }
    }

    found.into_values().collect()
}

/// Homepage harvest order: footer sections, legal sections, navigation.
pub fn extract_footer_links(html: &str, base_url: &str) -> Vec<PageLink> {
    harvest(
        html,
        base_url,
        &[
            ("footer, [class*='footer'], [id*='footer']", LinkContext::Footer),
            ("[class*='legal'], [id*='legal']", LinkContext::LegalHub),
            ("nav, [role='navigation']", LinkContext::Nav),
        ],
    )
}

/// Deep-scan harvest order: main content, then nav/sidebars.
pub fn extract_content_links(html: &str, base_url: &str) -> Vec<PageLink> {
    harvest(
        html,
        base_url,
        &[
            (
                "main, article, [class*='content'], [id*='content'], [class*='main'], [id*='main']",
                LinkContext::Body,
            ),
            ("nav, aside, [class*='sidebar'], [role='navigation']", LinkContext::Nav),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <html><head><title>  Acme —
            Home  </title></head>
        <body>
            <nav><a href="/products">Products</a></nav>
            <main><p>Welcome to Acme.</p></main>
            <footer>
                <a href="/legal/privacy-policy" title="Privacy">Privacy Policy</a>
                <a href="/legal/terms">Terms</a>
                <a href="mailto:hi@acme.com">Mail us</a>
                <a href="#top">Back to top</a>
            </footer>
        </body></html>
    "##;

    #[test]
    fn footer_links_extracted_with_context() {
        let links = extract_footer_links(PAGE, "https://acme.com");
        let privacy = links
            .iter()
            .find(|l| l.url == "https://acme.com/legal/privacy-policy")
            .expect("privacy link");
        assert_eq!(privacy.context, LinkContext::Footer);
        assert!(privacy.text.contains("Privacy Policy"));
        // title attribute is folded into the text
        assert!(privacy.text.contains("Privacy"));
        // mailto and fragment links are dropped
        assert!(!links.iter().any(|l| l.url.contains("mailto")));
    }

    #[test]
    fn nav_context_assigned() {
        let links = extract_footer_links(PAGE, "https://acme.com");
        let products = links
            .iter()
            .find(|l| l.url == "https://acme.com/products")
            .unwrap();
        assert_eq!(products.context, LinkContext::Nav);
    }

    #[test]
    fn sparse_pages_fall_back_to_body() {
        let html = r#"<html><body>
            <p><a href="/privacy">Privacy</a></p>
        </body></html>"#;
        let links = extract_footer_links(html, "https://acme.com");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].context, LinkContext::Body);
    }

    #[test]
    fn footer_wins_over_body_fallback_for_same_url() {
        let html = r#"<html><body>
            <footer><a href="/privacy">Privacy</a></footer>
        </body></html>"#;
        let links = extract_footer_links(html, "https://acme.com");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].context, LinkContext::Footer);
    }

    #[test]
    fn title_and_text_helpers() {
        assert_eq!(extract_title(PAGE).as_deref(), Some("Acme — Home"));
        assert_eq!(extract_title("<html><body>no title</body></html>"), None);

        let text = html_to_text("<p>Hello <b>world</b></p><script>var x = 1;</script>");
        assert_eq!(text, "Hello world");
    }

    #[test]
    fn auth_urls_detected() {
        assert!(is_auth_url("https://acme.com/login?next=/privacy"));
        assert!(is_auth_url("https://acme.com/account/login"));
        assert!(is_auth_url("https://sso.acme.com/sso/start"));
        assert!(!is_auth_url("https://acme.com/legal/privacy"));
    }

    #[test]
    fn invalid_base_yields_nothing() {
        assert!(extract_footer_links(PAGE, "not a url").is_empty());
    }
}
