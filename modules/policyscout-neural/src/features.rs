//! Deterministic 24-feature extraction for link candidates. Every feature
//! is scaled into [0,1]; the order is fixed and must stay in sync with the
//! network's input layer.

use std::sync::LazyLock;

use regex::Regex;

use policyscout_common::multilingual::{
    is_privacy_link_text, is_privacy_url, privacy_term_hits, score_link_text,
};
use policyscout_common::{host_of, LinkContext};

use crate::network::INPUT_SIZE;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("valid year pattern"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email pattern")
});

const TERMS_WORDS: &[&str] = &["terms", "tos", "agb", "conditions", "user agreement"];
const COOKIE_WORDS: &[&str] = &["cookie", "cookies"];
const LEGAL_WORDS: &[&str] = &["legal", "rechtliches", "impressum", "imprint", "mentions"];
const JARGON_WORDS: &[&str] = &[
    "pursuant",
    "hereby",
    "liability",
    "controller",
    "processor",
    "gdpr",
    "lawful basis",
    "legitimate interest",
    "data subject",
    "retention",
];
const ICON_HINTS: &[&str] = &["lock", "shield", "🔒", "🛡"];

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn ratio(value: f64, scale: f64) -> f64 {
    (value / scale).clamp(0.0, 1.0)
}

/// Extract the fixed 24-feature vector for a candidate link.
///
/// Body-derived features (16–20) are zero when no page body is supplied,
/// which is the common case during link scoring.
pub fn extract_features(
    link_text: &str,
    href: &str,
    context: LinkContext,
    base_url: &str,
    body: Option<&str>,
) -> [f64; INPUT_SIZE] {
    let text = link_text.to_lowercase();
    let url = href.to_lowercase();

    let path_depth = url::Url::parse(href)
        .map(|u| u.path().split('/').filter(|s| !s.is_empty()).count())
        .unwrap_or_else(|_| href.matches('/').count());

    let (body_density, structure, jargon, word_ratio, has_contact) = match body {
        Some(b) => {
            let lower = b.to_lowercase();
            let words = lower.split_whitespace().count().max(1);
            let (hits, _) = privacy_term_hits(&lower);
            let density = ratio(hits as f64 * 10.0, words as f64);
            let sections = lower.matches("section").count()
                + lower.matches("article").count()
                + (1..=9).filter(|n| lower.contains(&format!("{n}."))).count();
            let structure = ratio(sections as f64, 10.0);
            let jargon_count = JARGON_WORDS.iter().filter(|j| lower.contains(*j)).count();
            let jargon = ratio(jargon_count as f64, JARGON_WORDS.len() as f64);
            let word_ratio = ratio(words as f64, 5000.0);
            let contact = EMAIL_RE.is_match(&lower) || lower.contains("contact");
            (density, structure, jargon, word_ratio, contact)
        }
        None => (0.0, 0.0, 0.0, 0.0, false),
    };

    let base_host = host_of(base_url);
    let link_host = host_of(href);
    let is_external = !link_host.is_empty() && !base_host.is_empty() && link_host != base_host;

    [
        // 1–4: keyword families in the anchor text
        flag(is_privacy_link_text(&text)),
        flag(contains_any(&text, TERMS_WORDS)),
        flag(contains_any(&text, COOKIE_WORDS)),
        flag(contains_any(&text, LEGAL_WORDS)),
        // 5: graded text-match strength
        score_link_text(&text) as f64 / 100.0,
        // 6–8: URL path families
        flag(is_privacy_url(&url)),
        flag(contains_any(&url, &["/terms", "/tos", "/agb", "conditions"])),
        flag(contains_any(&url, &["/legal", "/policies", "/policy"])),
        // 9–11: URL shape
        ratio(path_depth as f64, 6.0),
        ratio(href.len() as f64, 120.0),
        flag(url.starts_with("https://")),
        // 12–15: context one-hot
        flag(context == LinkContext::Footer),
        flag(context == LinkContext::Nav),
        flag(context == LinkContext::LegalHub),
        flag(context == LinkContext::Body),
        // 16–20: body-derived signals (zero without a body)
        body_density,
        structure,
        jargon,
        word_ratio,
        flag(has_contact),
        // 21–24: anchor shape
        ratio(link_text.chars().count() as f64, 50.0),
        flag(contains_any(&text, ICON_HINTS)),
        flag(is_external),
        flag(YEAR_RE.is_match(&text)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_features_are_in_unit_interval() {
        let features = extract_features(
            "Privacy Policy © 2024",
            "https://example.com/legal/privacy-policy",
            LinkContext::Footer,
            "https://example.com",
            Some("This privacy policy describes personal data processing. Section 1. Contact us at privacy@example.com."),
        );
        assert_eq!(features.len(), 24);
        for (i, f) in features.iter().enumerate() {
            assert!((0.0..=1.0).contains(f), "feature {} = {}", i + 1, f);
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        let args = (
            "Datenschutzerklärung",
            "https://example.de/datenschutz",
            LinkContext::Footer,
            "https://example.de",
        );
        let a = extract_features(args.0, args.1, args.2, args.3, None);
        let b = extract_features(args.0, args.1, args.2, args.3, None);
        assert_eq!(a, b);
    }

    #[test]
    fn privacy_link_lights_the_expected_flags() {
        let f = extract_features(
            "Privacy Policy",
            "https://example.com/privacy-policy",
            LinkContext::Footer,
            "https://example.com",
            None,
        );
        assert_eq!(f[0], 1.0); // privacy keyword
        assert_eq!(f[5], 1.0); // privacy URL path
        assert_eq!(f[10], 1.0); // https
        assert_eq!(f[11], 1.0); // footer context
        assert_eq!(f[14], 0.0); // not body context
        assert_eq!(f[22], 0.0); // not external
    }

    #[test]
    fn unrelated_link_scores_dark() {
        let f = extract_features(
            "Careers",
            "http://other.com/jobs",
            LinkContext::Nav,
            "https://example.com",
            None,
        );
        assert_eq!(f[0], 0.0);
        assert_eq!(f[5], 0.0);
        assert_eq!(f[10], 0.0); // http, not https
        assert_eq!(f[22], 1.0); // external host
    }

    #[test]
    fn year_in_text_detected() {
        let with = extract_features("© 2023 Privacy", "/p", LinkContext::Unknown, "", None);
        let without = extract_features("Privacy", "/p", LinkContext::Unknown, "", None);
        assert_eq!(with[23], 1.0);
        assert_eq!(without[23], 0.0);
    }

    #[test]
    fn body_features_zero_without_body() {
        let f = extract_features("Privacy", "https://e.com/privacy", LinkContext::Body, "https://e.com", None);
        for i in 15..=19 {
            assert_eq!(f[i], 0.0, "feature {} should be 0 without a body", i + 1);
        }
    }
}
