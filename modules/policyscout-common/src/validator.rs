//! Domain validation: blocklists of non-authoritative hosts, related-domain
//! groups, and URL quality scoring. A policy URL must live on the target
//! company's own domain (or a known sibling), never on a directory, social
//! profile, or archive.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::domain::root_domain_of;
use crate::normalize_host;

/// Hosts that can never be the authoritative home of a company policy:
/// social networks, business directories, news aggregators, search engines,
/// archives, URL shorteners, and hosting platforms.
const BLOCKED_DOMAINS: &[&str] = &[
    // Social networks and profiles
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "youtube.com",
    "tiktok.com",
    "pinterest.com",
    "reddit.com",
    "snapchat.com",
    "threads.net",
    "mastodon.social",
    "bsky.app",
    "tumblr.com",
    "vk.com",
    "weibo.com",
    "xing.com",
    "flickr.com",
    "vimeo.com",
    "dailymotion.com",
    "twitch.tv",
    "discord.com",
    "discord.gg",
    "telegram.org",
    "t.me",
    "whatsapp.com",
    "messenger.com",
    // Business directories and review sites
    "yelp.com",
    "yellowpages.com",
    "bbb.org",
    "glassdoor.com",
    "indeed.com",
    "crunchbase.com",
    "pitchbook.com",
    "zoominfo.com",
    "dnb.com",
    "opencorporates.com",
    "companieshouse.gov.uk",
    "northdata.de",
    "unternehmensregister.de",
    "firmenwissen.de",
    "kununu.com",
    "trustpilot.com",
    "g2.com",
    "capterra.com",
    "clutch.co",
    "goodfirms.co",
    "manta.com",
    "foursquare.com",
    "tripadvisor.com",
    "booking.com",
    "angel.co",
    "wellfound.com",
    "owler.com",
    "craft.co",
    "similarweb.com",
    "semrush.com",
    "alexa.com",
    "builtwith.com",
    // Encyclopedias and knowledge bases
    "wikipedia.org",
    "wikimedia.org",
    "wikidata.org",
    "britannica.com",
    "fandom.com",
    "wiktionary.org",
    // News and aggregators
    "news.ycombinator.com",
    "medium.com",
    "substack.com",
    "forbes.com",
    "bloomberg.com",
    "reuters.com",
    "techcrunch.com",
    "theverge.com",
    "wired.com",
    "cnet.com",
    "zdnet.com",
    "businessinsider.com",
    "huffpost.com",
    "buzzfeed.com",
    "prnewswire.com",
    "businesswire.com",
    "globenewswire.com",
    "presseportal.de",
    // Search engines
    "google.com",
    "google.de",
    "google.co.uk",
    "google.fr",
    "bing.com",
    "duckduckgo.com",
    "yahoo.com",
    "yandex.com",
    "yandex.ru",
    "baidu.com",
    "ecosia.org",
    "startpage.com",
    "qwant.com",
    "ask.com",
    "aol.com",
    // Archives and caches
    "archive.org",
    "web.archive.org",
    "archive.today",
    "archive.ph",
    "cachedview.com",
    "webcache.googleusercontent.com",
    // URL shorteners
    "bit.ly",
    "tinyurl.com",
    "goo.gl",
    "ow.ly",
    "buff.ly",
    "is.gd",
    "rebrand.ly",
    "cutt.ly",
    "shorturl.at",
    "rb.gy",
    // Hosting, blogging, and site builders
    "wordpress.com",
    "blogspot.com",
    "wix.com",
    "wixsite.com",
    "squarespace.com",
    "weebly.com",
    "jimdo.com",
    "webflow.io",
    "github.io",
    "gitlab.io",
    "pages.dev",
    "netlify.app",
    "vercel.app",
    "herokuapp.com",
    "appspot.com",
    "azurewebsites.net",
    "cloudfront.net",
    "amazonaws.com",
    "godaddysites.com",
    "site123.me",
    "strikingly.com",
    "carrd.co",
    "notion.site",
    "sites.google.com",
    // App stores and marketplaces
    "play.google.com",
    "apps.apple.com",
    "chrome.google.com",
    "amazon.com",
    "ebay.com",
    "etsy.com",
    "aliexpress.com",
    "alibaba.com",
    // Q&A and forums
    "quora.com",
    "stackexchange.com",
    "stackoverflow.com",
    "answers.com",
];

/// URL shapes that mark a non-authoritative page even on an unblocked host.
static BLOCKED_URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Social profile paths
        r"(?i)facebook\.com/[^/]+/?$",
        r"(?i)linkedin\.com/(company|in|pub)/",
        r"(?i)twitter\.com/[^/]+/?$",
        r"(?i)x\.com/[^/]+/?$",
        r"(?i)instagram\.com/[^/]+/?$",
        r"(?i)youtube\.com/(channel|user|c)/",
        // Search result pages
        r"(?i)[?&]q=",
        r"(?i)/search\?",
        r"(?i)/results\?",
        // Company-profile subpaths on directories
        r"(?i)/company/[^/]+/?$",
        r"(?i)/profile/[^/]+/?$",
        r"(?i)/directory/",
        // Archive snapshots
        r"(?i)web\.archive\.org/web/",
        r"(?i)archive\.(today|ph)/",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid blocklist pattern"))
    .collect()
});

/// Corporate families: a policy hosted on a sibling domain is acceptable.
const RELATED_DOMAINS: &[(&str, &[&str])] = &[
    (
        "meta.com",
        &[
            "facebook.com",
            "instagram.com",
            "whatsapp.com",
            "threads.net",
            "oculus.com",
        ],
    ),
    (
        "google.com",
        &["youtube.com", "android.com", "policies.google.com", "withgoogle.com"],
    ),
    (
        "microsoft.com",
        &["live.com", "office.com", "xbox.com", "linkedin.com", "github.com"],
    ),
    (
        "amazon.com",
        &["aws.amazon.com", "audible.com", "twitch.tv", "zappos.com"],
    ),
    ("apple.com", &["icloud.com", "itunes.com", "beats.com"]),
    ("valvesoftware.com", &["steampowered.com", "steamcommunity.com"]),
    ("x.com", &["twitter.com"]),
    ("netflix.com", &["help.netflix.com"]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct DomainMatch {
    pub is_valid: bool,
    pub reason: Option<String>,
    /// 100 exact, 95 root-domain, 90 related-domain, 0 invalid.
    pub confidence: u8,
}

/// True when the host (exact, www-normalized, or any parent suffix) is on
/// the blocklist.
pub fn is_blocked_domain(host: &str) -> bool {
    let h = normalize_host(host);
    BLOCKED_DOMAINS
        .iter()
        .any(|b| h == *b || h.ends_with(&format!(".{b}")))
}

/// True when the URL's host is blocked, the URL matches a blocked pattern,
/// or the URL does not parse at all.
pub fn is_blocked_url(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return true,
    };
    let host = match parsed.host_str() {
        Some(h) => h,
        None => return true,
    };
    let path = parsed.path().to_lowercase();
    if is_blocked_domain(host) {
        // A blocked host can still serve ITS OWN policies; only pages under
        // a policy-looking path escape the blocklist.
        let policy_path = ["privacy", "legal", "terms", "policies", "datenschutz"]
            .iter()
            .any(|seg| path.contains(seg));
        if !policy_path {
            return true;
        }
    }
    // Wikipedia articles are never authoritative, except the wiki's own
    // Privacy_policy / Terms_of_use meta pages.
    if normalize_host(host).ends_with("wikipedia.org") && path.starts_with("/wiki/") {
        let article = &path["/wiki/".len()..];
        if article != "privacy_policy" && article != "terms_of_use" {
            return true;
        }
    }
    BLOCKED_URL_PATTERNS.iter().any(|re| re.is_match(url))
}

/// Check that `url` belongs to `target_domain` or a known sibling.
pub fn validate_url_for_domain(url: &str, target_domain: &str) -> DomainMatch {
    let invalid = |reason: &str| DomainMatch {
        is_valid: false,
        reason: Some(reason.to_string()),
        confidence: 0,
    };

    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return invalid("URL does not parse"),
    };
    let host = match parsed.host_str() {
        Some(h) => normalize_host(h),
        None => return invalid("URL has no host"),
    };
    let target = normalize_host(target_domain);

    if host == target {
        return DomainMatch {
            is_valid: true,
            reason: None,
            confidence: 100,
        };
    }

    let host_root = root_domain_of(&host);
    let target_root = root_domain_of(&target);
    if host_root == target_root {
        return DomainMatch {
            is_valid: true,
            reason: None,
            confidence: 95,
        };
    }

    if are_related(&host_root, &target_root) {
        return DomainMatch {
            is_valid: true,
            reason: Some(format!("{host_root} is a sibling of {target_root}")),
            confidence: 90,
        };
    }

    invalid("URL host is unrelated to the target domain")
}

fn are_related(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    for (head, family) in RELATED_DOMAINS {
        let in_group = |d: &str| d == *head || family.iter().any(|f| d == *f || f.ends_with(d));
        if in_group(a) && in_group(b) {
            return true;
        }
    }
    false
}

/// Heuristic quality score for a (domain, url) pair. Base 50, adjusted by
/// TLD trust and URL shape.
pub fn domain_quality_score(domain: &str, url: &str) -> i32 {
    let mut score: i32 = 50;
    let d = normalize_host(domain);

    if d.ends_with(".gov") || d.ends_with(".gov.uk") {
        score += 20;
    } else if d.ends_with(".bank") || d.ends_with(".insurance") {
        score += 15;
    } else if d.ends_with(".com") || d.ends_with(".de") || d.ends_with(".co.uk") || d.ends_with(".org") {
        score += 10;
    } else if d.ends_with(".info") || d.ends_with(".biz") || d.ends_with(".xyz") {
        score -= 10;
    }

    let lower = url.to_lowercase();
    if lower.contains("/privacy") || lower.contains("/datenschutz") || lower.contains("/legal") {
        score += 15;
    }
    if lower.contains("/profile/") {
        score -= 30;
    }
    if lower.contains("/directory/") || lower.contains("/listings/") {
        score -= 40;
    }

    score.clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn social_profiles_are_blocked() {
        assert!(is_blocked_domain("linkedin.com"));
        assert!(is_blocked_domain("www.linkedin.com"));
        assert!(is_blocked_domain("de.linkedin.com"));
        assert!(is_blocked_url("https://www.linkedin.com/company/acme-corp"));
        assert!(!is_blocked_domain("acme-corp.com"));
    }

    #[test]
    fn blocked_host_own_policy_page_passes() {
        // A blocked host's own privacy page is a legitimate answer when the
        // blocked host IS the target.
        assert!(!is_blocked_url("https://www.linkedin.com/legal/privacy-policy"));
        assert!(is_blocked_url("https://www.linkedin.com/in/somebody"));
    }

    #[test]
    fn unparseable_urls_are_blocked() {
        assert!(is_blocked_url("not a url at all"));
        assert!(is_blocked_url("mailto:x@example.com"));
    }

    #[test]
    fn wikipedia_meta_pages_escape_the_article_rule() {
        assert!(is_blocked_url("https://en.wikipedia.org/wiki/Netflix"));
        assert!(!is_blocked_url("https://en.wikipedia.org/wiki/Privacy_policy"));
    }

    #[test]
    fn exact_root_and_related_matches() {
        let exact = validate_url_for_domain("https://vercel.com/legal/privacy-policy", "vercel.com");
        assert!(exact.is_valid);
        assert_eq!(exact.confidence, 100);

        let sub = validate_url_for_domain("https://help.netflix.com/legal/privacy", "netflix.com");
        assert!(sub.is_valid);
        assert_eq!(sub.confidence, 95);

        let related = validate_url_for_domain("https://www.facebook.com/privacy/policy/", "meta.com");
        assert!(related.is_valid);
        assert_eq!(related.confidence, 90);

        let wrong = validate_url_for_domain("https://evil.com/privacy", "vercel.com");
        assert!(!wrong.is_valid);
        assert_eq!(wrong.confidence, 0);
    }

    #[test]
    fn quality_score_rewards_trust_and_penalizes_directories() {
        let bank = domain_quality_score("example.bank", "https://example.bank/privacy");
        let directory = domain_quality_score("example.xyz", "https://example.xyz/directory/acme");
        assert!(bank > directory);
        assert!((0..=100).contains(&bank));
        assert!((0..=100).contains(&directory));
    }
}
