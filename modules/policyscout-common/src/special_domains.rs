//! Hard-coded policy URLs for hosts whose sites actively resist crawling
//! (aggressive bot defenses, login walls, or heavy client-side rendering).
//! A special-domain hit bypasses discovery entirely.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::normalize_host;
use crate::types::PolicyType;

/// Hosts that reject browser user agents but serve Googlebot. DirectFetch
/// switches UA for these.
pub const GOOGLEBOT_HOSTS: &[&str] = &[
    "facebook.com",
    "instagram.com",
    "whatsapp.com",
    "threads.net",
    "meta.com",
    "oculus.com",
];

pub fn uses_googlebot(host: &str) -> bool {
    let h = normalize_host(host);
    GOOGLEBOT_HOSTS.iter().any(|g| h == *g || h.ends_with(&format!(".{g}")))
}

type PolicyMap = HashMap<&'static str, Vec<(PolicyType, &'static str)>>;

static SPECIAL_DOMAINS: LazyLock<PolicyMap> = LazyLock::new(|| {
    use PolicyType::*;
    let entries: Vec<(&str, Vec<(PolicyType, &str)>)> = vec![
        (
            "netflix.com",
            vec![
                (Privacy, "https://help.netflix.com/legal/privacy"),
                (Terms, "https://help.netflix.com/legal/termsofuse"),
            ],
        ),
        (
            "facebook.com",
            vec![
                (Privacy, "https://www.facebook.com/privacy/policy/"),
                (Terms, "https://www.facebook.com/legal/terms"),
                (Cookies, "https://www.facebook.com/privacy/policies/cookies/"),
            ],
        ),
        (
            "instagram.com",
            vec![
                (Privacy, "https://privacycenter.instagram.com/policy"),
                (Terms, "https://help.instagram.com/581066165581870"),
            ],
        ),
        (
            "whatsapp.com",
            vec![
                (Privacy, "https://www.whatsapp.com/legal/privacy-policy"),
                (Terms, "https://www.whatsapp.com/legal/terms-of-service"),
            ],
        ),
        (
            "meta.com",
            vec![
                (Privacy, "https://www.meta.com/legal/privacy-policy/"),
                (Terms, "https://www.meta.com/legal/terms-of-service/"),
            ],
        ),
        (
            "threads.net",
            vec![(Privacy, "https://help.instagram.com/515230437301944")],
        ),
        (
            "steampowered.com",
            vec![
                (Privacy, "https://store.steampowered.com/privacy_agreement/"),
                (Terms, "https://store.steampowered.com/subscriber_agreement/"),
            ],
        ),
        (
            "spotify.com",
            vec![
                (Privacy, "https://www.spotify.com/legal/privacy-policy/"),
                (Terms, "https://www.spotify.com/legal/end-user-agreement/"),
            ],
        ),
        (
            "x.com",
            vec![
                (Privacy, "https://x.com/en/privacy"),
                (Terms, "https://x.com/en/tos"),
            ],
        ),
        (
            "twitter.com",
            vec![
                (Privacy, "https://x.com/en/privacy"),
                (Terms, "https://x.com/en/tos"),
            ],
        ),
        (
            "tiktok.com",
            vec![
                (Privacy, "https://www.tiktok.com/legal/page/row/privacy-policy/en"),
                (Terms, "https://www.tiktok.com/legal/page/row/terms-of-service/en"),
            ],
        ),
        (
            "linkedin.com",
            vec![
                (Privacy, "https://www.linkedin.com/legal/privacy-policy"),
                (Terms, "https://www.linkedin.com/legal/user-agreement"),
            ],
        ),
        (
            "reddit.com",
            vec![
                (Privacy, "https://www.reddit.com/policies/privacy-policy"),
                (Terms, "https://www.redditinc.com/policies/user-agreement"),
            ],
        ),
        (
            "amazon.com",
            vec![
                (Privacy, "https://www.amazon.com/gp/help/customer/display.html?nodeId=468496"),
                (Terms, "https://www.amazon.com/gp/help/customer/display.html?nodeId=508088"),
            ],
        ),
        (
            "google.com",
            vec![
                (Privacy, "https://policies.google.com/privacy"),
                (Terms, "https://policies.google.com/terms"),
            ],
        ),
        (
            "youtube.com",
            vec![
                (Privacy, "https://policies.google.com/privacy"),
                (Terms, "https://www.youtube.com/t/terms"),
            ],
        ),
        (
            "microsoft.com",
            vec![
                (Privacy, "https://privacy.microsoft.com/en-us/privacystatement"),
                (Terms, "https://www.microsoft.com/en-us/servicesagreement"),
            ],
        ),
        (
            "apple.com",
            vec![
                (Privacy, "https://www.apple.com/legal/privacy/"),
                (Terms, "https://www.apple.com/legal/internet-services/terms/site.html"),
            ],
        ),
        (
            "snapchat.com",
            vec![
                (Privacy, "https://values.snap.com/privacy/privacy-policy"),
                (Terms, "https://snap.com/en-US/terms"),
            ],
        ),
        (
            "pinterest.com",
            vec![
                (Privacy, "https://policy.pinterest.com/en/privacy-policy"),
                (Terms, "https://policy.pinterest.com/en/terms-of-service"),
            ],
        ),
        (
            "discord.com",
            vec![
                (Privacy, "https://discord.com/privacy"),
                (Terms, "https://discord.com/terms"),
            ],
        ),
        (
            "twitch.tv",
            vec![
                (Privacy, "https://www.twitch.tv/p/legal/privacy-notice/"),
                (Terms, "https://www.twitch.tv/p/legal/terms-of-service/"),
            ],
        ),
        (
            "paypal.com",
            vec![
                (Privacy, "https://www.paypal.com/us/legalhub/privacy-full"),
                (Terms, "https://www.paypal.com/us/legalhub/useragreement-full"),
            ],
        ),
        (
            "roblox.com",
            vec![
                (Privacy, "https://en.help.roblox.com/hc/en-us/articles/115004630823"),
                (Terms, "https://en.help.roblox.com/hc/en-us/articles/115004647846"),
            ],
        ),
        (
            "zoom.us",
            vec![
                (Privacy, "https://explore.zoom.us/en/privacy/"),
                (Terms, "https://explore.zoom.us/en/terms/"),
            ],
        ),
        (
            "berenberg.de",
            vec![(Privacy, "https://www.berenberg.de/datenschutz/datenschutzerklaerung/")],
        ),
        (
            "deutsche-bank.de",
            vec![(Privacy, "https://www.deutsche-bank.de/pk/datenschutz.html")],
        ),
        (
            "commerzbank.de",
            vec![(Privacy, "https://www.commerzbank.de/datenschutz/")],
        ),
        (
            "sparkasse.de",
            vec![(Privacy, "https://www.sparkasse.de/datenschutzhinweise.html")],
        ),
        (
            "ing.de",
            vec![(Privacy, "https://www.ing.de/datenschutz/")],
        ),
    ];
    entries.into_iter().collect()
});

/// Look up hard-coded policy URLs for a host. Tries the raw host, the
/// www-stripped host, and the registrable domain.
pub fn special_domain_policies(host: &str) -> Option<&'static [(PolicyType, &'static str)]> {
    let norm = normalize_host(host);
    if let Some(v) = SPECIAL_DOMAINS.get(norm.as_str()) {
        return Some(v.as_slice());
    }
    let root = crate::domain::root_domain_of(&norm);
    SPECIAL_DOMAINS.get(root.as_str()).map(|v| v.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn netflix_has_privacy_and_terms() {
        let policies = special_domain_policies("netflix.com").unwrap();
        let privacy = policies
            .iter()
            .find(|(t, _)| *t == PolicyType::Privacy)
            .unwrap();
        assert_eq!(privacy.1, "https://help.netflix.com/legal/privacy");
        let terms = policies
            .iter()
            .find(|(t, _)| *t == PolicyType::Terms)
            .unwrap();
        assert_eq!(terms.1, "https://help.netflix.com/legal/termsofuse");
    }

    #[test]
    fn www_prefix_and_subdomains_resolve() {
        assert!(special_domain_policies("www.netflix.com").is_some());
        assert!(special_domain_policies("store.steampowered.com").is_some());
        assert!(special_domain_policies("unknown-company.com").is_none());
    }

    #[test]
    fn googlebot_allow_list_covers_meta_family() {
        assert!(uses_googlebot("facebook.com"));
        assert!(uses_googlebot("www.instagram.com"));
        assert!(uses_googlebot("m.facebook.com"));
        assert!(!uses_googlebot("netflix.com"));
    }

    #[test]
    fn all_special_urls_are_absolute_https() {
        for policies in [
            special_domain_policies("facebook.com").unwrap(),
            special_domain_policies("spotify.com").unwrap(),
            special_domain_policies("berenberg.de").unwrap(),
        ] {
            for (_, url) in policies {
                assert!(url.starts_with("https://"), "{url}");
            }
        }
    }
}
