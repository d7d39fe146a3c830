//! Body-content validation: decides whether a fetched page actually is a
//! policy document. Pure string analysis — a fast rejection pass, then
//! multi-signal scoring over keyword, bigram, topic, and indicator
//! catalogs.

use std::sync::LazyLock;

use regex::Regex;

use policyscout_common::config::REQUIRED_KEYWORDS;
use policyscout_common::multilingual::{privacy_term_hits, LANGUAGE_TERMS};

/// Keywords empirically common in real policy documents.
const HIGH_CONFIDENCE_KEYWORDS: &[&str] = &[
    "personal data",
    "personal information",
    "data controller",
    "data processor",
    "data protection officer",
    "processing of personal data",
    "lawful basis",
    "legitimate interest",
    "legitimate interests",
    "data subject",
    "data subjects",
    "right to access",
    "right to erasure",
    "right to rectification",
    "right to object",
    "right to restrict",
    "data portability",
    "supervisory authority",
    "retention period",
    "data retention",
    "third-party service providers",
    "third party service providers",
    "service providers",
    "categories of data",
    "categories of recipients",
    "international transfers",
    "standard contractual clauses",
    "adequacy decision",
    "privacy shield",
    "cookies and similar technologies",
    "tracking technologies",
    "opt out",
    "opt-out",
    "do not sell",
    "consent",
    "withdraw your consent",
    "gdpr",
    "ccpa",
    "california consumer privacy act",
    "general data protection regulation",
    "personenbezogene daten",
    "rechtsgrundlage",
];

/// Two-word collocations that rarely appear outside policy text.
const HIGH_CONFIDENCE_BIGRAMS: &[&str] = &[
    "personal data",
    "personal information",
    "data protection",
    "data controller",
    "data processor",
    "legitimate interest",
    "lawful basis",
    "data subject",
    "processing activities",
    "retention period",
    "third parties",
    "service providers",
    "legal obligation",
    "contractual necessity",
    "supervisory authority",
    "browsing data",
    "usage data",
    "device information",
    "ip address",
    "cookie policy",
    "privacy rights",
    "data transfers",
    "security measures",
    "marketing communications",
    "account information",
];

/// Topics a complete policy covers, per language. English is always
/// checked; the detected language's topics are added on top.
const TOPICS: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "information we collect",
            "how we collect",
            "how we use",
            "how we share",
            "data retention",
            "your rights",
            "security",
            "cookies",
            "children",
            "international transfer",
            "third part",
            "contact us",
            "changes to this",
            "legal basis",
            "marketing",
        ],
    ),
    (
        "de",
        &[
            "erhebung",
            "verarbeitung",
            "weitergabe",
            "speicherdauer",
            "ihre rechte",
            "betroffenenrechte",
            "sicherheit",
            "cookies",
            "kinder",
            "drittländer",
            "drittlaender",
            "dritte",
            "kontakt",
            "änderungen",
            "rechtsgrundlage",
        ],
    ),
    (
        "fr",
        &[
            "collecte",
            "utilisation",
            "partage",
            "conservation",
            "vos droits",
            "sécurité",
            "cookies",
            "mineurs",
            "transfert",
            "tiers",
            "contact",
            "modifications",
            "base légale",
        ],
    ),
    (
        "es",
        &[
            "recopilación",
            "recopilacion",
            "uso de",
            "compartir",
            "conservación",
            "sus derechos",
            "seguridad",
            "cookies",
            "menores",
            "transferencia",
            "terceros",
            "contacto",
            "cambios",
            "base legal",
        ],
    ),
    (
        "it",
        &[
            "raccolta",
            "utilizzo",
            "condivisione",
            "conservazione",
            "i tuoi diritti",
            "sicurezza",
            "cookie",
            "minori",
            "trasferimento",
            "terze parti",
            "contatt",
            "modifiche",
            "base giuridica",
        ],
    ),
    (
        "pt",
        &[
            "coleta",
            "recolha",
            "uso de",
            "compartilhamento",
            "retenção",
            "seus direitos",
            "segurança",
            "cookies",
            "menores",
            "transferência",
            "terceiros",
            "contato",
            "alterações",
            "base legal",
        ],
    ),
    (
        "nl",
        &[
            "verzamelen",
            "gebruik van",
            "delen",
            "bewaartermijn",
            "uw rechten",
            "beveiliging",
            "cookies",
            "kinderen",
            "doorgifte",
            "derden",
            "contact",
            "wijzigingen",
            "grondslag",
        ],
    ),
    (
        "pl",
        &[
            "zbieranie",
            "wykorzystanie",
            "udostępnianie",
            "przechowywanie",
            "twoje prawa",
            "bezpieczeństwo",
            "cookies",
            "dzieci",
            "przekazywanie",
            "podmioty trzecie",
            "kontakt",
            "zmiany",
            "podstawa prawna",
        ],
    ),
    (
        "sv",
        &[
            "insamling",
            "användning",
            "delning",
            "lagring",
            "dina rättigheter",
            "säkerhet",
            "cookies",
            "barn",
            "överföring",
            "tredje part",
            "kontakt",
            "ändringar",
            "rättslig grund",
        ],
    ),
    (
        "da",
        &[
            "indsamling",
            "anvendelse",
            "deling",
            "opbevaring",
            "dine rettigheder",
            "sikkerhed",
            "cookies",
            "børn",
            "overførsel",
            "tredjepart",
            "kontakt",
            "ændringer",
            "retsgrundlag",
        ],
    ),
    (
        "tr",
        &[
            "toplama",
            "kullanım",
            "paylaşım",
            "saklama",
            "haklarınız",
            "güvenlik",
            "çerezler",
            "çocuklar",
            "aktarım",
            "üçüncü taraf",
            "iletişim",
            "değişiklikler",
            "hukuki dayanak",
        ],
    ),
    (
        "ru",
        &[
            "сбор",
            "использование",
            "передача",
            "хранение",
            "ваши права",
            "безопасность",
            "файлы cookie",
            "дети",
            "трансграничная",
            "третьи лица",
            "контакт",
            "изменения",
            "правовое основание",
        ],
    ),
    (
        "ja",
        &[
            "収集",
            "利用目的",
            "第三者提供",
            "保存期間",
            "お客様の権利",
            "安全管理",
            "クッキー",
            "未成年",
            "国外移転",
            "お問い合わせ",
            "変更",
            "法的根拠",
        ],
    ),
    (
        "zh",
        &[
            "收集",
            "使用",
            "共享",
            "保留",
            "您的权利",
            "安全",
            "儿童",
            "跨境传输",
            "第三方",
            "联系我们",
            "变更",
            "法律依据",
        ],
    ),
];

/// Markers of living policy text: dates, article references, rights language.
static POSITIVE_INDICATORS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)last (updated|revised|modified)",
        r"(?i)effective (date|as of)",
        r"(?i)zuletzt (aktualisiert|geändert)",
        r"(?i)stand:\s*\d",
        r"(?i)art(icle|\.)\s*\d+\s*(gdpr|dsgvo)",
        r"(?i)art\.\s*(6|13|15|17)",
        r"(?i)§\s*\d+",
        r"(?i)data protection officer",
        r"(?i)datenschutzbeauftragte",
        r"(?i)right to (access|erasure|rectification|object|portability)",
        r"(?i)recht auf (auskunft|löschung|berichtigung)",
        r"(?i)supervisory authority",
        r"(?i)aufsichtsbehörde",
        r"(?i)do not sell( or share)? my personal information",
        r"(?i)opt[ -]?out",
        r"(?i)withdraw (your )?consent",
        r"(?i)retention period",
        r"(?i)speicherdauer",
        r"(?i)standard contractual clauses",
        r"(?i)legitimate interest",
        r"(?i)berechtigtes interesse",
        r"(?i)lawful basis",
        r"(?i)rechtsgrundlage",
        r"(?i)cookie (policy|settings|preferences)",
        r"(?i)privacy@|datenschutz@|dpo@",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid positive pattern"))
    .collect()
});

/// Markers of profile pages, articles, and directory listings.
static NEGATIVE_INDICATORS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\d+\s*min read",
        r"(?i)published \d+ (minutes|hours|days) ago",
        r"(?i)posted (on|by)",
        r"(?i)written by",
        r"(?i)share this (article|post)",
        r"(?i)related (articles|posts|stories)",
        r"(?i)leave a comment",
        r"(?i)\d+ comments",
        r"(?i)followers on linkedin",
        r"(?i)\d+\s*(followers|connections)",
        r"(?i)view .{0,40}(profile|company page)",
        r"(?i)company size",
        r"(?i)headquarters",
        r"(?i)founded in \d{4}",
        r"(?i)add to (cart|basket)",
        r"(?i)free shipping",
        r"(?i)apply now",
        r"(?i)job (openings|listings)",
        r"(?i)subscribe to (our|the) newsletter",
        r"(?i)trending (now|stories)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid negative pattern"))
    .collect()
});

static PUBLISHED_AGO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)published \d+ (minutes|hours|days) ago").expect("valid pattern")
});

static MIN_READ_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s*min read").expect("valid pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickReject {
    TooShort,
    ProfileOrArticleMarkers,
    NoPrivacyVocabulary,
}

impl std::fmt::Display for QuickReject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuickReject::TooShort => write!(f, "body under 200 characters"),
            QuickReject::ProfileOrArticleMarkers => {
                write!(f, "profile/article/directory markers present")
            }
            QuickReject::NoPrivacyVocabulary => write!(f, "no privacy vocabulary at all"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// 0–100.
    pub confidence: u8,
    pub chars: usize,
    pub words: usize,
    pub multilingual_hits: usize,
    pub unique_terms: usize,
    pub keyword_count: usize,
    pub bigram_count: usize,
    pub topic_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub detected_language: &'static str,
}

/// Cheap early rejection before any scoring.
pub fn quick_reject(body: &str) -> Option<QuickReject> {
    if body.len() < 200 {
        return Some(QuickReject::TooShort);
    }
    let lower = body.to_lowercase();

    let profile_markers = lower.contains("followers on linkedin")
        || lower.contains("view the profile")
        || MIN_READ_RE.is_match(&lower)
        || PUBLISHED_AGO_RE.is_match(&lower)
        || (lower.contains("company size")
            && lower.contains("industry")
            && lower.contains("headquarters"));
    if profile_markers {
        return Some(QuickReject::ProfileOrArticleMarkers);
    }

    // Vocabulary gate: the multilingual superset, with the configured
    // required-keyword set as the fallback net.
    let (hits, _) = privacy_term_hits(&lower);
    if hits == 0 && !REQUIRED_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Some(QuickReject::NoPrivacyVocabulary);
    }
    None
}

/// Whether a failed validation warrants trying the next-ranked candidates.
pub fn should_deep_search(body: &str) -> bool {
    body.len() > 500 && quick_reject(body).is_none()
}

/// Pick the language with the most body hits. English wins ties, so shared
/// loanwords ("privacy", "cookies") don't flip an English document.
fn detect_language(lower: &str) -> &'static str {
    let hits_for = |terms: &[&str]| -> usize {
        terms.iter().map(|t| lower.matches(t).count()).sum()
    };
    let en_hits = LANGUAGE_TERMS
        .iter()
        .find(|(code, _)| *code == "en")
        .map(|(_, terms)| hits_for(terms))
        .unwrap_or(0);

    let mut best = ("en", en_hits);
    for (code, terms) in LANGUAGE_TERMS {
        if *code == "en" {
            continue;
        }
        let hits = hits_for(terms);
        if hits > best.1 {
            best = (code, hits);
        }
    }
    best.0
}

/// Full scoring pass over a page body.
pub fn validate(body: &str) -> ValidationReport {
    let lower = body.to_lowercase();
    let chars = body.len();
    let words = lower.split_whitespace().count();

    let (multilingual_hits, unique) = privacy_term_hits(&lower);

    let keyword_count = HIGH_CONFIDENCE_KEYWORDS
        .iter()
        .filter(|k| lower.contains(*k))
        .count();
    let bigram_count = HIGH_CONFIDENCE_BIGRAMS
        .iter()
        .filter(|b| lower.contains(*b))
        .count();

    let detected_language = detect_language(&lower);
    let mut topic_count = 0usize;
    for (code, topics) in TOPICS {
        if *code == "en" || *code == detected_language {
            topic_count += topics.iter().filter(|t| lower.contains(*t)).count();
        }
    }

    let positive_count = POSITIVE_INDICATORS.iter().filter(|re| re.is_match(&lower)).count();
    let negative_count = NEGATIVE_INDICATORS.iter().filter(|re| re.is_match(&lower)).count();

    let mut confidence: i32 = 40;
    if chars >= 2000 {
        confidence += 10;
    }
    if chars >= 5000 {
        confidence += 10;
    }
    if chars >= 10_000 {
        confidence += 5;
    }
    if chars < 500 {
        confidence -= 30;
    }
    if multilingual_hits >= 10 {
        confidence += 10;
    }
    if multilingual_hits >= 20 {
        confidence += 5;
    }
    confidence += (2 * keyword_count as i32 + 5 * bigram_count as i32).min(30);
    if topic_count >= 5 {
        confidence += 10;
    }
    if topic_count >= 10 {
        confidence += 10;
    }
    confidence += 3 * positive_count as i32 - 5 * negative_count as i32;
    let confidence = confidence.clamp(0, 100) as u8;

    let is_valid = chars >= 500
        && (multilingual_hits >= 3 || keyword_count >= 5)
        && (topic_count >= 2 || bigram_count >= 3)
        && negative_count <= positive_count + 2
        && confidence >= 40;

    ValidationReport {
        is_valid,
        confidence,
        chars,
        words,
        multilingual_hits,
        unique_terms: unique.len(),
        keyword_count,
        bigram_count,
        topic_count,
        positive_count,
        negative_count,
        detected_language,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy_body() -> String {
        let mut body = String::from(
            "Privacy Policy. Last updated: January 2025.\n\
             This privacy policy explains what personal data we collect and \
             how we use your personal information. We are the data controller \
             responsible for the processing of personal data described here.\n\
             Information we collect: account information, usage data, device \
             information, and your IP address.\n\
             How we use your data: we rely on a lawful basis such as consent \
             or legitimate interest for each processing activity.\n\
             How we share: we share personal data with service providers and \
             other third parties under data protection agreements.\n\
             Data retention: we keep personal data for the retention period \
             required by law.\n\
             Your rights: you have the right to access, the right to erasure, \
             and the right to rectification. You may contact our data \
             protection officer or lodge a complaint with a supervisory \
             authority. You can withdraw your consent and opt out of \
             marketing communications at any time.\n\
             Security: we apply appropriate security measures.\n\
             Cookies: see our cookie policy for cookie settings.\n\
             Children: our services are not directed at children.\n\
             International transfer: transfers rely on standard contractual \
             clauses.\n\
             Changes to this policy: we will post any changes here.\n\
             Contact us at privacy@example.com.\n",
        );
        // Pad to a realistic document length.
        while body.len() < 5200 {
            body.push_str(
                "We process personal data only as described in this privacy \
                 policy and consistent with data protection law. ",
            );
        }
        body
    }

    #[test]
    fn real_policy_validates_with_high_confidence() {
        let report = validate(&policy_body());
        assert!(report.is_valid, "report: {report:?}");
        assert!(report.confidence >= 80, "confidence {}", report.confidence);
        assert!(report.keyword_count >= 10);
        assert!(report.bigram_count >= 5);
        assert!(report.topic_count >= 5);
        assert_eq!(report.detected_language, "en");
    }

    #[test]
    fn quick_reject_short_bodies() {
        assert_eq!(quick_reject("too short"), Some(QuickReject::TooShort));
    }

    #[test]
    fn quick_reject_article_markers() {
        let article = format!(
            "{} 5 min read. Published 3 hours ago. Share this article.",
            "An interesting take on privacy in the modern age. ".repeat(10)
        );
        assert_eq!(
            quick_reject(&article),
            Some(QuickReject::ProfileOrArticleMarkers)
        );
    }

    #[test]
    fn quick_reject_directory_listing() {
        let listing = format!(
            "{} Company size: 200-500. Industry: Software. Headquarters: Berlin.",
            "Acme GmbH is a leading provider of widgets. ".repeat(10)
        );
        assert_eq!(
            quick_reject(&listing),
            Some(QuickReject::ProfileOrArticleMarkers)
        );
    }

    #[test]
    fn quick_reject_without_vocabulary() {
        let body = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        assert_eq!(quick_reject(&body), Some(QuickReject::NoPrivacyVocabulary));
    }

    #[test]
    fn marketing_page_is_invalid() {
        let body = format!(
            "{} Our products respect your privacy. Add to cart today! \
             Free shipping on all orders. Subscribe to our newsletter.",
            "Buy the best widgets from Acme. ".repeat(40)
        );
        let report = validate(&body);
        assert!(!report.is_valid);
    }

    #[test]
    fn german_policy_detects_language_and_validates() {
        let mut body = String::from(
            "Datenschutzerklärung. Stand: Januar 2025.\n\
             Verantwortlicher im Sinne der DSGVO. Diese Datenschutzerklärung \
             erläutert die Erhebung und Verarbeitung personenbezogener Daten. \
             Rechtsgrundlage der Verarbeitung ist Art. 6 DSGVO, insbesondere \
             unser berechtigtes Interesse.\n\
             Weitergabe an Dritte nur mit Rechtsgrundlage. Speicherdauer: \
             personenbezogene Daten werden nur solange gespeichert wie nötig.\n\
             Ihre Rechte / Betroffenenrechte: Recht auf Auskunft, Recht auf \
             Löschung, Recht auf Berichtigung. Beschwerde bei der \
             Aufsichtsbehörde. Kontakt: datenschutz@example.de. \
             Datenschutzbeauftragter erreichbar unter gleicher Adresse.\n\
             Sicherheit und Cookies: Hinweise zu Cookies und zum Datenschutz. \
             Änderungen dieser Erklärung werden hier veröffentlicht.\n",
        );
        while body.len() < 3000 {
            body.push_str(
                "Die Verarbeitung personenbezogener Daten erfolgt gemäß dieser \
                 Datenschutzerklärung und den Vorgaben der DSGVO. ",
            );
        }
        let report = validate(&body);
        assert_eq!(report.detected_language, "de");
        assert!(report.is_valid, "report: {report:?}");
    }

    #[test]
    fn deep_search_gate() {
        assert!(!should_deep_search("short"));
        let nonpolicy = "A long page about our company history and mission. ".repeat(20);
        // Long enough but without privacy vocabulary: quick-rejected, so no
        // deep search either.
        assert!(!should_deep_search(&nonpolicy));
        let near_miss = format!(
            "{} We care about privacy and your personal data.",
            "General information about our services. ".repeat(20)
        );
        assert!(should_deep_search(&near_miss));
    }
}
