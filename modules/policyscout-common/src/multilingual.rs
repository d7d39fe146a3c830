//! Multilingual privacy vocabulary: per-language term lists, URL path
//! patterns, and link-text phrases covering 25+ languages. All matching is
//! case-insensitive; scores are additive and capped at 100.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Per-language privacy terms, keyed by ISO 639-1 code. Used for body-text
/// hit counting and TLD-biased link matching.
pub const LANGUAGE_TERMS: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "privacy",
            "privacy policy",
            "privacy notice",
            "privacy statement",
            "personal data",
            "personal information",
            "data protection",
            "your rights",
            "cookies",
        ],
    ),
    (
        "de",
        &[
            "datenschutz",
            "datenschutzerklärung",
            "datenschutzerklaerung",
            "datenschutzhinweise",
            "personenbezogene daten",
            "betroffenenrechte",
            "verantwortlicher",
        ],
    ),
    (
        "fr",
        &[
            "confidentialité",
            "confidentialite",
            "politique de confidentialité",
            "données personnelles",
            "donnees personnelles",
            "protection des données",
            "vie privée",
        ],
    ),
    (
        "es",
        &[
            "privacidad",
            "política de privacidad",
            "politica de privacidad",
            "datos personales",
            "protección de datos",
            "proteccion de datos",
            "aviso de privacidad",
        ],
    ),
    (
        "it",
        &[
            "privacy",
            "informativa sulla privacy",
            "informativa privacy",
            "dati personali",
            "protezione dei dati",
            "trattamento dei dati",
        ],
    ),
    (
        "pt",
        &[
            "privacidade",
            "política de privacidade",
            "politica de privacidade",
            "dados pessoais",
            "proteção de dados",
            "protecao de dados",
        ],
    ),
    (
        "nl",
        &[
            "privacybeleid",
            "privacyverklaring",
            "persoonsgegevens",
            "gegevensbescherming",
            "privacy statement",
        ],
    ),
    (
        "sv",
        &[
            "integritetspolicy",
            "personuppgifter",
            "dataskydd",
            "integritetsskydd",
        ],
    ),
    (
        "no",
        &["personvern", "personvernerklæring", "personopplysninger"],
    ),
    (
        "da",
        &["privatlivspolitik", "persondatapolitik", "personoplysninger"],
    ),
    (
        "fi",
        &["tietosuoja", "tietosuojaseloste", "henkilötiedot", "henkilotiedot"],
    ),
    (
        "pl",
        &[
            "polityka prywatności",
            "polityka prywatnosci",
            "dane osobowe",
            "ochrona danych",
        ],
    ),
    (
        "cs",
        &[
            "ochrana osobních údajů",
            "ochrana osobnich udaju",
            "zásady ochrany",
            "osobní údaje",
        ],
    ),
    ("sk", &["ochrana osobných údajov", "osobné údaje"]),
    ("hu", &["adatvédelem", "adatvédelmi", "adatkezelési tájékoztató"]),
    (
        "ro",
        &[
            "confidențialitate",
            "confidentialitate",
            "politica de confidențialitate",
            "date personale",
        ],
    ),
    ("bg", &["поверителност", "лични данни", "защита на данните"]),
    ("hr", &["privatnost", "osobni podaci", "zaštita podataka"]),
    ("sr", &["приватност", "privatnost", "лични подаци"]),
    (
        "ru",
        &[
            "конфиденциальность",
            "персональные данные",
            "политика конфиденциальности",
            "защита данных",
        ],
    ),
    (
        "uk",
        &["конфіденційність", "персональні дані", "політика конфіденційності"],
    ),
    (
        "tr",
        &[
            "gizlilik",
            "gizlilik politikası",
            "gizlilik politikasi",
            "kişisel veriler",
            "kisisel veriler",
            "kvkk",
        ],
    ),
    (
        "el",
        &["απόρρητο", "προσωπικά δεδομένα", "πολιτική απορρήτου"],
    ),
    ("zh", &["隐私", "隱私", "隐私政策", "隱私權政策", "个人信息", "個人資料"]),
    (
        "ja",
        &["プライバシー", "プライバシーポリシー", "個人情報", "個人情報保護方針"],
    ),
    (
        "ko",
        &["개인정보", "개인정보처리방침", "개인정보 보호정책", "프라이버시"],
    ),
    (
        "ar",
        &["الخصوصية", "سياسة الخصوصية", "البيانات الشخصية"],
    ),
    ("he", &["פרטיות", "מדיניות פרטיות", "מידע אישי"]),
    (
        "th",
        &["ความเป็นส่วนตัว", "นโยบายความเป็นส่วนตัว", "ข้อมูลส่วนบุคคล"],
    ),
    (
        "id",
        &["privasi", "kebijakan privasi", "data pribadi"],
    ),
    ("vi", &["quyền riêng tư", "chính sách bảo mật", "dữ liệu cá nhân"]),
];

/// Flattened, deduplicated superset of every language's terms.
pub static ALL_TERMS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (_, terms) in LANGUAGE_TERMS {
        for t in *terms {
            if seen.insert(*t) {
                out.push(*t);
            }
        }
    }
    out
});

/// URL path patterns marking privacy/data-protection pages, with additive
/// weights. Covers Latin-script paths across the supported languages.
static URL_PATTERNS: LazyLock<Vec<(Regex, u32)>> = LazyLock::new(|| {
    [
        // English
        (r"/privacy-policy", 40),
        (r"/privacy-notice", 38),
        (r"/privacy-statement", 38),
        (r"/privacy(/|\.|$)", 32),
        (r"/privacy-center", 28),
        (r"/data-protection", 30),
        (r"/data-privacy", 30),
        (r"privacypolicy", 30),
        (r"/legal/privacy", 36),
        (r"/policies/privacy", 34),
        (r"/gdpr", 22),
        (r"/your-privacy", 26),
        // German
        (r"/datenschutzerkl(ae|ä)rung", 42),
        (r"/datenschutzhinweise?", 38),
        (r"/datenschutzbestimmungen", 36),
        (r"/datenschutz(/|\.|$)", 34),
        (r"/dsgvo", 22),
        // French
        (r"/politique-de-confidentialit(e|é)", 40),
        (r"/confidentialit(e|é)", 32),
        (r"/donnees-personnelles", 30),
        (r"/vie-privee", 28),
        // Spanish
        (r"/politica-de-privacidad", 40),
        (r"/aviso-de-privacidad", 36),
        (r"/privacidad", 32),
        (r"/proteccion-de-datos", 30),
        // Italian
        (r"/informativa-privacy", 38),
        (r"/informativa-sulla-privacy", 40),
        (r"/privacy-e-cookie", 28),
        // Portuguese
        (r"/politica-de-privacidade", 40),
        (r"/privacidade", 32),
        // Dutch
        (r"/privacybeleid", 38),
        (r"/privacyverklaring", 38),
        (r"/privacystatement", 34),
        // Nordic
        (r"/integritetspolicy", 38),
        (r"/personvern", 34),
        (r"/privatlivspolitik", 38),
        (r"/tietosuoja(seloste)?", 36),
        // Slavic
        (r"/polityka-prywatnosci", 40),
        (r"/ochrana-osobnich-udaju", 38),
        (r"/zasady-ochrany", 28),
        // Turkish
        (r"/gizlilik(-politikasi)?", 34),
        (r"/kvkk", 24),
        // Greek (romanized paths)
        (r"/aporrito", 28),
        (r"/politiki-aporritou", 36),
        // Asian romanizations
        (r"/puraibashi", 26),
        (r"/yinsi", 26),
        (r"/gaeinjeongbo", 26),
    ]
    .iter()
    .map(|(p, w)| {
        (
            Regex::new(&format!("(?i){p}")).expect("valid url pattern"),
            *w,
        )
    })
    .collect()
});

/// Link-text phrases across 25+ languages, with additive weights.
pub const LINK_TEXT_PHRASES: &[(&str, u32)] = &[
    // English
    ("privacy policy", 40),
    ("privacy notice", 38),
    ("privacy statement", 38),
    ("privacy center", 30),
    ("privacy & cookies", 32),
    ("privacy and cookies", 32),
    ("data protection", 30),
    ("data privacy", 30),
    ("your privacy", 28),
    ("your privacy rights", 30),
    ("privacy choices", 26),
    ("privacy", 25),
    ("do not sell my personal information", 24),
    ("california privacy", 22),
    // German
    ("datenschutzerklärung", 42),
    ("datenschutzerklaerung", 42),
    ("datenschutzhinweise", 38),
    ("datenschutzbestimmungen", 36),
    ("datenschutzrichtlinie", 36),
    ("datenschutz", 32),
    ("hinweise zum datenschutz", 34),
    // French
    ("politique de confidentialité", 40),
    ("politique de confidentialite", 40),
    ("charte de confidentialité", 36),
    ("déclaration de confidentialité", 36),
    ("confidentialité", 30),
    ("confidentialite", 30),
    ("données personnelles", 30),
    ("donnees personnelles", 30),
    ("vie privée", 28),
    ("protection des données", 30),
    // Spanish
    ("política de privacidad", 40),
    ("politica de privacidad", 40),
    ("aviso de privacidad", 36),
    ("privacidad", 28),
    ("protección de datos", 30),
    ("proteccion de datos", 30),
    ("tratamiento de datos", 26),
    // Italian
    ("informativa sulla privacy", 40),
    ("informativa privacy", 38),
    ("informativa sul trattamento dei dati", 34),
    ("trattamento dei dati personali", 32),
    ("privacy e cookie", 28),
    // Portuguese
    ("política de privacidade", 40),
    ("politica de privacidade", 40),
    ("aviso de privacidade", 36),
    ("privacidade", 28),
    ("proteção de dados", 30),
    ("protecao de dados", 30),
    // Dutch
    ("privacybeleid", 40),
    ("privacyverklaring", 40),
    ("privacystatement", 36),
    ("persoonsgegevens", 28),
    ("gegevensbescherming", 30),
    // Swedish
    ("integritetspolicy", 40),
    ("personuppgiftspolicy", 38),
    ("behandling av personuppgifter", 30),
    ("dataskyddspolicy", 34),
    // Norwegian
    ("personvernerklæring", 40),
    ("personvernerklaering", 40),
    ("personvern", 30),
    ("personopplysninger", 28),
    // Danish
    ("privatlivspolitik", 40),
    ("persondatapolitik", 38),
    ("beskyttelse af personlige oplysninger", 30),
    // Finnish
    ("tietosuojaseloste", 40),
    ("tietosuojakäytäntö", 38),
    ("tietosuoja", 30),
    ("rekisteriseloste", 28),
    // Polish
    ("polityka prywatności", 40),
    ("polityka prywatnosci", 40),
    ("ochrona danych osobowych", 32),
    ("dane osobowe", 26),
    // Czech
    ("ochrana osobních údajů", 40),
    ("ochrana osobnich udaju", 40),
    ("zásady ochrany osobních údajů", 38),
    ("zpracování osobních údajů", 32),
    // Slovak
    ("ochrana osobných údajov", 40),
    ("spracovanie osobných údajov", 32),
    // Hungarian
    ("adatvédelmi tájékoztató", 40),
    ("adatvédelmi nyilatkozat", 38),
    ("adatkezelési tájékoztató", 38),
    ("adatvédelem", 30),
    // Romanian
    ("politica de confidențialitate", 40),
    ("politica de confidentialitate", 40),
    ("protecția datelor", 30),
    ("protectia datelor", 30),
    ("date cu caracter personal", 28),
    // Bulgarian
    ("политика за поверителност", 40),
    ("поверителност", 30),
    ("лични данни", 28),
    // Croatian / Serbian
    ("pravila privatnosti", 40),
    ("politika privatnosti", 40),
    ("zaštita podataka", 30),
    ("zastita podataka", 30),
    ("политика приватности", 38),
    // Russian
    ("политика конфиденциальности", 40),
    ("конфиденциальность", 30),
    ("персональные данные", 28),
    ("обработка персональных данных", 32),
    // Ukrainian
    ("політика конфіденційності", 40),
    ("конфіденційність", 30),
    ("персональні дані", 28),
    // Turkish
    ("gizlilik politikası", 40),
    ("gizlilik politikasi", 40),
    ("gizlilik sözleşmesi", 36),
    ("kişisel verilerin korunması", 34),
    ("kisisel verilerin korunmasi", 34),
    ("gizlilik", 28),
    ("kvkk aydınlatma metni", 30),
    // Greek
    ("πολιτική απορρήτου", 40),
    ("απόρρητο", 28),
    ("προσωπικά δεδομένα", 28),
    ("δήλωση απορρήτου", 36),
    // Chinese (simplified + traditional)
    ("隐私政策", 42),
    ("隐私权政策", 42),
    ("隱私權政策", 42),
    ("隱私政策", 42),
    ("隐私声明", 38),
    ("隱私聲明", 38),
    ("隐私", 28),
    ("隱私", 28),
    ("个人信息保护", 32),
    ("個人資料", 28),
    // Japanese
    ("プライバシーポリシー", 42),
    ("プライバシー", 28),
    ("個人情報保護方針", 40),
    ("個人情報の取り扱い", 34),
    ("個人情報", 26),
    // Korean
    ("개인정보처리방침", 42),
    ("개인정보 처리방침", 42),
    ("개인정보보호정책", 40),
    ("개인정보", 28),
    ("프라이버시", 26),
    // Arabic
    ("سياسة الخصوصية", 40),
    ("الخصوصية", 28),
    ("البيانات الشخصية", 28),
    ("حماية البيانات", 30),
    // Hebrew
    ("מדיניות פרטיות", 40),
    ("פרטיות", 28),
    ("הגנת מידע", 28),
    // Thai
    ("นโยบายความเป็นส่วนตัว", 42),
    ("ความเป็นส่วนตัว", 28),
    ("ข้อมูลส่วนบุคคล", 28),
    // Indonesian / Malay
    ("kebijakan privasi", 40),
    ("dasar privasi", 38),
    ("privasi", 26),
    ("data pribadi", 26),
    // Vietnamese
    ("chính sách bảo mật", 40),
    ("chinh sach bao mat", 40),
    ("quyền riêng tư", 30),
    ("dữ liệu cá nhân", 26),
    // Hindi (romanized + Devanagari)
    ("गोपनीयता नीति", 40),
    ("गोपनीयता", 28),
    ("gopniyata niti", 30),
];

/// Additive link-text score, capped at 100. Case-insensitive.
pub fn score_link_text(text: &str) -> u32 {
    let lower = text.to_lowercase();
    let trimmed = lower.trim();
    if trimmed.is_empty() {
        return 0;
    }
    let mut score = 0u32;
    for (phrase, weight) in LINK_TEXT_PHRASES {
        if trimmed.contains(phrase) {
            score += weight;
            // Exact anchor text is a stronger signal than a substring hit.
            if trimmed == *phrase {
                score += 15;
            }
        }
    }
    score.min(100)
}

pub fn is_privacy_link_text(text: &str) -> bool {
    score_link_text(text) >= 25
}

/// Additive URL path score, capped at 100. Case-insensitive.
pub fn score_privacy_url(url: &str) -> u32 {
    let mut score = 0u32;
    for (re, weight) in URL_PATTERNS.iter() {
        if re.is_match(url) {
            score += weight;
        }
    }
    score.min(100)
}

pub fn is_privacy_url(url: &str) -> bool {
    score_privacy_url(url) >= 30
}

/// Count multilingual privacy-term hits in a body, returning the total hit
/// count and the distinct terms found. The body is lowercased once.
pub fn privacy_term_hits(body: &str) -> (usize, Vec<&'static str>) {
    let lower = body.to_lowercase();
    let mut unique = Vec::new();
    let mut total = 0usize;
    for term in ALL_TERMS.iter() {
        let hits = lower.matches(term).count();
        if hits > 0 {
            total += hits;
            unique.push(*term);
        }
    }
    (total, unique)
}

/// Language subsets by TLD, biasing link matching toward the host's likely
/// locale. English is always included.
pub fn languages_for_tld(tld: &str) -> Vec<&'static str> {
    let extra: &[&str] = match tld {
        "de" => &["de"],
        "at" => &["de"],
        "ch" => &["de", "fr", "it"],
        "fr" => &["fr"],
        "be" => &["fr", "nl"],
        "es" | "mx" | "ar" | "cl" | "co" => &["es"],
        "it" => &["it"],
        "pt" | "br" | "com.br" => &["pt"],
        "nl" => &["nl"],
        "se" => &["sv"],
        "no" => &["no"],
        "dk" => &["da"],
        "fi" => &["fi"],
        "pl" => &["pl"],
        "cz" => &["cs"],
        "sk" => &["sk"],
        "hu" => &["hu"],
        "ro" => &["ro"],
        "bg" => &["bg"],
        "hr" => &["hr"],
        "rs" => &["sr"],
        "ru" => &["ru"],
        "ua" => &["uk"],
        "tr" | "com.tr" => &["tr"],
        "gr" => &["el"],
        "cn" | "tw" | "hk" | "com.cn" | "com.tw" | "com.hk" => &["zh"],
        "jp" | "co.jp" => &["ja"],
        "kr" | "co.kr" => &["ko"],
        "sa" | "ae" | "eg" => &["ar"],
        "il" => &["he"],
        "th" | "co.th" => &["th"],
        "id" | "co.id" | "my" | "com.my" => &["id"],
        "vn" | "com.vn" => &["vi"],
        "in" | "co.in" => &["en"],
        _ => &[],
    };
    let mut langs = vec!["en"];
    langs.extend_from_slice(extra);
    langs
}

/// Privacy terms biased by the URL's TLD.
pub fn privacy_terms_for_url(url: &str) -> Vec<&'static str> {
    let tld = url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| crate::domain::split_domain(h).tld))
        .unwrap_or_default();
    let langs = languages_for_tld(&tld);
    let mut out = Vec::new();
    for (code, terms) in LANGUAGE_TERMS {
        if langs.contains(code) {
            out.extend_from_slice(terms);
        }
    }
    out
}
