//! Known-alias table: company and brand names mapped straight to their
//! authoritative domains. Checked before any network I/O so the common
//! cases stay deterministic and offline. Keys are stored pre-normalized
//! (lowercase, alphanumeric only).

use std::collections::HashMap;
use std::sync::LazyLock;

static ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    ENTRIES.iter().copied().collect()
});

const ENTRIES: &[(&str, &str)] = &[
    // Tech platforms
    ("netflix", "netflix.com"),
    ("google", "google.com"),
    ("alphabet", "abc.xyz"),
    ("youtube", "youtube.com"),
    ("gmail", "google.com"),
    ("facebook", "facebook.com"),
    ("meta", "meta.com"),
    ("instagram", "instagram.com"),
    ("whatsapp", "whatsapp.com"),
    ("threads", "threads.net"),
    ("twitter", "x.com"),
    ("x", "x.com"),
    ("linkedin", "linkedin.com"),
    ("microsoft", "microsoft.com"),
    ("windows", "microsoft.com"),
    ("office365", "microsoft.com"),
    ("outlook", "microsoft.com"),
    ("xbox", "xbox.com"),
    ("apple", "apple.com"),
    ("icloud", "icloud.com"),
    ("amazon", "amazon.com"),
    ("aws", "aws.amazon.com"),
    ("amazonwebservices", "aws.amazon.com"),
    ("audible", "audible.com"),
    ("twitch", "twitch.tv"),
    ("tiktok", "tiktok.com"),
    ("bytedance", "bytedance.com"),
    ("snapchat", "snapchat.com"),
    ("snap", "snap.com"),
    ("pinterest", "pinterest.com"),
    ("reddit", "reddit.com"),
    ("tumblr", "tumblr.com"),
    ("discord", "discord.com"),
    ("telegram", "telegram.org"),
    ("signal", "signal.org"),
    ("slack", "slack.com"),
    ("zoom", "zoom.us"),
    ("skype", "skype.com"),
    ("dropbox", "dropbox.com"),
    ("box", "box.com"),
    ("spotify", "spotify.com"),
    ("soundcloud", "soundcloud.com"),
    ("pandora", "pandora.com"),
    ("deezer", "deezer.com"),
    ("hulu", "hulu.com"),
    ("disneyplus", "disneyplus.com"),
    ("disney", "disney.com"),
    ("hbomax", "max.com"),
    ("max", "max.com"),
    ("paramountplus", "paramountplus.com"),
    ("peacock", "peacocktv.com"),
    ("primevideo", "primevideo.com"),
    ("crunchyroll", "crunchyroll.com"),
    ("vimeo", "vimeo.com"),
    ("dailymotion", "dailymotion.com"),
    // Developer and SaaS
    ("github", "github.com"),
    ("gitlab", "gitlab.com"),
    ("bitbucket", "bitbucket.org"),
    ("stackoverflow", "stackoverflow.com"),
    ("atlassian", "atlassian.com"),
    ("jira", "atlassian.com"),
    ("confluence", "atlassian.com"),
    ("trello", "trello.com"),
    ("notion", "notion.so"),
    ("airtable", "airtable.com"),
    ("asana", "asana.com"),
    ("monday", "monday.com"),
    ("clickup", "clickup.com"),
    ("linear", "linear.app"),
    ("figma", "figma.com"),
    ("canva", "canva.com"),
    ("adobe", "adobe.com"),
    ("photoshop", "adobe.com"),
    ("salesforce", "salesforce.com"),
    ("hubspot", "hubspot.com"),
    ("zendesk", "zendesk.com"),
    ("intercom", "intercom.com"),
    ("freshworks", "freshworks.com"),
    ("servicenow", "servicenow.com"),
    ("workday", "workday.com"),
    ("sap", "sap.com"),
    ("oracle", "oracle.com"),
    ("ibm", "ibm.com"),
    ("redhat", "redhat.com"),
    ("vmware", "vmware.com"),
    ("intel", "intel.com"),
    ("amd", "amd.com"),
    ("nvidia", "nvidia.com"),
    ("qualcomm", "qualcomm.com"),
    ("arm", "arm.com"),
    ("cisco", "cisco.com"),
    ("dell", "dell.com"),
    ("hp", "hp.com"),
    ("lenovo", "lenovo.com"),
    ("asus", "asus.com"),
    ("acer", "acer.com"),
    ("samsung", "samsung.com"),
    ("lg", "lg.com"),
    ("sony", "sony.com"),
    ("playstation", "playstation.com"),
    ("nintendo", "nintendo.com"),
    ("steam", "steampowered.com"),
    ("valve", "valvesoftware.com"),
    ("epicgames", "epicgames.com"),
    ("ea", "ea.com"),
    ("electronicarts", "ea.com"),
    ("activision", "activision.com"),
    ("blizzard", "blizzard.com"),
    ("ubisoft", "ubisoft.com"),
    ("riotgames", "riotgames.com"),
    ("roblox", "roblox.com"),
    ("minecraft", "minecraft.net"),
    ("unity", "unity.com"),
    ("openai", "openai.com"),
    ("chatgpt", "openai.com"),
    ("anthropic", "anthropic.com"),
    ("claude", "anthropic.com"),
    ("deepmind", "deepmind.google"),
    ("huggingface", "huggingface.co"),
    ("mistral", "mistral.ai"),
    ("perplexity", "perplexity.ai"),
    ("stripe", "stripe.com"),
    ("paypal", "paypal.com"),
    ("venmo", "venmo.com"),
    ("square", "squareup.com"),
    ("block", "block.xyz"),
    ("wise", "wise.com"),
    ("revolut", "revolut.com"),
    ("n26", "n26.com"),
    ("klarna", "klarna.com"),
    ("adyen", "adyen.com"),
    ("checkout", "checkout.com"),
    ("plaid", "plaid.com"),
    ("coinbase", "coinbase.com"),
    ("binance", "binance.com"),
    ("kraken", "kraken.com"),
    ("robinhood", "robinhood.com"),
    ("etoro", "etoro.com"),
    ("vercel", "vercel.com"),
    ("netlify", "netlify.com"),
    ("cloudflare", "cloudflare.com"),
    ("fastly", "fastly.com"),
    ("akamai", "akamai.com"),
    ("digitalocean", "digitalocean.com"),
    ("linode", "linode.com"),
    ("heroku", "heroku.com"),
    ("render", "render.com"),
    ("railway", "railway.app"),
    ("supabase", "supabase.com"),
    ("firebase", "firebase.google.com"),
    ("mongodb", "mongodb.com"),
    ("redis", "redis.io"),
    ("elastic", "elastic.co"),
    ("databricks", "databricks.com"),
    ("snowflake", "snowflake.com"),
    ("datadog", "datadoghq.com"),
    ("newrelic", "newrelic.com"),
    ("sentry", "sentry.io"),
    ("pagerduty", "pagerduty.com"),
    ("twilio", "twilio.com"),
    ("sendgrid", "sendgrid.com"),
    ("mailchimp", "mailchimp.com"),
    ("shopify", "shopify.com"),
    ("woocommerce", "woocommerce.com"),
    ("bigcommerce", "bigcommerce.com"),
    ("squarespace", "squarespace.com"),
    ("wix", "wix.com"),
    ("wordpress", "wordpress.com"),
    ("godaddy", "godaddy.com"),
    ("namecheap", "namecheap.com"),
    ("docusign", "docusign.com"),
    ("dropboxsign", "hellosign.com"),
    ("okta", "okta.com"),
    ("auth0", "auth0.com"),
    ("1password", "1password.com"),
    ("lastpass", "lastpass.com"),
    ("bitwarden", "bitwarden.com"),
    ("nordvpn", "nordvpn.com"),
    ("expressvpn", "expressvpn.com"),
    ("protonmail", "proton.me"),
    ("proton", "proton.me"),
    ("duckduckgo", "duckduckgo.com"),
    ("brave", "brave.com"),
    ("mozilla", "mozilla.org"),
    ("firefox", "mozilla.org"),
    ("opera", "opera.com"),
    // Retail, travel, consumer
    ("walmart", "walmart.com"),
    ("target", "target.com"),
    ("costco", "costco.com"),
    ("bestbuy", "bestbuy.com"),
    ("homedepot", "homedepot.com"),
    ("lowes", "lowes.com"),
    ("ikea", "ikea.com"),
    ("aldi", "aldi.com"),
    ("lidl", "lidl.com"),
    ("carrefour", "carrefour.com"),
    ("tesco", "tesco.com"),
    ("sainsburys", "sainsburys.co.uk"),
    ("zalando", "zalando.de"),
    ("otto", "otto.de"),
    ("zara", "zara.com"),
    ("hm", "hm.com"),
    ("uniqlo", "uniqlo.com"),
    ("nike", "nike.com"),
    ("adidas", "adidas.com"),
    ("puma", "puma.com"),
    ("underarmour", "underarmour.com"),
    ("ebay", "ebay.com"),
    ("etsy", "etsy.com"),
    ("alibaba", "alibaba.com"),
    ("aliexpress", "aliexpress.com"),
    ("temu", "temu.com"),
    ("shein", "shein.com"),
    ("wayfair", "wayfair.com"),
    ("instacart", "instacart.com"),
    ("doordash", "doordash.com"),
    ("ubereats", "ubereats.com"),
    ("uber", "uber.com"),
    ("lyft", "lyft.com"),
    ("bolt", "bolt.eu"),
    ("grab", "grab.com"),
    ("airbnb", "airbnb.com"),
    ("booking", "booking.com"),
    ("expedia", "expedia.com"),
    ("tripadvisor", "tripadvisor.com"),
    ("kayak", "kayak.com"),
    ("skyscanner", "skyscanner.net"),
    ("ryanair", "ryanair.com"),
    ("easyjet", "easyjet.com"),
    ("lufthansa", "lufthansa.com"),
    ("britishairways", "britishairways.com"),
    ("airfrance", "airfrance.com"),
    ("klm", "klm.com"),
    ("emirates", "emirates.com"),
    ("qatarairways", "qatarairways.com"),
    ("delta", "delta.com"),
    ("united", "united.com"),
    ("americanairlines", "aa.com"),
    ("southwest", "southwest.com"),
    ("marriott", "marriott.com"),
    ("hilton", "hilton.com"),
    ("hyatt", "hyatt.com"),
    ("accor", "accor.com"),
    ("starbucks", "starbucks.com"),
    ("mcdonalds", "mcdonalds.com"),
    ("burgerking", "bk.com"),
    ("kfc", "kfc.com"),
    ("subway", "subway.com"),
    ("dominos", "dominos.com"),
    ("chipotle", "chipotle.com"),
    ("cocacola", "coca-cola.com"),
    ("pepsi", "pepsi.com"),
    ("nestle", "nestle.com"),
    ("unilever", "unilever.com"),
    ("procterandgamble", "pg.com"),
    ("johnsonandjohnson", "jnj.com"),
    ("pfizer", "pfizer.com"),
    ("moderna", "modernatx.com"),
    ("bayer", "bayer.com"),
    ("roche", "roche.com"),
    ("novartis", "novartis.com"),
    ("astrazeneca", "astrazeneca.com"),
    ("sanofi", "sanofi.com"),
    ("gsk", "gsk.com"),
    // Automotive and industrial
    ("tesla", "tesla.com"),
    ("toyota", "toyota.com"),
    ("honda", "honda.com"),
    ("ford", "ford.com"),
    ("generalmotors", "gm.com"),
    ("gm", "gm.com"),
    ("volkswagen", "vw.com"),
    ("vw", "vw.com"),
    ("bmw", "bmw.com"),
    ("mercedesbenz", "mercedes-benz.com"),
    ("mercedes", "mercedes-benz.com"),
    ("audi", "audi.com"),
    ("porsche", "porsche.com"),
    ("ferrari", "ferrari.com"),
    ("volvo", "volvo.com"),
    ("hyundai", "hyundai.com"),
    ("kia", "kia.com"),
    ("nissan", "nissan-global.com"),
    ("stellantis", "stellantis.com"),
    ("rivian", "rivian.com"),
    ("lucid", "lucidmotors.com"),
    ("boeing", "boeing.com"),
    ("airbus", "airbus.com"),
    ("siemens", "siemens.com"),
    ("bosch", "bosch.com"),
    ("ge", "ge.com"),
    ("generalelectric", "ge.com"),
    ("honeywell", "honeywell.com"),
    ("3m", "3m.com"),
    ("caterpillar", "caterpillar.com"),
    ("johndeere", "deere.com"),
    ("shell", "shell.com"),
    ("bp", "bp.com"),
    ("exxonmobil", "exxonmobil.com"),
    ("chevron", "chevron.com"),
    ("totalenergies", "totalenergies.com"),
    // US banks and insurers
    ("jpmorgan", "jpmorganchase.com"),
    ("jpmorganchase", "jpmorganchase.com"),
    ("chase", "chase.com"),
    ("bankofamerica", "bankofamerica.com"),
    ("wellsfargo", "wellsfargo.com"),
    ("citibank", "citi.com"),
    ("citi", "citi.com"),
    ("goldmansachs", "goldmansachs.com"),
    ("morganstanley", "morganstanley.com"),
    ("usbank", "usbank.com"),
    ("pnc", "pnc.com"),
    ("capitalone", "capitalone.com"),
    ("americanexpress", "americanexpress.com"),
    ("amex", "americanexpress.com"),
    ("visa", "visa.com"),
    ("mastercard", "mastercard.com"),
    ("discover", "discover.com"),
    ("fidelity", "fidelity.com"),
    ("vanguard", "vanguard.com"),
    ("blackrock", "blackrock.com"),
    ("schwab", "schwab.com"),
    ("charlesschwab", "schwab.com"),
    ("statefarm", "statefarm.com"),
    ("geico", "geico.com"),
    ("progressive", "progressive.com"),
    ("allstate", "allstate.com"),
    ("aig", "aig.com"),
    ("metlife", "metlife.com"),
    ("prudential", "prudential.com"),
    // European and international banks
    ("deutschebank", "deutsche-bank.de"),
    ("commerzbank", "commerzbank.de"),
    ("sparkasse", "sparkasse.de"),
    ("volksbank", "vr.de"),
    ("dkb", "dkb.de"),
    ("ingdiba", "ing.de"),
    ("ing", "ing.com"),
    ("berenberg", "berenberg.de"),
    ("hypovereinsbank", "hypovereinsbank.de"),
    ("kfw", "kfw.de"),
    ("ubs", "ubs.com"),
    ("creditsuisse", "credit-suisse.com"),
    ("juliusbaer", "juliusbaer.com"),
    ("barclays", "barclays.co.uk"),
    ("hsbc", "hsbc.com"),
    ("lloyds", "lloydsbank.com"),
    ("natwest", "natwest.com"),
    ("santander", "santander.com"),
    ("bbva", "bbva.com"),
    ("bnpparibas", "bnpparibas.com"),
    ("societegenerale", "societegenerale.com"),
    ("creditagricole", "credit-agricole.com"),
    ("unicredit", "unicreditgroup.eu"),
    ("intesasanpaolo", "intesasanpaolo.com"),
    ("rabobank", "rabobank.com"),
    ("abnamro", "abnamro.com"),
    ("nordea", "nordea.com"),
    ("danskebank", "danskebank.com"),
    ("seb", "seb.se"),
    ("swedbank", "swedbank.com"),
    ("raiffeisen", "raiffeisen.ch"),
    ("erstebank", "erstegroup.com"),
    ("scotiabank", "scotiabank.com"),
    ("rbc", "rbc.com"),
    ("td", "td.com"),
    ("tdbank", "td.com"),
    ("bmo", "bmo.com"),
    ("westpac", "westpac.com.au"),
    ("commbank", "commbank.com.au"),
    ("anz", "anz.com.au"),
    ("nab", "nab.com.au"),
    ("dbs", "dbs.com.sg"),
    ("ocbc", "ocbc.com"),
    ("uob", "uobgroup.com"),
    ("icbc", "icbc.com.cn"),
    ("mizuho", "mizuhogroup.com"),
    ("mufg", "mufg.jp"),
    ("nomura", "nomura.com"),
    // Media and telecom
    ("nytimes", "nytimes.com"),
    ("newyorktimes", "nytimes.com"),
    ("washingtonpost", "washingtonpost.com"),
    ("guardian", "theguardian.com"),
    ("theguardian", "theguardian.com"),
    ("bbc", "bbc.co.uk"),
    ("cnn", "cnn.com"),
    ("reuters", "reuters.com"),
    ("bloomberg", "bloomberg.com"),
    ("spiegel", "spiegel.de"),
    ("zeit", "zeit.de"),
    ("faz", "faz.net"),
    ("lemonde", "lemonde.fr"),
    ("elpais", "elpais.com"),
    ("verizon", "verizon.com"),
    ("att", "att.com"),
    ("tmobile", "t-mobile.com"),
    ("vodafone", "vodafone.com"),
    ("telekom", "telekom.de"),
    ("deutschetelekom", "telekom.de"),
    ("orange", "orange.com"),
    ("telefonica", "telefonica.com"),
    ("comcast", "comcast.com"),
    ("xfinity", "xfinity.com"),
    ("sky", "sky.com"),
    ("swisscom", "swisscom.ch"),
];

/// Normalize a company name into an alias key: lowercase, alphanumerics only.
fn normalize_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Look up a company name in the alias table. Tries the trimmed lowercase
/// form, then the fully de-punctuated variant ("Coca-Cola" → "cocacola").
pub fn lookup(name: &str) -> Option<&'static str> {
    let trimmed = name.trim().to_lowercase();
    if let Some(domain) = ALIASES.get(trimmed.as_str()) {
        return Some(domain);
    }
    let variant = normalize_key(&trimmed);
    if variant.is_empty() {
        return None;
    }
    ALIASES.get(variant.as_str()).copied()
}
