//! Homepage strategy: fetch the landing page and mine its footer, legal
//! sections, and navigation for policy links, scored heuristically and —
//! when the neural scorer is loaded — blended with Carl's opinion.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use policyscout_common::multilingual::{
    is_privacy_link_text, is_privacy_url, score_link_text, score_privacy_url, LINK_TEXT_PHRASES,
};
use policyscout_common::{
    CandidateSource, Config, LinkContext, PolicyCandidate, PolicyScoutError, PolicyType,
};
use policyscout_net::HttpClient;
use policyscout_neural::{extract_features, NeuralScorer};

use crate::html::{extract_footer_links, is_auth_url, PageLink};

use super::{passes_domain_gate, Strategy};

/// Path fragments worth a flat bonus on top of the pattern score.
const PATH_BONUS_FRAGMENTS: &[&str] = &[
    "/privacy",
    "/datenschutz",
    "/confidentialite",
    "/privacidad",
    "/privacidade",
    "/privacybeleid",
];

const MAX_EMITTED: usize = 5;

pub struct HomepageScraper {
    client: HttpClient,
    config: Arc<Config>,
    scorer: Option<Arc<NeuralScorer>>,
}

struct ScoredLink {
    link: PageLink,
    score: i32,
    neural: Option<f64>,
}

impl HomepageScraper {
    pub fn new(client: HttpClient, config: Arc<Config>, scorer: Option<Arc<NeuralScorer>>) -> Self {
        Self {
            client,
            config,
            scorer,
        }
    }

    fn context_bonus(context: LinkContext) -> i32 {
        match context {
            LinkContext::Footer => 15,
            LinkContext::LegalHub => 12,
            LinkContext::Nav => 5,
            LinkContext::Body | LinkContext::Unknown => 0,
        }
    }

    /// Heuristic link score before base and context: multilingual text and
    /// URL scores plus exact-match, path, and PDF bonuses.
    fn heuristic_score(link: &PageLink) -> i32 {
        let text = link.text.to_lowercase();
        let url = link.url.to_lowercase();

        let mut score = score_link_text(&text) as i32 + score_privacy_url(&url) as i32;

        let trimmed = text.trim();
        if LINK_TEXT_PHRASES.iter().any(|(p, _)| trimmed == *p) {
            score += 25;
        }
        if PATH_BONUS_FRAGMENTS.iter().any(|f| url.contains(f)) {
            score += 20;
        }
        if url.ends_with(".pdf") && score_privacy_url(&url) > 0 {
            score += 15;
        }
        score
    }

    async fn score_link(&self, link: PageLink, base_url: &str) -> ScoredLink {
        let heuristic = Self::heuristic_score(&link);
        let context_bonus = Self::context_bonus(link.context);

        if let Some(scorer) = &self.scorer {
            let features =
                extract_features(&link.text, &link.url, link.context, base_url, None);
            match scorer.predict(&features).await {
                Ok(prediction) => {
                    let blended = 0.7 * (prediction.score * 100.0)
                        + 0.3 * (50.0 + heuristic as f64);
                    return ScoredLink {
                        link,
                        score: blended.round() as i32 + context_bonus,
                        neural: Some(prediction.score),
                    };
                }
                Err(e) => debug!(error = %e, "Neural scoring unavailable for link"),
            }
        }

        ScoredLink {
            link,
            score: 50 + heuristic + context_bonus,
            neural: None,
        }
    }
}

#[async_trait]
impl Strategy for HomepageScraper {
    fn name(&self) -> &'static str {
        "homepage"
    }

    async fn execute(&self, domain: &str) -> Result<Vec<PolicyCandidate>> {
        let base_url = format!("https://{domain}/");
        let page = match self.client.get(&base_url, self.config.homepage_timeout).await {
            Ok(page) if page.is_success() => page,
            Ok(page) => {
                debug!(domain, status = page.status, "Homepage returned non-200");
                return Ok(Vec::new());
            }
            Err(PolicyScoutError::RateLimited { host, .. }) => {
                warn!(host, "Homepage fetch rate limited");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        // Resolve links against the URL we actually landed on.
        let landed = page.final_url.clone();
        let links = extract_footer_links(&page.body, &landed);
        debug!(domain, links = links.len(), "Homepage links harvested");

        let mut scored: Vec<ScoredLink> = Vec::new();
        for link in links {
            let qualifies = is_privacy_link_text(&link.text) || is_privacy_url(&link.url);
            if !qualifies {
                continue;
            }
            if is_auth_url(&link.url) || !passes_domain_gate(&link.url, domain) {
                continue;
            }
            scored.push(self.score_link(link, &base_url).await);
        }

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(MAX_EMITTED);

        let candidates: Vec<PolicyCandidate> = scored
            .into_iter()
            .map(|s| {
                let source = match s.link.context {
                    LinkContext::LegalHub => CandidateSource::LegalHub,
                    LinkContext::Nav => CandidateSource::NavLink,
                    _ => CandidateSource::FooterLink,
                };
                let confidence = s.score.clamp(0, 98) as u8;
                let mut candidate =
                    PolicyCandidate::new(&s.link.url, PolicyType::Privacy, source, confidence)
                        .with_detail(format!("homepage link '{}'", s.link.text))
                        .with_link_text(&s.link.text)
                        .with_context(s.link.context);
                candidate.neural_score = s.neural;
                candidate
            })
            .collect();

        info!(domain, candidates = candidates.len(), "Homepage scrape complete");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(text: &str, url: &str, context: LinkContext) -> PageLink {
        PageLink {
            url: url.to_string(),
            text: text.to_string(),
            context,
        }
    }

    #[test]
    fn footer_privacy_link_scores_high() {
        let l = link(
            "Privacy Policy",
            "https://vercel.com/legal/privacy-policy",
            LinkContext::Footer,
        );
        let heuristic = HomepageScraper::heuristic_score(&l);
        let total = 50 + heuristic + HomepageScraper::context_bonus(LinkContext::Footer);
        assert!(total >= 80, "footer privacy link scored only {total}");
    }

    #[test]
    fn exact_match_beats_embedded_mention() {
        let exact = link("Privacy Policy", "https://a.com/privacy-policy", LinkContext::Footer);
        let vague = link(
            "See details about privacy here",
            "https://a.com/about",
            LinkContext::Footer,
        );
        assert!(
            HomepageScraper::heuristic_score(&exact) > HomepageScraper::heuristic_score(&vague)
        );
    }

    #[test]
    fn pdf_bonus_only_for_privacy_scored_urls() {
        let privacy_pdf = link("Privacy", "https://a.com/privacy-policy.pdf", LinkContext::Footer);
        let random_pdf = link("Report", "https://a.com/annual-report.pdf", LinkContext::Footer);
        assert!(
            HomepageScraper::heuristic_score(&privacy_pdf)
                > HomepageScraper::heuristic_score(&random_pdf)
        );
    }

    #[test]
    fn context_bonuses_are_ordered() {
        assert!(
            HomepageScraper::context_bonus(LinkContext::Footer)
                > HomepageScraper::context_bonus(LinkContext::LegalHub)
        );
        assert!(
            HomepageScraper::context_bonus(LinkContext::LegalHub)
                > HomepageScraper::context_bonus(LinkContext::Nav)
        );
        assert_eq!(HomepageScraper::context_bonus(LinkContext::Body), 0);
    }
}
