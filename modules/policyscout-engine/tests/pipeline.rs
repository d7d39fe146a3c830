//! Cross-component invariants exercised without any network: candidate
//! ranking, domain gating, matcher symmetry, and the neural training
//! round-trip.

use std::sync::Arc;

use policyscout_common::multilingual::score_link_text;
use policyscout_common::validator::{is_blocked_url, validate_url_for_domain};
use policyscout_common::{CandidateSource, Config, LinkContext, PolicyCandidate, PolicyType};
use policyscout_engine::orchestrator::merge_and_rank;
use policyscout_engine::{DiscoveryEngine, DiscoveryMode};
use policyscout_neural::{extract_features, MemoryStore, NeuralScorer};

#[test]
fn ranked_candidates_stay_within_confidence_bounds() {
    let ranked = merge_and_rank(vec![
        PolicyCandidate::new("https://a.com/privacy", PolicyType::Privacy, CandidateSource::Sitemap, 90),
        PolicyCandidate::new("https://a.com/p2", PolicyType::Privacy, CandidateSource::SearchFallback, 30),
        PolicyCandidate::new("https://a.com/p3", PolicyType::Terms, CandidateSource::StandardPath, 80),
    ]);
    for candidate in &ranked {
        assert!(candidate.confidence <= 100);
    }
    // Descending confidence overall.
    assert!(ranked.windows(2).all(|w| w[0].confidence >= w[1].confidence));
}

#[test]
fn every_plausible_emission_passes_the_validator() {
    // The URLs each strategy would emit for a well-behaved site.
    let domain = "vercel.com";
    let emissions = [
        "https://vercel.com/legal/privacy-policy",
        "https://www.vercel.com/privacy",
        "https://vercel.com/sitemap-listed/legal/terms",
    ];
    for url in emissions {
        assert!(!is_blocked_url(url), "{url} wrongly blocked");
        assert!(validate_url_for_domain(url, domain).is_valid, "{url} wrongly invalid");
    }
}

#[test]
fn matcher_is_case_symmetric() {
    for text in [
        "Privacy Policy",
        "DATENSCHUTZ",
        "Política de Privacidad",
        "プライバシーポリシー",
    ] {
        assert_eq!(score_link_text(text), score_link_text(&text.to_lowercase()));
    }
}

#[tokio::test]
async fn special_domain_discovery_end_to_end() {
    // Scenario: "netflix" resolved offline, discovery answered offline.
    let domain = policyscout_engine::aliases::lookup("netflix").unwrap();
    assert_eq!(domain, "netflix.com");

    let engine = DiscoveryEngine::new(Config::default());
    for mode in [DiscoveryMode::Sequential, DiscoveryMode::Parallel] {
        let result = engine.discover_with_mode(domain, mode).await;
        assert!(result.success);
        assert!(result.elapsed_ms < 1_000, "shortcut must not do I/O");
        let privacy = result
            .policies
            .iter()
            .find(|p| p.policy_type == PolicyType::Privacy)
            .expect("privacy policy present");
        assert_eq!(privacy.url, "https://help.netflix.com/legal/privacy");
        assert_eq!(privacy.confidence, 99);
        assert_eq!(result.stats.http_requests, 0);
        assert!(result.stats.candidates_per_strategy.contains_key("special_domain"));
    }
}

#[tokio::test]
async fn neural_round_trip_matches_the_contract() {
    let scorer = NeuralScorer::load(Arc::new(MemoryStore::new())).await;
    scorer.reset().await.unwrap();

    let features = extract_features(
        "Privacy Policy",
        "https://example.com/privacy-policy",
        LinkContext::Footer,
        "https://example.com",
        None,
    );

    let before = scorer.predict(&features).await.unwrap().score;
    scorer
        .train(&features, 1.0, "example.com", "https://example.com/privacy-policy")
        .await
        .unwrap();
    assert!(scorer.predict(&features).await.unwrap().score > before);

    for _ in 0..50 {
        scorer
            .train(&features, 0.0, "example.com", "https://example.com/privacy-policy")
            .await
            .unwrap();
    }
    assert!(scorer.predict(&features).await.unwrap().score < 0.2);
    assert_eq!(scorer.stats().await.generation, 51);
}
