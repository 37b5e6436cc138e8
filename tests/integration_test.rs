use wallet_reputation::{
    badge::{render_badge_svg, style_for_name, BadgeMetadata},
    models::{AccountDetails, Category, ReputationResult},
    utils::to_checksum_address,
    Decimal, ReputationScorer, ReputationThresholds,
};

#[test]
fn test_reference_scores() {
    let scorer = ReputationScorer::default();

    let cases = [
        (0, Category::Newcomer, 10),
        (5, Category::Newcomer, 14),
        (9, Category::Newcomer, 18),
        (10, Category::Explorer, 30),
        (44, Category::Explorer, 46),
        (50, Category::Contributor, 60),
        (200, Category::Veteran, 85),
        (600, Category::Veteran, 89),
        (1000, Category::Legend, 95),
        (250_000, Category::Legend, 95),
    ];

    for (count, category, score) in cases {
        let assessment = scorer.assess(count, "0xabc");
        assert_eq!(assessment.category, category, "category for {}", count);
        assert_eq!(assessment.score, score, "score for {}", count);
    }
}

#[test]
fn test_boundaries_switch_category() {
    let scorer = ReputationScorer::default();
    let t = *scorer.thresholds();

    for (threshold, below, at) in [
        (t.explorer, Category::Newcomer, Category::Explorer),
        (t.contributor, Category::Explorer, Category::Contributor),
        (t.veteran, Category::Contributor, Category::Veteran),
        (t.legend, Category::Veteran, Category::Legend),
    ] {
        assert_eq!(scorer.categorize(threshold - 1), below);
        assert_eq!(scorer.categorize(threshold), at);
    }
}

#[test]
fn test_score_stays_in_category_range() {
    let scorer = ReputationScorer::default();
    let mut previous = scorer.assess(0, "0xabc");

    for count in 1..5000u64 {
        let current = scorer.assess(count, "0xabc");
        assert!(current.category.score_range().contains(&current.score));
        assert!(current.category >= previous.category);
        if current.category == previous.category {
            assert!(current.score >= previous.score, "score dropped at {}", count);
        }
        previous = current;
    }
}

#[test]
fn test_custom_thresholds() {
    let thresholds = ReputationThresholds {
        explorer: 5,
        contributor: 20,
        veteran: 100,
        legend: 500,
    };
    assert!(thresholds.validate().is_ok());

    let scorer = ReputationScorer::new(thresholds);
    assert_eq!(scorer.categorize(4), Category::Newcomer);
    assert_eq!(scorer.categorize(5), Category::Explorer);
    assert_eq!(scorer.categorize(500), Category::Legend);

    let broken = ReputationThresholds {
        explorer: 10,
        contributor: 10,
        veteran: 200,
        legend: 1000,
    };
    assert!(broken.validate().is_err());
}

#[test]
fn test_badge_metadata_for_scored_address() {
    let scorer = ReputationScorer::default();
    let recipient = to_checksum_address("0xd81c6e09664d35f97f53a6e9732dae09cfb958a6").unwrap();
    let assessment = scorer.assess(44, &recipient);

    let result = ReputationResult {
        category: assessment.category,
        score: assessment.score,
        message: assessment.message,
        rationale: String::new(),
        details: AccountDetails {
            address: recipient.clone(),
            transaction_count: 44,
            balance: Decimal::ZERO,
        },
    };
    assert!(result.validate_for(&recipient).is_ok());

    let metadata = BadgeMetadata::build(&recipient, &result);
    assert_eq!(metadata.name, "BNB Reputation Badge - Explorer");
    assert_eq!(metadata.attributes.len(), 3);
}

#[test]
fn test_every_category_renders_distinct_badge() {
    let rendered: Vec<String> = Category::ALL
        .iter()
        .map(|c| render_badge_svg(&c.style()))
        .collect();

    for (i, a) in rendered.iter().enumerate() {
        for b in &rendered[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert!(render_badge_svg(&style_for_name("DeFi User")).contains(">C</text>"));
}
