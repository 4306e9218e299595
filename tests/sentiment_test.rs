//! Multi-provider sentiment blending.

mod common;

use common::{MockNews, MockSocial};
use std::sync::Arc;
use surge_radar::services::sentiment::SentimentAggregator;
use surge_radar::sources::{NewsSource, SocialSource};
use surge_radar::types::{round_to, SocialLabel, SocialPost};

fn aggregator(news: Vec<Arc<dyn NewsSource>>, social: Vec<Arc<dyn SocialSource>>) -> SentimentAggregator {
    SentimentAggregator::new(news, social)
}

#[tokio::test]
async fn test_all_providers_failing_is_neutral() {
    let agg = aggregator(
        vec![Arc::new(MockNews::failing("yahoo")), Arc::new(MockNews::failing("newsapi"))],
        vec![Arc::new(MockSocial::failing("stocktwits"))],
    );

    let detail = agg.analyze("AAPL").await;
    assert_eq!(detail.score, 50.0);
    assert_eq!(detail.news.source, "none");
    assert_eq!(detail.news.item_count, 0);
    assert_eq!(detail.social.item_count, 0);
    assert!(detail.news_secondary.is_none());
    assert!(detail.is_unavailable());
}

#[tokio::test]
async fn test_news_ranked_by_item_count() {
    let agg = aggregator(
        vec![
            Arc::new(MockNews::new("small", &["Stock plunges after terrible earnings miss"])),
            Arc::new(MockNews::new(
                "large",
                &[
                    "Company posts strong growth and record profit",
                    "Analysts upgrade shares on great outlook",
                    "Quarterly results beat expectations",
                ],
            )),
        ],
        vec![],
    );

    let detail = agg.analyze("ACME").await;
    assert_eq!(detail.news.source, "large");
    assert_eq!(detail.news.item_count, 3);
    let secondary = detail.news_secondary.clone().unwrap();
    assert_eq!(secondary.source, "small");

    let expected = round_to(detail.news.score * 0.65 + secondary.score * 0.35, 1);
    assert_eq!(detail.news_score, expected);
    // No social data: the news score is final
    assert_eq!(detail.score, detail.news_score);
    assert!(detail.news.score > 50.0);
    assert!(secondary.score < 50.0);
}

#[tokio::test]
async fn test_one_failing_news_provider_falls_back_to_the_other() {
    let agg = aggregator(
        vec![
            Arc::new(MockNews::failing("yahoo")),
            Arc::new(MockNews::new("finnhub", &["Shares rally on strong demand"])),
        ],
        vec![],
    );

    let detail = agg.analyze("ACME").await;
    assert_eq!(detail.news.source, "finnhub");
    assert!(detail.news_secondary.is_none());
    assert_eq!(detail.news_score, detail.news.score);
}

#[tokio::test]
async fn test_social_blend_and_native_labels() {
    let agg = aggregator(
        vec![Arc::new(MockNews::new("yahoo", &["Earnings report due next week"]))],
        vec![
            Arc::new(MockSocial::new(
                "stocktwits",
                vec![
                    SocialPost::labeled("$ACME looking great", SocialLabel::Bullish),
                    SocialPost::labeled("$ACME breakout", SocialLabel::Bullish),
                    SocialPost::labeled("$ACME overvalued", SocialLabel::Bearish),
                    SocialPost::new("$ACME earnings thread"),
                ],
            )),
            Arc::new(MockSocial::new("reddit", vec![SocialPost::new("ACME to the moon")])),
        ],
    );

    let detail = agg.analyze("ACME").await;
    assert_eq!(detail.social.source, "stocktwits");
    assert_eq!(detail.social.item_count, 4);
    assert_eq!(detail.social.bullish, Some(2));
    assert_eq!(detail.social.bearish, Some(1));

    let expected = round_to(detail.news_score * 0.6 + detail.social.score * 0.4, 1);
    assert_eq!(detail.score, expected);
    assert!((0.0..=100.0).contains(&detail.score));
}

#[tokio::test]
async fn test_social_tie_keeps_first_provider() {
    let agg = aggregator(
        vec![],
        vec![
            Arc::new(MockSocial::new("reddit", vec![SocialPost::new("ACME is great")])),
            Arc::new(MockSocial::new("stocktwits", vec![SocialPost::new("ACME is awful")])),
        ],
    );

    let detail = agg.analyze("ACME").await;
    assert_eq!(detail.social.source, "reddit");
    assert_eq!(detail.news_score, 50.0);
}

#[tokio::test]
async fn test_blank_headlines_are_ignored() {
    let agg = aggregator(vec![Arc::new(MockNews::new("yahoo", &["", "   "]))], vec![]);
    let detail = agg.analyze("ACME").await;
    assert_eq!(detail.score, 50.0);
    assert!(detail.is_unavailable());
}

#[tokio::test]
async fn test_primary_follows_item_count_not_provider_order() {
    let many = &["Shares surge on strong demand", "Record revenue beats estimates", "Upgrade lifts outlook"];
    let few = &["Shares slump after weak guidance"];

    let first = aggregator(
        vec![Arc::new(MockNews::new("alpha", many)), Arc::new(MockNews::new("beta", few))],
        vec![],
    )
    .analyze("ACME")
    .await;
    let swapped = aggregator(
        vec![Arc::new(MockNews::new("alpha", few)), Arc::new(MockNews::new("beta", many))],
        vec![],
    )
    .analyze("ACME")
    .await;

    assert_eq!(first.news.source, "alpha");
    assert_eq!(swapped.news.source, "beta");
    assert_eq!(first.news.score, swapped.news.score);
    assert_eq!(first.news_score, swapped.news_score);
}
