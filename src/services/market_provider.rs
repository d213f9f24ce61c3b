use crate::error::MarketError;
use crate::models::{Market, MarketCategory};
use crate::utils::helpers::load_json_file;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::info;
use std::path::PathBuf;

/// Source of the prediction markets shown next to the staking dashboard.
#[async_trait]
pub trait MarketProvider: Send + Sync {
    async fn list_markets(&self) -> Result<Vec<Market>, MarketError>;
}

/// Fixed demo listing with close times relative to `anchor`.
pub struct DemoMarketProvider {
    anchor: DateTime<Utc>,
}

impl DemoMarketProvider {
    pub fn new(anchor: DateTime<Utc>) -> Self {
        Self { anchor }
    }
}

struct DemoMarket {
    title: &'static str,
    category: MarketCategory,
    yes_odds: u8,
    volume_usd: f64,
    ends_in_minutes: i64,
    is_hot: bool,
    recent_win: Option<(&'static str, f64)>,
    active_bettors: u32,
    friends_activity: Option<u32>,
}

const DEMO_MARKETS: [DemoMarket; 5] = [
    DemoMarket {
        title: "Will Taylor Swift announce a new album in 2025?",
        category: MarketCategory::Entertainment,
        yes_odds: 65,
        volume_usd: 12_500.0,
        ends_in_minutes: 2 * 60 + 15,
        is_hot: true,
        recent_win: Some(("Sarah M.", 340.0)),
        active_bettors: 127,
        friends_activity: Some(3),
    },
    DemoMarket {
        title: "Will Lakers make it to NBA playoffs this season?",
        category: MarketCategory::Sports,
        yes_odds: 72,
        volume_usd: 8_900.0,
        ends_in_minutes: 5 * 60 + 32,
        is_hot: false,
        recent_win: None,
        active_bettors: 89,
        friends_activity: Some(1),
    },
    DemoMarket {
        title: "Will Biden run for re-election in 2028?",
        category: MarketCategory::Politics,
        yes_odds: 45,
        volume_usd: 25_100.0,
        ends_in_minutes: 28 * 60,
        is_hot: true,
        recent_win: Some(("Mike K.", 750.0)),
        active_bettors: 203,
        friends_activity: Some(5),
    },
    DemoMarket {
        title: "Will Netflix cancel Stranger Things after season 5?",
        category: MarketCategory::Entertainment,
        yes_odds: 38,
        volume_usd: 6_700.0,
        ends_in_minutes: 12 * 60 + 45,
        is_hot: false,
        recent_win: None,
        active_bettors: 56,
        friends_activity: None,
    },
    DemoMarket {
        title: "Will Manchester City win Premier League 2025?",
        category: MarketCategory::Sports,
        yes_odds: 58,
        volume_usd: 18_300.0,
        ends_in_minutes: 3 * 60 + 20,
        is_hot: true,
        recent_win: None,
        active_bettors: 145,
        friends_activity: Some(2),
    },
];

#[async_trait]
impl MarketProvider for DemoMarketProvider {
    async fn list_markets(&self) -> Result<Vec<Market>, MarketError> {
        DEMO_MARKETS
            .iter()
            .enumerate()
            .map(|(index, demo)| {
                let market = Market {
                    id: (index + 1).to_string(),
                    title: demo.title.to_string(),
                    category: demo.category,
                    yes_odds: demo.yes_odds,
                    no_odds: 100 - demo.yes_odds,
                    volume_usd: demo.volume_usd,
                    ends_at: self.anchor + Duration::minutes(demo.ends_in_minutes),
                    is_hot: demo.is_hot,
                    recent_winner: demo.recent_win.map(|(name, _)| name.to_string()),
                    recent_win_usd: demo.recent_win.map(|(_, amount)| amount),
                    active_bettors: demo.active_bettors,
                    friends_activity: demo.friends_activity,
                };
                market.validate()?;
                Ok(market)
            })
            .collect()
    }
}

/// Reads a JSON array of markets from disk on every call.
pub struct JsonFileMarketProvider {
    path: PathBuf,
}

impl JsonFileMarketProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MarketProvider for JsonFileMarketProvider {
    async fn list_markets(&self) -> Result<Vec<Market>, MarketError> {
        let markets: Vec<Market> = load_json_file(&self.path)?;
        for market in &markets {
            market.validate()?;
        }
        info!("Loaded {} markets from {}", markets.len(), self.path.display());
        Ok(markets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filter_markets;
    use std::fs;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.json", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_demo_markets() {
        let anchor = Utc::now();
        let markets = DemoMarketProvider::new(anchor).list_markets().await.unwrap();

        assert_eq!(markets.len(), 5);
        assert_eq!(markets[0].id, "1");
        assert_eq!(markets[0].no_odds, 35);
        assert_eq!(markets[0].volume_label(), "$12.5K");
        assert_eq!(markets[0].time_left_label(anchor), "2h 15m");
        assert_eq!(markets[2].time_left_label(anchor), "1d 4h");
        assert_eq!(markets[2].recent_winner.as_deref(), Some("Mike K."));
        assert_eq!(markets[3].friends_activity, None);

        let sports = filter_markets(&markets, Some(MarketCategory::Sports));
        assert_eq!(sports.len(), 2);
        assert_eq!(filter_markets(&markets, None).len(), 5);
    }

    #[tokio::test]
    async fn test_json_file_markets() {
        let path = temp_file(
            "markets-ok",
            r#"[{
                "id": "m1",
                "title": "Will it rain tomorrow?",
                "category": "politics",
                "yes_odds": 60,
                "no_odds": 40,
                "volume_usd": 1500.0,
                "ends_at": 1767225600000,
                "is_hot": false,
                "active_bettors": 4
            }]"#,
        );

        let markets = JsonFileMarketProvider::new(&path).list_markets().await.unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].category, MarketCategory::Politics);
        assert_eq!(markets[0].recent_winner, None);
        assert_eq!(markets[0].ends_at.timestamp_millis(), 1_767_225_600_000);
    }

    #[tokio::test]
    async fn test_json_file_rejects_bad_odds() {
        let path = temp_file(
            "markets-bad-odds",
            r#"[{
                "id": "m2",
                "title": "Broken",
                "category": "sports",
                "yes_odds": 70,
                "no_odds": 70,
                "volume_usd": 0.0,
                "ends_at": 0,
                "is_hot": true,
                "active_bettors": 0
            }]"#,
        );

        let result = JsonFileMarketProvider::new(&path).list_markets().await;
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(MarketError::InvalidOdds { yes: 70, no: 70, .. })));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let path = std::env::temp_dir().join("no-such-markets.json");
        let provider = JsonFileMarketProvider::new(path);
        assert!(matches!(provider.list_markets().await, Err(MarketError::Io(_))));
    }
}
