use crate::error::MarketError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketCategory {
    Sports,
    Entertainment,
    Politics,
}

/// A yes/no prediction market as listed on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub id: String,
    pub title: String,
    pub category: MarketCategory,
    pub yes_odds: u8,
    pub no_odds: u8,
    pub volume_usd: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub ends_at: DateTime<Utc>,
    pub is_hot: bool,
    #[serde(default)]
    pub recent_winner: Option<String>,
    #[serde(default)]
    pub recent_win_usd: Option<f64>,
    pub active_bettors: u32,
    #[serde(default)]
    pub friends_activity: Option<u32>,
}

impl Market {
    pub fn validate(&self) -> Result<(), MarketError> {
        if u16::from(self.yes_odds) + u16::from(self.no_odds) != 100 {
            return Err(MarketError::InvalidOdds {
                id: self.id.clone(),
                yes: self.yes_odds,
                no: self.no_odds,
            });
        }
        Ok(())
    }

    /// Short volume label such as `$12.5K`.
    pub fn volume_label(&self) -> String {
        if self.volume_usd >= 1_000_000.0 {
            format!("${:.1}M", self.volume_usd / 1_000_000.0)
        } else if self.volume_usd >= 1_000.0 {
            format!("${:.1}K", self.volume_usd / 1_000.0)
        } else {
            format!("${:.0}", self.volume_usd)
        }
    }

    /// Time left until close: `1d 4h` beyond a day, `2h 15m` below.
    pub fn time_left_label(&self, now: DateTime<Utc>) -> String {
        let remaining = self.ends_at.signed_duration_since(now);
        if remaining.num_milliseconds() <= 0 {
            return "Closed".to_string();
        }
        let days = remaining.num_days();
        let hours = remaining.num_hours() % 24;
        let minutes = remaining.num_minutes() % 60;
        if days > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}h {}m", hours, minutes)
        }
    }
}

/// Markets in `category`, or all of them when no category is selected.
pub fn filter_markets(markets: &[Market], category: Option<MarketCategory>) -> Vec<&Market> {
    markets
        .iter()
        .filter(|market| category.map_or(true, |c| market.category == c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn market(id: &str, category: MarketCategory, yes: u8, no: u8) -> Market {
        Market {
            id: id.to_string(),
            title: format!("Market {}", id),
            category,
            yes_odds: yes,
            no_odds: no,
            volume_usd: 12_500.0,
            ends_at: Utc::now() + Duration::hours(2),
            is_hot: false,
            recent_winner: None,
            recent_win_usd: None,
            active_bettors: 10,
            friends_activity: None,
        }
    }

    #[test]
    fn test_validate_odds() {
        assert!(market("1", MarketCategory::Sports, 65, 35).validate().is_ok());
        assert!(matches!(
            market("2", MarketCategory::Sports, 65, 40).validate(),
            Err(MarketError::InvalidOdds { .. })
        ));
    }

    #[test]
    fn test_filter_markets() {
        let markets = vec![
            market("1", MarketCategory::Sports, 50, 50),
            market("2", MarketCategory::Politics, 50, 50),
            market("3", MarketCategory::Sports, 50, 50),
        ];
        assert_eq!(filter_markets(&markets, None).len(), 3);

        let sports = filter_markets(&markets, Some(MarketCategory::Sports));
        assert_eq!(
            sports.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            vec!["1", "3"]
        );
        assert!(filter_markets(&markets, Some(MarketCategory::Entertainment)).is_empty());
    }

    #[test]
    fn test_labels() {
        let now = Utc::now();
        let mut m = market("1", MarketCategory::Entertainment, 50, 50);
        assert_eq!(m.volume_label(), "$12.5K");

        m.ends_at = now + Duration::minutes(2 * 60 + 15);
        assert_eq!(m.time_left_label(now), "2h 15m");
        m.ends_at = now + Duration::hours(28);
        assert_eq!(m.time_left_label(now), "1d 4h");
        m.ends_at = now - Duration::seconds(1);
        assert_eq!(m.time_left_label(now), "Closed");
    }
}
