use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeCategory {
    Economics,
    Technology,
    Politics,
    Sports,
    Crypto,
}

impl ChallengeCategory {
    pub const ALL: [ChallengeCategory; 5] = [
        Self::Economics,
        Self::Technology,
        Self::Politics,
        Self::Sports,
        Self::Crypto,
    ];

    /// Difficulty multiplier applied to rewards for this category
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Economics => 1.10,
            Self::Technology => 1.05,
            Self::Politics => 1.15,
            Self::Sports => 1.00,
            Self::Crypto => 1.20,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economics => "economics",
            Self::Technology => "technology",
            Self::Politics => "politics",
            Self::Sports => "sports",
            Self::Crypto => "crypto",
        }
    }
}

impl fmt::Display for ChallengeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChallengeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown challenge category: {}", s))
    }
}
