use crate::calculations;
use serde::{Deserialize, Serialize};

/// Challenge history and experience of a player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub challenges_won: u32,
    pub challenges_lost: u32,
    pub experience: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl PlayerProgress {
    pub fn total_challenges(&self) -> u32 {
        self.challenges_won.saturating_add(self.challenges_lost)
    }

    pub fn accuracy_rate(&self) -> u32 {
        calculations::accuracy_rate(self.challenges_won, self.total_challenges())
    }

    pub fn level(&self) -> u32 {
        calculations::level(self.experience)
    }

    /// Experience still missing before the next level
    pub fn xp_to_next_level(&self) -> u64 {
        calculations::xp_for_next_level(self.level()).saturating_sub(self.experience)
    }
}
