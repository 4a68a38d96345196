pub mod advisor;
pub mod card;
pub mod deviation;
mod error;
pub mod hand;
pub mod shoe;
pub mod split;
pub mod strategy;
pub mod table;

use serde::{Deserialize, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};

pub use advisor::{Advice, Advisor, InsuranceAdvice};
pub use card::{Card, Rank};
pub use deviation::{DeviationEngine, IndexPlay};
pub use error::{AdvisorError, Result};
pub use hand::{Hand, Outcome};
pub use shoe::{CountInfo, Shoe};
pub use split::{HandSequence, SplitState};
pub use strategy::StrategyTable;
pub use table::{DealerHand, Seat, Table, TablePhase};

/// Table rules for one session. Built once and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    pub dealer_stands_soft_17: bool,
    pub number_of_decks: u8,
    pub double_after_split: bool,
    /// Surrender is not supported; must stay `false`.
    pub surrender_allowed: bool,
    pub blackjack_payout: f64,
    pub max_split_hands: u8,
    pub split_aces_one_card: bool,
    pub penetration_threshold: f64,
}

impl Default for Rules {
    /// Six decks, S17, DAS, 3:2, no surrender.
    fn default() -> Self {
        Rules {
            dealer_stands_soft_17: true,
            number_of_decks: 6,
            double_after_split: true,
            surrender_allowed: false,
            blackjack_payout: 1.5,
            max_split_hands: 4,
            split_aces_one_card: true,
            penetration_threshold: 0.75,
        }
    }
}

impl Rules {
    pub fn validate(&self) -> Result<()> {
        if self.number_of_decks == 0 {
            return Err(AdvisorError::InvalidRules(String::from(
                "number_of_decks must be at least 1",
            )));
        }
        if !(0.0..=1.0).contains(&self.penetration_threshold) {
            return Err(AdvisorError::InvalidRules(format!(
                "penetration_threshold must be within [0, 1], got {}",
                self.penetration_threshold
            )));
        }
        if self.max_split_hands < 2 {
            return Err(AdvisorError::InvalidRules(format!(
                "max_split_hands must be at least 2, got {}",
                self.max_split_hands
            )));
        }
        if self.surrender_allowed {
            return Err(AdvisorError::InvalidRules(String::from(
                "surrender is not supported",
            )));
        }
        if self.blackjack_payout <= 0.0 {
            return Err(AdvisorError::InvalidRules(format!(
                "blackjack_payout must be positive, got {}",
                self.blackjack_payout
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Rules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}D, {}, BJ {}:1, {}",
            if self.dealer_stands_soft_17 { "S17" } else { "H17" },
            self.number_of_decks,
            if self.double_after_split { "DAS" } else { "No DAS" },
            self.blackjack_payout,
            if self.surrender_allowed { "Surrender" } else { "No Surrender" },
        )
    }
}

/// A player decision. The variant name doubles as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_enum_str, Deserialize_enum_str)]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_are_valid() {
        let rules = Rules::default();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.to_string(), "S17, 6D, DAS, BJ 1.5:1, No Surrender");
    }

    #[test]
    fn invalid_rules_are_rejected() {
        let cases = [
            Rules {
                number_of_decks: 0,
                ..Rules::default()
            },
            Rules {
                penetration_threshold: 1.5,
                ..Rules::default()
            },
            Rules {
                max_split_hands: 1,
                ..Rules::default()
            },
            Rules {
                surrender_allowed: true,
                ..Rules::default()
            },
        ];
        for rules in cases {
            assert!(matches!(
                rules.validate(),
                Err(AdvisorError::InvalidRules(_))
            ));
        }
    }

    #[test]
    fn action_labels() {
        assert_eq!(Action::Hit.to_string(), "Hit");
        assert_eq!(Action::Double.to_string(), "Double");
        assert_eq!("Split".parse::<Action>().unwrap(), Action::Split);
        assert!("Surrender".parse::<Action>().is_err());
    }
}
