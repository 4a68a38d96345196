use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Action, AdvisorError, Hand, Result};

const H: Action = Action::Hit;
const S: Action = Action::Stand;
const D: Action = Action::Double;
const P: Action = Action::Split;

pub const DEFAULT_INSURANCE_THRESHOLD: f64 = 3.0;

/// A count-dependent departure from basic strategy.
///
/// A non-negative threshold fires at or above it, a negative one at or below.
/// Plays can be written in code or deserialized, e.g. from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexPlay {
    pub name: Cow<'static, str>,
    #[serde(default)]
    pub description: Cow<'static, str>,
    pub player_total: u8,
    pub dealer_upcard: u8,
    #[serde(default)]
    pub is_soft: bool,
    #[serde(default)]
    pub is_pair: bool,
    pub true_count_threshold: f64,
    pub basic_action: Action,
    pub index_action: Action,
}

impl IndexPlay {
    pub fn hard(
        name: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
        player_total: u8,
        dealer_upcard: u8,
        true_count_threshold: f64,
        basic_action: Action,
        index_action: Action,
    ) -> IndexPlay {
        IndexPlay {
            name: name.into(),
            description: description.into(),
            player_total,
            dealer_upcard,
            is_soft: false,
            is_pair: false,
            true_count_threshold,
            basic_action,
            index_action,
        }
    }

    pub fn soft(mut self) -> IndexPlay {
        self.is_soft = true;
        self
    }

    pub fn pair(mut self) -> IndexPlay {
        self.is_pair = true;
        self
    }

    fn situation(&self) -> (u8, u8, bool, bool) {
        (
            self.player_total,
            self.dealer_upcard,
            self.is_soft,
            self.is_pair,
        )
    }

    pub fn matches_hand(&self, hand: &Hand, dealer_upcard: u8) -> bool {
        hand.total() == self.player_total
            && dealer_upcard == self.dealer_upcard
            && hand.is_soft() == self.is_soft
            && hand.is_pair() == self.is_pair
    }

    pub fn applies(&self, hand: &Hand, dealer_upcard: u8, true_count: f64) -> bool {
        if !self.matches_hand(hand, dealer_upcard) {
            return false;
        }
        if self.true_count_threshold >= 0.0 {
            true_count >= self.true_count_threshold
        } else {
            true_count <= self.true_count_threshold
        }
    }
}

/// Illustrious 18 plus a handful of extensions, in the order they are tried.
fn default_plays() -> Vec<IndexPlay> {
    vec![
        IndexPlay::hard("16 vs 10", "Stand 16 vs 10 at TC >= 0", 16, 10, 0.0, H, S),
        IndexPlay::hard("15 vs 10", "Stand 15 vs 10 at TC >= +4", 15, 10, 4.0, H, S),
        IndexPlay::hard("10 vs 10", "Double 10 vs 10 at TC >= +4", 10, 10, 4.0, H, D),
        IndexPlay::hard("12 vs 3", "Stand 12 vs 3 at TC >= +2", 12, 3, 2.0, H, S),
        IndexPlay::hard("12 vs 2", "Stand 12 vs 2 at TC >= +3", 12, 2, 3.0, H, S),
        IndexPlay::hard("11 vs A", "Double 11 vs A at TC >= +1", 11, 11, 1.0, H, D),
        IndexPlay::hard("9 vs 2", "Double 9 vs 2 at TC >= +1", 9, 2, 1.0, H, D),
        IndexPlay::hard("10 vs A", "Double 10 vs A at TC >= +4", 10, 11, 4.0, H, D),
        IndexPlay::hard("9 vs 7", "Double 9 vs 7 at TC >= +3", 9, 7, 3.0, H, D),
        IndexPlay::hard("16 vs 9", "Stand 16 vs 9 at TC >= +5", 16, 9, 5.0, H, S),
        IndexPlay::hard("13 vs 2 (negative)", "Hit 13 vs 2 at TC <= -1", 13, 2, -1.0, S, H),
        // Zero counts as a positive threshold, so this hits from TC 0 upwards.
        IndexPlay::hard("12 vs 4 (negative)", "Hit 12 vs 4 at TC <= 0", 12, 4, 0.0, S, H),
        IndexPlay::hard("12 vs 5 (negative)", "Hit 12 vs 5 at TC <= -2", 12, 5, -2.0, S, H),
        IndexPlay::hard("12 vs 6 (negative)", "Hit 12 vs 6 at TC <= -1", 12, 6, -1.0, S, H),
        IndexPlay::hard("13 vs 3 (negative)", "Hit 13 vs 3 at TC <= -2", 13, 3, -2.0, S, H),
        IndexPlay::hard("20 vs 5 (split)", "Split 10,10 vs 5 at TC >= +5", 20, 5, 5.0, S, P)
            .pair(),
        IndexPlay::hard("20 vs 6 (split)", "Split 10,10 vs 6 at TC >= +4", 20, 6, 4.0, S, P)
            .pair(),
        IndexPlay::hard("AA vs A (negative)", "Stand A,A vs A at TC <= -1", 12, 11, -1.0, P, S)
            .soft()
            .pair(),
        IndexPlay::hard("8 vs 6", "Double 8 vs 6 at TC >= +2", 8, 6, 2.0, H, D),
        IndexPlay::hard("15 vs A", "Stand 15 vs A at TC >= +5", 15, 11, 5.0, H, S),
        IndexPlay::hard("14 vs 10", "Stand 14 vs 10 at TC >= +3", 14, 10, 3.0, H, S),
        IndexPlay::hard("A,6 vs 2", "Double A,6 vs 2 at TC >= +1", 17, 2, 1.0, H, D).soft(),
        IndexPlay::hard("A,5 vs 4", "Double A,5 vs 4 at TC >= +2", 16, 4, 2.0, H, D).soft(),
        IndexPlay::hard("13 vs 4 (negative)", "Hit 13 vs 4 at TC <= -1", 13, 4, -1.0, S, H),
    ]
}

/// Ordered index plays plus the insurance rule. The first play that applies wins.
#[derive(Debug, Clone)]
pub struct DeviationEngine {
    plays: Vec<IndexPlay>,
    insurance_threshold: f64,
}

impl DeviationEngine {
    pub fn new() -> DeviationEngine {
        DeviationEngine {
            plays: default_plays(),
            insurance_threshold: DEFAULT_INSURANCE_THRESHOLD,
        }
    }

    /// Builds an engine from a custom play list. No two plays may describe the
    /// same (total, upcard, soft, pair) situation.
    pub fn with_plays(
        plays: Vec<IndexPlay>,
        insurance_threshold: f64,
    ) -> Result<DeviationEngine> {
        let mut seen: HashMap<(u8, u8, bool, bool), &str> = HashMap::new();
        for play in &plays {
            if let Some(first) = seen.insert(play.situation(), &play.name) {
                return Err(AdvisorError::OverlappingIndexPlays {
                    first: first.to_string(),
                    second: play.name.to_string(),
                });
            }
        }
        Ok(DeviationEngine {
            plays,
            insurance_threshold,
        })
    }

    pub fn plays(&self) -> &[IndexPlay] {
        &self.plays
    }

    pub fn insurance_threshold(&self) -> f64 {
        self.insurance_threshold
    }

    pub fn applicable_plays(
        &self,
        hand: &Hand,
        dealer_upcard: u8,
        true_count: f64,
    ) -> Vec<&IndexPlay> {
        self.plays
            .iter()
            .filter(|play| play.applies(hand, dealer_upcard, true_count))
            .collect()
    }

    pub fn get_index_action(
        &self,
        hand: &Hand,
        dealer_upcard: u8,
        true_count: f64,
        basic_action: Action,
    ) -> (Action, Option<&IndexPlay>) {
        match self
            .plays
            .iter()
            .find(|play| play.applies(hand, dealer_upcard, true_count))
        {
            Some(play) => (play.index_action, Some(play)),
            None => (basic_action, None),
        }
    }

    pub fn take_insurance(&self, true_count: f64) -> bool {
        true_count >= self.insurance_threshold
    }
}

impl Default for DeviationEngine {
    fn default() -> Self {
        DeviationEngine::new()
    }
}
