use std::fs;

use bj_advisor::{
    Advice, Advisor, AdvisorError, Card, CountInfo, Hand, InsuranceAdvice, Rules, Shoe,
};
use serde::{Deserialize, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid setting: {0}")]
    Setting(#[from] serde::de::value::Error),
    #[error(transparent)]
    Advisor(#[from] AdvisorError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub rules: ConfigRules,
    pub output: ConfigOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize_enum_str, Deserialize_enum_str)]
pub enum DealerRule {
    S17,
    H17,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize_enum_str, Deserialize_enum_str)]
pub enum OutputFormat {
    Yaml,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRules {
    pub number_of_decks: u8,
    pub penetration_threshold: f64,
    pub dealer_rule: String,
    pub double_after_split: bool,
    pub max_split_hands: u8,
    pub split_aces_one_card: bool,
    pub blackjack_payout: f64,
}

impl Default for ConfigRules {
    fn default() -> Self {
        let rules = Rules::default();
        ConfigRules {
            number_of_decks: rules.number_of_decks,
            penetration_threshold: rules.penetration_threshold,
            dealer_rule: String::from("S17"),
            double_after_split: rules.double_after_split,
            max_split_hands: rules.max_split_hands,
            split_aces_one_card: rules.split_aces_one_card,
            blackjack_payout: rules.blackjack_payout,
        }
    }
}

impl TryInto<Rules> for ConfigRules {
    type Error = DriverError;

    fn try_into(self) -> Result<Rules, Self::Error> {
        let dealer_rule: DealerRule = self.dealer_rule.parse()?;
        let rules = Rules {
            dealer_stands_soft_17: dealer_rule == DealerRule::S17,
            number_of_decks: self.number_of_decks,
            double_after_split: self.double_after_split,
            surrender_allowed: false,
            blackjack_payout: self.blackjack_payout,
            max_split_hands: self.max_split_hands,
            split_aces_one_card: self.split_aces_one_card,
            penetration_threshold: self.penetration_threshold,
        };
        rules.validate()?;
        if !rules.dealer_stands_soft_17 {
            log::warn!("dealer hits soft 17, but advice still follows the S17 charts");
        }
        Ok(rules)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOutput {
    pub format: String,
}

impl ConfigOutput {
    pub fn format(&self) -> Result<OutputFormat, DriverError> {
        Ok(self.format.parse()?)
    }
}

impl Default for ConfigOutput {
    fn default() -> Self {
        ConfigOutput {
            format: String::from("Text"),
        }
    }
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &str) -> Result<Config, DriverError> {
    let file_content = fs::read_to_string(filename)?;
    parse_config(&file_content)
}

pub fn parse_config(content: &str) -> Result<Config, DriverError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Everything the `advise` command prints for one decision.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub rules: Rules,
    pub hand: Hand,
    pub dealer_upcard: Card,
    pub count: CountInfo,
    pub advice: Advice,
    pub insurance: Option<InsuranceAdvice>,
}

/// Counts `seen`, then the player's hand and the dealer upcard, and advises on
/// the hand. Insurance is only reported against an ace.
pub fn advise(
    rules: &Rules,
    seen: &[Card],
    hand: &[Card],
    dealer_upcard: Card,
) -> Result<Report, DriverError> {
    rules.validate()?;
    if hand.is_empty() {
        return Err(AdvisorError::InvalidCardState(String::from("player hand is empty")).into());
    }

    let mut shoe = Shoe::from_rules(rules);
    for card in seen.iter().chain(hand).chain([dealer_upcard].iter()) {
        shoe.deal(*card);
    }
    if shoe.needs_shuffle() {
        log::warn!(
            "{:.1}% of the shoe is gone, the count may be stale",
            shoe.penetration() * 100.0
        );
    }

    let advisor = Advisor::new();
    let player_hand = Hand::from_cards(hand.to_vec());
    let true_count = shoe.true_count();
    let advice = advisor.get_advice(
        &player_hand,
        dealer_upcard.blackjack_value(),
        true_count,
        player_hand.can_double(),
        player_hand.can_split(),
    );
    let insurance = if dealer_upcard.is_ace() {
        Some(advisor.get_insurance_advice(true_count))
    } else {
        None
    };

    Ok(Report {
        rules: *rules,
        hand: player_hand,
        dealer_upcard,
        count: shoe.count_info(),
        advice,
        insurance,
    })
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Rules:     {}", self.rules)?;
        writeln!(f, "Count:     {}", self.count)?;
        writeln!(f, "Hand:      {} vs {}", self.hand, self.dealer_upcard)?;
        write!(f, "Advice:    {}", self.advice)?;
        if let Some(insurance) = &self.insurance {
            write!(f, "\nInsurance: {}", insurance)?;
        }
        Ok(())
    }
}
