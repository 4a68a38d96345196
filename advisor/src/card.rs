use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::{AdvisorError, Result};

const SUIT_LETTERS: [char; 4] = ['H', 'S', 'D', 'C'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "T")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    pub fn symbol(&self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    /// Ace counts 11 here; hand evaluation decides when it drops to 1.
    pub fn blackjack_value(&self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 11,
        }
    }

    /// Hi-Lo tag of the rank.
    pub fn counting_value(&self) -> i32 {
        match self {
            Rank::Two | Rank::Three | Rank::Four | Rank::Five | Rank::Six => 1,
            Rank::Seven | Rank::Eight | Rank::Nine => 0,
            _ => -1,
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Rank> {
        let symbol = symbol.to_ascii_uppercase();
        Rank::iter().find(|rank| rank.symbol() == symbol)
    }
}

/// A card as seen on the felt. Suits carry no meaning for play or counting,
/// so only the rank is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card {
    rank: Rank,
}

impl Card {
    pub fn new(rank: Rank) -> Card {
        Card { rank }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn blackjack_value(&self) -> u8 {
        self.rank.blackjack_value()
    }

    pub fn counting_value(&self) -> i32 {
        self.rank.counting_value()
    }

    pub fn is_ace(&self) -> bool {
        self.rank == Rank::Ace
    }
}

impl From<Rank> for Card {
    fn from(rank: Rank) -> Self {
        Card::new(rank)
    }
}

/// Parses tokens such as `7`, `t`, `10`, `Kh` or `10s`.
impl FromStr for Card {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim().to_ascii_uppercase();
        let mut rank_part = token.as_str();
        if rank_part.len() > 1 && rank_part.ends_with(&SUIT_LETTERS[..]) {
            rank_part = &rank_part[..rank_part.len() - 1];
        }
        if rank_part == "10" {
            rank_part = "T";
        }

        let mut chars = rank_part.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => Rank::from_symbol(symbol)
                .map(Card::new)
                .ok_or_else(|| AdvisorError::InvalidRank(s.to_string())),
            _ => Err(AdvisorError::InvalidRank(s.to_string())),
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rank.symbol())
    }
}

/// Parses a comma or whitespace separated list of card tokens.
pub fn parse_cards(list: &str) -> Result<Vec<Card>> {
    list.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse::<Card>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_follow_hi_lo() {
        let plus: Vec<Rank> = Rank::iter().filter(|r| r.counting_value() == 1).collect();
        assert_eq!(
            plus,
            vec![Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six]
        );
        assert_eq!(Rank::Eight.counting_value(), 0);
        assert_eq!(Rank::Queen.counting_value(), -1);
        assert_eq!(Rank::Ace.counting_value(), -1);
        assert_eq!(Rank::Ace.blackjack_value(), 11);
        assert_eq!(Rank::King.blackjack_value(), 10);
        let sum: i32 = Rank::iter().map(|r| r.counting_value()).sum();
        assert_eq!(sum, 0);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("a".parse::<Card>().unwrap().rank(), Rank::Ace);
        assert_eq!("q".parse::<Card>().unwrap().rank(), Rank::Queen);
        assert_eq!(" 7 ".parse::<Card>().unwrap().rank(), Rank::Seven);
    }

    #[test]
    fn ten_normalizes_to_t() {
        assert_eq!("10".parse::<Card>().unwrap().rank(), Rank::Ten);
        assert_eq!("10h".parse::<Card>().unwrap().rank(), Rank::Ten);
        assert_eq!("10".parse::<Card>().unwrap().to_string(), "T");
    }

    #[test]
    fn trailing_suit_is_ignored() {
        assert_eq!("Ks".parse::<Card>().unwrap().rank(), Rank::King);
        assert_eq!("AD".parse::<Card>().unwrap().rank(), Rank::Ace);
        assert_eq!("9c".parse::<Card>().unwrap().rank(), Rank::Nine);
    }

    #[test]
    fn invalid_tokens_are_rejected() {
        for token in ["", "1", "11", "X", "H", "KK", "10x", "status"] {
            assert_eq!(
                token.parse::<Card>(),
                Err(AdvisorError::InvalidRank(token.to_string())),
                "token {:?}",
                token
            );
        }
    }

    #[test]
    fn parse_card_list() {
        let cards = parse_cards("2, 3 k,10h").unwrap();
        let ranks: Vec<Rank> = cards.iter().map(Card::rank).collect();
        assert_eq!(ranks, vec![Rank::Two, Rank::Three, Rank::King, Rank::Ten]);
        assert!(parse_cards("").unwrap().is_empty());
        assert!(parse_cards("2,z").is_err());
    }
}
