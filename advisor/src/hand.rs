use serde::Serialize;

use crate::{AdvisorError, Card, Rank, Result};

/// How a finished player hand fared against the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Blackjack,
    Win,
    Push,
    Lose,
    Bust,
}

/// One group of cards being played as a unit.
///
/// Total and softness are recomputed from the cards on every query, so adding
/// or removing a card can never leave them stale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            cards: Vec::with_capacity(3),
        }
    }

    pub fn from_cards(cards: Vec<Card>) -> Hand {
        Hand { cards }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Takes back the last card added. Fails on an empty hand.
    pub fn remove_last_card(&mut self) -> Result<Card> {
        self.cards
            .pop()
            .ok_or_else(|| AdvisorError::InvalidCardState(String::from("hand has no cards")))
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn ace_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_ace()).count()
    }

    /// Returns `(total, is_soft)`. Every ace counts 1, then a single ace is
    /// promoted to 11 when that does not bust the hand.
    fn evaluate(&self) -> (u8, bool) {
        let base = self
            .cards
            .iter()
            .filter(|card| !card.is_ace())
            .fold(0u8, |sum, card| sum.saturating_add(card.blackjack_value()));
        let aces = self.ace_count().min(u8::MAX as usize) as u8;
        let running = base.saturating_add(aces);

        if aces > 0 && running <= 11 {
            (running + 10, true)
        } else {
            (running, false)
        }
    }

    pub fn total(&self) -> u8 {
        self.evaluate().0
    }

    pub fn is_soft(&self) -> bool {
        self.evaluate().1
    }

    pub fn is_hard(&self) -> bool {
        !self.is_soft()
    }

    /// Two cards of equal blackjack value. Any two ten-valued cards qualify.
    pub fn is_pair(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].blackjack_value() == self.cards[1].blackjack_value()
    }

    /// Blackjack value of the paired cards, 11 for aces.
    pub fn pair_value(&self) -> Option<u8> {
        if self.is_pair() {
            Some(self.cards[0].blackjack_value())
        } else {
            None
        }
    }

    pub fn pair_rank(&self) -> Option<Rank> {
        if self.is_pair() {
            Some(self.cards[0].rank())
        } else {
            None
        }
    }

    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.total() == 21
    }

    pub fn is_busted(&self) -> bool {
        self.total() > 21
    }

    pub fn can_double(&self) -> bool {
        self.cards.len() == 2
    }

    pub fn can_split(&self) -> bool {
        self.is_pair()
    }

    /// Settles this hand against the dealer's final hand. A player bust loses
    /// even when the dealer busts too.
    pub fn outcome_against(&self, dealer: &Hand) -> Outcome {
        self.settle(self.is_blackjack(), dealer)
    }

    /// Settles a hand whose two-card 21 may not count as a natural, such as
    /// one produced by a split.
    pub(crate) fn settle(&self, natural: bool, dealer: &Hand) -> Outcome {
        if self.is_busted() {
            return Outcome::Bust;
        }
        match (natural, dealer.is_blackjack()) {
            (true, true) => return Outcome::Push,
            (true, false) => return Outcome::Blackjack,
            (false, true) => return Outcome::Lose,
            (false, false) => {}
        }
        if dealer.is_busted() {
            return Outcome::Win;
        }
        match self.total().cmp(&dealer.total()) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Push,
            std::cmp::Ordering::Less => Outcome::Lose,
        }
    }

    pub fn describe(&self) -> String {
        if self.is_empty() {
            return String::from("Empty hand");
        }
        match self.pair_rank() {
            Some(rank) => format!("Pair of {}s", rank.symbol()),
            None if self.is_soft() => format!("Soft {}", self.total()),
            None => format!("Hard {}", self.total()),
        }
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "[]");
        }
        let cards: Vec<String> = self.cards.iter().map(Card::to_string).collect();
        write!(f, "[{}] - ", cards.join(","))?;
        if self.is_blackjack() {
            write!(f, "Blackjack!")
        } else if self.is_busted() {
            write!(f, "{} (BUST)", self.describe())
        } else {
            write!(f, "{}", self.describe())
        }
    }
}
