use serde::Serialize;

use crate::{AdvisorError, Card, Result, Rules};

const CARDS_PER_DECK: u16 = 52;

/// Tracks every card seen coming out of a shoe since the last shuffle and
/// derives the Hi-Lo count from it.
#[derive(Debug, Clone)]
pub struct Shoe {
    number_of_decks: u8,
    penetration_threshold: f64,
    dealt: Vec<Card>,
    running_count: i32,
}

/// Snapshot of the count, as reported to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountInfo {
    pub running_count: i32,
    pub true_count: f64,
    pub decks_remaining: f64,
    pub cards_dealt: usize,
    pub cards_remaining: i32,
    pub penetration: f64,
}

impl Shoe {
    pub fn new(number_of_decks: u8, penetration_threshold: f64) -> Shoe {
        Shoe {
            number_of_decks,
            penetration_threshold,
            dealt: Vec::with_capacity(number_of_decks as usize * CARDS_PER_DECK as usize),
            running_count: 0,
        }
    }

    pub fn from_rules(rules: &Rules) -> Shoe {
        Shoe::new(rules.number_of_decks, rules.penetration_threshold)
    }

    /// Records a card coming out of the shoe. Capacity is not enforced.
    pub fn deal(&mut self, card: Card) {
        self.dealt.push(card);
        self.running_count += card.counting_value();
    }

    /// Takes back the most recently dealt copy of `card`.
    pub fn retract(&mut self, card: Card) -> Result<()> {
        let position = self
            .dealt
            .iter()
            .rposition(|dealt| *dealt == card)
            .ok_or_else(|| {
                AdvisorError::InvalidCardState(format!("{} was never dealt from this shoe", card))
            })?;
        self.dealt.remove(position);
        self.running_count -= card.counting_value();
        Ok(())
    }

    /// Puts every card back. The count starts over from zero.
    pub fn shuffle(&mut self) {
        log::info!(
            "shuffling shoe after {} cards (running count {:+})",
            self.dealt.len(),
            self.running_count
        );
        self.dealt.clear();
        self.running_count = 0;
    }

    pub fn number_of_decks(&self) -> u8 {
        self.number_of_decks
    }

    pub fn dealt_cards(&self) -> &[Card] {
        &self.dealt
    }

    pub fn running_count(&self) -> i32 {
        self.running_count
    }

    fn capacity(&self) -> i32 {
        self.number_of_decks as i32 * CARDS_PER_DECK as i32
    }

    pub fn cards_remaining(&self) -> i32 {
        self.capacity() - self.dealt.len() as i32
    }

    pub fn decks_remaining(&self) -> f64 {
        self.cards_remaining() as f64 / CARDS_PER_DECK as f64
    }

    /// Running count per remaining deck. Zero once the shoe is exhausted.
    pub fn true_count(&self) -> f64 {
        let decks_remaining = self.decks_remaining();
        if decks_remaining <= 0.0 {
            0.0
        } else {
            self.running_count as f64 / decks_remaining
        }
    }

    pub fn penetration(&self) -> f64 {
        if self.capacity() == 0 {
            return 1.0;
        }
        self.dealt.len() as f64 / self.capacity() as f64
    }

    pub fn needs_shuffle(&self) -> bool {
        self.penetration() >= self.penetration_threshold
    }

    pub fn count_info(&self) -> CountInfo {
        CountInfo {
            running_count: self.running_count,
            true_count: self.true_count(),
            decks_remaining: self.decks_remaining(),
            cards_dealt: self.dealt.len(),
            cards_remaining: self.cards_remaining(),
            penetration: self.penetration(),
        }
    }
}

impl std::fmt::Display for CountInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RC {:+}, TC {:+.1}, decks remaining {:.1}, cards {}/{} ({:.1}% penetration)",
            self.running_count,
            self.true_count,
            self.decks_remaining,
            self.cards_dealt,
            self.cards_dealt as i32 + self.cards_remaining,
            self.penetration * 100.0
        )
    }
}
