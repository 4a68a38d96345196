use std::collections::BTreeSet;

use crate::{AdvisorError, Card, Hand, Result, Rules};

/// Cards a hand produced by splitting aces may hold when the one-card rule is on.
const SPLIT_ACE_CARD_LIMIT: usize = 2;

/// A non-empty, ordered run of hands played left to right, with a cursor on the
/// hand currently awaiting a decision.
///
/// A seat that never splits is simply a sequence of length one.
#[derive(Debug, Clone, PartialEq)]
pub struct HandSequence {
    hands: Vec<Hand>,
    cursor: usize,
    completed: BTreeSet<usize>,
}

impl HandSequence {
    pub fn new() -> HandSequence {
        HandSequence::with_hand(Hand::new())
    }

    pub fn with_hand(hand: Hand) -> HandSequence {
        HandSequence {
            hands: vec![hand],
            cursor: 0,
            completed: BTreeSet::new(),
        }
    }

    pub fn current_hand(&self) -> &Hand {
        &self.hands[self.cursor]
    }

    pub fn current_index(&self) -> usize {
        self.cursor
    }

    pub fn all_hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn has_splits(&self) -> bool {
        self.hands.len() > 1
    }

    pub fn is_hand_complete(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    pub fn is_complete(&self) -> bool {
        self.completed.len() == self.hands.len()
    }

    pub fn add_card_to_current(&mut self, card: Card) {
        self.hands[self.cursor].add_card(card);
    }

    pub fn remove_last_card_from_current(&mut self) -> Result<Card> {
        self.hands[self.cursor].remove_last_card()
    }

    pub fn can_split_current(&self, max_hands: usize) -> bool {
        self.current_hand().is_pair() && self.hands.len() < max_hands
    }

    /// Replaces the current pair with two one-card hands, the second placed
    /// right after the first. The cursor stays on the first.
    pub fn split_current(&mut self, max_hands: usize) -> Result<()> {
        let current = self.current_hand();
        if !current.is_pair() {
            return Err(AdvisorError::InvalidSplit(format!(
                "{} is not a pair",
                current.describe()
            )));
        }
        if self.hands.len() >= max_hands {
            return Err(AdvisorError::InvalidSplit(format!(
                "already playing the maximum of {} hands",
                max_hands
            )));
        }

        let cards = current.cards();
        let (first, second) = (cards[0], cards[1]);
        self.hands[self.cursor] = Hand::from_cards(vec![first]);
        self.hands
            .insert(self.cursor + 1, Hand::from_cards(vec![second]));
        let cursor = self.cursor;
        self.completed = self
            .completed
            .iter()
            .map(|&index| if index > cursor { index + 1 } else { index })
            .collect();

        log::debug!(
            "split {}{} at hand {}, now {} hands",
            first,
            second,
            cursor,
            self.hands.len()
        );
        Ok(())
    }

    /// Finishes the current hand and moves to the lowest-indexed hand that is
    /// still open, scanning from the left. The cursor does not move once every
    /// hand is finished.
    pub fn complete_current(&mut self) {
        self.completed.insert(self.cursor);
        if let Some(next) = (0..self.hands.len()).find(|index| !self.completed.contains(index)) {
            self.cursor = next;
        }
    }

    /// Maximum number of cards the hand at `index` may hold, if limited.
    pub fn card_limit(&self, index: usize, split_aces_one_card: bool) -> Option<usize> {
        let hand = self.hands.get(index)?;
        let from_split_aces = self.has_splits()
            && hand.cards().first().map_or(false, |card| card.is_ace());
        if split_aces_one_card && from_split_aces {
            Some(SPLIT_ACE_CARD_LIMIT)
        } else {
            None
        }
    }

    /// Fails when the current hand is already at its card limit.
    pub fn check_card_limit(&self, split_aces_one_card: bool) -> Result<()> {
        let index = self.current_index();
        match self.card_limit(index, split_aces_one_card) {
            Some(limit) if self.current_hand().len() >= limit => {
                Err(AdvisorError::InvalidCardState(format!(
                    "split ace hand {} already holds {} cards",
                    index, limit
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for HandSequence {
    fn default() -> Self {
        HandSequence::new()
    }
}

/// The hands produced by splitting a pair.
///
/// Always holds at least two hands and never more than the split limit it was
/// created with.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitState {
    hands: HandSequence,
    max_split_hands: usize,
    split_aces_one_card: bool,
}

impl SplitState {
    pub fn new(hand: &Hand, rules: &Rules) -> Result<SplitState> {
        let mut state = SplitState::with_max_hands(hand, rules.max_split_hands as usize)?;
        state.split_aces_one_card = rules.split_aces_one_card;
        Ok(state)
    }

    /// Splits a two-card pair into two one-card hands.
    pub fn with_max_hands(hand: &Hand, max_split_hands: usize) -> Result<SplitState> {
        if !hand.is_pair() {
            return Err(AdvisorError::InvalidSplit(String::from(
                "only a two-card pair can be split",
            )));
        }
        let mut hands = HandSequence::with_hand(hand.clone());
        hands.split_current(max_split_hands)?;
        Ok(SplitState {
            hands,
            max_split_hands,
            split_aces_one_card: false,
        })
    }

    pub fn max_split_hands(&self) -> usize {
        self.max_split_hands
    }

    pub fn current_hand(&self) -> &Hand {
        self.hands.current_hand()
    }

    pub fn current_index(&self) -> usize {
        self.hands.current_index()
    }

    pub fn all_hands(&self) -> &[Hand] {
        self.hands.all_hands()
    }

    pub fn is_complete(&self) -> bool {
        self.hands.is_complete()
    }

    pub fn is_hand_complete(&self, index: usize) -> bool {
        self.hands.is_hand_complete(index)
    }

    pub fn add_card_to_current(&mut self, card: Card) {
        self.hands.add_card_to_current(card);
    }

    /// Like [`SplitState::add_card_to_current`], but refuses a card the
    /// split-aces rule does not allow.
    pub fn add_card_checked(&mut self, card: Card) -> Result<()> {
        self.hands.check_card_limit(self.split_aces_one_card)?;
        self.hands.add_card_to_current(card);
        Ok(())
    }

    pub fn card_limit(&self, index: usize) -> Option<usize> {
        self.hands.card_limit(index, self.split_aces_one_card)
    }

    pub fn can_split_current(&self) -> bool {
        self.hands.can_split_current(self.max_split_hands)
    }

    pub fn split_current(&mut self) -> Result<()> {
        self.hands.split_current(self.max_split_hands)
    }

    pub fn complete_current(&mut self) {
        self.hands.complete_current();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::parse_cards;

    fn hand(list: &str) -> Hand {
        Hand::from_cards(parse_cards(list).unwrap())
    }

    fn ranks(hand: &Hand) -> String {
        hand.cards().iter().map(Card::to_string).collect()
    }

    #[test]
    fn split_eights() {
        let state = SplitState::with_max_hands(&hand("8,8"), 4).unwrap();
        assert_eq!(state.all_hands().len(), 2);
        assert_eq!(state.current_index(), 0);
        assert!(!state.is_complete());
        assert_eq!(ranks(&state.all_hands()[0]), "8");
        assert_eq!(ranks(&state.all_hands()[1]), "8");
    }

    #[test]
    fn split_keeps_card_order() {
        let state = SplitState::with_max_hands(&hand("T,K"), 4).unwrap();
        assert_eq!(ranks(&state.all_hands()[0]), "T");
        assert_eq!(ranks(&state.all_hands()[1]), "K");
    }

    #[test]
    fn non_pair_cannot_be_split() {
        assert!(matches!(
            SplitState::with_max_hands(&hand("8,9"), 4),
            Err(AdvisorError::InvalidSplit(_))
        ));
        assert!(matches!(
            SplitState::with_max_hands(&hand("8,8,8"), 4),
            Err(AdvisorError::InvalidSplit(_))
        ));
        assert!(matches!(
            SplitState::with_max_hands(&hand("8,8"), 1),
            Err(AdvisorError::InvalidSplit(_))
        ));
    }

    #[test]
    fn resplit_inserts_after_current_hand() {
        let mut state = SplitState::with_max_hands(&hand("8,8"), 4).unwrap();
        state.add_card_to_current(Card::new(crate::Rank::Three));
        state.complete_current();
        assert_eq!(state.current_index(), 1);

        state.add_card_to_current(Card::new(crate::Rank::Eight));
        assert!(state.can_split_current());
        state.split_current().unwrap();

        let hands: Vec<String> = state.all_hands().iter().map(ranks).collect();
        assert_eq!(hands, vec!["83", "8", "8"]);
        assert_eq!(state.current_index(), 1);
        assert!(state.is_hand_complete(0));
        assert!(!state.is_hand_complete(2));
    }

    #[test]
    fn resplit_in_the_middle_shifts_later_hands() {
        let mut state = SplitState::with_max_hands(&hand("9,9"), 4).unwrap();
        state.add_card_to_current(Card::new(crate::Rank::Nine));
        state.split_current().unwrap();
        // [9] [9] [9], cursor on the first
        state.add_card_to_current(Card::new(crate::Rank::Two));
        state.complete_current();
        state.add_card_to_current(Card::new(crate::Rank::Nine));
        state.split_current().unwrap();

        let hands: Vec<String> = state.all_hands().iter().map(ranks).collect();
        assert_eq!(hands, vec!["92", "9", "9", "9"]);
        assert_eq!(state.current_index(), 1);
        assert!(!state.can_split_current());
    }

    #[test]
    fn split_limit_is_enforced() {
        let mut state = SplitState::with_max_hands(&hand("8,8"), 2).unwrap();
        state.add_card_to_current(Card::new(crate::Rank::Eight));
        assert!(!state.can_split_current());
        assert!(matches!(
            state.split_current(),
            Err(AdvisorError::InvalidSplit(_))
        ));
        assert_eq!(state.all_hands().len(), 2);
    }

    #[test]
    fn split_requires_pair_at_cursor() {
        let mut state = SplitState::with_max_hands(&hand("8,8"), 4).unwrap();
        state.add_card_to_current(Card::new(crate::Rank::Two));
        assert!(!state.can_split_current());
        assert!(state.split_current().is_err());
    }

    #[test]
    fn complete_only_after_every_hand() {
        let mut state = SplitState::with_max_hands(&hand("8,8"), 4).unwrap();
        state.complete_current();
        assert!(!state.is_complete());
        state.complete_current();
        assert!(state.is_complete());
        assert_eq!(state.current_index(), 1);
    }

    #[test]
    fn cursor_scans_from_the_left() {
        let mut hands = HandSequence::with_hand(hand("8,8"));
        hands.split_current(4).unwrap();
        hands.add_card_to_current(Card::new(crate::Rank::Eight));
        hands.split_current(4).unwrap();
        hands.complete_current();
        assert_eq!(hands.current_index(), 1);
        hands.complete_current();
        assert_eq!(hands.current_index(), 2);
        hands.complete_current();
        assert!(hands.is_complete());
    }

    #[test]
    fn split_aces_card_limit() {
        let rules = Rules::default();
        let mut state = SplitState::new(&hand("A,A"), &rules).unwrap();
        assert_eq!(state.card_limit(0), Some(2));
        assert_eq!(state.card_limit(1), Some(2));

        state.add_card_checked(Card::new(crate::Rank::Seven)).unwrap();
        assert!(matches!(
            state.add_card_checked(Card::new(crate::Rank::Two)),
            Err(AdvisorError::InvalidCardState(_))
        ));
        // The unchecked path leaves enforcement to the caller.
        state.add_card_to_current(Card::new(crate::Rank::Two));
        assert_eq!(state.current_hand().len(), 3);

        let eights = SplitState::new(&hand("8,8"), &rules).unwrap();
        assert_eq!(eights.card_limit(0), None);

        let relaxed = Rules {
            split_aces_one_card: false,
            ..Rules::default()
        };
        let aces = SplitState::new(&hand("A,A"), &relaxed).unwrap();
        assert_eq!(aces.card_limit(0), None);
    }
}
