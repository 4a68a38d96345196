use bj_advisor_macros::allowed_phase;

use crate::{
    Advice, Advisor, AdvisorError, Card, CountInfo, Hand, HandSequence, InsuranceAdvice, Outcome,
    Result, Rules, Shoe,
};

/// The dealer draws below this total.
const DEALER_STAND_TOTAL: u8 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePhase {
    Idle,
    InRound,
}

/// The dealer's cards for the current round, in the order they were seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealerHand {
    upcard: Option<Card>,
    hole_card: Option<Card>,
    hit_cards: Vec<Card>,
}

impl DealerHand {
    pub fn upcard(&self) -> Option<Card> {
        self.upcard
    }

    pub fn hole_card(&self) -> Option<Card> {
        self.hole_card
    }

    pub fn hit_cards(&self) -> &[Card] {
        &self.hit_cards
    }

    /// Blackjack value of the upcard, 11 for an ace.
    pub fn upcard_value(&self) -> Option<u8> {
        self.upcard.map(|card| card.blackjack_value())
    }

    pub fn shows_ace(&self) -> bool {
        self.upcard.map_or(false, |card| card.is_ace())
    }

    pub fn hand(&self) -> Hand {
        let cards = self
            .upcard
            .iter()
            .chain(self.hole_card.iter())
            .chain(self.hit_cards.iter())
            .copied()
            .collect();
        Hand::from_cards(cards)
    }

    /// Whether the dealer draws another card: below 17, and on soft 17 unless
    /// the dealer stands there.
    pub fn must_hit(&self, stands_soft_17: bool) -> bool {
        let hand = self.hand();
        let total = hand.total();
        total < DEALER_STAND_TOTAL
            || (total == DEALER_STAND_TOTAL && hand.is_soft() && !stands_soft_17)
    }

    pub fn reset(&mut self) {
        *self = DealerHand::default();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Seat {
    id: String,
    is_user: bool,
    hands: HandSequence,
}

impl Seat {
    fn new(id: &str, is_user: bool) -> Seat {
        Seat {
            id: id.to_string(),
            is_user,
            hands: HandSequence::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_user(&self) -> bool {
        self.is_user
    }

    pub fn hands(&self) -> &HandSequence {
        &self.hands
    }

    pub fn current_hand(&self) -> &Hand {
        self.hands.current_hand()
    }
}

/// Everything known about one table: rules, shoe, dealer and seats.
///
/// Every card entered here is also dealt into the shoe, and every retraction
/// takes it back out, so the count always matches the cards on the felt.
#[derive(Debug, Clone)]
pub struct Table {
    rules: Rules,
    shoe: Shoe,
    dealer: DealerHand,
    seats: Vec<Seat>,
    phase: TablePhase,
}

impl Table {
    pub fn new(rules: Rules) -> Result<Table> {
        rules.validate()?;
        Ok(Table {
            rules,
            shoe: Shoe::from_rules(&rules),
            dealer: DealerHand::default(),
            seats: Vec::new(),
            phase: TablePhase::Idle,
        })
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn dealer(&self) -> &DealerHand {
        &self.dealer
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn phase(&self) -> TablePhase {
        self.phase
    }

    pub fn count_info(&self) -> CountInfo {
        self.shoe.count_info()
    }

    pub fn seat(&self, seat_id: &str) -> Result<&Seat> {
        self.seats
            .iter()
            .find(|seat| seat.id == seat_id)
            .ok_or_else(|| AdvisorError::UnknownSeat(seat_id.to_string()))
    }

    fn seat_mut(&mut self, seat_id: &str) -> Result<&mut Seat> {
        self.seats
            .iter_mut()
            .find(|seat| seat.id == seat_id)
            .ok_or_else(|| AdvisorError::UnknownSeat(seat_id.to_string()))
    }

    /// Seats are played in the order they were added.
    #[allowed_phase(Idle)]
    pub fn add_seat(&mut self, seat_id: &str, is_user: bool) -> Result<()> {
        if self.seats.iter().any(|seat| seat.id == seat_id) {
            return Err(AdvisorError::DuplicateSeat(seat_id.to_string()));
        }
        self.seats.push(Seat::new(seat_id, is_user));
        Ok(())
    }

    /// Clears the dealer and gives every seat one empty hand.
    #[allowed_phase(Idle)]
    pub fn start_round(&mut self) -> Result<()> {
        if self.shoe.needs_shuffle() {
            log::warn!(
                "penetration {:.1}% reached, shuffle before the next round",
                self.shoe.penetration() * 100.0
            );
        }
        self.dealer.reset();
        for seat in &mut self.seats {
            seat.hands = HandSequence::new();
        }
        self.phase = TablePhase::InRound;
        log::info!("round started with {} seats, {}", self.seats.len(), self.shoe.count_info());
        Ok(())
    }

    #[allowed_phase(InRound)]
    pub fn end_round(&mut self) -> Result<()> {
        self.phase = TablePhase::Idle;
        log::info!("round ended, {}", self.shoe.count_info());
        Ok(())
    }

    #[allowed_phase(InRound)]
    pub fn add_card_to_player(&mut self, seat_id: &str, card: Card) -> Result<()> {
        self.seat_mut(seat_id)?.hands.add_card_to_current(card);
        self.shoe.deal(card);
        Ok(())
    }

    /// Like [`Table::add_card_to_player`], but refuses a card the split-aces
    /// rule does not allow. Nothing is dealt into the shoe on refusal.
    #[allowed_phase(InRound)]
    pub fn add_card_to_player_checked(&mut self, seat_id: &str, card: Card) -> Result<()> {
        let split_aces_one_card = self.rules.split_aces_one_card;
        self.seat(seat_id)?
            .hands
            .check_card_limit(split_aces_one_card)?;
        self.add_card_to_player(seat_id, card)
    }

    #[allowed_phase(InRound)]
    pub fn add_dealer_upcard(&mut self, card: Card) -> Result<()> {
        if let Some(upcard) = self.dealer.upcard {
            return Err(AdvisorError::InvalidCardState(format!(
                "dealer upcard is already {}",
                upcard
            )));
        }
        self.dealer.upcard = Some(card);
        self.shoe.deal(card);
        Ok(())
    }

    #[allowed_phase(InRound)]
    pub fn add_dealer_hole_card(&mut self, card: Card) -> Result<()> {
        if let Some(hole_card) = self.dealer.hole_card {
            return Err(AdvisorError::InvalidCardState(format!(
                "dealer hole card is already {}",
                hole_card
            )));
        }
        self.dealer.hole_card = Some(card);
        self.shoe.deal(card);
        Ok(())
    }

    #[allowed_phase(InRound)]
    pub fn add_dealer_hit_card(&mut self, card: Card) -> Result<()> {
        self.dealer.hit_cards.push(card);
        self.shoe.deal(card);
        Ok(())
    }

    /// Takes back the last card given to the seat's current hand.
    #[allowed_phase(InRound)]
    pub fn retract_player_card(&mut self, seat_id: &str) -> Result<Card> {
        let card = self
            .seat_mut(seat_id)?
            .hands
            .remove_last_card_from_current()?;
        if let Err(err) = self.shoe.retract(card) {
            self.seat_mut(seat_id)?.hands.add_card_to_current(card);
            return Err(err);
        }
        Ok(card)
    }

    #[allowed_phase(InRound)]
    pub fn retract_dealer_upcard(&mut self) -> Result<Card> {
        let card = self.dealer.upcard.ok_or_else(|| {
            AdvisorError::InvalidCardState(String::from("dealer has no upcard"))
        })?;
        self.shoe.retract(card)?;
        self.dealer.upcard = None;
        Ok(card)
    }

    #[allowed_phase(InRound)]
    pub fn retract_dealer_hole_card(&mut self) -> Result<Card> {
        let card = self.dealer.hole_card.ok_or_else(|| {
            AdvisorError::InvalidCardState(String::from("dealer has no hole card"))
        })?;
        self.shoe.retract(card)?;
        self.dealer.hole_card = None;
        Ok(card)
    }

    #[allowed_phase(InRound)]
    pub fn retract_dealer_hit_card(&mut self) -> Result<Card> {
        let card = self.dealer.hit_cards.last().copied().ok_or_else(|| {
            AdvisorError::InvalidCardState(String::from("dealer has no hit cards"))
        })?;
        self.shoe.retract(card)?;
        self.dealer.hit_cards.pop();
        Ok(card)
    }

    #[allowed_phase(InRound)]
    pub fn split_player_hand(&mut self, seat_id: &str) -> Result<()> {
        let max_hands = self.rules.max_split_hands as usize;
        self.seat_mut(seat_id)?.hands.split_current(max_hands)
    }

    #[allowed_phase(InRound)]
    pub fn complete_player_hand(&mut self, seat_id: &str) -> Result<()> {
        self.seat_mut(seat_id)?.hands.complete_current();
        Ok(())
    }

    /// Card limit of the seat's current hand under the split-aces rule.
    pub fn current_hand_card_limit(&self, seat_id: &str) -> Result<Option<usize>> {
        let hands = &self.seat(seat_id)?.hands;
        Ok(hands.card_limit(hands.current_index(), self.rules.split_aces_one_card))
    }

    #[allowed_phase(InRound)]
    pub fn advise(&self, seat_id: &str, advisor: &Advisor) -> Result<Advice> {
        let dealer_upcard = self.dealer.upcard_value().ok_or_else(|| {
            AdvisorError::InvalidCardState(String::from("dealer upcard is not known yet"))
        })?;
        let hands = &self.seat(seat_id)?.hands;
        let hand = hands.current_hand();
        let can_double =
            hand.can_double() && (!hands.has_splits() || self.rules.double_after_split);
        let can_split = hands.can_split_current(self.rules.max_split_hands as usize);
        Ok(advisor.get_advice(
            hand,
            dealer_upcard,
            self.shoe.true_count(),
            can_double,
            can_split,
        ))
    }

    pub fn dealer_must_hit(&self) -> bool {
        self.dealer.must_hit(self.rules.dealer_stands_soft_17)
    }

    /// Settles every hand of the seat against the dealer. A busted hand loses
    /// right away; the others need the dealer to have finished drawing. A
    /// two-card 21 after a split pays as an ordinary 21.
    #[allowed_phase(InRound)]
    pub fn outcomes(&self, seat_id: &str) -> Result<Vec<Outcome>> {
        let hands = &self.seat(seat_id)?.hands;
        let dealer_done = self.dealer.hole_card.is_some() && !self.dealer_must_hit();
        let dealer = self.dealer.hand();
        hands
            .all_hands()
            .iter()
            .map(|hand| {
                if hand.is_busted() {
                    Ok(Outcome::Bust)
                } else if !dealer_done {
                    Err(AdvisorError::InvalidCardState(String::from(
                        "dealer has not finished drawing",
                    )))
                } else {
                    Ok(hand.settle(!hands.has_splits() && hand.is_blackjack(), &dealer))
                }
            })
            .collect()
    }

    #[allowed_phase(InRound)]
    pub fn insurance_advice(&self, advisor: &Advisor) -> Result<InsuranceAdvice> {
        if !self.dealer.shows_ace() {
            return Err(AdvisorError::InvalidCardState(String::from(
                "insurance is only offered against a dealer ace",
            )));
        }
        Ok(advisor.get_insurance_advice(self.shoe.true_count()))
    }

    /// Only between rounds: retraction matches cards by rank, so a shuffle
    /// under cards still on the felt would let a retraction take out the
    /// wrong card.
    #[allowed_phase(Idle)]
    pub fn shuffle(&mut self) -> Result<()> {
        self.shoe.shuffle();
        Ok(())
    }
}
