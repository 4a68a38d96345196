use crate::{Action, Hand};

const H: Action = Action::Hit;
const S: Action = Action::Stand;
const D: Action = Action::Double;
const P: Action = Action::Split;

const MIN_HARD_TOTAL: u8 = 5;
const MIN_SOFT_TOTAL: u8 = 13;
const MIN_PAIR_VALUE: u8 = 2;
const MIN_UP_CARD: u8 = 2;

/// Basic strategy for six decks, dealer stands on soft 17, double after split,
/// no surrender.
///
/// Columns are the dealer up card 2..=11, where 11 stands for an ace.
#[derive(Debug, Clone)]
pub struct StrategyTable {
    hard_charts: [[Action; 10]; 17],
    soft_charts: [[Action; 10]; 9],
    pair_charts: [[Action; 10]; 10],
}

impl StrategyTable {
    pub fn new() -> StrategyTable {
        StrategyTable {
            hard_charts: [
                [H, H, H, H, H, H, H, H, H, H], // 5
                [H, H, H, H, H, H, H, H, H, H],
                [H, H, H, H, H, H, H, H, H, H],
                [H, H, H, H, H, H, H, H, H, H],
                [H, D, D, D, D, H, H, H, H, H], // 9
                [D, D, D, D, D, D, D, D, H, H],
                [D, D, D, D, D, D, D, D, D, D],
                [H, H, S, S, S, H, H, H, H, H], // 12
                [S, S, S, S, S, H, H, H, H, H],
                [S, S, S, S, S, H, H, H, H, H],
                [S, S, S, S, S, H, H, H, H, H],
                [S, S, S, S, S, H, H, H, H, H], // 16
                [S, S, S, S, S, S, S, S, S, S], // 17
                [S, S, S, S, S, S, S, S, S, S],
                [S, S, S, S, S, S, S, S, S, S],
                [S, S, S, S, S, S, S, S, S, S],
                [S, S, S, S, S, S, S, S, S, S], // 21
            ],
            soft_charts: [
                [H, H, H, D, D, H, H, H, H, H], // Ace + 2
                [H, H, H, D, D, H, H, H, H, H],
                [H, H, D, D, D, H, H, H, H, H],
                [H, H, D, D, D, H, H, H, H, H],
                [H, D, D, D, D, H, H, H, H, H], // Ace + 6
                [S, D, D, D, D, S, S, H, H, H],
                [S, S, S, S, S, S, S, S, S, S],
                [S, S, S, S, S, S, S, S, S, S],
                [S, S, S, S, S, S, S, S, S, S], // Ace + 10
            ],
            pair_charts: [
                [H, H, P, P, P, P, H, H, H, H], // Double 2
                [H, H, P, P, P, P, H, H, H, H],
                [H, H, H, P, P, H, H, H, H, H],
                [D, D, D, D, D, D, D, D, H, H],
                [H, P, P, P, P, H, H, H, H, H],
                [P, P, P, P, P, P, H, H, H, H],
                [P, P, P, P, P, P, P, P, P, P],
                [P, P, P, P, P, S, P, P, S, S],
                [S, S, S, S, S, S, S, S, S, S], // Double 10
                [P, P, P, P, P, P, P, P, P, P], // Double Ace
            ],
        }
    }

    /// Basic strategy action for `hand` against the dealer up card value.
    /// Anything the charts do not cover is a hit.
    pub fn lookup(&self, hand: &Hand, dealer_up_card: u8, can_double: bool) -> Action {
        if hand.is_busted() || hand.is_blackjack() {
            return S;
        }

        let entry = if let Some(pair_value) = hand.pair_value() {
            chart_entry(&self.pair_charts, pair_value, MIN_PAIR_VALUE, dealer_up_card)
        } else if hand.is_soft() {
            chart_entry(&self.soft_charts, hand.total(), MIN_SOFT_TOTAL, dealer_up_card)
        } else {
            chart_entry(&self.hard_charts, hand.total(), MIN_HARD_TOTAL, dealer_up_card)
        };
        let action = entry.unwrap_or(H);

        if action == D && !can_double {
            H
        } else {
            action
        }
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        StrategyTable::new()
    }
}

fn chart_entry<const ROWS: usize>(
    chart: &[[Action; 10]; ROWS],
    row_key: u8,
    min_row_key: u8,
    dealer_up_card: u8,
) -> Option<Action> {
    let row = row_key.checked_sub(min_row_key)? as usize;
    let col = dealer_up_card.checked_sub(MIN_UP_CARD)? as usize;
    chart.get(row)?.get(col).copied()
}
