use serde::Serialize;

use crate::{Action, DeviationEngine, Hand, StrategyTable};

/// Totals at or above this stand when a split cannot be carried out.
const SPLIT_FALLBACK_STAND_TOTAL: u8 = 17;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    pub action: Action,
    pub basic_strategy: Action,
    pub count_influenced: bool,
    pub true_count: f64,
    pub deviation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InsuranceAdvice {
    pub take_insurance: bool,
    pub threshold: f64,
    pub true_count: f64,
}

/// Basic strategy, then index plays, then whatever the table actually allows.
#[derive(Debug, Clone, Default)]
pub struct Advisor {
    strategy: StrategyTable,
    deviations: DeviationEngine,
}

impl Advisor {
    pub fn new() -> Advisor {
        Advisor::default()
    }

    pub fn with_parts(strategy: StrategyTable, deviations: DeviationEngine) -> Advisor {
        Advisor {
            strategy,
            deviations,
        }
    }

    pub fn strategy(&self) -> &StrategyTable {
        &self.strategy
    }

    pub fn deviations(&self) -> &DeviationEngine {
        &self.deviations
    }

    pub fn get_advice(
        &self,
        hand: &Hand,
        dealer_upcard: u8,
        true_count: f64,
        can_double: bool,
        can_split: bool,
    ) -> Advice {
        let basic = self.strategy.lookup(hand, dealer_upcard, can_double);
        let (candidate, play) =
            self.deviations
                .get_index_action(hand, dealer_upcard, true_count, basic);

        if let Some(play) = play {
            log::debug!(
                "index play {} at TC {:+.1}: {} instead of {}",
                play.name,
                true_count,
                play.index_action,
                basic
            );
        }

        let action = match candidate {
            Action::Double if !can_double => Action::Hit,
            Action::Split if !(can_split && hand.is_pair()) => {
                if hand.total() >= SPLIT_FALLBACK_STAND_TOTAL {
                    Action::Stand
                } else {
                    Action::Hit
                }
            }
            action => action,
        };

        Advice {
            action,
            basic_strategy: basic,
            count_influenced: play.is_some(),
            true_count,
            deviation: play.map(|play| play.name.to_string()),
        }
    }

    pub fn get_insurance_advice(&self, true_count: f64) -> InsuranceAdvice {
        InsuranceAdvice {
            take_insurance: self.deviations.take_insurance(true_count),
            threshold: self.deviations.insurance_threshold(),
            true_count,
        }
    }
}

impl std::fmt::Display for Advice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.action)?;
        match &self.deviation {
            Some(name) => write!(
                f,
                " (index play {} at TC {:+.1}, basic strategy says {})",
                name, self.true_count, self.basic_strategy
            ),
            None if self.action != self.basic_strategy => {
                write!(f, " (basic strategy says {})", self.basic_strategy)
            }
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for InsuranceAdvice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} insurance (TC {:+.1}, threshold {:+.1})",
            if self.take_insurance { "Take" } else { "Decline" },
            self.true_count,
            self.threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::parse_cards;
    use crate::IndexPlay;

    fn hand(list: &str) -> Hand {
        Hand::from_cards(parse_cards(list).unwrap())
    }

    #[test]
    fn sixteen_vs_ten_follows_the_count() {
        let advisor = Advisor::new();
        let sixteen = hand("T,6");

        let advice = advisor.get_advice(&sixteen, 10, 0.0, true, false);
        assert_eq!(advice.action, Action::Stand);
        assert_eq!(advice.basic_strategy, Action::Hit);
        assert!(advice.count_influenced);
        assert_eq!(advice.deviation.as_deref(), Some("16 vs 10"));

        let advice = advisor.get_advice(&sixteen, 10, -0.1, true, false);
        assert_eq!(advice.action, Action::Hit);
        assert!(!advice.count_influenced);
        assert_eq!(advice.deviation, None);
        assert_eq!(advice.true_count, -0.1);
    }

    #[test]
    fn insurance_at_three() {
        let advisor = Advisor::new();
        let take = advisor.get_insurance_advice(3.0);
        assert!(take.take_insurance);
        assert_eq!(take.threshold, 3.0);
        assert!(!advisor.get_insurance_advice(2.9).take_insurance);
        assert_eq!(
            take.to_string(),
            "Take insurance (TC +3.0, threshold +3.0)"
        );
    }

    #[test]
    fn double_demoted_without_two_cards() {
        let advisor = Advisor::new();
        // Basic strategy already demotes, so no index play is involved.
        let advice = advisor.get_advice(&hand("6,5"), 6, 0.0, false, false);
        assert_eq!(advice.action, Action::Hit);
        assert_eq!(advice.basic_strategy, Action::Hit);

        // 11 vs A doubles from TC +1; the index action is demoted too.
        let advice = advisor.get_advice(&hand("2,3,6"), 11, 2.0, false, false);
        assert_eq!(advice.action, Action::Hit);
        assert_eq!(advice.deviation.as_deref(), Some("11 vs A"));
    }

    #[test]
    fn split_demoted_when_not_allowed() {
        let advisor = Advisor::new();
        let advice = advisor.get_advice(&hand("8,8"), 10, 0.0, true, false);
        assert_eq!(advice.basic_strategy, Action::Split);
        assert_eq!(advice.action, Action::Hit);

        let advice = advisor.get_advice(&hand("A,A"), 6, 0.0, true, false);
        assert_eq!(advice.action, Action::Hit);

        let advice = advisor.get_advice(&hand("T,T"), 6, 5.0, true, false);
        assert_eq!(advice.deviation.as_deref(), Some("20 vs 6 (split)"));
        assert_eq!(advice.action, Action::Stand);

        let advice = advisor.get_advice(&hand("T,T"), 6, 5.0, true, true);
        assert_eq!(advice.action, Action::Split);
    }

    #[test]
    fn split_fallback_threshold_is_seventeen() {
        // No pair totals 16 or 17, so drive a split onto hard totals with
        // custom plays.
        let plays = vec![
            IndexPlay::hard("17 vs 2 split", "", 17, 2, 0.0, Action::Stand, Action::Split),
            IndexPlay::hard("16 vs 2 split", "", 16, 2, 0.0, Action::Stand, Action::Split),
        ];
        let advisor = Advisor::with_parts(
            StrategyTable::new(),
            DeviationEngine::with_plays(plays, 3.0).unwrap(),
        );

        let advice = advisor.get_advice(&hand("T,7"), 2, 1.0, true, true);
        assert_eq!(advice.action, Action::Stand);
        assert!(advice.count_influenced);

        let advice = advisor.get_advice(&hand("T,6"), 2, 1.0, true, true);
        assert_eq!(advice.action, Action::Hit);
    }

    #[test]
    fn advice_is_idempotent() {
        let advisor = Advisor::new();
        let cases = [("T,6", 10, 0.0), ("A,7", 3, -2.0), ("9,9", 7, 1.0), ("T,2", 4, 0.0)];
        for (list, up, tc) in cases {
            let hand = hand(list);
            assert_eq!(
                advisor.get_advice(&hand, up, tc, true, true),
                advisor.get_advice(&hand, up, tc, true, true)
            );
        }
    }

    #[test]
    fn advice_display() {
        let advisor = Advisor::new();
        let advice = advisor.get_advice(&hand("T,6"), 10, 1.0, true, false);
        assert_eq!(
            advice.to_string(),
            "Stand (index play 16 vs 10 at TC +1.0, basic strategy says Hit)"
        );
        let advice = advisor.get_advice(&hand("T,7"), 10, 1.0, true, false);
        assert_eq!(advice.to_string(), "Stand");
    }
}
