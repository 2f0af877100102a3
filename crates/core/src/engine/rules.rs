use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::age::{AgeGroup, AgeProfile};
use crate::domain::effect::ToneShift;
use crate::domain::goal::{CosmeticGoal, CosmeticGoalType};
use crate::domain::product::{Product, ProductCode};
use crate::engine::catalog::Catalog;

pub const FALLBACK_CODE: &str = "C1";
pub const COOL_TONE_BOOSTER: &str = "F1";

/// One slot in a goal's candidate sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Candidate {
    Code(&'static str),
    /// `primary` when it is age-allowed, otherwise `fallback`.
    Preferred { primary: &'static str, fallback: &'static str },
}

impl Candidate {
    fn resolve(&self, allowed: &BTreeMap<&ProductCode, &Arc<Product>>) -> ProductCode {
        match *self {
            Self::Code(code) => ProductCode::new(code),
            Self::Preferred { primary, fallback } => {
                let primary = ProductCode::new(primary);
                if allowed.contains_key(&primary) {
                    primary
                } else {
                    ProductCode::new(fallback)
                }
            }
        }
    }
}

const DAILY_MAINTENANCE: &[Candidate] =
    &[Candidate::Code("C1"), Candidate::Code("D1"), Candidate::Code("E1")];
const GENTLE_START: &[Candidate] =
    &[Candidate::Code("A1"), Candidate::Code("C1"), Candidate::Code("D1")];
const MINERAL_SUPPORT: &[Candidate] = &[Candidate::Code("D1"), Candidate::Code("C1")];
const EVENT_MAXIMIZE_GROWN: &[Candidate] = &[
    Candidate::Code("A2"),
    Candidate::Code("C2"),
    Candidate::Code("E1"),
    Candidate::Code("F1"),
];
const EVENT_MAXIMIZE_YOUNG: &[Candidate] =
    &[Candidate::Preferred { primary: "C2", fallback: "C1" }, Candidate::Code("E1")];

/// Static goal → candidate table. Event stacks split on whether the group is grown.
pub fn candidate_sequence(goal_type: CosmeticGoalType, group: AgeGroup) -> &'static [Candidate] {
    match (goal_type, group.is_grown()) {
        (CosmeticGoalType::DailyMaintenance, _) => DAILY_MAINTENANCE,
        (CosmeticGoalType::GentleStart, _) => GENTLE_START,
        (CosmeticGoalType::MineralSupport, _) => MINERAL_SUPPORT,
        (CosmeticGoalType::EventMaximize, true) => EVENT_MAXIMIZE_GROWN,
        (CosmeticGoalType::EventMaximize, false) => EVENT_MAXIMIZE_YOUNG,
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RecommendationInput<'a> {
    pub catalog: &'a Catalog,
    pub age_profile: AgeProfile,
    pub age_years: u32,
    pub goal: &'a CosmeticGoal,
}

pub trait RecommendationEngine: Send + Sync {
    fn recommend(&self, input: &RecommendationInput<'_>) -> Vec<ProductCode>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RuleTableRecommender;

impl RecommendationEngine for RuleTableRecommender {
    fn recommend(&self, input: &RecommendationInput<'_>) -> Vec<ProductCode> {
        recommend_stack_codes(input)
    }
}

/// Walks the goal's candidates (plus the cool-tone booster) in order, keeping
/// age-allowed codes until `max_steps` is reached. Codes past the cap are
/// dropped, never reordered. An empty outcome falls back to C1 when allowed,
/// even if `max_steps` is zero.
pub fn recommend_stack_codes(input: &RecommendationInput<'_>) -> Vec<ProductCode> {
    let allowed = input.catalog.allowed_for_age(input.age_years);
    let goal = input.goal;

    let mut candidates = candidate_sequence(goal.goal_type, input.age_profile.group)
        .iter()
        .map(|candidate| candidate.resolve(&allowed))
        .collect::<Vec<_>>();
    if goal.tone_preference == Some(ToneShift::Cool) {
        candidates.push(ProductCode::new(COOL_TONE_BOOSTER));
    }

    let mut codes: Vec<ProductCode> = Vec::with_capacity(goal.max_steps.min(candidates.len()));
    for code in candidates {
        if codes.len() >= goal.max_steps {
            break;
        }
        if allowed.contains_key(&code) && !codes.contains(&code) {
            codes.push(code);
        }
    }

    let fallback = ProductCode::new(FALLBACK_CODE);
    if codes.is_empty() && allowed.contains_key(&fallback) {
        codes.push(fallback);
    }

    codes
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{candidate_sequence, recommend_stack_codes, Candidate, RecommendationInput};
    use crate::domain::age::{AgeGroup, AgeProfile};
    use crate::domain::effect::{ProductEffect, ToneShift};
    use crate::domain::goal::{CosmeticGoal, CosmeticGoalType};
    use crate::domain::product::{Product, ProductCode, ProductSeries};
    use crate::engine::catalog::{build_default_catalog, Catalog};

    fn recommend(catalog: &Catalog, age_years: u32, goal: &CosmeticGoal) -> Vec<String> {
        recommend_stack_codes(&RecommendationInput {
            catalog,
            age_profile: AgeProfile::from_age(age_years),
            age_years,
            goal,
        })
        .into_iter()
        .map(|code| code.0)
        .collect()
    }

    #[test]
    fn table_lists_fixed_sequences_per_goal() {
        assert_eq!(
            candidate_sequence(CosmeticGoalType::DailyMaintenance, AgeGroup::Adults),
            &[Candidate::Code("C1"), Candidate::Code("D1"), Candidate::Code("E1")]
        );
        assert_eq!(
            candidate_sequence(CosmeticGoalType::MineralSupport, AgeGroup::Kids),
            &[Candidate::Code("D1"), Candidate::Code("C1")]
        );
        assert_eq!(
            candidate_sequence(CosmeticGoalType::EventMaximize, AgeGroup::Seniors)[0],
            Candidate::Code("A2")
        );
        assert_eq!(
            candidate_sequence(CosmeticGoalType::EventMaximize, AgeGroup::Teens)[0],
            Candidate::Preferred { primary: "C2", fallback: "C1" }
        );
    }

    #[test]
    fn adult_cool_event_gets_full_event_stack() {
        let goal = CosmeticGoal::new(CosmeticGoalType::EventMaximize)
            .with_tone(ToneShift::Cool)
            .with_max_steps(4)
            .with_event_hours(24);
        assert_eq!(recommend(&build_default_catalog(), 30, &goal), ["A2", "C2", "E1", "F1"]);
    }

    #[test]
    fn child_event_avoids_whitening_and_falls_back_to_c1() {
        let goal = CosmeticGoal::new(CosmeticGoalType::EventMaximize).with_max_steps(3);
        let codes = recommend(&build_default_catalog(), 10, &goal);

        assert_eq!(codes, ["C1", "E1"]);
        assert!(codes.iter().all(|code| !code.starts_with('A')));
    }

    #[test]
    fn teen_event_prefers_c2_when_allowed() {
        let goal = CosmeticGoal::new(CosmeticGoalType::EventMaximize);
        assert_eq!(recommend(&build_default_catalog(), 15, &goal), ["C2", "E1"]);
    }

    #[test]
    fn cool_preference_appends_booster_once() {
        let goal = CosmeticGoal::new(CosmeticGoalType::DailyMaintenance).with_tone(ToneShift::Cool);
        assert_eq!(recommend(&build_default_catalog(), 25, &goal), ["C1", "D1", "E1", "F1"]);

        let capped = goal.clone().with_max_steps(3);
        assert_eq!(recommend(&build_default_catalog(), 25, &capped), ["C1", "D1", "E1"]);
    }

    #[test]
    fn cap_drops_trailing_candidates_without_reordering() {
        let goal = CosmeticGoal::new(CosmeticGoalType::EventMaximize).with_max_steps(2);
        assert_eq!(recommend(&build_default_catalog(), 40, &goal), ["A2", "C2"]);
    }

    #[test]
    fn gentle_start_skips_disallowed_whitening_for_teens() {
        let goal = CosmeticGoal::new(CosmeticGoalType::GentleStart);
        assert_eq!(recommend(&build_default_catalog(), 14, &goal), ["C1", "D1"]);
        assert_eq!(recommend(&build_default_catalog(), 16, &goal), ["A1", "C1", "D1"]);
    }

    #[test]
    fn zero_cap_still_yields_c1_fallback() {
        let goal = CosmeticGoal::new(CosmeticGoalType::DailyMaintenance).with_max_steps(0);
        assert_eq!(recommend(&build_default_catalog(), 30, &goal), ["C1"]);
    }

    #[test]
    fn nothing_allowed_yields_empty_stack() {
        let goal = CosmeticGoal::new(CosmeticGoalType::DailyMaintenance);
        assert!(recommend(&build_default_catalog(), 3, &goal).is_empty());
    }

    #[test]
    fn fallback_applies_when_goal_products_are_missing_from_catalog() {
        let catalog = Catalog::new(vec![Product {
            code: ProductCode::new("C1"),
            name: "DailyPolish".to_string(),
            series: ProductSeries::C,
            description: "only product".to_string(),
            effect: ProductEffect::new(0.2, 0.4, 0.0, None),
            age_min: 5,
            age_max: None,
            intensity_level: 1,
        }])
        .expect("valid catalog");
        let goal = CosmeticGoal::new(CosmeticGoalType::EventMaximize).with_max_steps(1);

        assert_eq!(recommend(&catalog, 30, &goal), ["C1"]);
    }

    fn goal_type_strategy() -> impl Strategy<Value = CosmeticGoalType> {
        prop::sample::select(CosmeticGoalType::ALL.to_vec())
    }

    fn tone_strategy() -> impl Strategy<Value = Option<ToneShift>> {
        prop_oneof![
            Just(None),
            Just(Some(ToneShift::Cool)),
            Just(Some(ToneShift::Warm)),
            Just(Some(ToneShift::Neutral)),
        ]
    }

    proptest! {
        #[test]
        fn output_respects_cap_except_for_fallback(
            goal_type in goal_type_strategy(),
            tone in tone_strategy(),
            max_steps in 0usize..6,
            age in 0u32..100,
        ) {
            let goal = CosmeticGoal { goal_type, tone_preference: tone, max_steps, target_event_hours: None };
            let codes = recommend(&build_default_catalog(), age, &goal);

            if codes.len() > max_steps {
                prop_assert_eq!(codes, vec!["C1".to_string()]);
            }
        }

        #[test]
        fn output_is_deterministic_unique_and_age_allowed(
            goal_type in goal_type_strategy(),
            tone in tone_strategy(),
            max_steps in 0usize..6,
            age in 0u32..100,
        ) {
            let catalog = build_default_catalog();
            let goal = CosmeticGoal { goal_type, tone_preference: tone, max_steps, target_event_hours: None };
            let first = recommend(&catalog, age, &goal);
            let second = recommend(&catalog, age, &goal);
            prop_assert_eq!(&first, &second);

            let mut unique = first.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), first.len());

            for code in &first {
                let product = catalog.find(&ProductCode::new(code.as_str())).expect("code from catalog");
                prop_assert!(product.is_allowed_for_age(age));
            }
        }
    }
}
