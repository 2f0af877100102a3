use std::fmt;

use serde::{Deserialize, Serialize};

/// Categorical hue adjustment. Independent of the numeric deltas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneShift {
    Cool,
    Warm,
    Neutral,
}

impl ToneShift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cool => "cool",
            Self::Warm => "warm",
            Self::Neutral => "neutral",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cool" => Some(Self::Cool),
            "warm" => Some(Self::Warm),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for ToneShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Perceptual, cosmetic-only delta produced by one product or a whole stack.
///
/// Effects form a monoid under [`ProductEffect::merge`]: numeric deltas add up
/// and the right operand's tone shift wins when it is set. `Default` is the
/// identity element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductEffect {
    pub brightness_delta: f64,
    pub gloss_delta: f64,
    pub tone_shift: Option<ToneShift>,
    pub opalescence_delta: f64,
}

impl ProductEffect {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn new(
        brightness_delta: f64,
        gloss_delta: f64,
        opalescence_delta: f64,
        tone_shift: Option<ToneShift>,
    ) -> Self {
        Self { brightness_delta, gloss_delta, tone_shift, opalescence_delta }
    }

    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            brightness_delta: self.brightness_delta + other.brightness_delta,
            gloss_delta: self.gloss_delta + other.gloss_delta,
            tone_shift: other.tone_shift.or(self.tone_shift),
            opalescence_delta: self.opalescence_delta + other.opalescence_delta,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.brightness_delta == 0.0
            && self.gloss_delta == 0.0
            && self.opalescence_delta == 0.0
            && self.tone_shift.is_none()
    }

    /// Audit-line rendering of the deltas, e.g. `Δbrightness=+0.40, ...`.
    pub fn summary(&self) -> String {
        format!(
            "Δbrightness={:+.2}, Δgloss={:+.2}, Δopal={:+.2}, tone={}",
            self.brightness_delta,
            self.gloss_delta,
            self.opalescence_delta,
            self.tone_shift.map(|tone| tone.as_str()).unwrap_or("unchanged"),
        )
    }
}

/// Left fold of `merge` starting from the identity.
pub fn fold_effects<'a, I>(effects: I) -> ProductEffect
where
    I: IntoIterator<Item = &'a ProductEffect>,
{
    effects.into_iter().fold(ProductEffect::identity(), |acc, effect| acc.merge(effect))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{fold_effects, ProductEffect, ToneShift};

    const EPSILON: f64 = 1e-9;

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() <= EPSILON
    }

    fn tone_strategy() -> impl Strategy<Value = Option<ToneShift>> {
        prop_oneof![
            Just(None),
            Just(Some(ToneShift::Cool)),
            Just(Some(ToneShift::Warm)),
            Just(Some(ToneShift::Neutral)),
        ]
    }

    prop_compose! {
        fn effect_strategy()(
            brightness in -5.0f64..5.0,
            gloss in -5.0f64..5.0,
            opal in -5.0f64..5.0,
            tone in tone_strategy(),
        ) -> ProductEffect {
            ProductEffect::new(brightness, gloss, opal, tone)
        }
    }

    proptest! {
        #[test]
        fn merge_is_associative(a in effect_strategy(), b in effect_strategy(), c in effect_strategy()) {
            let left = a.merge(&b).merge(&c);
            let right = a.merge(&b.merge(&c));

            prop_assert!(close(left.brightness_delta, right.brightness_delta));
            prop_assert!(close(left.gloss_delta, right.gloss_delta));
            prop_assert!(close(left.opalescence_delta, right.opalescence_delta));
            prop_assert_eq!(left.tone_shift, right.tone_shift);
        }

        #[test]
        fn identity_is_neutral_on_both_sides(a in effect_strategy()) {
            prop_assert_eq!(ProductEffect::identity().merge(&a), a);
            prop_assert_eq!(a.merge(&ProductEffect::identity()), a);
        }

        #[test]
        fn fold_keeps_last_specified_tone(effects in proptest::collection::vec(effect_strategy(), 0..12)) {
            let folded = fold_effects(&effects);
            let expected = effects.iter().rev().find_map(|effect| effect.tone_shift);
            prop_assert_eq!(folded.tone_shift, expected);
        }
    }

    #[test]
    fn merge_leaves_operands_untouched() {
        let a = ProductEffect::new(0.5, 0.2, 0.0, Some(ToneShift::Warm));
        let b = ProductEffect::new(0.25, 0.0, 0.1, None);
        let merged = a.merge(&b);

        assert_eq!(a, ProductEffect::new(0.5, 0.2, 0.0, Some(ToneShift::Warm)));
        assert_eq!(b, ProductEffect::new(0.25, 0.0, 0.1, None));
        assert_eq!(merged.tone_shift, Some(ToneShift::Warm));
        assert!((merged.brightness_delta - 0.75).abs() < 1e-12);
    }

    #[test]
    fn empty_fold_is_identity() {
        assert!(fold_effects(&Vec::<ProductEffect>::new()).is_identity());
    }

    #[test]
    fn summary_marks_missing_tone_as_unchanged() {
        let effect = ProductEffect::new(0.4, -0.1, 0.0, None);
        assert_eq!(effect.summary(), "Δbrightness=+0.40, Δgloss=-0.10, Δopal=+0.00, tone=unchanged");
    }

    #[test]
    fn tone_serializes_lowercase() {
        let effect = ProductEffect::new(0.0, 0.0, 0.0, Some(ToneShift::Cool));
        let value = serde_json::to_value(effect).unwrap();
        assert_eq!(value["tone_shift"], "cool");
        let unset = serde_json::to_value(ProductEffect::identity()).unwrap();
        assert!(unset["tone_shift"].is_null());
    }
}
