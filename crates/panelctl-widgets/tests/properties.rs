//! Property tests for control group invariants.
//!
//! Uses proptest to verify:
//! 1. Construction: the value is in range and the slider sits on its tick
//! 2. Slider moves: value = position * step + min (capped at max), text is canonical, state valid
//! 3. Text edits: valid text commits, anything else leaves value and slider alone
//! 4. Idempotence: the same valid text twice is the same as once
//! 5. Round trip: a slider value typed back in lands on the same tick

use panelctl_widgets::control_group::{ControlGroup, FieldState};
use panelctl_widgets::range::{format_value, QuantizedRange};
use panelctl_widgets::text_field::FieldTone;
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

/// (min, max, step, default) with at most a few hundred ticks.
fn arb_config() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (-1000.0..1000.0_f64, 0.5..1000.0_f64, 1u32..400, 0.0..=1.0_f64, 0.5..1.5_f64).prop_map(
        |(min, span, ticks, frac, stretch)| {
            let max = min + span;
            // Stretch the step so some ranges are not an exact multiple of it.
            let step = span / f64::from(ticks) * stretch;
            let default = (min + frac * (max - min)).clamp(min, max);
            (min, max, step, default)
        },
    )
}

fn group((min, max, step, default): (f64, f64, f64, f64)) -> ControlGroup {
    ControlGroup::new("prop", min, max, step, default).unwrap()
}

fn truncated_position(range: &QuantizedRange, value: f64) -> u32 {
    (((value - range.min()) / range.step()).trunc() as u32).min(range.tick_count())
}

// ── 1. Construction ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn construction_seeds_a_consistent_state(config in arb_config()) {
        let g = group(config);
        let range = *g.range();
        prop_assert!(range.min() <= g.value() && g.value() <= range.max());
        prop_assert_eq!(g.slider_position(), truncated_position(&range, g.value()));
        prop_assert!(g.slider_position() <= g.tick_count());
        prop_assert_eq!(g.text(), format_value(g.value()));
        prop_assert_eq!(g.state(), &FieldState::Valid);
    }

    #[test]
    fn default_outside_range_is_refused(config in arb_config(), below in any::<bool>()) {
        let (min, max, step, _) = config;
        let default = if below { min - 1.0 } else { max + 1.0 };
        prop_assert!(ControlGroup::new("prop", min, max, step, default).is_err());
    }
}

// ── 2. Slider moves ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn slider_move_commits_the_tick_value(config in arb_config(), index in any::<u32>()) {
        let mut g = group(config);
        let p = index % (g.tick_count() + 1);
        g.on_text_changed("not a number");
        g.on_slider_moved(p);

        let (min, max, step, _) = config;
        let expected = (f64::from(p) * step + min).min(max);
        prop_assert_eq!(g.value(), expected);
        prop_assert_eq!(g.slider_position(), p);
        prop_assert_eq!(g.text(), format_value(expected));
        prop_assert!(g.state().is_valid());
        prop_assert_eq!(g.tone(), FieldTone::Normal);
    }
}

// ── 3. Text edits ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn numeric_text_commits_only_in_range(config in arb_config(), frac in -1.0..2.0_f64) {
        let mut g = group(config);
        let (min, max, _, _) = config;
        let x = min + frac * (max - min);
        let text = x.to_string();
        let before = (g.value(), g.slider_position());

        g.on_text_changed(&text);
        if (min..=max).contains(&x) {
            prop_assert!(g.state().is_valid());
            prop_assert_eq!(g.value(), x);
            prop_assert_eq!(g.slider_position(), truncated_position(g.range(), x));
        } else {
            prop_assert!(!g.state().is_valid());
            prop_assert_eq!(g.tone(), FieldTone::Error);
            prop_assert_eq!((g.value(), g.slider_position()), before);
            prop_assert!(g.field_focused());
        }
        prop_assert_eq!(g.text(), text);
    }

    #[test]
    fn arbitrary_text_never_corrupts_the_value(config in arb_config(), text in "\\PC{0,12}") {
        let mut g = group(config);
        let before = (g.value(), g.slider_position());
        g.on_text_changed(&text);

        match g.range().validate(&text) {
            Ok(value) => {
                prop_assert!(g.state().is_valid());
                prop_assert_eq!(g.value(), value);
            }
            Err(_) => {
                prop_assert!(!g.state().is_valid());
                prop_assert_eq!((g.value(), g.slider_position()), before);
            }
        }
        let range = *g.range();
        prop_assert!(range.min() <= g.value() && g.value() <= range.max());
    }
}

// ── 4. Idempotence ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn same_text_twice_equals_once(config in arb_config(), frac in 0.0..=1.0_f64) {
        let (min, max, _, _) = config;
        let text = (min + frac * (max - min)).clamp(min, max).to_string();

        let mut once = group(config);
        once.on_text_changed(&text);

        let mut twice = group(config);
        twice.on_text_changed(&text);
        let second = twice.on_text_changed(&text);

        prop_assert!(second.is_none());
        prop_assert_eq!(once.value(), twice.value());
        prop_assert_eq!(once.slider_position(), twice.slider_position());
    }
}

// ── 5. Round trip ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn slider_value_typed_back_stays_within_a_tick(config in arb_config(), index in any::<u32>()) {
        let mut g = group(config);
        let p = index % (g.tick_count() + 1);
        g.on_slider_moved(p);
        let v = g.value();

        let text = g.text();
        g.on_text_changed(&text);
        prop_assert!(g.state().is_valid());
        prop_assert_eq!(g.value(), v);
        // Truncation may land one tick low when p * step + min rounds down.
        prop_assert!(g.slider_position() <= p);
        prop_assert!(p - g.slider_position() <= 1);
    }
}
