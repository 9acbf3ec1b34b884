//! TreeSHAP property tests against the shipped model.
//!
//! The attribution contract is the additivity law: for every input,
//! `baseline + Σ contributions` reconstructs the raw margin.

mod common;

use approx::assert_abs_diff_eq;

use hemorisk::InputVector;

use common::{load_shipped_context, DEFAULT_TOLERANCE, EXAMPLE_INPUT};

fn input_grid() -> Vec<[f32; 4]> {
    // Rows straddling every split threshold of the fixture model
    // (f0 @ 4.0, f1 @ 15.0, f2 @ 13.0, f3 @ 180.0), plus the boundaries.
    let mut rows = vec![EXAMPLE_INPUT];
    for nlr in [1.0, 4.0, 8.0] {
        for ratio in [10.0, 15.0, 25.0] {
            for width in [9.0, 13.0, 17.0] {
                for collagen in [90.0, 180.0, 400.0] {
                    rows.push([nlr, ratio, width, collagen]);
                }
            }
        }
    }
    rows
}

#[test]
fn additivity_holds_across_the_grid() {
    let ctx = load_shipped_context();

    for row in input_grid() {
        let margin = f64::from(ctx.model.forest().predict_row(&row));
        let attribution = ctx.explainer.explain_row(&row).expect("explain");

        assert_abs_diff_eq!(
            attribution.reconstructed_margin(),
            margin,
            epsilon = DEFAULT_TOLERANCE
        );
        assert_eq!(attribution.contributions.len(), 4);
    }
}

#[test]
fn attribution_is_deterministic() {
    let ctx = load_shipped_context();

    let first = ctx.explainer.explain_row(&EXAMPLE_INPUT).unwrap();
    let second = ctx.explainer.explain_row(&EXAMPLE_INPUT).unwrap();
    assert_eq!(first.baseline, second.baseline);
    assert_eq!(first.contributions, second.contributions);
}

#[test]
fn baseline_is_the_cover_weighted_expected_margin() {
    let ctx = load_shipped_context();

    // Per-tree cover-weighted leaf means of the fixture model:
    // (60·-0.4+40·0.6)/100 + (55·-0.3+45·0.5)/100 + (50·0.4+50·-0.2)/100
    //   + (70·-0.2+30·0.3)/100 = 0 + 0.06 + 0.1 - 0.05 = 0.11
    assert_abs_diff_eq!(ctx.explainer.expected_value(), 0.11, epsilon = 1e-6);
}

#[test]
fn contributions_drive_the_example_prediction_above_baseline() {
    let ctx = load_shipped_context();

    let input = InputVector::new(EXAMPLE_INPUT.to_vec(), &ctx.specs).unwrap();
    let margin = f64::from(ctx.model.margin(&input).unwrap());
    let attribution = ctx.explainer.explain_row(input.as_slice()).unwrap();

    // The example patient scores above the population baseline; the sum of
    // signed contributions accounts for exactly that gap.
    assert!(margin > attribution.baseline);
    assert_abs_diff_eq!(
        attribution.contributions.iter().sum::<f64>(),
        margin - attribution.baseline,
        epsilon = DEFAULT_TOLERANCE
    );
}

#[test]
fn stump_model_attributes_each_feature_independently() {
    // Each fixture tree splits on exactly one feature, so flipping one
    // input across its threshold must change only that feature's credit.
    let ctx = load_shipped_context();

    let low_nlr = ctx.explainer.explain_row(&[1.0, 18.0, 14.0, 200.0]).unwrap();
    let high_nlr = ctx.explainer.explain_row(&[8.0, 18.0, 14.0, 200.0]).unwrap();

    assert!(high_nlr.contributions[0] > low_nlr.contributions[0]);
    for i in 1..4 {
        assert_abs_diff_eq!(
            high_nlr.contributions[i],
            low_nlr.contributions[i],
            epsilon = 1e-9
        );
    }
}
