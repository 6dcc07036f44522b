use std::f64::consts::PI;

use super::engine::EngineError;
use super::mamdani::MamdaniEngine;
use super::membership::{FuzzySet, LinguisticVariable, Membership};
use super::rules::additive_rule_base;

pub const ERROR: &str = "error";
pub const D_ERROR: &str = "d_error";
pub const I_ERROR: &str = "i_error";
pub const U_OUT: &str = "u_out";

const FIVE_TERMS: &[&str] = &["BM", "SM", "Z", "SP", "BP"];
const SEVEN_TERMS: &[&str] = &["BM", "MM", "SM", "Z", "SP", "MP", "BP"];

/// Largest derivative (and integral) magnitude the rule bases reason about.
const BIG_RATE: f64 = 3.0;
/// Output universe half-width, in volts.
const U_AMP: f64 = 10.0;

/// Seven evenly spaced triangles over `[-amp, amp]` with shoulders at the ends.
fn seven_triangles(name: &str, amp: f64) -> LinguisticVariable {
    let w = 2.0 / 3.0 * amp;
    let peaks = [-1.5 * w, -w, -0.5 * w, 0.0, 0.5 * w, w, 1.5 * w];
    let sets = SEVEN_TERMS
        .iter()
        .zip(peaks.iter())
        .map(|(term, &b)| {
            let b = b.clamp(-amp, amp);
            let a = (b - 0.5 * w).max(-amp);
            let c = (b + 0.5 * w).min(amp);
            FuzzySet::new(*term, Membership::triangular(a, b, c))
        })
        .collect();
    LinguisticVariable::new(name, -amp, amp, sets)
}

fn pd_error() -> LinguisticVariable {
    LinguisticVariable::new(
        ERROR,
        -PI,
        PI,
        vec![
            FuzzySet::new("BM", Membership::trapezoidal(-PI, -PI, -PI / 2.0, -PI / 12.0)),
            FuzzySet::new("SM", Membership::triangular(-PI / 2.0, -PI / 4.0, 0.0)),
            FuzzySet::new("Z", Membership::triangular(-PI / 12.0, 0.0, PI / 12.0)),
            FuzzySet::new("SP", Membership::triangular(0.0, PI / 4.0, PI / 2.0)),
            FuzzySet::new("BP", Membership::trapezoidal(PI / 12.0, PI / 2.0, PI, PI)),
        ],
    )
}

/// Terms break at ±1 and ±2 rad/s (thirds of [`BIG_RATE`]); the big terms
/// stay saturated out to ±π.
fn pd_error_rate() -> LinguisticVariable {
    let b = BIG_RATE;
    LinguisticVariable::new(
        D_ERROR,
        -PI,
        PI,
        vec![
            FuzzySet::new("BM", Membership::trapezoidal(-PI, -PI, -2.0 / 3.0 * b, -1.0 / 3.0 * b)),
            FuzzySet::new("SM", Membership::triangular(-2.0 / 3.0 * b, -1.0 / 3.0 * b, 0.0)),
            FuzzySet::new("Z", Membership::triangular(-1.0 / 3.0 * b, 0.0, 1.0 / 3.0 * b)),
            FuzzySet::new("SP", Membership::triangular(0.0, 1.0 / 3.0 * b, 2.0 / 3.0 * b)),
            FuzzySet::new("BP", Membership::trapezoidal(1.0 / 3.0 * b, 2.0 / 3.0 * b, PI, PI)),
        ],
    )
}

// ---------------------------------------------------------------------------
// Preset fuzzy systems
// ---------------------------------------------------------------------------

/// Fuzzy PD system: `error` (5 terms on [-π, π]) and `d_error` (5 terms on
/// [-π, π]) to `u_out` (7 terms on [-10, 10]), defuzzified over 10 points.
pub fn pd_engine() -> Result<MamdaniEngine, EngineError> {
    let rules = additive_rule_base(&[(ERROR, FIVE_TERMS), (D_ERROR, FIVE_TERMS)], (U_OUT, SEVEN_TERMS));
    MamdaniEngine::builder()
        .input(pd_error())
        .input(pd_error_rate())
        .output(seven_triangles(U_OUT, U_AMP))
        .rules(rules)
        .subdivisions(10)
        .build()
}

/// Fuzzy PID system: `error` (7 terms on [-π, π]), `d_error` and `i_error`
/// (7 terms on [-3, 3]) to `u_out` (7 terms on [-10, 10]), defuzzified over
/// 20 points.
pub fn pid_engine() -> Result<MamdaniEngine, EngineError> {
    let rules = additive_rule_base(
        &[(ERROR, SEVEN_TERMS), (D_ERROR, SEVEN_TERMS), (I_ERROR, SEVEN_TERMS)],
        (U_OUT, SEVEN_TERMS),
    );
    MamdaniEngine::builder()
        .input(seven_triangles(ERROR, PI))
        .input(seven_triangles(D_ERROR, BIG_RATE))
        .input(seven_triangles(I_ERROR, BIG_RATE))
        .output(seven_triangles(U_OUT, U_AMP))
        .rules(rules)
        .subdivisions(20)
        .build()
}
