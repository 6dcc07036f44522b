use super::engine::EngineError;

/// Membership function of a fuzzy set.
///
/// Shoulders are allowed: `a == b` (or `c == d`) gives full membership at the
/// edge instead of a ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Membership {
    Triangular { a: f64, b: f64, c: f64 },
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
}

impl Membership {
    pub fn triangular(a: f64, b: f64, c: f64) -> Self {
        Membership::Triangular { a, b, c }
    }

    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Self {
        Membership::Trapezoidal { a, b, c, d }
    }

    /// Degree of membership of `x`, in `[0, 1]`.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Membership::Triangular { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            Membership::Trapezoidal { a, b, c, d } => {
                if x < a || x > d {
                    0.0
                } else if x >= b && x <= c {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
        }
    }

    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        let points = match *self {
            Membership::Triangular { a, b, c } => vec![a, b, c],
            Membership::Trapezoidal { a, b, c, d } => vec![a, b, c, d],
        };
        let ordered = points.windows(2).all(|w| w[0] <= w[1]);
        if points.iter().all(|p| p.is_finite()) && ordered {
            Ok(())
        } else {
            Err(EngineError::InvalidDefinition(format!("membership points out of order: {points:?}")))
        }
    }
}

/// A named fuzzy set ("term") of a linguistic variable.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzySet {
    pub term: String,
    pub membership: Membership,
}

impl FuzzySet {
    pub fn new(term: impl Into<String>, membership: Membership) -> Self {
        Self { term: term.into(), membership }
    }
}

/// A linguistic variable: a universe of discourse covered by fuzzy sets.
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub sets: Vec<FuzzySet>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, min: f64, max: f64, sets: Vec<FuzzySet>) -> Self {
        Self { name: name.into(), min, max, sets }
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.sets.iter().position(|s| s.term == term)
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        if !(self.min.is_finite() && self.max.is_finite() && self.min < self.max) {
            return Err(EngineError::InvalidDefinition(format!(
                "variable `{}` has an empty universe [{}, {}]",
                self.name, self.min, self.max
            )));
        }
        if self.sets.is_empty() {
            return Err(EngineError::InvalidDefinition(format!("variable `{}` has no fuzzy sets", self.name)));
        }
        for set in &self.sets {
            set.membership.validate()?;
        }
        Ok(())
    }
}
