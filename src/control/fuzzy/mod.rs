pub mod engine;
pub mod mamdani;
pub mod membership;
pub mod presets;
pub mod rules;

pub use engine::{feed, EngineError, InferenceEngine, InputPolicy};
pub use mamdani::{MamdaniBuilder, MamdaniEngine};
pub use membership::{FuzzySet, LinguisticVariable, Membership};
pub use rules::{additive_rule_base, parse_rules, Clause, Rule};
