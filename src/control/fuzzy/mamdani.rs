use super::engine::{EngineError, InferenceEngine};
use super::membership::LinguisticVariable;
use super::rules::Rule;

/// Rule with variable and term names resolved to indices.
#[derive(Debug, Clone)]
struct CompiledRule {
    antecedents: Vec<(usize, usize)>, // (input index, term index)
    consequent: usize,                // output term index
}

// ---------------------------------------------------------------------------
// Mamdani engine: min for AND, max aggregation, sampled centroid
// ---------------------------------------------------------------------------

/// Mamdani-style fuzzy inference system with one output variable.
///
/// Rule firing strength is the minimum of its antecedent memberships. Each
/// rule clips its consequent set at that strength, clipped sets are combined
/// with max, and the result is defuzzified by its centroid, sampled at
/// `subdivisions` evenly spaced points across the output universe.
#[derive(Debug, Clone)]
pub struct MamdaniEngine {
    inputs: Vec<LinguisticVariable>,
    output: LinguisticVariable,
    rules: Vec<CompiledRule>,
    values: Vec<Option<f64>>,
    subdivisions: usize,
}

impl MamdaniEngine {
    pub fn builder() -> MamdaniBuilder {
        MamdaniBuilder::new()
    }

    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn input_index(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|v| v.name == name)
    }
}

impl InferenceEngine for MamdaniEngine {
    fn set_input(&mut self, name: &str, value: f64) -> Result<(), EngineError> {
        let idx = self
            .input_index(name)
            .ok_or_else(|| EngineError::UnknownVariable(name.to_string()))?;
        let var = &self.inputs[idx];
        if !var.contains(value) {
            return Err(EngineError::OutOfUniverse {
                name: name.to_string(),
                value,
                min: var.min,
                max: var.max,
            });
        }
        self.values[idx] = Some(value);
        Ok(())
    }

    fn infer(&mut self) -> Result<f64, EngineError> {
        let mut crisp = Vec::with_capacity(self.inputs.len());
        for (var, value) in self.inputs.iter().zip(&self.values) {
            crisp.push(value.ok_or_else(|| EngineError::MissingInput(var.name.clone()))?);
        }

        // Strongest activation per output term.
        let mut activation = vec![0.0_f64; self.output.sets.len()];
        for rule in &self.rules {
            let strength = rule
                .antecedents
                .iter()
                .map(|&(v, t)| self.inputs[v].sets[t].membership.degree(crisp[v]))
                .fold(1.0_f64, f64::min);
            activation[rule.consequent] = activation[rule.consequent].max(strength);
        }

        let (lo, hi) = (self.output.min, self.output.max);
        let n = self.subdivisions;
        let mut num = 0.0;
        let mut den = 0.0;
        for i in 0..n {
            let y = lo + (hi - lo) * i as f64 / (n - 1) as f64;
            let mu = self
                .output
                .sets
                .iter()
                .zip(&activation)
                .map(|(set, &a)| set.membership.degree(y).min(a))
                .fold(0.0_f64, f64::max);
            num += mu * y;
            den += mu;
        }

        if den <= 0.0 {
            return Err(EngineError::NoRuleFired);
        }
        Ok(num / den)
    }

    fn input_universe(&self, name: &str) -> Option<(f64, f64)> {
        self.input_index(name).map(|i| (self.inputs[i].min, self.inputs[i].max))
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct MamdaniBuilder {
    inputs: Vec<LinguisticVariable>,
    output: Option<LinguisticVariable>,
    rules: Vec<Rule>,
    subdivisions: usize,
}

impl MamdaniBuilder {
    pub fn new() -> Self {
        Self { inputs: vec![], output: None, rules: vec![], subdivisions: 100 }
    }

    pub fn input(mut self, var: LinguisticVariable) -> Self { self.inputs.push(var); self }
    pub fn output(mut self, var: LinguisticVariable) -> Self { self.output = Some(var); self }
    pub fn rules(mut self, rules: Vec<Rule>) -> Self { self.rules.extend(rules); self }
    pub fn subdivisions(mut self, n: usize) -> Self { self.subdivisions = n; self }

    pub fn build(self) -> Result<MamdaniEngine, EngineError> {
        let output = self
            .output
            .ok_or_else(|| EngineError::InvalidDefinition("no output variable".into()))?;
        output.validate()?;
        if self.inputs.is_empty() {
            return Err(EngineError::InvalidDefinition("no input variables".into()));
        }
        for var in &self.inputs {
            var.validate()?;
        }
        if self.subdivisions < 2 {
            return Err(EngineError::InvalidDefinition(format!(
                "subdivisions must be >= 2, got {}",
                self.subdivisions
            )));
        }
        if self.rules.is_empty() {
            return Err(EngineError::InvalidDefinition("empty rule base".into()));
        }

        let rules = self
            .rules
            .iter()
            .map(|rule| compile(rule, &self.inputs, &output))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MamdaniEngine {
            values: vec![None; self.inputs.len()],
            inputs: self.inputs,
            output,
            rules,
            subdivisions: self.subdivisions,
        })
    }
}

impl Default for MamdaniBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(
    rule: &Rule,
    inputs: &[LinguisticVariable],
    output: &LinguisticVariable,
) -> Result<CompiledRule, EngineError> {
    let antecedents = rule
        .antecedents
        .iter()
        .map(|clause| {
            let v = inputs
                .iter()
                .position(|var| var.name == clause.variable)
                .ok_or_else(|| EngineError::UnknownVariable(clause.variable.clone()))?;
            let t = inputs[v].term_index(&clause.term).ok_or_else(|| {
                EngineError::InvalidDefinition(format!("`{}` has no term `{}`", clause.variable, clause.term))
            })?;
            Ok((v, t))
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    if rule.consequent.variable != output.name {
        return Err(EngineError::UnknownVariable(rule.consequent.variable.clone()));
    }
    let consequent = output.term_index(&rule.consequent.term).ok_or_else(|| {
        EngineError::InvalidDefinition(format!("`{}` has no term `{}`", output.name, rule.consequent.term))
    })?;

    Ok(CompiledRule { antecedents, consequent })
}
