use super::engine::EngineError;

/// One `(variable IS term)` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub variable: String,
    pub term: String,
}

impl Clause {
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self { variable: variable.into(), term: term.into() }
    }
}

/// `IF a AND b AND ... THEN consequent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub antecedents: Vec<Clause>,
    pub consequent: Clause,
}

// ---------------------------------------------------------------------------
// Rule text format
// ---------------------------------------------------------------------------

/// Parse rules written one per line as
/// `IF (error IS BM) AND (d_error IS SM) THEN (u_out IS SM)`.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_rules(text: &str) -> Result<Vec<Rule>, EngineError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(lineno, line)| parse_rule(line).map_err(|e| invalid_line(lineno, line, &e)))
        .collect()
}

fn invalid_line(lineno: usize, line: &str, reason: &str) -> EngineError {
    EngineError::InvalidDefinition(format!("rule line {lineno} `{line}`: {reason}"))
}

fn parse_rule(line: &str) -> Result<Rule, String> {
    let body = line.strip_prefix("IF").ok_or("missing IF")?;
    let (antecedent, consequent) = body.split_once(" THEN ").ok_or("missing THEN")?;

    let antecedents = antecedent
        .split(" AND ")
        .map(parse_clause)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Rule { antecedents, consequent: parse_clause(consequent)? })
}

fn parse_clause(text: &str) -> Result<Clause, String> {
    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| format!("clause `{}` must be parenthesised", text.trim()))?;
    let (variable, term) = inner
        .split_once(" IS ")
        .ok_or_else(|| format!("clause `{inner}` has no IS"))?;
    let (variable, term) = (variable.trim(), term.trim());
    if variable.is_empty() || term.is_empty() {
        return Err(format!("clause `{inner}` is incomplete"));
    }
    Ok(Clause::new(variable, term))
}

// ---------------------------------------------------------------------------
// Generated rule tables
// ---------------------------------------------------------------------------

/// Full combination table over every input term.
///
/// Terms are listed from most negative to most positive. Each input term gets
/// a centered index (e.g. `-2..=2` for five terms); the consequent is the
/// output term whose centered index equals the sum, clamped to the ends.
pub fn additive_rule_base(inputs: &[(&str, &[&str])], output: (&str, &[&str])) -> Vec<Rule> {
    let (out_name, out_terms) = output;
    if out_terms.is_empty() || inputs.iter().any(|(_, terms)| terms.is_empty()) {
        return Vec::new();
    }
    let out_center = (out_terms.len() as i64 - 1) / 2;

    let mut combos: Vec<Vec<usize>> = vec![Vec::new()];
    for (_, terms) in inputs {
        combos = combos
            .into_iter()
            .flat_map(|prefix| {
                (0..terms.len()).map(move |i| {
                    let mut next = prefix.clone();
                    next.push(i);
                    next
                })
            })
            .collect();
    }

    combos
        .into_iter()
        .map(|idx| {
            let sum: i64 = idx
                .iter()
                .zip(inputs)
                .map(|(&i, (_, terms))| i as i64 - (terms.len() as i64 - 1) / 2)
                .sum();
            let out_idx = (sum + out_center).clamp(0, out_terms.len() as i64 - 1) as usize;
            Rule {
                antecedents: idx
                    .iter()
                    .zip(inputs)
                    .map(|(&i, (name, terms))| Clause::new(*name, terms[i]))
                    .collect(),
                consequent: Clause::new(out_name, out_terms[out_idx]),
            }
        })
        .collect()
}
