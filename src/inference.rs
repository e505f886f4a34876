use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FuzzyError, Result};
use crate::inputs::Inputs;
use crate::ops::*;
use crate::outputs::{Defuzzified, Outputs};
use crate::rules::Rules;
use crate::terms::TermKind;
use crate::variable::{Fuzzified, Role, Variables};

/// Operator choices for a Mamdani-style inference.
///
/// The default is the classic configuration: min/max connectives, clipping
/// implication, max aggregation and centroid defuzzification. Deserializes
/// from a partial JSON object, missing fields keeping their defaults.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct MamdaniInference {
    pub and_op: AndOp,
    pub or_op: OrOp,
    pub imp_op: ImplicationOp,
    pub prod_link: ProductionLink,
    pub defuzz_op: DefuzzificationOp,
}

impl MamdaniInference {
    pub fn new(
        and_op: AndOp,
        or_op: OrOp,
        imp_op: ImplicationOp,
        prod_link: ProductionLink,
        defuzz_op: DefuzzificationOp,
    ) -> Self {
        Self {
            and_op,
            or_op,
            imp_op,
            prod_link,
            defuzz_op,
        }
    }

    /// Runs one inference. Variables are visited in registration order and
    /// rules in insertion order, so results are reproducible bit for bit.
    pub fn eval<T: TermKind>(&self, vars: &Variables<T>, rules: &Rules<T>, inputs: &Inputs) -> Result<Outputs> {
        for key in inputs.0.keys() {
            let var = vars.lookup(*key)?;

            if var.role() != Role::Antecedent {
                return Err(FuzzyError::RoleMismatch {
                    variable: var.name().to_owned(),
                    expected: Role::Antecedent,
                });
            }
        }

        let referenced: HashSet<_> = rules
            .iter()
            .flat_map(|rule| rule.premise().propositions())
            .map(|prop| prop.variable())
            .collect();

        // Fuzzificate Facts
        let mut fuzzified = Fuzzified::new(vars);

        for (key, var) in vars.iter().filter(|(_, var)| var.role() == Role::Antecedent) {
            match inputs.0.get(&key) {
                Some(&crisp) => fuzzified.insert(key, var.fuzzify(crisp)?),
                None if referenced.contains(&key) => {
                    return Err(FuzzyError::MissingInput(var.name().to_owned()));
                },
                None => {},
            }
        }

        // Compute Rule Firing Strengths
        let mut firing_strengths = Vec::with_capacity(rules.len());

        for (i, rule) in rules.iter().enumerate() {
            let strength = rule.fire(&fuzzified, self.and_op, self.or_op)?;

            debug!(rule = i + 1, strength, "rule fired");
            firing_strengths.push(strength);
        }

        // Aggregate and Defuzzificate
        let mut defuzzified = Vec::new();

        for (key, var) in vars.iter().filter(|(_, var)| var.role() == Role::Consequent) {
            let contributions = rules
                .iter()
                .zip(&firing_strengths)
                .filter(|(rule, _)| rule.consequence().variable() == key)
                .map(|(rule, &strength)| (*rule.consequence().term(), strength));
            let aggregated = var.aggregate(contributions, self.imp_op, self.prod_link)?;
            let crisp = if aggregated.iter().all(|&m| m == 0.) {
                None
            } else {
                self.defuzz_op.call(var.universe().points(), &aggregated)
            };

            match crisp {
                Some(crisp) => debug!(consequent = var.name(), crisp, "defuzzificated"),
                None => debug!(consequent = var.name(), "no rule fired"),
            }

            defuzzified.push((
                key,
                Defuzzified {
                    name: var.name().to_owned(),
                    aggregated,
                    crisp,
                },
            ));
        }

        Ok(Outputs::new(defuzzified, firing_strengths))
    }
}
