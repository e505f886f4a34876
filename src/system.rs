use crate::dsl::Proposition;
use crate::error::{FuzzyError, Result};
use crate::inference::MamdaniInference;
use crate::inputs::Inputs;
use crate::outputs::Outputs;
use crate::rules::Rules;
use crate::session::EvaluationSession;
use crate::terms::TermKind;
use crate::variable::{Role, VariableKey, Variables};

/// A validated rule base together with the operators that evaluate it.
///
/// Immutable once built, so one system can serve any number of concurrent
/// [`EvaluationSession`]s.
pub struct ControlSystem<T> {
    vars: Variables<T>,
    rules: Rules<T>,
    inference: MamdaniInference,
}

impl<T: TermKind> ControlSystem<T> {
    /// Checks that every premise reads an existing antecedent term and every
    /// consequence writes an existing consequent term.
    pub fn new(vars: Variables<T>, rules: Rules<T>, inference: MamdaniInference) -> Result<Self> {
        for rule in rules.iter() {
            for prop in rule.premise().propositions() {
                check_proposition(&vars, prop, Role::Antecedent)?;
            }

            check_proposition(&vars, rule.consequence(), Role::Consequent)?;
        }

        Ok(Self { vars, rules, inference })
    }

    pub fn variables(&self) -> &Variables<T> {
        &self.vars
    }

    pub fn rules(&self) -> &Rules<T> {
        &self.rules
    }

    pub fn inference(&self) -> &MamdaniInference {
        &self.inference
    }

    /// Key of the variable called `name`
    pub fn variable(&self, name: &str) -> Option<VariableKey> {
        self.vars.find(name).map(|(key, _)| key)
    }

    pub fn compute(&self, inputs: &Inputs) -> Result<Outputs> {
        self.inference.eval(&self.vars, &self.rules, inputs)
    }

    /// A fresh session holding no inputs
    pub fn session(&self) -> EvaluationSession<'_, T> {
        EvaluationSession::new(self)
    }
}

fn check_proposition<T: TermKind>(vars: &Variables<T>, prop: &Proposition<T>, role: Role) -> Result<()> {
    let var = vars.lookup(prop.variable())?;

    if var.role() != role {
        return Err(FuzzyError::RoleMismatch {
            variable: var.name().to_owned(),
            expected: role,
        });
    }
    if !var.has_term(prop.term()) {
        return Err(var.unknown_term(prop.term()));
    }

    Ok(())
}
