use tracing::debug;

use crate::error::{FuzzyError, Result};
use crate::inputs::Inputs;
use crate::outputs::Outputs;
use crate::system::ControlSystem;
use crate::terms::TermKind;
use crate::variable::{Role, Variable, VariableKey};

/// One evaluation's worth of mutable state: the crisp inputs and, once
/// computed, the outputs. Sessions borrow their system immutably and are
/// never shared between callers.
pub struct EvaluationSession<'s, T> {
    system: &'s ControlSystem<T>,
    inputs: Inputs,
    outputs: Option<Outputs>,
}

impl<'s, T: TermKind> EvaluationSession<'s, T> {
    pub(crate) fn new(system: &'s ControlSystem<T>) -> Self {
        Self {
            system,
            inputs: Inputs::new(),
            outputs: None,
        }
    }

    /// Sets the crisp value of an antecedent. Rejects values outside its
    /// universe and drops any outputs computed from earlier inputs.
    pub fn input<I>(&mut self, var: Variable<I>, value: f64) -> Result<&mut Self> {
        self.set(var.0, value)
    }

    pub fn input_named(&mut self, name: &str, value: f64) -> Result<&mut Self> {
        let key = self
            .system
            .variable(name)
            .ok_or_else(|| FuzzyError::UnknownVariable(name.to_owned()))?;

        self.set(key, value)
    }

    fn set(&mut self, key: VariableKey, value: f64) -> Result<&mut Self> {
        let var = self.system.variables().lookup(key)?;

        if var.role() != Role::Antecedent {
            return Err(FuzzyError::RoleMismatch {
                variable: var.name().to_owned(),
                expected: Role::Antecedent,
            });
        }

        var.check_range(value)?;
        self.outputs = None;
        self.inputs.insert_key(key, value);

        Ok(self)
    }

    pub fn compute(&mut self) -> Result<&Outputs> {
        debug!(inputs = self.inputs.len(), "computing session");

        let outputs = self.system.compute(&self.inputs)?;

        Ok(self.outputs.insert(outputs))
    }

    pub fn outputs(&self) -> Result<&Outputs> {
        self.outputs.as_ref().ok_or(FuzzyError::NotComputed)
    }

    pub fn output<I>(&self, var: Variable<I>) -> Result<f64> {
        self.outputs()?.crisp(var)
    }

    pub fn output_named(&self, name: &str) -> Result<f64> {
        self.outputs()?.crisp_named(name)
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    /// Clears inputs and outputs so the session can take a new set of inputs
    pub fn reset(&mut self) {
        self.inputs.clear();
        self.outputs = None;
    }
}
