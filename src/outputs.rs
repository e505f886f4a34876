use std::collections::HashMap;

use crate::error::{FuzzyError, Result};
use crate::variable::{Variable, VariableKey};

#[derive(Clone, Debug)]
pub(crate) struct Defuzzified {
    pub(crate) name: String,
    pub(crate) aggregated: Vec<f64>,
    /// `None` when the aggregated set has no mass
    pub(crate) crisp: Option<f64>,
}

/// Results of one evaluation, per consequent
#[derive(Clone, Debug)]
pub struct Outputs {
    consequents: HashMap<VariableKey, Defuzzified>,
    // Registry order, for iteration
    order: Vec<VariableKey>,
    firing_strengths: Vec<f64>,
}

impl Outputs {
    pub(crate) fn new(defuzzified: Vec<(VariableKey, Defuzzified)>, firing_strengths: Vec<f64>) -> Self {
        let order = defuzzified.iter().map(|(key, _)| *key).collect();

        Self {
            consequents: defuzzified.into_iter().collect(),
            order,
            firing_strengths,
        }
    }

    /// The defuzzified value of `var`, or [`FuzzyError::NoRuleFired`] when
    /// no rule gave it any mass.
    pub fn crisp<I>(&self, var: Variable<I>) -> Result<f64> {
        self.by_key(var.0)
            .ok_or_else(|| FuzzyError::UnknownVariable(format!("{:?}", var.0)))
            .and_then(Self::value)
    }

    pub fn crisp_named(&self, name: &str) -> Result<f64> {
        self.consequents
            .values()
            .find(|out| out.name == name)
            .ok_or_else(|| FuzzyError::UnknownVariable(name.to_owned()))
            .and_then(Self::value)
    }

    /// Aggregated fuzzy set of `var` over its universe
    pub fn aggregated<I>(&self, var: Variable<I>) -> Option<&[f64]> {
        self.by_key(var.0).map(|out| &*out.aggregated)
    }

    /// Firing strength of every rule, in rule order
    pub fn firing_strengths(&self) -> &[f64] {
        &self.firing_strengths
    }

    /// Every consequent's name and value, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Result<f64>)> {
        self.order
            .iter()
            .filter_map(|key| self.consequents.get(key))
            .map(|out| (out.name.as_str(), Self::value(out)))
    }

    fn by_key(&self, key: VariableKey) -> Option<&Defuzzified> {
        self.consequents.get(&key)
    }

    fn value(out: &Defuzzified) -> Result<f64> {
        out.crisp.ok_or_else(|| FuzzyError::NoRuleFired(out.name.clone()))
    }
}
