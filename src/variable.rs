use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use crate::error::{FuzzyError, Result};
use crate::membership::MembershipFunction;
use crate::ops::{ImplicationOp, ProductionLink};
use crate::terms::{Term, TermKind, Terms};
use crate::universe::Universe;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// A typed handle to a registered variable whose terms are `I`
pub struct Variable<I>(pub(crate) VariableKey, PhantomData<I>);

impl<I> Variable<I> {
    pub fn key(self) -> VariableKey {
        self.0
    }
}

impl<I> Clone for Variable<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for Variable<I> {}

impl<I> fmt::Debug for Variable<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Variable").field(&self.0).finish()
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Role {
    /// Read from a crisp input
    Antecedent,
    /// Written to a crisp output
    Consequent,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Antecedent => f.write_str("antecedent"),
            Self::Consequent => f.write_str("consequent"),
        }
    }
}

struct TermEntry<T> {
    term: T,
    function: MembershipFunction,
    samples: Vec<f64>,
}

pub struct LinguisticVariable<T> {
    name: String,
    role: Role,
    universe: Universe,
    // Declaration order, which keeps aggregation and iteration deterministic
    terms: Vec<TermEntry<T>>,
    index: HashMap<T, usize>,
}

impl<T: TermKind> LinguisticVariable<T> {
    fn new<I: Term + Into<T>>(name: String, role: Role, universe: Universe, terms: Terms<I>) -> Self {
        let mut entries = Vec::with_capacity(terms.len());
        let mut index = HashMap::with_capacity(terms.len());

        for (term, function) in terms.0.iter() {
            let term = term.into();
            let function = function.clone();
            let samples = function.sample(&universe);

            index.insert(term, entries.len());
            entries.push(TermEntry {
                term,
                function,
                samples,
            });
        }

        Self {
            name,
            role,
            universe,
            terms: entries,
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn terms(&self) -> impl Iterator<Item = T> + '_ {
        self.terms.iter().map(|entry| entry.term)
    }

    pub fn has_term(&self, term: &T) -> bool {
        self.index.contains_key(term)
    }

    pub fn membership_function(&self, term: &T) -> Option<&MembershipFunction> {
        self.entry(term).map(|entry| &entry.function)
    }

    /// The term's membership sampled at every point of the universe
    pub fn samples(&self, term: &T) -> Option<&[f64]> {
        self.entry(term).map(|entry| &*entry.samples)
    }

    fn entry(&self, term: &T) -> Option<&TermEntry<T>> {
        self.index.get(term).map(|&i| &self.terms[i])
    }

    pub(crate) fn unknown_term(&self, term: &T) -> FuzzyError {
        FuzzyError::UnknownTerm {
            variable: self.name.clone(),
            term: format!("{term:?}"),
        }
    }

    pub fn check_range(&self, crisp: f64) -> Result<()> {
        if self.universe.contains(crisp) {
            return Ok(());
        }

        Err(FuzzyError::OutOfRange {
            variable: self.name.clone(),
            value: crisp,
            min: self.universe.min(),
            max: self.universe.max(),
        })
    }

    /// Degree of every term at `crisp`
    pub fn fuzzify(&self, crisp: f64) -> Result<HashMap<T, f64>> {
        self.check_range(crisp)?;

        let degrees: HashMap<T, f64> = self
            .terms
            .iter()
            .map(|entry| (entry.term, entry.function.membership(crisp)))
            .collect();

        trace!(variable = %self.name, crisp, ?degrees, "fuzzified");

        Ok(degrees)
    }

    /// Combines each `(term, strength)` contribution into one fuzzy set over
    /// the whole universe: every term is first implicated at its strength,
    /// then the results are joined pointwise by `prod_link`.
    pub fn aggregate(
        &self,
        contributions: impl IntoIterator<Item = (T, f64)>,
        imp_op: ImplicationOp,
        prod_link: ProductionLink,
    ) -> Result<Vec<f64>> {
        let mut aggregated = vec![0.; self.universe.len()];

        for (term, strength) in contributions {
            let samples = self.samples(&term).ok_or_else(|| self.unknown_term(&term))?;

            // Contributes nothing under any supported implication and link
            if strength == 0. {
                continue;
            }

            for (agg, &membership) in aggregated.iter_mut().zip(samples) {
                *agg = prod_link.call(*agg, imp_op.call(strength, membership));
            }
        }

        Ok(aggregated)
    }
}

/// Registry of every linguistic variable in a rule base
pub struct Variables<T>(pub(crate) SlotMap<VariableKey, LinguisticVariable<T>>);

impl<T: TermKind> Variables<T> {
    pub fn new() -> Self {
        Self(SlotMap::with_key())
    }

    pub fn add_antecedent<I: Term + Into<T>>(
        &mut self,
        name: impl Into<String>,
        universe: Universe,
        terms: Terms<I>,
    ) -> Result<Variable<I>> {
        self.add(name.into(), Role::Antecedent, universe, terms)
    }

    pub fn add_consequent<I: Term + Into<T>>(
        &mut self,
        name: impl Into<String>,
        universe: Universe,
        terms: Terms<I>,
    ) -> Result<Variable<I>> {
        self.add(name.into(), Role::Consequent, universe, terms)
    }

    fn add<I: Term + Into<T>>(
        &mut self,
        name: String,
        role: Role,
        universe: Universe,
        terms: Terms<I>,
    ) -> Result<Variable<I>> {
        if self.find(&name).is_some() {
            return Err(FuzzyError::DuplicateVariable(name));
        }

        let key = self.0.insert(LinguisticVariable::new(name, role, universe, terms));

        Ok(Variable(key, PhantomData))
    }

    pub fn get(&self, key: VariableKey) -> Option<&LinguisticVariable<T>> {
        self.0.get(key)
    }

    pub(crate) fn lookup(&self, key: VariableKey) -> Result<&LinguisticVariable<T>> {
        self.0
            .get(key)
            .ok_or_else(|| FuzzyError::UnknownVariable(format!("{key:?}")))
    }

    pub fn find(&self, name: &str) -> Option<(VariableKey, &LinguisticVariable<T>)> {
        self.0.iter().find(|(_, var)| var.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableKey, &LinguisticVariable<T>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: TermKind> Default for Variables<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fuzzified inputs: the degree of every term of every antecedent that
/// received a crisp value.
pub struct Fuzzified<'v, T> {
    vars: &'v Variables<T>,
    degrees: HashMap<VariableKey, HashMap<T, f64>>,
}

impl<'v, T: TermKind> Fuzzified<'v, T> {
    pub(crate) fn new(vars: &'v Variables<T>) -> Self {
        Self {
            vars,
            degrees: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: VariableKey, degrees: HashMap<T, f64>) {
        self.degrees.insert(key, degrees);
    }

    pub fn degree(&self, key: VariableKey, term: &T) -> Result<f64> {
        let var = self.vars.lookup(key)?;
        let degrees = self
            .degrees
            .get(&key)
            .ok_or_else(|| FuzzyError::MissingInput(var.name.clone()))?;

        degrees.get(term).copied().ok_or_else(|| var.unknown_term(term))
    }
}
