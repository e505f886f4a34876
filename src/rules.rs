use crate::dsl::{Expr, Proposition};
use crate::error::{FuzzyError, Result};
use crate::ops::{AndOp, OrOp};
use crate::terms::TermKind;
use crate::variable::Fuzzified;

#[derive(Clone, Debug, Default)]
pub struct Rules<T>(pub(crate) Vec<Rule<T>>);

impl<T> Rules<T> {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub fn add(&mut self, premise: Expr<T>, consequence: Proposition<T>) {
        self.0.push(Rule {
            premise,
            consequence,
            weight: 1.0,
        });
    }

    /// Like [`Rules::add`], with the firing strength scaled by `weight`
    pub fn add_weighted(&mut self, premise: Expr<T>, consequence: Proposition<T>, weight: f64) -> Result<()> {
        if !(0. ..=1.).contains(&weight) {
            return Err(FuzzyError::InvalidWeight(weight));
        }

        self.0.push(Rule {
            premise,
            consequence,
            weight,
        });

        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<T>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Rule<T> {
    premise: Expr<T>,
    consequence: Proposition<T>,
    weight: f64,
}

impl<T> Rule<T> {
    pub fn premise(&self) -> &Expr<T> {
        &self.premise
    }

    pub fn consequence(&self) -> &Proposition<T> {
        &self.consequence
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl<T: TermKind> Rule<T> {
    /// Firing strength of the rule: its premise's truth degree scaled by its weight
    pub fn fire(&self, fuzzified: &Fuzzified<'_, T>, and_op: AndOp, or_op: OrOp) -> Result<f64> {
        Ok(self.premise.evaluate(fuzzified, and_op, or_op)? * self.weight)
    }
}

#[test]
fn test_rule_weights() {
    use crate::variable::VariableKey;

    let prop = Proposition {
        var: VariableKey::default(),
        term: 'x',
    };
    let mut rules = Rules::with_capacity(2);

    rules.add(Expr::Is(prop), prop);
    rules.add_weighted(Expr::Is(prop), prop, 0.5).unwrap();

    assert_eq!(rules.add_weighted(Expr::Is(prop), prop, 1.5), Err(FuzzyError::InvalidWeight(1.5)));
    assert!(matches!(
        rules.add_weighted(Expr::Is(prop), prop, f64::NAN),
        Err(FuzzyError::InvalidWeight(_))
    ));
    assert_eq!(rules.iter().map(Rule::weight).collect::<Vec<_>>(), vec![1., 0.5]);
}
