use std::ops::Not;

use crate::error::Result;
use crate::ops::{AndOp, OrOp};
use crate::terms::TermKind;
use crate::variable::{Fuzzified, Variable, VariableKey};

/// "variable is term"
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Proposition<T> {
    pub(crate) var: VariableKey,
    pub(crate) term: T,
}

impl<T> Proposition<T> {
    pub fn variable(&self) -> VariableKey {
        self.var
    }

    pub fn term(&self) -> &T {
        &self.term
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr<T> {
    Is(Proposition<T>),
    And(Box<Expr<T>>, Box<Expr<T>>),
    Or(Box<Expr<T>>, Box<Expr<T>>),
    Not(Box<Expr<T>>),
}

impl<T> Expr<T> {
    pub fn or(self, rhs: Expr<T>) -> Self {
        Expr::Or(Box::new(self), Box::new(rhs))
    }

    pub fn and(self, rhs: Expr<T>) -> Self {
        Expr::And(Box::new(self), Box::new(rhs))
    }

    pub fn and2(self, rhs: Expr<T>, rhs2: Expr<T>) -> Self {
        self.and(rhs).and(rhs2)
    }

    /// Leaves of the expression, left to right
    pub fn propositions(&self) -> Vec<&Proposition<T>> {
        let mut props = Vec::new();

        fn parse<'p, T>(expr: &'p Expr<T>, out: &mut Vec<&'p Proposition<T>>) {
            match expr {
                Expr::Is(prop) => out.push(prop),
                Expr::And(lhs, rhs) | Expr::Or(lhs, rhs) => {
                    parse(lhs, out);
                    parse(rhs, out);
                },
                Expr::Not(expr) => parse(expr, out),
            }
        }

        parse(self, &mut props);

        props
    }
}

impl<T: TermKind> Expr<T> {
    /// Truth degree of the expression under the fuzzified inputs
    pub fn evaluate(&self, fuzzified: &Fuzzified<'_, T>, and_op: AndOp, or_op: OrOp) -> Result<f64> {
        match self {
            Expr::Is(prop) => fuzzified.degree(prop.var, &prop.term),
            Expr::And(lhs, rhs) => {
                let left = lhs.evaluate(fuzzified, and_op, or_op)?;
                let right = rhs.evaluate(fuzzified, and_op, or_op)?;

                Ok(and_op.call(left, right))
            },
            Expr::Or(lhs, rhs) => {
                let left = lhs.evaluate(fuzzified, and_op, or_op)?;
                let right = rhs.evaluate(fuzzified, and_op, or_op)?;

                Ok(or_op.call(left, right))
            },
            Expr::Not(expr) => Ok(1. - expr.evaluate(fuzzified, and_op, or_op)?),
        }
    }
}

impl<T> Not for Expr<T> {
    type Output = Self;

    fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }
}

impl<I> Variable<I> {
    pub fn is<T>(self, rhs: I) -> Expr<T>
    where
        I: Into<T>,
    {
        Expr::Is(self.term(rhs))
    }

    /// The proposition a rule concludes with, e.g. `drug.term(Drug::Amlodipine)`
    pub fn term<T>(self, rhs: I) -> Proposition<T>
    where
        I: Into<T>,
    {
        Proposition {
            var: self.0,
            term: rhs.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FuzzyError;
    use crate::membership::MembershipFunction;
    use crate::terms::{Key, Terms};
    use crate::universe::Universe;
    use crate::variable::Variables;

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Score {
        High,
        Low,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Ratio {
        Good,
        Bad,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    enum VarTerms {
        Score(Score),
        Ratio(Ratio),
    }

    impl From<Score> for VarTerms {
        fn from(s: Score) -> Self {
            Self::Score(s)
        }
    }

    impl From<Ratio> for VarTerms {
        fn from(r: Ratio) -> Self {
            Self::Ratio(r)
        }
    }

    struct Fixture {
        vars: Variables<VarTerms>,
        score: Variable<Score>,
        ratio: Variable<Ratio>,
    }

    fn fixture() -> Fixture {
        let mut vars = Variables::new();
        let score = vars
            .add_antecedent(
                "score",
                Universe::arange(0. ..=10., 1.).unwrap(),
                Terms::new()
                    .with(Score::High, MembershipFunction::triangular(0., 10., 10.))
                    .unwrap()
                    .with(Score::Low, MembershipFunction::triangular(0., 0., 10.))
                    .unwrap(),
            )
            .unwrap();
        // Ratio::Bad is left undefined on purpose
        let ratio = vars
            .add_antecedent(
                "ratio",
                Universe::arange(0. ..=1., 0.5).unwrap(),
                Terms::new()
                    .with(Ratio::Good, MembershipFunction::triangular(0., 1., 1.))
                    .unwrap(),
            )
            .unwrap();

        Fixture { vars, score, ratio }
    }

    fn fuzzified(f: &Fixture, score: f64, ratio: f64) -> Fuzzified<'_, VarTerms> {
        let mut fuzzified = Fuzzified::new(&f.vars);

        fuzzified.insert(f.score.key(), f.vars.get(f.score.key()).unwrap().fuzzify(score).unwrap());
        fuzzified.insert(f.ratio.key(), f.vars.get(f.ratio.key()).unwrap().fuzzify(ratio).unwrap());
        fuzzified
    }

    #[test]
    fn test_min_max_evaluation() {
        let f = fixture();
        let facts = fuzzified(&f, 8., 0.25);
        let high = f.score.is(Score::High);
        let good = f.ratio.is(Ratio::Good);

        assert_eq!(high.evaluate(&facts, AndOp::Min, OrOp::Max).unwrap(), 0.8);
        assert_eq!(good.evaluate(&facts, AndOp::Min, OrOp::Max).unwrap(), 0.25);
        assert_eq!(
            high.clone().and(good.clone()).evaluate(&facts, AndOp::Min, OrOp::Max).unwrap(),
            0.25
        );
        assert_eq!(
            high.clone().or(good.clone()).evaluate(&facts, AndOp::Min, OrOp::Max).unwrap(),
            0.8
        );
        assert_eq!(
            high.clone().and(good.clone()).evaluate(&facts, AndOp::Prod, OrOp::Max).unwrap(),
            0.2
        );
        assert_eq!((!good).evaluate(&facts, AndOp::Min, OrOp::Max).unwrap(), 0.75);
    }

    #[test]
    fn test_propositions_order() {
        let f = fixture();
        let expr: Expr<VarTerms> = f
            .score
            .is(Score::Low)
            .and(f.ratio.is(Ratio::Bad).or(!f.score.is(Score::High)));
        let terms: Vec<_> = expr.propositions().into_iter().map(|p| p.term).collect();

        assert_eq!(
            terms,
            vec![
                VarTerms::Score(Score::Low),
                VarTerms::Ratio(Ratio::Bad),
                VarTerms::Score(Score::High),
            ]
        );
    }

    #[test]
    fn test_unknown_term_and_missing_input() {
        let f = fixture();
        let facts = fuzzified(&f, 8., 0.25);
        let bad: Expr<VarTerms> = f.score.is(Score::High).and(f.ratio.is(Ratio::Bad));

        assert_eq!(
            bad.evaluate(&facts, AndOp::Min, OrOp::Max),
            Err(FuzzyError::UnknownTerm {
                variable: "ratio".into(),
                term: "Ratio(Bad)".into(),
            })
        );

        let empty = Fuzzified::new(&f.vars);

        assert_eq!(
            f.score.is::<VarTerms>(Score::Low).evaluate(&empty, AndOp::Min, OrOp::Max),
            Err(FuzzyError::MissingInput("score".into()))
        );
    }
}
