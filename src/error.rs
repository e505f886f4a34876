use thiserror::Error;

use crate::variable::Role;

pub type Result<T, E = FuzzyError> = std::result::Result<T, E>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum FuzzyError {
    /// Membership function parameters that cannot describe a fuzzy set
    #[error("invalid membership shape: {0}")]
    InvalidShape(String),

    #[error("invalid universe: {0}")]
    InvalidUniverse(String),

    #[error("term `{0}` is defined more than once")]
    DuplicateTerm(String),

    #[error("variable `{0}` is defined more than once")]
    DuplicateVariable(String),

    #[error("rule weight {0} is outside [0, 1]")]
    InvalidWeight(f64),

    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("variable `{variable}` has no term `{term}`")]
    UnknownTerm { variable: String, term: String },

    #[error("variable `{variable}` does not have the {expected} role")]
    RoleMismatch { variable: String, expected: Role },

    #[error("no input given for antecedent `{0}`")]
    MissingInput(String),

    #[error("input {value} for `{variable}` is outside its universe [{min}, {max}]")]
    OutOfRange {
        variable: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Every rule targeting the consequent fired with zero strength, so the
    /// aggregated set has no mass to defuzzify.
    #[error("no rule fired for consequent `{0}`")]
    NoRuleFired(String),

    #[error("outputs were read before compute()")]
    NotComputed,
}

impl FuzzyError {
    /// Errors raised while building variables, rules or control systems, as
    /// opposed to errors raised while evaluating one set of inputs.
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidShape(_)
                | Self::InvalidUniverse(_)
                | Self::DuplicateTerm(_)
                | Self::DuplicateVariable(_)
                | Self::InvalidWeight(_)
                | Self::RoleMismatch { .. }
        )
    }
}

#[test]
fn test_error_classes() {
    assert!(FuzzyError::InvalidShape("a > b".into()).is_definition_error());
    assert!(!FuzzyError::MissingInput("age".into()).is_definition_error());
    assert!(!FuzzyError::NoRuleFired("drug".into()).is_definition_error());
    assert_eq!(
        FuzzyError::OutOfRange {
            variable: "age".into(),
            value: 120.,
            min: 0.,
            max: 100.,
        }
        .to_string(),
        "input 120 for `age` is outside its universe [0, 100]"
    );
}
