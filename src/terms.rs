use std::fmt::Debug;
use std::hash::Hash;

pub use fixed_map::Key as Term;
pub use fixed_map::Key;
use fixed_map::Map as FixedMap;

use crate::error::{FuzzyError, Result};
use crate::membership::MembershipFunction;

/// Anything usable as the combined term type of a rule base: usually an enum
/// wrapping every variable's own term enum.
pub trait TermKind: Copy + Debug + Eq + Hash {}

impl<T: Copy + Debug + Eq + Hash> TermKind for T {}

/// The named fuzzy sets of one linguistic variable
pub struct Terms<K: Term>(pub(crate) FixedMap<K, MembershipFunction>);

impl<K: Term + Debug> Terms<K> {
    pub fn new() -> Self {
        Self(FixedMap::new())
    }

    pub fn insert(&mut self, key: K, value: MembershipFunction) -> Result<()> {
        if self.0.contains_key(key) {
            return Err(FuzzyError::DuplicateTerm(format!("{key:?}")));
        }

        self.0.insert(key, value);

        Ok(())
    }

    /// Builder form of [`Terms::insert`] for declaring a variable's terms in one expression
    pub fn with(mut self, key: K, value: Result<MembershipFunction>) -> Result<Self> {
        self.insert(key, value?)?;

        Ok(self)
    }
}

impl<K: Term> Terms<K> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Term + Debug> Default for Terms<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn test_duplicate_term() {
    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Level {
        Low,
        High,
    }

    let mut terms = Terms::new();

    terms.insert(Level::Low, MembershipFunction::triangular(0., 0., 5.).unwrap()).unwrap();
    terms.insert(Level::High, MembershipFunction::triangular(5., 10., 10.).unwrap()).unwrap();

    assert_eq!(terms.len(), 2);
    assert_eq!(
        terms.insert(Level::Low, MembershipFunction::triangular(0., 1., 2.).unwrap()),
        Err(FuzzyError::DuplicateTerm("Low".into()))
    );

    let built = Terms::new()
        .with(Level::Low, MembershipFunction::triangular(0., 0., 5.))
        .and_then(|t| t.with(Level::Low, MembershipFunction::triangular(0., 0., 5.)));

    assert!(matches!(built, Err(FuzzyError::DuplicateTerm(_))));
}
