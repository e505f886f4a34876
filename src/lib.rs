//! # fuzzy-rx
//!
//! A Mamdani fuzzy inference engine, and a drug recommendation model built on it.
//!
//! Crisp inputs are fuzzified against each antecedent's terms, rule premises
//! combine those degrees with fuzzy AND/OR, each rule's strength shapes its
//! consequent term, the shaped terms are aggregated per consequent and the
//! aggregate is defuzzified back into a crisp output.
//!
//! ```rust,no_run
//! use fuzzy_rx::medical::{Patient, PrescriptionModel};
//!
//! fn main() -> fuzzy_rx::Result<()> {
//!     let model = PrescriptionModel::new()?;
//!     let prescription = model.prescribe(&Patient {
//!         age: 45.,
//!         sex: 1.,
//!         bone_density: 55.,
//!         blood_pressure: 160.,
//!     })?;
//!
//!     println!("{:?}", prescription.osteoporosis.drug());
//!
//!     Ok(())
//! }
//! ```
//!
//! Definitions ([`Variables`], [`Rules`], [`ControlSystem`]) are immutable once
//! built; all per-call state lives in an [`EvaluationSession`] or [`Inputs`].

mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
mod rules;
mod session;
mod system;
mod terms;
mod universe;
mod variable;

pub mod medical;

pub use dsl::{Expr, Proposition};
pub use error::{FuzzyError, Result};
pub use inference::MamdaniInference;
pub use inputs::Inputs;
pub use membership::{MembershipFunction, Shape};
pub use ops::{AndOp, DefuzzificationOp, ImplicationOp, OrOp, ProductionLink};
pub use outputs::Outputs;
pub use rules::{Rule, Rules};
pub use session::EvaluationSession;
pub use system::ControlSystem;
pub use terms::{Key, Term, TermKind, Terms};
pub use universe::Universe;
pub use variable::{Fuzzified, LinguisticVariable, Role, Variable, VariableKey, Variables};
