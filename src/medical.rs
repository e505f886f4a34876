//! Drug recommendations for osteoporosis and hypertension.
//!
//! Everything here is configuration for the generic engine: the variables,
//! their triangular terms and the ten prescription rules. The engine itself
//! knows nothing about patients or drugs.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FuzzyError, Result};
use crate::inference::MamdaniInference;
use crate::membership::MembershipFunction;
use crate::rules::Rules;
use crate::system::ControlSystem;
use crate::terms::{Key, Terms};
use crate::universe::Universe;
use crate::variable::{Variable, Variables};

#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
pub enum Age {
    Young,
    MiddleAged,
    Elderly,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
pub enum Sex {
    Female,
    Male,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
pub enum BoneDensity {
    Mild,
    Moderate,
    Severe,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
pub enum BloodPressure {
    Normal,
    High,
    VeryHigh,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd, Serialize)]
pub enum OsteoporosisDrug {
    Raloxifene,
    Alendronate,
    Denosumab,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd, Serialize)]
pub enum HypertensionDrug {
    Lisinopril,
    Amlodipine,
    Hydrochlorothiazide,
}

/// Every term of the prescription rule base
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum MedicalTerm {
    Age(Age),
    Sex(Sex),
    BoneDensity(BoneDensity),
    BloodPressure(BloodPressure),
    OsteoporosisDrug(OsteoporosisDrug),
    HypertensionDrug(HypertensionDrug),
}

macro_rules! medical_terms {
    ($($term:ident),* $(,)?) => {
        $(
            impl From<$term> for MedicalTerm {
                fn from(term: $term) -> Self {
                    Self::$term(term)
                }
            }
        )*
    };
}

medical_terms!(Age, Sex, BoneDensity, BloodPressure, OsteoporosisDrug, HypertensionDrug);

/// A category picked from a crisp score by half-open bands:
/// `[0, 1)` is the first, `[1, 2)` the second and so on, with the last band
/// open-ended.
pub trait Banded: Copy + 'static {
    const BANDS: &'static [Self];

    fn from_score(score: f64) -> Self {
        let last = Self::BANDS.len() - 1;
        let band = if score < 1. {
            0
        } else {
            (score.floor() as usize).min(last)
        };

        Self::BANDS[band]
    }
}

impl Banded for OsteoporosisDrug {
    const BANDS: &'static [Self] = &[Self::Raloxifene, Self::Alendronate, Self::Denosumab];
}

impl Banded for HypertensionDrug {
    const BANDS: &'static [Self] = &[Self::Lisinopril, Self::Amlodipine, Self::Hydrochlorothiazide];
}

impl fmt::Display for OsteoporosisDrug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for HypertensionDrug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Crisp patient attributes. `sex` is 0 for female and 1 for male.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Patient {
    pub age: f64,
    pub sex: f64,
    pub bone_density: f64,
    pub blood_pressure: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendation<D> {
    Prescribed { drug: D, score: f64 },
    /// No rule applied to this patient, so there is nothing to recommend
    Undetermined,
}

impl<D: Banded> Recommendation<D> {
    fn from_output(output: Result<f64>) -> Result<Self> {
        match output {
            Ok(score) => Ok(Self::Prescribed {
                drug: D::from_score(score),
                score,
            }),
            Err(FuzzyError::NoRuleFired(_)) => Ok(Self::Undetermined),
            Err(err) => Err(err),
        }
    }

    pub fn drug(&self) -> Option<D> {
        match self {
            Self::Prescribed { drug, .. } => Some(*drug),
            Self::Undetermined => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Prescription {
    pub osteoporosis: Recommendation<OsteoporosisDrug>,
    pub hypertension: Recommendation<HypertensionDrug>,
}

pub struct PrescriptionModel {
    system: ControlSystem<MedicalTerm>,
    age: Variable<Age>,
    sex: Variable<Sex>,
    bone_density: Variable<BoneDensity>,
    blood_pressure: Variable<BloodPressure>,
    osteoporosis: Variable<OsteoporosisDrug>,
    hypertension: Variable<HypertensionDrug>,
}

impl PrescriptionModel {
    pub fn new() -> Result<Self> {
        Self::with_inference(MamdaniInference::default())
    }

    pub fn with_inference(inference: MamdaniInference) -> Result<Self> {
        let tri = MembershipFunction::triangular;
        let mut vars = Variables::new();

        let age = vars.add_antecedent(
            "age",
            Universe::arange(0. ..=100., 1.)?,
            Terms::new()
                .with(Age::Young, tri(0., 0., 40.))?
                .with(Age::MiddleAged, tri(40., 50., 60.))?
                .with(Age::Elderly, tri(60., 80., 100.))?,
        )?;
        let sex = vars.add_antecedent(
            "sex",
            Universe::arange(0. ..=1., 1.)?,
            Terms::new()
                .with(Sex::Female, tri(0., 0., 1.))?
                .with(Sex::Male, tri(1., 1., 1.))?,
        )?;
        let bone_density = vars.add_antecedent(
            "bone_density",
            Universe::arange(0. ..=100., 1.)?,
            Terms::new()
                .with(BoneDensity::Mild, tri(0., 0., 50.))?
                .with(BoneDensity::Moderate, tri(30., 50., 70.))?
                .with(BoneDensity::Severe, tri(60., 100., 100.))?,
        )?;
        let blood_pressure = vars.add_antecedent(
            "blood_pressure",
            Universe::arange(90. ..=200., 1.)?,
            Terms::new()
                .with(BloodPressure::Normal, tri(90., 90., 120.))?
                .with(BloodPressure::High, tri(120., 150., 180.))?
                .with(BloodPressure::VeryHigh, tri(170., 200., 200.))?,
        )?;
        let osteoporosis = vars.add_consequent(
            "drug_osteoporosis",
            Universe::arange(0. ..=2., 1.)?,
            Terms::new()
                .with(OsteoporosisDrug::Raloxifene, tri(0., 0., 1.))?
                .with(OsteoporosisDrug::Alendronate, tri(1., 1., 2.))?
                .with(OsteoporosisDrug::Denosumab, tri(2., 2., 2.))?,
        )?;
        let hypertension = vars.add_consequent(
            "drug_hypertension",
            Universe::arange(0. ..=2., 1.)?,
            Terms::new()
                .with(HypertensionDrug::Lisinopril, tri(0., 0., 1.))?
                .with(HypertensionDrug::Amlodipine, tri(1., 1., 2.))?
                .with(HypertensionDrug::Hydrochlorothiazide, tri(2., 2., 2.))?,
        )?;

        let mut rules = Rules::with_capacity(10);

        // Osteoporosis
        rules.add(
            age.is(Age::Elderly)
                .and2(sex.is(Sex::Female), bone_density.is(BoneDensity::Mild)),
            osteoporosis.term(OsteoporosisDrug::Raloxifene),
        );
        rules.add(
            age.is(Age::Elderly)
                .and2(sex.is(Sex::Female), bone_density.is(BoneDensity::Moderate)),
            osteoporosis.term(OsteoporosisDrug::Raloxifene),
        );
        rules.add(
            age.is(Age::MiddleAged).and(bone_density.is(BoneDensity::Moderate)),
            osteoporosis.term(OsteoporosisDrug::Alendronate),
        );
        rules.add(
            age.is(Age::MiddleAged).and(bone_density.is(BoneDensity::Severe)),
            osteoporosis.term(OsteoporosisDrug::Alendronate),
        );
        rules.add(
            age.is(Age::Elderly).and(bone_density.is(BoneDensity::Moderate)),
            osteoporosis.term(OsteoporosisDrug::Alendronate),
        );
        rules.add(
            age.is(Age::Elderly).and(bone_density.is(BoneDensity::Severe)),
            osteoporosis.term(OsteoporosisDrug::Denosumab),
        );

        // Hypertension
        rules.add(
            age.is(Age::Young)
                .and2(sex.is(Sex::Male), blood_pressure.is(BloodPressure::VeryHigh)),
            hypertension.term(HypertensionDrug::Lisinopril),
        );
        rules.add(
            age.is(Age::MiddleAged).and(blood_pressure.is(BloodPressure::High)),
            hypertension.term(HypertensionDrug::Amlodipine),
        );
        rules.add(
            age.is(Age::Elderly).and(blood_pressure.is(BloodPressure::VeryHigh)),
            hypertension.term(HypertensionDrug::Hydrochlorothiazide),
        );
        rules.add(
            sex.is(Sex::Female).and(blood_pressure.is(BloodPressure::High)),
            hypertension.term(HypertensionDrug::Amlodipine),
        );

        Ok(Self {
            system: ControlSystem::new(vars, rules, inference)?,
            age,
            sex,
            bone_density,
            blood_pressure,
            osteoporosis,
            hypertension,
        })
    }

    pub fn system(&self) -> &ControlSystem<MedicalTerm> {
        &self.system
    }

    /// Fails on invalid patient attributes; a disease no rule applies to is
    /// reported as [`Recommendation::Undetermined`].
    pub fn prescribe(&self, patient: &Patient) -> Result<Prescription> {
        let mut session = self.system.session();

        session
            .input(self.age, patient.age)?
            .input(self.sex, patient.sex)?
            .input(self.bone_density, patient.bone_density)?
            .input(self.blood_pressure, patient.blood_pressure)?;

        let outputs = session.compute()?;
        let prescription = Prescription {
            osteoporosis: Recommendation::from_output(outputs.crisp(self.osteoporosis))?,
            hypertension: Recommendation::from_output(outputs.crisp(self.hypertension))?,
        };

        info!(
            osteoporosis = ?prescription.osteoporosis.drug(),
            hypertension = ?prescription.hypertension.drug(),
            "prescribed"
        );

        Ok(prescription)
    }
}

#[test]
fn test_bands() {
    assert_eq!(OsteoporosisDrug::from_score(0.), OsteoporosisDrug::Raloxifene);
    assert_eq!(OsteoporosisDrug::from_score(0.999), OsteoporosisDrug::Raloxifene);
    assert_eq!(OsteoporosisDrug::from_score(1.), OsteoporosisDrug::Alendronate);
    assert_eq!(OsteoporosisDrug::from_score(1.5), OsteoporosisDrug::Alendronate);
    assert_eq!(OsteoporosisDrug::from_score(2.), OsteoporosisDrug::Denosumab);
    assert_eq!(OsteoporosisDrug::from_score(3.), OsteoporosisDrug::Denosumab);
    assert_eq!(HypertensionDrug::from_score(-0.5), HypertensionDrug::Lisinopril);
    assert_eq!(HypertensionDrug::from_score(1.99), HypertensionDrug::Amlodipine);
}

#[test]
fn test_recommendation_json() {
    let prescribed = Recommendation::Prescribed {
        drug: OsteoporosisDrug::Alendronate,
        score: 1.,
    };

    assert_eq!(
        serde_json::to_string(&prescribed).unwrap(),
        r#"{"status":"prescribed","drug":"Alendronate","score":1.0}"#
    );
    assert_eq!(
        serde_json::to_string(&Recommendation::<HypertensionDrug>::Undetermined).unwrap(),
        r#"{"status":"undetermined"}"#
    );
}
