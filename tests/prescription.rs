use fuzzy_rx::medical::{HypertensionDrug, OsteoporosisDrug, Patient, Prescription, PrescriptionModel, Recommendation};
use fuzzy_rx::{DefuzzificationOp, FuzzyError, MamdaniInference};

fn patient(age: f64, sex: f64, bone_density: f64, blood_pressure: f64) -> Patient {
    Patient {
        age,
        sex,
        bone_density,
        blood_pressure,
    }
}

#[test]
fn test_elderly_woman_with_mild_loss() {
    let model = PrescriptionModel::new().unwrap();
    let prescription = model.prescribe(&patient(70., 0., 20., 110.)).unwrap();

    // Only rule 1 fires: elderly 0.5, female 1, mild 0.6
    assert_eq!(
        prescription,
        Prescription {
            osteoporosis: Recommendation::Prescribed {
                drug: OsteoporosisDrug::Raloxifene,
                score: 0.,
            },
            hypertension: Recommendation::Undetermined,
        }
    );
}

#[test]
fn test_middle_aged_man_with_high_pressure() {
    let model = PrescriptionModel::new().unwrap();
    let prescription = model.prescribe(&patient(45., 1., 55., 160.)).unwrap();

    assert_eq!(
        prescription.osteoporosis,
        Recommendation::Prescribed {
            drug: OsteoporosisDrug::Alendronate,
            score: 1.,
        }
    );
    assert_eq!(
        prescription.hypertension,
        Recommendation::Prescribed {
            drug: HypertensionDrug::Amlodipine,
            score: 1.,
        }
    );
}

#[test]
fn test_elderly_man_with_severe_loss() {
    let model = PrescriptionModel::new().unwrap();
    let prescription = model.prescribe(&patient(65., 1., 90., 195.)).unwrap();

    assert_eq!(prescription.osteoporosis.drug(), Some(OsteoporosisDrug::Denosumab));
    assert_eq!(prescription.hypertension.drug(), Some(HypertensionDrug::Hydrochlorothiazide));
}

#[test]
fn test_mixed_recommendation() {
    let model = PrescriptionModel::new().unwrap();

    // Bone density 50 is fully moderate, so rules 2 and 5 both fire at 0.5
    // and the centroid lands halfway between raloxifene and alendronate.
    let prescription = model.prescribe(&patient(70., 0., 50., 110.)).unwrap();

    assert_eq!(
        prescription.osteoporosis,
        Recommendation::Prescribed {
            drug: OsteoporosisDrug::Raloxifene,
            score: 0.5,
        }
    );
}

#[test]
fn test_rejects_out_of_range_patients() {
    let model = PrescriptionModel::new().unwrap();

    assert_eq!(
        model.prescribe(&patient(120., 0., 20., 110.)),
        Err(FuzzyError::OutOfRange {
            variable: "age".into(),
            value: 120.,
            min: 0.,
            max: 100.,
        })
    );
    assert!(matches!(
        model.prescribe(&patient(70., 0., 20., 80.)),
        Err(FuzzyError::OutOfRange { variable, .. }) if variable == "blood_pressure"
    ));
    assert!(matches!(
        model.prescribe(&patient(70., f64::NAN, 20., 110.)),
        Err(FuzzyError::OutOfRange { .. })
    ));
}

#[test]
fn test_named_session() {
    let model = PrescriptionModel::new().unwrap();
    let mut session = model.system().session();

    session
        .input_named("age", 45.)
        .unwrap()
        .input_named("sex", 1.)
        .unwrap()
        .input_named("bone_density", 55.)
        .unwrap()
        .input_named("blood_pressure", 160.)
        .unwrap();

    let outputs = session.compute().unwrap();

    assert_eq!(outputs.crisp_named("drug_osteoporosis"), Ok(1.));
    assert_eq!(outputs.crisp_named("drug_hypertension"), Ok(1.));
    assert_eq!(
        outputs.iter().map(|(name, _)| name).collect::<Vec<_>>(),
        vec!["drug_osteoporosis", "drug_hypertension"]
    );
    assert_eq!(outputs.firing_strengths().len(), 10);
    assert_eq!(outputs.firing_strengths()[2], 0.5);
    assert_eq!(outputs.firing_strengths()[7], 0.5);

    // Missing inputs are reported, never defaulted
    session.reset();
    session.input_named("age", 45.).unwrap();

    assert_eq!(session.compute().err(), Some(FuzzyError::MissingInput("sex".into())));
    assert!(matches!(
        session.input_named("drug_hypertension", 1.),
        Err(FuzzyError::RoleMismatch { .. })
    ));
}

#[test]
fn test_alternative_defuzzifier() {
    let inference = MamdaniInference {
        defuzz_op: DefuzzificationOp::Lom,
        ..MamdaniInference::default()
    };
    let model = PrescriptionModel::with_inference(inference).unwrap();
    let prescription = model.prescribe(&patient(70., 0., 50., 110.)).unwrap();

    // Both halves of the mixed aggregate peak at 0.5, the largest being alendronate
    assert_eq!(prescription.osteoporosis.drug(), Some(OsteoporosisDrug::Alendronate));
}

#[test]
fn test_shared_between_threads() {
    let model = PrescriptionModel::new().unwrap();
    let patients = [
        patient(70., 0., 20., 110.),
        patient(45., 1., 55., 160.),
        patient(65., 1., 90., 195.),
    ];
    let expected: Vec<_> = patients.iter().map(|p| model.prescribe(p).unwrap()).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let model = &model;
                let patient = patients[i % patients.len()];

                scope.spawn(move || (i, model.prescribe(&patient).unwrap()))
            })
            .collect();

        for handle in handles {
            let (i, prescription) = handle.join().unwrap();

            assert_eq!(prescription, expected[i % patients.len()]);
        }
    });
}
