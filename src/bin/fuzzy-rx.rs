use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use fuzzy_rx::medical::{Patient, Prescription, PrescriptionModel, Recommendation};
use fuzzy_rx::MamdaniInference;
use tracing::debug;

#[derive(Parser)]
#[command(name = "fuzzy-rx")]
#[command(about = "Fuzzy rule-based drug recommendations for osteoporosis and hypertension.")]
#[command(
    long_about = "Evaluates a patient's age, sex, bone density and blood pressure against the prescription rule base\nand recommends one drug per condition. Set RUST_LOG=fuzzy_rx=debug to see every rule firing."
)]
#[command(version)]
struct Cli {
    /// Age in years (0 to 100)
    #[arg(long, required_unless_present = "patient")]
    age: Option<f64>,
    /// 0 for female, 1 for male
    #[arg(long, required_unless_present = "patient")]
    sex: Option<f64>,
    /// Bone density score (0 to 100)
    #[arg(long, required_unless_present = "patient")]
    bone_density: Option<f64>,
    /// Systolic blood pressure in mmHg (90 to 200)
    #[arg(long, required_unless_present = "patient")]
    blood_pressure: Option<f64>,
    /// Read the patient from a JSON file instead of the flags above
    #[arg(long, value_name = "FILE", conflicts_with_all = ["age", "sex", "bone_density", "blood_pressure"])]
    patient: Option<PathBuf>,
    /// JSON file selecting the inference operators, e.g. {"defuzz_op": "mom"}
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the prescription as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let inference = match &cli.config {
        Some(path) => read_json::<MamdaniInference>(path)?,
        None => MamdaniInference::default(),
    };

    debug!(?inference, "loaded inference operators");

    let patient = match &cli.patient {
        Some(path) => read_json::<Patient>(path)?,
        None => Patient {
            age: cli.age.context("--age is required")?,
            sex: cli.sex.context("--sex is required")?,
            bone_density: cli.bone_density.context("--bone-density is required")?,
            blood_pressure: cli.blood_pressure.context("--blood-pressure is required")?,
        },
    };

    let model = PrescriptionModel::with_inference(inference).context("failed to build the prescription model")?;
    let prescription = model
        .prescribe(&patient)
        .with_context(|| format!("cannot prescribe for {patient:?}"))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&prescription)?);
    } else {
        print_prescription(&prescription);
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;

    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn print_prescription(prescription: &Prescription) {
    print_line("Osteoporosis", &prescription.osteoporosis);
    print_line("Hypertension", &prescription.hypertension);
}

fn print_line<D: std::fmt::Display>(condition: &str, recommendation: &Recommendation<D>) {
    match recommendation {
        Recommendation::Prescribed { drug, score } => println!("{condition}: {drug} (score {score:.2})"),
        Recommendation::Undetermined => println!("{condition}: no rule applies"),
    }
}
