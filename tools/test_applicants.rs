//! Test Applicant Generator
//!
//! Generates synthetic loan applicants and posts them to a running scoring
//! service, reporting the risk level distribution.

use credit_risk_scoring::{ApplicantRecord, RiskLevel, RiskResult};
use rand::Rng;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, warn};

const HOME_OWNERSHIP: &[&str] = &["RENT", "OWN", "MORTGAGE", "OTHER"];
const LOAN_INTENT: &[&str] = &[
    "EDUCATION",
    "MEDICAL",
    "VENTURE",
    "PERSONAL",
    "DEBTCONSOLIDATION",
    "HOMEIMPROVEMENT",
];

/// Applicant generator for testing
struct ApplicantGenerator {
    rng: rand::rngs::ThreadRng,
}

impl ApplicantGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Generate an applicant with a conservative profile
    fn generate_prime(&mut self) -> ApplicantRecord {
        let income = self.rng.gen_range(45_000.0..180_000.0_f64).round();

        ApplicantRecord {
            age: self.rng.gen_range(28..60),
            income,
            home_ownership: self.random_choice(&["OWN", "MORTGAGE"]).to_string(),
            employment_length: self.rng.gen_range(3..25),
            loan_intent: self.random_choice(LOAN_INTENT).to_string(),
            loan_grade: self.random_choice(&["A", "B"]).to_string(),
            loan_amount: (income * self.rng.gen_range(0.02..0.15)).round(),
            loan_interest_rate: self.rng.gen_range(5.5..11.0),
            default_on_file: "N".to_string(),
            credit_history_length: self.rng.gen_range(4..20),
        }
    }

    /// Generate an applicant with a stretched profile
    fn generate_subprime(&mut self) -> ApplicantRecord {
        let income = self.rng.gen_range(8_000.0..40_000.0_f64).round();

        ApplicantRecord {
            age: self.rng.gen_range(20..30),
            income,
            home_ownership: self.random_choice(HOME_OWNERSHIP).to_string(),
            employment_length: self.rng.gen_range(0..3),
            loan_intent: self.random_choice(&["MEDICAL", "DEBTCONSOLIDATION", "VENTURE"]).to_string(),
            loan_grade: self.random_choice(&["D", "E", "F", "G"]).to_string(),
            loan_amount: (income * self.rng.gen_range(0.3..0.8)).round(),
            loan_interest_rate: self.rng.gen_range(15.0..23.0),
            default_on_file: self.random_choice(&["Y", "N"]).to_string(),
            credit_history_length: self.rng.gen_range(2..5),
        }
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

/// Share of subprime applicants, defaulting to 0.2
fn parse_subprime_rate(arg: Option<&str>) -> anyhow::Result<f64> {
    let rate: f64 = arg.and_then(|s| s.parse().ok()).unwrap_or(0.2);
    if !(0.0..=1.0).contains(&rate) {
        anyhow::bail!("subprime rate must be between 0 and 1, got {}", rate);
    }
    Ok(rate)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_applicants=info".parse()?),
        )
        .init();

    info!("Starting Test Applicant Generator");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let service_url = args.get(1).map(|s| s.as_str()).unwrap_or("http://localhost:8000");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let subprime_rate = parse_subprime_rate(args.get(3).map(|s| s.as_str()))?;
    let delay_ms: u64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(50);

    info!(
        service_url = %service_url,
        count = count,
        subprime_rate = subprime_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    let health_url = format!("{}/health/live", service_url);
    if let Err(e) = client.get(&health_url).send().await.and_then(|r| r.error_for_status()) {
        warn!(error = %e, "Scoring service unreachable. Running in dry-run mode.");
        return run_dry_mode(count, subprime_rate, delay_ms).await;
    }
    info!("Connected to scoring service");

    let predict_url = format!("{}/predict", service_url);
    let mut generator = ApplicantGenerator::new();
    let mut rng = rand::thread_rng();
    let mut by_level: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut failed = 0;

    for i in 0..count {
        let applicant = if rng.gen_bool(subprime_rate) {
            generator.generate_subprime()
        } else {
            generator.generate_prime()
        };

        let response = client.post(&predict_url).json(&applicant).send().await?;
        if response.status().is_success() {
            let result: RiskResult = response.json().await?;
            *by_level.entry(result.risk_level.as_str()).or_insert(0) += 1;
        } else {
            failed += 1;
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Scoring request failed");
        }

        if (i + 1) % 10 == 0 {
            info!(
                "Scored {}/{} applicants (low={}, moderate={}, high={}, failed={})",
                i + 1,
                count,
                by_level.get(RiskLevel::Low.as_str()).unwrap_or(&0),
                by_level.get(RiskLevel::Moderate.as_str()).unwrap_or(&0),
                by_level.get(RiskLevel::High.as_str()).unwrap_or(&0),
                failed
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(levels = ?by_level, failed = failed, "Completed! Scored {} applicants", count);

    Ok(())
}

async fn run_dry_mode(count: u64, subprime_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no scoring service)");

    let mut generator = ApplicantGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let applicant = if rng.gen_bool(subprime_rate) {
            generator.generate_subprime()
        } else {
            generator.generate_prime()
        };

        let json = serde_json::to_string_pretty(&applicant)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample applicant {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
