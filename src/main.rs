//! Treatment Supervisor demo terminal.
//!
//! Runs one supervise-treatment consultation against the in-memory registry
//! and the scripted decision AI, then prints the registered prescription.
//!
//! # Environment Variables
//!
//! - `TREATMENT_SUPERVISOR__DOCTOR__MEMBERSHIP_NUMBER`: prescriber (required)
//! - `TREATMENT_SUPERVISOR__DOCTOR__SIGNING_KEY`: signature key
//! - `TREATMENT_SUPERVISOR__DECISION_SUPPORT__ENABLED`: consult the AI (default: true)
//! - `TREATMENT_SUPERVISOR__LOGGING__JSON`: JSON log lines (default: false)
//! - `RUST_LOG`: overrides `TREATMENT_SUPERVISOR__LOGGING__FILTER`

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use treatment_supervisor::adapters::{
    HmacSignatureProvider, InMemoryHealthRegistry, ScriptedDecisionSupport,
};
use treatment_supervisor::application::ConsultationTerminal;
use treatment_supervisor::config::{AppConfig, DecisionSupportConfig, LoggingConfig};
use treatment_supervisor::domain::foundation::{HealthCardId, ProductId, Timestamp};

const DEMO_PATIENT: &str = "1111222233334444";
const DEMO_ILLNESS: &str = "Infección";
const DEMO_AI_ANSWER: &str = r#"Based on the reported fever I would add an antipyretic:
```json
[{"type": "ADDITION", "product_id": "210987654321", "guideline": {"day_moment": "AFTERMEALS", "duration": 5, "dose": 1, "frequency": 8, "frequency_unit": "HOUR", "instructions": "Only while fever persists"}}]
```"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let AppConfig {
        doctor,
        decision_support,
        logging,
    } = AppConfig::load().context("loading configuration")?;
    init_tracing(&logging)?;
    doctor.validate()?;
    decision_support.validate()?;

    let prescriber = doctor.membership_number();
    let patient = HealthCardId::new(DEMO_PATIENT)?;

    let registry = Arc::new(InMemoryHealthRegistry::new().with_patient(patient.clone(), prescriber));
    let decision_ai = Arc::new(scripted_ai(&decision_support));
    let signer = Arc::new(HmacSignatureProvider::new(doctor.signing_key));

    let mut terminal = ConsultationTerminal::new(registry, decision_ai, signer, prescriber);
    info!(doctor = %prescriber, "Consultation terminal ready");

    terminal.init_revision(patient, DEMO_ILLNESS).await?;
    terminal.enter_medical_assessment("Fiebre de 38.5 y dolor de garganta desde hace tres días")?;
    terminal.init_prescription_edition()?;
    terminal.enter_medicine_with_guidelines(
        ProductId::new("123456789012")?,
        &["DURINGMEALS", "7", "500", "8", "HOUR", "Take with water"],
    )?;

    if decision_support.enabled {
        terminal.call_decision_making_ai().await?;
        terminal
            .ask_ai_for_suggestions("Adult patient with bacterial throat infection and fever")
            .await?;
        let applied = terminal.extract_guidelines_from_suggestions().await?;
        info!(applied, "AI suggestions reviewed");
    }

    terminal.enter_treatment_ending_date(Timestamp::now().add_days(7))?;
    terminal.finish_prescription_edition()?;
    if let Err(err) = terminal.stamp_signature().await {
        warn!(error = %err, "Set TREATMENT_SUPERVISOR__DOCTOR__SIGNING_KEY to sign prescriptions");
        return Err(err.into());
    }

    let registered = terminal.send_history_and_prescription().await?;
    println!("{}", serde_json::to_string_pretty(&registered)?);
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = logging.env_filter()?;
    if logging.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

fn scripted_ai(config: &DecisionSupportConfig) -> ScriptedDecisionSupport {
    let ai = ScriptedDecisionSupport::new()
        .with_max_prompt_chars(config.max_prompt_chars)
        .with_answer(DEMO_AI_ANSWER);
    if config.enabled {
        ai
    } else {
        ai.disabled()
    }
}
