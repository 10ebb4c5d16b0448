use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use er_core::config::{resolve_roster, setting_from_env_value};
use er_core::constants::{CURRENT_DOCTOR_ENV, DOCTOR_ROSTER_ENV};
use er_core::{CoreConfig, EmergencyContext};

mod console;

/// Main entry point for the emergency case console
///
/// Resolves configuration once, builds a single [`EmergencyContext`] for the session and
/// hands it to the console, which reads commands from stdin until `quit` or end of input.
/// Logs go to stderr so that console output on stdout stays clean.
///
/// # Environment Variables
/// - `ER_DOCTOR_ROSTER`: path to a YAML doctor roster (default: built-in roster)
/// - `ER_CURRENT_DOCTOR`: id of the doctor on duty at startup (default: first on roster)
/// - `RUST_LOG`: log filter, on top of the default `er=info`
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("er=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let roster_path = setting_from_env_value(std::env::var(DOCTOR_ROSTER_ENV).ok()).map(PathBuf::from);
    let current_doctor = setting_from_env_value(std::env::var(CURRENT_DOCTOR_ENV).ok());

    let roster = resolve_roster(roster_path)?;
    let cfg = CoreConfig::new(roster, current_doctor)?;
    let mut ctx = EmergencyContext::new(&cfg)?;

    tracing::info!(
        "++ Starting ER console ({} doctors, on duty: {})",
        ctx.doctors().len(),
        ctx.current_doctor().name
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    console::run(&mut ctx, stdin.lock(), stdout.lock())
}
