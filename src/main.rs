use std::path::PathBuf;

use anyhow::Context;
use appointment_dm::kernel::reactor::Reactor;
use appointment_dm::speech::ConsoleSpeech;
use appointment_dm::{DialogueConfig, DialogueMachine};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    // 2. Config: first argument, then environment, then defaults
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("APPOINTMENT_DM_CONFIG").ok())
        .map(PathBuf::from);
    let config = match &config_path {
        Some(path) => DialogueConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DialogueConfig::default(),
    };
    let lexicon = config.load_lexicon().context("loading lexicon")?;
    tracing::info!(rows = lexicon.len(), "Lexicon loaded");

    // 3. Reactor + console speech port
    let (tx, rx) = mpsc::channel(100);
    let port = ConsoleSpeech::spawn(tx.clone());
    let speech = config.speech.clone();
    let machine = DialogueMachine::new(config, lexicon);
    let mut reactor = Reactor::new(rx, &tx, machine, port, speech);

    let shutdown = CancellationToken::new();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    // 4. Run until Ctrl+C
    reactor.run(shutdown).await?;

    for appointment in reactor.machine.booked() {
        println!(
            "Booked: {} on {} {}",
            appointment.person,
            appointment.date,
            appointment.time.as_deref().unwrap_or("(whole day)")
        );
    }
    let summary = reactor.machine.telemetry.export_json()?;
    tracing::debug!(%summary, "Session telemetry");
    Ok(())
}
