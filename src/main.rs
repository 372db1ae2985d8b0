// src/main.rs - doctor-groq entry point

use clap::Parser;

use doctor_groq::cli::{Cli, Commands};
use doctor_groq::core::badges::BadgeBook;
use doctor_groq::core::conversation::Conversation;
use doctor_groq::core::session::SessionState;
use doctor_groq::infra::config::Config;
use doctor_groq::infra::logger;
use doctor_groq::provider::resolver;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    let conversational_model = cli
        .model
        .clone()
        .unwrap_or_else(|| config.models.conversational.clone());
    let safety_model = cli
        .safety_model
        .clone()
        .unwrap_or_else(|| config.models.safety.clone());

    // Subcommands that don't need a provider
    if let Some(Commands::Badges) = cli.command {
        for badge in BadgeBook::default().iter() {
            println!(
                "{:<18} {} (goal: {})",
                badge.name, badge.description, badge.threshold
            );
        }
        return Ok(());
    }

    let api_key = resolver::resolve_api_key(&config.provider).await?;
    let provider = resolver::build_provider(&config.provider, api_key);
    tracing::debug!(provider = provider.id(), "provider ready");

    match cli.command {
        Some(Commands::Check { text }) => {
            doctor_groq::cli::check::run_check(
                provider,
                &safety_model,
                config.safety.hazard_match,
                &text.join(" "),
            )
            .await
        }
        _ => {
            let conversation = Conversation::from_config(provider, &config)
                .with_events(doctor_groq::cli::notify::terminal_notifier());
            let mut session = SessionState::new(conversational_model, safety_model);
            doctor_groq::cli::chat::run_chat(
                &conversation,
                &mut session,
                &config.persona.name,
                !cli.hide_badges,
            )
            .await
        }
    }
}
