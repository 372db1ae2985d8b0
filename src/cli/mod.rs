// src/cli/mod.rs - CLI definition (clap derive)

pub mod chat;
pub mod check;
pub mod notify;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "doctor-groq",
    about = "Kid-friendly learning chatbot with content moderation",
    version
)]
pub struct Cli {
    /// Conversational model for this session
    #[arg(short, long)]
    pub model: Option<String>,

    /// Moderation model for this session
    #[arg(long)]
    pub safety_model: Option<String>,

    /// Start with the badge panel hidden
    #[arg(long)]
    pub hide_badges: bool,

    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Interactive chat session (default)
    Chat,
    /// Screen a piece of text with the moderation model and print the verdict
    Check {
        /// Text to screen
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// List the badges a new session starts with
    Badges,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_chat() {
        let cli = Cli::parse_from(["doctor-groq"]);
        assert!(cli.command.is_none());
        assert!(!cli.hide_badges);
    }

    #[test]
    fn test_model_overrides() {
        let cli = Cli::parse_from([
            "doctor-groq",
            "--model",
            "llama-3.3-70b-versatile",
            "--safety-model",
            "llama-guard-4-12b",
            "chat",
        ]);
        assert_eq!(cli.model.as_deref(), Some("llama-3.3-70b-versatile"));
        assert_eq!(cli.safety_model.as_deref(), Some("llama-guard-4-12b"));
        assert_eq!(cli.command, Some(Commands::Chat));
    }

    #[test]
    fn test_check_collects_words() {
        let cli = Cli::parse_from(["doctor-groq", "check", "how", "do", "volcanoes", "work"]);
        assert_eq!(
            cli.command,
            Some(Commands::Check {
                text: vec!["how".into(), "do".into(), "volcanoes".into(), "work".into()]
            })
        );
    }

    #[test]
    fn test_check_requires_text() {
        assert!(Cli::try_parse_from(["doctor-groq", "check"]).is_err());
    }
}
