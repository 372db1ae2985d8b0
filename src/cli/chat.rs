// src/cli/chat.rs - Interactive REPL

use crate::core::badges::BadgeBook;
use crate::core::conversation::Conversation;
use crate::core::session::{SessionState, Transcript};
use crate::core::system_prompt;
use crate::core::types::{TurnKind, TurnReport};
use crate::provider::Role;
use crate::util::preview;

/// REPL-only settings that slash commands can change.
struct ChatState {
    show_badges: bool,
}

/// One line of user input, classified.
#[derive(Debug, PartialEq, Eq)]
enum ReplInput {
    Empty,
    Quit,
    Quiz(Option<String>),
    Command { name: String, arg: String },
    Message(String),
}

fn parse_input(line: &str) -> ReplInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplInput::Empty;
    }
    if trimmed == "quit" || trimmed == "exit" || trimmed == "/quit" || trimmed == "/exit" {
        return ReplInput::Quit;
    }
    if let Some(rest) = trimmed.strip_prefix('/') {
        let (name, arg) = rest.split_once(' ').unwrap_or((rest, ""));
        let arg = arg.trim();
        if name == "quiz" {
            return ReplInput::Quiz((!arg.is_empty()).then(|| arg.to_string()));
        }
        return ReplInput::Command {
            name: name.to_string(),
            arg: arg.to_string(),
        };
    }
    ReplInput::Message(trimmed.to_string())
}

/// Run the interactive chat REPL until EOF or `quit`.
pub async fn run_chat(
    conversation: &Conversation,
    session: &mut SessionState,
    persona_name: &str,
    show_badges: bool,
) -> anyhow::Result<()> {
    eprintln!(
        "{persona_name} v{} | chat: {} | safety: {}\n",
        env!("CARGO_PKG_VERSION"),
        session.conversational_model,
        session.safety_model,
    );
    println!(
        "Hello! I am {persona_name}, your friendly assistant here to help kids learn about the world in a safe and fun way!"
    );
    println!("Ask me anything fun or educational! Type /help for commands.\n");

    let mut state = ChatState { show_badges };
    if state.show_badges {
        eprintln!("{}", render_badge_panel(&session.badges));
    }

    tracing::info!(session = %session.id, "chat session started");

    while let Some(line) = read_input() {
        let (text, kind) = match parse_input(&line) {
            ReplInput::Empty => continue,
            ReplInput::Quit => break,
            ReplInput::Command { name, arg } => {
                handle_slash_command(&name, &arg, &mut state, session, conversation);
                continue;
            }
            ReplInput::Quiz(topic) => (system_prompt::quiz_request(topic.as_deref()), TurnKind::Quiz),
            ReplInput::Message(text) => (text, TurnKind::Question),
        };

        if kind == TurnKind::Quiz {
            println!("🦖 {text}");
        }
        let report = conversation.turn(session, &text, kind).await;
        print_report(&report);

        if state.show_badges {
            eprintln!("{}", render_badge_strip(&session.badges));
        }
    }

    eprintln!(
        "\nSession total: {} turn(s), {} blocked, {} filtered, {}/{} badges earned",
        session.turns,
        session.blocked_turns,
        session.filtered_replies,
        session.badges.earned_count(),
        session.badges.len(),
    );
    tracing::info!(session = %session.id, turns = session.turns, "chat session ended");
    Ok(())
}

fn print_report(report: &TurnReport) {
    // Faults and badges were already shown by the event sink.
    if let Some(text) = report.display_text() {
        println!("🤖 {text}\n");
    }
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(_) => None,
    }
}

fn handle_slash_command(
    cmd: &str,
    arg: &str,
    state: &mut ChatState,
    session: &mut SessionState,
    conversation: &Conversation,
) {
    match cmd {
        "badges" => match arg {
            "" => eprintln!("{}", render_badge_panel(&session.badges)),
            "on" => {
                state.show_badges = true;
                eprintln!("  Badge progression will be shown after each turn.");
            }
            "off" => {
                state.show_badges = false;
                eprintln!("  Badge progression hidden. /badges still shows it.");
            }
            other => eprintln!("  Unknown option '{other}'. Usage: /badges [on|off]"),
        },

        "history" => {
            if session.transcript.is_empty() {
                eprintln!("  No messages in this session yet.");
            } else {
                eprintln!("{}", render_history(&session.transcript));
            }
        }

        "model" => {
            if arg.is_empty() {
                eprintln!("  Chat model: {}", session.conversational_model);
                eprintln!("  Usage: /model <model-id>");
            } else {
                session.set_conversational_model(arg);
                eprintln!("  Chat model switched to {arg}");
            }
        }

        "safety-model" => {
            if arg.is_empty() {
                eprintln!("  Safety model: {}", session.safety_model);
                eprintln!("  Usage: /safety-model <model-id>");
            } else {
                session.set_safety_model(arg);
                eprintln!("  Safety model switched to {arg}");
            }
        }

        "status" => {
            eprintln!("  Session: {}", session.id);
            eprintln!(
                "  Models: chat {} | safety {} ({:?} matching)",
                session.conversational_model,
                session.safety_model,
                conversation.classifier().policy(),
            );
            eprintln!(
                "  Turns: {} | blocked: {} | filtered replies: {} | {} min",
                session.turns,
                session.blocked_turns,
                session.filtered_replies,
                session.elapsed_minutes(),
            );
            eprintln!(
                "  Badges: {}/{} earned",
                session.badges.earned_count(),
                session.badges.len()
            );
        }

        "help" => {
            eprintln!("Slash commands:");
            eprintln!("  /quiz [topic]           Ask for a fun quiz question");
            eprintln!("  /badges [on|off]        Show badges, or toggle the per-turn strip");
            eprintln!("  /history                Show this session's conversation");
            eprintln!("  /model [id]             Show or switch the chat model");
            eprintln!("  /safety-model [id]      Show or switch the moderation model");
            eprintln!("  /status                 Show session status");
            eprintln!("  /help                   Show this help");
            eprintln!("  /quit, quit, exit       End session");
        }

        _ => {
            eprintln!("Unknown command: /{cmd}. Type /help for commands.");
        }
    }
}

/// Full badge panel: one entry per badge with its description and status.
fn render_badge_panel(badges: &BadgeBook) -> String {
    let mut out = String::from("🏅 Badge Progression");
    for badge in badges.iter() {
        let status = if badge.earned {
            format!("✅ {}", badge.status_line())
        } else {
            format!("⏳ {}", badge.status_line())
        };
        out.push_str(&format!(
            "\n  {}: {}\n    Status: {}",
            badge.name, badge.description, status
        ));
    }
    out
}

/// Compact one-line progress summary.
fn render_badge_strip(badges: &BadgeBook) -> String {
    let parts: Vec<String> = badges
        .iter()
        .map(|b| {
            if b.earned {
                format!("{} ✅", b.name)
            } else {
                format!("{} {}/{}", b.name, b.progress, b.threshold)
            }
        })
        .collect();
    format!("🏅 {}", parts.join(" | "))
}

fn render_history(transcript: &Transcript) -> String {
    let lines: Vec<String> = transcript
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let who = match m.role {
                Role::User => "🦖 you",
                Role::Assistant => "🤖 bot",
                Role::System => "system",
            };
            format!("  {}. {}: {}", i + 1, who, preview(&m.content, 72))
        })
        .collect();
    format!(
        "  Session history ({} message(s)):\n{}",
        transcript.len(),
        lines.join("\n")
    )
}
