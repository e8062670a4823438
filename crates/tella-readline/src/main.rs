use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;
use tokio::time::timeout;

use tella_core::api::{ChatHistory, ClearHistoryReply};
use tella_core::confirmation::Decision;
use tella_core::session::{ChatSession, SessionId};
use tella_core::{ClientConfig, Locale};
use tella_interaction::{ChatController, DecisionOutcome, HttpChatApi, SendOutcome};

mod command;
mod logging;
mod render;

use command::{COMMANDS, ReplCommand};

/// How long to wait for already-received results to print on exit.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

#[derive(Parser, Debug)]
#[command(name = "tella")]
#[command(version, about = "Chat with the Tella project assistant", long_about = None)]
struct Args {
    /// Backend root URL, e.g. http://localhost:8000
    #[arg(long)]
    api_url: Option<String>,

    /// Continue an existing session instead of starting a new one
    #[arg(long)]
    session_id: Option<String>,

    /// Interface language: tr or en
    #[arg(long)]
    locale: Option<Locale>,

    /// Whole-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Config file (default: <config dir>/tella/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log directory (default: <cache dir>/tella/logs)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Args {
    /// Applies flags on top of file and environment values.
    fn apply_to(&self, config: &mut ClientConfig) -> Result<()> {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(locale) = self.locale {
            config.locale = locale;
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = Some(secs);
        }
        config.validate()?;
        Ok(())
    }
}

/// Results delivered from background tasks to the printer.
enum UiEvent {
    Sent(SendOutcome),
    Decided(DecisionOutcome),
    History(tella_core::Result<ChatHistory>),
    Forgotten(tella_core::Result<ClearHistoryReply>),
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|cmd| cmd.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn print_event(event: UiEvent, locale: Locale) {
    match event {
        UiEvent::Sent(SendOutcome::Ignored) => {}
        UiEvent::Sent(SendOutcome::Replied {
            message,
            confirmation,
        }) => {
            render::print_lines(&render::message_lines(&message, locale));
            if let Some(pending) = confirmation {
                render::print_lines(&render::confirmation_lines(&pending, locale));
            }
        }
        UiEvent::Sent(SendOutcome::Failed { message }) => {
            render::print_lines(&render::error_lines(&message));
        }
        UiEvent::Decided(DecisionOutcome::Ignored(blocked)) => {
            println!("{}", format!("Nothing submitted: {blocked}").bright_black());
        }
        UiEvent::Decided(DecisionOutcome::Resolved {
            message,
            succeeded,
            risks,
        }) => {
            render::print_lines(&render::decision_lines(&message, succeeded, &risks, locale));
        }
        UiEvent::History(Ok(history)) => {
            render::print_lines(&render::history_lines(&history));
        }
        UiEvent::Forgotten(Ok(reply)) => {
            println!("{}", reply.message.bright_green());
        }
        UiEvent::History(Err(err)) | UiEvent::Forgotten(Err(err)) => {
            let detail = err.user_detail();
            let detail = detail.as_deref().unwrap_or(locale.unknown_error());
            println!("{}", format!("Error: {detail}").red());
        }
    }
}

async fn spawn_decision(
    controller: &ChatController,
    tx: &mpsc::Sender<UiEvent>,
    decision: Decision,
    locale: Locale,
) {
    if controller.confirmation_state().await.accepts_decision() {
        println!("{}", locale.labels().processing.bright_black());
    }
    let controller = controller.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = controller.decide(decision).await;
        let _ = tx.send(UiEvent::Decided(outcome)).await;
    });
}

/// The entry point of the Tella chat REPL.
///
/// 1. Loads configuration (defaults, file, environment, flags)
/// 2. Starts a chat session against the REST backend
/// 3. Spawns every network call so the prompt stays responsive
/// 4. Prints results from a single handler task fed by an mpsc channel
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init(args.log_dir.clone());

    // ===== Configuration =====
    let mut config =
        ClientConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply_to(&mut config)
        .context("Invalid command-line options")?;
    let locale = config.locale;
    tracing::debug!(target: "tella::cli", "Using backend {}", config.api_url);

    // ===== Backend Initialization =====
    let api = Arc::new(HttpChatApi::from_config(&config).context("Failed to create HTTP client")?);
    let session = match &args.session_id {
        Some(id) => ChatSession::new(SessionId::from(id.as_str())),
        None => ChatSession::start(),
    };
    let controller = ChatController::new(session, api, locale);
    let categories = Arc::new(controller.load_categories().await);

    let (response_tx, mut response_rx) = mpsc::channel::<UiEvent>(32);
    let response_handler = tokio::spawn(async move {
        while let Some(event) = response_rx.recv().await {
            print_event(event, locale);
        }
    });

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    let labels = locale.labels();
    println!(
        "{}",
        format!("=== {} ===", labels.assistant_title)
            .bright_magenta()
            .bold()
    );
    println!("{}", labels.assistant_subtitle.bright_black());
    println!(
        "{}",
        format!("session: {}", controller.session_id().await).bright_black()
    );
    println!();
    render::print_lines(&render::categories_lines(&categories, locale));
    println!();
    println!(
        "{}",
        format!("{} Type /help for commands, 'quit' to exit.", labels.input_placeholder)
            .bright_black()
    );

    // ===== Main REPL Loop =====
    loop {
        let line = match rl.readline("» ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        };

        let command = ReplCommand::parse(&line);
        if command != ReplCommand::Empty {
            let _ = rl.add_history_entry(line.trim());
        }

        match command {
            ReplCommand::Empty => {}
            ReplCommand::Quit => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            ReplCommand::Help => render::print_lines(&render::help_lines()),
            ReplCommand::Examples => {
                render::print_lines(&render::categories_lines(&categories, locale));
            }
            ReplCommand::Message(text) => {
                if !controller.can_send(&text) {
                    println!("{}", labels.waiting_for_reply.yellow());
                    continue;
                }
                let controller = controller.clone();
                let tx = response_tx.clone();
                tokio::spawn(async move {
                    let outcome = controller.send(&text).await;
                    let _ = tx.send(UiEvent::Sent(outcome)).await;
                });
            }
            ReplCommand::Example(index) => {
                if controller.is_sending() {
                    println!("{}", labels.waiting_for_reply.yellow());
                    continue;
                }
                let Some(prompt) = tella_core::category::example_prompt(&categories, index) else {
                    println!("{}", "No such example, see /examples".bright_black());
                    continue;
                };
                println!("{}", format!("> {prompt}").green());
                let controller = controller.clone();
                let categories = Arc::clone(&categories);
                let tx = response_tx.clone();
                tokio::spawn(async move {
                    let outcome = controller.send_example(&categories, index).await;
                    let _ = tx.send(UiEvent::Sent(outcome)).await;
                });
            }
            ReplCommand::Approve => {
                spawn_decision(&controller, &response_tx, Decision::Approve, locale).await;
            }
            ReplCommand::Reject => {
                spawn_decision(&controller, &response_tx, Decision::Reject, locale).await;
            }
            ReplCommand::Dismiss => {
                if controller.dismiss().await {
                    println!("{}", "Dismissed.".bright_black());
                } else {
                    println!("{}", "Nothing to dismiss.".bright_black());
                }
            }
            ReplCommand::Pending => match controller.pending().await {
                Some(pending) => {
                    render::print_lines(&render::confirmation_lines(&pending, locale));
                    if controller.confirmation_state().await.is_submitting() {
                        println!("{}", labels.processing.bright_black());
                    }
                }
                None => println!("{}", "No pending action.".bright_black()),
            },
            ReplCommand::Transcript => {
                for message in controller.messages().await {
                    render::print_lines(&render::message_lines(&message, locale));
                }
            }
            ReplCommand::History => {
                let controller = controller.clone();
                let tx = response_tx.clone();
                tokio::spawn(async move {
                    let history = controller.history().await;
                    let _ = tx.send(UiEvent::History(history)).await;
                });
            }
            ReplCommand::Forget => {
                let controller = controller.clone();
                let tx = response_tx.clone();
                tokio::spawn(async move {
                    let reply = controller.forget().await;
                    let _ = tx.send(UiEvent::Forgotten(reply)).await;
                });
            }
            ReplCommand::Invalid(hint) => println!("{}", hint.bright_black()),
        }
    }

    // Outstanding requests are not cancelled; their results are dropped.
    drop(response_tx);
    let _ = timeout(SHUTDOWN_GRACE, response_handler).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "tella",
            "--api-url",
            "http://10.0.0.5:8000/",
            "--locale",
            "en",
            "--timeout-secs",
            "20",
        ]);
        let mut config = ClientConfig {
            api_url: "https://tella.example.com".to_string(),
            ..ClientConfig::default()
        };

        args.apply_to(&mut config).unwrap();

        assert_eq!(config.api_url, "http://10.0.0.5:8000");
        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.request_timeout_secs, Some(20));
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::parse_from(["tella"]);
        let mut config = ClientConfig::default();
        args.apply_to(&mut config).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_bad_url_flag_is_rejected() {
        let args = Args::parse_from(["tella", "--api-url", "localhost"]);
        let mut config = ClientConfig::default();
        assert!(args.apply_to(&mut config).is_err());
    }
}
