//! REPL input parsing.

/// Slash commands offered for completion, in help order.
pub const COMMANDS: &[&str] = &[
    "/examples",
    "/example",
    "/approve",
    "/reject",
    "/dismiss",
    "/pending",
    "/transcript",
    "/history",
    "/forget",
    "/help",
];

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    Quit,
    Help,
    Examples,
    /// 0-based index into the flattened example prompts.
    Example(usize),
    Approve,
    Reject,
    Dismiss,
    Pending,
    Transcript,
    History,
    Forget,
    /// Anything that is not a command is a chat message.
    Message(String),
    /// A command that could not be parsed, with a usage hint.
    Invalid(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if trimmed == "quit" || trimmed == "exit" {
            return Self::Quit;
        }
        if !trimmed.starts_with('/') {
            return Self::Message(line.to_string());
        }

        let mut parts = trimmed.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let argument = parts.next();

        match name {
            "/help" => Self::Help,
            "/examples" => Self::Examples,
            "/example" => match argument.map(str::parse::<usize>) {
                Some(Ok(number)) if number > 0 => Self::Example(number - 1),
                _ => Self::Invalid("usage: /example <n>  (n from /examples)".to_string()),
            },
            "/approve" => Self::Approve,
            "/reject" => Self::Reject,
            "/dismiss" => Self::Dismiss,
            "/pending" => Self::Pending,
            "/transcript" => Self::Transcript,
            "/history" => Self::History,
            "/forget" => Self::Forget,
            other => Self::Invalid(format!("unknown command '{other}', try /help")),
        }
    }
}
