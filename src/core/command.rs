//! Command parser for the interactive : command system

use super::Action;
use crate::domain::abi::ParamId;

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Inputs
    Signature(String),
    Calldata(String),

    // Session actions
    Decode,
    Toggle(ParamId),
    Hover(Option<ParamId>),
    SelectAll,
    DeselectAll,
    Clear,
    ClearAll,

    // Loading
    Example(Option<String>),
    Url(String),

    // Output
    Show,
    Share,
    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

impl Command {
    /// The store action this command maps to, if it maps to one directly
    pub fn into_action(self) -> Option<Action> {
        match self {
            Command::Signature(text) => Some(Action::SetSignature(text)),
            Command::Calldata(text) => Some(Action::SetCalldata(text)),
            Command::Decode => Some(Action::Decode),
            Command::Toggle(id) => Some(Action::ToggleParamSelection(id)),
            Command::Hover(id) => Some(Action::SetHoveredParam(id)),
            Command::SelectAll => Some(Action::SelectAll),
            Command::DeselectAll => Some(Action::DeselectAll),
            Command::Clear => Some(Action::ClearDecoded),
            Command::ClearAll => Some(Action::ClearAll),
            _ => None,
        }
    }
}

/// Parse a command string (the leading : is optional)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let input = input.strip_prefix(':').unwrap_or(input).trim_start();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.to_lowercase().as_str() {
        // Inputs
        "sig" | "signature" => Command::Signature(args.unwrap_or_default()),
        "data" | "calldata" => Command::Calldata(args.unwrap_or_default()),

        // Session
        "decode" | "dec" | "d" => Command::Decode,
        "toggle" | "t" => match args.as_deref().and_then(|s| s.parse().ok()) {
            Some(id) => Command::Toggle(id),
            None => Command::Unknown(input.to_string()),
        },
        "hover" | "h" => match args {
            None => Command::Hover(None),
            Some(arg) => match arg.parse() {
                Ok(id) => Command::Hover(Some(id)),
                Err(_) => Command::Unknown(input.to_string()),
            },
        },
        "all" | "select-all" => Command::SelectAll,
        "none" | "deselect" | "deselect-all" => Command::DeselectAll,
        "clear" => Command::Clear,
        "reset" | "clear-all" => Command::ClearAll,

        // Loading
        "example" | "ex" => Command::Example(args),
        "url" | "open" => {
            if let Some(link) = args {
                Command::Url(link)
            } else {
                Command::Unknown(input.to_string())
            }
        }

        // Output
        "show" | "ls" => Command::Show,
        "share" | "link" => Command::Share,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,

        _ => Command::Unknown(input.to_string()),
    }
}
