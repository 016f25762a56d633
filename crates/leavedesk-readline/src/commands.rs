//! Slash commands understood by the REPL.

/// Every command, for completion and hints.
pub const COMMAND_NAMES: &[&str] = &[
    "/help", "/yes", "/no", "/stats", "/session", "/clear", "/records", "/record", "/approve",
    "/reject", "/quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    /// Confirm button
    Yes,
    /// Cancel button
    No,
    Stats,
    Session,
    Clear,
    Records,
    Record(String),
    Approve(String),
    Reject(String),
    Quit,
    /// Known command used without its argument.
    Usage(&'static str),
    Unknown(String),
}

impl SlashCommand {
    /// Parses a line starting with `/`. Other lines are chat messages.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let argument = parts.next().map(str::to_string);

        let command = match (name.as_str(), argument) {
            ("help" | "h" | "?", _) => Self::Help,
            ("yes" | "confirm", _) => Self::Yes,
            ("no" | "cancel", _) => Self::No,
            ("stats", _) => Self::Stats,
            ("session", _) => Self::Session,
            ("clear", _) => Self::Clear,
            ("records", _) => Self::Records,
            ("record", Some(id)) => Self::Record(id),
            ("record", None) => Self::Usage("/record <id>"),
            ("approve", Some(id)) => Self::Approve(id),
            ("approve", None) => Self::Usage("/approve <id>"),
            ("reject", Some(id)) => Self::Reject(id),
            ("reject", None) => Self::Usage("/reject <id>"),
            ("quit" | "exit" | "q", _) => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        };
        Some(command)
    }
}

pub const HELP: &str = "\
Chat normally to apply for leave or WFH, e.g. \"casual leave tomorrow for fever\".

Commands:
  /yes, /no          Confirm or cancel the pending request
  /stats             Session statistics
  /session           Full session state
  /clear             Forget this session
  /records           Every record in the store
  /record <id>       One record
  /approve <id>      Approve a record (manager action)
  /reject <id>       Reject a record (manager action)
  /quit              Exit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_lines_are_not_commands() {
        assert_eq!(SlashCommand::parse("casual leave tomorrow"), None);
    }

    #[test]
    fn parses_commands_and_arguments() {
        assert_eq!(SlashCommand::parse("/help"), Some(SlashCommand::Help));
        assert_eq!(SlashCommand::parse(" /YES "), Some(SlashCommand::Yes));
        assert_eq!(
            SlashCommand::parse("/approve LEAVE_2"),
            Some(SlashCommand::Approve("LEAVE_2".to_string()))
        );
        assert_eq!(
            SlashCommand::parse("/record"),
            Some(SlashCommand::Usage("/record <id>"))
        );
        assert_eq!(
            SlashCommand::parse("/frobnicate"),
            Some(SlashCommand::Unknown("/frobnicate".to_string()))
        );
        assert_eq!(SlashCommand::parse("/exit"), Some(SlashCommand::Quit));
    }

    #[test]
    fn every_name_parses() {
        for name in COMMAND_NAMES {
            let parsed = SlashCommand::parse(name).unwrap();
            assert!(!matches!(parsed, SlashCommand::Unknown(_)), "{name}");
        }
    }
}
