//! Line commands understood at the prompt.

pub const HELP: &str = "\
Type a message and press Enter to send it.
  /mic    start or stop voice input
  /state  show the conversation state as JSON
  /help   show this help
  quit    leave (also: exit, /quit)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text typed into the box, sent as-is.
    Send(String),
    ToggleMic,
    ShowState,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Command {
    match line.trim() {
        "quit" | "exit" | "/quit" | "/exit" => Command::Quit,
        "/mic" => Command::ToggleMic,
        "/state" => Command::ShowState,
        "/help" | "/?" => Command::Help,
        _ => Command::Send(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands() {
        assert_eq!(parse_line("quit"), Command::Quit);
        assert_eq!(parse_line("  /exit "), Command::Quit);
        assert_eq!(parse_line("/mic"), Command::ToggleMic);
        assert_eq!(parse_line("/state"), Command::ShowState);
        assert_eq!(parse_line("/help"), Command::Help);
    }

    #[test]
    fn test_text_is_sent_verbatim() {
        assert_eq!(
            parse_line("I feel great today"),
            Command::Send("I feel great today".into())
        );
        assert_eq!(parse_line("   "), Command::Send("   ".into()));
        assert_eq!(parse_line("quit smoking"), Command::Send("quit smoking".into()));
    }
}
