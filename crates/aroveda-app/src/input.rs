//! Parsing of terminal input lines into session actions.

use std::path::PathBuf;

pub const HELP: &str = "\
Commands:
  <text>            ask a question about the uploaded PDF
  /file <path>      select a PDF for upload
  /upload [<path>]  upload the selected PDF (or select <path> first)
  /mute             toggle speech playback
  /listen           dictate a question (review it, then /send)
  /send             send the dictated question
  /replay <n>       speak message <n> again (see /history)
  /history          list the conversation
  /help             show this help
  /quit             leave";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    File(PathBuf),
    Upload(Option<PathBuf>),
    Mute,
    Listen,
    Send,
    /// 1-based message number as shown by `/history`.
    Replay(usize),
    History,
    Help,
    Quit,
    Empty,
}

impl Command {
    /// Parse one input line. Errors carry a usage notice.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Empty);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Ask(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "file" if arg.is_empty() => Err("usage: /file <path>".to_string()),
            "file" => Ok(Command::File(PathBuf::from(arg))),
            "upload" if arg.is_empty() => Ok(Command::Upload(None)),
            "upload" => Ok(Command::Upload(Some(PathBuf::from(arg)))),
            "mute" => Ok(Command::Mute),
            "listen" => Ok(Command::Listen),
            "send" => Ok(Command::Send),
            "replay" => match arg.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(Command::Replay(n)),
                _ => Err("usage: /replay <n> (see /history for numbers)".to_string()),
            },
            "history" => Ok(Command::History),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command /{}; try /help", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_question() {
        assert_eq!(
            Command::parse("  What is X?  "),
            Ok(Command::Ask("What is X?".to_string()))
        );
        assert_eq!(Command::parse("   "), Ok(Command::Empty));
    }

    #[test]
    fn test_file_and_upload() {
        assert_eq!(
            Command::parse("/file ~/docs/report 2024.pdf"),
            Ok(Command::File(PathBuf::from("~/docs/report 2024.pdf")))
        );
        assert!(Command::parse("/file").is_err());
        assert_eq!(Command::parse("/upload"), Ok(Command::Upload(None)));
        assert_eq!(
            Command::parse("/upload doc1.pdf"),
            Ok(Command::Upload(Some(PathBuf::from("doc1.pdf"))))
        );
    }

    #[test]
    fn test_flag_commands() {
        assert_eq!(Command::parse("/mute"), Ok(Command::Mute));
        assert_eq!(Command::parse("/listen"), Ok(Command::Listen));
        assert_eq!(Command::parse("/send"), Ok(Command::Send));
        assert_eq!(Command::parse("/history"), Ok(Command::History));
        assert_eq!(Command::parse("/help"), Ok(Command::Help));
        assert_eq!(Command::parse("/quit"), Ok(Command::Quit));
        assert_eq!(Command::parse("/exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_replay_requires_positive_number() {
        assert_eq!(Command::parse("/replay 2"), Ok(Command::Replay(2)));
        assert!(Command::parse("/replay 0").is_err());
        assert!(Command::parse("/replay").is_err());
        assert!(Command::parse("/replay two").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = Command::parse("/dance").unwrap_err();
        assert!(err.contains("/dance"));
    }
}
