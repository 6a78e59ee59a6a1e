//! Parsing of editor input lines.
//!
//! Plain lines are document text. A line starting with `:` is a command;
//! `::` escapes a text line that itself starts with a colon.

use std::path::PathBuf;

use thiserror::Error;

/// One line of editor input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append a line to the document.
    Append(String),
    /// `:w [PATH]` - save, or save to PATH and make it the target.
    Save(Option<PathBuf>),
    /// `:saveas PATH`
    SaveAs(PathBuf),
    /// `:e PATH`
    Open(PathBuf),
    /// `:autosave [on|off]` - set, or toggle without an argument.
    AutoSave(Option<bool>),
    /// `:interval SECONDS`
    Interval(u64),
    /// `:clear` - start a new, unsaved document.
    Clear,
    /// `:status`
    Status,
    /// `:p` - print the document.
    Print,
    /// `:help`
    Help,
    /// `:q`
    Quit,
}

/// A command line that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command ':{0}'")]
    Unknown(String),

    #[error(":{command} needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("expected on or off, got '{0}'")]
    InvalidSwitch(String),

    #[error("expected a number of seconds, got '{0}'")]
    InvalidNumber(String),
}

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  :w [PATH]          save (to PATH, making it the current file)
  :saveas PATH       save to PATH and make it the current file
  :e PATH            open PATH, replacing the document
  :autosave [on|off] toggle or set auto-save
  :interval SECONDS  set the auto-save interval (5-300)
  :clear             start a new unsaved document
  :status            show file, auto-save and size
  :p                 print the document
  :q                 quit
Any other line is appended to the document. Start a line with '::' to
append text beginning with ':'.";

/// Parse one input line.
pub fn parse_line(line: &str) -> Result<Command, CommandError> {
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Append(line.to_string()));
    };
    if rest.starts_with(':') {
        return Ok(Command::Append(rest.to_string()));
    }

    let rest = rest.trim();
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };

    match name {
        "w" | "write" => Ok(Command::Save(arg.map(PathBuf::from))),
        "saveas" => require(arg, "saveas", "a file path").map(|a| Command::SaveAs(a.into())),
        "e" | "edit" => require(arg, "e", "a file path").map(|a| Command::Open(a.into())),
        "autosave" => match arg {
            None => Ok(Command::AutoSave(None)),
            Some("on") => Ok(Command::AutoSave(Some(true))),
            Some("off") => Ok(Command::AutoSave(Some(false))),
            Some(other) => Err(CommandError::InvalidSwitch(other.to_string())),
        },
        "interval" => {
            let arg = require(arg, "interval", "a number of seconds")?;
            arg.parse()
                .map(Command::Interval)
                .map_err(|_| CommandError::InvalidNumber(arg.to_string()))
        }
        "clear" | "new" => Ok(Command::Clear),
        "status" => Ok(Command::Status),
        "p" | "print" => Ok(Command::Print),
        "help" | "h" => Ok(Command::Help),
        "q" | "quit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn require<'a>(
    arg: Option<&'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    arg.ok_or(CommandError::MissingArgument { command, argument })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines() {
        assert_eq!(parse_line("hello"), Ok(Command::Append("hello".into())));
        assert_eq!(parse_line(""), Ok(Command::Append(String::new())));
        assert_eq!(parse_line("::w"), Ok(Command::Append(":w".into())));
    }

    #[test]
    fn test_save_commands() {
        assert_eq!(parse_line(":w"), Ok(Command::Save(None)));
        assert_eq!(parse_line(":w   "), Ok(Command::Save(None)));
        assert_eq!(
            parse_line(":w notes.txt"),
            Ok(Command::Save(Some(PathBuf::from("notes.txt"))))
        );
        assert_eq!(
            parse_line(":saveas my notes.txt"),
            Ok(Command::SaveAs(PathBuf::from("my notes.txt")))
        );
        assert_eq!(
            parse_line(":saveas"),
            Err(CommandError::MissingArgument {
                command: "saveas",
                argument: "a file path"
            })
        );
    }

    #[test]
    fn test_autosave_commands() {
        assert_eq!(parse_line(":autosave"), Ok(Command::AutoSave(None)));
        assert_eq!(parse_line(":autosave on"), Ok(Command::AutoSave(Some(true))));
        assert_eq!(parse_line(":autosave off"), Ok(Command::AutoSave(Some(false))));
        assert_eq!(
            parse_line(":autosave later"),
            Err(CommandError::InvalidSwitch("later".into()))
        );
    }

    #[test]
    fn test_interval_command() {
        assert_eq!(parse_line(":interval 30"), Ok(Command::Interval(30)));
        assert_eq!(
            parse_line(":interval soon"),
            Err(CommandError::InvalidNumber("soon".into()))
        );
        assert!(matches!(
            parse_line(":interval"),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_other_commands() {
        assert_eq!(parse_line(":e a.txt"), Ok(Command::Open("a.txt".into())));
        assert_eq!(parse_line(":clear"), Ok(Command::Clear));
        assert_eq!(parse_line(":status"), Ok(Command::Status));
        assert_eq!(parse_line(":p"), Ok(Command::Print));
        assert_eq!(parse_line(":q"), Ok(Command::Quit));
        assert_eq!(
            parse_line(":wq"),
            Err(CommandError::Unknown("wq".into()))
        );
    }
}
