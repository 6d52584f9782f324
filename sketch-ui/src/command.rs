//! Commands the surrounding UI sends to the pad.
//!
//! Each command runs to completion when applied; there are no one-shot flags
//! to reset afterwards. The text form is one command per line:
//!
//! ```text
//! down X Y | move X Y | up | leave
//! undo | clear | toggle
//! text <anything> | show-text | count
//! tool brush|eraser
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolChoice {
    #[default]
    Brush,
    Eraser,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    PointerLeave,
    Undo,
    Clear,
    ToggleVisibility,
    SetText(String),
    SelectTool(ToolChoice),
    QueryCount,
    QueryText,
}

/// What applying a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ack,
    Undone(bool),
    Visible(bool),
    Count(usize),
    Text(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ack => write!(f, "ok"),
            Reply::Undone(true) => write!(f, "undone"),
            Reply::Undone(false) => write!(f, "nothing to undo"),
            Reply::Visible(true) => write!(f, "visible"),
            Reply::Visible(false) => write!(f, "hidden"),
            Reply::Count(n) => write!(f, "{n}"),
            Reply::Text(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    #[error("unknown tool '{0}', expected brush or eraser")]
    UnknownTool(String),
}

fn point<'a>(
    command: &'static str,
    args: &mut impl Iterator<Item = &'a str>,
) -> Result<(f32, f32), CommandError> {
    let mut coordinate = || -> Result<f32, CommandError> {
        let raw = args.next().ok_or(CommandError::MissingArgument {
            command,
            what: "x and y coordinates",
        })?;
        raw.parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CommandError::InvalidNumber(raw.to_string()))
    };
    let x = coordinate()?;
    let y = coordinate()?;
    Ok((x, y))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let mut args = rest.split_whitespace();

        match word {
            "down" => {
                let (x, y) = point("down", &mut args)?;
                Ok(Command::PointerDown { x, y })
            }
            "move" => {
                let (x, y) = point("move", &mut args)?;
                Ok(Command::PointerMove { x, y })
            }
            "up" => Ok(Command::PointerUp),
            "leave" => Ok(Command::PointerLeave),
            "undo" => Ok(Command::Undo),
            "clear" => Ok(Command::Clear),
            "toggle" => Ok(Command::ToggleVisibility),
            "text" => Ok(Command::SetText(rest.trim_start().to_string())),
            "show-text" => Ok(Command::QueryText),
            "count" => Ok(Command::QueryCount),
            "tool" => match args.next() {
                Some("brush") => Ok(Command::SelectTool(ToolChoice::Brush)),
                Some("eraser") => Ok(Command::SelectTool(ToolChoice::Eraser)),
                Some(other) => Err(CommandError::UnknownTool(other.to_string())),
                None => Err(CommandError::MissingArgument {
                    command: "tool",
                    what: "a tool name",
                }),
            },
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}
