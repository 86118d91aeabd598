use router_protocol::Rating;
use thiserror::Error;

pub(crate) const MAX_QUERY_CHARS: usize = 2000;

/// A trimmed, non-empty question. Only values of this type reach the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Query(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum InputRejection {
    #[error("query is empty")]
    Empty,
    #[error("query is {len} characters; the limit is {max}")]
    TooLong { len: usize, max: usize },
}

impl Query {
    pub(crate) fn parse(raw: &str) -> Result<Self, InputRejection> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InputRejection::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_QUERY_CHARS {
            return Err(InputRejection::TooLong {
                len,
                max: MAX_QUERY_CHARS,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn into_string(self) -> String {
        self.0
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ConsoleInput {
    Query(Query),
    History,
    /// Zero-based history index.
    Show(usize),
    ShowRequest(String),
    Status,
    Feedback(Rating),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum InputError {
    #[error(transparent)]
    Rejected(#[from] InputRejection),
    #[error("unknown command :{0} (try :help)")]
    UnknownCommand(String),
    #[error("expected a history number starting at 1 or a request id, got {0:?}")]
    InvalidIndex(String),
}

pub(crate) fn parse_line(line: &str) -> Result<ConsoleInput, InputError> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return Ok(ConsoleInput::Query(Query::parse(trimmed)?));
    };
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or("");
    match name {
        "history" | "h" => Ok(ConsoleInput::History),
        "show" | "s" => {
            let raw = parts.next().unwrap_or("");
            match raw.parse::<usize>() {
                Ok(number) if number >= 1 => Ok(ConsoleInput::Show(number - 1)),
                Err(_) if !raw.is_empty() => {
                    Ok(ConsoleInput::ShowRequest(raw.to_string()))
                }
                _ => Err(InputError::InvalidIndex(raw.to_string())),
            }
        }
        "status" | "health" => Ok(ConsoleInput::Status),
        "up" => Ok(ConsoleInput::Feedback(Rating::Up)),
        "down" => Ok(ConsoleInput::Feedback(Rating::Down)),
        "help" | "?" => Ok(ConsoleInput::Help),
        "quit" | "q" | "exit" => Ok(ConsoleInput::Quit),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}
