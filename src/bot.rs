use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::{
    error,
    fmt::{self, Display, Formatter, Write},
    result,
    time::Duration,
};

/// The result of dispatching a command. Handlers return an [`Outcome`] on
/// success.
pub type Result<T = Outcome, E = Error> = result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Helpful(#[from] HelpfulError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Cog(#[from] CogError),
    /// The handler task panicked or was cancelled before producing a result.
    #[error("handler panicked: {0}")]
    Panicked(String),
    #[error(transparent)]
    Other(Box<dyn error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Wraps any error (or message) as an unexpected failure.
    pub fn other<E>(err: E) -> Self
    where
        E: Into<Box<dyn error::Error + Send + Sync + 'static>>,
    {
        Self::Other(err.into())
    }

    /// Returns `true` for errors a handler raises on purpose. These are passed
    /// through dispatch untouched and never unload a cog. A [`CogError`]
    /// coming out of a handler is not one of them.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::Command(_) | Self::Helpful(_) | Self::Extraction(_))
    }

    /// How long the error message should stay visible to the user.
    pub fn expire_in(&self) -> Option<Duration> {
        match self {
            Self::Command(err) => err.expire_in,
            Self::Helpful(err) => err.expire_in,
            Self::Extraction(err) => err.expire_in,
            Self::Cog(err) => err.expire_in,
            Self::Panicked(_) | Self::Other(_) => None,
        }
    }

    /// Renders the error and its chain of sources.
    pub fn trace(&self) -> String {
        let mut string = format!("Error: {}", self);

        let mut source = error::Error::source(self);
        while let Some(err) = source {
            let _ = write!(string, "\n    caused by: {}", err);
            source = err.source();
        }

        string
    }
}

/// A failure caused by how the user invoked a command.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct CommandError {
    pub message: String,
    pub expire_in: Option<Duration>,
}

impl CommandError {
    pub fn new<T>(message: T) -> Self
    where
        T: ToString,
    {
        Self {
            message: message.to_string(),
            expire_in: None,
        }
    }

    pub fn expire_in(mut self, duration: Duration) -> Self {
        self.expire_in = Some(duration);
        self
    }
}

/// A failure that comes with instructions on how to resolve it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HelpfulError {
    pub issue: String,
    pub solution: String,
    pub expire_in: Option<Duration>,
}

impl HelpfulError {
    pub fn new<T, U>(issue: T, solution: U) -> Self
    where
        T: ToString,
        U: ToString,
    {
        Self {
            issue: issue.to_string(),
            solution: solution.to_string(),
            expire_in: None,
        }
    }

    pub fn expire_in(mut self, duration: Duration) -> Self {
        self.expire_in = Some(duration);
        self
    }
}

impl Display for HelpfulError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "An error has occured:\n{}\n\nSolution:\n{}",
            self.issue, self.solution
        )
    }
}

impl error::Error for HelpfulError {}

/// A failure while extracting media information for a command.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ExtractionError {
    pub message: String,
    pub expire_in: Option<Duration>,
}

impl ExtractionError {
    pub fn new<T>(message: T) -> Self
    where
        T: ToString,
    {
        Self {
            message: message.to_string(),
            expire_in: None,
        }
    }

    pub fn expire_in(mut self, duration: Duration) -> Self {
        self.expire_in = Some(duration);
        self
    }
}

/// An error produced by the cog registry itself.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct CogError {
    pub message: String,
    pub expire_in: Option<Duration>,
    /// The rendered failure that caused this error, if any.
    pub traceback: Option<String>,
}

impl CogError {
    pub fn new<T>(message: T) -> Self
    where
        T: ToString,
    {
        Self {
            message: message.to_string(),
            expire_in: None,
            traceback: None,
        }
    }

    pub fn expire_in(mut self, duration: Duration) -> Self {
        self.expire_in = Some(duration);
        self
    }

    pub fn traceback<T>(mut self, traceback: T) -> Self
    where
        T: ToString,
    {
        self.traceback = Some(traceback.to_string());
        self
    }
}

/// A control-flow request from a handler. Signals are not failures and
/// bypass all error handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Restart,
    Terminate,
}

/// A message sent back to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub content: String,
    /// Whether the response should mention the invoking user.
    pub reply: bool,
    pub delete_after: Option<Duration>,
}

impl Response {
    pub fn new<T>(content: T) -> Self
    where
        T: ToString,
    {
        Self {
            content: content.to_string(),
            reply: false,
            delete_after: None,
        }
    }

    pub fn reply(mut self, reply: bool) -> Self {
        self.reply = reply;
        self
    }

    pub fn delete_after(mut self, duration: Duration) -> Self {
        self.delete_after = Some(duration);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The handler completed, optionally with a response.
    Done(Option<Response>),
    Signal(Signal),
}

impl Outcome {
    pub fn none() -> Self {
        Self::Done(None)
    }

    pub fn respond<T>(response: T) -> Self
    where
        T: Into<Response>,
    {
        Self::Done(Some(response.into()))
    }

    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Done(response) => response.as_ref(),
            Self::Signal(_) => None,
        }
    }
}

impl From<String> for Response {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

impl From<&str> for Response {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

#[cfg(test)]
mod tests {
    use super::{CogError, CommandError, Error, ExtractionError, HelpfulError, Outcome, Signal};
    use std::time::Duration;

    #[test]
    fn test_error_is_expected() {
        assert!(Error::from(CommandError::new("bad usage")).is_expected());
        let err = HelpfulError::new("no voice channel", "join one first");
        assert!(Error::from(err).is_expected());
        assert!(Error::from(ExtractionError::new("unsupported url")).is_expected());
        // Registry errors raised inside a handler are failures of that handler.
        assert!(!Error::from(CogError::new("cog `music` not found")).is_expected());
        assert!(!Error::other("boom").is_expected());
        assert!(!Error::Panicked(String::from("boom")).is_expected());
    }

    #[test]
    fn test_error_expire_in() {
        let err = Error::from(CommandError::new("x").expire_in(Duration::from_secs(5)));
        assert_eq!(err.expire_in(), Some(Duration::from_secs(5)));

        let err = Error::from(ExtractionError::new("x").expire_in(Duration::from_secs(30)));
        assert_eq!(err.expire_in(), Some(Duration::from_secs(30)));

        assert_eq!(Error::other("x").expire_in(), None);
    }

    #[test]
    fn test_error_trace() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = Error::other(io);
        assert_eq!(err.trace(), "Error: disk on fire");

        let err = Error::Panicked(String::from("index out of bounds"));
        assert_eq!(err.trace(), "Error: handler panicked: index out of bounds");
    }

    #[test]
    fn test_outcome_response() {
        let outcome = Outcome::respond("pong");
        assert_eq!(outcome.response().unwrap().content, "pong");

        assert_eq!(Outcome::none().response(), None);
        assert_eq!(Outcome::Signal(Signal::Restart).response(), None);
    }
}
