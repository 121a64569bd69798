// SPDX-License-Identifier: MPL-2.0
use thiserror::Error;

use crate::notifications::ActionError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    /// An action callback reported a failure. The owning notification has
    /// already been dismissed when this is returned.
    #[error("Action Error: '{label}' failed: {source}")]
    Action {
        label: String,
        #[source]
        source: ActionError,
    },
}

impl Error {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Config(_) => "config",
            Error::Action { .. } => "action_failed",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn action_error_keeps_source() {
        let err = Error::Action {
            label: "Undo".into(),
            source: "network unreachable".into(),
        };
        assert_eq!(
            format!("{}", err),
            "Action Error: 'Undo' failed: network unreachable"
        );
        assert!(err.source().is_some());
        assert_eq!(err.as_label(), "action_failed");
    }
}
