//! Command Handler Module
//!
//! This module turns a decoded request into a reply.
//!
//! ## Supported Commands
//!
//! - `PING [anything ...]` - Always answers `+PONG`
//! - `ECHO message` - Answers `+message`
//!
//! Everything else, including `ECHO` with the wrong number of arguments,
//! gets `-ERROR unknown command`.
//!
//! ## Skipped Requests
//!
//! A request that is not a non-empty array with a textual first element is
//! not a command at all. [`dispatch`] reports it as a [`CommandError`] and
//! the connection moves on to the next request without answering.

use crate::protocol::{Reply, RespValue};
use thiserror::Error;

/// Reply text for anything that is not a recognised command
pub const UNKNOWN_COMMAND: &str = "ERROR unknown command";

/// Reasons a decoded request cannot be treated as a command.
///
/// These are recovered locally: no reply is sent and the connection stays
/// open.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The request is not an array
    #[error("request is not an array")]
    NotAnArray,

    /// The request is an empty array
    #[error("empty command")]
    EmptyCommand,

    /// The first element is a null bulk string or an array
    #[error("command name is not text")]
    InvalidCommandName,

    /// The ECHO argument is a null bulk string or an array
    #[error("argument to '{0}' is not text")]
    InvalidArgument(&'static str),
}

/// A recognised request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `PING`, with any arguments ignored
    Ping,
    /// `ECHO message`
    Echo(String),
    /// Anything else, keyed by the uppercased name
    Unknown(String),
}

impl Command {
    /// Interprets a decoded request as a command.
    ///
    /// # Example
    /// ```
    /// use respd::commands::Command;
    /// use respd::protocol::RespValue;
    ///
    /// let request = RespValue::array(vec![RespValue::bulk_string("ping")]);
    /// assert_eq!(Command::from_value(request), Ok(Command::Ping));
    /// ```
    pub fn from_value(value: RespValue) -> Result<Self, CommandError> {
        let mut args = value.into_array().ok_or(CommandError::NotAnArray)?;

        let name = args
            .first()
            .ok_or(CommandError::EmptyCommand)?
            .as_str()
            .ok_or(CommandError::InvalidCommandName)?
            .to_uppercase();

        let command = match name.as_str() {
            "PING" => Command::Ping,
            "ECHO" if args.len() == 2 => match args.swap_remove(1) {
                RespValue::BulkString(Some(message)) | RespValue::Simple(message) => {
                    Command::Echo(message)
                }
                _ => return Err(CommandError::InvalidArgument("ECHO")),
            },
            _ => Command::Unknown(name),
        };

        Ok(command)
    }

    /// Produces the reply for this command.
    pub fn execute(self) -> Reply {
        match self {
            Command::Ping => Reply::pong(),
            // Simple-string framing, not a bulk string
            Command::Echo(message) => Reply::simple(message),
            Command::Unknown(_) => Reply::error(UNKNOWN_COMMAND),
        }
    }

    /// The command name, for logging.
    pub fn name(&self) -> &str {
        match self {
            Command::Ping => "PING",
            Command::Echo(_) => "ECHO",
            Command::Unknown(name) => name,
        }
    }
}

/// Dispatches a decoded request.
///
/// # Returns
///
/// - `Ok(reply)` - The reply to send back
/// - `Err(e)` - The request is not a command; send nothing
pub fn dispatch(value: RespValue) -> Result<Reply, CommandError> {
    Command::from_value(value).map(Command::execute)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(parts: &[&str]) -> RespValue {
        RespValue::array(parts.iter().map(|p| RespValue::bulk_string(*p)).collect())
    }

    #[test]
    fn test_ping() {
        let reply = dispatch(request(&["PING"])).unwrap();
        assert_eq!(&reply.serialize()[..], b"+PONG\r\n");
    }

    #[test]
    fn test_ping_ignores_arguments() {
        let reply = dispatch(request(&["PING", "hello", "world"])).unwrap();
        assert_eq!(reply, Reply::pong());
    }

    #[test]
    fn test_command_name_is_case_insensitive() {
        assert_eq!(dispatch(request(&["ping"])).unwrap(), Reply::pong());
        assert_eq!(
            dispatch(request(&["eChO", "hi"])).unwrap(),
            Reply::simple("hi")
        );
    }

    #[test]
    fn test_echo() {
        let reply = dispatch(request(&["ECHO", "hello world"])).unwrap();
        assert_eq!(&reply.serialize()[..], b"+hello world\r\n");
    }

    #[test]
    fn test_echo_empty_message() {
        let reply = dispatch(request(&["ECHO", ""])).unwrap();
        assert_eq!(&reply.serialize()[..], b"+\r\n");
    }

    #[test]
    fn test_echo_wrong_arity() {
        for parts in [&["ECHO"][..], &["ECHO", "a", "b"][..]] {
            let reply = dispatch(request(parts)).unwrap();
            assert_eq!(&reply.serialize()[..], b"-ERROR unknown command\r\n");
        }
    }

    #[test]
    fn test_unknown_command() {
        let reply = dispatch(request(&["SET", "key", "value"])).unwrap();
        assert!(reply.is_error());
        assert_eq!(reply, Reply::error(UNKNOWN_COMMAND));
    }

    #[test]
    fn test_simple_string_command_name() {
        let value = RespValue::array(vec![RespValue::simple("PING")]);
        assert_eq!(dispatch(value).unwrap(), Reply::pong());
    }

    #[test]
    fn test_skip_non_array() {
        assert_eq!(
            dispatch(RespValue::bulk_string("PING")),
            Err(CommandError::NotAnArray)
        );
        assert_eq!(dispatch(RespValue::null()), Err(CommandError::NotAnArray));
    }

    #[test]
    fn test_skip_empty_array() {
        assert_eq!(
            dispatch(RespValue::array(vec![])),
            Err(CommandError::EmptyCommand)
        );
    }

    #[test]
    fn test_skip_non_text_name() {
        let value = RespValue::array(vec![RespValue::null()]);
        assert_eq!(dispatch(value), Err(CommandError::InvalidCommandName));

        let value = RespValue::array(vec![RespValue::array(vec![])]);
        assert_eq!(dispatch(value), Err(CommandError::InvalidCommandName));
    }

    #[test]
    fn test_skip_non_text_echo_argument() {
        let value = RespValue::array(vec![RespValue::bulk_string("ECHO"), RespValue::null()]);
        assert_eq!(dispatch(value), Err(CommandError::InvalidArgument("ECHO")));
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::Ping.name(), "PING");
        assert_eq!(Command::Echo("x".into()).name(), "ECHO");
        assert_eq!(Command::Unknown("FOO".into()).name(), "FOO");
    }
}
