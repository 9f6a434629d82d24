use std::fmt;
use std::io;

use trapper_sender::SenderError;
use trapper_transport::TransportError;

pub const SUCCESS: i32 = 0;
/// The collector answered but did not accept the batch.
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: &io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err.io_error() {
        Some(source) => io_error(context, source),
        None => CliError::usage(format!("{context}: {err}")),
    }
}

pub fn sender_error(context: &str, err: SenderError) -> CliError {
    match err {
        SenderError::Argument(_) => CliError::usage(format!("{context}: {err}")),
        SenderError::Transport(err) => transport_error(context, err),
        SenderError::Protocol(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        SenderError::Application { .. } => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}
