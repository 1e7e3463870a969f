use std::{fmt, io, result};

/// Crate-wide result alias, following the rest of graindb's error handling.
pub type Result<T> = result::Result<T, Error>;

/// Errors produced anywhere in graindb.
///
/// Variants line up with the error kinds in the design: parse errors and
/// semantic errors from the command layer, I/O / resource / protocol
/// failures from the storage and dispatch layers, plus a handful of
/// mechanical variants (`Fatal`, `FailConvert`, `PartialRead`) used by the
/// low level file-reading helpers.
#[derive(Debug)]
pub enum Error {
    ParseError(String),
    SemanticError(String),
    IoError(String),
    ResourceExceeded(String),
    EmptyFile(String),
    ProtocolViolation(String),
    InvalidFile(String),
    PartialRead(String),
    FailConvert(String),
    Fatal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ParseError(msg) => write!(f, "parse error: {}", msg),
            Error::SemanticError(msg) => write!(f, "semantic error: {}", msg),
            Error::IoError(msg) => write!(f, "I/O error: {}", msg),
            Error::ResourceExceeded(msg) => write!(f, "resource exceeded: {}", msg),
            Error::EmptyFile(msg) => write!(f, "empty file: {}", msg),
            Error::ProtocolViolation(msg) => write!(f, "protocol violation: {}", msg),
            Error::InvalidFile(msg) => write!(f, "invalid file: {}", msg),
            Error::PartialRead(msg) => write!(f, "partial read: {}", msg),
            Error::FailConvert(msg) => write!(f, "conversion failed: {}", msg),
            Error::Fatal(msg) => write!(f, "fatal: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err.to_string())
    }
}

/// Construct or wrap an `Error` of a given variant.
///
/// `err_at!(Variant, expr)` wraps a `std::result::Result<T, E: Display>`
/// into `Result<T>`, tagging a failure with `Variant` and the inner
/// error's message. `err_at!(Variant, msg: "fmt", args...)` builds a fresh
/// `Err(Error::Variant(format!(...)))` directly.
#[macro_export]
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        Err($crate::Error::$v(format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => Err($crate::Error::$v(format!("{}", err))),
        }
    }};
    ($v:ident, $e:expr, $($arg:expr),+) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => Err($crate::Error::$v(format!(
                "{} ({})", format!($($arg),+), err
            ))),
        }
    }};
}
