use thiserror::Error;

// Operational failures of the service shell. Authorization failures never
// appear here: they collapse into Deny grants inside the core and are not
// errors at this level.
#[derive(Error, Debug, Clone)]
pub enum WardenError {
    // Startup configuration that cannot be turned into server params
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // Missing arguments or undecodable payloads in a request
    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    // Any errors related to a bad behavior of the server but not related
    // to the user input
    #[error("Unexpected server error: {0}")]
    ServerError(String),

    // Failures reaching the JWKS endpoints
    #[error("REST client connection error: {0}")]
    ClientConnectionError(String),

    #[error("Invalid URL: {0}")]
    UrlError(String),
}

impl From<std::io::Error> for WardenError {
    fn from(e: std::io::Error) -> Self {
        Self::ServerError(e.to_string())
    }
}

impl From<reqwest::Error> for WardenError {
    fn from(e: reqwest::Error) -> Self {
        Self::ClientConnectionError(format!("{e}: details: {e:?}"))
    }
}

impl From<serde_json::Error> for WardenError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidRequest(e.to_string())
    }
}

impl From<url::ParseError> for WardenError {
    fn from(e: url::ParseError) -> Self {
        Self::UrlError(e.to_string())
    }
}

/// Return early with an error if a condition is not satisfied.
///
/// This macro is equivalent to `if !$cond { return Err(From::from($err)); }`.
#[macro_export]
macro_rules! warden_ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($crate::warden_error!($msg));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return ::core::result::Result::Err($crate::warden_error!($fmt, $($arg)*));
        }
    };
}

/// Construct a server error from a string.
#[macro_export]
macro_rules! warden_error {
    ($msg:literal) => {
        $crate::error::WardenError::ServerError(::core::format_args!($msg).to_string())
    };
    ($err:expr $(,)?) => ({
        $crate::error::WardenError::ServerError($err.to_string())
    });
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::WardenError::ServerError(::core::format_args!($fmt, $($arg)*).to_string())
    };
}

/// Return early with an error.
#[macro_export]
macro_rules! warden_bail {
    ($msg:literal) => {
        return ::core::result::Result::Err($crate::warden_error!($msg))
    };
    ($err:expr $(,)?) => {
        return ::core::result::Result::Err($err)
    };
    ($fmt:expr, $($arg:tt)*) => {
        return ::core::result::Result::Err($crate::warden_error!($fmt, $($arg)*))
    };
}
