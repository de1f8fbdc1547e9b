use crate::error::WardenError;

pub type WResult<R> = Result<R, WardenError>;

/// A helper trait for `WResult` that provides additional methods for error handling.
pub trait WResultHelper<T> {
    /// Sets the context for the error.
    ///
    /// # Errors
    ///
    /// Returns a `WResult` with the specified context if the original result is an error.
    fn context(self, context: &str) -> WResult<T>;

    /// Sets the context for the error using a closure.
    ///
    /// # Errors
    ///
    /// Returns a `WResult` with the context returned by the closure if the original result is an error.
    fn with_context<O>(self, op: O) -> WResult<T>
    where
        O: FnOnce() -> String;
}

impl<T, E> WResultHelper<T> for Result<T, E>
where
    E: std::error::Error,
{
    fn context(self, context: &str) -> WResult<T> {
        self.map_err(|e| WardenError::ServerError(format!("{context}: {e}")))
    }

    fn with_context<O>(self, op: O) -> WResult<T>
    where
        O: FnOnce() -> String,
    {
        self.map_err(|e| WardenError::ServerError(format!("{}: {e}", op())))
    }
}

impl<T> WResultHelper<T> for Option<T> {
    fn context(self, context: &str) -> WResult<T> {
        self.ok_or_else(|| WardenError::ServerError(context.to_owned()))
    }

    fn with_context<O>(self, op: O) -> WResult<T>
    where
        O: FnOnce() -> String,
    {
        self.ok_or_else(|| WardenError::ServerError(op()))
    }
}
