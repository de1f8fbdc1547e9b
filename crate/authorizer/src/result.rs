use crate::error::AuthzError;

pub type AuthzResult<R> = Result<R, AuthzError>;
