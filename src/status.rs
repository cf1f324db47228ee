/// Shown whenever an operation starts without a session token.
pub const MSG_TOKEN_MISSING: &str = "Authorization token is missing";

/// User-facing outcome of the last operation. Error and success never coexist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Error(String),
    Success(String),
}

impl Status {
    pub fn error(msg: impl Into<String>) -> Self {
        Status::Error(msg.into())
    }

    pub fn success(msg: impl Into<String>) -> Self {
        Status::Success(msg.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Status::Error(msg) | Status::Success(msg) => msg,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

/// Where the caller should go after an operation settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Login,
}
