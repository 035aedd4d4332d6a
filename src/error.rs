//! Crate-wide error type.
//!
//! Every fallible path returns `AppError`, which carries the process exit code
//! alongside a user-facing message. Exit codes:
//!
//! - 2: usage / configuration problems
//! - 3: network / API problems
//! - 4: malformed or unusable data
//! - 5: terminal / rendering problems

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Bad flags, missing env vars, unusable paths.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Request failures, non-success HTTP statuses, auth rejections.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Payloads or files that parsed but cannot be used.
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    /// Raw mode / alternate screen / draw failures.
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(5, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
