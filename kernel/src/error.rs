use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum KernelError {
    Concurrency,
    Conflict,
    NotFound,
    InvalidArgument,
    Permission { message: &'static str },
    Timeout,
    Internal,
}

impl KernelError {
    /// HTTP status the calling layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            KernelError::Concurrency | KernelError::Conflict => 409,
            KernelError::NotFound => 404,
            KernelError::InvalidArgument => 400,
            KernelError::Permission { .. } => 403,
            KernelError::Timeout => 408,
            KernelError::Internal => 500,
        }
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Conflict => write!(f, "Unique constraint violated"),
            KernelError::NotFound => write!(f, "Record not found"),
            KernelError::InvalidArgument => write!(f, "Invalid argument"),
            KernelError::Permission { message } => write!(f, "{message}"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

#[cfg(test)]
mod test {
    use crate::KernelError;

    #[test]
    fn permission_displays_its_message() {
        let error = KernelError::Permission {
            message: "You don't have permission to delete a book",
        };
        assert_eq!(error.status_code(), 403);
        assert_eq!(
            error.to_string(),
            "You don't have permission to delete a book"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(KernelError::NotFound.status_code(), 404);
        assert_eq!(KernelError::Conflict.status_code(), 409);
        assert_eq!(KernelError::InvalidArgument.status_code(), 400);
        assert_eq!(KernelError::Internal.status_code(), 500);
    }
}
