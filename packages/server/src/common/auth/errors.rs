use thiserror::Error;

/// Authentication and role-gate failures raised at the HTTP boundary
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Insufficient role")]
    InsufficientRole,

    #[error("Invalid or expired token")]
    InvalidToken,
}
