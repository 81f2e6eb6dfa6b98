//! Convenience result type alias for TenantGate.

use crate::error::AppError;

/// A specialized `Result` type for TenantGate operations.
pub type AppResult<T> = Result<T, AppError>;
