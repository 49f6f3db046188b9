use thiserror::Error;

#[cfg(feature = "api")]
use actix_web::{http::StatusCode, HttpResponse, ResponseError};

#[cfg(feature = "api")]
use crate::models::ErrorResponse;

/// Errors raised by the value analysis engine
///
/// The engine never substitutes a default for malformed input; every bad
/// number surfaces as one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// American odds are zero, too small in magnitude, or otherwise unusable
    #[error("invalid odds: {odds} ({reason})")]
    InvalidOdds { odds: f64, reason: &'static str },

    /// Probability is not strictly between 0 and 1
    #[error("invalid probability: {0} (must be strictly between 0 and 1)")]
    InvalidProbability(f64),

    /// Prop confidence is not strictly between 0 and 1
    #[error("invalid confidence: {0} (must be strictly between 0 and 1)")]
    InvalidConfidence(f64),

    /// Edge is NaN or infinite
    #[error("invalid edge: {0} (must be finite)")]
    InvalidEdge(f64),
}

/// Smallest magnitude a quoted American price may have
pub const MIN_AMERICAN_MAGNITUDE: i32 = 100;

/// Validate an American odds value
pub fn validate_american_odds(odds: i32) -> Result<(), EngineError> {
    if odds == 0 {
        return Err(EngineError::InvalidOdds {
            odds: 0.0,
            reason: "american odds are never zero",
        });
    }
    if odds.unsigned_abs() < MIN_AMERICAN_MAGNITUDE as u32 {
        return Err(EngineError::InvalidOdds {
            odds: f64::from(odds),
            reason: "magnitude must be at least 100",
        });
    }
    Ok(())
}

/// Validate decimal odds (total payout per unit staked)
pub fn validate_decimal_odds(odds: f64) -> Result<(), EngineError> {
    if !odds.is_finite() || odds <= 1.0 {
        return Err(EngineError::InvalidOdds {
            odds,
            reason: "decimal odds must be finite and greater than 1",
        });
    }
    Ok(())
}

/// Validate a probability lies in the open interval (0, 1)
pub fn validate_probability(prob: f64) -> Result<(), EngineError> {
    // Written so that NaN is rejected too
    if !(prob > 0.0 && prob < 1.0) {
        return Err(EngineError::InvalidProbability(prob));
    }
    Ok(())
}

/// Validate an edge is a finite number
pub fn validate_edge(edge: f64) -> Result<(), EngineError> {
    if !edge.is_finite() {
        return Err(EngineError::InvalidEdge(edge));
    }
    Ok(())
}

/// Validate a prop confidence lies in the open interval (0, 1)
pub fn validate_confidence(confidence: f64) -> Result<(), EngineError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(EngineError::InvalidConfidence(confidence));
    }
    Ok(())
}

/// Application error types returned by the HTTP handlers
#[cfg(feature = "api")]
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed request body or parameters
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Engine rejected a price, probability or confidence
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Requested game has no data
    #[error("Not found: {0}")]
    NotFound(String),

    /// Market and model records describe different games
    #[error("Mismatched input: {0}")]
    Mismatch(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    InternalError(String),
}

#[cfg(feature = "api")]
impl From<crate::analysis::AnalysisError> for AppError {
    fn from(err: crate::analysis::AnalysisError) -> Self {
        use crate::analysis::AnalysisError;
        match err {
            AnalysisError::Engine(e) => AppError::Engine(e),
            AnalysisError::GameMismatch { .. } => AppError::Mismatch(err.to_string()),
        }
    }
}

#[cfg(feature = "api")]
impl From<crate::data::DataError> for AppError {
    fn from(err: crate::data::DataError) -> Self {
        use crate::data::DataError;
        match err {
            DataError::NotFound { .. } => AppError::NotFound(err.to_string()),
            DataError::InvalidGameId(_) => AppError::ValidationError(err.to_string()),
            DataError::Io { .. } | DataError::Parse { .. } => {
                AppError::InternalError(err.to_string())
            }
        }
    }
}

#[cfg(feature = "api")]
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::Engine(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Mismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_code = match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::Engine(EngineError::InvalidOdds { .. }) => "invalid_odds",
            AppError::Engine(EngineError::InvalidProbability(_)) => "invalid_probability",
            AppError::Engine(EngineError::InvalidConfidence(_)) => "invalid_confidence",
            AppError::Engine(EngineError::InvalidEdge(_)) => "invalid_edge",
            AppError::NotFound(_) => "not_found",
            AppError::Mismatch(_) => "game_mismatch",
            AppError::InternalError(_) => "internal_error",
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message: self.to_string(),
        })
    }
}
