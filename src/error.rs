//! Error types for the sales forecasting pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that abort a forecasting invocation.
///
/// Empty input, insufficient history and a backtest without overlap are
/// expected outcomes and never surface as errors.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Input could not be interpreted as date/value pairs.
    #[error("data format error: {message}")]
    DataFormat { message: String },

    /// The seasonal model failed to fit or predict.
    #[error("model fit error: {0}")]
    ModelFit(String),

    /// Invalid configuration value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Writing the forecast payload failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForecastError {
    pub(crate) fn data_format(message: impl Into<String>) -> Self {
        Self::DataFormat {
            message: message.into(),
        }
    }

    pub(crate) fn model_fit(message: impl Into<String>) -> Self {
        Self::ModelFit(message.into())
    }

    /// Whether the error came from the input payload.
    pub fn is_data_format(&self) -> bool {
        matches!(self, Self::DataFormat { .. })
    }

    /// Whether the error came from the seasonal model.
    pub fn is_model_fit(&self) -> bool {
        matches!(self, Self::ModelFit(_))
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        Self::data_format(err.to_string())
    }
}
