//! Error handling for the nutrition planner

use std::fmt;
use thiserror::Error;

pub use nutrition_planner_api::ApiError;

/// Unified error type for the planner controllers
#[derive(Error, Debug)]
pub enum Error {
    /// Failures reported by, or while talking to, the nutrition API
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Local input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
