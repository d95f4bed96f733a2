//! Error types for abacus-rs operations.
//!
//! This module provides the error hierarchy using `thiserror` for streaming,
//! manual calculation, provider, and CLI command failures.
//!
//! Two failure classes deliberately do **not** appear here: malformed fence
//! markers (the block extractor degrades them to prose) and failures thrown
//! by sandboxed code (captured per-unit as [`crate::exec::Outcome::Failed`]
//! so sibling units keep rendering).

use thiserror::Error;

/// Result type alias for abacus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for abacus operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Streaming errors (token source failures).
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    /// Manual calculation errors.
    #[error("calculation error: {0}")]
    Calc(#[from] CalcError),

    /// Model provider errors.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Empty or whitespace-only input, short-circuited before any processing.
    #[error("empty input")]
    EmptyInput,

    /// I/O errors (file and terminal operations).
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Streaming-specific errors for the token source.
#[derive(Error, Debug)]
pub enum StreamError {
    /// The token source failed before the response completed.
    #[error("transport failure: {reason}")]
    Transport {
        /// Human-readable description of the transport failure.
        reason: String,
    },
}

/// Manual-calculation errors from the expression evaluator.
#[derive(Error, Debug)]
pub enum CalcError {
    /// The expression could not be parsed or evaluated.
    #[error("evaluation failed: {0}")]
    Evaluation(String),
}

/// Model provider errors.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No API key was configured for the provider.
    #[error("no API key configured. Set OPENAI_API_KEY")]
    MissingApiKey,

    /// The provider request could not be opened.
    #[error("request failed: {0}")]
    Request(String),

    /// No provider is available in this build or configuration.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),

    /// Output format error.
    #[error("output format error: {0}")]
    OutputFormat(String),
}

// Implement From traits for standard library and dependency errors

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<evalexpr::EvalexprError> for CalcError {
    fn from(err: evalexpr::EvalexprError) -> Self {
        Self::Evaluation(err.to_string())
    }
}

impl From<evalexpr::EvalexprError> for Error {
    fn from(err: evalexpr::EvalexprError) -> Self {
        Self::Calc(CalcError::from(err))
    }
}

#[cfg(feature = "openai")]
impl From<async_openai::error::OpenAIError> for ProviderError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        Self::Request(err.to_string())
    }
}
