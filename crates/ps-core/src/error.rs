//! Error types for the game core
//!
//! Only construction and configuration can fail. Gameplay commands are
//! policy decisions and report through response values instead.

use thiserror::Error;

use crate::symbols::SymbolId;

/// Core error type
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Symbol catalog is empty")]
    EmptyCatalog,

    #[error("Duplicate symbol id: {0}")]
    DuplicateSymbol(SymbolId),

    #[error("Invalid bet rules: {0}")]
    InvalidBetRules(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Invalid timing: {0}")]
    InvalidTiming(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;
