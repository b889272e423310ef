//! Error types for json2type
//!
//! Decode errors describe a single bad input line and are recovered by the
//! driver. Every other variant aborts the run.

use crate::types::{Position, TypeEnum};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid JSON on line {line}: {source}: {raw}")]
    Decode {
        line: usize,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid JSON on line {line}: {source}: {raw}")]
    SimdDecode {
        line: usize,
        raw: String,
        #[source]
        source: simd_json::Error,
    },

    #[error("Unsupported JSON value at {position}: {value}")]
    UnsupportedValueKind { position: Position, value: String },

    #[error("Cannot merge types observed at different positions: {left} and {right}")]
    PositionMismatch { left: Position, right: Position },

    #[error("Cannot merge \"{left}\" and \"{right}\"")]
    IncompatibleMerge { left: TypeEnum, right: TypeEnum },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the driver may skip the offending record and continue
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Decode { .. } | Error::SimdDecode { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
