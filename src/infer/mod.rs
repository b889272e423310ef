//! Type inference over a stream of JSON records
//!
//! Each record is classified into a fresh type node and folded into the
//! running type with [`merge_types`], starting from [`TypeDef::Never`].

pub mod classify;
pub mod merge;

pub use classify::process_value;
pub use merge::merge_types;

use crate::config::{InferConfig, JsonBackend};
use crate::error::{Error, Result};
use crate::types::{Position, TypeDef};
use serde_json::Value;
use std::io::BufRead;
use std::mem;
use tracing::{debug, warn};

/// Accumulates the type of every record added to it
#[derive(Debug)]
pub struct TypeInferrer {
    config: InferConfig,
    current: TypeDef,
    records: usize,
}

impl TypeInferrer {
    pub fn new(config: InferConfig) -> Self {
        TypeInferrer {
            config,
            current: TypeDef::Never,
            records: 0,
        }
    }

    /// Fold one decoded record into the running type
    pub fn add_value(&mut self, value: &Value) -> Result<()> {
        let observed = process_value(value, &Position::root(), &self.config)?;
        let current = mem::replace(&mut self.current, TypeDef::Never);
        self.current = merge_types(current, observed)?;
        self.records += 1;
        debug!(record = self.records, root = %self.current.type_enum(), "merged record");
        Ok(())
    }

    /// Number of records folded so far
    pub fn record_count(&self) -> usize {
        self.records
    }

    pub fn current(&self) -> &TypeDef {
        &self.current
    }

    pub fn finish(self) -> TypeDef {
        self.current
    }
}

impl Default for TypeInferrer {
    fn default() -> Self {
        Self::new(InferConfig::default())
    }
}

/// Result of inferring over a line-oriented reader
#[derive(Debug)]
pub struct Inference {
    pub root: TypeDef,
    pub records: usize,
    pub skipped: usize,
}

/// Decode one input line; `line` is 1-based and only used for diagnostics
///
/// Bytes that are not valid UTF-8 fail here like any other malformed line.
pub fn decode_line(raw: &[u8], line: usize, backend: JsonBackend) -> Result<Value> {
    match backend {
        JsonBackend::SerdeJson => serde_json::from_slice::<Value>(raw).map_err(|source| Error::Decode {
            line,
            raw: String::from_utf8_lossy(raw).into_owned(),
            source,
        }),
        JsonBackend::Simd => {
            let mut bytes = raw.to_vec();
            simd_json::serde::from_slice::<Value>(&mut bytes).map_err(|source| Error::SimdDecode {
                line,
                raw: String::from_utf8_lossy(raw).into_owned(),
                source,
            })
        }
    }
}

/// Infer the type of every JSON line in `reader`
///
/// Blank lines are ignored and lines that fail to decode are logged and
/// skipped. `on_record` receives the zero-based index of each record before
/// it is merged.
pub fn infer_from_reader<R, F>(mut reader: R, config: InferConfig, mut on_record: F) -> Result<Inference>
where
    R: BufRead,
    F: FnMut(usize),
{
    let backend = config.backend;
    let mut inferrer = TypeInferrer::new(config);
    let mut skipped = 0;
    let mut buffer = Vec::new();
    let mut line = 0;

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line += 1;

        let raw = buffer.trim_ascii();
        if raw.is_empty() {
            continue;
        }

        let value = match decode_line(raw, line, backend) {
            Ok(value) => value,
            Err(err) if err.is_recoverable() => {
                warn!("{err}");
                skipped += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        on_record(inferrer.record_count());
        inferrer.add_value(&value)?;
    }

    Ok(Inference {
        records: inferrer.record_count(),
        root: inferrer.finish(),
        skipped,
    })
}

/// Infer one type covering every value in `records`
pub fn infer_type(records: &[Value]) -> Result<TypeDef> {
    infer_type_with(records, InferConfig::default())
}

pub fn infer_type_with(records: &[Value], config: InferConfig) -> Result<TypeDef> {
    let mut inferrer = TypeInferrer::new(config);
    for record in records {
        inferrer.add_value(record)?;
    }
    Ok(inferrer.finish())
}
