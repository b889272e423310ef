//! # json2type - Python type inference for JSON streams
//!
//! Infers one structural type covering every record of a newline-delimited
//! JSON stream and renders it as Python `typing` source: `TypedDict` classes
//! for objects, `t.Literal[...]` for low-cardinality strings, `t.Optional`
//! and `t.Union` for heterogeneous fields.
//!
//! ## Modules
//!
//! - **types**: the type model (`TypeDef` and its node kinds)
//! - **infer**: classification of JSON values and unification of type nodes
//! - **render**: Python source generation
//!
//! ## Quick Start
//!
//! ```rust
//! use json2type::{infer_type, render_module, RenderConfig};
//! use serde_json::json;
//!
//! # fn main() -> json2type::Result<()> {
//! let records = vec![
//!     json!({"id": 1, "status": "active"}),
//!     json!({"id": 2, "status": "disabled", "note": null}),
//! ];
//!
//! let root = infer_type(&records)?;
//! let module = render_module(&root, &RenderConfig::default());
//!
//! assert!(module.contains("status: t.Literal['active', 'disabled']"));
//! assert!(module.contains("note: t.NotRequired[None]"));
//! assert!(module.ends_with("RootType = RootDict"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod infer;
pub mod render;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{InferConfig, JsonBackend, RenderConfig};
pub use error::{Error, Result};
pub use infer::{infer_from_reader, infer_type, merge_types, process_value, Inference, TypeInferrer};
pub use render::{render_module, TypeRenderer};
pub use types::{Position, TypeDef, TypeEnum};
