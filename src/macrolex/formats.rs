//! Output formats for token reports
//!
//! A report is one [`LexResult`](crate::macrolex::engine::LexResult): the emitted tokens
//! followed by the collected errors.
//!
//! - `tag`: one line per token or error, meant for humans and snapshot tests
//! - `json`, `yaml`: the serde representation of the whole result

pub mod registry;
pub mod structured;
pub mod tag;

pub use registry::{FormatError, FormatRegistry, Formatter};
pub use structured::{JsonFormatter, YamlFormatter};
pub use tag::{serialize_tags, TagFormatter};
