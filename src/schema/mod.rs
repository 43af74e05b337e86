pub mod reader;
pub mod relations;

pub use reader::SchemaReader;
pub use relations::{infer_foreign_keys, merge_foreign_keys};
