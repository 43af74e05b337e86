pub mod emitter;
pub mod types;

pub use emitter::{render_model, to_pascal_case, RenderOptions};
pub use types::map_sql_type_to_go;
