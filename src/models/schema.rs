use serde::{Deserialize, Serialize};

/// One table column, normalized across engines.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Column {
    pub name: String,
    /// Lowercased type text as reported by the engine, e.g. `int(11) unsigned`.
    pub raw_type: String,
    /// Lookup key for type mapping: modifiers and `unsigned` removed.
    pub base_type: String,
    pub nullable: bool,
    pub is_primary_key: bool,
    pub is_auto_increment: bool,
    pub is_unsigned: bool,
    pub default_value: Option<String>,
    pub comment: String,
    /// Full `enum(...)`/`set(...)` definition, empty for every other type.
    pub enum_values: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKey {
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

impl ForeignKey {
    pub fn new(column: &str, referenced_table: &str, referenced_column: &str) -> Self {
        Self {
            column: column.to_string(),
            referenced_table: referenced_table.to_string(),
            referenced_column: referenced_column.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TableSchema {
    pub table_name: String,
    /// Columns in ordinal position order.
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
}
