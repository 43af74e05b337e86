use crate::{
    errors::GenError,
    models::schema::{Column, ForeignKey},
};
use async_trait::async_trait;

pub mod column_type;
pub mod mysql;
pub mod postgres;
pub mod row;
pub mod sqlite;

pub use row::Row;

/// SQL text plus its positional bind parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<String>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }
}

/// An open, read-only handle on one database.
#[async_trait]
pub trait DbClient {
    /// Runs `statement` and returns every row. The cursor is released before
    /// this returns, on success and on error.
    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<Row>, GenError>;
}

/// Engine specific SQL and row decoding.
#[async_trait]
pub trait Dialect {
    fn name(&self) -> &'static str;

    async fn open(&self, database_url: &str)
        -> Result<Box<dyn DbClient + Send + Sync>, GenError>;

    fn tables_query(&self) -> Statement;
    fn columns_query(&self, table: &str) -> Statement;
    fn decode_column(&self, row: &Row) -> Result<Column, GenError>;
    fn foreign_keys_query(&self, table: &str) -> Statement;
    fn decode_foreign_key(&self, row: &Row) -> Result<ForeignKey, GenError>;
}

type DialectFactory = fn() -> Box<dyn Dialect + Send + Sync>;

/// Registered dialect names. Lookup is by lowercased name.
const DIALECTS: &[(&str, DialectFactory)] = &[
    ("mysql", mysql_dialect),
    ("postgres", postgres_dialect),
    ("postgresql", postgres_dialect),
    ("sqlite", sqlite_dialect),
];

fn mysql_dialect() -> Box<dyn Dialect + Send + Sync> {
    Box::new(mysql::MySqlDialect)
}

fn postgres_dialect() -> Box<dyn Dialect + Send + Sync> {
    Box::new(postgres::PostgresDialect)
}

fn sqlite_dialect() -> Box<dyn Dialect + Send + Sync> {
    Box::new(sqlite::SqliteDialect)
}

pub fn new_dialect(db_type: &str) -> Result<Box<dyn Dialect + Send + Sync>, GenError> {
    let wanted = db_type.to_lowercase();
    DIALECTS
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, factory)| factory())
        .ok_or_else(|| GenError::UnsupportedDialect(db_type.to_string()))
}

pub fn supported_dialects() -> Vec<&'static str> {
    DIALECTS.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dialect_is_case_insensitive() {
        assert_eq!(new_dialect("MySQL").unwrap().name(), "mysql");
        assert_eq!(new_dialect("postgresql").unwrap().name(), "postgres");
        assert_eq!(new_dialect("Postgres").unwrap().name(), "postgres");
        assert_eq!(new_dialect("sqlite").unwrap().name(), "sqlite");
    }

    #[test]
    fn test_new_dialect_rejects_unknown_name() {
        match new_dialect("oracle") {
            Err(GenError::UnsupportedDialect(name)) => assert_eq!(name, "oracle"),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("oracle should not be supported"),
        }
    }

    #[test]
    fn test_statement_bind() {
        let stmt = Statement::new("SELECT 1 WHERE a = ?").bind("users");
        assert_eq!(stmt.params, vec!["users".to_string()]);
    }

    #[test]
    fn test_tables_queries_exclude_system_tables() {
        let sqlite = new_dialect("sqlite").unwrap().tables_query();
        assert!(sqlite.sql.contains("NOT LIKE 'sqlite_%'"));

        let postgres = new_dialect("postgres").unwrap().tables_query();
        assert!(postgres.sql.contains("current_schema()"));

        let mysql = new_dialect("mysql").unwrap().tables_query();
        assert!(mysql.sql.contains("DATABASE()"));
        assert!(mysql.sql.contains("BASE TABLE"));
    }
}
