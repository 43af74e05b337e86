use std::path::PathBuf;

use crate::{
    errors::GenError, generator::RenderOptions, models::connections::ConnectionConfig,
};

/// Environment variable consulted when no DSN is given on the command line.
pub const DSN_ENV: &str = "DATABASE_DSN";

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub connection: ConnectionConfig,
    pub output_dir: PathBuf,
    /// Tables to generate; empty means every table the database lists.
    pub tables: Vec<String>,
    pub render: RenderOptions,
    /// External formatter run on each written file, if any.
    pub formatter: Option<String>,
}

impl GeneratorConfig {
    pub fn new(db_type: &str, dsn: Option<String>, output_dir: PathBuf) -> Result<Self, GenError> {
        Ok(Self {
            connection: ConnectionConfig {
                db_type: db_type.to_string(),
                database_url: require_dsn(dsn)?,
            },
            output_dir,
            tables: Vec::new(),
            render: RenderOptions::default(),
            formatter: None,
        })
    }
}

pub fn require_dsn(dsn: Option<String>) -> Result<String, GenError> {
    dsn.map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| {
            GenError::Config(format!(
                "database DSN not provided (use --dsn or set {})",
                DSN_ENV
            ))
        })
}

/// `"users, posts,,tags"` -> `["users", "posts", "tags"]`.
pub fn parse_table_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_dsn() {
        assert_eq!(require_dsn(Some(" sqlite::memory: ".into())).unwrap(), "sqlite::memory:");
        assert!(matches!(require_dsn(None), Err(GenError::Config(_))));
        assert!(matches!(require_dsn(Some("  ".into())), Err(GenError::Config(_))));
    }

    #[test]
    fn test_parse_table_list() {
        assert_eq!(
            parse_table_list("users, posts,,tags"),
            vec!["users".to_string(), "posts".to_string(), "tags".to_string()]
        );
        assert!(parse_table_list("").is_empty());
    }

    #[test]
    fn test_new_defaults() {
        let config =
            GeneratorConfig::new("mysql", Some("mysql://localhost/db".into()), "./models".into())
                .unwrap();
        assert_eq!(config.connection.db_type, "mysql");
        assert_eq!(config.render.package, "models");
        assert!(config.tables.is_empty());
        assert!(config.formatter.is_none());
    }
}
