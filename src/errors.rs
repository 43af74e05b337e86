use thiserror::Error;

/// Error type for schema introspection and model generation.
#[derive(Error, Debug)]
pub enum GenError {
    /// The requested database type has no registered dialect.
    #[error("unsupported database type: {0}")]
    UnsupportedDialect(String),
    /// Opening the database failed (network, auth, bad DSN).
    #[error("Connection error: {0}")]
    Connection(String),
    /// A statement failed to execute.
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    /// A metadata row did not have the expected shape.
    #[error("Query error: {0}")]
    Query(String),
    #[error("Output error: {0}")]
    Output(String),
    #[error("Format error: {0}")]
    Format(String),
    /// Configuration error (e.g. missing DSN).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GenError {
    /// True for failures that belong to the query stage: statement execution
    /// or row decoding.
    pub fn is_query_error(&self) -> bool {
        matches!(self, GenError::Sqlx(_) | GenError::Query(_))
    }
}
