use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConnectionConfig {
    /// Dialect name as given by the user, e.g. `mysql` or `postgresql`.
    pub db_type: String,
    pub database_url: String,
}
