use async_trait::async_trait;
use serde_json::Value;
use sqlx::{
    mysql::{MySqlPoolOptions, MySqlRow},
    Column as _, MySqlPool, Row as _,
};

use crate::{
    errors::GenError,
    models::schema::{Column, ForeignKey},
};

use super::{
    column_type::normalize_type,
    row::{self, Row},
    DbClient, Dialect, Statement,
};

pub struct MySqlClient {
    pub pool: MySqlPool,
}

impl MySqlClient {
    pub async fn connect(database_url: &str) -> Result<Self, GenError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| GenError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }
}

fn row_values(row: &MySqlRow) -> Result<Row, GenError> {
    (0..row.columns().len())
        .map(|i| {
            if let Ok(val) = row.try_get::<Option<String>, _>(i) {
                return Ok(val.map(Value::String).unwrap_or(Value::Null));
            }
            if let Ok(val) = row.try_get::<Option<i64>, _>(i) {
                return Ok(val.map(Value::from).unwrap_or(Value::Null));
            }
            if let Ok(val) = row.try_get::<Option<u64>, _>(i) {
                return Ok(val.map(Value::from).unwrap_or(Value::Null));
            }
            // information_schema text columns come back as binary on some servers.
            row.try_get::<Option<Vec<u8>>, _>(i)
                .map(|val| {
                    val.map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
                        .unwrap_or(Value::Null)
                })
                .map_err(|_| row::undecodable(i, &row.column(i).type_info().to_string()))
        })
        .collect()
}

#[async_trait]
impl DbClient for MySqlClient {
    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<Row>, GenError> {
        let mut query = sqlx::query(&statement.sql);
        for param in &statement.params {
            query = query.bind(param.as_str());
        }
        let rows = query.fetch_all(&self.pool).await.map_err(GenError::Sqlx)?;

        rows.iter().map(row_values).collect()
    }
}

/// MySQL and MariaDB, read through `information_schema`.
pub struct MySqlDialect;

#[async_trait]
impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    async fn open(
        &self,
        database_url: &str,
    ) -> Result<Box<dyn DbClient + Send + Sync>, GenError> {
        let client = MySqlClient::connect(database_url).await?;
        Ok(Box::new(client))
    }

    fn tables_query(&self) -> Statement {
        Statement::new(
            r#"
            SELECT table_name AS table_name
            FROM information_schema.tables
            WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE'
            ORDER BY table_name
            "#,
        )
    }

    fn columns_query(&self, table: &str) -> Statement {
        Statement::new(
            r#"
            SELECT column_name AS column_name,
                   column_type AS column_type,
                   is_nullable AS is_nullable,
                   column_key AS column_key,
                   column_default AS column_default,
                   extra AS extra,
                   column_comment AS column_comment
            FROM information_schema.columns
            WHERE table_schema = DATABASE() AND table_name = ?
            ORDER BY ordinal_position
            "#,
        )
        .bind(table)
    }

    fn decode_column(&self, row: &Row) -> Result<Column, GenError> {
        row::expect_width(row, 7, "mysql column")?;

        let column_type = normalize_type(&row::text(row, 1)?);
        let extra = row::text_or_empty(row, 5)?;

        Ok(Column {
            name: row::text(row, 0)?,
            raw_type: column_type.raw_type,
            base_type: column_type.base_type,
            nullable: row::text(row, 2)?.eq_ignore_ascii_case("YES"),
            is_primary_key: row::text_or_empty(row, 3)? == "PRI",
            is_auto_increment: extra.to_lowercase().contains("auto_increment"),
            is_unsigned: column_type.is_unsigned,
            default_value: row::opt_text(row, 4)?,
            comment: row::text_or_empty(row, 6)?,
            enum_values: column_type.enum_values,
        })
    }

    fn foreign_keys_query(&self, table: &str) -> Statement {
        Statement::new(
            r#"
            SELECT column_name AS column_name,
                   referenced_table_name AS referenced_table_name,
                   referenced_column_name AS referenced_column_name
            FROM information_schema.key_column_usage
            WHERE table_schema = DATABASE()
              AND table_name = ?
              AND referenced_table_name IS NOT NULL
            ORDER BY constraint_name, ordinal_position
            "#,
        )
        .bind(table)
    }

    fn decode_foreign_key(&self, row: &Row) -> Result<ForeignKey, GenError> {
        row::expect_width(row, 3, "mysql foreign key")?;

        Ok(ForeignKey {
            column: row::text(row, 0)?,
            referenced_table: row::text(row, 1)?,
            referenced_column: row::text(row, 2)?,
        })
    }
}
