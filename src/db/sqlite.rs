use async_trait::async_trait;
use serde_json::Value;
use sqlx::{
    sqlite::{SqlitePoolOptions, SqliteRow},
    Column as _, Row as _, SqlitePool,
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

pub struct SqliteClient {
    pub pool: SqlitePool,
}

impl SqliteClient {
    pub async fn connect(database_url: &str) -> Result<Self, GenError> {
        // One connection: an in-memory database lives and dies with it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| GenError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }
}

fn row_values(row: &SqliteRow) -> Result<Row, GenError> {
    (0..row.columns().len())
        .map(|i| {
            if let Ok(val) = row.try_get::<Option<String>, _>(i) {
                return Ok(val.map(Value::String).unwrap_or(Value::Null));
            }
            row.try_get::<Option<i64>, _>(i)
                .map(|val| val.map(Value::from).unwrap_or(Value::Null))
                .map_err(|_| row::undecodable(i, &row.column(i).type_info().to_string()))
        })
        .collect()
}

#[async_trait]
impl DbClient for SqliteClient {
    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<Row>, GenError> {
        let mut query = sqlx::query(&statement.sql);
        for param in &statement.params {
            query = query.bind(param.as_str());
        }
        let rows = query.fetch_all(&self.pool).await.map_err(GenError::Sqlx)?;

        rows.iter().map(row_values).collect()
    }
}

/// SQLite, read through the table-valued pragma functions.
pub struct SqliteDialect;

#[async_trait]
impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn open(
        &self,
        database_url: &str,
    ) -> Result<Box<dyn DbClient + Send + Sync>, GenError> {
        let client = SqliteClient::connect(database_url).await?;
        Ok(Box::new(client))
    }

    fn tables_query(&self) -> Statement {
        Statement::new(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
    }

    fn columns_query(&self, table: &str) -> Statement {
        Statement::new(
            r#"
            SELECT name, type, "notnull", dflt_value, pk,
                   (SELECT COUNT(*) FROM pragma_table_info(?1) WHERE pk > 0) AS pk_count
            FROM pragma_table_info(?1)
            ORDER BY cid
            "#,
        )
        .bind(table)
    }

    fn decode_column(&self, row: &Row) -> Result<Column, GenError> {
        row::expect_width(row, 6, "sqlite column")?;

        let column_type = normalize_type(&row::text_or_empty(row, 1)?);
        let pk = row::int(row, 4)?;
        let pk_count = row::int(row, 5)?;

        // Only a lone column declared exactly `INTEGER PRIMARY KEY` aliases the rowid.
        let is_rowid_alias = column_type.raw_type == "integer" && pk > 0 && pk_count == 1;

        Ok(Column {
            name: row::text(row, 0)?,
            raw_type: column_type.raw_type,
            base_type: column_type.base_type,
            nullable: row::int(row, 2)? == 0 && !is_rowid_alias,
            is_primary_key: pk > 0,
            is_auto_increment: is_rowid_alias,
            is_unsigned: column_type.is_unsigned,
            default_value: row::opt_text(row, 3)?,
            comment: String::new(),
            enum_values: column_type.enum_values,
        })
    }

    fn foreign_keys_query(&self, table: &str) -> Statement {
        Statement::new(
            r#"SELECT "from", "table", "to" FROM pragma_foreign_key_list(?1) ORDER BY id, seq"#,
        )
        .bind(table)
    }

    fn decode_foreign_key(&self, row: &Row) -> Result<ForeignKey, GenError> {
        row::expect_width(row, 3, "sqlite foreign key")?;

        // `REFERENCES users` without a column list targets the primary key.
        let referenced_column = row::opt_text(row, 2)?.unwrap_or_else(|| "id".to_string());

        Ok(ForeignKey {
            column: row::text(row, 0)?,
            referenced_table: row::text(row, 1)?,
            referenced_column,
        })
    }
}
