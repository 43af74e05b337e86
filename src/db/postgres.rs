use async_trait::async_trait;
use serde_json::Value;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    Column as _, PgPool, Row as _,
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

pub struct PostgresClient {
    pub pool: PgPool,
}

impl PostgresClient {
    pub async fn connect(database_url: &str) -> Result<Self, GenError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| GenError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }
}

fn row_values(row: &PgRow) -> Result<Row, GenError> {
    (0..row.columns().len())
        .map(|i| {
            if let Ok(val) = row.try_get::<Option<String>, _>(i) {
                return Ok(val.map(Value::String).unwrap_or(Value::Null));
            }
            if let Ok(val) = row.try_get::<Option<i64>, _>(i) {
                return Ok(val.map(Value::from).unwrap_or(Value::Null));
            }
            if let Ok(val) = row.try_get::<Option<i32>, _>(i) {
                return Ok(val.map(Value::from).unwrap_or(Value::Null));
            }
            row.try_get::<Option<bool>, _>(i)
                .map(|val| val.map(Value::Bool).unwrap_or(Value::Null))
                .map_err(|_| row::undecodable(i, &row.column(i).type_info().to_string()))
        })
        .collect()
}

#[async_trait]
impl DbClient for PostgresClient {
    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<Row>, GenError> {
        let mut query = sqlx::query(&statement.sql);
        for param in &statement.params {
            query = query.bind(param.as_str());
        }
        let rows = query.fetch_all(&self.pool).await.map_err(GenError::Sqlx)?;

        rows.iter().map(row_values).collect()
    }
}

/// Postgres, read through `pg_catalog` for the connection's current schema.
pub struct PostgresDialect;

/// Drops the cast Postgres appends to literal defaults:
/// `'draft'::character varying` -> `'draft'`.
fn strip_default_cast(default: String) -> String {
    if default.starts_with('\'') {
        if let Some(pos) = default.rfind("'::") {
            return default[..=pos].to_string();
        }
    }
    default
}

#[async_trait]
impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn open(
        &self,
        database_url: &str,
    ) -> Result<Box<dyn DbClient + Send + Sync>, GenError> {
        let client = PostgresClient::connect(database_url).await?;
        Ok(Box::new(client))
    }

    fn tables_query(&self) -> Statement {
        Statement::new(
            r#"
            SELECT tablename::text AS table_name
            FROM pg_catalog.pg_tables
            WHERE schemaname = current_schema()
            ORDER BY tablename
            "#,
        )
    }

    fn columns_query(&self, table: &str) -> Statement {
        Statement::new(
            r#"
            SELECT a.attname::text AS column_name,
                   format_type(a.atttypid, a.atttypmod) AS column_type,
                   CASE WHEN a.attnotnull THEN 'NO' ELSE 'YES' END AS is_nullable,
                   CASE WHEN EXISTS (
                       SELECT 1 FROM pg_catalog.pg_index i
                       WHERE i.indrelid = c.oid AND i.indisprimary AND a.attnum = ANY(i.indkey)
                   ) THEN 'YES' ELSE 'NO' END AS is_primary,
                   pg_get_expr(d.adbin, d.adrelid) AS column_default,
                   COALESCE(col_description(c.oid, a.attnum), '') AS column_comment
            FROM pg_catalog.pg_attribute a
            JOIN pg_catalog.pg_class c ON c.oid = a.attrelid
            JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
            LEFT JOIN pg_catalog.pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
            WHERE n.nspname = current_schema()
              AND c.relname = $1
              AND a.attnum > 0
              AND NOT a.attisdropped
            ORDER BY a.attnum
            "#,
        )
        .bind(table)
    }

    fn decode_column(&self, row: &Row) -> Result<Column, GenError> {
        row::expect_width(row, 6, "postgres column")?;

        let column_type = normalize_type(&row::text(row, 1)?);
        let default_value = row::opt_text(row, 4)?;
        let is_auto_increment = default_value
            .as_deref()
            .is_some_and(|d| d.contains("nextval"));

        Ok(Column {
            name: row::text(row, 0)?,
            raw_type: column_type.raw_type,
            base_type: column_type.base_type,
            nullable: row::text(row, 2)? == "YES",
            is_primary_key: row::text(row, 3)? == "YES",
            is_auto_increment,
            // Postgres has no unsigned integers.
            is_unsigned: false,
            default_value: default_value.map(strip_default_cast),
            comment: row::text_or_empty(row, 5)?,
            enum_values: column_type.enum_values,
        })
    }

    fn foreign_keys_query(&self, table: &str) -> Statement {
        Statement::new(
            r#"
            SELECT a.attname::text AS column_name,
                   rc.relname::text AS referenced_table,
                   ra.attname::text AS referenced_column
            FROM pg_catalog.pg_constraint con
            JOIN pg_catalog.pg_class c ON c.oid = con.conrelid
            JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
            JOIN pg_catalog.pg_class rc ON rc.oid = con.confrelid
            CROSS JOIN LATERAL unnest(con.conkey, con.confkey)
                WITH ORDINALITY AS k(attnum, refnum, ord)
            JOIN pg_catalog.pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
            JOIN pg_catalog.pg_attribute ra ON ra.attrelid = con.confrelid AND ra.attnum = k.refnum
            WHERE con.contype = 'f'
              AND n.nspname = current_schema()
              AND c.relname = $1
            ORDER BY con.conname, k.ord
            "#,
        )
        .bind(table)
    }

    fn decode_foreign_key(&self, row: &Row) -> Result<ForeignKey, GenError> {
        row::expect_width(row, 3, "postgres foreign key")?;

        Ok(ForeignKey {
            column: row::text(row, 0)?,
            referenced_table: row::text(row, 1)?,
            referenced_column: row::text(row, 2)?,
        })
    }
}
