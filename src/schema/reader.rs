use log::debug;

use crate::{
    db::{row, DbClient, Dialect, Row, Statement},
    errors::GenError,
    models::schema::{Column, ForeignKey, TableSchema},
};

use super::relations::{infer_foreign_keys, merge_foreign_keys};

/// Runs a dialect's metadata queries over an open client. Nothing is cached;
/// every call queries the database again.
pub struct SchemaReader<'a> {
    client: &'a (dyn DbClient + Send + Sync),
    dialect: &'a (dyn Dialect + Send + Sync),
}

impl<'a> SchemaReader<'a> {
    pub fn new(
        client: &'a (dyn DbClient + Send + Sync),
        dialect: &'a (dyn Dialect + Send + Sync),
    ) -> Self {
        Self { client, dialect }
    }

    async fn fetch(&self, statement: Statement) -> Result<Vec<Row>, GenError> {
        debug!(
            "[{}] {} {:?}",
            self.dialect.name(),
            statement.sql.split_whitespace().collect::<Vec<_>>().join(" "),
            statement.params
        );
        self.client.fetch_rows(&statement).await
    }

    pub async fn list_tables(&self) -> Result<Vec<String>, GenError> {
        let rows = self.fetch(self.dialect.tables_query()).await?;

        rows.iter().map(|r| row::text(r, 0)).collect()
    }

    pub async fn list_columns(&self, table: &str) -> Result<Vec<Column>, GenError> {
        let rows = self.fetch(self.dialect.columns_query(table)).await?;

        rows.iter()
            .map(|row| self.dialect.decode_column(row))
            .collect()
    }

    pub async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>, GenError> {
        let rows = self.fetch(self.dialect.foreign_keys_query(table)).await?;

        rows.iter()
            .map(|row| self.dialect.decode_foreign_key(row))
            .collect()
    }

    /// Reads one table and completes its foreign keys with the ones implied
    /// by `<name>_id` columns pointing into `all_tables`.
    pub async fn read_table(
        &self,
        table: &str,
        all_tables: &[String],
    ) -> Result<TableSchema, GenError> {
        let columns = self.list_columns(table).await?;
        let declared = self.list_foreign_keys(table).await?;
        let inferred = infer_foreign_keys(table, &columns, all_tables);
        debug!(
            "{}: {} declared, {} inferred foreign keys",
            table,
            declared.len(),
            inferred.len()
        );

        Ok(TableSchema {
            table_name: table.to_string(),
            columns,
            foreign_keys: merge_foreign_keys(declared, inferred),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mysql::MySqlDialect;
    use async_trait::async_trait;
    use mockall::mock;
    use serde_json::json;

    mock! {
        pub Client {}

        #[async_trait]
        impl DbClient for Client {
            async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<Row>, GenError>;
        }
    }

    fn mysql_column(name: &str, ty: &str, nullable: &str, key: &str, extra: &str) -> Row {
        vec![
            json!(name),
            json!(ty),
            json!(nullable),
            json!(key),
            serde_json::Value::Null,
            json!(extra),
            json!(""),
        ]
    }

    #[tokio::test]
    async fn test_list_tables() {
        let mut client = MockClient::new();
        client
            .expect_fetch_rows()
            .withf(|stmt| stmt.sql.contains("information_schema.tables"))
            .returning(|_| Ok(vec![vec![json!("posts")], vec![json!("users")]]));

        let reader = SchemaReader::new(&client, &MySqlDialect);
        let tables = reader.list_tables().await.unwrap();
        assert_eq!(tables, vec!["posts".to_string(), "users".to_string()]);
    }

    #[tokio::test]
    async fn test_list_columns_keeps_order() {
        let mut client = MockClient::new();
        client
            .expect_fetch_rows()
            .withf(|stmt| stmt.params == vec!["posts".to_string()])
            .returning(|_| {
                Ok(vec![
                    mysql_column("id", "int(11)", "NO", "PRI", "auto_increment"),
                    mysql_column("title", "varchar(200)", "NO", "", ""),
                    mysql_column("user_id", "int(11)", "YES", "MUL", ""),
                ])
            });

        let reader = SchemaReader::new(&client, &MySqlDialect);
        let columns = reader.list_columns("posts").await.unwrap();
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "title", "user_id"]);
        assert!(columns[0].is_auto_increment);
    }

    #[tokio::test]
    async fn test_decode_failure_aborts_table() {
        let mut client = MockClient::new();
        client
            .expect_fetch_rows()
            .returning(|_| Ok(vec![vec![json!("id"), json!("int")]]));

        let reader = SchemaReader::new(&client, &MySqlDialect);
        let err = reader.list_columns("posts").await.unwrap_err();
        assert!(err.is_query_error());
    }

    #[tokio::test]
    async fn test_statement_failure_is_surfaced() {
        let mut client = MockClient::new();
        client
            .expect_fetch_rows()
            .returning(|_| Err(GenError::Sqlx(sqlx::Error::RowNotFound)));

        let reader = SchemaReader::new(&client, &MySqlDialect);
        assert!(reader.list_tables().await.unwrap_err().is_query_error());
    }

    #[tokio::test]
    async fn test_read_table_merges_declared_and_inferred() {
        let mut client = MockClient::new();
        client
            .expect_fetch_rows()
            .withf(|stmt| stmt.sql.contains("information_schema.columns"))
            .returning(|_| {
                Ok(vec![
                    mysql_column("id", "int(11)", "NO", "PRI", "auto_increment"),
                    mysql_column("user_id", "int(11)", "NO", "MUL", ""),
                    mysql_column("category_id", "int(11)", "YES", "", ""),
                ])
            });
        client
            .expect_fetch_rows()
            .withf(|stmt| stmt.sql.contains("key_column_usage"))
            .returning(|_| Ok(vec![vec![json!("user_id"), json!("users"), json!("id")]]));

        let tables = vec![
            "categories".to_string(),
            "posts".to_string(),
            "users".to_string(),
        ];
        let reader = SchemaReader::new(&client, &MySqlDialect);
        let schema = reader.read_table("posts", &tables).await.unwrap();

        assert_eq!(schema.table_name, "posts");
        assert_eq!(schema.columns.len(), 3);
        assert_eq!(
            schema.foreign_keys,
            vec![
                ForeignKey::new("user_id", "users", "id"),
                ForeignKey::new("category_id", "categories", "id"),
            ]
        );
    }
}
