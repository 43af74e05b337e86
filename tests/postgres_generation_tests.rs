//! Runs against a live server: `POSTGRES_DATABASE_URL=postgres://... cargo test -- --ignored`

use std::env;
use std::fs;

use gormgen::config::GeneratorConfig;
use gormgen::db::postgres::{PostgresClient, PostgresDialect};
use gormgen::schema::SchemaReader;
use gormgen::ModelGenerator;
use sqlx::Executor;

async fn setup_test_db() -> (PostgresClient, String) {
    dotenv::dotenv().ok();
    let database_url =
        env::var("POSTGRES_DATABASE_URL").expect("POSTGRES_DATABASE_URL must be set");
    let client = PostgresClient::connect(&database_url).await.unwrap();

    for ddl in [
        "DROP TABLE IF EXISTS widgets",
        "DROP TABLE IF EXISTS makers",
        "CREATE TABLE makers (id SERIAL PRIMARY KEY, title TEXT NOT NULL)",
        r#"
        CREATE TABLE widgets (
            id SERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL DEFAULT 'gizmo',
            maker_id INTEGER REFERENCES makers(id),
            price NUMERIC(10,2),
            active BOOLEAN NOT NULL DEFAULT true,
            created_at TIMESTAMP
        )
        "#,
        "COMMENT ON COLUMN widgets.name IS 'Display\n  name'",
    ] {
        client.pool.execute(ddl).await.unwrap();
    }

    (client, database_url)
}

#[tokio::test]
#[ignore = "needs POSTGRES_DATABASE_URL"]
async fn test_postgres_catalog_queries() {
    let (client, database_url) = setup_test_db().await;
    let reader = SchemaReader::new(&client, &PostgresDialect);

    let tables = reader.list_tables().await.unwrap();
    assert!(tables.contains(&"widgets".to_string()));
    assert!(tables.contains(&"makers".to_string()));
    assert!(tables.iter().all(|t| !t.starts_with("pg_") && !t.starts_with("sql_")));

    let columns = reader.list_columns("widgets").await.unwrap();
    let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "name", "maker_id", "price", "active", "created_at"]
    );

    assert!(columns[0].is_primary_key);
    assert!(columns[0].is_auto_increment);
    assert!(!columns[0].nullable);
    assert_eq!(columns[0].base_type, "integer");

    assert_eq!(columns[1].raw_type, "character varying(100)");
    assert_eq!(columns[1].base_type, "character varying");
    assert_eq!(columns[1].default_value.as_deref(), Some("'gizmo'"));
    assert_eq!(columns[1].comment, "Display\n  name");
    assert!(!columns[1].is_primary_key);

    assert!(columns[2].nullable);
    assert_eq!(columns[3].base_type, "numeric");
    assert_eq!(columns[4].default_value.as_deref(), Some("true"));
    assert_eq!(columns[5].base_type, "timestamp without time zone");

    let fks = reader.list_foreign_keys("widgets").await.unwrap();
    assert_eq!(fks.len(), 1);
    assert_eq!(fks[0].column, "maker_id");
    assert_eq!(fks[0].referenced_table, "makers");
    assert_eq!(fks[0].referenced_column, "id");

    let tmp = tempfile::tempdir().unwrap();
    let mut config =
        GeneratorConfig::new("postgres", Some(database_url), tmp.path().to_path_buf()).unwrap();
    config.tables = vec!["makers".to_string(), "widgets".to_string()];
    let report = ModelGenerator::new(config).run().await.unwrap();
    assert_eq!(report.generated.len(), 2);

    let widgets = fs::read_to_string(tmp.path().join("widgets.go")).unwrap();
    assert!(widgets.contains("\tName string `gorm:\"column:name;not null;default:gizmo;comment:Display name\"`\n"));
    assert!(widgets.contains("\tPrice *float64 `gorm:\"column:price\"`\n"));
    assert!(widgets.contains("\tCreatedAt time.Time `gorm:\"column:created_at\"`\n"));
    assert_eq!(widgets.matches("\tMaker *Makers ").count(), 1);
}
