use std::path::PathBuf;

use config::GeneratorConfig;
use db::{new_dialect, DbClient, Dialect};
use errors::GenError;
use generator::render_model;
use log::{info, warn};
use output::{Formatter, ModelWriter};
use schema::SchemaReader;

pub mod config;
pub mod db;
pub mod errors;
pub mod generator;
pub mod models;
pub mod output;
pub mod schema;

/// Outcome of a run that got past table listing.
#[derive(Debug, Default)]
pub struct RunReport {
    pub generated: Vec<PathBuf>,
    /// Tables that were skipped, with the reason.
    pub failed: Vec<(String, GenError)>,
    /// Formatter failures; the unformatted files were kept.
    pub warnings: Vec<String>,
}

pub struct ModelGenerator {
    config: GeneratorConfig,
}

impl ModelGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        ModelGenerator { config }
    }

    /// Connects and generates every model. Unknown dialects, connection
    /// failures and table listing failures end the run; anything that goes
    /// wrong for a single table is recorded in the report instead.
    pub async fn run(&self) -> Result<RunReport, GenError> {
        let dialect = new_dialect(&self.config.connection.db_type)?;
        let client = dialect.open(&self.config.connection.database_url).await?;
        info!("Connected to {} database", dialect.name());

        self.generate(client.as_ref(), dialect.as_ref()).await
    }

    pub async fn generate(
        &self,
        client: &(dyn DbClient + Send + Sync),
        dialect: &(dyn Dialect + Send + Sync),
    ) -> Result<RunReport, GenError> {
        let reader = SchemaReader::new(client, dialect);

        let tables = if self.config.tables.is_empty() {
            reader.list_tables().await?
        } else {
            self.config.tables.clone()
        };

        let mut report = RunReport::default();
        if tables.is_empty() {
            info!("No tables found in database");
            return Ok(report);
        }

        let writer = ModelWriter::create(&self.config.output_dir)?;
        let formatter = self.config.formatter.as_deref().map(Formatter::new);

        for table in &tables {
            info!("Generating struct for table: {}", table);

            let path = match self.generate_table(&reader, &writer, table, &tables).await {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping table {}: {}", table, e);
                    report.failed.push((table.clone(), e));
                    continue;
                }
            };

            if let Some(formatter) = &formatter {
                if let Err(e) = formatter.format(&path) {
                    warn!("{}", e);
                    report.warnings.push(e.to_string());
                }
            }
            report.generated.push(path);
        }

        info!(
            "Generated {} of {} models in {}",
            report.generated.len(),
            tables.len(),
            self.config.output_dir.display()
        );
        Ok(report)
    }

    async fn generate_table(
        &self,
        reader: &SchemaReader<'_>,
        writer: &ModelWriter,
        table: &str,
        all_tables: &[String],
    ) -> Result<PathBuf, GenError> {
        let schema = reader.read_table(table, all_tables).await?;
        let source = render_model(&schema, &self.config.render);
        writer.write(table, &source)
    }
}
