use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gormgen::config::{parse_table_list, GeneratorConfig};
use gormgen::db::supported_dialects;
use gormgen::ModelGenerator;
use log::{error, info, warn};

#[derive(Parser)]
#[command(name = "gormgen")]
#[command(about = "Generate GORM model structs from an existing database schema")]
#[command(version)]
struct Cli {
    /// Database DSN connection string
    #[arg(long, env = "DATABASE_DSN")]
    dsn: Option<String>,

    /// Database type (mysql, postgres, sqlite)
    #[arg(short = 't', long = "type", default_value = "mysql")]
    db_type: String,

    /// Output path for generated files
    #[arg(short, long, default_value = "./models")]
    output: PathBuf,

    /// Comma separated table names (all tables when omitted)
    #[arg(long)]
    tables: Option<String>,

    /// Go package name of the generated files
    #[arg(long, default_value = "models")]
    package: String,

    /// Embed gorm.Model in every struct
    #[arg(long)]
    base_model: bool,

    /// Formatter run on each generated file
    #[arg(long, default_value = "gofmt")]
    formatter: String,

    /// Do not run the formatter
    #[arg(long)]
    no_format: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match GeneratorConfig::new(&cli.db_type, cli.dsn, cli.output) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            error!(
                "usage: gormgen --dsn <DSN> --type <{}> --output ./models [--tables a,b]",
                supported_dialects().join("|")
            );
            return ExitCode::FAILURE;
        }
    };
    config.tables = cli.tables.as_deref().map(parse_table_list).unwrap_or_default();
    config.render.package = cli.package;
    config.render.include_base_model = cli.base_model;
    config.formatter = (!cli.no_format).then_some(cli.formatter);

    match ModelGenerator::new(config).run().await {
        Ok(report) => {
            for (table, e) in &report.failed {
                warn!("{}: {}", table, e);
            }
            info!(
                "{} generated, {} failed, {} formatter warnings",
                report.generated.len(),
                report.failed.len(),
                report.warnings.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
