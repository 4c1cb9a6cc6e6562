use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use appdoc_core::DocumentGenerator;
use appdoc_core::db::memory::parse_applications;
use appdoc_core::db::{ApplicationRepository, MemoryRepositoryFactory, RepositoryRegistry};
use appdoc_db_sqlite::{SqliteRepository, SqliteRepositoryFactory, default_seeds_dir};
use appdoc_render::{PrintPdfRenderer, TeraViewRenderer};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

mod config;
mod logging;

use config::{AppConfig, DB_ENV};

/// Generate application summary PDFs.
#[derive(Parser, Debug)]
#[command(name = "appdoc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "appdoc.toml")]
    config: PathBuf,

    /// Also append log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the document for one application to a PDF file
    Generate(GenerateArgs),

    /// Store applications from a JSON file in the SQLite database
    Import(ImportArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Application id
    #[arg(short, long)]
    id: Uuid,

    /// Location the template paths are resolved against
    #[arg(short, long, default_value = "file://./assets")]
    base_uri: String,

    /// Output file (defaults to <id>.pdf)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Storage backend, overriding [database] backend
    #[arg(long)]
    backend: Option<String>,

    /// Connection string, overriding [database] and APPDOC_DB. For the
    /// memory backend, a JSON file of applications
    #[arg(short, long)]
    database: Option<String>,
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// JSON file holding one application or an array of them
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite connection string, overriding [database] and APPDOC_DB
    #[arg(short, long)]
    database: Option<String>,

    /// Run seed files after migrations, from DIR or the default seeds
    /// directory when no DIR is given
    #[arg(short, long, value_name = "DIR", num_args = 0..=1)]
    seeds: Option<Option<PathBuf>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let config = AppConfig::load(&cli.config)?.with_db_override(std::env::var(DB_ENV).ok());

    match cli.command {
        Command::Generate(args) => generate(config, args).await,
        Command::Import(args) => import(config, args).await,
    }
}

async fn generate(config: AppConfig, args: GenerateArgs) -> Result<()> {
    let mut db = config.database.clone();
    if let Some(backend) = args.backend {
        db.backend = backend;
    }
    if let Some(database) = args.database {
        db.connection_string = database;
    }

    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry.register(Box::new(MemoryRepositoryFactory));

    let repository: Arc<dyn ApplicationRepository> = registry
        .create(&db)
        .await
        .with_context(|| format!("Failed to open '{}' backend", db.backend))?
        .into();

    let generator = DocumentGenerator::builder()
        .repository(repository)
        .template_paths(Arc::new(config.template_paths()))
        .views(Arc::new(TeraViewRenderer::new()))
        .pdf(Arc::new(PrintPdfRenderer::new(format!("Application {}", args.id))))
        .config(config.document.clone())
        .build()?;

    let bytes = generator
        .generate(args.id, &args.base_uri)
        .await
        .with_context(|| format!("No document generated for application {}", args.id))?;

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(format!("{}.pdf", args.id)));
    write_document(&out, &bytes).await?;
    info!(application_id = %args.id, path = %out.display(), bytes = bytes.len(), "wrote document");

    Ok(())
}

async fn write_document(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write '{}'", path.display()))
}

async fn import(config: AppConfig, args: ImportArgs) -> Result<()> {
    if config.database.backend != "sqlite" {
        bail!(
            "import writes to SQLite, but the configured backend is '{}'",
            config.database.backend
        );
    }
    let database = args
        .database
        .unwrap_or_else(|| config.database.connection_string.clone());

    let content = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;
    let applications = parse_applications(&content)
        .with_context(|| format!("Failed to parse JSON: {}", args.file.display()))?;

    let repo = SqliteRepository::new(&database).await?;
    repo.run_migrations().await?;
    if let Some(seeds_dir) = args.seeds {
        let seeds_dir = seeds_dir.unwrap_or_else(default_seeds_dir);
        repo.run_seeds(&seeds_dir).await?;
        info!(seeds = %seeds_dir.display(), "applied seeds");
    }

    for application in &applications {
        repo.save_application(application)
            .await
            .with_context(|| format!("Failed to save application {}", application.id))?;
    }
    info!(count = applications.len(), %database, "imported applications");

    Ok(())
}

#[cfg(test)]
mod tests {
    use appdoc_core::ApplicationState;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_defaults() {
        let cli = Cli::parse_from([
            "appdoc",
            "generate",
            "--id",
            "0b7e7c1e-4d8a-4f7e-9a51-3f0c2d6a1002",
        ]);

        assert_eq!(cli.config, PathBuf::from("appdoc.toml"));
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.base_uri, "file://./assets");
        assert_eq!(args.out, None);
    }

    #[test]
    fn sample_application_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets/sample_application.json");
        let content = std::fs::read_to_string(path).unwrap();

        let applications = parse_applications(&content).unwrap();

        assert_eq!(applications.len(), 1);
        assert_eq!(applications[0].state, ApplicationState::InReview);
        assert!(applications[0].current_review.is_some());
    }

    #[tokio::test]
    async fn import_then_generate_writes_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("appdoc.db").display().to_string();
        let config = AppConfig::from_toml_str(&format!(
            r#"
            [document]
            support_email = "support@example.com"
            signature = "The Onboarding Team"
            tax_rate = "0.85"

            [database]
            connection_string = "{database}"
            "#
        ))
        .unwrap();

        import(
            config.clone(),
            ImportArgs {
                file: Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets/sample_application.json"),
                database: None,
                seeds: None,
            },
        )
        .await
        .unwrap();

        let out = dir.path().join("out.pdf");
        let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets");
        generate(
            config,
            GenerateArgs {
                id: Uuid::parse_str("5f1c9a7e-2b3d-4c8e-a9f0-7d6e5c4b3a21").unwrap(),
                base_uri: format!("file://{}", assets.display()),
                out: Some(out.clone()),
                backend: None,
                database: None,
            },
        )
        .await
        .unwrap();

        let bytes = std::fs::read(out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn seeds_flag_takes_an_optional_directory() {
        let parse = |extra: &[&str]| {
            let cli = Cli::parse_from(
                ["appdoc", "import", "--file", "apps.json"]
                    .iter()
                    .chain(extra),
            );
            let Command::Import(args) = cli.command else {
                panic!("expected import");
            };
            args.seeds
        };

        assert_eq!(parse(&[]), None);
        assert_eq!(parse(&["--seeds"]), Some(None));
        assert_eq!(
            parse(&["--seeds", "my-seeds"]),
            Some(Some(PathBuf::from("my-seeds")))
        );
    }

    #[tokio::test]
    async fn generate_from_memory_backend_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_toml_str(
            r#"
            [document]
            support_email = "support@example.com"
            signature = "The Onboarding Team"
            tax_rate = "0.85"
            "#,
        )
        .unwrap();

        let out = dir.path().join("memory.pdf");
        let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets");
        generate(
            config,
            GenerateArgs {
                id: Uuid::parse_str("5f1c9a7e-2b3d-4c8e-a9f0-7d6e5c4b3a21").unwrap(),
                base_uri: format!("file://{}", assets.display()),
                out: Some(out.clone()),
                backend: Some("memory".to_string()),
                database: Some(assets.join("sample_application.json").display().to_string()),
            },
        )
        .await
        .unwrap();

        let bytes = std::fs::read(out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn import_seeds_then_keeps_imported_rows() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("appdoc.db").display().to_string();
        let config = AppConfig::from_toml_str(&format!(
            r#"
            [document]
            support_email = "support@example.com"
            signature = "The Onboarding Team"
            tax_rate = "0.85"

            [database]
            connection_string = "{database}"
            "#
        ))
        .unwrap();
        let seeds = Path::new(env!("CARGO_MANIFEST_DIR")).join("../appdoc-db-sqlite/seeds");

        import(
            config.clone(),
            ImportArgs {
                file: Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets/sample_application.json"),
                database: None,
                seeds: Some(Some(seeds)),
            },
        )
        .await
        .unwrap();

        let mut registry = RepositoryRegistry::new();
        registry.register(Box::new(SqliteRepositoryFactory));
        let repo = registry.create(&config.database).await.unwrap();
        let seeded = Uuid::parse_str("0b7e7c1e-4d8a-4f7e-9a51-3f0c2d6a1002").unwrap();
        let imported = Uuid::parse_str("5f1c9a7e-2b3d-4c8e-a9f0-7d6e5c4b3a21").unwrap();
        assert_eq!(
            repo.get_application(seeded).await.unwrap().reference_number,
            "APP-1002"
        );
        assert_eq!(
            repo.get_application(imported).await.unwrap().reference_number,
            "APP-2001"
        );
    }

    #[tokio::test]
    async fn import_refuses_non_sqlite_backend() {
        let config = AppConfig::from_toml_str(
            r#"
            [document]
            support_email = "support@example.com"
            signature = "The Onboarding Team"
            tax_rate = "0.85"

            [database]
            backend = "memory"
            "#,
        )
        .unwrap();

        let err = import(
            config,
            ImportArgs {
                file: PathBuf::from("unused.json"),
                database: None,
                seeds: None,
            },
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("'memory'"));
    }
}
