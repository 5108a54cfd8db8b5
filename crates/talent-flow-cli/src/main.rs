mod input;
mod output;
mod signals;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use talent_flow::audit::StorageAuditSink;
use talent_flow::enrichment::{
    FixtureCompanyLookup, FixtureData, FixtureEmailPatternSource, FixtureLinkedInResolver,
};
use talent_flow::storage::SqliteTalentFlowStore;
use talent_flow::{StateEnricher, TalentFlowRunner};
use talent_flow_core::config::{CliOverrides, TalentFlowConfig};
use talent_flow_core::errors::{TalentFlowError, TalentFlowErrorCode};
use talent_flow_core::traits::ITalentFlowStorage;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Talent Flow movement engine.
#[derive(Parser)]
#[command(name = "talent-flow", version, about = "Detect employment movements and emit CRM signals")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Config file (default: ./talent_flow.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one batch of person states
    Run {
        /// Person states: a JSON array or JSON lines
        #[arg(long)]
        input: PathBuf,
        /// SQLite database (overrides storage.db_path)
        #[arg(long)]
        db: Option<PathBuf>,
        /// Enrichment fixtures (companies, profiles, email patterns)
        #[arg(long)]
        fixtures: Option<PathBuf>,
        /// Evaluation time, RFC 3339 (default: now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// Worker threads, 0 = one per core
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Create or upgrade the database schema
    Migrate {
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// List recent run summaries
    Runs {
        #[arg(long)]
        db: Option<PathBuf>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() {
    talent_flow_core::tracing::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            db,
            fixtures,
            now,
            threads,
        } => cmd_run(RunArgs {
            config: cli.config.as_deref(),
            input: &input,
            db: db.as_deref(),
            fixtures: fixtures.as_deref(),
            now,
            threads,
            output: cli.output,
        }),
        Commands::Migrate { db } => cmd_migrate(cli.config.as_deref(), db.as_deref(), cli.output),
        Commands::Runs { db, limit } => {
            cmd_runs(cli.config.as_deref(), db.as_deref(), limit, cli.output)
        }
        Commands::Config => cmd_config(cli.config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e.coded_string());
        process::exit(1);
    }
}

struct RunArgs<'a> {
    config: Option<&'a Path>,
    input: &'a Path,
    db: Option<&'a Path>,
    fixtures: Option<&'a Path>,
    now: Option<DateTime<Utc>>,
    threads: Option<usize>,
    output: OutputFormat,
}

fn load_config(
    config: Option<&Path>,
    db: Option<&Path>,
    threads: Option<usize>,
) -> Result<TalentFlowConfig, TalentFlowError> {
    let overrides = CliOverrides {
        db_path: db.map(|p| p.display().to_string()),
        threads,
        ..Default::default()
    };
    Ok(TalentFlowConfig::load(Path::new("."), config, Some(&overrides))?)
}

fn open_store(config: &TalentFlowConfig) -> Result<SqliteTalentFlowStore, TalentFlowError> {
    let path = PathBuf::from(config.storage.effective_db_path());
    Ok(SqliteTalentFlowStore::open(&path, &config.storage)?)
}

fn fixture_enricher(path: &Path) -> Result<StateEnricher, TalentFlowError> {
    let data = Arc::new(FixtureData::load(path)?);
    info!(
        companies = data.companies.len(),
        profiles = data.profiles.len(),
        email_patterns = data.email_patterns.len(),
        "enrichment fixtures loaded"
    );
    Ok(StateEnricher::new()
        .with_company_lookup(Arc::new(FixtureCompanyLookup::new(data.clone())))
        .with_linkedin_resolver(Arc::new(FixtureLinkedInResolver::new(data.clone())))
        .with_email_patterns(Arc::new(FixtureEmailPatternSource::new(data))))
}

fn cmd_run(args: RunArgs<'_>) -> Result<(), TalentFlowError> {
    let config = load_config(args.config, args.db, args.threads)?;
    let people = input::load_people(args.input)?;
    if people.rejected > 0 {
        warn!(rejected = people.rejected, "some input records were skipped");
    }

    let store = Arc::new(open_store(&config)?);
    let audit = Arc::new(StorageAuditSink::new(
        store.clone(),
        config.storage.effective_persist_audit(),
    ));
    let mut runner = TalentFlowRunner::new(config, store, audit);
    if let Some(path) = args.fixtures {
        runner = runner.with_enricher(fixture_enricher(path)?);
    }
    signals::cancel_on_shutdown(runner.cancellation_token());

    let rejected = u32::try_from(people.rejected).unwrap_or(u32::MAX);
    let outcome =
        runner.run_with_rejected(people.states, rejected, args.now.unwrap_or_else(Utc::now));
    for failure in outcome.errors.iter() {
        eprintln!("{}: {}", failure.person_id, failure.error.coded_string());
    }
    match args.output {
        OutputFormat::Text => print!("{}", output::render_summary(&outcome.summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome.summary)?),
    }
    Ok(())
}

fn cmd_migrate(
    config: Option<&Path>,
    db: Option<&Path>,
    output: OutputFormat,
) -> Result<(), TalentFlowError> {
    let config = load_config(config, db, None)?;
    let store = open_store(&config)?;
    let version = store.schema_version()?;
    match output {
        OutputFormat::Text => println!(
            "{}: schema version {version}",
            config.storage.effective_db_path()
        ),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "db_path": config.storage.effective_db_path(),
                "schema_version": version,
            })
        ),
    }
    Ok(())
}

fn cmd_runs(
    config: Option<&Path>,
    db: Option<&Path>,
    limit: usize,
    output: OutputFormat,
) -> Result<(), TalentFlowError> {
    let config = load_config(config, db, None)?;
    let store = open_store(&config)?;
    let runs = store.get_recent_runs(limit)?;
    match output {
        OutputFormat::Text if runs.is_empty() => println!("no runs recorded"),
        OutputFormat::Text => {
            for run in &runs {
                print!("{}", output::render_summary(run));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&runs)?),
    }
    Ok(())
}

fn cmd_config(config: Option<&Path>) -> Result<(), TalentFlowError> {
    let config = load_config(config, None, None)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
