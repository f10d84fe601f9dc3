use catalogstore::aggregate::{self, Summary};
use catalogstore::models::{Client, Document, Service, Task};
use catalogstore::predicate::parse_selector;
use catalogstore::{
    Config, FilterEngine, FilterInput, FilteredView, JsonlSource, PredicateSet, Record, RecordSource, SortRule,
    StaticSource, Store, jsonl, samples,
};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use eyre::{Context, Result};
use std::fmt::Display;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "catalogstore")]
#[command(about = "Filter and summarise the advisory portal catalogs")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Config file (default: <config dir>/catalogstore/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSONL file to load instead of the configured data directory or built-in samples
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Services,
    Documents,
    Clients,
    Tasks,
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Free-text query (case-insensitive substring)
    #[arg(short, long)]
    query: Option<String>,

    /// Exact-match selector, repeatable (e.g. --where status=pending)
    #[arg(short = 'w', long = "where", value_name = "FIELD=VALUE")]
    selectors: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List records matching the filters
    List {
        kind: Kind,

        #[command(flatten)]
        filters: FilterArgs,

        /// Order tasks by priority, then due date
        #[arg(long)]
        sort: bool,
    },

    /// Count matching records by a field and optionally total a numeric one
    Stats {
        kind: Kind,

        /// Field to group by
        #[arg(long)]
        by: String,

        /// Numeric field to total
        #[arg(long)]
        sum: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Read queries from stdin, one per line, and reprint the list once typing pauses
    Browse {
        kind: Kind,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Write the built-in sample dataset as JSONL
    Seed { kind: Kind, path: PathBuf },
}

impl Commands {
    fn kind(&self) -> Kind {
        match self {
            Commands::List { kind, .. }
            | Commands::Stats { kind, .. }
            | Commands::Browse { kind, .. }
            | Commands::Seed { kind, .. } => *kind,
        }
    }
}

fn init_tracing(config: &Config, verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => config.tracing_level()?,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    init_tracing(&config, cli.verbose)?;
    debug!(?config, "Configuration resolved");

    let ctx = Session {
        config,
        data: cli.data,
    };

    match cli.command.kind() {
        Kind::Services => run::<Service>(&ctx, &cli.command, samples::services, None).await,
        Kind::Documents => run::<Document>(&ctx, &cli.command, samples::documents, None).await,
        Kind::Clients => run::<Client>(&ctx, &cli.command, samples::clients, None).await,
        Kind::Tasks => run::<Task>(&ctx, &cli.command, samples::tasks, Some(Task::priority_then_due())).await,
    }
}

struct Session {
    config: Config,
    data: Option<PathBuf>,
}

async fn run<T>(
    ctx: &Session,
    command: &Commands,
    sample: fn() -> Vec<T>,
    sort_rule: Option<SortRule<T>>,
) -> Result<()>
where
    T: Record + Display,
{
    match command {
        Commands::Seed { path, .. } => {
            let records = sample();
            jsonl::write_jsonl(path, &records).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {} {} to {}", records.len(), T::collection_name(), path.display());
        }
        Commands::List { filters, sort, .. } => {
            let store = load_store(ctx, sample).await?;
            let predicates = build_predicates(filters)?;
            let engine = match sort_rule {
                Some(rule) if *sort => FilterEngine::with_sort(rule),
                _ => {
                    if *sort {
                        info!(collection = T::collection_name(), "No sort rule for this collection, keeping order");
                    }
                    FilterEngine::new()
                }
            };

            print_view(&store.view(&engine, &predicates), store.len());
        }
        Commands::Browse { filters, .. } => {
            let store = load_store(ctx, sample).await?;
            browse(ctx, &store, filters).await?;
        }
        Commands::Stats { by, sum, filters, .. } => {
            let store = load_store(ctx, sample).await?;
            let predicates = build_predicates(filters)?;
            let engine = FilterEngine::new();
            let view = store.view(&engine, &predicates);

            let summary = Summary::compute(&view, by, sum.as_deref());
            println!("{} by {}", T::collection_name().to_uppercase().bold(), by.cyan());
            for (value, count) in &summary.groups {
                let label = if value == aggregate::MISSING { "(none)" } else { value.as_str() };
                println!("  {:<24} {:>5}", label, count);
            }
            println!("  {:<24} {:>5}", "total".bold(), summary.count);
            if let Some(field) = sum {
                println!("  {:<24} {:>12.2}", format!("sum({})", field).green(), summary.total);
            }
        }
    }

    Ok(())
}

fn print_view<T: Record + Display>(view: &FilteredView<'_, T>, total: usize) {
    println!("{}", T::collection_name().to_uppercase().bold());
    for record in view {
        println!("{}", record);
    }
    println!("{}", format!("{} of {} records", view.len(), total).dimmed());
}

async fn browse<T: Record + Display>(ctx: &Session, store: &Store<T>, filters: &FilterArgs) -> Result<()> {
    let engine = FilterEngine::new();
    let mut input = FilterInput::from_config(&ctx.config);
    for raw in &filters.selectors {
        let (field, value) = parse_selector(raw)?;
        input.set_equals(&field, &value)?;
    }
    if let Some(query) = &filters.query {
        input.type_text(query);
    }
    debug!(delay_ms = input.delay().as_millis() as u64, "browse: reading queries from stdin");

    let mut changes = input.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_view(&store.view(&engine, input.current()), store.len());

    loop {
        tokio::select! {
            line = lines.next_line() => match line.context("Failed to read stdin")? {
                Some(query) => input.type_text(&query),
                None => break,
            },
            Ok(()) = changes.changed() => {
                print_view(&store.view(&engine, input.current()), store.len());
            }
        }
    }

    // A query typed just before end of input still gets shown
    if input.is_pending() || changes.has_changed().unwrap_or(false) {
        let predicates = input.settled().await;
        print_view(&store.view(&engine, predicates), store.len());
    }
    Ok(())
}

async fn load_store<T: Record>(ctx: &Session, sample: fn() -> Vec<T>) -> Result<Store<T>> {
    let source: Box<dyn RecordSource<T>> = match (&ctx.data, &ctx.config.data_dir) {
        (Some(path), _) => Box::new(JsonlSource::new(path)),
        (None, Some(dir)) => Box::new(JsonlSource::in_dir::<T>(dir)),
        (None, None) => Box::new(StaticSource::new(sample()).with_latency(ctx.config.load_latency())),
    };

    let mut store = Store::new();
    store
        .load(source.as_ref())
        .await
        .with_context(|| format!("Failed to load {}", source.describe()))?;
    Ok(store)
}

fn build_predicates(args: &FilterArgs) -> Result<PredicateSet> {
    let mut predicates = PredicateSet::new();
    if let Some(query) = &args.query {
        predicates.set_text(query);
    }
    for raw in &args.selectors {
        let (field, value) = parse_selector(raw)?;
        predicates.set_equals(&field, &value)?;
    }
    Ok(predicates)
}
