use std::process;

use clap::{Args, Parser, Subcommand};
use llkv_result::Result;
use llkv_sqlsmith::{FunctionCatalog, OperatorCatalog, SchemaCacheConfig, SmithCatalogs};
use llkv_types::builtins::FunctionClass;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("llkv-sqlsmith: {err}");
        process::exit(1);
    }
}

#[derive(Parser)]
#[command(
    name = "llkv-sqlsmith",
    about = "Inspect the schema and builtin catalogs seen by the LLKV SQL smith"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print operator and function overload counts per return type.
    Catalog,
    /// Introspect a live database and print the discovered schema.
    Schema(SchemaArgs),
}

#[derive(Args, Clone)]
struct SchemaArgs {
    /// Connection string, e.g. postgresql://root@localhost:26257/defaultdb.
    #[arg(long)]
    url: String,
    /// Schema to discover (defaults to LLKV_SQLSMITH_SCHEMA or "public").
    #[arg(long)]
    schema: Option<String>,
    /// Seed for the random picks (defaults to LLKV_SQLSMITH_SEED or entropy).
    #[arg(long)]
    seed: Option<u64>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Catalog => {
            let catalogs = SmithCatalogs::build();
            print_operators(&catalogs.operators);
            print_functions(&catalogs.functions);
            Ok(())
        }
        Command::Schema(args) => {
            let mut config = SchemaCacheConfig::from_env()?;
            if let Some(schema) = args.schema.clone() {
                config = config.with_target_schema(schema);
            }
            if let Some(seed) = args.seed {
                config = config.with_seed(seed);
            }
            run_schema(&args, config)
        }
    }
}

fn print_operators(operators: &OperatorCatalog) {
    let mut keys: Vec<_> = operators.return_types().collect();
    keys.sort();
    println!("Binary operators ({} overloads):", operators.len());
    for oid in keys {
        let entries = operators.returning(oid);
        let Some(first) = entries.first() else {
            continue;
        };
        let ty = first.overload.return_type;
        let symbols: Vec<_> = entries.iter().map(|e| e.operator.symbol()).collect();
        println!("  {:<14} {:>3}  {}", ty, entries.len(), symbols.join(" "));
    }
}

fn print_functions(functions: &FunctionCatalog) {
    let mut keys: Vec<(FunctionClass, _)> = functions.keys().collect();
    keys.sort();
    println!("Functions ({} overloads):", functions.len());
    for (class, oid) in keys {
        let entries = functions.returning(class, oid);
        let Some(first) = entries.first() else {
            continue;
        };
        let ty = first.overload.fixed_return_type();
        let mut names: Vec<_> = entries.iter().map(|e| e.def.name).collect();
        names.dedup();
        println!(
            "  {:<10} {:<14} {:>3}  {}",
            class.to_string(),
            ty,
            entries.len(),
            names.join(" ")
        );
    }
}

#[cfg(feature = "postgres")]
fn run_schema(args: &SchemaArgs, config: SchemaCacheConfig) -> Result<()> {
    use llkv_sqlsmith::{IndexPick, SchemaCache};

    let client = postgres::Client::connect(&args.url, postgres::NoTls)?;
    let cache = SchemaCache::new(client, config);
    cache.refresh()?;

    let tables = cache.tables();
    println!(
        "Discovered {} tables in schema '{}':",
        tables.len(),
        cache.config().target_schema
    );
    for table in &tables {
        println!("\n  {}", table.name);
        for column in &table.columns {
            let marker = if column.computed { " (computed)" } else { "" };
            println!("    {column}{marker}");
        }
        for index in cache.indexes_for(&table.name).values() {
            println!("    {index}");
        }
    }

    match cache.pick_random_table() {
        Some(table) => println!("\nRandom table: {}", table.name),
        None => println!("\nRandom table: none"),
    }
    match cache.pick_random_index() {
        IndexPick::Found(name, _) => println!("Random index: {name}"),
        IndexPick::NoTables => println!("Random index: no tables"),
        IndexPick::NoIndexes(table) => println!("Random index: {table} has no indexes"),
    }
    Ok(())
}

#[cfg(not(feature = "postgres"))]
fn run_schema(_args: &SchemaArgs, _config: SchemaCacheConfig) -> Result<()> {
    Err(llkv_result::Error::InvalidArgumentError(
        "the schema command requires the `postgres` feature".into(),
    ))
}
