//! Skugraph CLI - product categorization against a graph-backed catalog

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use skugraph_core::catalog::CanonicalProduct;
use skugraph_core::config::Config;
use skugraph_core::error::Error;
use skugraph_core::matcher::MatchOutcome;
use skugraph_core::pipeline::Categorizer;
use skugraph_core::store::{CatalogStore, MemoryStore, Neo4jStore};

/// The canonical demo dataset, mirroring the original seed load
const DEMO_PRODUCTS: &str = include_str!("../data/products.json");

#[derive(Parser)]
#[command(name = "skugraph")]
#[command(author, version, about = "Standardize product descriptions against a canonical catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Categorize a raw product description
    Categorize {
        /// Raw description, e.g. "STRAWBERRY DRISCOLL 8/1LB"
        description: String,
        /// Use the bundled in-memory catalog instead of Neo4j
        #[arg(long)]
        offline: bool,
    },

    /// Seed the canonical catalog (offline load, idempotent by id)
    Seed {
        /// JSON file of canonical products (defaults to the bundled demo set)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Wipe the graph before seeding
        #[arg(long)]
        wipe: bool,
    },

    /// Show graph statistics
    Stats,

    /// List all products
    Products,

    /// List brands with product counts
    Brands,

    /// List product types with product counts
    Types,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up NEO4J_* / OPENAI_API_KEY from a local .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skugraph=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Categorize {
            description,
            offline,
        } => {
            let store = if offline {
                demo_store()?
            } else {
                connect_store(&config)?
            };
            cmd_categorize(&config, store, &description, cli.format, cli.quiet).await
        }

        Commands::Seed { file, wipe } => {
            let store = connect_store(&config)?;
            cmd_seed(store, file.as_deref(), wipe, cli.quiet).await
        }

        Commands::Stats => cmd_stats(connect_store(&config)?, cli.format).await,

        Commands::Products => cmd_products(connect_store(&config)?, cli.format).await,

        Commands::Brands => cmd_brands(connect_store(&config)?, cli.format).await,

        Commands::Types => cmd_types(connect_store(&config)?, cli.format).await,

        Commands::Config { action } => cmd_config(action, cli.quiet),
    }
}

/// Connect the Neo4j-backed store from environment credentials
fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn CatalogStore>> {
    let credentials = config.store.resolved_credentials()?;
    let store = Neo4jStore::new(&credentials, &config.store)?;
    Ok(Arc::new(store))
}

/// In-memory store pre-loaded with the bundled demo catalog
fn demo_store() -> anyhow::Result<Arc<dyn CatalogStore>> {
    let products = parse_products(DEMO_PRODUCTS)?;
    Ok(Arc::new(MemoryStore::with_products(products)))
}

fn parse_products(json: &str) -> anyhow::Result<Vec<CanonicalProduct>> {
    let products: Vec<CanonicalProduct> = serde_json::from_str(json)?;
    Ok(products)
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_categorize(
    config: &Config,
    store: Arc<dyn CatalogStore>,
    description: &str,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let categorizer = Categorizer::from_config(config, store)?;

    let report = match categorizer.categorize(description).await {
        Ok(report) => report,
        // Not confident about the brand: a user-facing explanation, not a crash
        Err(e @ Error::BrandNotConfident { .. }) => {
            if format == OutputFormat::Json {
                println!(
                    "{}",
                    serde_json::json!({ "error": e.to_string(), "code": e.code() })
                );
            } else {
                println!("Could not find a confident brand match in the catalog.");
                println!("  {}", e);
                if let Some(suggestion) = e.suggestion() {
                    println!("  Hint: {}", suggestion);
                }
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !quiet {
        println!("Extracted attributes:");
        println!("{}", serde_json::to_string_pretty(&report.extracted)?);
        println!(
            "\nStandardized brand: {} (confidence {}%)",
            report.normalized.brand, report.normalized.brand_confidence
        );
        if !report.normalized.product_type.is_empty() {
            println!("Product type lemma: {}", report.normalized.product_type);
        }
        println!();
    }

    match &report.outcome {
        MatchOutcome::Matched { product } => {
            println!("100% precision match found:");
            println!("  [{}] {}", product.id, product.description);
            println!(
                "  {} {} {}/{}{}",
                product.brand, product.product_type, product.pack_quantity, product.pack_size,
                product.uom
            );
        }
        MatchOutcome::Ambiguous { candidates } => {
            println!(
                "Ambiguous match: {} products in the catalog share these attributes.",
                candidates.len()
            );
            for candidate in candidates {
                println!("  [{}] {}", candidate.id, candidate.description);
            }
            println!("This is a catalog data-quality problem; resolve it manually.");
        }
        MatchOutcome::NoMatch => {
            println!("No exact match found in the catalog based on all criteria.");
        }
    }

    Ok(())
}

async fn cmd_seed(
    store: Arc<dyn CatalogStore>,
    file: Option<&std::path::Path>,
    wipe: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let products = match file {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            parse_products(&contents)?
        }
        None => parse_products(DEMO_PRODUCTS)?,
    };

    store.seed_products(&products, wipe).await?;

    if !quiet {
        if wipe {
            println!("Catalog wiped.");
        }
        println!("Seeded {} products.", products.len());
    }
    Ok(())
}

async fn cmd_stats(store: Arc<dyn CatalogStore>, format: OutputFormat) -> anyhow::Result<()> {
    let stats = store.stats().await?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Node counts:");
    for entry in &stats.node_counts {
        println!("  {:<14} {}", entry.name, entry.count);
    }
    println!("Relationship counts:");
    for entry in &stats.relationship_counts {
        println!("  {:<14} {}", entry.name, entry.count);
    }
    Ok(())
}

async fn cmd_products(store: Arc<dyn CatalogStore>, format: OutputFormat) -> anyhow::Result<()> {
    let products = store.list_products().await?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    }

    if products.is_empty() {
        println!("No products in the catalog. Seed some with: skugraph seed");
        return Ok(());
    }
    for p in products {
        println!(
            "  [{}] {} | {} {} {}/{}{}",
            p.id, p.description, p.brand, p.product_type, p.pack_quantity, p.pack_size, p.uom
        );
    }
    Ok(())
}

async fn cmd_brands(store: Arc<dyn CatalogStore>, format: OutputFormat) -> anyhow::Result<()> {
    let brands = store.list_brands_detailed().await?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&brands)?);
        return Ok(());
    }

    for entry in brands {
        println!("  {:<24} {}", entry.brand, entry.product_count);
    }
    Ok(())
}

async fn cmd_types(store: Arc<dyn CatalogStore>, format: OutputFormat) -> anyhow::Result<()> {
    let types = store.list_product_types_detailed().await?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&types)?);
        return Ok(());
    }

    for entry in types {
        println!("  {:<24} {}", entry.product_type, entry.product_count);
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{:<28} {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path()?.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_categorize_parses() {
        let cli = Cli::parse_from(["skugraph", "categorize", "STRAWBERRY DRISCOLL 8/1LB"]);
        match cli.command {
            Commands::Categorize {
                description,
                offline,
            } => {
                assert_eq!(description, "STRAWBERRY DRISCOLL 8/1LB");
                assert!(!offline);
            }
            _ => panic!("expected categorize command"),
        }
    }

    #[test]
    fn test_seed_flags_parse() {
        let cli = Cli::parse_from(["skugraph", "seed", "--wipe", "--file", "products.json"]);
        match cli.command {
            Commands::Seed { file, wipe } => {
                assert!(wipe);
                assert_eq!(file, Some(PathBuf::from("products.json")));
            }
            _ => panic!("expected seed command"),
        }
    }

    #[test]
    fn test_bundled_demo_products_parse() {
        let products = parse_products(DEMO_PRODUCTS).unwrap();
        assert_eq!(products.len(), 4);
        assert!(products.iter().all(|p| p.brand == "Driscoll's"));
    }
}
