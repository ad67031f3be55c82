//! # Herblore
//!
//! Command-line planner: loads the catalog and configuration, then resolves a
//! production target into materials, experience and time.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use herblore_calc::catalog::{Catalog, Page};
use herblore_calc::resolver::{
    calculate_inputs, calculate_item_inputs, discover_ambiguous_recipes, unresolved_recipe_paths,
};
use herblore_common::PageId;
use herblore_engine::{CatalogLoader, PlanReport, PlannerConfig};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Herblore production planner
#[derive(Parser)]
#[command(name = "herblore")]
#[command(about = "Plans herblore potion production", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Catalog JSON file, overriding the configured one
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a potion into materials, experience and time
    Plan(PlanArgs),

    /// List pages below a potion that need a recipe selection
    Ambiguous {
        /// Page name or ID
        page: String,
    },

    /// Search pages by name
    Search {
        /// Case-insensitive name fragment
        query: String,
    },

    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args)]
struct PlanArgs {
    /// Page name or ID
    page: String,

    /// Quantity to produce
    quantity: f64,

    /// Specific dose variant to produce, by item name
    #[arg(short, long, value_name = "ITEM")]
    item: Option<String>,

    /// Recipe selection as PAGE=RECIPE, may be repeated
    #[arg(short, long = "recipe", value_name = "PAGE=RECIPE")]
    recipes: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Plain text summary
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(PlannerConfig::config_path);
    let config = PlannerConfig::load_from(&config_path);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("Invalid log filter")?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    debug!("Using config {}", config_path.display());

    let catalog_path = cli.catalog.unwrap_or_else(|| config.catalog_path.clone());
    match cli.command {
        Command::InitConfig { force } => init_config(&config_path, force),
        Command::Plan(args) => {
            let catalog = load_catalog(&catalog_path)?;
            plan(&catalog, &config, &args)
        },
        Command::Ambiguous { page } => {
            let catalog = load_catalog(&catalog_path)?;
            ambiguous(&catalog, &config, &page)
        },
        Command::Search { query } => {
            let catalog = load_catalog(&catalog_path)?;
            for page in catalog.search_pages(&query) {
                println!("{:>8}  {}", page.id.raw(), page.name);
            }
            Ok(())
        },
    }
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let mut loader = CatalogLoader::new(path);
    let catalog = loader
        .load()
        .with_context(|| format!("Failed to load catalog from {}", path.display()))?;

    info!(
        "Catalog {} ready from {}: {} pages, {} items",
        catalog.version(),
        loader.path().display(),
        catalog.page_count(),
        catalog.item_count()
    );
    Ok(catalog)
}

fn find_page<'a>(catalog: &'a Catalog, query: &str) -> Result<&'a Page> {
    let by_id = query
        .parse::<u32>()
        .ok()
        .and_then(|id| catalog.page(PageId::new(id)));

    by_id
        .or_else(|| catalog.page_by_name(query))
        .with_context(|| format!("Unknown page {query:?}"))
}

fn plan(catalog: &Catalog, config: &PlannerConfig, args: &PlanArgs) -> Result<()> {
    let page = find_page(catalog, &args.page)?;
    let mut options = config.to_plan_options(catalog);

    for selection in &args.recipes {
        let (page_name, recipe) = selection
            .split_once('=')
            .with_context(|| format!("Expected PAGE=RECIPE, got {selection:?}"))?;
        let selected = find_page(catalog, page_name.trim())?;
        options
            .recipe_paths
            .insert(selected.id, recipe.trim().to_string());
    }

    let missing = unresolved_recipe_paths(catalog, page.id, &options.recipe_paths)?;
    if !missing.is_empty() {
        let lines: Vec<String> = missing.iter().map(|p| describe_choices(p)).collect();
        bail!(
            "Select a recipe with --recipe PAGE=RECIPE for:\n{}",
            lines.join("\n")
        );
    }

    let resolution = match &args.item {
        Some(name) => {
            let item = catalog
                .item_by_name(name)
                .with_context(|| format!("Unknown item {name:?}"))?;
            calculate_item_inputs(catalog, page.id, item.id, args.quantity, &options)?
        },
        None => calculate_inputs(catalog, page.id, args.quantity, &options)?,
    };

    let report = PlanReport::new(catalog, &resolution);
    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn ambiguous(catalog: &Catalog, config: &PlannerConfig, query: &str) -> Result<()> {
    let page = find_page(catalog, query)?;
    let options = config.to_plan_options(catalog);
    let pages = discover_ambiguous_recipes(catalog, page.id)?;

    if pages.is_empty() {
        println!("{} needs no recipe selections", page.name);
        return Ok(());
    }

    for page in pages {
        let selected = options
            .recipe_paths
            .get(&page.id)
            .filter(|name| page.recipe(name).is_some());
        match selected {
            Some(name) => println!("{} (selected: {name})", describe_choices(page)),
            None => println!("{}", describe_choices(page)),
        }
    }
    Ok(())
}

fn describe_choices(page: &Page) -> String {
    let names: Vec<&str> = page.recipes.iter().map(|r| r.name.as_str()).collect();
    format!("  {}: {}", page.name, names.join(" | "))
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists, pass --force to overwrite",
            path.display()
        );
    }

    PlannerConfig::default()
        .save_to(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
