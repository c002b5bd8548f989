//! VoltCat CLI
//!
//! Command-line interface for the battery catalog. Provides one-shot
//! catalog queries and an interactive browse mode.

use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use voltcat::tui::BrowseConfig;
use voltcat::{
    format_price, format_stars, logging, ActiveFilters, Catalog, CatalogEngine, QueryState,
    SortKey,
};

/// VoltCat - Battery catalog browser
///
/// Loads an immutable product snapshot once and answers search, filter
/// and sort queries over it, either one-shot or interactively.
#[derive(Parser)]
#[command(name = "voltcat")]
#[command(author = "VoltCat Contributors")]
#[command(version)]
#[command(about = "Battery catalog search, filtering and sorting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a catalog and print summary statistics
    Show {
        /// Catalog file (JSON array of product attribute maps)
        #[arg(short, long)]
        catalog: PathBuf,
    },

    /// Run a one-shot query (search AND filters, then sort)
    Query {
        /// Catalog file
        #[arg(short, long)]
        catalog: PathBuf,

        /// Search term (substring of name, category or line)
        #[arg(short, long, default_value = "")]
        search: String,

        /// Filter value; repeatable (e.g. --filter 60 --filter suv --filter agm)
        #[arg(short, long)]
        filter: Vec<String>,

        /// Sort key (relevance, price-low, price-high, rating)
        #[arg(long, default_value = "relevance")]
        sort: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Browse the catalog interactively
    Browse {
        /// Catalog file
        #[arg(short, long)]
        catalog: PathBuf,
    },
}

fn main() {
    logging::init();
    logging::info("MAIN", "VoltCat starting up");

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Show { catalog } => cmd_show(&catalog),

        Commands::Query {
            catalog,
            search,
            filter,
            sort,
            output,
        } => cmd_query(&catalog, &search, &filter, &sort, &output),

        Commands::Browse { catalog } => cmd_browse(&catalog),
    };

    if let Err(e) = result {
        logging::error("MAIN", &e.to_string());
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

/// Show command implementation
fn cmd_show(path: &PathBuf) -> voltcat::Result<()> {
    let catalog = Catalog::load(path)?;

    println!(
        "{} Catalog {}",
        style("→").cyan().bold(),
        style(&catalog.source).yellow()
    );
    println!();
    println!(
        "  {} {}",
        style("Products:").bold(),
        catalog.stats.total_products
    );
    if let (Some(min), Some(max)) = (catalog.stats.min_price, catalog.stats.max_price) {
        println!(
            "  {} {} – {}",
            style("Price range:").bold(),
            style(format_price(min)).yellow(),
            style(format_price(max)).yellow()
        );
    }
    if catalog.stats.unparsed_prices > 0 {
        println!(
            "  {} {}",
            style("Unparsed prices:").bold(),
            style(catalog.stats.unparsed_prices).red()
        );
    }
    if catalog.stats.unparsed_amperages > 0 {
        println!(
            "  {} {}",
            style("Unparsed amperages:").bold(),
            style(catalog.stats.unparsed_amperages).red()
        );
    }

    Ok(())
}

/// Query command implementation
fn cmd_query(
    path: &PathBuf,
    search: &str,
    filter_values: &[String],
    sort: &str,
    output_format: &str,
) -> voltcat::Result<()> {
    let catalog = Catalog::load(path)?;
    let filters = ActiveFilters::from_values(filter_values)?;
    let sort: SortKey = sort.parse()?;

    let mut engine = CatalogEngine::new(catalog.into_records());
    let state = QueryState::new(search, filters, sort);
    let outcome = engine.apply_query(state);

    logging::log_search(
        &engine.query().search_term,
        outcome.visible_count,
        engine.records().len(),
    );

    let results = engine.visible_records();

    if output_format == "json" {
        let doc = serde_json::json!({
            "search": engine.query().search_term,
            "sort": engine.query().sort.token(),
            "visible": outcome.visible_count,
            "total": engine.records().len(),
            "no_results": outcome.no_results,
            "products": serde_json::to_value(&results)?,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    if outcome.no_results {
        println!();
        println!("  {}", style("Nenhum produto encontrado").bold());
        println!("  Tente ajustar os filtros ou termo de busca.");
        return Ok(());
    }

    println!(
        "{} {} of {} products ({})",
        style("→").cyan().bold(),
        style(outcome.visible_count).green(),
        engine.records().len(),
        engine.query().sort.label()
    );
    println!();

    for (i, record) in results.iter().enumerate() {
        let amperage = match record.amperage {
            Some(amps) => format!("{} Ah", amps),
            None => "-- Ah".to_string(),
        };
        println!(
            "  {} {} {}",
            style(format!("{:3}.", i + 1)).dim(),
            style(format!("{:>12}", format_price(record.price))).yellow(),
            style(&record.name).cyan()
        );
        println!(
            "      {} {} | {} | {} | {}",
            style("Info:").dim(),
            record.category,
            record.line.to_uppercase(),
            amperage,
            format_stars(record.rating)
        );
    }

    Ok(())
}

/// Browse command implementation
fn cmd_browse(path: &PathBuf) -> voltcat::Result<()> {
    let catalog = Catalog::load(path)?;
    logging::info(
        "MAIN",
        &format!("browsing '{}' ({} products)", catalog.source, catalog.len()),
    );
    voltcat::tui::run(catalog, BrowseConfig::default())
}
