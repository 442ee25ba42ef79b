use anyhow::Result;
use clap::Parser;
use college_table::config::config::{BehaviorConfig, Config};
use college_table::data::exporter::DataExporter;
use college_table::data::loaders::{load_bundled_dataset, load_dataset_file};
use college_table::data::record::Record;
use college_table::logging::init_tracing;
use college_table::table_display::{render_table, summary_line};
use college_table::ui::tui_app::run_tui;
use college_table::view::controller::{TableController, ViewSettings};
use college_table::view::sorter::SortKey;
use crossterm::style::Stylize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "college-table",
    version,
    about = "Searchable, sortable, infinite-scrolling table of colleges"
)]
struct Cli {
    /// College dataset (JSON). Uses the bundled sample when omitted.
    data_file: Option<PathBuf>,

    /// Print the table once instead of starting the interactive view
    #[arg(long)]
    print: bool,

    /// Initial search query
    #[arg(short, long)]
    query: Option<String>,

    /// Sort key to select, in order: cd_rank, fees, placements, userReview,
    /// ranking or name. Repeat a key to flip its direction. Replaces the
    /// configured default_sort.
    #[arg(short, long = "sort", value_name = "KEY")]
    sort: Vec<SortKey>,

    /// Extra pages to load before showing the table
    #[arg(short, long, default_value_t = 0)]
    pages: usize,

    /// Write the visible rows to a .csv or .json file
    #[arg(short, long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a commented default config file and exit
    #[arg(long)]
    generate_config: bool,

    /// ASCII icons and currency
    #[arg(long)]
    ascii: bool,
}

/// Apply the startup query, sorts and extra pages to a fresh controller.
/// `default_sort` only applies when no `--sort` was given.
fn build_controller(records: Vec<Record>, behavior: &BehaviorConfig, cli: &Cli) -> TableController {
    let mut controller = TableController::from_records(records, ViewSettings::from(behavior));
    if let Some(query) = &cli.query {
        controller.set_query(query);
    }
    match (cli.sort.is_empty(), behavior.default_sort) {
        (true, Some(key)) => {
            controller.select_sort(key);
        }
        _ => {
            for key in &cli.sort {
                controller.select_sort(*key);
            }
        }
    }
    for _ in 0..cli.pages {
        controller.load_more();
    }
    controller
}

fn run(cli: Cli) -> Result<()> {
    if cli.generate_config {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::get_config_path()?,
        };
        Config::write_default_with_comments(&path)?;
        println!("Configuration file created at: {}", path.display());
        return Ok(());
    }

    let log_buffer = init_tracing("info");

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if cli.ascii {
        config.display.apply_simple_mode();
    }

    let records = match &cli.data_file {
        Some(path) => load_dataset_file(path)?,
        None => load_bundled_dataset()?,
    };

    let controller = build_controller(records, &config.behavior, &cli);

    if let Some(path) = &cli.export {
        let message = DataExporter::export_view(&controller, &config.display, path)?;
        println!("{}", message.green());
        if !cli.print {
            return Ok(());
        }
    }

    if cli.print {
        println!("{}", render_table(&controller, &config.display));
        println!("{}", summary_line(&controller).dark_grey());
        return Ok(());
    }

    info!(target: "system", "Starting interactive view");
    run_tui(controller, config, Some(log_buffer))
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {e:#}").red());
        std::process::exit(1);
    }
}
