use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use gridview::{GridConfig, PageSize, ViewState};

mod controller;
mod domain;
mod inputter;
mod loader;
mod model;
mod ui;

use controller::Controller;
use domain::{AppConfig, AppError};
use loader::SchemaHints;
use model::{Model, Status};
use ui::TableUI;

/// Browse a table: search by name, sort by a column, page through results.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// CSV, Parquet or Arrow file to show
    path: String,

    /// Rows per page (10, 25, 50 or 100)
    #[arg(long, default_value = "50")]
    page_size: PageSize,

    /// Field identifying a record in search results
    #[arg(long, default_value = "name")]
    reference_field: String,

    /// Fields indexed for search [default: hex, name]
    #[arg(long = "search-field")]
    search_fields: Vec<String>,

    /// Field always sorted as a date-time
    #[arg(long, default_value = "updated_at")]
    temporal_field: String,

    /// Show these columns as dates
    #[arg(long = "date-column")]
    date_columns: Vec<String>,

    /// Show these columns as currency
    #[arg(long = "currency-column")]
    currency_columns: Vec<String>,

    /// Draw these columns as color swatches
    #[arg(long = "color-column", default_value = "hex")]
    color_columns: Vec<String>,

    /// Columns that can not be sorted
    #[arg(long)]
    unsortable: Vec<String>,

    /// Maximum rendered column width
    #[arg(long, default_value_t = 40)]
    max_column_width: usize,

    /// Milliseconds to wait for input before redrawing
    #[arg(long, default_value_t = 100)]
    event_poll_time: u64,

    /// Write logs to this file (filtered by RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_tracing(args.log_file.as_ref()) {
        eprintln!("Error: could not open log file: {e}");
        return ExitCode::FAILURE;
    }

    let result = run(args);
    ratatui::restore();
    match result {
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<(), AppError> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn run(args: Args) -> Result<(), AppError> {
    let cfg = AppConfig {
        event_poll_time: args.event_poll_time,
        max_column_width: args.max_column_width,
    };
    let expanded =
        shellexpand::full(&args.path).map_err(|e| AppError::LoadingFailed(e.to_string()))?;
    let path = PathBuf::from(expanded.as_ref());

    let hints = SchemaHints {
        date_columns: args.date_columns,
        currency_columns: args.currency_columns,
        color_columns: args.color_columns,
        unsortable: args.unsortable,
        max_column_width: cfg.max_column_width,
    };
    let table = loader::load_data_file(path, &hints)?;

    let mut grid_config = GridConfig::default()
        .reference_field(args.reference_field)
        .temporal_field(args.temporal_field)
        .page_size(args.page_size);
    if !args.search_fields.is_empty() {
        grid_config = grid_config.search_fields(args.search_fields);
    }
    info!("Starting gridview on {} with {:?}", table.name, grid_config);

    let view = ViewState::new(table.records, table.columns, grid_config);
    let mut model = Model::new(table.name, view);
    let ui = TableUI;
    let controller = Controller::new(&cfg);

    let mut terminal = ratatui::init();
    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(&model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(&model)?;
        model.update(message);
    }

    Ok(())
}
