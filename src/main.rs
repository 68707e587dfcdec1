use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use eframe::egui;

use antibiogram::app::AntibiogramApp;
use antibiogram::data::cache::load_shared;
use antibiogram::data::filter::FilterSelection;
use antibiogram::state::AppState;
use antibiogram::ui::panels::error_chain;

#[derive(Parser)]
#[command(
    name = "antibiogram",
    version,
    about = "Antimicrobial susceptibility panel"
)]
struct Cli {
    /// Semicolon-delimited isolate table
    #[arg(short, long, default_value = "resultado_final_ccih.csv")]
    data: PathBuf,

    /// Print the report as JSON instead of opening the window
    #[arg(long)]
    report: bool,

    /// Units to include (repeatable, default: all)
    #[arg(long = "unit", requires = "report")]
    units: Vec<String>,

    /// Months to include (repeatable, default: all)
    #[arg(long = "month", requires = "report")]
    months: Vec<String>,

    /// Organism to report on (default: first selectable)
    #[arg(long, requires = "report")]
    organism: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.report {
        return print_report(&cli);
    }

    let mut state = AppState::default();
    match load_shared(&cli.data) {
        Ok(dataset) => state.set_dataset(dataset),
        Err(e) => {
            log::error!("{}", error_chain(&e));
            state.load_error = Some(e.to_string());
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Antibiogram – Susceptibility Panel",
        options,
        Box::new(|_cc| Ok(Box::new(AntibiogramApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the window: {e}"))
}

/// Headless mode: run the same pipeline once and print the view model.
fn print_report(cli: &Cli) -> Result<()> {
    let dataset = load_shared(&cli.data)
        .with_context(|| format!("loading {}", cli.data.display()))?;

    let mut state = AppState::default();
    state.set_dataset(dataset);

    let defaults = state.options.default_selection();
    let selection = FilterSelection {
        units: if cli.units.is_empty() {
            defaults.units
        } else {
            cli.units.iter().cloned().collect()
        },
        months: if cli.months.is_empty() {
            defaults.months
        } else {
            cli.months.iter().cloned().collect()
        },
        organism: cli.organism.clone().unwrap_or(defaults.organism),
    };
    if cli.organism.is_some() && !state.options.organisms.contains(&selection.organism) {
        bail!(
            "unknown organism '{}'; choose one of: {}",
            selection.organism,
            state.options.organisms.join(", ")
        );
    }
    state.set_selection(selection);

    let json = serde_json::to_string_pretty(&state.view).context("serializing report")?;
    println!("{json}");
    Ok(())
}
