use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use pdf_formflow::{LayoutConfig, build_form};

#[derive(Parser)]
#[command(
    name = "pdf-formflow",
    about = "Lay out a JSON form template as a PDF with fillable fields",
    version
)]
struct Cli {
    /// Form template (JSON)
    #[arg(short, long)]
    template: PathBuf,

    /// Layout configuration overriding the built-in defaults (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, default_value = "form.pdf")]
    output: PathBuf,

    /// Date used for year and month/year option lists (YYYY-MM-DD, default today)
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// Log timings and layout decisions
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = match &cli.config {
        Some(path) => match LayoutConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => LayoutConfig::default(),
    };
    let reference_date = cli
        .reference_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    match build_form(&cli.template, config, reference_date, &cli.output) {
        Ok(form) => {
            println!(
                "Wrote {} ({} pages, {} fields)",
                cli.output.display(),
                form.page_count,
                form.widget_count
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
