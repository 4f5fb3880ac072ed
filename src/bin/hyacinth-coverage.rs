use std::path::Path;
use std::process;

use clap::Parser;
use log::LevelFilter;

use hyacinth_coverage::{AnalysisOptions, CoverageEngine, EdgeThresholds, FileReport};

#[derive(Parser)]
#[command(
    name = "hyacinth-coverage",
    about = "Estimate water-hyacinth surface coverage from photographs",
    version,
    after_help = "Simple usage: hyacinth-coverage <image>  (prints the coverage percentage)\n\n\
                  Pixels count as coverage only when they are vegetation-colored AND sit\n\
                  near detected edges; flat green water or algae film is not counted."
)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Downsample images wider than this before analysis
    #[arg(long, default_value = "1000")]
    max_width: u32,

    /// Low hysteresis threshold for edge detection
    #[arg(long, default_value = "50")]
    low: f32,

    /// High hysteresis threshold for edge detection
    #[arg(long, default_value = "150")]
    high: f32,

    /// Print one JSON object per image
    #[arg(long)]
    json: bool,

    /// Report analysis failures instead of falling back to 0%
    #[arg(short, long)]
    strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let options = AnalysisOptions {
        max_width: cli.max_width,
        edges: EdgeThresholds {
            low: cli.low,
            high: cli.high,
        },
        ..AnalysisOptions::default()
    };

    let engine = match CoverageEngine::new(options) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    let results = if input_path.is_dir() {
        engine.analyze_directory(input_path)
    } else {
        vec![engine.analyze_file(input_path)]
    };

    let mut ok_count = 0u32;
    let mut fallback_count = 0u32;

    for r in &results {
        print_result(r, &cli, results.len() > 1);
        if r.success {
            ok_count += 1;
        } else {
            fallback_count += 1;
        }
    }

    if results.len() > 1 && !cli.quiet && !cli.json {
        eprintln!();
        eprint!("[Summary] Analyzed: {ok_count}");
        if fallback_count > 0 {
            let label = if cli.strict { "Failed" } else { "Fallback" };
            eprint!(", {label}: {fallback_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if cli.strict && fallback_count > 0 {
        process::exit(1);
    }
}

fn print_result(result: &FileReport, cli: &Cli, batch: bool) {
    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if cli.json {
        if result.success || !cli.strict {
            let value = if batch {
                serde_json::json!({
                    "path": result.path.display().to_string(),
                    "coverage_percent": result.coverage.percent(),
                })
            } else {
                serde_json::json!({ "coverage_percent": result.coverage.percent() })
            };
            println!("{value}");
        } else {
            eprintln!("[FAIL] {filename}: {}", result.message);
        }
        return;
    }

    if result.success {
        println!("{filename}: {:.2}", result.coverage.percent());
        if cli.verbose && !cli.quiet {
            eprintln!("  -> {}", result.message);
        }
    } else if cli.strict {
        eprintln!("[FAIL] {filename}: {}", result.message);
    } else {
        println!("{filename}: {:.2}", result.coverage.percent());
        if !cli.quiet {
            eprintln!("[FALLBACK] {filename}: {}", result.message);
        }
    }
}
