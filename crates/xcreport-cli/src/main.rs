//! xcreport CLI
//!
//! Main entry point for turning result bundles into HTML, JUnit and JSON
//! reports.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use xcreport_core::{Config, JsonBundle};
use xcreport_report::json::JsonGenerator;
use xcreport_report::junit::JunitGenerator;
use xcreport_report::{
    AssemblerOptions, Filter, RenderingMode, Report, ReportAssembler, TreeBuilder,
};

/// xcreport - XCTest HTML Report Generator
///
/// Reads one or more result bundles and writes a browsable HTML report,
/// optionally with a JUnit XML file, a JSON summary and one report per test.
#[derive(Parser, Debug)]
#[command(name = "xcreport")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a result bundle (repeat for several bundles)
    #[arg(
        short = 'r',
        long = "resultBundlePath",
        value_name = "PATH",
        required = true
    )]
    result_bundle_paths: Vec<PathBuf>,

    /// Also write a JUnit XML report
    #[arg(short, long)]
    junit: bool,

    /// Also write one isolated report per test
    #[arg(short = 'a', long = "generateReportForEachTest")]
    generate_report_for_each_test: bool,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Output directory (default: parent directory of the first bundle)
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Inline attachments and logs as data URIs instead of linking files
    #[arg(short = 'i', long = "inlineAssets")]
    inline_assets: bool,

    /// Also write a JSON summary
    #[arg(long)]
    json: bool,

    /// Path to configuration file (default: xcreport.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::debug!(config = ?args.config, "Config file");
    tracing::debug!(bundles = ?args.result_bundle_paths, "Result bundles");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Generates every requested report.
///
/// 1. Load config and apply CLI overrides
/// 2. Build runs from every bundle, continuing DOM ids across bundles
/// 3. Write the full HTML report
/// 4. Write per-test, JUnit and JSON outputs when requested
fn run(args: &Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(ref output) = args.output {
        config.output_dir = Some(output.clone());
    }
    if args.inline_assets {
        config.rendering_mode = RenderingMode::Inline;
    }

    config.validate()?;

    let output_dir = resolve_output_dir(&config, &args.result_bundle_paths);
    std::fs::create_dir_all(&output_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create output directory: {e}\n\nPath: {}",
            output_dir.display()
        )
    })?;

    print_config(&config, &output_dir);

    let report = build_report(&args.result_bundle_paths, &config, &output_dir)?;
    let counts = report.counts(Filter::none());

    println!();
    println!("Generating reports...");

    let options = AssemblerOptions {
        report_file_name: config.report_file_name.clone(),
        relocation: config.attachment_relocation,
    };
    let assembler = ReportAssembler::new(&report, &output_dir).with_options(options);

    if args.junit {
        let path = output_dir.join(&config.junit_file_name);
        JunitGenerator::new(&report).write_to_file(&path)?;
        println!("  JUnit report: {}", path.display());
    }

    if args.json {
        let path = output_dir.join(&config.json_file_name);
        JsonGenerator::new(&report).write_to_file(&path, true)?;
        println!("  JSON report: {}", path.display());
    }

    let html_path = assembler.write_full()?;
    println!("  HTML report: {}", html_path.display());

    // Per-test reports move attachment files out of the shared store, so
    // they are written after everything that reads it.
    if args.generate_report_for_each_test {
        let written = assembler.write_per_test_reports()?;
        println!("  Per-test reports: {}", written.len());
    }

    println!();
    println!(
        "Tests: {} ({} passed, {} failed)",
        counts.total, counts.passed, counts.failed
    );

    Ok(())
}

/// Builds one report from every bundle in order.
fn build_report(bundles: &[PathBuf], config: &Config, output_dir: &Path) -> anyhow::Result<Report> {
    let mut runs = Vec::new();
    let mut id_offset = 0;

    for path in bundles {
        println!("Reading result bundle: {}", path.display());
        let bundle = JsonBundle::open(path, output_dir)?;

        let mut builder = TreeBuilder::new(&bundle, output_dir)
            .with_mode(config.rendering_mode)
            .with_id_offset(id_offset);
        let bundle_runs = builder.build_runs()?;
        id_offset = builder.id_offset();

        tracing::info!(
            bundle = %path.display(),
            runs = bundle_runs.len(),
            "Read result bundle"
        );
        runs.extend(bundle_runs);
    }

    Ok(Report::new(runs))
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Output directory from config, else the first bundle's parent directory.
fn resolve_output_dir(config: &Config, bundles: &[PathBuf]) -> PathBuf {
    if let Some(ref dir) = config.output_dir {
        return PathBuf::from(dir);
    }

    bundles
        .first()
        .and_then(|path| path.parent())
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Prints the effective configuration.
fn print_config(config: &Config, output_dir: &Path) {
    println!("Configuration loaded:");
    println!("  Output directory: {}", output_dir.display());
    println!("  Rendering mode: {:?}", config.rendering_mode);
    println!("  Attachment relocation: {:?}", config.attachment_relocation);
    println!();
}
