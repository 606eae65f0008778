//! poptop-docs CLI - builds the PopTop business plan and roadmap PDFs

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use poptop_docs::{BuildReport, DocumentKind, Renderer, Result};

#[derive(Parser)]
#[command(name = "poptop-docs")]
#[command(version)]
#[command(about = "Generate the PopTop business plan and execution plan PDFs", long_about = None)]
struct Cli {
    /// Documents to build
    #[arg(value_enum, default_value = "all")]
    documents: Vec<DocumentArg>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", env = "POPTOP_OUT_DIR", default_value = "out")]
    out_dir: PathBuf,

    /// Create the output directory if it does not exist
    #[arg(long)]
    create_dirs: bool,

    /// Write uncompressed content streams
    #[arg(long)]
    no_compress: bool,

    /// Re-open each written PDF and check its page count
    #[arg(long)]
    verify: bool,

    /// Write a JSON-lines layout trace to this file
    #[arg(long, value_name = "FILE")]
    debug_log: Option<PathBuf>,

    /// Print a JSON build report to stdout
    #[arg(long)]
    report: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DocumentArg {
    /// Every document
    All,
    /// Business plan with cover page
    BusinessPlan,
    /// Execution plan v1.0
    ExecutionPlan,
    /// Execution plan v2.1
    ExecutionPlanV2,
}

fn selected_kinds(args: &[DocumentArg]) -> Vec<DocumentKind> {
    if args.is_empty() || args.contains(&DocumentArg::All) {
        return DocumentKind::ALL.to_vec();
    }
    let mut kinds: Vec<DocumentKind> = args
        .iter()
        .filter_map(|arg| match arg {
            DocumentArg::All => None,
            DocumentArg::BusinessPlan => Some(DocumentKind::BusinessPlan),
            DocumentArg::ExecutionPlan => Some(DocumentKind::ExecutionPlan),
            DocumentArg::ExecutionPlanV2 => Some(DocumentKind::ExecutionPlanV2),
        })
        .collect();
    kinds.sort();
    kinds.dedup();
    kinds
}

fn run(cli: Cli) -> Result<Vec<BuildReport>> {
    let mut builder = Renderer::builder()
        .output_dir(cli.out_dir)
        .create_dirs(cli.create_dirs)
        .compress(!cli.no_compress)
        .verify(cli.verify);
    if let Some(path) = cli.debug_log {
        builder = builder.debug_log(path);
    }
    let renderer = builder.build()?;
    renderer.write_all(&selected_kinds(&cli.documents))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let report = cli.report;

    match run(cli) {
        Ok(reports) => {
            if report {
                match serde_json::to_string_pretty(&reports) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        std::process::exit(1);
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
