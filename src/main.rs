//! Rotadiff - compare solved rota workbook variants

mod commands;
mod config;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rotadiff")]
#[command(about = "Compare solved rota workbook variants cell by cell")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, value_name = "FILE", help = "Config file (default: user config dir)")]
    pub config: Option<PathBuf>,
    #[arg(long, short, global = true, help = "Log progress to stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List sheets present in both workbooks")]
    Sheets {
        #[arg(help = "Baseline workbook")]
        a: PathBuf,
        #[arg(help = "Workbook to compare against the baseline")]
        b: PathBuf,
    },
    #[command(about = "Show every cell that differs on one sheet")]
    Diff {
        #[arg(help = "Baseline workbook")]
        a: PathBuf,
        #[arg(help = "Workbook to compare against the baseline")]
        b: PathBuf,
        #[arg(long, short, help = "Sheet to compare (default: 'Rota' or the first common sheet)")]
        sheet: Option<String>,
        #[arg(long, value_name = "N", help = "Stop after this many differences")]
        max_changes: Option<usize>,
        #[arg(long, value_name = "N", help = "Hotspot rows/columns to list")]
        top: Option<usize>,
        #[arg(long, value_name = "N", help = "Cell-level differences to show")]
        sample: Option<usize>,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[arg(long, short, value_name = "FILE", help = "Write the report to a file instead of stdout")]
        output: Option<PathBuf>,
    },
    #[command(about = "Run the solver once per seed and compare the variants")]
    Variants {
        #[arg(long, short, help = "Solver input workbook")]
        input: PathBuf,
        #[arg(long, help = "Directory for the solved variants")]
        out_dir: PathBuf,
        #[arg(long = "seed", value_name = "N", help = "Seed per variant (repeatable)")]
        seeds: Vec<u64>,
        #[arg(long, help = "Never relax the one-week gap constraint")]
        no_relax_week_gap: bool,
        #[arg(long, help = "Never relax the no-consecutive-weekends constraint")]
        no_relax_weekends: bool,
        #[arg(long, value_name = "PROGRAM", help = "Solver executable")]
        solver: Option<String>,
        #[arg(long = "solver-arg", value_name = "ARG", allow_hyphen_values = true, help = "Argument passed before the solver flags (repeatable)")]
        solver_args: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Csv,
    Markdown,
    Json,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (config, warnings) = config::load_config(cli.config.as_ref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let result = match cli.command {
        Commands::Sheets { a, b } => commands::sheets::run(&a, &b),
        Commands::Diff {
            a,
            b,
            sheet,
            max_changes,
            top,
            sample,
            format,
            output,
        } => commands::diff::run(
            &a,
            &b,
            commands::diff::DiffOptions {
                sheet,
                max_changes: max_changes.unwrap_or(config.diff.max_changes),
                top_n: top.unwrap_or(config.diff.top_n),
                sample: sample.unwrap_or(config.diff.sample),
                format,
                output,
                preferred_sheet: config.diff.default_sheet.clone(),
            },
        ),
        Commands::Variants {
            input,
            out_dir,
            seeds,
            no_relax_week_gap,
            no_relax_weekends,
            solver,
            solver_args,
        } => {
            // Configured args belong to the configured program.
            let (program, args) = match solver {
                Some(program) => (program, solver_args),
                None if solver_args.is_empty() => {
                    (config.solver.program.clone(), config.solver.args.clone())
                }
                None => (config.solver.program.clone(), solver_args),
            };
            commands::variants::run(
                &input,
                &out_dir,
                commands::variants::VariantOptions {
                    seeds: if seeds.is_empty() {
                        config.solver.seeds.clone()
                    } else {
                        seeds
                    },
                    relax_week_gap: config.solver.relax_week_gap && !no_relax_week_gap,
                    relax_no_consec_weekends: config.solver.relax_no_consec_weekends
                        && !no_relax_weekends,
                    program,
                    args,
                    diff: config.diff.clone(),
                },
            )
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
