use crate::config::DiffConfig;
use anyhow::{Context, Result, bail};
use rotadiff_core::variants::{
    ATTEMPT_LOG_CHARS, ProcessSolver, VariantOutcome, attempt_ladder, generate_variants, tail,
};
use rotadiff_core::{Workbook, common_loaded_sheets, default_sheet, diff_loaded_sheet, diff_summary};
use std::path::Path;
use std::process::ExitCode;

pub struct VariantOptions {
    pub seeds: Vec<u64>,
    pub relax_week_gap: bool,
    pub relax_no_consec_weekends: bool,
    pub program: String,
    pub args: Vec<String>,
    pub diff: DiffConfig,
}

pub fn run(input: &Path, out_dir: &Path, options: VariantOptions) -> Result<ExitCode> {
    if !input.exists() {
        bail!("Solver input not found: {}", input.display());
    }
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let solver = ProcessSolver::new(&options.program, &options.args);
    let ladder = attempt_ladder(options.relax_week_gap, options.relax_no_consec_weekends);
    let outcomes = generate_variants(&solver, input, out_dir, &options.seeds, &ladder)?;

    for outcome in &outcomes {
        match outcome {
            VariantOutcome::Produced { name, attempt, path, .. } => {
                println!("{}: {} -> {}", name, attempt, path.display());
            }
            VariantOutcome::Failed { name, last_log, .. } => {
                println!("{}: failed under all attempts", name);
                if !last_log.trim().is_empty() {
                    println!("{}", tail(last_log, ATTEMPT_LOG_CHARS));
                }
            }
        }
    }

    let produced: Vec<&VariantOutcome> = outcomes.iter().filter(|o| o.path().is_some()).collect();
    if produced.is_empty() {
        eprintln!(
            "No variants could be produced. Check that the solver accepts --seed and reads preferred_shifts."
        );
        return Ok(ExitCode::from(1));
    }

    if produced.len() >= 2 {
        compare_to_baseline(&produced, &options.diff)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// One summary line per variant against the first produced variant.
fn compare_to_baseline(produced: &[&VariantOutcome], diff: &DiffConfig) -> Result<()> {
    let load = |outcome: &VariantOutcome| -> Result<Workbook> {
        let path = outcome.path().unwrap_or_else(|| Path::new(""));
        let bytes = super::read_workbook(path)?;
        Workbook::from_bytes(&path.display().to_string(), &bytes)
            .with_context(|| format!("Failed to load {}", outcome.name()))
    };

    let baseline = produced[0];
    let base = load(baseline)?;

    println!();
    println!("Differences against {}:", baseline.name());
    for other in &produced[1..] {
        let workbook = load(*other)?;
        let common = common_loaded_sheets(&base, &workbook);
        let Some(sheet) = default_sheet(&common, &diff.default_sheet) else {
            println!("  {}: no common sheets", other.name());
            continue;
        };
        let sheet_diff = diff_loaded_sheet(&base, &workbook, sheet, diff.max_changes);
        let summary = diff_summary(&sheet_diff.records);
        println!(
            "  {} [{}]: {} cells, {} rows, {} columns{}",
            other.name(),
            sheet,
            summary.changed_cells,
            summary.changed_rows,
            summary.changed_cols,
            if sheet_diff.truncated { " (capped)" } else { "" }
        );
    }
    Ok(())
}
