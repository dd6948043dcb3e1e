//! Producing candidate rota variants with an external solver.
//!
//! The solver is an opaque program taking an input workbook and writing a
//! solved workbook. Each variant uses its own random seed. When the solver
//! cannot satisfy every hard constraint it is retried down a ladder of
//! relaxed constraint sets, strictest first, until one attempt produces a
//! non-empty output file.

use crate::error::{Result, RotadiffError};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

/// Seeds used when the caller supplies none.
pub const DEFAULT_SEEDS: [u64; 3] = [11, 22, 33];

/// Characters of solver output kept when every attempt for a variant failed.
pub const FAILURE_LOG_CHARS: usize = 3000;

/// Characters of solver output worth echoing back per attempt.
pub const ATTEMPT_LOG_CHARS: usize = 1500;

/// A hard constraint the solver may be told to treat as soft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relaxation {
    /// At least a week between blocks of the same duty.
    WeekGap,
    /// No one works two weekends in a row.
    NoConsecWeekends,
}

impl Relaxation {
    pub fn flag(&self) -> &'static str {
        match self {
            Relaxation::WeekGap => "--no_hard_week_gap",
            Relaxation::NoConsecWeekends => "--no_hard_no_consec_weekends",
        }
    }
}

/// One rung of the retry ladder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attempt {
    pub label: String,
    pub relaxations: Vec<Relaxation>,
}

impl Attempt {
    fn new(label: &str, relaxations: &[Relaxation]) -> Attempt {
        Attempt {
            label: label.to_string(),
            relaxations: relaxations.to_vec(),
        }
    }
}

/// Attempts in the order they are tried: strict, each allowed relaxation, then both.
pub fn attempt_ladder(allow_week_gap: bool, allow_no_consec_weekends: bool) -> Vec<Attempt> {
    let mut ladder = vec![Attempt::new("Strict", &[])];
    if allow_week_gap {
        ladder.push(Attempt::new("Relax week-gap", &[Relaxation::WeekGap]));
    }
    if allow_no_consec_weekends {
        ladder.push(Attempt::new(
            "Relax no-consec-weekends",
            &[Relaxation::NoConsecWeekends],
        ));
    }
    if allow_week_gap && allow_no_consec_weekends {
        ladder.push(Attempt::new(
            "Relax BOTH",
            &[Relaxation::WeekGap, Relaxation::NoConsecWeekends],
        ));
    }
    ladder
}

/// A single solver invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub seed: Option<u64>,
    pub relaxations: Vec<Relaxation>,
}

/// What the solver process reported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolverOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl SolverOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs the external solver. Errors mean the solver could not be started at all.
pub trait SolverRunner {
    fn run(&self, request: &SolverRequest) -> Result<SolverOutput>;
}

/// Runs the solver as a child process: `program args... --input IN --output OUT [flags] [--seed N]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessSolver {
    pub program: String,
    pub args: Vec<String>,
}

impl ProcessSolver {
    pub fn new(program: &str, args: &[String]) -> ProcessSolver {
        ProcessSolver {
            program: program.to_string(),
            args: args.to_vec(),
        }
    }

    /// Arguments passed after `program` for a request.
    pub fn command_args(&self, request: &SolverRequest) -> Vec<String> {
        let mut args = self.args.clone();
        args.push("--input".to_string());
        args.push(request.input.display().to_string());
        args.push("--output".to_string());
        args.push(request.output.display().to_string());
        for relaxation in &request.relaxations {
            args.push(relaxation.flag().to_string());
        }
        if let Some(seed) = request.seed {
            args.push("--seed".to_string());
            args.push(seed.to_string());
        }
        args
    }
}

impl SolverRunner for ProcessSolver {
    fn run(&self, request: &SolverRequest) -> Result<SolverOutput> {
        let output = Command::new(&self.program)
            .args(self.command_args(request))
            .output()
            .map_err(|e| {
                RotadiffError::Solver(format!("failed to start '{}': {}", self.program, e))
            })?;
        Ok(SolverOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Result of trying to produce one variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VariantOutcome {
    Produced {
        name: String,
        seed: u64,
        /// Label of the ladder rung that succeeded.
        attempt: String,
        path: PathBuf,
    },
    Failed {
        name: String,
        seed: u64,
        /// Tail of the last attempt's stderr, or stdout if stderr was empty.
        last_log: String,
    },
}

impl VariantOutcome {
    pub fn name(&self) -> &str {
        match self {
            VariantOutcome::Produced { name, .. } | VariantOutcome::Failed { name, .. } => name,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            VariantOutcome::Produced { path, .. } => Some(path),
            VariantOutcome::Failed { .. } => None,
        }
    }
}

pub fn variant_name(index: usize, seed: u64) -> String {
    format!("Variant {} (seed {})", index, seed)
}

pub fn variant_file_name(index: usize) -> String {
    format!("Rota_Solved_V{}.xlsx", index)
}

/// Run the ladder once per seed, writing variant `i` to `out_dir/Rota_Solved_V{i}.xlsx`.
///
/// A failed variant does not stop the others; only a solver that cannot be
/// started is an error.
pub fn generate_variants(
    runner: &dyn SolverRunner,
    input: &Path,
    out_dir: &Path,
    seeds: &[u64],
    ladder: &[Attempt],
) -> Result<Vec<VariantOutcome>> {
    let mut outcomes = Vec::with_capacity(seeds.len());

    for (i, &seed) in seeds.iter().enumerate() {
        let index = i + 1;
        let name = variant_name(index, seed);
        let output = out_dir.join(variant_file_name(index));
        let mut produced: Option<String> = None;
        let mut last_log = String::new();

        for attempt in ladder {
            let request = SolverRequest {
                input: input.to_path_buf(),
                output: output.clone(),
                seed: Some(seed),
                relaxations: attempt.relaxations.clone(),
            };
            clear_output(&output)?;
            info!(variant = %name, attempt = %attempt.label, "running solver");
            let result = runner.run(&request)?;

            if result.success() && has_content(&output) {
                produced = Some(attempt.label.clone());
                break;
            }

            let log = if result.stderr.is_empty() {
                &result.stdout
            } else {
                &result.stderr
            };
            last_log = tail(log, FAILURE_LOG_CHARS).to_string();
            warn!(
                variant = %name,
                attempt = %attempt.label,
                exit_code = ?result.exit_code,
                log = tail(log, ATTEMPT_LOG_CHARS),
                "solver attempt failed"
            );
        }

        outcomes.push(match produced {
            Some(attempt) => {
                info!(variant = %name, attempt = %attempt, path = %output.display(), "variant produced");
                VariantOutcome::Produced {
                    name,
                    seed,
                    attempt,
                    path: output,
                }
            }
            None => VariantOutcome::Failed {
                name,
                seed,
                last_log,
            },
        });
    }

    Ok(outcomes)
}

/// Remove a workbook left by an earlier run so only this attempt can satisfy `has_content`.
fn clear_output(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn has_content(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|meta| meta.len() > 0)
}

/// The last `max_chars` characters of `text`.
pub fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let skip = count - max_chars;
    match text.char_indices().nth(skip) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}
