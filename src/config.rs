//! User configuration (`config.toml`).
//!
//! Problems with the file never stop the program: they are collected as
//! warnings and the built-in defaults are used instead.

use directories::ProjectDirs;
use rotadiff_core::report::DEFAULT_SAMPLE;
use rotadiff_core::variants::DEFAULT_SEEDS;
use rotadiff_core::{DEFAULT_MAX_CHANGES, DEFAULT_SHEET};
use serde::Deserialize;
use std::path::PathBuf;

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const MAX_SEEDS: usize = 64;

/// Hotspot rows/columns listed by the CLI.
pub const DEFAULT_CLI_TOP_N: usize = 30;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    diff: Option<DiffSection>,
    solver: Option<SolverSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DiffSection {
    default_sheet: Option<String>,
    max_changes: Option<usize>,
    top_n: Option<usize>,
    sample: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SolverSection {
    program: Option<String>,
    args: Option<Vec<String>>,
    seeds: Option<Vec<u64>>,
    relax_week_gap: Option<bool>,
    relax_no_consec_weekends: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffConfig {
    pub default_sheet: String,
    pub max_changes: usize,
    pub top_n: usize,
    pub sample: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        DiffConfig {
            default_sheet: DEFAULT_SHEET.to_string(),
            max_changes: DEFAULT_MAX_CHANGES,
            top_n: DEFAULT_CLI_TOP_N,
            sample: DEFAULT_SAMPLE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    pub program: String,
    pub args: Vec<String>,
    pub seeds: Vec<u64>,
    pub relax_week_gap: bool,
    pub relax_no_consec_weekends: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            program: "python".to_string(),
            args: vec!["solve_rota.py".to_string()],
            seeds: DEFAULT_SEEDS.to_vec(),
            relax_week_gap: true,
            relax_no_consec_weekends: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub diff: DiffConfig,
    pub solver: SolverConfig,
}

/// Load configuration from `config_file`, or the user config dir when not given.
///
/// Returns the effective config and any warnings worth showing.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            (Config::default(), warnings)
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match parse_config(&content, &mut warnings) {
                Ok(config) => (config, warnings),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    (Config::default(), warnings)
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                (Config::default(), warnings)
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            (Config::default(), warnings)
        }
    }
}

/// Parse config text, filling gaps with defaults.
pub fn parse_config(content: &str, warnings: &mut Vec<String>) -> Result<Config, toml::de::Error> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = Config::default();

    if let Some(diff) = file.diff {
        if let Some(sheet) = diff.default_sheet.map(|s| s.trim().to_string()) {
            if sheet.is_empty() {
                warnings.push("diff.default_sheet is empty; using 'Rota'".to_string());
            } else {
                config.diff.default_sheet = sheet;
            }
        }
        if let Some(max_changes) = diff.max_changes {
            config.diff.max_changes = max_changes;
        }
        if let Some(top_n) = diff.top_n {
            config.diff.top_n = top_n;
        }
        if let Some(sample) = diff.sample {
            config.diff.sample = sample;
        }
    }

    if let Some(solver) = file.solver {
        if let Some(program) = solver.program {
            config.solver.program = program;
        }
        if let Some(args) = solver.args {
            config.solver.args = args;
        }
        if let Some(seeds) = solver.seeds {
            if seeds.is_empty() {
                warnings.push("solver.seeds is empty; using default seeds".to_string());
            } else if seeds.len() > MAX_SEEDS {
                warnings.push(format!(
                    "Too many solver seeds: {} (max {}); using default seeds",
                    seeds.len(),
                    MAX_SEEDS
                ));
            } else {
                config.solver.seeds = seeds;
            }
        }
        if let Some(relax) = solver.relax_week_gap {
            config.solver.relax_week_gap = relax;
        }
        if let Some(relax) = solver.relax_no_consec_weekends {
            config.solver.relax_no_consec_weekends = relax;
        }
    }

    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "rotadiff")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
