//! `tallyrec run` / `tallyrec validate`: two-file reconciliation.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use tallyrec_io::LoadError;
use tallyrec_recon::model::Value;
use tallyrec_recon::{ReconConfig, ReconResult, Record};

use crate::exit_codes::{
    EXIT_RECON_DIFFERENCES, EXIT_RECON_INVALID_CONFIG, EXIT_RECON_LOAD, EXIT_RECON_OUTPUT,
    EXIT_USAGE,
};
use crate::CliError;

/// Mismatches listed in the human summary before eliding the rest.
const MAX_LISTED_MISMATCHES: usize = 10;

#[derive(Args)]
pub struct RunArgs {
    /// Left-hand dataset (.csv, .xlsx, .xls, .xlsb, .ods)
    pub left: PathBuf,

    /// Right-hand dataset (.csv, .xlsx, .xls, .xlsb, .ods)
    pub right: PathBuf,

    /// TOML config with [thresholds] field_match / pairing
    #[arg(long, env = "TALLYREC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Similarity at or above which a field counts as matched (overrides config)
    #[arg(long)]
    pub field_threshold: Option<f64>,

    /// Confidence at or above which two records pair (overrides config)
    #[arg(long)]
    pub pairing_threshold: Option<f64>,

    /// Print the JSON report to stdout
    #[arg(long)]
    pub json: bool,

    /// Write the JSON report to a file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Suppress the human summary on stderr
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Serialize)]
struct ReportMeta<'a> {
    engine_version: &'static str,
    run_at: String,
    left_file: String,
    right_file: String,
    config: &'a ReconConfig,
}

#[derive(Serialize)]
struct ReconReport<'a> {
    meta: ReportMeta<'a>,
    #[serde(flatten)]
    result: &'a ReconResult,
}

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ReconConfig::default(),
    };

    if let Some(t) = args.field_threshold {
        config.thresholds.field_match = t;
    }
    if let Some(t) = args.pairing_threshold {
        config.thresholds.pairing = t;
    }
    config
        .validate()
        .map_err(|e| recon_err(EXIT_USAGE, e.to_string()))?;

    debug!(
        "thresholds: field_match={} pairing={}",
        config.thresholds.field_match, config.thresholds.pairing
    );

    let left = load_input(&args.left)?;
    let right = load_input(&args.right)?;

    let result = tallyrec_recon::run(&left, &right, &config);

    if args.json || args.output.is_some() {
        let report = ReconReport {
            meta: ReportMeta {
                engine_version: env!("CARGO_PKG_VERSION"),
                run_at: chrono::Utc::now().to_rfc3339(),
                left_file: args.left.display().to_string(),
                right_file: args.right.display().to_string(),
                config: &config,
            },
            result: &result,
        };
        let json_str = serde_json::to_string_pretty(&report).map_err(|e| {
            recon_err(EXIT_RECON_OUTPUT, format!("JSON serialization error: {e}"))
        })?;

        if let Some(ref path) = args.output {
            std::fs::write(path, &json_str).map_err(|e| {
                recon_err(EXIT_RECON_OUTPUT, format!("cannot write {}: {e}", path.display()))
            })?;
            info!("wrote {}", path.display());
            if !args.quiet {
                eprintln!("wrote {}", path.display());
            }
        }

        if args.json {
            println!("{json_str}");
        }
    }

    if !args.quiet {
        print_summary(&args.left, &args.right, &result);
    }

    if !result.summary.is_reconciled() {
        // the summary already says what differs
        return Err(recon_err(EXIT_RECON_DIFFERENCES, ""));
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    println!(
        "{}: ok (field_match {}, pairing {})",
        config_path.display(),
        config.thresholds.field_match,
        config.thresholds.pairing
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(path).map_err(|e| {
        recon_err(
            EXIT_RECON_INVALID_CONFIG,
            format!("cannot read config {}: {e}", path.display()),
        )
    })?;
    let config = ReconConfig::from_toml(&config_str)
        .map_err(|e| recon_err(EXIT_RECON_INVALID_CONFIG, e.to_string()))?;
    debug!("loaded config from {}", path.display());
    Ok(config)
}

fn load_input(path: &Path) -> Result<Vec<Record>, CliError> {
    tallyrec_io::load_records(path).map_err(|e| {
        let hint = match e {
            LoadError::UnsupportedExtension { .. } => {
                Some("supported inputs: .csv, .xlsx, .xls, .xlsb, .ods".to_string())
            }
            LoadError::Empty { .. } => {
                Some("the file needs a header row and at least one data row".to_string())
            }
            _ => None,
        };
        CliError { code: EXIT_RECON_LOAD, message: e.to_string(), hint }
    })
}

// ---------------------------------------------------------------------------
// Human summary (stderr)
// ---------------------------------------------------------------------------

fn print_summary(left: &Path, right: &Path, result: &ReconResult) {
    let s = &result.summary;
    eprintln!("{} vs {}", left.display(), right.display());
    eprintln!("  records:              {} left, {} right", s.total_records1, s.total_records2);
    eprintln!("  matched:              {}", s.total_matches);
    eprintln!("  mismatched:           {}", s.total_mismatches);
    eprintln!("  missing in dataset 1: {} (right records with no left counterpart)", s.total_missing_in1);
    eprintln!("  missing in dataset 2: {} (left records with no right counterpart)", s.total_missing_in2);
    eprintln!("  match rate:           {:.2}%", s.match_rate);

    if result.mismatches.is_empty() {
        return;
    }

    eprintln!("mismatches:");
    for m in result.mismatches.iter().take(MAX_LISTED_MISMATCHES) {
        eprintln!(
            "  {} <> {} (confidence {:.2})",
            label(&m.record1),
            label(&m.record2),
            m.confidence
        );
        for d in &m.differences {
            eprintln!("    {}: {} | {}", d.field, show(&d.value1), show(&d.value2));
        }
    }
    if result.mismatches.len() > MAX_LISTED_MISMATCHES {
        eprintln!("  ... and {} more", result.mismatches.len() - MAX_LISTED_MISMATCHES);
    }
}

fn label(record: &Record) -> String {
    record
        .id
        .as_ref()
        .or(record.reference.as_ref())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(no id)".to_string())
}

fn show(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_id_then_reference() {
        let r = Record::new().with("reference", "R-1");
        assert_eq!(label(&r), "R-1");
        let r = r.with("id", "A-1");
        assert_eq!(label(&r), "A-1");
        assert_eq!(label(&Record::new()), "(no id)");
    }

    #[test]
    fn show_quotes_text_only() {
        assert_eq!(show(&Value::from("Rent")), "\"Rent\"");
        assert_eq!(show(&Value::from(12.5)), "12.5");
        assert_eq!(show(&Value::from(true)), "true");
    }
}
