//! Binary entrypoint: read one employee table as JSON, write one audit report as JSON.
//!
//! Output is either:
//! - An AuditReport (or `{report, prompt}` with `--prompt`)
//! - An ErrorOutput (when the table is rejected), exit code 1
//!
//! Unreadable input or a bad configuration exits with code 2 and a message on stderr.
//! Logs go to stderr; stdout carries JSON only.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use org_audit_engine::types::ErrorOutput;
use org_audit_engine::{AuditConfig, AuditError, AuditReport, Auditor, InboundTable};

#[derive(Debug, Parser)]
#[command(name = "org-audit-engine", about = "Audit an organizational hierarchy table")]
struct Args {
  /// Read the table from a file instead of stdin.
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// JSON config file (camelCase keys, e.g. {"minSpanThreshold": 3}).
  #[arg(short, long, env = "ORG_AUDIT_CONFIG")]
  config: Option<PathBuf>,

  /// Also emit the summarizer prompt.
  #[arg(long)]
  prompt: bool,

  /// Pretty-print the JSON output.
  #[arg(long)]
  pretty: bool,
}

#[derive(Serialize)]
struct WithPrompt<'a> {
  report: &'a AuditReport,
  prompt: String,
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(io::stderr)
    .init();

  let args = Args::parse();

  let auditor = match load_config(args.config.as_ref()) {
    Ok(config) => Auditor::new(config),
    Err(msg) => {
      let _ = writeln!(io::stderr(), "org-audit-engine: config: {}", msg);
      return ExitCode::from(2);
    }
  };

  let raw = match read_input(args.input.as_ref()) {
    Ok(raw) => raw,
    Err(e) => {
      let _ = writeln!(io::stderr(), "org-audit-engine: read error: {}", e);
      return ExitCode::from(2);
    }
  };

  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());

  let result = serde_json::from_str::<InboundTable>(&raw)
    .map_err(AuditError::from)
    .and_then(|table| auditor.audit(&table));

  let code = match result {
    Ok(report) => {
      let written = if args.prompt {
        let prompt = auditor.prompt(&report);
        write_json(&mut out, &WithPrompt { report: &report, prompt }, args.pretty)
      } else {
        write_json(&mut out, &report, args.pretty)
      };
      match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
          let _ = writeln!(io::stderr(), "org-audit-engine: write error: {}", e);
          ExitCode::from(2)
        }
      }
    }
    Err(e) => {
      error!(kind = e.kind(), "table rejected: {}", e);
      let _ = write_json(&mut out, &ErrorOutput::from(&e), args.pretty);
      ExitCode::from(1)
    }
  };

  let _ = out.flush();
  code
}

fn load_config(path: Option<&PathBuf>) -> Result<AuditConfig, String> {
  let base = match path {
    Some(p) => {
      let text = fs::read_to_string(p).map_err(|e| format!("cannot read {}: {}", p.display(), e))?;
      serde_json::from_str(&text).map_err(|e| format!("invalid JSON in {}: {}", p.display(), e))?
    }
    None => AuditConfig::default(),
  };
  base.apply_overrides(|key| std::env::var(key).ok())
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
  match path {
    Some(p) => fs::read_to_string(p),
    None => {
      let mut raw = String::new();
      io::stdin().lock().read_to_string(&mut raw)?;
      Ok(raw)
    }
  }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> io::Result<()> {
  if pretty {
    serde_json::to_writer_pretty(&mut *out, value)?;
  } else {
    serde_json::to_writer(&mut *out, value)?;
  }
  writeln!(out)
}
