use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use trapper_sender::{SenderInfo, SenderResponse};

use crate::exit::{CliError, CliResult, INTERNAL};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ResponseOutput<'a> {
    target: &'a str,
    samples: usize,
    response: &'a str,
    info: Option<&'a str>,
    processed: Option<u64>,
    failed: Option<u64>,
    total: Option<u64>,
    seconds_spent: Option<f64>,
}

pub fn print_response(
    response: &SenderResponse,
    target: &str,
    samples: usize,
    format: OutputFormat,
) -> CliResult<()> {
    let summary = response.summary().unwrap_or_default();

    match format {
        OutputFormat::Json => {
            let out = ResponseOutput {
                target,
                samples,
                response: &response.response,
                info: response.info.as_deref(),
                processed: summary.processed,
                failed: summary.failed,
                total: summary.total,
                seconds_spent: summary.seconds_spent,
            };
            let json = serde_json::to_string(&out)
                .map_err(|err| CliError::new(INTERNAL, format!("failed to render output: {err}")))?;
            println!("{json}");
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "TARGET",
                    "RESPONSE",
                    "PROCESSED",
                    "FAILED",
                    "TOTAL",
                    "SECONDS",
                ])
                .add_row(vec![
                    target.to_string(),
                    response.response.clone(),
                    count_text(summary.processed),
                    count_text(summary.failed),
                    count_text(summary.total),
                    seconds_text(&summary),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "target={} samples={} response={} info={}",
                target,
                samples,
                response.response,
                response.info.as_deref().unwrap_or("-")
            );
        }
        OutputFormat::Raw => {
            println!("{}", response.body);
        }
    }
    Ok(())
}

fn count_text(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn seconds_text(summary: &SenderInfo) -> String {
    summary
        .seconds_spent
        .map_or_else(|| "-".to_string(), |s| format!("{s:.6}"))
}
