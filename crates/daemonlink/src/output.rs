use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
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

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub socket: String,
    pub reachable: bool,
    pub latency_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daemon_uid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daemon_gid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daemon_pid: Option<u32>,
}

pub fn print_probe(report: &ProbeReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SOCKET", "REACHABLE", "LATENCY", "DAEMON PID"])
                .add_row(vec![
                    report.socket.clone(),
                    report.reachable.to_string(),
                    format!("{}ms", report.latency_ms),
                    report
                        .daemon_pid
                        .map_or_else(|| "-".to_string(), |pid| pid.to_string()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "socket={} reachable={} latency={}ms pid={}",
                report.socket,
                report.reachable,
                report.latency_ms,
                report
                    .daemon_pid
                    .map_or_else(|| "-".to_string(), |pid| pid.to_string())
            );
        }
    }
}

pub fn print_value(value: &serde_json::Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!(
                "{}",
                serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
            );
        }
    }
}
