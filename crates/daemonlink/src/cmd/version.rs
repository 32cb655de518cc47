use serde::Serialize;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Debug, Serialize)]
struct VersionReport {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rustc: Option<&'static str>,
}

pub fn run(args: VersionArgs, format: OutputFormat) -> CliResult<i32> {
    let report = VersionReport {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        rustc: if args.extended {
            option_env!("DAEMONLINK_RUSTC_VERSION")
        } else {
            None
        },
    };

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{} {}", report.name, report.version);
            if let Some(rustc) = report.rustc {
                println!("rustc {rustc}");
            }
        }
    }
    Ok(SUCCESS)
}
