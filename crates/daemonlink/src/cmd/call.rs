use std::fs;

use daemonlink_rpc::{ChannelConfig, Connection, Envelope};
use serde_json::Value;

use crate::cmd::{parse_duration, CallArgs};
use crate::exit::{io_error, rpc_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_value, OutputFormat};

pub fn run(args: CallArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let request = resolve_request(&args)?;

    let config = ChannelConfig {
        socket_path: args.socket.clone(),
        timeout: Some(timeout),
        auto_reconnect: !args.no_reconnect,
        ..ChannelConfig::default()
    };
    let conn = Connection::with_config(config);

    let response: Envelope<Value> = conn
        .call(&request, None)
        .map_err(|err| rpc_error("call failed", err))?;
    conn.disconnect();

    print_value(&response.body, format);
    Ok(SUCCESS)
}

fn resolve_request(args: &CallArgs) -> CliResult<Value> {
    if let Some(json) = &args.json {
        return serde_json::from_str(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")));
    }
    if let Some(path) = &args.file {
        let text = fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        return serde_json::from_str(&text).map_err(|err| {
            CliError::new(
                USAGE,
                format!("{} is not valid JSON: {err}", path.display()),
            )
        });
    }
    Err(CliError::new(USAGE, "one of --json or --file is required"))
}
