use std::time::Instant;

use daemonlink_rpc::Connection;
use tracing::debug;

use crate::cmd::ProbeArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::{print_probe, OutputFormat, ProbeReport};

pub fn run(args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    let conn = Connection::new(&args.socket);

    let started = Instant::now();
    let result = conn.try_connect();
    let latency_ms = started.elapsed().as_millis();

    let report = match result {
        Ok(()) => {
            let creds = conn.peer_credentials();
            ProbeReport {
                socket: args.socket.display().to_string(),
                reachable: true,
                latency_ms,
                daemon_uid: creds.map(|(uid, _, _)| uid),
                daemon_gid: creds.map(|(_, gid, _)| gid),
                daemon_pid: creds.map(|(_, _, pid)| pid),
            }
        }
        Err(err) => {
            debug!(error = %err, "probe failed");
            ProbeReport {
                socket: args.socket.display().to_string(),
                reachable: false,
                latency_ms,
                daemon_uid: None,
                daemon_gid: None,
                daemon_pid: None,
            }
        }
    };
    conn.disconnect();

    print_probe(&report, format);
    Ok(if report.reachable {
        SUCCESS
    } else {
        HEALTH_CHECK_FAILED
    })
}
