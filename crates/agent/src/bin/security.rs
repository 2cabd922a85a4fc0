// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pit Crew security agent (pc-security-agent)
//!
//! Connects to the orchestrator socket and runs SAST, secrets, and
//! dependency scans on demand.

use std::sync::Arc;

use pc_agent::{agent_main, logging};
use pc_analyzers::SecurityAnalyzer;

#[tokio::main]
async fn main() {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("pc-security-agent {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--help" | "-h" | "help" => {
                println!("pc-security-agent {}", env!("CARGO_PKG_VERSION"));
                println!("Pit Crew security agent - SAST, secrets, and dependency scanning");
                println!();
                println!("USAGE:");
                println!("    pc-security-agent");
                println!();
                println!("The agent connects to the orchestrator socket given by SOCKET_PATH");
                println!("(default /tmp/pit-crew-orchestrator.sock) and accepts scan tasks.");
                println!("Set STANDALONE_MODE=true to analyze the current directory instead,");
                println!("writing a SARIF report under ${{OBS_PATH:-./obs}}/reports.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return;
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: pc-security-agent [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let _guard = logging::setup("security");
    let code = agent_main(Arc::new(SecurityAnalyzer)).await;
    std::process::exit(code);
}
