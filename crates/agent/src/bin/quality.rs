// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pit Crew quality agent (pc-quality-agent)
//!
//! Connects to the orchestrator socket and runs linting, complexity,
//! duplication, and syntax analysis on demand.

use std::sync::Arc;

use pc_agent::{agent_main, logging};
use pc_analyzers::QualityAnalyzer;

#[tokio::main]
async fn main() {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("pc-quality-agent {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--help" | "-h" | "help" => {
                println!("pc-quality-agent {}", env!("CARGO_PKG_VERSION"));
                println!("Pit Crew quality agent - linting, complexity, and syntax analysis");
                println!();
                println!("USAGE:");
                println!("    pc-quality-agent");
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
                eprintln!("Usage: pc-quality-agent [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let _guard = logging::setup("quality");
    let code = agent_main(Arc::new(QualityAnalyzer)).await;
    std::process::exit(code);
}
