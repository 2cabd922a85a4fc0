// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared entry point for the agent binaries.

use std::sync::Arc;

use pc_analyzers::Analyzer;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::client::IpcClient;
use crate::core::AgentCore;
use crate::{env, standalone};

/// Exit code for SIGINT, per shell convention (128 + 2).
const SIGINT_EXIT: i32 = 130;

/// Run one agent to completion; returns the process exit code.
///
/// `STANDALONE_MODE=true` runs a single in-process analysis instead of
/// connecting to the orchestrator.
pub async fn agent_main(analyzer: Arc<dyn Analyzer>) -> i32 {
    if env::standalone_mode() {
        return match standalone::run(analyzer.as_ref()).await {
            Ok(report) => {
                info!(report = %report.display(), "standalone run finished");
                0
            }
            Err(e) => {
                error!(error = %e, "standalone analysis failed");
                1
            }
        };
    }

    let (Ok(mut sigint), Ok(mut sigterm)) = (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) else {
        error!("failed to install signal handlers");
        return 1;
    };

    let cancel = CancellationToken::new();
    let config = env::agent_config();
    let capabilities = analyzer.capabilities();
    let agent_name = analyzer.name();

    let (sender, outbox, shared) = IpcClient::channel(
        env::socket_path(),
        agent_name,
        config,
        cancel.clone(),
    );
    let core = AgentCore::new(analyzer, sender.clone());
    let client = IpcClient::new(shared, sender, outbox, capabilities, Arc::new(core));

    info!(agent = agent_name, "starting agent");
    let mut client_task = tokio::spawn(client.run());

    let code = tokio::select! {
        _ = sigint.recv() => {
            info!("received SIGINT, shutting down");
            cancel.cancel();
            SIGINT_EXIT
        }
        _ = sigterm.recv() => {
            info!("received SIGTERM, shutting down");
            cancel.cancel();
            0
        }
        joined = &mut client_task => {
            return match joined {
                Ok(Ok(())) => 0,
                Ok(Err(e)) => {
                    error!(error = %e, "agent stopped");
                    1
                }
                Err(e) => {
                    error!(error = %e, "client task aborted");
                    1
                }
            };
        }
    };

    // Signal path: give the client a bounded window to wind down its loops.
    if tokio::time::timeout(std::time::Duration::from_secs(10), client_task)
        .await
        .is_err()
    {
        error!("client did not stop in time");
    }
    code
}
