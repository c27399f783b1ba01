use anyhow::Context;
use anyhow::Result;
use futures_util::StreamExt as _;
use futures_util::stream::FuturesUnordered;
use serde::Serialize;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt as _;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt as _;
use tokio::sync::watch;
use tracing::info;
use tracing::warn;

use crate::App;
use crate::clients::git::RemoteOps;
use crate::commands::interaction::Interaction;
use crate::commands::interaction::InteractionKind;
use crate::commands::interaction::Response;
use crate::indexer::Indexer;

#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(flatten)]
    response: &'a Response,
}

impl<R: RemoteOps> App<R> {
    /// Serve newline-delimited JSON interactions from `input`, answering on
    /// `output`, while `indexer` keeps the index fresh.
    ///
    /// Autocomplete requests are answered inline. Commands are acknowledged
    /// with a `deferred` response and answered with a `follow_up` once the
    /// mutation finishes. Stops at end of input or Ctrl-C, after in-flight
    /// commands complete.
    pub async fn cmd_serve<I: RemoteOps>(
        &self,
        indexer: &Indexer<I>,
        input: impl AsyncBufRead + Unpin,
        output: impl AsyncWrite + Unpin,
    ) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let interrupt = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };

        let serve = async {
            let result = self.serve_requests(input, output, interrupt).await;
            // Receiver may already be gone if the indexer stopped on its own
            let _ = shutdown_tx.send(true);
            result
        };

        let ((), result) = tokio::join!(indexer.run(shutdown_rx), serve);
        result
    }

    /// Answer interactions until end of input or until `interrupt`
    /// completes, then drain in-flight commands.
    async fn serve_requests(
        &self,
        input: impl AsyncBufRead + Unpin,
        mut output: impl AsyncWrite + Unpin,
        interrupt: impl Future<Output = ()>,
    ) -> Result<()> {
        let mut lines = input.lines();
        tokio::pin!(interrupt);
        let mut pending = FuturesUnordered::new();
        let mut accepting = true;

        info!("serving interactions");
        loop {
            tokio::select! {
                line = lines.next_line(), if accepting => {
                    let Some(line) = line.context("Failed to read interaction")? else {
                        accepting = false;
                        continue;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }

                    let interaction = match serde_json::from_str::<Interaction>(&line) {
                        Ok(interaction) => interaction,
                        Err(e) => {
                            warn!(error = %e, "malformed interaction");
                            let response = Response::message(format!("Error: malformed interaction: {}", e));
                            write_response(&mut output, None, &response).await?;
                            continue;
                        }
                    };

                    match interaction.kind {
                        InteractionKind::Autocomplete => {
                            let response = self.handle(&interaction).await;
                            write_response(&mut output, interaction.id.as_deref(), &response).await?;
                        }
                        InteractionKind::Command => {
                            write_response(&mut output, interaction.id.as_deref(), &Response::Deferred).await?;
                            pending.push(async move {
                                let response = self.handle(&interaction).await;
                                (interaction.id, response.into_follow_up())
                            });
                        }
                    }
                }
                Some((id, response)) = pending.next(), if !pending.is_empty() => {
                    write_response(&mut output, id.as_deref(), &response).await?;
                }
                _ = &mut interrupt, if accepting => {
                    info!(in_flight = pending.len(), "interrupted, finishing in-flight commands");
                    accepting = false;
                }
                else => break,
            }
        }

        info!("stopped serving interactions");
        Ok(())
    }
}

async fn write_response(
    output: &mut (impl AsyncWrite + Unpin),
    id: Option<&str>,
    response: &Response,
) -> Result<()> {
    let mut line = serde_json::to_vec(&Envelope { id, response })?;
    line.push(b'\n');
    output
        .write_all(&line)
        .await
        .context("Failed to write response")?;
    output.flush().await.context("Failed to write response")?;
    Ok(())
}
