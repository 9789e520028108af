use std::io::Write;
use std::sync::Arc;

use crate::config::ChannelPaths;
use crate::decision::{AuthorityReply, Decision};
use crate::error::Result;
use crate::event::EventRecord;
use crate::ipc::socket_server::{HandlerFuture, IpcServer};

/// Run a development authority on the channel.
///
/// Prints every authenticated event as a JSON line and answers each
/// permission request with the same fixed decision. Stops on Ctrl+C.
pub async fn run_listen(
    paths: ChannelPaths,
    decision: Decision,
    reason: Option<String>,
) -> Result<()> {
    let server = Arc::new(IpcServer::new(paths));
    let reply = AuthorityReply::new(decision, reason);

    let stopper = server.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stopper.shutdown();
        }
    });

    eprintln!("island-hook: answering permission requests with '{}'", decision);
    eprintln!("Press Ctrl+C to stop.\n");

    server
        .serve(move |record: EventRecord| -> HandlerFuture {
            let reply = reply.clone();
            Box::pin(async move {
                match serde_json::to_string(&record) {
                    Ok(line) => {
                        print_event_line(&mut std::io::stdout().lock(), &line);
                    }
                    Err(e) => tracing::debug!("failed to encode event: {}", e),
                }
                record.is_request().then_some(reply)
            })
        })
        .await
}

/// Write one event line, logging rather than failing when the consumer is gone.
fn print_event_line(out: &mut impl Write, line: &str) -> bool {
    match writeln!(out, "{}", line).and_then(|_| out.flush()) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("failed to print event: {}", e);
            false
        }
    }
}
