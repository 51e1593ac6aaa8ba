use crate::host_list::HostStore;
use crate::idrac::{idrac_status, StatusLine, FUNCTION_NAME};
use crate::query_engine::SnmpConnector;
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info};

/// Answer one request per input line until `quit` or end of input.
pub async fn serve<R, W, H, C>(input: R, mut output: W, store: &H, connector: &C) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    H: HostStore,
    C: SnmpConnector,
{
    info!("Script server ready");
    let mut lines = input.lines();
    let mut served = 0usize;
    while let Some(line) = lines.next_line().await? {
        if line.trim().eq_ignore_ascii_case("quit") {
            break;
        }

        let status = match idrac_status(request_host_id(&line), store, connector).await {
            Ok(status) => status,
            Err(e) => {
                error!("{e:#}");
                StatusLine::zeroed()
            }
        };
        output.write_all(status.to_string().as_bytes()).await?;
        output.flush().await?;
        served += 1;
    }
    info!("Script server done after {served} requests");

    Ok(())
}

/// `[INCLUDE_FILE] [ss_idrac_status] [HOST_ID]`
fn request_host_id(line: &str) -> Option<&str> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.iter().position(|p| *p == FUNCTION_NAME) {
        Some(at) => parts.get(at + 1).copied(),
        None => parts.first().copied(),
    }
}
