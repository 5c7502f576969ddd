//! Connection listener and the per-connection transfer worker.

use anyhow::{Context, Result};
use bytes::BytesMut;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::error::TransferError;
use crate::packet::{self, Direction, EndMarker, Request, Response};
use crate::transfer::{read_full, recv_dummy, send_dummy};
use crate::util::speed::CountHuman;

/// Bind the listener. Split from [`serve`] so callers can learn the
/// bound port before the accept loop starts (the tests listen on port 0).
pub async fn bind(addr: &str) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("fail to bind at [{}]", addr))?;
    info!("server listening on [{}]", listener.local_addr()?);
    Ok(listener)
}

/// Accept loop: one spawned task per connection. Workers share no
/// state, so a failing connection never disturbs another; accept errors
/// are logged and the loop keeps accepting.
pub async fn serve(listener: TcpListener) -> Result<()> {
    let mut cid = 0_u64;
    loop {
        let (socket, remote) = match listener.accept().await {
            Ok(r) => r,
            Err(e) => {
                warn!("fail to accept: {}", e);
                continue;
            }
        };
        cid += 1;
        debug!("#{} accepted connection from [{}]", cid, remote);

        tokio::spawn(async move {
            if let Err(e) = serve_conn(socket, cid).await {
                info!("#{} connection closed: [{}]", cid, e);
            }
        });
    }
}

pub async fn run(addr: &str) -> Result<()> {
    let listener = bind(addr).await?;
    serve(listener).await
}

/// One connection's state machine, strictly sequential:
/// request, start marker, data phase, end marker, response.
/// Any error drops the connection with no response; the socket closes
/// when this returns either way.
async fn serve_conn(mut socket: TcpStream, cid: u64) -> Result<(), TransferError> {
    let mut header = [0u8; packet::REQUEST_LEN];
    read_full(&mut socket, &mut header).await?;
    let req = Request::decode(&header)?;
    info!(
        "#{} request {} {} bytes",
        cid,
        req.direction,
        CountHuman(req.len)
    );

    let mut st = [0u8; 2];
    read_full(&mut socket, &mut st).await?;
    if &st != packet::START_MARKER {
        return Err(TransferError::protocol(format!(
            "bad start marker {:?}",
            String::from_utf8_lossy(&st)
        )));
    }

    debug!("#{} data start", cid);
    match req.direction {
        Direction::Dl => send_dummy(&mut socket, req.len).await?,
        Direction::Ul => recv_dummy(&mut socket, req.len).await?,
    }
    debug!("#{} data end", cid);

    let mut end = [0u8; packet::END_LEN];
    read_full(&mut socket, &mut end).await?;
    let (end, tag_ok) = EndMarker::decode(&end);
    // lenient on purpose: peers in the wild pad this tag
    if !tag_ok {
        warn!("#{} unexpected end marker tag, taking it anyway", cid);
    }
    info!("#{} finished in {} usec", cid, CountHuman(end.elapsed_usec));

    let mut obuf = BytesMut::with_capacity(packet::RESPONSE_LEN);
    Response {
        elapsed_usec: end.elapsed_usec,
    }
    .encode(&mut obuf);
    socket.write_all(&obuf).await?;
    Ok(())
}
