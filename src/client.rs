//! One-shot transfer client: a single linear run per invocation.

use std::time::Instant;

use bytes::BytesMut;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::error::TransferError;
use crate::packet::{self, Direction, EndMarker, Request, Response};
use crate::transfer::{read_full, recv_dummy, send_dummy};
use crate::util::speed::Throughput;

/// Outcome of one completed transfer. `elapsed_usec` is the
/// server-echoed figure, which is authoritative for the throughput.
#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub bytes: u64,
    pub elapsed_usec: u64,
    pub throughput: Throughput,
}

pub async fn run(addr: &str, direction: Direction, len: u64) -> Result<Report, TransferError> {
    if len > packet::MAX_TRANSFER_LEN {
        return Err(TransferError::Argument(format!(
            "length {} exceeds the {} byte cap",
            len,
            packet::MAX_TRANSFER_LEN
        )));
    }

    let mut socket = TcpStream::connect(addr)
        .await
        .map_err(|source| TransferError::Connect { source })?;
    debug!("connected to [{}]", addr);

    let mut obuf = BytesMut::with_capacity(packet::REQUEST_LEN);
    Request { direction, len }.encode(&mut obuf);
    socket.write_all(&obuf).await?;

    let start = Instant::now();
    socket.write_all(packet::START_MARKER).await?;

    debug!("data start");
    match direction {
        Direction::Dl => recv_dummy(&mut socket, len).await?,
        Direction::Ul => send_dummy(&mut socket, len).await?,
    }
    debug!("data end");

    let elapsed_usec = start.elapsed().as_micros() as u64;
    obuf.clear();
    EndMarker { elapsed_usec }.encode(&mut obuf);
    socket.write_all(&obuf).await?;

    let mut resp = [0u8; packet::RESPONSE_LEN];
    read_full(&mut socket, &mut resp).await?;
    let resp = Response::decode(&resp)?;
    info!(
        "local clock [{}] usec, server clock [{}] usec",
        elapsed_usec, resp.elapsed_usec
    );

    let throughput = Throughput::compute(len, resp.elapsed_usec)?;
    Ok(Report {
        bytes: len,
        elapsed_usec: resp.elapsed_usec,
        throughput,
    })
}
