//! Bulk data pump shared by client and server.
//!
//! All three operations are all-or-nothing: they move exactly the
//! requested byte count or fail, never returning a partial result.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::TransferError;

/// Chunk cap for the pump loops and their scratch buffers.
pub const CHUNK_LEN: usize = 64 * 1024;

/// Write exactly `n` filler bytes (zero-filled, content carries no
/// meaning) in chunks of at most [`CHUNK_LEN`].
pub async fn send_dummy<W>(w: &mut W, n: u64) -> Result<(), TransferError>
where
    W: AsyncWrite + Unpin,
{
    let buf = vec![0u8; CHUNK_LEN];
    let mut rest = n;
    while rest > 0 {
        let wlen = rest.min(CHUNK_LEN as u64) as usize;
        let sent = w.write(&buf[..wlen]).await?;
        if sent == 0 {
            return Err(TransferError::ShortIo { op: "write" });
        }
        rest -= sent as u64;
    }
    Ok(())
}

/// Read and discard exactly `n` bytes with the same chunk cap.
pub async fn recv_dummy<R>(r: &mut R, n: u64) -> Result<(), TransferError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; CHUNK_LEN];
    let mut rest = n;
    while rest > 0 {
        let rlen = rest.min(CHUNK_LEN as u64) as usize;
        let got = r.read(&mut buf[..rlen]).await?;
        if got == 0 {
            return Err(TransferError::ShortIo { op: "read" });
        }
        rest -= got as u64;
    }
    Ok(())
}

/// Header-reading primitive: fill `buf` completely, reading into
/// successive offsets until full.
pub async fn read_full<R>(r: &mut R, buf: &mut [u8]) -> Result<(), TransferError>
where
    R: AsyncRead + Unpin,
{
    let mut off = 0;
    while off < buf.len() {
        let got = r.read(&mut buf[off..]).await?;
        if got == 0 {
            return Err(TransferError::ShortIo { op: "read" });
        }
        off += got;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use tokio::io::AsyncWriteExt;

    use super::*;

    // small pipe buffer so the pump is forced to loop
    const PIPE_BUF: usize = 8 * 1024;

    #[tokio::test]
    async fn pump_moves_exact_byte_count() {
        let chunk = CHUNK_LEN as u64;
        for n in [0, 1, chunk - 1, chunk, chunk + 1, 3 * chunk + 17] {
            let (mut a, mut b) = tokio::io::duplex(PIPE_BUF);
            let tx = tokio::spawn(async move { send_dummy(&mut a, n).await });
            recv_dummy(&mut b, n).await.unwrap();
            tx.await.unwrap().unwrap();
        }
    }

    #[tokio::test]
    async fn recv_dummy_fails_on_early_close() {
        let (mut a, mut b) = tokio::io::duplex(PIPE_BUF);
        tokio::spawn(async move {
            send_dummy(&mut a, 100).await.unwrap();
            // a drops here, b sees EOF
        });
        let err = recv_dummy(&mut b, 200).await.unwrap_err();
        assert!(matches!(err, TransferError::ShortIo { op: "read" }));
    }

    #[tokio::test]
    async fn read_full_fills_the_whole_buffer() {
        let (mut a, mut b) = tokio::io::duplex(PIPE_BUF);
        tokio::spawn(async move {
            // two partial writes for one 8-byte header
            a.write_all(b"REQ").await.unwrap();
            tokio::task::yield_now().await;
            a.write_all(b"TCPUL").await.unwrap();
        });
        let mut buf = [0u8; 8];
        read_full(&mut b, &mut buf).await.unwrap();
        assert_eq!(&buf, b"REQTCPUL");
    }

    #[tokio::test]
    async fn read_full_fails_on_truncated_input() {
        let (mut a, mut b) = tokio::io::duplex(PIPE_BUF);
        tokio::spawn(async move {
            a.write_all(b"REQT").await.unwrap();
        });
        let mut buf = [0u8; 8];
        let err = read_full(&mut b, &mut buf).await.unwrap_err();
        assert!(matches!(err, TransferError::ShortIo { .. }));
    }
}

