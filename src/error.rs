
use std::io;

/// Terminal failure of one transfer.
///
/// Every variant ends the connection or invocation it occurs in; there is
/// no retry path. The server logs these and keeps serving, the client
/// reports them and exits.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("fail to connect: {source}")]
    Connect { source: io::Error },

    #[error("transport error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// A read or write moved zero bytes without reporting an error.
    /// The peer is gone mid-transfer; nothing can be salvaged.
    #[error("zero-length {op}, peer closed mid-transfer")]
    ShortIo { op: &'static str },

    #[error("protocol violation: {0}")]
    Protocol(String),

    #[error("bad argument: {0}")]
    Argument(String),

    /// The data phase completed in 0 measurable microseconds, so the
    /// throughput quotient is undefined.
    #[error("elapsed time is 0 usec, no throughput figure")]
    DegenerateTiming,
}

impl TransferError {
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }
}
