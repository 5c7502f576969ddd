

use crate::error::TransferError;

/// Transfer rate derived from a byte count and a duration in
/// microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throughput {
    bytes: u64,
    usec: u64,
}

impl Throughput {
    /// Fails with [`TransferError::DegenerateTiming`] when `usec` is 0:
    /// a zero-length or sub-microsecond transfer has no meaningful rate,
    /// and the quotient must never leak out as Inf/NaN.
    pub fn compute(bytes: u64, usec: u64) -> Result<Self, TransferError> {
        if usec == 0 {
            return Err(TransferError::DegenerateTiming);
        }
        Ok(Self { bytes, usec })
    }

    pub fn bytes_per_sec(&self) -> f64 {
        self.bytes as f64 / self.usec as f64 * 1_000_000.0
    }

    pub fn mib_per_sec(&self) -> f64 {
        self.bytes_per_sec() / 1024.0 / 1024.0
    }
}

impl std::fmt::Display for Throughput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:.3} MiB/sec", self.mib_per_sec()))
    }
}

/// Byte/usec counts with thousands separators for log lines.
pub struct CountHuman(pub u64);

impl std::fmt::Display for CountHuman {
    fn fmt(&self, mut f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        num_format::WriteFormatted::write_formatted(&mut f, &self.0, &num_format::Locale::en)
        .map_err(|_e| std::fmt::Error)?;
        Ok(())
    }
}
