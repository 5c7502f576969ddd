//! Wire messages.
//!
//! Every message is fixed-size with all integers little-endian:
//!
//! | message      | size | layout                                      |
//! |--------------|------|---------------------------------------------|
//! | Request      | 16 B | "REQTCP" + "UL"/"DL" + u64 length           |
//! | Start marker |  2 B | "ST"                                        |
//! | EndMarker    | 10 B | "EN" + u64 elapsed usec                     |
//! | Response     | 16 B | "RESPONSE" + u64 elapsed usec               |

use bytes::{Buf, BufMut};

use crate::error::TransferError;

pub const REQUEST_TAG: &[u8; 6] = b"REQTCP";
pub const REQUEST_LEN: usize = 16;

pub const START_MARKER: &[u8; 2] = b"ST";

pub const END_TAG: &[u8; 2] = b"EN";
pub const END_LEN: usize = 10;

pub const RESPONSE_TAG: &[u8; 8] = b"RESPONSE";
pub const RESPONSE_LEN: usize = 16;

/// Largest transfer a client will request (4 GiB). Not enforced by the
/// server.
pub const MAX_TRANSFER_LEN: u64 = 4 * 1024 * 1024 * 1024;

/// Who pumps and who drains: `Dl` makes the server the byte source,
/// `Ul` makes the client the byte source.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[value(rename_all = "UPPER")]
pub enum Direction {
    Ul,
    Dl,
}

impl Direction {
    pub fn as_tag(&self) -> &'static [u8; 2] {
        match self {
            Self::Ul => b"UL",
            Self::Dl => b"DL",
        }
    }

    pub fn from_tag(tag: &[u8]) -> Result<Self, TransferError> {
        match tag {
            b"UL" => Ok(Self::Ul),
            b"DL" => Ok(Self::Dl),
            _ => Err(TransferError::protocol(format!(
                "unknown direction {:?}",
                String::from_utf8_lossy(tag)
            ))),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Ul => "UL",
            Self::Dl => "DL",
        })
    }
}

/// Transfer request, the first message on every connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub direction: Direction,
    pub len: u64,
}

impl Request {
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(REQUEST_TAG);
        buf.put_slice(self.direction.as_tag());
        buf.put_u64_le(self.len);
    }

    pub fn decode(data: &[u8; REQUEST_LEN]) -> Result<Self, TransferError> {
        if &data[..6] != REQUEST_TAG {
            return Err(TransferError::protocol(format!(
                "unknown request tag {:?}",
                String::from_utf8_lossy(&data[..6])
            )));
        }
        let direction = Direction::from_tag(&data[6..8])?;
        let len = (&data[8..]).get_u64_le();
        Ok(Self { direction, len })
    }
}

/// Sent by the client after its side of the data phase, carrying its
/// measured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndMarker {
    pub elapsed_usec: u64,
}

impl EndMarker {
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(END_TAG);
        buf.put_u64_le(self.elapsed_usec);
    }

    /// The tag bytes are read but not enforced; the second value tells the
    /// caller whether they matched, for logging.
    pub fn decode(data: &[u8; END_LEN]) -> (Self, bool) {
        let elapsed_usec = (&data[2..]).get_u64_le();
        (Self { elapsed_usec }, &data[..2] == END_TAG)
    }
}

/// Server's closing message, echoing the duration it took from the
/// end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub elapsed_usec: u64,
}

impl Response {
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(RESPONSE_TAG);
        buf.put_u64_le(self.elapsed_usec);
    }

    pub fn decode(data: &[u8; RESPONSE_LEN]) -> Result<Self, TransferError> {
        if &data[..8] != RESPONSE_TAG {
            return Err(TransferError::protocol(format!(
                "bad response tag {:?}",
                String::from_utf8_lossy(&data[..8])
            )));
        }
        let elapsed_usec = (&data[8..]).get_u64_le();
        Ok(Self { elapsed_usec })
    }
}

#[cfg(test)]
mod test {
    use bytes::BytesMut;

    use super::*;
    use crate::error::TransferError;

    #[test]
    fn request_layout() {
        let mut buf = BytesMut::new();
        Request {
            direction: Direction::Dl,
            len: 0x0102030405060708,
        }
        .encode(&mut buf);
        assert_eq!(&buf[..], b"REQTCPDL\x08\x07\x06\x05\x04\x03\x02\x01");

        buf.clear();
        Request {
            direction: Direction::Ul,
            len: 1048576,
        }
        .encode(&mut buf);
        assert_eq!(buf.len(), REQUEST_LEN);
        assert_eq!(&buf[..8], b"REQTCPUL");

        let mut wire = [0u8; REQUEST_LEN];
        wire.copy_from_slice(&buf);
        let req = Request::decode(&wire).unwrap();
        assert_eq!(req.direction, Direction::Ul);
        assert_eq!(req.len, 1048576);
    }

    #[test]
    fn request_rejects_bad_tag() {
        let mut wire = [0u8; REQUEST_LEN];
        wire[..8].copy_from_slice(b"REQUDPDL");
        assert!(matches!(
            Request::decode(&wire),
            Err(TransferError::Protocol(_))
        ));
    }

    #[test]
    fn request_rejects_bad_direction() {
        let mut wire = [0u8; REQUEST_LEN];
        wire[..8].copy_from_slice(b"REQTCPXX");
        assert!(matches!(
            Request::decode(&wire),
            Err(TransferError::Protocol(_))
        ));
    }

    #[test]
    fn end_marker_layout() {
        let mut buf = BytesMut::new();
        EndMarker { elapsed_usec: 300 }.encode(&mut buf);
        assert_eq!(&buf[..], b"EN\x2c\x01\x00\x00\x00\x00\x00\x00");

        let mut wire = [0u8; END_LEN];
        wire.copy_from_slice(&buf);
        let (end, tag_ok) = EndMarker::decode(&wire);
        assert_eq!(end.elapsed_usec, 300);
        assert!(tag_ok);
    }

    #[test]
    fn end_marker_tag_is_lenient() {
        let mut wire = [0u8; END_LEN];
        wire[..2].copy_from_slice(b"XX");
        wire[2..].copy_from_slice(&77u64.to_le_bytes());
        let (end, tag_ok) = EndMarker::decode(&wire);
        assert_eq!(end.elapsed_usec, 77);
        assert!(!tag_ok);
    }

    #[test]
    fn response_layout() {
        let mut buf = BytesMut::new();
        Response { elapsed_usec: 256 }.encode(&mut buf);
        assert_eq!(&buf[..], b"RESPONSE\x00\x01\x00\x00\x00\x00\x00\x00");

        let mut wire = [0u8; RESPONSE_LEN];
        wire.copy_from_slice(&buf);
        assert_eq!(Response::decode(&wire).unwrap().elapsed_usec, 256);
    }

    #[test]
    fn response_rejects_bad_tag() {
        let mut wire = [0u8; RESPONSE_LEN];
        wire[..8].copy_from_slice(b"RESPONSX");
        assert!(matches!(
            Response::decode(&wire),
            Err(TransferError::Protocol(_))
        ));
    }
}
