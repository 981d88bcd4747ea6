//! pkt-line framing.
//!
//! Every packet starts with four hex digits giving its total length,
//! prefix included. `0000`, `0001` and `0002` are the flush, delimiter
//! and response-end control packets.

use thiserror::Error;

/// Width of the length prefix.
pub const PREFIX_LEN: usize = 4;

/// Largest packet the protocol allows.
pub const MAX_PACKET_LEN: usize = 65520;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    Flush,
    Delimiter,
    ResponseEnd,
    Data,
}

/// One decoded packet borrowed from the framed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet<'a> {
    pub kind: PacketKind,
    /// Offset of the length prefix within the buffer.
    pub offset: usize,
    /// Payload after the prefix. Empty for control packets.
    pub data: &'a [u8],
}

impl Packet<'_> {
    /// Offset of the first payload byte within the buffer.
    pub fn data_offset(&self) -> usize {
        self.offset + PREFIX_LEN
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramingError {
    #[error("invalid pkt-line length prefix at byte {offset}")]
    InvalidLength { offset: usize },

    #[error("pkt-line at byte {offset} needs {needed} bytes but only {available} remain")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

/// Iterate over the packets of `buf`. Stops after the first framing error.
pub fn packets(buf: &[u8]) -> Packets<'_> {
    Packets {
        buf,
        pos: 0,
        failed: false,
    }
}

pub struct Packets<'a> {
    buf: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> Packets<'a> {
    fn fail(&mut self, err: FramingError) -> Option<Result<Packet<'a>, FramingError>> {
        self.failed = true;
        Some(Err(err))
    }
}

impl<'a> Iterator for Packets<'a> {
    type Item = Result<Packet<'a>, FramingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }

        let offset = self.pos;
        let rest = &self.buf[offset..];
        if rest.len() < PREFIX_LEN {
            return self.fail(FramingError::Truncated {
                offset,
                needed: PREFIX_LEN,
                available: rest.len(),
            });
        }

        let Some(len) = parse_length(&rest[..PREFIX_LEN]) else {
            return self.fail(FramingError::InvalidLength { offset });
        };

        let kind = match len {
            0 => PacketKind::Flush,
            1 => PacketKind::Delimiter,
            2 => PacketKind::ResponseEnd,
            3 => return self.fail(FramingError::InvalidLength { offset }),
            len if len > MAX_PACKET_LEN => {
                return self.fail(FramingError::InvalidLength { offset })
            }
            _ => PacketKind::Data,
        };

        if kind != PacketKind::Data {
            self.pos += PREFIX_LEN;
            return Some(Ok(Packet {
                kind,
                offset,
                data: &[],
            }));
        }

        if len > rest.len() {
            return self.fail(FramingError::Truncated {
                offset,
                needed: len,
                available: rest.len(),
            });
        }

        self.pos += len;
        Some(Ok(Packet {
            kind,
            offset,
            data: &rest[PREFIX_LEN..len],
        }))
    }
}

fn parse_length(prefix: &[u8]) -> Option<usize> {
    if !prefix.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let text = std::str::from_utf8(prefix).ok()?;
    usize::from_str_radix(text, 16).ok()
}

/// Frame `data` as a single data packet.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = format!("{:04x}", data.len() + PREFIX_LEN).into_bytes();
    out.extend_from_slice(data);
    out
}

/// The flush packet.
pub fn flush() -> &'static [u8] {
    b"0000"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_and_control_packets() {
        let mut buf = encode(b"# service=git-upload-pack\n");
        buf.extend_from_slice(flush());
        buf.extend_from_slice(&encode(b"hello\n"));
        buf.extend_from_slice(b"0001");

        let decoded: Vec<_> = packets(&buf).collect::<Result<_, _>>().unwrap();
        assert_eq!(decoded.len(), 4);
        assert_eq!(decoded[0].kind, PacketKind::Data);
        assert_eq!(decoded[0].data, b"# service=git-upload-pack\n");
        assert_eq!(decoded[1].kind, PacketKind::Flush);
        assert_eq!(decoded[2].offset, 30 + 4);
        assert_eq!(decoded[2].data, b"hello\n");
        assert_eq!(decoded[3].kind, PacketKind::Delimiter);
    }

    #[test]
    fn test_encode_prefix_includes_itself() {
        assert_eq!(encode(b"abc"), b"0007abc".to_vec());
    }

    #[test]
    fn test_uppercase_hex_prefix() {
        let buf = b"000Aabcdef";
        let decoded: Vec<_> = packets(buf).collect::<Result<_, _>>().unwrap();
        assert_eq!(decoded[0].data, b"abcdef");
    }

    #[test]
    fn test_invalid_prefix() {
        let mut iter = packets(b"zz12abc");
        assert_eq!(
            iter.next(),
            Some(Err(FramingError::InvalidLength { offset: 0 }))
        );
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_sign_prefix_rejected() {
        let mut iter = packets(b"+008abcd");
        assert_eq!(
            iter.next(),
            Some(Err(FramingError::InvalidLength { offset: 0 }))
        );
    }

    #[test]
    fn test_reserved_length_three() {
        let mut iter = packets(b"0003");
        assert_eq!(
            iter.next(),
            Some(Err(FramingError::InvalidLength { offset: 0 }))
        );
    }

    #[test]
    fn test_truncated_packet() {
        let mut iter = packets(b"0000000aabc");
        assert_eq!(iter.next().unwrap().unwrap().kind, PacketKind::Flush);
        assert_eq!(
            iter.next(),
            Some(Err(FramingError::Truncated {
                offset: 4,
                needed: 10,
                available: 7
            }))
        );
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_trailing_partial_prefix() {
        let mut iter = packets(b"00");
        assert_eq!(
            iter.next(),
            Some(Err(FramingError::Truncated {
                offset: 0,
                needed: 4,
                available: 2
            }))
        );
    }
}
