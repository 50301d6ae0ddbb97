//! Newline-delimited JSON framing.
//!
//! Inbound bytes accumulate in a [`FrameDecoder`]; every complete line is
//! decoded into a [`Packet`] and an incomplete tail stays buffered for the
//! next read. Outbound packets become one JSON record plus `\n`.

use crate::common::Packet;
use crate::error::FrameError;

/// Largest accepted frame, matching the server's line scanner.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

#[derive(Debug)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already searched for a newline.
    scanned: usize,
    max_frame_len: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::with_max_frame_len(MAX_FRAME_LEN)
    }

    pub fn with_max_frame_len(max_frame_len: usize) -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            max_frame_len,
        }
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Bytes held back waiting for a newline.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Pops the next complete packet, skipping blank lines.
    ///
    /// `Ok(None)` means more bytes are needed. Errors are fatal: the decoder
    /// makes no attempt to resynchronize.
    pub fn next_packet(&mut self) -> Result<Option<Packet>, FrameError> {
        loop {
            let found = self.buffer[self.scanned..].iter().position(|&b| b == b'\n');
            let Some(newline) = found.map(|offset| self.scanned + offset) else {
                self.scanned = self.buffer.len();
                if self.buffer.len() > self.max_frame_len {
                    return Err(FrameError::TooLarge {
                        limit: self.max_frame_len,
                    });
                }
                return Ok(None);
            };

            if newline > self.max_frame_len {
                return Err(FrameError::TooLarge {
                    limit: self.max_frame_len,
                });
            }

            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            self.scanned = 0;
            let line = line[..newline].trim_ascii();
            if line.is_empty() {
                continue;
            }

            return serde_json::from_slice(line)
                .map(Some)
                .map_err(FrameError::Decode);
        }
    }

    /// Feeds a chunk and returns every packet it completes, in order.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<Vec<Packet>, FrameError> {
        self.extend(bytes);
        let mut packets = Vec::new();
        while let Some(packet) = self.next_packet()? {
            packets.push(packet);
        }
        Ok(packets)
    }
}

pub fn encode_packet(packet: &Packet) -> Result<Vec<u8>, FrameError> {
    let mut frame = serde_json::to_vec(packet).map_err(FrameError::Encode)?;
    frame.push(b'\n');
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHATLIST: &str = r#"{"type":"chatlist","chats":[{"peer":"bob","display_name":"Bob","last_msg":"hi","last_ts":100}]}"#;
    const MESSAGE: &str =
        r#"{"type":"message","from":"bob","to":"alice","content":"hi","timestamp":100}"#;

    fn stream() -> Vec<u8> {
        format!("{CHATLIST}\n{MESSAGE}\n{MESSAGE}\n").into_bytes()
    }

    #[test]
    fn decodes_whole_buffer() {
        let mut decoder = FrameDecoder::new();
        let packets = decoder.decode(&stream()).unwrap();
        let kinds: Vec<_> = packets.iter().map(|p| p.kind.as_str()).collect();
        assert_eq!(kinds, ["chatlist", "message", "message"]);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn chunk_boundaries_do_not_change_output() {
        let bytes = stream();
        let expected = FrameDecoder::new().decode(&bytes).unwrap();

        for chunk_size in [1, 2, 3, 7, 16, 64, bytes.len()] {
            let mut decoder = FrameDecoder::new();
            let mut packets = Vec::new();
            for chunk in bytes.chunks(chunk_size) {
                packets.extend(decoder.decode(chunk).unwrap());
            }
            assert_eq!(packets, expected, "chunk size {chunk_size}");
        }
    }

    #[test]
    fn keeps_partial_tail_until_newline() {
        let mut decoder = FrameDecoder::new();
        let (head, tail) = MESSAGE.split_at(20);

        assert!(decoder.decode(head.as_bytes()).unwrap().is_empty());
        assert_eq!(decoder.pending(), head.len());

        let packets = decoder.decode(format!("{tail}\n").as_bytes()).unwrap();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].content.as_deref(), Some("hi"));
    }

    #[test]
    fn large_frame_in_small_chunks_resumes_scan() {
        let mut packet = Packet::new("message");
        packet.content = Some("y".repeat(256 * 1024));
        let frame = encode_packet(&packet).unwrap();
        let mut bytes = frame.clone();
        bytes.extend_from_slice(MESSAGE.as_bytes());
        bytes.push(b'\n');

        let mut decoder = FrameDecoder::new();
        let mut packets = Vec::new();
        for chunk in bytes.chunks(4096) {
            packets.extend(decoder.decode(chunk).unwrap());
        }
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0], packet);
        assert_eq!(packets[1].content.as_deref(), Some("hi"));
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn skips_empty_lines() {
        let mut decoder = FrameDecoder::new();
        let packets = decoder
            .decode(format!("\n\r\n{MESSAGE}\n\n").as_bytes())
            .unwrap();
        assert_eq!(packets.len(), 1);
    }

    #[test]
    fn malformed_record_is_an_error() {
        let mut decoder = FrameDecoder::new();
        let err = decoder.decode(b"{not json}\n").unwrap_err();
        assert!(matches!(err, FrameError::Decode(_)));
    }

    #[test]
    fn oversized_partial_frame_is_rejected() {
        let mut decoder = FrameDecoder::with_max_frame_len(16);
        let err = decoder.decode(&[b'x'; 32]).unwrap_err();
        assert!(matches!(err, FrameError::TooLarge { limit: 16 }));
    }

    #[test]
    fn encoded_packet_is_one_line() {
        let mut packet = Packet::new("user_search");
        packet.query = Some("bo".into());
        let frame = encode_packet(&packet).unwrap();

        assert_eq!(frame.last(), Some(&b'\n'));
        assert_eq!(frame.iter().filter(|&&b| b == b'\n').count(), 1);
        let decoded = FrameDecoder::new().decode(&frame).unwrap();
        assert_eq!(decoded, vec![packet]);
    }
}
