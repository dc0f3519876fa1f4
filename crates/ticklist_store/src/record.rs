//! Log record types and serialization.
//!
//! Every record is framed as:
//!
//! ```text
//! | magic "TLOG" (4) | kind (1) | payload len (4, LE) | payload | crc32 (4, LE) |
//! ```
//!
//! The CRC covers kind, length and payload. Payloads are CBOR.

use crate::error::{StoreError, StoreResult};
use ticklist_protocol::{Task, TaskId};

/// Magic bytes identifying a log record.
pub const LOG_MAGIC: [u8; 4] = *b"TLOG";

const HEADER_SIZE: usize = 9;
const CRC_SIZE: usize = 4;

const KIND_PUT: u8 = 1;
const KIND_DELETE: u8 = 2;

/// A single entry of the task log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    /// Insert or replace a task.
    Put(Task),
    /// Remove a task.
    Delete(TaskId),
}

impl LogRecord {
    fn kind(&self) -> u8 {
        match self {
            Self::Put(_) => KIND_PUT,
            Self::Delete(_) => KIND_DELETE,
        }
    }

    /// Serializes the record with its envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded or exceeds the
    /// 4-byte length field.
    pub fn encode(&self) -> StoreResult<Vec<u8>> {
        let mut payload = Vec::new();
        let encoded = match self {
            Self::Put(task) => ciborium::into_writer(task, &mut payload),
            Self::Delete(id) => ciborium::into_writer(id, &mut payload),
        };
        encoded.map_err(|e| StoreError::Codec(e.to_string()))?;

        let len = u32::try_from(payload.len()).map_err(|_| {
            StoreError::Codec(format!("record payload too large: {} bytes", payload.len()))
        })?;

        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len() + CRC_SIZE);
        buf.extend_from_slice(&LOG_MAGIC);
        buf.push(self.kind());
        buf.extend_from_slice(&len.to_le_bytes());
        buf.extend_from_slice(&payload);
        let crc = compute_crc32(&buf[LOG_MAGIC.len()..]);
        buf.extend_from_slice(&crc.to_le_bytes());
        Ok(buf)
    }

    /// Decodes the record at the start of `buf`.
    ///
    /// Returns `Ok(None)` if `buf` ends before the record does (a torn
    /// write), otherwise the record and the number of bytes it occupies.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupted`] on bad magic, unknown kind, CRC
    /// mismatch or an undecodable payload.
    pub fn decode(buf: &[u8]) -> StoreResult<Option<(Self, usize)>> {
        if buf.len() < HEADER_SIZE {
            return Ok(None);
        }
        if buf[..4] != LOG_MAGIC {
            return Err(StoreError::corrupted("bad record magic"));
        }

        let kind = buf[4];
        let len = u32::from_le_bytes([buf[5], buf[6], buf[7], buf[8]]) as usize;
        let total = HEADER_SIZE + len + CRC_SIZE;
        if buf.len() < total {
            return Ok(None);
        }

        let body_end = HEADER_SIZE + len;
        let stored_crc = u32::from_le_bytes([
            buf[body_end],
            buf[body_end + 1],
            buf[body_end + 2],
            buf[body_end + 3],
        ]);
        let computed_crc = compute_crc32(&buf[LOG_MAGIC.len()..body_end]);
        if stored_crc != computed_crc {
            return Err(StoreError::corrupted(format!(
                "crc mismatch: stored {stored_crc:#010x}, computed {computed_crc:#010x}"
            )));
        }

        let payload = &buf[HEADER_SIZE..body_end];
        let record = match kind {
            KIND_PUT => Self::Put(
                ciborium::from_reader(payload).map_err(|e| StoreError::corrupted(e.to_string()))?,
            ),
            KIND_DELETE => Self::Delete(
                ciborium::from_reader(payload).map_err(|e| StoreError::corrupted(e.to_string()))?,
            ),
            other => {
                return Err(StoreError::corrupted(format!("unknown record kind {other}")));
            }
        };

        Ok(Some((record, total)))
    }
}

/// Computes CRC32 checksum for data.
pub fn compute_crc32(data: &[u8]) -> u32 {
    // IEEE polynomial, table built at compile time
    const CRC32_TABLE: [u32; 256] = {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut crc = i as u32;
            let mut j = 0;
            while j < 8 {
                if crc & 1 != 0 {
                    crc = (crc >> 1) ^ 0xEDB8_8320;
                } else {
                    crc >>= 1;
                }
                j += 1;
            }
            table[i] = crc;
            i += 1;
        }
        table
    };

    let mut crc = 0xFFFF_FFFF_u32;
    for &byte in data {
        let index = ((crc ^ u32::from(byte)) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[index];
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(id: &str, text: &str) -> LogRecord {
        LogRecord::Put(Task::new(TaskId::new(id), text))
    }

    #[test]
    fn crc32_known_value() {
        assert_eq!(compute_crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(compute_crc32(b""), 0);
    }

    #[test]
    fn encoded_layout() {
        let bytes = LogRecord::Delete(TaskId::new("a")).encode().unwrap();
        assert_eq!(&bytes[..4], b"TLOG");
        assert_eq!(bytes[4], KIND_DELETE);
        let len = u32::from_le_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]) as usize;
        assert_eq!(bytes.len(), HEADER_SIZE + len + CRC_SIZE);
    }

    #[test]
    fn decode_consumes_one_record() {
        let first = put("1", "one");
        let second = LogRecord::Delete(TaskId::new("1"));
        let mut buf = first.encode().unwrap();
        let first_len = buf.len();
        buf.extend(second.encode().unwrap());

        let (decoded, used) = LogRecord::decode(&buf).unwrap().unwrap();
        assert_eq!(decoded, first);
        assert_eq!(used, first_len);

        let (decoded, _) = LogRecord::decode(&buf[used..]).unwrap().unwrap();
        assert_eq!(decoded, second);
    }

    #[test]
    fn truncated_record_is_incomplete() {
        let bytes = put("1", "one").encode().unwrap();
        for cut in [0, 3, HEADER_SIZE, bytes.len() - 1] {
            assert!(LogRecord::decode(&bytes[..cut]).unwrap().is_none());
        }
    }

    #[test]
    fn flipped_payload_bit_fails_crc() {
        let mut bytes = put("1", "one").encode().unwrap();
        bytes[HEADER_SIZE + 2] ^= 0x01;
        assert!(matches!(
            LogRecord::decode(&bytes),
            Err(StoreError::Corrupted(_))
        ));
    }

    #[test]
    fn bad_magic_is_corruption() {
        let mut bytes = put("1", "one").encode().unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            LogRecord::decode(&bytes),
            Err(StoreError::Corrupted(_))
        ));
    }
}
