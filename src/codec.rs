// SMPP v3.4 wire codec - primitives and the fixed 16-byte PDU header.
//
// Everything on the wire is network byte order. Mandatory-field bodies mix
// fixed 1-octet integers with NUL-terminated C-strings; the helpers here are
// the single place those encodings live. PDU-level layout (which fields, in
// which order) is driven by the registry in `pdu`.

use crate::datatypes::{CommandId, CommandStatus, FieldTag};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use thiserror::Error;

/// Maximum allowed PDU size to prevent memory exhaustion from a hostile or
/// broken peer.
pub const MAX_PDU_SIZE: u32 = 65536; // 64KB

/// SMPP v3.4 PDU header (Section 2.2.1): four unsigned 32-bit words common
/// to every PDU. `command_length` covers the whole PDU including the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PduHeader {
    pub command_length: u32,
    pub command_id: CommandId,
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl PduHeader {
    pub const SIZE: usize = 16;

    /// Decode a header from the buffer.
    ///
    /// Parsing is deliberately lenient where the protocol allows a peer to
    /// be sloppy: a non-zero status on a request is preserved rather than
    /// rejected, and sequence number 0 is accepted (it is what nacks for
    /// malformed input carry). The stated length and the command id are the
    /// only hard failures.
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::Incomplete);
        }

        let command_length = buf.get_u32();
        let command_id_raw = buf.get_u32();
        let command_status = CommandStatus::from(buf.get_u32());
        let sequence_number = buf.get_u32();

        if command_length < Self::SIZE as u32 || command_length > MAX_PDU_SIZE {
            return Err(CodecError::Length(command_length));
        }

        let command_id =
            CommandId::try_from(command_id_raw).map_err(|_| CodecError::CmdId(command_id_raw))?;

        Ok(PduHeader {
            command_length,
            command_id,
            command_status,
            sequence_number,
        })
    }

    /// Encode the header. `command_length` is written as-is; callers that
    /// build a whole PDU patch the first four bytes once the body size is
    /// known (see `Pdu::to_bytes`).
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.command_length);
        buf.put_u32(self.command_id as u32);
        buf.put_u32(self.command_status.to_u32());
        buf.put_u32(self.sequence_number);
    }
}

/// Codec errors. The kinds mirror what the session needs for its nack
/// dispatch: length problems answer with `ESME_RINVCMDLEN`, unknown command
/// ids with `ESME_RINVCMDID`.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Not enough buffered data; an expected runtime condition on a socket,
    /// terminal when raised while parsing a complete PDU body.
    #[error("incomplete PDU: need more data")]
    Incomplete,

    /// Stated command_length outside `16..=MAX_PDU_SIZE`.
    #[error("invalid command_length {0}: must be 16..={MAX_PDU_SIZE}")]
    Length(u32),

    /// A mandatory field ended mid-value (unterminated C-string or a
    /// short-message payload shorter than its sm_length).
    #[error("mandatory field {0} truncated")]
    TruncatedField(FieldTag),

    /// Trailing bytes formed a partial tag/length/value triplet.
    #[error("truncated TLV at end of PDU body")]
    TruncatedTlv,

    /// Command id not in the recognized set; carries the raw id so the
    /// session can nack it.
    #[error("unknown command_id {0:#010x}")]
    CmdId(u32),

    /// Value shape does not match the field schema (byte vs C-string).
    #[error("field {field} expects a {expected} value")]
    FieldType {
        field: FieldTag,
        expected: &'static str,
    },

    /// Underlying transport failure while framing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// The command_status a generic_nack for this error should carry.
    pub fn nack_status(&self) -> CommandStatus {
        match self {
            CodecError::CmdId(_) => CommandStatus::InvalidCommandId,
            _ => CommandStatus::InvalidCommandLength,
        }
    }
}

/// Decode a single byte.
pub fn decode_u8(buf: &mut Cursor<&[u8]>) -> Result<u8, CodecError> {
    if buf.remaining() < 1 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u8())
}

/// Decode a 16-bit big-endian integer.
pub fn decode_u16(buf: &mut Cursor<&[u8]>) -> Result<u16, CodecError> {
    if buf.remaining() < 2 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u16())
}

/// Decode a 32-bit big-endian integer.
pub fn decode_u32(buf: &mut Cursor<&[u8]>) -> Result<u32, CodecError> {
    if buf.remaining() < 4 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u32())
}

/// Peek at the next 4 bytes without advancing the cursor (for command_length).
pub fn peek_u32(buf: &mut Cursor<&[u8]>) -> Result<u32, CodecError> {
    if buf.remaining() < 4 {
        return Err(CodecError::Incomplete);
    }
    let pos = buf.position();
    let value = buf.get_u32();
    buf.set_position(pos);
    Ok(value)
}

/// Decode a NUL-terminated variable-length string. The terminator is
/// consumed but not part of the returned value; an empty field is a lone
/// NUL on the wire. `Err(Incomplete)` means no terminator before the end of
/// the buffer.
pub fn decode_cstring(buf: &mut Cursor<&[u8]>) -> Result<Bytes, CodecError> {
    let start = buf.position() as usize;
    let slice = *buf.get_ref();
    match slice[start..].iter().position(|&b| b == 0) {
        Some(nul) => {
            let value = Bytes::copy_from_slice(&slice[start..start + nul]);
            buf.set_position((start + nul + 1) as u64);
            Ok(value)
        }
        None => Err(CodecError::Incomplete),
    }
}

/// Encode a variable-length string followed by its NUL terminator. Empty
/// values still emit the terminator.
pub fn encode_cstring(buf: &mut BytesMut, value: &[u8]) {
    buf.put_slice(value);
    buf.put_u8(0);
}

/// Encode a single byte.
pub fn encode_u8(buf: &mut BytesMut, value: u8) {
    buf.put_u8(value);
}

/// Encode a 16-bit big-endian integer.
pub fn encode_u16(buf: &mut BytesMut, value: u16) {
    buf.put_u16(value);
}

/// Encode a 32-bit big-endian integer.
pub fn encode_u32(buf: &mut BytesMut, value: u32) {
    buf.put_u32(value);
}
