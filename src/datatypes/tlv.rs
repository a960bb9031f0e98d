use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

use crate::codec::CodecError;

// Standard TLV tag constants per SMPP v3.4 specification
pub mod tags {
    pub const USER_MESSAGE_REFERENCE: u16 = 0x0204;
    pub const SOURCE_PORT: u16 = 0x020A;
    pub const DESTINATION_PORT: u16 = 0x020C;
    pub const SAR_MSG_REF_NUM: u16 = 0x020E;
    pub const SAR_TOTAL_SEGMENTS: u16 = 0x020F;
    pub const SAR_SEGMENT_SEQNUM: u16 = 0x0210;
    pub const MORE_MESSAGES_TO_SEND: u16 = 0x0426;
    pub const PAYLOAD_TYPE: u16 = 0x0019;
    pub const MESSAGE_PAYLOAD: u16 = 0x0424;
    pub const PRIVACY_INDICATOR: u16 = 0x0201;
    pub const USER_DATA_HEADER: u16 = 0x0005;
    pub const NETWORK_ERROR_CODE: u16 = 0x0423;
    pub const RECEIPTED_MESSAGE_ID: u16 = 0x001E;
    pub const MESSAGE_STATE: u16 = 0x0427;
}

/// An optional parameter: tag, length, value triplet appended after a PDU's
/// mandatory body. A PDU carries zero or more of these, keyed by tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tlv {
    /// Uniquely identifies the optional parameter.
    pub tag: u16,

    /// Length of the value field in octets; does not include the tag and
    /// length octets themselves.
    pub length: u16,

    /// The parameter data, exactly `length` octets on the wire.
    pub value: Bytes,
}

impl Tlv {
    /// Build a TLV with the length derived from the value.
    pub fn new(tag: u16, value: impl Into<Bytes>) -> Self {
        let value = value.into();
        Self {
            tag,
            length: value.len() as u16,
            value,
        }
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16(self.tag);
        buf.put_u16(self.length);
        buf.extend_from_slice(&self.value);
    }

    pub fn encoded_size(&self) -> usize {
        4 + self.value.len()
    }

    /// Decode one TLV. A buffer that ends inside the triplet is a length
    /// error: trailing garbage after the mandatory fields is not tolerated.
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.remaining() < 4 {
            return Err(CodecError::TruncatedTlv);
        }

        let tag = buf.get_u16();
        let length = buf.get_u16();

        if buf.remaining() < length as usize {
            return Err(CodecError::TruncatedTlv);
        }

        let value = buf.copy_to_bytes(length as usize);

        Ok(Self { tag, length, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tlv_encode_basic() {
        let tlv = Tlv::new(0x0204, Bytes::from_static(&[0x01, 0x02]));
        let mut buf = BytesMut::new();
        tlv.encode(&mut buf);

        assert_eq!(buf.as_ref(), &[0x02, 0x04, 0x00, 0x02, 0x01, 0x02]);
        assert_eq!(tlv.encoded_size(), 6);
    }

    #[test]
    fn tlv_encode_empty_value() {
        let tlv = Tlv::new(0x0426, Bytes::new());
        let mut buf = BytesMut::new();
        tlv.encode(&mut buf);

        assert_eq!(buf.as_ref(), &[0x04, 0x26, 0x00, 0x00]);
    }

    #[test]
    fn tlv_roundtrip() {
        let original = Tlv::new(tags::MESSAGE_PAYLOAD, Bytes::from_static(b"hello world"));
        let mut buf = BytesMut::new();
        original.encode(&mut buf);

        let mut cursor = Cursor::new(buf.as_ref());
        let decoded = Tlv::decode(&mut cursor).unwrap();
        assert_eq!(original, decoded);
        assert_eq!(cursor.position() as usize, buf.len());
    }

    #[test]
    fn tlv_truncated_header() {
        let data = [0x02, 0x04, 0x00]; // only 3 bytes
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            Tlv::decode(&mut cursor),
            Err(CodecError::TruncatedTlv)
        ));
    }

    #[test]
    fn tlv_truncated_value() {
        let data = [0x02, 0x04, 0x00, 0x05, 0xAA, 0xBB]; // claims 5, has 2
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            Tlv::decode(&mut cursor),
            Err(CodecError::TruncatedTlv)
        ));
    }

    #[test]
    fn tlv_value_with_nul_bytes() {
        let original = Tlv::new(0x0010, Bytes::from_static(&[0x00, 0xFF, 0x00]));
        let mut buf = BytesMut::new();
        original.encode(&mut buf);

        let mut cursor = Cursor::new(buf.as_ref());
        assert_eq!(Tlv::decode(&mut cursor).unwrap(), original);
    }
}
