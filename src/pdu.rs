// SMPP v3.4 PDU registry and the generic PDU value.
//
// Rather than one struct per command, a PDU is a header plus a typed
// mandatory-field store and a TLV list; the registry's per-command field
// list drives both parsing and serialization, so the two can never drift
// apart. This mirrors how the protocol itself is specified: every body is
// the same vocabulary of fields in a command-specific order.

use crate::codec::{self, CodecError, PduHeader};
use crate::datatypes::{
    CommandId, CommandStatus, EsmClass, FieldKind, FieldStore, FieldTag, FieldValue, Tlv,
};
use bytes::{Buf, Bytes, BytesMut};
use std::io::Cursor;

use FieldTag::*;

const BIND_FIELDS: &[FieldTag] = &[
    SystemId,
    Password,
    SystemType,
    InterfaceVersion,
    AddrTon,
    AddrNpi,
    AddressRange,
];

const BIND_RESP_FIELDS: &[FieldTag] = &[SystemId];

const SM_FIELDS: &[FieldTag] = &[
    ServiceType,
    SourceAddrTon,
    SourceAddrNpi,
    SourceAddr,
    DestAddrTon,
    DestAddrNpi,
    DestinationAddr,
    EsmClass,
    ProtocolId,
    PriorityFlag,
    ScheduleDeliveryTime,
    ValidityPeriod,
    RegisteredDelivery,
    ReplaceIfPresentFlag,
    DataCoding,
    SmDefaultMsgId,
    SmLength,
    ShortMessage,
];

const SM_RESP_FIELDS: &[FieldTag] = &[MessageId];

const QUERY_SM_FIELDS: &[FieldTag] = &[MessageId, SourceAddrTon, SourceAddrNpi, SourceAddr];

const QUERY_SM_RESP_FIELDS: &[FieldTag] = &[MessageId, FinalDate, MessageState, ErrorCode];

const NO_FIELDS: &[FieldTag] = &[];

/// The ordered mandatory-field list for a command, per SMPP v3.4 Section 4.
/// Parsing consumes fields in this order; serialization emits them in it.
pub fn mandatory_fields(id: CommandId) -> &'static [FieldTag] {
    match id {
        CommandId::BindTransmitter | CommandId::BindReceiver | CommandId::BindTransceiver => {
            BIND_FIELDS
        }
        CommandId::BindTransmitterResp
        | CommandId::BindReceiverResp
        | CommandId::BindTransceiverResp => BIND_RESP_FIELDS,
        CommandId::SubmitSm | CommandId::DeliverSm => SM_FIELDS,
        CommandId::SubmitSmResp | CommandId::DeliverSmResp => SM_RESP_FIELDS,
        CommandId::QuerySm => QUERY_SM_FIELDS,
        CommandId::QuerySmResp => QUERY_SM_RESP_FIELDS,
        CommandId::EnquireLink
        | CommandId::EnquireLinkResp
        | CommandId::Unbind
        | CommandId::UnbindResp
        | CommandId::GenericNack => NO_FIELDS,
    }
}

/// One protocol data unit: header, mandatory fields, optional TLVs.
#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    header: PduHeader,
    fields: FieldStore,
    tlvs: Vec<Tlv>,
}

impl Pdu {
    /// An empty PDU of the given command, status OK, sequence 0. The
    /// sequence number is assigned by the session at write time.
    pub fn new(command_id: CommandId) -> Self {
        Self {
            header: PduHeader {
                command_length: 0,
                command_id,
                command_status: CommandStatus::Ok,
                sequence_number: 0,
            },
            fields: FieldStore::new(),
            tlvs: Vec::new(),
        }
    }

    pub fn header(&self) -> &PduHeader {
        &self.header
    }

    pub fn command_id(&self) -> CommandId {
        self.header.command_id
    }

    pub fn command_status(&self) -> CommandStatus {
        self.header.command_status
    }

    pub fn sequence_number(&self) -> u32 {
        self.header.sequence_number
    }

    pub fn set_sequence_number(&mut self, sequence: u32) {
        self.header.sequence_number = sequence;
    }

    pub fn set_status(&mut self, status: CommandStatus) {
        self.header.command_status = status;
    }

    /// Validity predicate: responses are OK iff their status is zero;
    /// requests always pass, as does generic_nack, whose status is payload
    /// (the rejection reason) rather than an outcome.
    pub fn ok(&self) -> bool {
        if self.header.command_id == CommandId::GenericNack
            || !self.header.command_id.is_response()
        {
            return true;
        }
        self.header.command_status == CommandStatus::Ok
    }

    /// Assign a mandatory field, shape-checked against the field schema.
    /// Assigning the short message keeps sm_length in sync. Fields outside
    /// this command's mandatory list are stored but never serialized.
    pub fn set_field(
        &mut self,
        tag: FieldTag,
        value: impl Into<FieldValue>,
    ) -> Result<(), CodecError> {
        let value = value.into();
        if tag == ShortMessage {
            if let Some(payload) = value.as_bytes() {
                if payload.len() > 254 {
                    return Err(CodecError::FieldType {
                        field: ShortMessage,
                        expected: "byte string of at most 254 octets",
                    });
                }
                let len = payload.len() as u8;
                self.fields.insert(tag, value)?;
                self.fields.insert_raw(SmLength, FieldValue::Byte(len));
                return Ok(());
            }
        }
        self.fields.insert(tag, value)
    }

    pub fn field(&self, tag: FieldTag) -> Option<&FieldValue> {
        self.fields.get(tag)
    }

    pub fn field_byte(&self, tag: FieldTag) -> Option<u8> {
        self.fields.get_byte(tag)
    }

    pub fn field_str(&self, tag: FieldTag) -> Option<&Bytes> {
        self.fields.get_str(tag)
    }

    /// The esm_class octet decomposed into its bit groups, if present.
    pub fn esm_class(&self) -> Option<EsmClass> {
        self.fields.get_byte(FieldTag::EsmClass).map(EsmClass::from_byte)
    }

    /// The raw short-message payload, user data header included.
    pub fn short_message(&self) -> Option<&[u8]> {
        self.fields.get_str(ShortMessage).map(|b| b.as_ref())
    }

    /// The user data header: the first `udhl + 1` payload octets, present
    /// only when esm_class has the UDHI bit set.
    pub fn user_data_header(&self) -> Option<&[u8]> {
        if !self.esm_class()?.has_udhi() {
            return None;
        }
        let payload = self.short_message()?;
        let first = *payload.first()?;
        let end = (first as usize + 1).min(payload.len());
        Some(&payload[..end])
    }

    /// The message body with any user data header stripped.
    pub fn message_text(&self) -> Option<&[u8]> {
        let payload = self.short_message()?;
        match self.user_data_header() {
            Some(udh) => Some(&payload[udh.len()..]),
            None => Some(payload),
        }
    }

    /// Append or replace an optional parameter. Duplicate tags overwrite in
    /// place, so insertion order is preserved while the last write wins.
    pub fn set_tlv(&mut self, tlv: Tlv) {
        match self.tlvs.iter_mut().find(|existing| existing.tag == tlv.tag) {
            Some(existing) => *existing = tlv,
            None => self.tlvs.push(tlv),
        }
    }

    pub fn tlv(&self, tag: u16) -> Option<&Tlv> {
        self.tlvs.iter().find(|tlv| tlv.tag == tag)
    }

    pub fn tlvs(&self) -> &[Tlv] {
        &self.tlvs
    }

    /// Parse a complete PDU from a buffer holding exactly one PDU. The
    /// stated command_length must match the buffer length.
    pub fn parse(data: &[u8]) -> Result<Self, CodecError> {
        let mut cursor = Cursor::new(data);
        let header = PduHeader::decode(&mut cursor)?;
        if header.command_length as usize != data.len() {
            return Err(CodecError::Length(header.command_length));
        }
        Self::parse_body(header, &data[PduHeader::SIZE..])
    }

    /// Parse a PDU body against the registry's field list for its command.
    ///
    /// End-of-body exactly at a field boundary is legal: the remaining
    /// declared fields stay unset and no TLV section follows (this is how
    /// an error bind_resp with an empty body arrives). Running out mid
    /// field is a length error.
    pub fn parse_body(header: PduHeader, body: &[u8]) -> Result<Self, CodecError> {
        let mut cursor = Cursor::new(body);
        let mut fields = FieldStore::new();
        let mut at_eof = false;

        for &tag in mandatory_fields(header.command_id) {
            if cursor.remaining() == 0 {
                at_eof = true;
                break;
            }
            match tag {
                SmLength => {
                    let sm_length = codec::decode_u8(&mut cursor)?;
                    fields.insert_raw(SmLength, FieldValue::Byte(sm_length));

                    if cursor.remaining() < sm_length as usize {
                        return Err(CodecError::TruncatedField(ShortMessage));
                    }
                    let payload = cursor.copy_to_bytes(sm_length as usize);
                    fields.insert_raw(ShortMessage, FieldValue::Str(payload));
                }
                // Consumed together with sm_length above.
                ShortMessage => {}
                tag => match tag.kind() {
                    FieldKind::Fixed => {
                        let value = codec::decode_u8(&mut cursor)?;
                        fields.insert_raw(tag, FieldValue::Byte(value));
                    }
                    FieldKind::CString => match codec::decode_cstring(&mut cursor) {
                        Ok(value) => fields.insert_raw(tag, FieldValue::Str(value)),
                        Err(CodecError::Incomplete) => {
                            return Err(CodecError::TruncatedField(tag))
                        }
                        Err(err) => return Err(err),
                    },
                    FieldKind::Payload => unreachable!("only short_message is a payload field"),
                },
            }
        }

        let mut pdu = Pdu {
            header,
            fields,
            tlvs: Vec::new(),
        };

        if !at_eof {
            while cursor.remaining() > 0 {
                let tlv = Tlv::decode(&mut cursor)?;
                pdu.set_tlv(tlv);
            }
        }

        Ok(pdu)
    }

    /// Serialize the PDU. Mandatory fields are emitted in declared order
    /// (unset variable fields as a lone NUL, unset fixed fields as 0x00),
    /// then TLVs in insertion order, then the length word is patched with
    /// the final size.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(64);
        self.header.encode(&mut buf);

        for &tag in mandatory_fields(self.header.command_id) {
            match tag {
                SmLength => {
                    let len = self
                        .fields
                        .get_str(ShortMessage)
                        .map(|payload| payload.len())
                        .unwrap_or(0);
                    codec::encode_u8(&mut buf, len as u8);
                }
                ShortMessage => {
                    if let Some(payload) = self.fields.get_str(ShortMessage) {
                        buf.extend_from_slice(payload);
                    }
                }
                tag => match tag.kind() {
                    FieldKind::Fixed => {
                        codec::encode_u8(&mut buf, self.fields.get_byte(tag).unwrap_or(0));
                    }
                    FieldKind::CString => {
                        let value = self.fields.get_str(tag).map(|b| b.as_ref()).unwrap_or(b"");
                        codec::encode_cstring(&mut buf, value);
                    }
                    FieldKind::Payload => unreachable!("only short_message is a payload field"),
                },
            }
        }

        for tlv in &self.tlvs {
            tlv.encode(&mut buf);
        }

        let length = buf.len() as u32;
        buf[0..4].copy_from_slice(&length.to_be_bytes());
        buf.freeze()
    }
}

/// Constructors for the PDUs a client session originates. Field defaults
/// follow Section 4: empty service/system types, unknown TON/NPI, immediate
/// delivery, default data coding.
impl Pdu {
    /// A bind request of the given variant with credentials filled in and
    /// the remaining bind fields at their defaults.
    pub fn bind(command_id: CommandId, system_id: &str, password: &str) -> Result<Self, CodecError> {
        debug_assert!(matches!(
            command_id,
            CommandId::BindTransmitter | CommandId::BindReceiver | CommandId::BindTransceiver
        ));
        let mut pdu = Pdu::new(command_id);
        pdu.set_field(SystemId, system_id)?;
        pdu.set_field(Password, password)?;
        pdu.set_field(SystemType, "")?;
        pdu.set_field(InterfaceVersion, 0x34u8)?;
        pdu.set_field(AddrTon, 0u8)?;
        pdu.set_field(AddrNpi, 0u8)?;
        pdu.set_field(AddressRange, "")?;
        Ok(pdu)
    }

    fn short_message_pdu(
        command_id: CommandId,
        source_addr: &str,
        destination_addr: &str,
        short_message: &[u8],
    ) -> Result<Self, CodecError> {
        let mut pdu = Pdu::new(command_id);
        pdu.set_field(ServiceType, "")?;
        pdu.set_field(SourceAddrTon, 0u8)?;
        pdu.set_field(SourceAddrNpi, 0u8)?;
        pdu.set_field(SourceAddr, source_addr)?;
        pdu.set_field(DestAddrTon, 0u8)?;
        pdu.set_field(DestAddrNpi, 0u8)?;
        pdu.set_field(DestinationAddr, destination_addr)?;
        pdu.set_field(FieldTag::EsmClass, 0u8)?;
        pdu.set_field(ProtocolId, 0u8)?;
        pdu.set_field(PriorityFlag, 0u8)?;
        pdu.set_field(ScheduleDeliveryTime, "")?;
        pdu.set_field(ValidityPeriod, "")?;
        pdu.set_field(RegisteredDelivery, 0u8)?;
        pdu.set_field(ReplaceIfPresentFlag, 0u8)?;
        pdu.set_field(DataCoding, 0u8)?;
        pdu.set_field(SmDefaultMsgId, 0u8)?;
        pdu.set_field(ShortMessage, short_message)?;
        Ok(pdu)
    }

    /// A submit_sm carrying `short_message` from `source_addr` to
    /// `destination_addr`, all other fields at their defaults.
    pub fn submit_sm(
        source_addr: &str,
        destination_addr: &str,
        short_message: &[u8],
    ) -> Result<Self, CodecError> {
        Self::short_message_pdu(CommandId::SubmitSm, source_addr, destination_addr, short_message)
    }

    /// A deliver_sm, same body layout as submit_sm.
    pub fn deliver_sm(
        source_addr: &str,
        destination_addr: &str,
        short_message: &[u8],
    ) -> Result<Self, CodecError> {
        Self::short_message_pdu(CommandId::DeliverSm, source_addr, destination_addr, short_message)
    }

    /// A deliver_sm_resp answering sequence `sequence` with `status`.
    pub fn deliver_sm_resp(sequence: u32, status: CommandStatus) -> Self {
        let mut pdu = Pdu::new(CommandId::DeliverSmResp);
        pdu.header.sequence_number = sequence;
        pdu.header.command_status = status;
        // message_id is unused in deliver_sm_resp and set to NULL
        pdu.fields.insert_raw(MessageId, FieldValue::Str(Bytes::new()));
        pdu
    }

    /// A query_sm for a previously submitted message.
    pub fn query_sm(message_id: &str, source_addr: &str) -> Result<Self, CodecError> {
        let mut pdu = Pdu::new(CommandId::QuerySm);
        pdu.set_field(MessageId, message_id)?;
        pdu.set_field(SourceAddrTon, 0u8)?;
        pdu.set_field(SourceAddrNpi, 0u8)?;
        pdu.set_field(SourceAddr, source_addr)?;
        Ok(pdu)
    }

    pub fn enquire_link() -> Self {
        Pdu::new(CommandId::EnquireLink)
    }

    pub fn enquire_link_resp(sequence: u32) -> Self {
        let mut pdu = Pdu::new(CommandId::EnquireLinkResp);
        pdu.header.sequence_number = sequence;
        pdu
    }

    pub fn unbind() -> Self {
        Pdu::new(CommandId::Unbind)
    }

    pub fn unbind_resp(sequence: u32) -> Self {
        let mut pdu = Pdu::new(CommandId::UnbindResp);
        pdu.header.sequence_number = sequence;
        pdu
    }

    /// A generic_nack with the rejection reason in command_status. Sequence
    /// 0 is used when the offending PDU's sequence could not be read.
    pub fn generic_nack(sequence: u32, status: CommandStatus) -> Self {
        let mut pdu = Pdu::new(CommandId::GenericNack);
        pdu.header.sequence_number = sequence;
        pdu.header.command_status = status;
        pdu
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::tags;

    #[test]
    fn submit_sm_roundtrip() {
        let mut original = Pdu::submit_sm("1000", "447911223344", b"hi").unwrap();
        original.set_sequence_number(9);
        original.set_tlv(Tlv::new(tags::USER_MESSAGE_REFERENCE, vec![0x00, 0x2A]));
        original.set_tlv(Tlv::new(tags::SOURCE_PORT, vec![0x1F, 0x90]));

        let bytes = original.to_bytes();
        let parsed = Pdu::parse(&bytes).unwrap();

        assert_eq!(parsed, original);
        assert_eq!(parsed.sequence_number(), 9);
        assert_eq!(parsed.short_message(), Some(&b"hi"[..]));
        assert_eq!(parsed.tlvs().len(), 2);
    }

    #[test]
    fn serialized_length_matches_prefix() {
        let pdus = [
            Pdu::submit_sm("1000", "2000", b"length check").unwrap(),
            Pdu::bind(CommandId::BindTransceiver, "user", "pass").unwrap(),
            Pdu::enquire_link(),
            Pdu::generic_nack(0, CommandStatus::InvalidCommandId),
        ];
        for pdu in &pdus {
            let bytes = pdu.to_bytes();
            let stated = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            assert_eq!(stated as usize, bytes.len());
        }
    }

    #[test]
    fn enquire_link_is_header_only() {
        let mut pdu = Pdu::enquire_link();
        pdu.set_sequence_number(3);
        let bytes = pdu.to_bytes();
        assert_eq!(
            bytes.as_ref(),
            &[
                0x00, 0x00, 0x00, 0x10, // command_length = 16
                0x00, 0x00, 0x00, 0x15, // enquire_link
                0x00, 0x00, 0x00, 0x00, // status
                0x00, 0x00, 0x00, 0x03, // sequence
            ]
        );
    }

    #[test]
    fn bind_transmitter_wire_layout() {
        let mut pdu = Pdu::bind(CommandId::BindTransmitter, "user", "pass").unwrap();
        pdu.set_sequence_number(1);
        let bytes = pdu.to_bytes();

        let mut expected = vec![];
        expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x1F]); // 16 + 15
        expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x02]);
        expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]);
        expected.extend_from_slice(b"user\0pass\0\0"); // system_id, password, system_type
        expected.extend_from_slice(&[0x34, 0x00, 0x00]); // interface_version, addr_ton, addr_npi
        expected.extend_from_slice(b"\0"); // address_range

        assert_eq!(bytes.as_ref(), expected.as_slice());
    }

    #[test]
    fn udhi_payload_split() {
        let payload = [0x05, 0x00, 0x03, 0xAA, 0x02, 0x01, b'H', b'i', b'!', b'!'];
        let mut pdu = Pdu::deliver_sm("1000", "2000", &payload).unwrap();
        pdu.set_field(FieldTag::EsmClass, 0x40u8).unwrap();

        let parsed = Pdu::parse(&pdu.to_bytes()).unwrap();
        assert_eq!(parsed.field_byte(SmLength), Some(10));
        assert_eq!(parsed.short_message(), Some(&payload[..]));
        assert_eq!(
            parsed.user_data_header(),
            Some(&[0x05, 0x00, 0x03, 0xAA, 0x02, 0x01][..])
        );
        assert_eq!(parsed.message_text(), Some(&b"Hi!!"[..]));
    }

    #[test]
    fn no_udh_without_udhi_bit() {
        let payload = [0x05, 0x00, 0x03, 0xAA, 0x02, 0x01, b'H', b'i'];
        let pdu = Pdu::deliver_sm("1000", "2000", &payload).unwrap();

        assert_eq!(pdu.user_data_header(), None);
        assert_eq!(pdu.message_text(), Some(&payload[..]));
    }

    #[test]
    fn bind_resp_with_empty_body_is_legal() {
        // An error bind response may omit system_id entirely.
        let mut data = vec![];
        data.extend_from_slice(&16u32.to_be_bytes());
        data.extend_from_slice(&0x8000_0002u32.to_be_bytes());
        data.extend_from_slice(&0x0000_000Eu32.to_be_bytes()); // invalid password
        data.extend_from_slice(&1u32.to_be_bytes());

        let pdu = Pdu::parse(&data).unwrap();
        assert_eq!(pdu.command_id(), CommandId::BindTransmitterResp);
        assert!(!pdu.ok());
        assert_eq!(pdu.field_str(SystemId), None);
    }

    #[test]
    fn unterminated_cstring_is_length_error() {
        let mut data = vec![];
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x14]); // 16 + 4 body bytes
        data.extend_from_slice(&0x8000_0004u32.to_be_bytes()); // submit_sm_resp
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(b"abcd"); // message_id without terminator

        assert!(matches!(
            Pdu::parse(&data),
            Err(CodecError::TruncatedField(MessageId))
        ));
    }

    #[test]
    fn truncated_short_message_is_length_error() {
        let mut body = BytesMut::new();
        let mut pdu = Pdu::submit_sm("1", "2", b"hello").unwrap();
        pdu.set_sequence_number(1);
        body.extend_from_slice(&pdu.to_bytes());
        // Chop two payload bytes off and restate the length.
        let truncated_len = body.len() - 2;
        body.truncate(truncated_len);
        body[0..4].copy_from_slice(&(truncated_len as u32).to_be_bytes());

        assert!(matches!(
            Pdu::parse(&body),
            Err(CodecError::TruncatedField(ShortMessage))
        ));
    }

    #[test]
    fn partial_tlv_is_length_error() {
        let mut data = BytesMut::new();
        let mut pdu = Pdu::new(CommandId::SubmitSmResp);
        pdu.set_field(MessageId, "id1").unwrap();
        pdu.set_sequence_number(4);
        data.extend_from_slice(&pdu.to_bytes());
        data.extend_from_slice(&[0x02, 0x04]); // half a TLV header
        let total = data.len() as u32;
        data[0..4].copy_from_slice(&total.to_be_bytes());

        assert!(matches!(Pdu::parse(&data), Err(CodecError::TruncatedTlv)));
    }

    #[test]
    fn stated_length_must_match_buffer() {
        let pdu = Pdu::enquire_link();
        let mut bytes = BytesMut::from(pdu.to_bytes().as_ref());
        bytes[3] = 0x11; // claim 17 bytes while holding 16

        assert!(matches!(
            Pdu::parse(&bytes),
            Err(CodecError::Length(17))
        ));
    }

    #[test]
    fn tlv_duplicate_tag_last_write_wins() {
        let mut pdu = Pdu::submit_sm("1", "2", b"x").unwrap();
        pdu.set_tlv(Tlv::new(tags::SOURCE_PORT, vec![0x00, 0x01]));
        pdu.set_tlv(Tlv::new(tags::DESTINATION_PORT, vec![0x00, 0x02]));
        pdu.set_tlv(Tlv::new(tags::SOURCE_PORT, vec![0x00, 0x03]));

        assert_eq!(pdu.tlvs().len(), 2);
        // Overwrite kept the original position.
        assert_eq!(pdu.tlvs()[0].tag, tags::SOURCE_PORT);
        assert_eq!(pdu.tlvs()[0].value.as_ref(), &[0x00, 0x03]);
    }

    #[test]
    fn ok_predicate() {
        let mut resp = Pdu::new(CommandId::SubmitSmResp);
        assert!(resp.ok());
        resp.set_status(CommandStatus::SystemError);
        assert!(!resp.ok());

        // Requests and generic_nack always pass.
        assert!(Pdu::submit_sm("1", "2", b"m").unwrap().ok());
        assert!(Pdu::generic_nack(0, CommandStatus::InvalidCommandId).ok());
    }

    #[test]
    fn query_sm_resp_fixed_width_tail() {
        let mut pdu = Pdu::new(CommandId::QuerySmResp);
        pdu.set_field(MessageId, "abc123").unwrap();
        pdu.set_field(FinalDate, "").unwrap();
        pdu.set_field(MessageState, 2u8).unwrap(); // DELIVERED
        pdu.set_field(ErrorCode, 0u8).unwrap();
        pdu.set_sequence_number(5);

        let parsed = Pdu::parse(&pdu.to_bytes()).unwrap();
        assert_eq!(parsed, pdu);
        assert_eq!(parsed.field_byte(MessageState), Some(2));
        assert_eq!(parsed.field_byte(ErrorCode), Some(0));
    }

    #[test]
    fn oversized_short_message_rejected() {
        let too_long = vec![b'a'; 255];
        let mut pdu = Pdu::new(CommandId::SubmitSm);
        assert!(matches!(
            pdu.set_field(ShortMessage, too_long),
            Err(CodecError::FieldType { field: ShortMessage, .. })
        ));
    }
}
