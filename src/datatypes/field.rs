// ABOUTME: Typed mandatory-field store shared by every PDU variant
// ABOUTME: Field tags carry their wire kind so assignments are shape-checked up front

use crate::codec::CodecError;
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;

/// Names of the mandatory fields that appear in PDU bodies. Each tag knows
/// its wire [`FieldKind`]; the per-command ordering lives in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTag {
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
    SystemId,
    Password,
    SystemType,
    InterfaceVersion,
    AddrTon,
    AddrNpi,
    AddressRange,
    MessageId,
    FinalDate,
    MessageState,
    ErrorCode,
}

/// How a mandatory field is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single octet.
    Fixed,
    /// NUL-terminated variable-length string, stored without the terminator.
    CString,
    /// The short-message payload: raw bytes whose length is carried by the
    /// preceding sm_length octet.
    Payload,
}

impl FieldTag {
    pub fn kind(self) -> FieldKind {
        use FieldTag::*;
        match self {
            SourceAddrTon | SourceAddrNpi | DestAddrTon | DestAddrNpi | EsmClass | ProtocolId
            | PriorityFlag | RegisteredDelivery | ReplaceIfPresentFlag | DataCoding
            | SmDefaultMsgId | SmLength | InterfaceVersion | AddrTon | AddrNpi | MessageState
            | ErrorCode => FieldKind::Fixed,
            ServiceType | SourceAddr | DestinationAddr | ScheduleDeliveryTime | ValidityPeriod
            | SystemId | Password | SystemType | AddressRange | MessageId | FinalDate => {
                FieldKind::CString
            }
            ShortMessage => FieldKind::Payload,
        }
    }

    /// Wire-format field name, as the specification spells it.
    pub fn name(self) -> &'static str {
        use FieldTag::*;
        match self {
            ServiceType => "service_type",
            SourceAddrTon => "source_addr_ton",
            SourceAddrNpi => "source_addr_npi",
            SourceAddr => "source_addr",
            DestAddrTon => "dest_addr_ton",
            DestAddrNpi => "dest_addr_npi",
            DestinationAddr => "destination_addr",
            EsmClass => "esm_class",
            ProtocolId => "protocol_id",
            PriorityFlag => "priority_flag",
            ScheduleDeliveryTime => "schedule_delivery_time",
            ValidityPeriod => "validity_period",
            RegisteredDelivery => "registered_delivery",
            ReplaceIfPresentFlag => "replace_if_present_flag",
            DataCoding => "data_coding",
            SmDefaultMsgId => "sm_default_msg_id",
            SmLength => "sm_length",
            ShortMessage => "short_message",
            SystemId => "system_id",
            Password => "password",
            SystemType => "system_type",
            InterfaceVersion => "interface_version",
            AddrTon => "addr_ton",
            AddrNpi => "addr_npi",
            AddressRange => "address_range",
            MessageId => "message_id",
            FinalDate => "final_date",
            MessageState => "message_state",
            ErrorCode => "error_code",
        }
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mandatory-field value: either a 1-octet integer or a byte string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Byte(u8),
    Str(Bytes),
}

impl FieldValue {
    pub fn as_byte(&self) -> Option<u8> {
        match self {
            FieldValue::Byte(b) => Some(*b),
            FieldValue::Str(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            FieldValue::Byte(_) => None,
            FieldValue::Str(s) => Some(s),
        }
    }

    /// True when this value's shape matches the field kind.
    fn matches(&self, kind: FieldKind) -> bool {
        match (self, kind) {
            (FieldValue::Byte(_), FieldKind::Fixed) => true,
            (FieldValue::Str(_), FieldKind::CString | FieldKind::Payload) => true,
            _ => false,
        }
    }
}

impl From<u8> for FieldValue {
    fn from(value: u8) -> Self {
        FieldValue::Byte(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(Bytes::from(value.into_bytes()))
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        FieldValue::Str(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Str(Bytes::from(value))
    }
}

impl From<Bytes> for FieldValue {
    fn from(value: Bytes) -> Self {
        FieldValue::Str(value)
    }
}

/// Holder for a PDU's mandatory fields, keyed by tag. Wire ordering is not
/// kept here; the registry's declared field list drives serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldStore {
    fields: HashMap<FieldTag, FieldValue>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value after checking its shape against the tag's kind.
    pub fn insert(&mut self, tag: FieldTag, value: FieldValue) -> Result<(), CodecError> {
        if !value.matches(tag.kind()) {
            return Err(CodecError::FieldType {
                field: tag,
                expected: match tag.kind() {
                    FieldKind::Fixed => "1-byte integer",
                    FieldKind::CString | FieldKind::Payload => "byte string",
                },
            });
        }
        self.fields.insert(tag, value);
        Ok(())
    }

    /// Insert without the shape check; used by the parser, which constructs
    /// values of the right shape by definition.
    pub(crate) fn insert_raw(&mut self, tag: FieldTag, value: FieldValue) {
        self.fields.insert(tag, value);
    }

    pub fn get(&self, tag: FieldTag) -> Option<&FieldValue> {
        self.fields.get(&tag)
    }

    pub fn get_byte(&self, tag: FieldTag) -> Option<u8> {
        self.fields.get(&tag).and_then(FieldValue::as_byte)
    }

    pub fn get_str(&self, tag: FieldTag) -> Option<&Bytes> {
        self.fields.get(&tag).and_then(FieldValue::as_bytes)
    }

    pub fn contains(&self, tag: FieldTag) -> bool {
        self.fields.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
