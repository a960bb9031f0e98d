// ABOUTME: Defines SMPP v3.4 command identifiers per specification Table 4-1
// ABOUTME: Covers the client-session PDU set; unknown ids fail decode for nack dispatch

use num_enum::TryFromPrimitive;

/// SMPP v3.4 Command Identifiers (Table 4-1), restricted to the PDU family a
/// bound ESME session exchanges.
///
/// ## Command ID structure
/// - **Bit 31 (MSB)**: response indicator (0 = request, 1 = response)
/// - **Bits 30-0**: command type
///
/// Anything outside this set (reserved ranges, vendor extensions, v5.0
/// operations) fails conversion; the session answers such PDUs with a
/// generic_nack carrying `ESME_RINVCMDID`.
#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandId {
    /// generic_nack PDU (Section 4.3.1) - error response for invalid PDUs
    GenericNack = 0x8000_0000,

    /// bind_receiver PDU (Section 4.1.1) - bind as message receiver
    BindReceiver = 0x0000_0001,
    /// bind_receiver_resp PDU (Section 4.1.2)
    BindReceiverResp = 0x8000_0001,
    /// bind_transmitter PDU (Section 4.1.1) - bind as message transmitter
    BindTransmitter = 0x0000_0002,
    /// bind_transmitter_resp PDU (Section 4.1.2)
    BindTransmitterResp = 0x8000_0002,

    /// query_sm PDU (Section 4.8.1) - query message status
    QuerySm = 0x0000_0003,
    /// query_sm_resp PDU (Section 4.8.2)
    QuerySmResp = 0x8000_0003,

    /// submit_sm PDU (Section 4.4.1) - submit short message
    SubmitSm = 0x0000_0004,
    /// submit_sm_resp PDU (Section 4.4.2)
    SubmitSmResp = 0x8000_0004,

    /// deliver_sm PDU (Section 4.6.1) - deliver message to the ESME
    DeliverSm = 0x0000_0005,
    /// deliver_sm_resp PDU (Section 4.6.2)
    DeliverSmResp = 0x8000_0005,

    /// unbind PDU (Section 4.2.1) - release the session
    Unbind = 0x0000_0006,
    /// unbind_resp PDU (Section 4.2.2)
    UnbindResp = 0x8000_0006,

    /// bind_transceiver PDU (Section 4.2.5) - bind as transceiver (TX+RX)
    BindTransceiver = 0x0000_0009,
    /// bind_transceiver_resp PDU (Section 4.2.6)
    BindTransceiverResp = 0x8000_0009,

    /// enquire_link PDU (Section 4.11.1) - link verification request
    EnquireLink = 0x0000_0015,
    /// enquire_link_resp PDU (Section 4.11.2)
    EnquireLinkResp = 0x8000_0015,
}

impl CommandId {
    /// True if this command_id names a response PDU (bit 31 set).
    pub fn is_response(self) -> bool {
        (self as u32) & 0x8000_0000 != 0
    }

    /// The response id paired with this request, or `None` for responses
    /// and for generic_nack (which has no request form).
    pub fn response(self) -> Option<CommandId> {
        match self {
            CommandId::BindReceiver => Some(CommandId::BindReceiverResp),
            CommandId::BindTransmitter => Some(CommandId::BindTransmitterResp),
            CommandId::BindTransceiver => Some(CommandId::BindTransceiverResp),
            CommandId::QuerySm => Some(CommandId::QuerySmResp),
            CommandId::SubmitSm => Some(CommandId::SubmitSmResp),
            CommandId::DeliverSm => Some(CommandId::DeliverSmResp),
            CommandId::Unbind => Some(CommandId::UnbindResp),
            CommandId::EnquireLink => Some(CommandId::EnquireLinkResp),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_id_wire_values() {
        assert_eq!(CommandId::BindTransmitter as u32, 0x0000_0002);
        assert_eq!(CommandId::SubmitSm as u32, 0x0000_0004);
        assert_eq!(CommandId::EnquireLink as u32, 0x0000_0015);
        assert_eq!(CommandId::GenericNack as u32, 0x8000_0000);
        assert_eq!(CommandId::BindTransceiverResp as u32, 0x8000_0009);
    }

    #[test]
    fn command_id_is_response() {
        assert!(!CommandId::EnquireLink.is_response());
        assert!(CommandId::EnquireLinkResp.is_response());
        assert!(!CommandId::SubmitSm.is_response());
        assert!(CommandId::SubmitSmResp.is_response());
        assert!(CommandId::GenericNack.is_response());
    }

    #[test]
    fn unknown_id_rejected() {
        assert!(CommandId::try_from(0x0000_000Au32).is_err()); // reserved
        assert!(CommandId::try_from(0xDEADBEEFu32).is_err());
    }

    #[test]
    fn request_response_pairing() {
        assert_eq!(
            CommandId::BindTransceiver.response(),
            Some(CommandId::BindTransceiverResp)
        );
        assert_eq!(CommandId::SubmitSmResp.response(), None);
        assert_eq!(CommandId::GenericNack.response(), None);
    }
}
