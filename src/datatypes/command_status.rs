use num_enum::{FromPrimitive, IntoPrimitive};
use std::fmt;

/// The command_status field of an SMPP response indicates the success or
/// failure of the request it answers. It is meaningful only on responses and
/// is zero on requests (generic_nack being the exception: its status carries
/// the reason the offending PDU was rejected).
///
/// Codes follow SMPP v3.4 Section 5.1.3. Values outside the table (vendor
/// specific and reserved ranges) are preserved through the catch-all variant
/// rather than failing the parse, since an SMSC may legally emit them.
#[derive(FromPrimitive, IntoPrimitive)]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandStatus {
    /// No error (ESME_ROK)
    Ok = 0x00000000,
    /// Message length is invalid
    InvalidMsgLength = 0x00000001,
    /// Command length is invalid
    InvalidCommandLength = 0x00000002,
    /// Invalid command id
    InvalidCommandId = 0x00000003,
    /// Incorrect BIND status for given command
    IncorrectBindStatus = 0x00000004,
    /// ESME already in bound state
    AlreadyBound = 0x00000005,
    /// Invalid priority flag
    InvalidPriorityFlag = 0x00000006,
    /// Invalid registered delivery flag
    InvalidRegisteredDeliveryFlag = 0x00000007,
    /// System error
    SystemError = 0x00000008,
    /// Invalid source address
    InvalidSourceAddress = 0x0000000A,
    /// Invalid destination address
    InvalidDestinationAddress = 0x0000000B,
    /// Message ID is invalid
    InvalidMessageId = 0x0000000C,
    /// Bind failed
    BindFailed = 0x0000000D,
    /// Invalid password
    InvalidPassword = 0x0000000E,
    /// Invalid system id
    InvalidSystemId = 0x0000000F,
    /// cancel_sm failed
    CancelSmFailed = 0x00000011,
    /// replace_sm failed
    ReplaceSmFailed = 0x00000013,
    /// Message queue full
    MessageQueueFull = 0x00000014,
    /// Invalid service type
    InvalidServiceType = 0x00000015,
    /// Invalid number of destinations
    InvalidNumberOfDestinations = 0x00000033,
    /// Invalid distribution list name
    InvalidDistributionListName = 0x00000034,
    /// Invalid destination flag
    InvalidDestinationFlag = 0x00000040,
    /// Invalid 'submit with replace' request
    InvalidSubmitWithReplaceRequest = 0x00000042,
    /// Invalid esm_class field data
    InvalidEsmClass = 0x00000043,
    /// Cannot submit to distribution list
    CannotSubmitToDistributionList = 0x00000044,
    /// submit_sm or submit_multi failed
    SubmitFailed = 0x00000045,
    /// Invalid source address TON
    InvalidSourceAddressTon = 0x00000048,
    /// Invalid source address NPI
    InvalidSourceAddressNpi = 0x00000049,
    /// Invalid destination address TON
    InvalidDestinationAddressTon = 0x00000050,
    /// Invalid destination address NPI
    InvalidDestinationAddressNpi = 0x00000051,
    /// Invalid system_type field
    InvalidSystemType = 0x00000053,
    /// Invalid replace_if_present flag
    InvalidReplaceIfPresentFlag = 0x00000054,
    /// Invalid number of messages
    InvalidNumberOfMessages = 0x00000055,
    /// Throttling error (ESME has exceeded allowed message limits)
    ThrottlingError = 0x00000058,
    /// Invalid scheduled delivery time
    InvalidScheduledDeliveryTime = 0x00000061,
    /// Invalid message validity period
    InvalidExpiryTime = 0x00000062,
    /// Predefined message invalid or not found
    InvalidPredefinedMessageId = 0x00000063,
    /// ESME receiver temporary app error code
    ReceiverTemporaryAppError = 0x00000064,
    /// ESME receiver permanent app error code
    ReceiverPermanentAppError = 0x00000065,
    /// ESME receiver reject message error code
    ReceiverRejectMessageError = 0x00000066,
    /// query_sm request failed
    QuerySmRequestFailed = 0x00000067,
    /// Error in the optional part of the PDU body
    ErrorInOptionalPduBody = 0x000000C0,
    /// Optional parameter not allowed
    OptionalParameterNotAllowed = 0x000000C1,
    /// Invalid parameter length
    InvalidParameterLength = 0x000000C2,
    /// Expected optional parameter missing
    ExpectedOptionalParameterMissing = 0x000000C3,
    /// Invalid optional parameter value
    InvalidOptionalParameterValue = 0x000000C4,
    /// Delivery failure (used for data_sm_resp)
    DeliveryFailed = 0x000000FE,
    /// Unknown error
    UnknownError = 0x000000FF,

    /// Any code not in the v3.4 table (vendor specific or reserved).
    #[num_enum(catch_all)]
    Other(u32),
}

impl CommandStatus {
    /// Raw 32-bit wire value.
    pub fn to_u32(self) -> u32 {
        self.into()
    }

    /// Human-readable description, per the v3.4 error code table. This is
    /// what a bind-auth failure surfaces to the application.
    pub fn description(self) -> &'static str {
        match self {
            CommandStatus::Ok => "No Error",
            CommandStatus::InvalidMsgLength => "Message Length is invalid",
            CommandStatus::InvalidCommandLength => "Command Length is invalid",
            CommandStatus::InvalidCommandId => "Invalid Command ID",
            CommandStatus::IncorrectBindStatus => "Incorrect BIND Status for given command",
            CommandStatus::AlreadyBound => "ESME Already in Bound State",
            CommandStatus::InvalidPriorityFlag => "Invalid Priority Flag",
            CommandStatus::InvalidRegisteredDeliveryFlag => "Invalid Registered Delivery Flag",
            CommandStatus::SystemError => "System Error",
            CommandStatus::InvalidSourceAddress => "Invalid Source Address",
            CommandStatus::InvalidDestinationAddress => "Invalid Dest Addr",
            CommandStatus::InvalidMessageId => "Message ID is invalid",
            CommandStatus::BindFailed => "Bind Failed",
            CommandStatus::InvalidPassword => "Invalid Password",
            CommandStatus::InvalidSystemId => "Invalid System ID",
            CommandStatus::CancelSmFailed => "Cancel SM Failed",
            CommandStatus::ReplaceSmFailed => "Replace SM Failed",
            CommandStatus::MessageQueueFull => "Message Queue Full",
            CommandStatus::InvalidServiceType => "Invalid Service Type",
            CommandStatus::InvalidNumberOfDestinations => "Invalid number of destinations",
            CommandStatus::InvalidDistributionListName => "Invalid Distribution List name",
            CommandStatus::InvalidDestinationFlag => "Destination flag is invalid",
            CommandStatus::InvalidSubmitWithReplaceRequest => {
                "Invalid 'submit with replace' request"
            }
            CommandStatus::InvalidEsmClass => "Invalid esm_class field data",
            CommandStatus::CannotSubmitToDistributionList => {
                "Cannot Submit to Distribution List"
            }
            CommandStatus::SubmitFailed => "submit_sm or submit_multi failed",
            CommandStatus::InvalidSourceAddressTon => "Invalid Source address TON",
            CommandStatus::InvalidSourceAddressNpi => "Invalid Source address NPI",
            CommandStatus::InvalidDestinationAddressTon => "Invalid Dest Addr TON",
            CommandStatus::InvalidDestinationAddressNpi => "Invalid Dest Addr NPI",
            CommandStatus::InvalidSystemType => "Invalid system_type field",
            CommandStatus::InvalidReplaceIfPresentFlag => "Invalid replace_if_present flag",
            CommandStatus::InvalidNumberOfMessages => "Invalid number of messages",
            CommandStatus::ThrottlingError => "Throttling error (ESME has exceeded allowed message limits)",
            CommandStatus::InvalidScheduledDeliveryTime => "Invalid Scheduled Delivery Time",
            CommandStatus::InvalidExpiryTime => "Invalid message validity period (Expiry time)",
            CommandStatus::InvalidPredefinedMessageId => "Predefined Message Invalid or Not Found",
            CommandStatus::ReceiverTemporaryAppError => "ESME Receiver Temporary App Error Code",
            CommandStatus::ReceiverPermanentAppError => "ESME Receiver Permanent App Error Code",
            CommandStatus::ReceiverRejectMessageError => "ESME Receiver Reject Message Error Code",
            CommandStatus::QuerySmRequestFailed => "query_sm request failed",
            CommandStatus::ErrorInOptionalPduBody => "Error in the optional part of the PDU Body",
            CommandStatus::OptionalParameterNotAllowed => "Optional Parameter not allowed",
            CommandStatus::InvalidParameterLength => "Invalid Parameter Length",
            CommandStatus::ExpectedOptionalParameterMissing => {
                "Expected Optional Parameter missing"
            }
            CommandStatus::InvalidOptionalParameterValue => "Invalid Optional Parameter Value",
            CommandStatus::DeliveryFailed => "Delivery Failure (used for data_sm_resp)",
            CommandStatus::UnknownError => "Unknown Error",
            CommandStatus::Other(_) => "Vendor specific or reserved error code",
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandStatus::Other(code) => {
                write!(f, "{} ({code:#010x})", self.description())
            }
            _ => write!(f, "{} ({:#010x})", self.description(), self.to_u32()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_roundtrip() {
        assert_eq!(CommandStatus::from(0u32), CommandStatus::Ok);
        assert_eq!(CommandStatus::from(2u32), CommandStatus::InvalidCommandLength);
        assert_eq!(CommandStatus::from(3u32), CommandStatus::InvalidCommandId);
        assert_eq!(CommandStatus::InvalidCommandId.to_u32(), 3);
    }

    #[test]
    fn vendor_codes_survive() {
        let status = CommandStatus::from(0x0000_0400u32);
        assert_eq!(status, CommandStatus::Other(0x0000_0400));
        assert_eq!(status.to_u32(), 0x0000_0400);
    }

    #[test]
    fn description_for_auth_failures() {
        assert_eq!(CommandStatus::InvalidPassword.description(), "Invalid Password");
        assert_eq!(CommandStatus::BindFailed.description(), "Bind Failed");
    }
}
