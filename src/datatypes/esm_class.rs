// ABOUTME: Decomposes the esm_class octet into messaging mode, message type and GSM features
// ABOUTME: Lossless for every byte value so parsed PDUs re-serialize bit-identically

/// The esm_class mandatory field, split into its three bit groups
/// (SMPP v3.4 Section 5.2.12):
///
/// ```text
/// bits 1..0  messaging mode
/// bits 5..2  message type
/// bits 7..6  GSM network features (UDHI / reply path)
/// ```
///
/// The decomposition is total: `EsmClass::from_byte` accepts any octet and
/// `to_byte` reassembles it exactly, including message-type patterns the
/// specification leaves reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EsmClass {
    pub mode: MessagingMode,
    /// Message type, as the raw 4-bit group. Named values live in
    /// [`message_type`].
    pub message_type: u8,
    pub features: GsmFeatures,
}

/// Messaging mode, bits 1..0 of esm_class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessagingMode {
    /// Default SMSC mode (store and forward for most SMSCs)
    #[default]
    Default = 0b00,
    /// Datagram mode
    Datagram = 0b01,
    /// Forward (transaction) mode
    Forward = 0b10,
    /// Explicit store and forward mode
    StoreAndForward = 0b11,
}

impl MessagingMode {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => MessagingMode::Default,
            0b01 => MessagingMode::Datagram,
            0b10 => MessagingMode::Forward,
            _ => MessagingMode::StoreAndForward,
        }
    }
}

/// GSM network features, bits 7..6 of esm_class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GsmFeatures {
    /// No specific features selected
    #[default]
    None = 0b00,
    /// UDHI: the short message starts with a user data header
    Udhi = 0b01,
    /// Reply path set
    ReplyPath = 0b10,
    /// Both UDHI and reply path
    UdhiReplyPath = 0b11,
}

impl GsmFeatures {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => GsmFeatures::None,
            0b01 => GsmFeatures::Udhi,
            0b10 => GsmFeatures::ReplyPath,
            _ => GsmFeatures::UdhiReplyPath,
        }
    }

    /// True when the user-data-header-indicator bit is set.
    pub fn has_udhi(self) -> bool {
        matches!(self, GsmFeatures::Udhi | GsmFeatures::UdhiReplyPath)
    }
}

/// Named message-type values (the 4-bit group), Section 5.2.12. Patterns not
/// listed here are reserved but still representable.
pub mod message_type {
    /// Default message type
    pub const DEFAULT: u8 = 0b0000;
    /// Short message contains an SMSC delivery receipt (deliver_sm)
    pub const DELIVERY_RECEIPT: u8 = 0b0001;
    /// Short message contains an ESME delivery acknowledgement
    pub const DELIVERY_ACK: u8 = 0b0010;
    /// Short message contains a manual/user acknowledgement
    pub const MANUAL_USER_ACK: u8 = 0b0100;
    /// Short message contains a conversation abort (Korean CDMA)
    pub const CONVERSATION_ABORT: u8 = 0b0110;
    /// Short message contains an intermediate delivery notification
    pub const INTERMEDIATE_DELIVERY_NOTIFICATION: u8 = 0b1000;
}

impl EsmClass {
    pub fn new(mode: MessagingMode, message_type: u8, features: GsmFeatures) -> Self {
        Self {
            mode,
            message_type: message_type & 0x0F,
            features,
        }
    }

    /// Split a raw esm_class octet into its three groups.
    pub fn from_byte(value: u8) -> Self {
        Self {
            mode: MessagingMode::from_bits(value),
            message_type: (value >> 2) & 0x0F,
            features: GsmFeatures::from_bits(value >> 6),
        }
    }

    /// Reassemble the wire octet.
    pub fn to_byte(self) -> u8 {
        (self.mode as u8) | ((self.message_type & 0x0F) << 2) | ((self.features as u8) << 6)
    }

    /// True when the short message carries a user data header.
    pub fn has_udhi(self) -> bool {
        self.features.has_udhi()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposition_is_lossless_for_every_byte() {
        for value in 0u8..=255 {
            assert_eq!(EsmClass::from_byte(value).to_byte(), value);
        }
    }

    #[test]
    fn udhi_bit() {
        let esm = EsmClass::from_byte(0x40);
        assert_eq!(esm.mode, MessagingMode::Default);
        assert_eq!(esm.message_type, message_type::DEFAULT);
        assert_eq!(esm.features, GsmFeatures::Udhi);
        assert!(esm.has_udhi());

        assert!(!EsmClass::from_byte(0x00).has_udhi());
        assert!(EsmClass::from_byte(0xC0).has_udhi()); // UDHI + reply path
    }

    #[test]
    fn group_extraction() {
        // datagram mode, delivery receipt, reply path
        let value = 0b10_0001_01u8;
        let esm = EsmClass::from_byte(value);
        assert_eq!(esm.mode, MessagingMode::Datagram);
        assert_eq!(esm.message_type, message_type::DELIVERY_RECEIPT);
        assert_eq!(esm.features, GsmFeatures::ReplyPath);
        assert_eq!(esm.to_byte(), value);
    }

    #[test]
    fn constructor_masks_message_type() {
        let esm = EsmClass::new(MessagingMode::Default, 0xFF, GsmFeatures::None);
        assert_eq!(esm.message_type, 0x0F);
    }
}
