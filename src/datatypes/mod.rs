mod command_id;
mod command_status;
mod esm_class;
mod field;
mod tlv;

pub use command_id::CommandId;
pub use command_status::CommandStatus;
pub use esm_class::{message_type, EsmClass, GsmFeatures, MessagingMode};
pub use field::{FieldKind, FieldStore, FieldTag, FieldValue};
pub use tlv::{tags, Tlv};
