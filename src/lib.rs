//! SMPP v3.4 client (ESME) core: a bidirectional PDU codec and the
//! bound-session state machine that multiplexes one TCP connection between
//! application requests, unsolicited peer messages, keep-alive probing and
//! orderly teardown.
//!
//! The crate is organized the way the protocol is layered:
//!
//! * [`codec`] - big-endian primitives and the fixed 16-byte PDU header
//! * [`datatypes`] - command ids, statuses, the esm_class decomposition,
//!   the typed mandatory-field store and TLVs
//! * [`pdu`] - the per-command field registry and the generic [`Pdu`] value
//! * [`connection`] - length-prefixed framing over a byte stream
//! * [`session`] - role-bound sessions (transmitter / receiver /
//!   transceiver) with bind handshake, admission filtering, automatic
//!   replies and the enquire-link liveness supervisor
//!
//! # Example
//!
//! ```rust,no_run
//! use smpp_esme::datatypes::FieldTag;
//! use smpp_esme::session::{Params, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let params = Params::new()
//!         .field(FieldTag::SystemId, "user")
//!         .field(FieldTag::Password, "pass");
//!
//!     // Connect and bind as a transmitter; enquire_link every 30s.
//!     let session = Session::transmitter("localhost", 2775, 30, params).await?;
//!
//!     let sequence = session
//!         .submit_sm("1000", "447911223344", b"Hello!", &Params::new())
//!         .await?;
//!
//!     // Responses are correlated by sequence number.
//!     let resp = session.read().await?;
//!     assert_eq!(resp.sequence_number(), sequence);
//!
//!     session.close().await;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod connection;
pub mod datatypes;
pub mod pdu;
pub mod session;


pub use codec::{CodecError, PduHeader, MAX_PDU_SIZE};
pub use pdu::Pdu;
pub use session::{BindRole, Params, Session, SmppError, SmppResult};
