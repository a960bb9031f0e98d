// ABOUTME: Session-level error taxonomy for bind, liveness and role admission failures
// ABOUTME: Codec errors fold in; background-task failures surface via the session's last-error slot

use crate::codec::CodecError;
use crate::datatypes::{CommandId, CommandStatus, FieldTag};
use crate::session::BindRole;
use std::io;
use thiserror::Error;

/// Errors surfaced by session operations.
///
/// Failures raised inside the background tasks (the liveness supervisor and
/// the bind watchdog) cannot be returned to a caller directly; they are
/// stored in the session's last-error slot and the session is closed, which
/// makes any blocked read or write fail with [`SmppError::Closed`]. The
/// application then reads `last_error()` for the cause.
#[derive(Debug, Error)]
pub enum SmppError {
    /// Malformed or unrecognizable PDU (length, command id, field shape).
    #[error(transparent)]
    Codec(CodecError),

    /// The bind handshake got the wrong response PDU, or timed out.
    #[error("bind failed: no matching bind response")]
    BindResp,

    /// The bind response carried a non-OK status.
    #[error("bind auth failed: {0}")]
    BindAuth(CommandStatus),

    /// The liveness supervisor could not write an enquire_link.
    #[error("failed to write enquire_link")]
    EnquireLinkWrite,

    /// No enquire_link_resp arrived within the response window.
    #[error("timeout waiting for enquire_link_resp")]
    EnquireLinkTimeout,

    /// A well-formed PDU that this session's role may not exchange.
    #[error("PDU {pdu:?} not admissible on a {role:?} session")]
    Pdu { role: BindRole, pdu: CommandId },

    /// A required bind parameter was not supplied.
    #[error("required bind parameter {0} missing")]
    MissingParameter(FieldTag),

    /// The session has been closed; consult `last_error()` for the reason.
    #[error("session closed")]
    Closed,

    /// Underlying transport failure.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized `Result` type for session operations.
pub type SmppResult<T> = Result<T, SmppError>;

impl From<CodecError> for SmppError {
    fn from(err: CodecError) -> Self {
        match err {
            // Transport failures keep their own kind even when raised by
            // the framing layer.
            CodecError::Io(io_err) => SmppError::Io(io_err),
            other => SmppError::Codec(other),
        }
    }
}
