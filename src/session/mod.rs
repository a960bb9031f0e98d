// ABOUTME: Bound-session state machine multiplexing one TCP connection between
// ABOUTME: application traffic, keep-alive probing, automatic replies and teardown

//! SMPP v3.4 client sessions.
//!
//! A [`Session`] is created in two phases: the transport connection is
//! established, then the bind handshake runs for one of the three roles
//! (transmitter, receiver, transceiver). Once bound, three concurrent
//! activities share the connection as cooperative tokio tasks:
//!
//! * application-driven writes (`submit_sm`, `query_sm`, ...),
//! * the application's blocking [`Session::read`] loop,
//! * the liveness supervisor spawned per session.
//!
//! The write half of the socket sits behind a mutex, so writes appear on
//! the wire in serialization order; reads have a single consumer. The
//! supervisor and the bind watchdog never touch session fields directly:
//! the read path posts events over a channel, and fatal background errors
//! land in the last-error slot before the session closes itself.

mod error;
mod liveness;
mod sequence;

pub use error::{SmppError, SmppResult};
pub use sequence::SequenceGenerator;

use crate::connection::{self, FrameReader, FrameWriter};
use crate::datatypes::{CommandId, CommandStatus, FieldTag, FieldValue, Tlv};
use crate::pdu::{mandatory_fields, Pdu};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::time;
use tracing::{debug, warn};

/// How long the bind handshake may wait for its response.
pub const BIND_TIMEOUT: Duration = Duration::from_secs(5);

/// Floor for the enquire-link interval; configured values below this clamp
/// up to it.
pub const MIN_ENQUIRE_LINK_SECS: u16 = 10;

/// The role a session bound as, which decides the PDU admission matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindRole {
    Transmitter,
    Receiver,
    Transceiver,
}

impl BindRole {
    fn bind_command(self) -> CommandId {
        match self {
            BindRole::Transmitter => CommandId::BindTransmitter,
            BindRole::Receiver => CommandId::BindReceiver,
            BindRole::Transceiver => CommandId::BindTransceiver,
        }
    }

    fn bind_response(self) -> CommandId {
        match self {
            BindRole::Transmitter => CommandId::BindTransmitterResp,
            BindRole::Receiver => CommandId::BindReceiverResp,
            BindRole::Transceiver => CommandId::BindTransceiverResp,
        }
    }

    /// Inbound PDUs delivered to the application, beyond the housekeeping
    /// set the session answers itself.
    fn admits(self, id: CommandId) -> bool {
        match id {
            CommandId::SubmitSmResp | CommandId::QuerySmResp => {
                matches!(self, BindRole::Transmitter | BindRole::Transceiver)
            }
            CommandId::DeliverSm => {
                matches!(self, BindRole::Receiver | BindRole::Transceiver)
            }
            _ => false,
        }
    }

    /// Outbound operations this role may originate.
    fn may_send(self, id: CommandId) -> bool {
        match id {
            CommandId::SubmitSm | CommandId::QuerySm => {
                matches!(self, BindRole::Transmitter | BindRole::Transceiver)
            }
            CommandId::DeliverSm | CommandId::DeliverSmResp => {
                matches!(self, BindRole::Receiver | BindRole::Transceiver)
            }
            _ => true,
        }
    }
}

/// Optional field overrides and TLVs for bind and message operations.
///
/// Entries apply in insertion order; an entry whose tag is not in the
/// target PDU's mandatory-field list is ignored, so one parameter set can
/// serve several operations. Values are shape-checked on application.
#[derive(Debug, Clone, Default)]
pub struct Params {
    fields: Vec<(FieldTag, FieldValue)>,
    tlvs: Vec<Tlv>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mandatory-field override.
    pub fn field(mut self, tag: FieldTag, value: impl Into<FieldValue>) -> Self {
        self.fields.push((tag, value.into()));
        self
    }

    /// Add an optional TLV parameter.
    pub fn tlv(mut self, tlv: Tlv) -> Self {
        self.tlvs.push(tlv);
        self
    }

    fn has_field(&self, tag: FieldTag) -> bool {
        self.fields.iter().any(|(t, _)| *t == tag)
    }

    fn apply_to(&self, pdu: &mut Pdu) -> SmppResult<()> {
        let declared = mandatory_fields(pdu.command_id());
        for (tag, value) in &self.fields {
            if declared.contains(tag) {
                pdu.set_field(*tag, value.clone())?;
            }
        }
        for tlv in &self.tlvs {
            pdu.set_tlv(tlv.clone());
        }
        Ok(())
    }
}

/// Shared session state. Public operations live on [`Session`]; the
/// liveness supervisor and the bind watchdog hold their own `Arc` to this.
pub(crate) struct Inner {
    role: BindRole,
    reader: Mutex<FrameReader>,
    writer: Mutex<FrameWriter>,
    bound: AtomicBool,
    pub(crate) closed: AtomicBool,
    pub(crate) sequence: SequenceGenerator,
    last_error: std::sync::Mutex<Option<Arc<SmppError>>>,
    shutdown: watch::Sender<bool>,
    resp_tx: mpsc::UnboundedSender<()>,
}

impl Inner {
    /// Serialize and write one PDU. The writer mutex is the write-ordering
    /// primitive: whoever acquires it first hits the wire first.
    pub(crate) async fn write(&self, pdu: &Pdu) -> SmppResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SmppError::Closed);
        }
        let mut writer = self.writer.lock().await;
        writer.write_pdu(pdu).await?;
        Ok(())
    }

    /// Record the first fatal error; later ones lose the race and are
    /// dropped, since only the original cause matters to the application.
    fn record_error(&self, err: SmppError) {
        let mut slot = self.last_error.lock().expect("last-error mutex poisoned");
        if slot.is_none() {
            *slot = Some(Arc::new(err));
        }
    }

    pub(crate) async fn fail(&self, err: SmppError) {
        self.record_error(err);
        self.close().await;
    }

    /// Idempotent teardown: stop the timers, unbind if still bound (best
    /// effort), close the transport. Safe to call from the supervisor, the
    /// bind watchdog, or the application; the atomic swap makes the second
    /// and later calls no-ops.
    pub(crate) async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        // Stops both liveness timers and the bind watchdog, and unblocks
        // any in-flight read.
        let _ = self.shutdown.send(true);

        let mut writer = self.writer.lock().await;
        if self.bound.swap(false, Ordering::SeqCst) {
            let mut pdu = Pdu::unbind();
            pdu.set_sequence_number(self.sequence.next());
            if let Err(err) = writer.write_pdu(&pdu).await {
                debug!(error = %err, "best-effort unbind failed during close");
            }
        }
        let _ = writer.shutdown().await;
    }
}

async fn bind_watchdog(inner: Arc<Inner>, mut shutdown: watch::Receiver<bool>) {
    tokio::select! {
        _ = time::sleep(BIND_TIMEOUT) => {
            if !inner.bound.load(Ordering::SeqCst) {
                warn!("no bind response within {BIND_TIMEOUT:?}, closing session");
                inner.fail(SmppError::BindResp).await;
            }
        }
        _ = shutdown.changed() => {}
    }
}

/// A bound SMPP session. Cheap to clone; clones share the connection, so
/// one task can sit in [`Session::read`] while others write.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Connect to `host:port` and bind as a transmitter.
    pub async fn transmitter(
        host: &str,
        port: u16,
        eli_seconds: u16,
        params: Params,
    ) -> SmppResult<Session> {
        let stream = TcpStream::connect((host, port)).await?;
        Self::establish(BindRole::Transmitter, stream, eli_seconds, params).await
    }

    /// Connect to `host:port` and bind as a receiver.
    pub async fn receiver(
        host: &str,
        port: u16,
        eli_seconds: u16,
        params: Params,
    ) -> SmppResult<Session> {
        let stream = TcpStream::connect((host, port)).await?;
        Self::establish(BindRole::Receiver, stream, eli_seconds, params).await
    }

    /// Connect to `host:port` and bind as a transceiver.
    pub async fn transceiver(
        host: &str,
        port: u16,
        eli_seconds: u16,
        params: Params,
    ) -> SmppResult<Session> {
        let stream = TcpStream::connect((host, port)).await?;
        Self::establish(BindRole::Transceiver, stream, eli_seconds, params).await
    }

    /// Bind as a transmitter over an already-connected transport.
    pub async fn transmitter_with<S>(io: S, eli_seconds: u16, params: Params) -> SmppResult<Session>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        Self::establish(BindRole::Transmitter, io, eli_seconds, params).await
    }

    /// Bind as a receiver over an already-connected transport.
    pub async fn receiver_with<S>(io: S, eli_seconds: u16, params: Params) -> SmppResult<Session>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        Self::establish(BindRole::Receiver, io, eli_seconds, params).await
    }

    /// Bind as a transceiver over an already-connected transport.
    pub async fn transceiver_with<S>(io: S, eli_seconds: u16, params: Params) -> SmppResult<Session>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        Self::establish(BindRole::Transceiver, io, eli_seconds, params).await
    }

    async fn establish<S>(
        role: BindRole,
        io: S,
        eli_seconds: u16,
        params: Params,
    ) -> SmppResult<Session>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let eli = Duration::from_secs(u64::from(eli_seconds.max(MIN_ENQUIRE_LINK_SECS)));
        let (reader, writer) = connection::split(io);
        let (shutdown, _) = watch::channel(false);
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        let inner = Arc::new(Inner {
            role,
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            bound: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            sequence: SequenceGenerator::new(),
            last_error: std::sync::Mutex::new(None),
            shutdown,
            resp_tx,
        });
        let session = Session { inner };

        if let Err(err) = session.bind(&params).await {
            session.inner.close().await;
            // If the watchdog fired first, the read unblocked with Closed;
            // the stored cause is the real one.
            let timed_out = matches!(err, SmppError::Closed)
                && matches!(session.last_error().as_deref(), Some(SmppError::BindResp));
            return Err(if timed_out { SmppError::BindResp } else { err });
        }

        tokio::spawn(liveness::run(
            Arc::clone(&session.inner),
            eli,
            resp_rx,
            session.inner.shutdown.subscribe(),
        ));

        Ok(session)
    }

    /// Perform the bind handshake for this session's role.
    async fn bind(&self, params: &Params) -> SmppResult<()> {
        for required in [FieldTag::SystemId, FieldTag::Password] {
            if !params.has_field(required) {
                return Err(SmppError::MissingParameter(required));
            }
        }

        let mut pdu = Pdu::bind(self.inner.role.bind_command(), "", "")?;
        params.apply_to(&mut pdu)?;
        pdu.set_sequence_number(self.inner.sequence.next());
        self.inner.write(&pdu).await?;

        // Force-close the session if no bind response lands in time.
        tokio::spawn(bind_watchdog(
            Arc::clone(&self.inner),
            self.inner.shutdown.subscribe(),
        ));

        let resp = self.read_raw().await?;
        if resp.command_id() != self.inner.role.bind_response() {
            return Err(SmppError::BindResp);
        }
        if !resp.ok() {
            return Err(SmppError::BindAuth(resp.command_status()));
        }

        self.inner.bound.store(true, Ordering::SeqCst);
        debug!(role = ?self.inner.role, "session bound");
        Ok(())
    }

    /// Read the next PDU addressed to the application.
    ///
    /// Housekeeping traffic is handled in place: enquire_link gets an
    /// automatic response, enquire_link_resp feeds the liveness watchdog,
    /// and both are consumed without surfacing. An unbind from the peer is
    /// answered, tears the session down, and is returned so the caller
    /// observes why the session ended. A PDU the session's role does not
    /// admit fails with [`SmppError::Pdu`] and leaves the session bound.
    pub async fn read(&self) -> SmppResult<Pdu> {
        loop {
            let pdu = self.read_raw().await?;
            match pdu.command_id() {
                CommandId::EnquireLink => {
                    debug!(sequence = pdu.sequence_number(), "answering enquire_link");
                    self.inner
                        .write(&Pdu::enquire_link_resp(pdu.sequence_number()))
                        .await?;
                }
                CommandId::EnquireLinkResp => {
                    let _ = self.inner.resp_tx.send(());
                }
                CommandId::Unbind => {
                    debug!(sequence = pdu.sequence_number(), "peer unbind, closing session");
                    let resp = Pdu::unbind_resp(pdu.sequence_number());
                    if let Err(err) = self.inner.write(&resp).await {
                        debug!(error = %err, "failed to answer unbind");
                    }
                    self.inner.bound.store(false, Ordering::SeqCst);
                    self.inner.close().await;
                    return Ok(pdu);
                }
                id if self.inner.role.admits(id) => return Ok(pdu),
                id => {
                    return Err(SmppError::Pdu {
                        role: self.inner.role,
                        pdu: id,
                    })
                }
            }
        }
    }

    /// Read one PDU without admission filtering. Malformed input triggers
    /// the best-effort generic_nack before the error surfaces; `close()`
    /// from any task unblocks this with [`SmppError::Closed`].
    async fn read_raw(&self) -> SmppResult<Pdu> {
        let mut reader = self.inner.reader.lock().await;
        let mut shutdown = self.inner.shutdown.subscribe();
        if *shutdown.borrow() {
            return Err(SmppError::Closed);
        }

        let result = tokio::select! {
            result = reader.read_pdu() => result,
            _ = shutdown.changed() => return Err(SmppError::Closed),
        };

        match result {
            Ok(Some(pdu)) => Ok(pdu),
            Ok(None) => Err(SmppError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed by peer",
            ))),
            Err(codec_err) => {
                let err = SmppError::from(codec_err);
                if let SmppError::Codec(cause) = &err {
                    // Sequence 0: the offender's sequence may not be readable.
                    warn!(error = %cause, "malformed inbound PDU, sending generic_nack");
                    let nack = Pdu::generic_nack(0, cause.nack_status());
                    if let Err(nack_err) = self.inner.write(&nack).await {
                        debug!(error = %nack_err, "failed to send generic_nack");
                    }
                }
                Err(err)
            }
        }
    }

    /// Submit a short message. Transmitter and transceiver sessions only.
    /// Returns the assigned sequence number for response correlation.
    pub async fn submit_sm(
        &self,
        source_addr: &str,
        destination_addr: &str,
        short_message: &[u8],
        params: &Params,
    ) -> SmppResult<u32> {
        self.ensure_may_send(CommandId::SubmitSm)?;
        let mut pdu = Pdu::submit_sm(source_addr, destination_addr, short_message)?;
        params.apply_to(&mut pdu)?;
        self.send_request(pdu).await
    }

    /// Query the state of a previously submitted message. Transmitter and
    /// transceiver sessions only.
    pub async fn query_sm(
        &self,
        message_id: &str,
        source_addr: &str,
        params: &Params,
    ) -> SmppResult<u32> {
        self.ensure_may_send(CommandId::QuerySm)?;
        let mut pdu = Pdu::query_sm(message_id, source_addr)?;
        params.apply_to(&mut pdu)?;
        self.send_request(pdu).await
    }

    /// Send a deliver_sm. Receiver and transceiver sessions only.
    pub async fn deliver_sm(
        &self,
        source_addr: &str,
        destination_addr: &str,
        short_message: &[u8],
        params: &Params,
    ) -> SmppResult<u32> {
        self.ensure_may_send(CommandId::DeliverSm)?;
        let mut pdu = Pdu::deliver_sm(source_addr, destination_addr, short_message)?;
        params.apply_to(&mut pdu)?;
        self.send_request(pdu).await
    }

    /// Acknowledge a deliver_sm, echoing its sequence number. Receiver and
    /// transceiver sessions only.
    pub async fn deliver_sm_resp(&self, sequence: u32, status: CommandStatus) -> SmppResult<()> {
        self.ensure_may_send(CommandId::DeliverSmResp)?;
        self.inner
            .write(&Pdu::deliver_sm_resp(sequence, status))
            .await
    }

    /// Send a manual enquire_link probe.
    pub async fn enquire_link(&self) -> SmppResult<u32> {
        self.send_request(Pdu::enquire_link()).await
    }

    /// Request an unbind from the peer. `close()` does this implicitly;
    /// the explicit form exists for applications that want to await the
    /// unbind_resp themselves.
    pub async fn unbind(&self) -> SmppResult<u32> {
        self.send_request(Pdu::unbind()).await
    }

    /// Answer a peer unbind, echoing its sequence number. The session
    /// counts as unbound from this point.
    pub async fn unbind_resp(&self, sequence: u32) -> SmppResult<()> {
        self.inner.write(&Pdu::unbind_resp(sequence)).await?;
        self.inner.bound.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Send a generic_nack with the given status, echoing `sequence` (0 for
    /// PDUs whose sequence could not be read).
    pub async fn generic_nack(&self, sequence: u32, status: CommandStatus) -> SmppResult<()> {
        self.inner.write(&Pdu::generic_nack(sequence, status)).await
    }

    /// Close the session: stop the timers, send a best-effort unbind if
    /// still bound, shut the transport down. Idempotent and callable from
    /// any task.
    pub async fn close(&self) {
        self.inner.close().await;
    }

    /// True between a successful bind handshake and teardown.
    pub fn is_bound(&self) -> bool {
        self.inner.bound.load(Ordering::SeqCst)
    }

    pub fn role(&self) -> BindRole {
        self.inner.role
    }

    /// The first fatal error recorded before the session closed, if any.
    /// Readable after `close()` to learn why the session went down.
    pub fn last_error(&self) -> Option<Arc<SmppError>> {
        self.inner
            .last_error
            .lock()
            .expect("last-error mutex poisoned")
            .clone()
    }

    fn ensure_may_send(&self, id: CommandId) -> SmppResult<()> {
        if self.inner.role.may_send(id) {
            Ok(())
        } else {
            Err(SmppError::Pdu {
                role: self.inner.role,
                pdu: id,
            })
        }
    }

    async fn send_request(&self, mut pdu: Pdu) -> SmppResult<u32> {
        let sequence = self.inner.sequence.next();
        pdu.set_sequence_number(sequence);
        self.inner.write(&pdu).await?;
        Ok(sequence)
    }
}
