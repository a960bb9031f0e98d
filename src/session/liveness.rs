// ABOUTME: Enquire-link supervisor: periodic ticker plus a response-timeout watchdog
// ABOUTME: Runs as one task per bound session; talks to the read path over a channel

use crate::pdu::Pdu;
use crate::session::{Inner, SmppError};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};
use tracing::debug;

/// Drive the session's keep-alive until it closes.
///
/// Two timers, one owner: the ticker fires every `eli` and sends an
/// enquire_link; the single-shot watchdog is armed for `eli / 2` after each
/// send and re-armed for the full `eli` when the read path reports an
/// enquire_link_resp (the next tick shortens it again). Each outbound probe
/// therefore has a bounded window to be acknowledged, with a fresh window
/// per tick. Expiry of either path records the failure and tears the
/// session down.
///
/// The read path owns no timer handles; it posts resp events over
/// `resp_rx`, keeping all timer state inside this task.
pub(crate) async fn run(
    inner: Arc<Inner>,
    eli: Duration,
    mut resp_rx: mpsc::UnboundedReceiver<()>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = time::interval_at(Instant::now() + eli, eli);

    // Single-shot check timer; disarmed until the first probe goes out.
    let watchdog = time::sleep(Duration::ZERO);
    tokio::pin!(watchdog);
    let mut armed = false;

    loop {
        // Biased polling makes the deadline ties deterministic: when a tick
        // and the watchdog expire on the same instant (the resp re-arm sets
        // the watchdog to exactly one interval), the tick wins and re-arms
        // the watchdog rather than tearing the session down.
        tokio::select! {
            biased;
            _ = shutdown.changed() => return,
            _ = ticker.tick() => {
                let mut pdu = Pdu::enquire_link();
                pdu.set_sequence_number(inner.sequence.next());
                debug!(sequence = pdu.sequence_number(), "sending enquire_link");

                if let Err(err) = inner.write(&pdu).await {
                    if inner.closed.load(Ordering::SeqCst) {
                        // Lost the race against a concurrent teardown; the
                        // session already has its cause.
                        return;
                    }
                    debug!(error = %err, "error writing enquire_link, closing session");
                    inner.fail(SmppError::EnquireLinkWrite).await;
                    return;
                }

                watchdog.as_mut().reset(Instant::now() + eli / 2);
                armed = true;
            }
            _ = &mut watchdog, if armed => {
                debug!("timeout waiting for enquire_link_resp, closing session");
                inner.fail(SmppError::EnquireLinkTimeout).await;
                return;
            }
            Some(()) = resp_rx.recv() => {
                debug!("enquire_link_resp received, resetting check timer");
                watchdog.as_mut().reset(Instant::now() + eli);
            }
        }
    }
}
