// ABOUTME: Length-prefixed PDU framing over an ordered reliable byte stream
// ABOUTME: Split read/write halves so the session can read, write and close concurrently

use crate::codec::{CodecError, PduHeader, MAX_PDU_SIZE};
use crate::pdu::Pdu;
use bytes::BytesMut;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};

type BoxedRead = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWrite = Box<dyn AsyncWrite + Send + Unpin>;

/// Split a transport into the session's framed halves. The write half is
/// buffered; each PDU is flushed as a unit so writes appear on the wire in
/// serialization order.
pub fn split<S>(stream: S) -> (FrameReader, FrameWriter)
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    let (read, write) = tokio::io::split(stream);
    (
        FrameReader {
            stream: Box::new(read),
            buffer: BytesMut::with_capacity(4 * 1024),
        },
        FrameWriter {
            stream: BufWriter::new(Box::new(write)),
        },
    )
}

/// Reads length-prefixed PDUs from the byte stream, buffering partial
/// frames between calls.
pub struct FrameReader {
    stream: BoxedRead,
    buffer: BytesMut,
}

impl FrameReader {
    /// Read one PDU.
    ///
    /// Waits until a complete frame (per the stated command_length) has been
    /// buffered, consumes it, and parses it. A frame whose body fails to
    /// parse - unknown command id included - is still consumed, so the
    /// stream stays aligned and the caller can nack and keep reading.
    ///
    /// Returns `Ok(None)` on clean end-of-stream (no partial frame left
    /// behind).
    pub async fn read_pdu(&mut self) -> Result<Option<Pdu>, CodecError> {
        loop {
            if let Some(result) = self.try_parse() {
                return result.map(Some);
            }

            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                // The peer closed mid-frame.
                return Err(CodecError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection reset by peer",
                )));
            }
        }
    }

    /// Attempt to carve one frame out of the buffer. `None` means more data
    /// is needed; a stated length the framer cannot honor is a hard error
    /// since there is no way to resynchronize afterwards.
    fn try_parse(&mut self) -> Option<Result<Pdu, CodecError>> {
        if self.buffer.len() < 4 {
            return None;
        }

        let stated =
            u32::from_be_bytes([self.buffer[0], self.buffer[1], self.buffer[2], self.buffer[3]]);
        if stated < PduHeader::SIZE as u32 || stated > MAX_PDU_SIZE {
            return Some(Err(CodecError::Length(stated)));
        }

        if self.buffer.len() < stated as usize {
            return None;
        }

        let frame = self.buffer.split_to(stated as usize);
        Some(Pdu::parse(&frame))
    }
}

/// Writes PDUs to the byte stream. One writer exists per session and lives
/// behind a lock, which is what serializes concurrent senders.
pub struct FrameWriter {
    stream: BufWriter<BoxedWrite>,
}

impl FrameWriter {
    /// Serialize and write a single PDU, flushing so it hits the wire now.
    pub async fn write_pdu(&mut self, pdu: &Pdu) -> io::Result<()> {
        self.stream.write_all(&pdu.to_bytes()).await?;
        self.stream.flush().await
    }

    /// Write pre-encoded frame bytes verbatim. Exists for scripted peers
    /// that need byte-exact control over what hits the wire.
    pub async fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await
    }

    /// Shut down the write side of the transport.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::CommandId;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn read_back_written_pdu() {
        let (client, server) = tokio::io::duplex(1024);
        let (mut reader, _) = split(client);
        let (_, mut writer) = split(server);

        let mut pdu = Pdu::submit_sm("1000", "2000", b"over the wire").unwrap();
        pdu.set_sequence_number(7);
        writer.write_pdu(&pdu).await.unwrap();

        let read = reader.read_pdu().await.unwrap().unwrap();
        assert_eq!(read, pdu);
    }

    #[tokio::test]
    async fn reassembles_fragmented_frames() {
        let (client, mut server) = tokio::io::duplex(1024);
        let (mut reader, _) = split(client);

        let mut pdu = Pdu::enquire_link();
        pdu.set_sequence_number(1);
        let bytes = pdu.to_bytes();

        // Deliver the frame in two pieces plus the start of a second frame.
        server.write_all(&bytes[..10]).await.unwrap();
        let read_task = tokio::spawn(async move { reader.read_pdu().await });
        server.write_all(&bytes[10..]).await.unwrap();

        let read = read_task.await.unwrap().unwrap().unwrap();
        assert_eq!(read.command_id(), CommandId::EnquireLink);
        assert_eq!(read.sequence_number(), 1);
    }

    #[tokio::test]
    async fn two_pdus_in_one_read() {
        let (client, mut server) = tokio::io::duplex(1024);
        let (mut reader, _) = split(client);

        let mut first = Pdu::enquire_link();
        first.set_sequence_number(1);
        let mut second = Pdu::unbind();
        second.set_sequence_number(2);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&first.to_bytes());
        bytes.extend_from_slice(&second.to_bytes());
        server.write_all(&bytes).await.unwrap();

        assert_eq!(
            reader.read_pdu().await.unwrap().unwrap().command_id(),
            CommandId::EnquireLink
        );
        assert_eq!(
            reader.read_pdu().await.unwrap().unwrap().command_id(),
            CommandId::Unbind
        );
    }

    #[tokio::test]
    async fn clean_eof_returns_none() {
        let (client, server) = tokio::io::duplex(1024);
        let (mut reader, _) = split(client);
        drop(server);

        assert!(reader.read_pdu().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn eof_mid_frame_is_an_error() {
        let (client, mut server) = tokio::io::duplex(1024);
        let (mut reader, _) = split(client);

        let bytes = Pdu::enquire_link().to_bytes();
        server.write_all(&bytes[..6]).await.unwrap();
        drop(server);

        assert!(matches!(
            reader.read_pdu().await,
            Err(CodecError::Io(_))
        ));
    }

    #[tokio::test]
    async fn unknown_command_id_consumes_frame() {
        let (client, mut server) = tokio::io::duplex(1024);
        let (mut reader, _) = split(client);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&16u32.to_be_bytes());
        bytes.extend_from_slice(&0xDEADBEEFu32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&5u32.to_be_bytes());
        // A valid PDU right behind the junk one.
        let mut follow_up = Pdu::enquire_link();
        follow_up.set_sequence_number(6);
        bytes.extend_from_slice(&follow_up.to_bytes());
        server.write_all(&bytes).await.unwrap();

        assert!(matches!(
            reader.read_pdu().await,
            Err(CodecError::CmdId(0xDEADBEEF))
        ));
        // The stream is still aligned.
        let next = reader.read_pdu().await.unwrap().unwrap();
        assert_eq!(next.sequence_number(), 6);
    }

    #[tokio::test]
    async fn hostile_length_is_an_error() {
        let (client, mut server) = tokio::io::duplex(1024);
        let (mut reader, _) = split(client);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
        server.write_all(&bytes).await.unwrap();

        assert!(matches!(
            reader.read_pdu().await,
            Err(CodecError::Length(0xFFFF_FFFF))
        ));
    }
}
