use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::bytes::Bytes;
use tokio_util::codec::{FramedRead, FramedWrite};

use crate::protocol::{
    HANDSHAKE, IdSizes, Packet, PacketCodec, PacketKind, command, command_set,
};
use crate::{Error, Result};

/// Error code and data of a command reply.
type Reply = (u16, Bytes);

/// Commands waiting for their reply, or `None` once the connection is
/// closed.
type PendingReplies = Arc<Mutex<Option<HashMap<u32, oneshot::Sender<Reply>>>>>;

/// JDWP connection to a debuggee.
///
/// A background task reads every incoming packet: replies are handed to
/// the command waiting for them, composite events are queued until
/// [next_event](Self::next_event) is called.
pub struct Connection<W> {
    writer: FramedWrite<W, PacketCodec>,
    pending: PendingReplies,
    events: mpsc::UnboundedReceiver<Packet>,
    reader: JoinHandle<()>,
    next_id: u32,
    sizes: IdSizes,
}

impl<W: AsyncWrite + Unpin> Connection<W> {
    /// Performs the JDWP handshake over the given transport halves, and
    /// queries the ID sizes of the debuggee.
    #[tracing::instrument(name = "Handshake", skip_all)]
    pub async fn establish<R>(mut reader: R, mut writer: W) -> Result<Self>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        writer.write_all(HANDSHAKE).await?;

        let mut reply = [0; HANDSHAKE.len()];
        reader.read_exact(&mut reply).await?;

        if &reply != HANDSHAKE {
            return Err(Error::Handshake(String::from_utf8_lossy(&reply).into_owned()));
        }

        let pending = PendingReplies::new(Mutex::new(Some(HashMap::new())));
        let (events_tx, events) = mpsc::unbounded_channel();

        let reader = tokio::spawn(read_packets(
            FramedRead::new(reader, PacketCodec),
            pending.clone(),
            events_tx,
        ));

        let mut conn = Self {
            writer: FramedWrite::new(writer, PacketCodec),
            pending,
            events,
            reader,
            next_id: 1,
            sizes: IdSizes::default(),
        };

        let reply = conn
            .command(command_set::VIRTUAL_MACHINE, command::vm::ID_SIZES, Vec::new())
            .await?;

        conn.sizes = IdSizes::decode(&reply)?;

        tracing::debug!(sizes = ?conn.sizes, "connection established");

        Ok(conn)
    }

    /// ID sizes of the debuggee.
    pub const fn sizes(&self) -> &IdSizes {
        &self.sizes
    }

    /// Sends a command and waits for its reply data.
    pub async fn command(&mut self, set: u8, command: u8, data: Vec<u8>) -> Result<Bytes> {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let (tx, rx) = oneshot::channel();

        match self.pending.lock().map_err(|_| Error::Disconnected)?.as_mut() {
            Some(pending) => pending.insert(id, tx),
            None => return Err(Error::Disconnected),
        };

        self.writer
            .send(Packet::command(id, set, command, data))
            .await?;

        match rx.await.map_err(|_| Error::Disconnected)? {
            (0, data) => Ok(data),
            (code, _) => Err(Error::Command { set, command, code }),
        }
    }

    /// Waits for the next composite event packet.
    ///
    /// It returns `None` once the connection is closed. This method is
    /// cancel-safe.
    pub async fn next_event(&mut self) -> Option<Packet> {
        self.events.recv().await
    }
}

impl<W> Drop for Connection<W> {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_packets<R: AsyncRead + Unpin>(
    mut packets: FramedRead<R, PacketCodec>,
    pending: PendingReplies,
    events: mpsc::UnboundedSender<Packet>,
) {
    while let Some(packet) = packets.next().await {
        let packet = match packet {
            Ok(packet) => packet,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read packet");
                break;
            }
        };

        match packet.kind {
            PacketKind::Reply { error_code } => {
                let waiter = pending
                    .lock()
                    .ok()
                    .and_then(|mut pending| pending.as_mut()?.remove(&packet.id));

                match waiter {
                    Some(waiter) => {
                        let _ = waiter.send((error_code, packet.data));
                    }
                    None => tracing::debug!(id = packet.id, "reply to an unknown command"),
                }
            }
            PacketKind::Command { .. }
                if packet.is_command(command_set::EVENT, command::event::COMPOSITE) =>
            {
                if events.send(packet).is_err() {
                    break;
                }
            }
            PacketKind::Command { set, command } => {
                tracing::debug!(set, command, "ignored command from the debuggee");
            }
        }
    }

    // waiting commands get a closed channel
    if let Ok(mut pending) = pending.lock() {
        pending.take();
    }

    tracing::debug!("connection closed");
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};

    use super::Connection;
    use crate::Error;
    use crate::protocol::HANDSHAKE;

    /// Reply to `VirtualMachine.IDSizes` with 8-byte IDs.
    fn id_sizes_reply(id: u32) -> Vec<u8> {
        let mut reply = Vec::new();
        reply.extend_from_slice(&31u32.to_be_bytes());
        reply.extend_from_slice(&id.to_be_bytes());
        reply.extend_from_slice(&[0x80, 0, 0]);
        (0..5).for_each(|_| reply.extend_from_slice(&8i32.to_be_bytes()));
        reply
    }

    #[tokio::test]
    async fn handshake_and_command() {
        let (client, mut debuggee) = duplex(1024);
        let (read, write) = tokio::io::split(client);

        let debuggee = tokio::spawn(async move {
            let mut handshake = [0; 14];
            debuggee.read_exact(&mut handshake).await.expect("read handshake");
            assert_eq!(&handshake, HANDSHAKE);
            debuggee.write_all(HANDSHAKE).await.expect("write handshake");

            let mut header = [0; 11];
            debuggee.read_exact(&mut header).await.expect("read header");
            assert_eq!(&header[9..], &[1, 7]);
            debuggee.write_all(&id_sizes_reply(1)).await.expect("write id sizes");

            // Thread.Name(5) fails with INVALID_THREAD
            let mut command = [0; 19];
            debuggee.read_exact(&mut command).await.expect("read command");
            assert_eq!(&command[9..11], &[11, 1]);
            debuggee
                .write_all(&[0, 0, 0, 11, 0, 0, 0, 2, 0x80, 0, 10])
                .await
                .expect("write error reply");

            // composite event, then close
            debuggee
                .write_all(&[0, 0, 0, 16, 0, 0, 0, 9, 0, 64, 100, 0, 0, 0, 0, 0])
                .await
                .expect("write composite");
        });

        let mut conn = Connection::establish(read, write).await.expect("establish");
        assert_eq!(conn.sizes().object, 8);

        let res = conn.command(11, 1, 5u64.to_be_bytes().to_vec()).await;
        assert!(matches!(res, Err(Error::Command { set: 11, command: 1, code: 10 })));

        let event = conn.next_event().await.expect("composite event");
        assert!(event.is_command(64, 100));

        debuggee.await.expect("debuggee task");
        assert!(conn.next_event().await.is_none());
        assert!(matches!(conn.command(1, 9, Vec::new()).await, Err(Error::Disconnected)));
    }

    #[tokio::test]
    async fn bad_handshake() {
        let (client, mut debuggee) = duplex(64);
        let (read, write) = tokio::io::split(client);

        debuggee.write_all(b"Not-A-Debuggee").await.expect("write handshake");

        let res = Connection::establish(read, write).await;
        assert!(matches!(res, Err(Error::Handshake(_))));
    }
}
