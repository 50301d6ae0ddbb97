//! The single TCP connection to the chat server.
//!
//! [`Connection`] owns the read half until [`Connection::run`] moves it into a
//! spawned receive task. Everything else talks to the socket through a
//! cloneable [`ConnectionHandle`]: sends are serialized by a mutex around the
//! write half, and [`ConnectionHandle::stop`] signals a watch channel that
//! wakes the receive task and cancels any send blocked on a full socket.
//! Once the loop has reported the loss, the read half is dropped and the write
//! half shut down, which closes the socket in both directions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::common::{DisconnectReason, Packet};
use crate::error::ChatError;

use super::codec::{FrameDecoder, encode_packet};

const READ_CHUNK: usize = 4096;

/// What the receive loop hands to its consumer.
#[derive(Debug)]
pub enum Inbound {
    Packet(Packet),
    /// Sent exactly once, as the loop's last word.
    Lost(DisconnectReason),
}

pub struct Connection {
    reader: FrameReader,
    shutdown_rx: watch::Receiver<bool>,
    handle: ConnectionHandle,
}

#[derive(Clone)]
pub struct ConnectionHandle {
    inner: Arc<Shared>,
}

struct Shared {
    peer: String,
    writer: Mutex<Option<OwnedWriteHalf>>,
    closed: AtomicBool,
    shutdown: watch::Sender<bool>,
}

struct FrameReader {
    half: OwnedReadHalf,
    decoder: FrameDecoder,
    chunk: Vec<u8>,
}

impl FrameReader {
    async fn next_packet(&mut self) -> Result<Option<Packet>, ChatError> {
        loop {
            if let Some(packet) = self.decoder.next_packet()? {
                return Ok(Some(packet));
            }
            let read = self.half.read(&mut self.chunk).await?;
            if read == 0 {
                return Ok(None);
            }
            self.decoder.extend(&self.chunk[..read]);
        }
    }
}

impl Connection {
    /// Connects to `addr`. Failure is reported, never retried.
    pub async fn open(addr: &str) -> Result<Self, ChatError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ChatError::Connect {
                addr: addr.to_string(),
                source,
            })?;
        log::info!("Connected to {addr}");
        Ok(Self::from_stream(stream, addr))
    }

    pub fn from_stream(stream: TcpStream, peer: &str) -> Self {
        if let Err(err) = stream.set_nodelay(true) {
            log::warn!("Failed to set TCP_NODELAY on {peer}: {err}");
        }
        let (read_half, write_half) = stream.into_split();
        let (shutdown, shutdown_rx) = watch::channel(false);

        Self {
            reader: FrameReader {
                half: read_half,
                decoder: FrameDecoder::new(),
                chunk: vec![0; READ_CHUNK],
            },
            shutdown_rx,
            handle: ConnectionHandle {
                inner: Arc::new(Shared {
                    peer: peer.to_string(),
                    writer: Mutex::new(Some(write_half)),
                    closed: AtomicBool::new(false),
                    shutdown,
                }),
            },
        }
    }

    pub fn handle(&self) -> ConnectionHandle {
        self.handle.clone()
    }

    pub async fn send(&self, packet: &Packet) -> Result<(), ChatError> {
        self.handle.send(packet).await
    }

    /// Reads one packet before the receive loop is running (login replies).
    /// `Ok(None)` means the server closed the stream.
    pub async fn recv(&mut self) -> Result<Option<Packet>, ChatError> {
        self.reader.next_packet().await
    }

    /// Spawns the receive loop. Every decoded packet is handed to `on_inbound`
    /// on the receive task before the next read; the loop finishes with one
    /// [`Inbound::Lost`] whatever ended it.
    pub fn run<F>(self, mut on_inbound: F) -> JoinHandle<()>
    where
        F: FnMut(Inbound) + Send + 'static,
    {
        let Connection {
            mut reader,
            mut shutdown_rx,
            handle,
        } = self;

        tokio::spawn(async move {
            let reason = loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break DisconnectReason::Stopped,
                    next = reader.next_packet() => match next {
                        Ok(Some(packet)) => on_inbound(Inbound::Packet(packet)),
                        Ok(None) => break DisconnectReason::PeerClosed,
                        Err(ChatError::Frame(err)) => {
                            log::warn!("Dropping connection to {}: {err}", handle.peer());
                            break DisconnectReason::Framing(err.to_string());
                        }
                        Err(err) => break DisconnectReason::Transport(err.to_string()),
                    }
                }
            };

            drop(reader);
            handle.abort_sends();
            log::info!("Receive loop for {} ended: {reason:?}", handle.peer());
            on_inbound(Inbound::Lost(reason));
            handle.close().await;
        })
    }
}

impl ConnectionHandle {
    pub fn peer(&self) -> &str {
        &self.inner.peer
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Writes one encoded record. Concurrent sends never interleave, and a
    /// send still in flight when the connection stops fails with
    /// [`ChatError::Disconnected`] instead of waiting on the peer.
    pub async fn send(&self, packet: &Packet) -> Result<(), ChatError> {
        let mut shutdown = self.inner.shutdown.subscribe();
        if self.is_closed() {
            return Err(ChatError::Disconnected);
        }
        let frame = encode_packet(packet)?;

        tokio::select! {
            biased;
            _ = shutdown.changed() => {
                log::debug!("Dropped `{}` to {}: connection stopped", packet.kind, self.peer());
                Err(ChatError::Disconnected)
            }
            written = self.write_frame(&frame) => {
                written?;
                log::debug!("Sent `{}` to {}", packet.kind, self.peer());
                Ok(())
            }
        }
    }

    async fn write_frame(&self, frame: &[u8]) -> Result<(), ChatError> {
        let mut writer = self.inner.writer.lock().await;
        let Some(writer) = writer.as_mut() else {
            return Err(ChatError::Disconnected);
        };
        if self.is_closed() {
            return Err(ChatError::Disconnected);
        }
        writer.write_all(frame).await.map_err(ChatError::Send)?;
        writer.flush().await.map_err(ChatError::Send)
    }

    /// Idempotent; callable from any thread, inside or outside the runtime.
    pub fn stop(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        log::info!("Stopping connection to {}", self.peer());
        self.inner.shutdown.send_replace(true);
    }

    /// Marks the connection closed and cancels every send in flight, so the
    /// writer lock is free for [`Self::close`].
    fn abort_sends(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.shutdown.send_replace(true);
    }

    async fn close(&self) {
        let writer = self.inner.writer.lock().await.take();
        if let Some(mut writer) = writer {
            if let Err(err) = writer.shutdown().await {
                log::debug!("Shutdown of {} failed: {err}", self.peer());
            }
        }
    }
}
