//! Session driver: one [`GameSession`] owned by one Tokio task.
//!
//! The outside world talks to the task through a [`ClientHandle`], which
//! wraps the sending half of a bounded command channel. Because there is a
//! single consumer, packets reach the session strictly in the order they
//! were delivered, no matter how many tasks hold a handle.

use idlebot_protocol::OutboundMessage;
use idlebot_session::{Effect, GameSession, SessionConfig, SessionEvent, SessionPhase};
use idlebot_transport::PacketSink;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::IdlebotError;

/// Default capacity of the command channel.
pub const DEFAULT_CHANNEL_SIZE: usize = 256;

/// Commands sent to the client task.
///
/// Variants carrying a `oneshot::Sender` expect an answer; the rest are
/// fire-and-forget.
pub(crate) enum ClientCommand {
    /// A raw inbound packet, in arrival order.
    Packet(Vec<u8>),
    EnterGame {
        reply: oneshot::Sender<bool>,
    },
    LeaveGame,
    /// An outbound message requested by the application.
    Send(OutboundMessage),
    Ping,
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Shutdown,
}

/// Point-in-time view of the session, for status displays and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    /// Roster names, sorted case-insensitively.
    pub players: Vec<String>,
    /// How many of `players` are configured bots.
    pub bots: usize,
    pub max_players: usize,
    pub dropped_packets: u64,
}

// ---------------------------------------------------------------------------
// ClientHandle
// ---------------------------------------------------------------------------

/// Handle to a running client task. Cheap to clone.
///
/// Every method fails with [`IdlebotError::ClientStopped`] once the task
/// has exited.
#[derive(Clone)]
pub struct ClientHandle {
    sender: mpsc::Sender<ClientCommand>,
}

impl ClientHandle {
    async fn command(&self, cmd: ClientCommand) -> Result<(), IdlebotError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| IdlebotError::ClientStopped)
    }

    /// Delivers one raw inbound packet.
    pub async fn deliver(&self, packet: impl Into<Vec<u8>>) -> Result<(), IdlebotError> {
        self.command(ClientCommand::Packet(packet.into())).await
    }

    /// Marks the session as in-game. Returns `true` if the phase changed.
    pub async fn enter_game(&self) -> Result<bool, IdlebotError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command(ClientCommand::EnterGame { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| IdlebotError::ClientStopped)
    }

    /// Starts the leave sequence. A no-op unless the session is in game.
    pub async fn leave_game(&self) -> Result<(), IdlebotError> {
        self.command(ClientCommand::LeaveGame).await
    }

    /// Sends a chat line to everyone.
    pub async fn say(&self, text: impl Into<String>) -> Result<(), IdlebotError> {
        self.send(OutboundMessage::say(text)).await
    }

    /// Sends a chat line to one player.
    pub async fn whisper(
        &self,
        text: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<(), IdlebotError> {
        self.send(OutboundMessage::whisper(text, target)).await
    }

    pub async fn say_overhead(&self, text: impl Into<String>) -> Result<(), IdlebotError> {
        self.send(OutboundMessage::overhead(text)).await
    }

    /// Queues any outbound message.
    pub async fn send(&self, msg: OutboundMessage) -> Result<(), IdlebotError> {
        self.command(ClientCommand::Send(msg)).await
    }

    /// Sends a ping stamped by the session's clock.
    pub async fn ping(&self) -> Result<(), IdlebotError> {
        self.command(ClientCommand::Ping).await
    }

    /// Reads the current session state.
    ///
    /// The answer reflects every command queued before this one.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, IdlebotError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command(ClientCommand::Snapshot { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| IdlebotError::ClientStopped)
    }

    /// Stops the client task. Commands already queued are processed first.
    pub async fn shutdown(&self) -> Result<(), IdlebotError> {
        self.command(ClientCommand::Shutdown).await
    }

    /// Whether the client task has exited.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

// ---------------------------------------------------------------------------
// GameClient builder
// ---------------------------------------------------------------------------

/// Builder for spawning a client task.
///
/// ```rust,ignore
/// let (sink, outbound) = ChannelSink::new();
/// let (events_tx, events) = tokio::sync::mpsc::unbounded_channel();
/// let (handle, task) = GameClient::builder(config)
///     .events(events_tx)
///     .start(sink);
/// handle.enter_game().await?;
/// ```
pub struct GameClient {
    config: SessionConfig,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
    channel_size: usize,
}

impl GameClient {
    pub fn builder(config: SessionConfig) -> Self {
        Self {
            config,
            events: None,
            channel_size: DEFAULT_CHANNEL_SIZE,
        }
    }

    /// Spawns a client that forwards session events to `events`.
    pub fn spawn<S: PacketSink>(
        config: SessionConfig,
        sink: S,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> (ClientHandle, JoinHandle<()>) {
        Self::builder(config).events(events).start(sink)
    }

    /// Where to forward [`SessionEvent`]s. Without this they are only logged.
    pub fn events(mut self, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Capacity of the command channel. Delivering blocks once it is full.
    pub fn channel_size(mut self, size: usize) -> Self {
        self.channel_size = size.max(1);
        self
    }

    /// Starts the client task, sending outbound packets to `sink`.
    pub fn start<S: PacketSink>(self, sink: S) -> (ClientHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(self.channel_size);
        let actor = ClientActor {
            session: GameSession::new(self.config),
            sink,
            events: self.events,
            receiver: rx,
        };
        let task = tokio::spawn(actor.run());
        (ClientHandle { sender: tx }, task)
    }
}

// ---------------------------------------------------------------------------
// ClientActor
// ---------------------------------------------------------------------------

struct ClientActor<S: PacketSink> {
    session: GameSession,
    sink: S,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
    receiver: mpsc::Receiver<ClientCommand>,
}

impl<S: PacketSink> ClientActor<S> {
    /// Processes commands until shutdown or until every handle is dropped.
    async fn run(mut self) {
        let character = self.session.config().character_name.clone();
        tracing::info!(%character, "client started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                ClientCommand::Packet(data) => {
                    let effects = self.session.on_packet(&data);
                    self.apply(effects);
                }
                ClientCommand::EnterGame { reply } => {
                    let _ = reply.send(self.session.enter_game());
                }
                ClientCommand::LeaveGame => {
                    let effects = self.session.leave_game();
                    self.apply(effects);
                }
                ClientCommand::Send(msg) => self.send(&msg),
                ClientCommand::Ping => {
                    let ping = self.session.ping();
                    self.send(&ping);
                }
                ClientCommand::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
                ClientCommand::Shutdown => {
                    tracing::info!(%character, "client shutting down");
                    break;
                }
            }
        }

        tracing::info!(
            %character,
            phase = %self.session.phase(),
            dropped = self.session.dropped_packets(),
            "client stopped"
        );
    }

    /// Carries out effects in the order the session produced them.
    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Send(msg) => self.send(&msg),
                Effect::Notify(event) => self.notify(event),
            }
        }
    }

    fn send(&mut self, msg: &OutboundMessage) {
        let payload = self.session.encode(msg);
        if let Err(e) = self.sink.send(&payload) {
            tracing::error!(error = %e, ?msg, "failed to send packet");
        }
    }

    fn notify(&mut self, event: SessionEvent) {
        let Some(events) = &self.events else {
            tracing::debug!(?event, "no event sink");
            return;
        };
        if events.send(event).is_err() {
            tracing::warn!("event receiver dropped, no longer forwarding events");
            self.events = None;
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.session.phase(),
            players: self.session.roster().sorted_names(),
            bots: self.session.roster().iter().filter(|p| p.is_bot).count(),
            max_players: self.session.config().max_players,
            dropped_packets: self.session.dropped_packets(),
        }
    }
}
