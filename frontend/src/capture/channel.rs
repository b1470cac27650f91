use crate::capture::socketio::{websocket_url, CodecError, EnginePacket, SocketPacket};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use gloo_net::websocket::futures::WebSocket;
use gloo_net::websocket::Message;
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;
use yew::Callback;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChannelError {
    #[error(transparent)]
    Url(#[from] CodecError),
    #[error("failed to open prediction socket: {0}")]
    Open(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Connected,
    Event { name: String, payload: Value },
    Disconnected,
}

enum Outbound {
    Frame(String),
    Close,
}

#[derive(Default)]
struct ChannelFlags {
    connected: Cell<bool>,
    closed: Cell<bool>,
}

/// The one realtime connection to the prediction service. Emits are
/// fire-and-forget; replies arrive through the `on_event` callback in
/// arrival order. There is no reconnect.
#[derive(Clone)]
pub struct PredictionChannel {
    outbound: UnboundedSender<Outbound>,
    flags: Rc<ChannelFlags>,
}

impl PredictionChannel {
    pub fn connect(base_url: &str, on_event: Callback<ChannelEvent>) -> Result<Self, ChannelError> {
        let url = websocket_url(base_url)?;
        let socket = WebSocket::open(&url).map_err(|e| ChannelError::Open(e.to_string()))?;
        log::info!("Opening prediction socket at {url}");

        let (sink, stream) = socket.split();
        let (outbound, queue) = mpsc::unbounded();
        let flags = Rc::new(ChannelFlags::default());

        wasm_bindgen_futures::spawn_local(write_loop(sink, queue));
        wasm_bindgen_futures::spawn_local(read_loop(
            stream,
            outbound.clone(),
            flags.clone(),
            on_event,
        ));

        Ok(Self { outbound, flags })
    }

    pub fn is_connected(&self) -> bool {
        self.flags.connected.get() && !self.flags.closed.get()
    }

    /// Sends one event. Dropped if the namespace is not connected yet.
    pub fn emit(&self, event: &str, payload: Value) -> bool {
        if !self.is_connected() {
            log::debug!("Prediction socket not connected, dropping '{event}'");
            return false;
        }

        match EnginePacket::Message(SocketPacket::event(event, payload)).encode() {
            Ok(frame) => self.outbound.unbounded_send(Outbound::Frame(frame)).is_ok(),
            Err(e) => {
                log::error!("Failed to encode '{event}': {e}");
                false
            }
        }
    }

    pub fn close(&self) {
        if self.flags.closed.replace(true) {
            return;
        }
        self.flags.connected.set(false);
        let _ = self.outbound.unbounded_send(Outbound::Close);
    }
}

fn send_packet(outbound: &UnboundedSender<Outbound>, packet: EnginePacket) {
    match packet.encode() {
        Ok(frame) => {
            let _ = outbound.unbounded_send(Outbound::Frame(frame));
        }
        Err(e) => log::error!("Failed to encode engine packet: {e}"),
    }
}

async fn write_loop(mut sink: SplitSink<WebSocket, Message>, mut queue: UnboundedReceiver<Outbound>) {
    while let Some(item) = queue.next().await {
        match item {
            Outbound::Frame(frame) => {
                if let Err(e) = sink.send(Message::Text(frame)).await {
                    log::warn!("Prediction socket write failed: {e}");
                    break;
                }
            }
            Outbound::Close => {
                if let Ok(frame) = EnginePacket::Message(SocketPacket::Disconnect).encode() {
                    let _ = sink.send(Message::Text(frame)).await;
                }
                let _ = sink.close().await;
                break;
            }
        }
    }
    log::debug!("Prediction socket writer stopped");
}

async fn read_loop(
    mut stream: SplitStream<WebSocket>,
    outbound: UnboundedSender<Outbound>,
    flags: Rc<ChannelFlags>,
    on_event: Callback<ChannelEvent>,
) {
    while let Some(frame) = stream.next().await {
        if flags.closed.get() {
            break;
        }

        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Bytes(_)) => {
                log::debug!("Ignoring binary frame from prediction socket");
                continue;
            }
            Err(e) => {
                log::warn!("Prediction socket error: {e}");
                break;
            }
        };

        match EnginePacket::decode(&text) {
            Ok(EnginePacket::Open(handshake)) => {
                log::debug!("Engine session {} opened", handshake.sid);
                send_packet(&outbound, EnginePacket::Message(SocketPacket::Connect(None)));
            }
            Ok(EnginePacket::Ping) => send_packet(&outbound, EnginePacket::Pong),
            Ok(EnginePacket::Close) => break,
            Ok(EnginePacket::Message(SocketPacket::Connect(_))) => {
                flags.connected.set(true);
                on_event.emit(ChannelEvent::Connected);
            }
            Ok(EnginePacket::Message(SocketPacket::Disconnect)) => break,
            Ok(EnginePacket::Message(SocketPacket::Event { name, mut args, .. })) => {
                let payload = if args.is_empty() {
                    Value::Null
                } else {
                    args.swap_remove(0)
                };
                on_event.emit(ChannelEvent::Event { name, payload });
            }
            Ok(EnginePacket::Message(SocketPacket::ConnectError(data))) => {
                log::error!("Prediction service refused connection: {data}");
            }
            Ok(EnginePacket::Message(SocketPacket::Ack { .. }))
            | Ok(EnginePacket::Pong)
            | Ok(EnginePacket::Upgrade)
            | Ok(EnginePacket::Noop) => {}
            Err(e) => log::warn!("Dropping prediction socket packet: {e}"),
        }
    }

    flags.connected.set(false);
    if !flags.closed.get() {
        log::warn!("Prediction socket disconnected");
        on_event.emit(ChannelEvent::Disconnected);
    }
}
