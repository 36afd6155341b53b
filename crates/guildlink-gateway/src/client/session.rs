//! Gateway session
//!
//! Handshake (Hello, Identify, READY) followed by the receive loop, which
//! keeps the heartbeat going and reconnects when the session drops.

use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::{interval_at, sleep, timeout, Instant};
use tokio_tungstenite::tungstenite::protocol::{CloseFrame, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace, warn};

use super::events::event_names;
use super::remote::RemoteClient;
use crate::error::GatewayError;
use crate::protocol::{CloseCode, GatewayMessage, IdentifyPayload, Intents, OpCode, ReadyPayload};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection parameters, fixed for the lifetime of one session task
#[derive(Debug, Clone)]
pub(crate) struct SessionSettings {
    pub gateway_url: String,
    pub token: String,
    pub intents: Intents,
    pub ready_timeout: Duration,
    pub reconnect_delay: Duration,
}

/// A socket that has completed the handshake
pub(crate) struct Established {
    socket: Socket,
    heartbeat_interval: Duration,
    sequence: Option<u64>,
    pub ready: ReadyPayload,
}

/// Why the receive loop returned
enum SessionEnd {
    Shutdown,
    Reconnect(&'static str),
    Fatal(GatewayError),
}

/// Open a socket and identify, giving up after `ready_timeout`
pub(crate) async fn establish(settings: &SessionSettings) -> Result<Established, GatewayError> {
    timeout(settings.ready_timeout, handshake(settings))
        .await
        .map_err(|_| GatewayError::ReadyTimeout(settings.ready_timeout.as_secs()))?
}

async fn handshake(settings: &SessionSettings) -> Result<Established, GatewayError> {
    let (mut socket, _) = connect_async(settings.gateway_url.as_str()).await?;

    let hello = next_message(&mut socket).await?;
    let Some(hello) = hello.as_hello() else {
        return Err(GatewayError::UnexpectedOp(hello.op));
    };
    debug!(heartbeat_interval = hello.heartbeat_interval, "Gateway hello");

    let identify = GatewayMessage::identify(&IdentifyPayload::new(&settings.token, settings.intents))?;
    socket.send(Message::Text(identify.to_json()?)).await?;

    loop {
        let message = next_message(&mut socket).await?;
        match message.op {
            OpCode::Dispatch if message.event_name() == Some(event_names::READY) => {
                let ready: ReadyPayload = serde_json::from_value(message.d.unwrap_or_default())?;
                return Ok(Established {
                    socket,
                    heartbeat_interval: Duration::from_millis(hello.heartbeat_interval.max(1)),
                    sequence: message.s,
                    ready,
                });
            }
            OpCode::InvalidSession => return Err(GatewayError::InvalidSession),
            op => trace!(op = %op, "Ignoring frame before READY"),
        }
    }
}

/// Next text frame, decoded; close frames become errors
async fn next_message(socket: &mut Socket) -> Result<GatewayMessage, GatewayError> {
    while let Some(frame) = socket.next().await {
        match frame? {
            Message::Text(text) => return Ok(GatewayMessage::from_json(&text)?),
            Message::Close(frame) => return Err(close_error(frame.as_ref())),
            _ => {}
        }
    }
    Err(GatewayError::HandshakeEnded)
}

fn close_error(frame: Option<&CloseFrame<'_>>) -> GatewayError {
    let Some(raw) = frame.map(|f| u16::from(f.code)) else {
        return GatewayError::HandshakeEnded;
    };
    CloseCode::from_u16(raw).map_or(GatewayError::ClosedUnknown(raw), GatewayError::Closed)
}

/// Drive the session until shutdown or a fatal close, reconnecting in between
pub(crate) async fn run(
    client: RemoteClient,
    mut session: Established,
    settings: SessionSettings,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let end = drive(&client, session, &mut shutdown).await;
        client.set_ready(false);

        match end {
            SessionEnd::Shutdown => return,
            SessionEnd::Fatal(err) => {
                error!(error = %err, "Gateway session closed permanently");
                return;
            }
            SessionEnd::Reconnect(reason) => {
                warn!(reason, "Gateway session lost, reconnecting");
            }
        }

        let mut attempt: u32 = 0;
        loop {
            tokio::select! {
                () = sleep(settings.reconnect_delay) => {}
                _ = shutdown.changed() => return,
            }
            attempt += 1;

            match establish(&settings).await {
                Ok(established) => {
                    info!(attempt, "Gateway session resumed");
                    client.on_ready(&established.ready);
                    session = established;
                    break;
                }
                Err(err) if !err.is_retryable() => {
                    error!(error = %err, "Gateway reconnect rejected");
                    return;
                }
                Err(err) => warn!(attempt, error = %err, "Gateway reconnect failed"),
            }
        }
    }
}

async fn drive(client: &RemoteClient, session: Established, shutdown: &mut watch::Receiver<bool>) -> SessionEnd {
    let Established {
        socket,
        heartbeat_interval,
        mut sequence,
        ..
    } = session;
    let (mut sink, mut stream) = socket.split();

    let mut heartbeat = interval_at(Instant::now() + heartbeat_interval, heartbeat_interval);
    let mut awaiting_ack = false;

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                let _ = sink.send(Message::Close(None)).await;
                return SessionEnd::Shutdown;
            }
            _ = heartbeat.tick() => {
                if awaiting_ack {
                    return SessionEnd::Reconnect("heartbeat not acknowledged");
                }
                if send(&mut sink, &GatewayMessage::heartbeat(sequence)).await.is_err() {
                    return SessionEnd::Reconnect("heartbeat send failed");
                }
                awaiting_ack = true;
            }
            frame = stream.next() => {
                if let Some(end) = handle_frame(client, frame, &mut sink, &mut sequence, &mut awaiting_ack).await {
                    return end;
                }
            }
        }
    }
}

async fn handle_frame(
    client: &RemoteClient,
    frame: Option<Result<Message, tokio_tungstenite::tungstenite::Error>>,
    sink: &mut SplitSink<Socket, Message>,
    sequence: &mut Option<u64>,
    awaiting_ack: &mut bool,
) -> Option<SessionEnd> {
    let text = match frame {
        None => return Some(SessionEnd::Reconnect("connection closed")),
        Some(Err(err)) => {
            warn!(error = %err, "Gateway socket error");
            return Some(SessionEnd::Reconnect("socket error"));
        }
        Some(Ok(Message::Close(frame))) => {
            return Some(match close_error(frame.as_ref()) {
                GatewayError::Closed(code) if !code.should_reconnect() => SessionEnd::Fatal(GatewayError::Closed(code)),
                _ => SessionEnd::Reconnect("closed by gateway"),
            });
        }
        Some(Ok(Message::Text(text))) => text,
        Some(Ok(_)) => return None,
    };

    let message = match GatewayMessage::from_json(&text) {
        Ok(message) => message,
        Err(err) => {
            debug!(error = %err, "Ignoring undecodable frame");
            return None;
        }
    };
    trace!(message = %message, "Gateway frame");

    match message.op {
        OpCode::Dispatch => {
            if message.s.is_some() {
                *sequence = message.s;
            }
            client.dispatch(message);
        }
        OpCode::Heartbeat => {
            if send(sink, &GatewayMessage::heartbeat(*sequence)).await.is_err() {
                return Some(SessionEnd::Reconnect("heartbeat send failed"));
            }
        }
        OpCode::HeartbeatAck => *awaiting_ack = false,
        OpCode::Reconnect => return Some(SessionEnd::Reconnect("gateway requested reconnect")),
        OpCode::InvalidSession => return Some(SessionEnd::Reconnect("session invalidated")),
        op => debug!(op = %op, "Ignoring unexpected op"),
    }
    None
}

async fn send(sink: &mut SplitSink<Socket, Message>, message: &GatewayMessage) -> Result<(), GatewayError> {
    let json = message.to_json()?;
    sink.send(Message::Text(json)).await?;
    Ok(())
}
