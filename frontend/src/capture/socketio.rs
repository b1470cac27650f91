//! Text framing for the prediction service's Socket.IO endpoint.
//!
//! Engine.IO v4 carries one packet per WebSocket text frame: a single digit
//! packet type followed by its payload. Socket.IO v5 packets travel inside
//! Engine.IO `message` packets with their own type digit, an optional
//! namespace and ack id, and a JSON body.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("empty packet")]
    Empty,
    #[error("unknown engine packet type '{0}'")]
    UnknownEngineType(char),
    #[error("unknown socket packet type '{0}'")]
    UnknownSocketType(char),
    #[error("binary packets are not supported")]
    BinaryUnsupported,
    #[error("packet for namespace '{0}' ignored")]
    ForeignNamespace(String),
    #[error("event packet without a name")]
    MissingEventName,
    #[error("invalid packet payload: {0}")]
    Json(String),
    #[error("unsupported socket url '{0}'")]
    InvalidUrl(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e.to_string())
    }
}

/// Payload of the Engine.IO `open` packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Message(SocketPacket),
    Upgrade,
    Noop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect(Option<Value>),
    Disconnect,
    Event {
        name: String,
        args: Vec<Value>,
        ack: Option<u64>,
    },
    Ack {
        id: u64,
        args: Vec<Value>,
    },
    ConnectError(Value),
}

impl EnginePacket {
    pub fn decode(frame: &str) -> Result<Self, CodecError> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(CodecError::Empty)?;
        let payload = chars.as_str();

        match kind {
            '0' => Ok(EnginePacket::Open(serde_json::from_str(payload)?)),
            '1' => Ok(EnginePacket::Close),
            '2' => Ok(EnginePacket::Ping),
            '3' => Ok(EnginePacket::Pong),
            '4' => Ok(EnginePacket::Message(SocketPacket::decode(payload)?)),
            '5' => Ok(EnginePacket::Upgrade),
            '6' => Ok(EnginePacket::Noop),
            other => Err(CodecError::UnknownEngineType(other)),
        }
    }

    pub fn encode(&self) -> Result<String, CodecError> {
        Ok(match self {
            EnginePacket::Open(handshake) => format!("0{}", serde_json::to_string(handshake)?),
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping => "2".to_string(),
            EnginePacket::Pong => "3".to_string(),
            EnginePacket::Message(packet) => format!("4{}", packet.encode()?),
            EnginePacket::Upgrade => "5".to_string(),
            EnginePacket::Noop => "6".to_string(),
        })
    }
}

impl SocketPacket {
    pub fn event(name: &str, payload: Value) -> Self {
        SocketPacket::Event {
            name: name.to_string(),
            args: vec![payload],
            ack: None,
        }
    }

    pub fn decode(packet: &str) -> Result<Self, CodecError> {
        let mut chars = packet.chars();
        let kind = chars.next().ok_or(CodecError::Empty)?;
        let mut rest = chars.as_str();

        if matches!(kind, '5' | '6') {
            return Err(CodecError::BinaryUnsupported);
        }

        if rest.starts_with('/') {
            let (namespace, tail) = rest.split_once(',').unwrap_or((rest, ""));
            if namespace != "/" {
                return Err(CodecError::ForeignNamespace(namespace.to_string()));
            }
            rest = tail;
        }

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let ack = if digits > 0 {
            rest[..digits].parse::<u64>().ok()
        } else {
            None
        };
        let body = &rest[digits..];

        match kind {
            '0' => {
                let data = if body.is_empty() {
                    None
                } else {
                    Some(serde_json::from_str(body)?)
                };
                Ok(SocketPacket::Connect(data))
            }
            '1' => Ok(SocketPacket::Disconnect),
            '2' => {
                let mut args: Vec<Value> = serde_json::from_str(body)?;
                if args.is_empty() {
                    return Err(CodecError::MissingEventName);
                }
                let name = match args.remove(0) {
                    Value::String(name) => name,
                    _ => return Err(CodecError::MissingEventName),
                };
                Ok(SocketPacket::Event { name, args, ack })
            }
            '3' => Ok(SocketPacket::Ack {
                id: ack.unwrap_or_default(),
                args: serde_json::from_str(body)?,
            }),
            '4' => Ok(SocketPacket::ConnectError(serde_json::from_str(body)?)),
            other => Err(CodecError::UnknownSocketType(other)),
        }
    }

    pub fn encode(&self) -> Result<String, CodecError> {
        Ok(match self {
            SocketPacket::Connect(None) => "0".to_string(),
            SocketPacket::Connect(Some(auth)) => format!("0{}", serde_json::to_string(auth)?),
            SocketPacket::Disconnect => "1".to_string(),
            SocketPacket::Event { name, args, ack } => {
                let mut frame = Vec::with_capacity(args.len() + 1);
                frame.push(Value::String(name.clone()));
                frame.extend(args.iter().cloned());
                let ack = ack.map(|id| id.to_string()).unwrap_or_default();
                format!("2{ack}{}", serde_json::to_string(&frame)?)
            }
            SocketPacket::Ack { id, args } => format!("3{id}{}", serde_json::to_string(args)?),
            SocketPacket::ConnectError(data) => format!("4{}", serde_json::to_string(data)?),
        })
    }
}

/// Maps the service's HTTP origin onto its Engine.IO WebSocket endpoint.
pub fn websocket_url(base: &str) -> Result<String, CodecError> {
    let base = base.trim().trim_end_matches('/');
    let (scheme, host) = base
        .split_once("://")
        .ok_or_else(|| CodecError::InvalidUrl(base.to_string()))?;

    let ws_scheme = match scheme {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        _ => return Err(CodecError::InvalidUrl(base.to_string())),
    };
    if host.is_empty() {
        return Err(CodecError::InvalidUrl(base.to_string()));
    }

    Ok(format!(
        "{ws_scheme}://{host}/socket.io/?EIO=4&transport=websocket"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn open_packet_carries_the_handshake() {
        let frame = r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
        let EnginePacket::Open(handshake) = EnginePacket::decode(frame).unwrap() else {
            panic!("expected open packet");
        };
        assert_eq!(handshake.sid, "lv_VI97HAXpY6yYWAAAC");
        assert_eq!(handshake.ping_interval, 25_000);
        assert_eq!(handshake.max_payload, Some(1_000_000));
    }

    #[test]
    fn heartbeat_packets() {
        assert_eq!(EnginePacket::decode("2").unwrap(), EnginePacket::Ping);
        assert_eq!(EnginePacket::Pong.encode().unwrap(), "3");
    }

    #[test]
    fn namespace_connect_ack() {
        let packet = EnginePacket::decode(r#"40{"sid":"wZX3oN0bSVIhsaknAAAI"}"#).unwrap();
        assert_eq!(
            packet,
            EnginePacket::Message(SocketPacket::Connect(Some(
                json!({"sid": "wZX3oN0bSVIhsaknAAAI"})
            )))
        );
        assert_eq!(
            EnginePacket::Message(SocketPacket::Connect(None)).encode().unwrap(),
            "40"
        );
    }

    #[test]
    fn frame_processed_event_is_decoded() {
        let frame = r#"42["frame_processed",{"features":[{"left_eye":0.31}],"predictions":{"label":"happy"}}]"#;
        let EnginePacket::Message(SocketPacket::Event { name, args, ack }) =
            EnginePacket::decode(frame).unwrap()
        else {
            panic!("expected event");
        };
        assert_eq!(name, "frame_processed");
        assert_eq!(ack, None);
        assert_eq!(args[0]["predictions"]["label"], "happy");
    }

    #[test]
    fn process_frame_emit_matches_the_wire_format() {
        let packet = SocketPacket::event("process_frame", json!("data:image/jpeg;base64,/9j/4AAQ"));
        assert_eq!(
            EnginePacket::Message(packet).encode().unwrap(),
            r#"42["process_frame","data:image/jpeg;base64,/9j/4AAQ"]"#
        );
    }

    #[test]
    fn explicit_root_namespace_and_ack_id_are_parsed() {
        let packet = SocketPacket::decode(r#"2/,12["ping_me",1]"#).unwrap();
        assert_eq!(
            packet,
            SocketPacket::Event {
                name: "ping_me".into(),
                args: vec![json!(1)],
                ack: Some(12),
            }
        );
    }

    #[test]
    fn unsupported_packets_are_rejected() {
        assert_eq!(
            SocketPacket::decode(r#"2/admin,["x"]"#),
            Err(CodecError::ForeignNamespace("/admin".into()))
        );
        assert_eq!(
            SocketPacket::decode(r#"51-["img",{"_placeholder":true,"num":0}]"#),
            Err(CodecError::BinaryUnsupported)
        );
        assert_eq!(SocketPacket::decode("2[]"), Err(CodecError::MissingEventName));
        assert_eq!(EnginePacket::decode(""), Err(CodecError::Empty));
        assert_eq!(EnginePacket::decode("9"), Err(CodecError::UnknownEngineType('9')));
        assert!(matches!(EnginePacket::decode("42[oops"), Err(CodecError::Json(_))));
    }

    #[test]
    fn http_origins_map_to_socket_endpoints() {
        assert_eq!(
            websocket_url("http://localhost:5000").unwrap(),
            "ws://localhost:5000/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            websocket_url("https://predict.example.org/").unwrap(),
            "wss://predict.example.org/socket.io/?EIO=4&transport=websocket"
        );
        assert!(websocket_url("localhost:5000").is_err());
        assert!(websocket_url("ftp://host").is_err());
    }
}
