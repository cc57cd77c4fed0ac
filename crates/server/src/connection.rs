// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! JSON WebSocket connection types.
use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    self as websocket, WebSocketStream,
    tungstenite::{
        self,
        Message as WsMessage,
        handshake::server::{ErrorResponse, Request, Response},
        protocol::WebSocketConfig,
    },
};

use crate::message::{ClientMessage, ServerMessage};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 16384;

/// Connection receive errors.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The client sent a message that is not a valid request, the connection
    /// can still be used.
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    /// WebSocket protocol or IO error.
    #[error("Connection error: {0}")]
    WebSocket(#[from] tungstenite::Error),
}

/// A WebSocket connection that exchanges JSON text messages with a client.
pub struct Connection {
    stream: WebSocketStream<TcpStream>,
}

impl Connection {
    /// Sends a [ServerMessage].
    pub async fn send(&mut self, msg: &ServerMessage) -> Result<()> {
        let json = serde_json::to_string(msg)?;
        self.stream.send(WsMessage::text(json)).await?;
        Ok(())
    }

    /// Waits for a [ClientMessage], returns None when the client closes the
    /// connection.
    pub async fn recv(&mut self) -> Option<Result<ClientMessage, ConnectionError>> {
        loop {
            match self.stream.next().await {
                Some(Ok(WsMessage::Text(text))) => {
                    break Some(serde_json::from_str(text.as_str()).map_err(Into::into));
                }
                Some(Ok(WsMessage::Close(_))) => break None,
                Some(Ok(_)) => continue,
                Some(Err(e)) => break Some(Err(e.into())),
                None => break None,
            }
        }
    }

    /// Closes this connection.
    pub async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// Creates a [Connection] from a server stream.
///
/// Returns the connection and the `session_id` query parameter of the
/// request path if any.
pub async fn accept_async(stream: TcpStream) -> Result<(Connection, Option<String>)> {
    let config = WebSocketConfig::default().max_message_size(Some(MAX_MSG_LEN));

    let mut session_id = None;
    let callback = |req: &Request, res: Response| -> Result<Response, ErrorResponse> {
        session_id = req.uri().query().and_then(session_id_from_query);
        Ok(res)
    };

    let stream = websocket::accept_hdr_async_with_config(stream, callback, Some(config)).await?;
    Ok((Connection { stream }, session_id))
}

/// Gets the `session_id` value from a request query.
fn session_id_from_query(query: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| *key == "session_id")
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}
