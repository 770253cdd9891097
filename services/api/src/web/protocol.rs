//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the chat panel in the
//! browser and the API server. One connection is one open panel.

use serde::{Deserialize, Serialize};

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// A new user turn. Rejected with `Busy` while a reply is pending.
    Send { text: String },
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once the panel is ready; the transcript starts empty.
    PanelOpened,

    /// The request is in flight. The UI shows a typing indicator.
    Typing,

    /// The model's turn. Gateway failures arrive here as ordinary text.
    Reply { role: String, text: String },

    /// The previous message has not been answered yet.
    Busy,

    /// The client sent something the server could not understand.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_send_is_parsed_from_tagged_json() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"send","text":"hello"}"#).unwrap();
        match msg {
            ClientMessage::Send { text } => assert_eq!(text, "hello"),
        }
    }

    #[test]
    fn server_messages_use_snake_case_tags() {
        let reply = ServerMessage::Reply {
            role: "model".to_string(),
            text: "hi".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&reply).unwrap(),
            r#"{"type":"reply","role":"model","text":"hi"}"#
        );
        assert_eq!(
            serde_json::to_string(&ServerMessage::PanelOpened).unwrap(),
            r#"{"type":"panel_opened"}"#
        );
    }
}
