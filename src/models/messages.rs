use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JoinDocumentMessage {
    pub document_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendChangesMessage {
    pub document_id: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PingMessage {}

/// Whole-document content pushed to a client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContentMessage {
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PongMessage {
    pub date: String,
}

/// Events a client sends over its connection
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "join-document")]
    JoinDocument(JoinDocumentMessage),
    #[serde(rename = "send-changes")]
    SendChanges(SendChangesMessage),
    #[serde(rename = "ping")]
    Ping(PingMessage),
}

/// Events the server pushes to a client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "load-document")]
    LoadDocument(ContentMessage),
    #[serde(rename = "receive-changes")]
    ReceiveChanges(ContentMessage),
    #[serde(rename = "pong")]
    Pong(PongMessage),
}

impl ServerEvent {
    pub fn load_document(content: impl Into<String>) -> Self {
        ServerEvent::LoadDocument(ContentMessage { content: content.into() })
    }

    pub fn receive_changes(content: impl Into<String>) -> Self {
        ServerEvent::ReceiveChanges(ContentMessage { content: content.into() })
    }
}

impl ClientEvent {
    pub fn join_document(document_id: impl Into<String>) -> Self {
        ClientEvent::JoinDocument(JoinDocumentMessage { document_id: document_id.into() })
    }

    pub fn send_changes(document_id: impl Into<String>, content: impl Into<String>) -> Self {
        ClientEvent::SendChanges(SendChangesMessage {
            document_id: document_id.into(),
            content: content.into(),
        })
    }
}
