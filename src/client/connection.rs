use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::time::Instant;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::models::{ClientEvent, PingMessage, ServerEvent};
use super::editor::EditorView;
use super::generate_document_id;
use super::throttle::{ChangeThrottle, DEFAULT_CHANGE_INTERVAL};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection state as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    ConnectionError(String),
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "Connected"),
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
            ConnectionStatus::ConnectionError(_) => write!(f, "Connection Error"),
        }
    }
}

#[derive(Debug)]
pub enum ClientError {
    /// The connection could not be opened or broke
    Transport(String),
    /// The server sent something that is not a known event
    Protocol(String),
}

impl ClientError {
    pub fn status(&self) -> ConnectionStatus {
        match self {
            ClientError::Transport(e) => ConnectionStatus::ConnectionError(e.clone()),
            ClientError::Protocol(_) => ConnectionStatus::Connected,
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "Could not reach server: {}", e),
            ClientError::Protocol(e) => write!(f, "Unexpected message from server: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

/// One client connection to the document server.
///
/// Keeps the local view in step with server events. Local edits go out
/// through a [`ChangeThrottle`]; whatever it holds back is sent while the
/// caller waits in [`DocClient::next_event`] or [`DocClient::flush_changes`].
pub struct DocClient {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
    document_id: String,
    status: ConnectionStatus,
    view: EditorView,
    throttle: ChangeThrottle,
}

impl DocClient {
    /// Connect to `url` and join a document straight away.
    ///
    /// `locator` is the id taken from the page address. Without one a fresh
    /// id is generated, which creates a new document on the server.
    pub async fn connect(url: &str, locator: Option<&str>) -> Result<Self, ClientError> {
        let (ws, _response) = connect_async(url).await.map_err(|e| {
            warn!("Could not connect to {}: {}", url, e);
            ClientError::from(e)
        })?;
        info!("Connected to {}", url);

        let (sink, stream) = ws.split();
        let document_id = match locator.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => generate_document_id(),
        };
        let mut client = Self {
            sink,
            stream,
            document_id: String::new(),
            status: ConnectionStatus::Connected,
            view: EditorView::default(),
            throttle: ChangeThrottle::new(DEFAULT_CHANGE_INTERVAL),
        };
        client.join(&document_id).await?;
        Ok(client)
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    pub fn view(&self) -> &EditorView {
        &self.view
    }

    /// Switch to `document_id`. The server answers with `load-document`.
    ///
    /// Unsent edits of the previous document are dropped and the view stays
    /// empty until the new content has loaded.
    pub async fn join(&mut self, document_id: &str) -> Result<(), ClientError> {
        if let Some(unsent) = self.throttle.discard() {
            debug!("Dropping {} unsent bytes for document {}", unsent.len(), self.document_id);
        }
        self.view.switch_document();
        self.document_id = document_id.to_string();
        self.send(&ClientEvent::join_document(document_id)).await
    }

    /// Switch to a freshly generated document and return its id
    pub async fn new_document(&mut self) -> Result<String, ClientError> {
        let id = generate_document_id();
        self.join(&id).await?;
        Ok(id)
    }

    /// Record a keystroke. The content is sent now or once the throttle
    /// interval has passed, whichever the rate allows.
    pub async fn local_edit(&mut self, content: &str) -> Result<(), ClientError> {
        let now = Instant::now();
        self.view.local_edit(content, now);
        match self.throttle.offer(content, now) {
            Some(ready) => self.send_changes(&ready).await,
            None => Ok(()),
        }
    }

    /// Wait until held-back edits are due and send them
    pub async fn flush_changes(&mut self) -> Result<(), ClientError> {
        while let Some(at) = self.throttle.next_deadline() {
            tokio::time::sleep_until(at.into()).await;
            self.send_due_changes().await?;
        }
        Ok(())
    }

    /// Send `content` right away, bypassing the throttle
    pub async fn send_changes(&mut self, content: &str) -> Result<(), ClientError> {
        let event = ClientEvent::send_changes(self.document_id.as_str(), content);
        self.send(&event).await
    }

    pub async fn ping(&mut self) -> Result<(), ClientError> {
        self.send(&ClientEvent::Ping(PingMessage {})).await
    }

    /// Wait for the next server event and apply it to the view. `None` once
    /// the server has closed. Held-back edits are sent while waiting.
    pub async fn next_event(&mut self) -> Result<Option<ServerEvent>, ClientError> {
        loop {
            let deadline = self.throttle.next_deadline();
            let due = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at.into()).await,
                    None => std::future::pending::<()>().await,
                }
            };
            let received = tokio::select! {
                msg = self.stream.next() => Some(msg),
                _ = due => None,
            };
            let Some(msg) = received else {
                self.send_due_changes().await?;
                continue;
            };

            match msg {
                Some(Ok(Message::Text(text))) => {
                    let event = serde_json::from_str(text.as_str())
                        .map_err(|e| ClientError::Protocol(e.to_string()))?;
                    self.view.apply(&event, Instant::now());
                    return Ok(Some(event));
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!("Server closed connection: {:?}", frame);
                    break;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    self.status = ConnectionStatus::Disconnected;
                    return Err(e.into());
                }
                None => break,
            }
        }
        self.status = ConnectionStatus::Disconnected;
        Ok(None)
    }

    pub async fn close(mut self) -> Result<(), ClientError> {
        self.status = ConnectionStatus::Disconnected;
        self.sink.send(Message::Close(None)).await?;
        Ok(())
    }

    async fn send_due_changes(&mut self) -> Result<(), ClientError> {
        match self.throttle.poll(Instant::now()) {
            Some(content) => self.send_changes(&content).await,
            None => Ok(()),
        }
    }

    async fn send(&mut self, event: &ClientEvent) -> Result<(), ClientError> {
        let text = serde_json::to_string(event).map_err(|e| ClientError::Protocol(e.to_string()))?;
        if let Err(e) = self.sink.send(Message::text(text)).await {
            self.status = ConnectionStatus::Disconnected;
            return Err(e.into());
        }
        Ok(())
    }
}
