//! Client side of the editing protocol.

pub mod connection;
pub mod editor;
pub mod throttle;

pub use connection::{ClientError, ConnectionStatus, DocClient};
pub use editor::{EditorView, DEFAULT_TYPING_DEBOUNCE};
pub use throttle::{ChangeThrottle, DEFAULT_CHANGE_INTERVAL};

use uuid::Uuid;

/// Short, URL-safe id for a new document
pub fn generate_document_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}
