//! Document sessions and change propagation.
//!
//! ```text
//! connection ─▶ Session ──join/leave──▶ RoomRegistry ──get/put──▶ DocStore
//!                  │                          ▲
//!                  ├──edit──▶ BroadcastRouter ┘──▶ other sessions' channels
//!                  └──edit──▶ PersistQueue ──put (timeout, retry)──▶ DocStore
//! ```

pub mod broadcast;
pub mod handle;
pub mod persist;
pub mod registry;
pub mod session;

pub use broadcast::BroadcastRouter;
pub use handle::{EventSender, SessionHandle, SessionId};
pub use persist::PersistQueue;
pub use registry::{RoomRegistry, LOAD_ERROR_CONTENT};
pub use session::{Session, SessionError, SessionManager, SessionState};
