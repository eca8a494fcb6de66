//! WebSocket Gateway
//!
//! Real-time communication via WebSocket connections.

pub mod gateway;
pub mod handler;
pub mod messages;
pub mod session;

pub use gateway::Gateway;
pub use handler::{process_frame, ws_handler};
pub use messages::{ClientFrame, ServerFrame};
pub use session::SessionState;
