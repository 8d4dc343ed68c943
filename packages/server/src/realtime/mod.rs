//! Real-time core: live connection state and event fan-out.
//!
//! Everything in this module is in-memory and exclusively owned by the
//! orchestration layer. Mutations never suspend; store I/O happens
//! outside these critical sections.

pub mod presence;
pub mod registry;
pub mod router;
pub mod typing;

pub use presence::PresenceTransition;
pub use registry::{ConnectionRegistry, Departure};
pub use router::BroadcastRouter;
pub use typing::TypingTracker;
