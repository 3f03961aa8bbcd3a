//! Client-side synchronization core for the noticeboard.
//!
//! Each browser session keeps an in-memory mirror of every resource
//! collection (announcements, campus events, timetable entries) and keeps it
//! consistent with the server through a bulk fetch plus a live SSE event
//! stream. The event stream is not replayed after a disconnect, so every
//! reconnect forces a full refetch.
//!
//! Layering, bottom up:
//! - [`mirror`] holds the per-kind ordered document set and the apply rules.
//! - [`sync`] is the per-kind reconciliation state machine over the mirrors.
//! - [`fetch`] is the bulk-fetch boundary (trait plus the reqwest client).
//! - [`connection`] owns the SSE transport and its reconnect loop.
//! - [`session`] ties the above together for one browser session.

pub mod connection;
pub mod error;
pub mod fetch;
pub mod mirror;
pub mod session;
pub mod sync;

pub use connection::{ConnectionManager, Signal};
pub use error::Error;
pub use fetch::{ApiClient, BulkFetch};
pub use mirror::{Mirror, ResourceKind};
pub use session::{ConnectionState, Session};
pub use sync::{SyncEngine, SyncState};
