//! Server-Sent Events (SSE) infrastructure for real-time noticeboard updates.
//!
//! This crate is the process-wide broadcast channel: every successful
//! mutation to announcements, campus events, or timetable entries is fanned
//! out to all currently connected browser sessions.
//!
//! # Architecture
//!
//! - **Explicit instance, no globals**: one `Manager` is constructed at
//!   process start and threaded (via application state) to everything that
//!   publishes or subscribes. Tests construct their own.
//! - **Registry of session handles**: registration returns a `ConnectionId`
//!   so the web layer can deterministically unregister a session when its
//!   stream closes, even across reconnects.
//! - **Fire-and-forget fan-out**: events are ephemeral. Disconnected
//!   sessions get no backlog; they resynchronize with a bulk fetch on
//!   reconnect. Send failures are logged and swallowed.
//! - **FIFO per session**: each session has its own unbounded channel and
//!   fan-out is a synchronous walk of the registry, so a connected session
//!   observes events in publish order.
//! - **Type-safe events**: the wire format is a tagged union over
//!   resource kind and operation, so unhandled combinations fail to compile.
//!
//! # Modules
//!
//! - `connection`: ConnectionRegistry and the ConnectionId session handle
//! - `manager`: registration lifecycle and broadcast entry point
//! - `message`: wire event definitions
//! - `domain_event_handler`: bridge from `events::DomainEvent` to the wire

pub mod connection;
pub mod domain_event_handler;
pub mod manager;
pub mod message;

pub use manager::Manager;
