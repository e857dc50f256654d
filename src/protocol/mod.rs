//! Message Protocol module
//!
//! Wire envelopes, batch framing, and the typed request union that
//! per-action payload validation produces.

mod envelope;
mod request;

pub use envelope::{Envelope, Frame, Reply, Response};
pub use request::{action, Request};
