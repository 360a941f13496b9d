//! The chat relay: intake, stream folding, and status polling.

pub mod intake;
pub mod status;
pub mod stream;
pub mod throttle;
