//! Per-socket configuration.
//!
//! [`ConfigState`] is the plain value container; [`SocketConfig`] owns one
//! behind a lock and drives the socket lifecycle. Accepted sockets derive their
//! state from the listener through [`clone_for_accept`].

mod inherit;
mod profile;
mod socket;
mod state;

pub use inherit::clone_for_accept;
pub use profile::OptionProfile;
pub use socket::SocketConfig;
pub use state::{ConfigState, Phase};
