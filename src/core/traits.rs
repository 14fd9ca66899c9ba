//! Core traits for SRT socket options.
//!
//! These traits are the seams between the option layer and the excluded
//! connection machinery: the handshake state machine drives [`HandshakeHooks`],
//! and the protocol engine receives runtime changes through [`LiveConnection`].

use crate::options::{OptionId, OptionValue};

#[cfg(feature = "extensions")]
use super::error::OptionResult;

/// Which side of the handshake is producing or consuming an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Connecting side, sends the request.
    Caller,
    /// Accepted socket, sends the response.
    Responder,
}

impl Role {
    /// Role of the endpoint on the other side.
    pub fn peer(self) -> Self {
        match self {
            Role::Caller => Role::Responder,
            Role::Responder => Role::Caller,
        }
    }
}

/// Receiver of option changes that must reach a running connection.
///
/// Called after a runtime set on a connected socket and after negotiation
/// changes a value. Implementations must not call back into the socket's
/// configuration synchronously with a write.
///
/// # Example
///
/// ```ignore
/// struct Pacer { max_bw: AtomicI64 }
///
/// impl LiveConnection for Pacer {
///     fn apply_option(&self, option: OptionId, value: &OptionValue) {
///         if option == OptionId::MaxBandwidth {
///             if let Some(bw) = value.as_i64() {
///                 self.max_bw.store(bw, Ordering::Relaxed);
///             }
///         }
///     }
/// }
/// ```
pub trait LiveConnection: Send + Sync {
    /// Apply the new effective value of `option`.
    fn apply_option(&self, option: OptionId, value: &OptionValue);
}

/// Entry points invoked by the handshake state machine.
#[cfg(feature = "extensions")]
pub trait HandshakeHooks: Sized {
    /// The socket started listening; its configuration becomes the accept template.
    fn on_listen_freeze(&self);

    /// Derive the configuration of a newly accepted socket.
    fn on_accept(&self) -> Self;

    /// Build the extension area of an outbound handshake packet.
    fn encode_outbound_extension(&self, role: Role) -> Vec<u8>;

    /// Consume the extension area of an inbound handshake packet.
    ///
    /// `role` is the local role. An error that [`rejects_connection`] must
    /// abort the connection attempt.
    ///
    /// [`rejects_connection`]: crate::core::OptionError::rejects_connection
    fn decode_inbound_extension(&self, bytes: &[u8], role: Role) -> OptionResult<()>;
}
