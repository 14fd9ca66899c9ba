//! # SRT Options
//!
//! Socket option layer of the **S**ecure **R**eliable **T**ransport protocol.
//!
//! Every SRT socket carries typed, named options. This crate:
//!
//! - **Validates** writes against a static descriptor table (phase, size, range)
//! - **Stores** per-socket values with listener-to-accepted inheritance
//! - **Propagates** negotiable options through aligned handshake extension blocks
//!
//! Congestion control, ARQ, encryption and UDP I/O live elsewhere and meet this
//! crate through [`LiveConnection`] and [`HandshakeHooks`].
//!
//! ## Feature Flags
//!
//! - `extensions` (default): handshake extension codec and peer negotiation
//!
//! ## Modules
//!
//! - [`core`]: Core traits, constants, and error types (always included)
//! - [`options`]: Option registry and validation engine
//! - [`config`]: Per-socket state, lifecycle, inheritance, and profiles
//! - [`extensions`]: Handshake extension codec (requires `extensions` feature)
//!
//! ## Example Usage
//!
//! ```rust
//! use srt_options::prelude::*;
//! use std::time::Duration;
//!
//! let listener = SocketConfig::new();
//! listener.set(OptionId::Latency, Duration::from_millis(200)).unwrap();
//! listener.set_option("lossmaxttl", &4i32.to_ne_bytes()).unwrap();
//! listener.on_listen_freeze();
//!
//! let caller = SocketConfig::new();
//! caller.set_option("streamid", b"#!::r=live/cam1").unwrap();
//! let request = caller.encode_outbound_extension(Role::Caller);
//!
//! let accepted = listener.on_accept();
//! accepted.decode_inbound_extension(&request, Role::Responder).unwrap();
//!
//! let mut sid = [0u8; 512];
//! let len = accepted.get_option("streamid", &mut sid).unwrap();
//! assert_eq!(&sid[..len], b"#!::r=live/cam1");
//! assert_eq!(accepted.get(OptionId::MaxReorderTtl), OptionValue::Int32(4));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core module (always included)
pub mod core;

// Option registry
pub mod options;

// Per-socket configuration
pub mod config;

// Handshake extensions (feature-gated)
#[cfg(feature = "extensions")]
#[cfg_attr(docsrs, doc(cfg(feature = "extensions")))]
pub mod extensions;

/// Prelude module for convenient imports.
pub mod prelude {
    // Core traits and types
    pub use crate::core::*;

    pub use crate::config::{ConfigState, OptionProfile, Phase, SocketConfig};
    pub use crate::options::{OptionId, OptionKind, OptionValue};

    #[cfg(feature = "extensions")]
    pub use crate::extensions::{PeerOptions, apply_peer_extension};
}

// Re-export commonly used items at crate root
pub use crate::config::{ConfigState, Phase, SocketConfig};
pub use crate::core::{LiveConnection, OptionError, OptionResult, Role};
pub use crate::options::{OptionId, OptionValue};

#[cfg(feature = "extensions")]
pub use crate::core::HandshakeHooks;
