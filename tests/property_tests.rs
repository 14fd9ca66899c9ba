//! Property-based tests for SRT Options
//!
//! Uses proptest to verify invariants across large input spaces.

use proptest::prelude::*;

// ============================================================================
// Extension Block Properties
// ============================================================================

mod block_properties {
    use super::*;
    use srt_options::core::constants::{MAX_SID_LENGTH, ext_type};
    use srt_options::extensions::{ExtensionBlock, ExtensionSet, padded_len};

    proptest! {
        /// Declared length is the logical length, payload is padded to 4
        #[test]
        fn stream_id_block_layout(sid in prop::collection::vec(any::<u8>(), 0..=MAX_SID_LENGTH)) {
            let block = ExtensionBlock::new(ext_type::STREAM_ID, sid.clone()).unwrap();
            let wire = block.encode();

            prop_assert_eq!(wire.len() % 4, 0);
            prop_assert_eq!(wire.len(), 4 + padded_len(sid.len()));
            prop_assert_eq!(usize::from(u16::from_be_bytes([wire[2], wire[3]])), sid.len());
            prop_assert!(wire[4 + sid.len()..].iter().all(|&b| b == 0));
        }

        /// Padding content never reaches the decoded value
        #[test]
        fn padding_is_discarded(
            sid in prop::collection::vec(any::<u8>(), 0..=MAX_SID_LENGTH),
            junk in any::<u8>(),
        ) {
            let mut wire = ExtensionBlock::new(ext_type::STREAM_ID, sid.clone()).unwrap().encode();
            for b in &mut wire[4 + sid.len()..] {
                *b = junk;
            }

            let set = ExtensionSet::decode(&wire, |_| MAX_SID_LENGTH).unwrap();
            prop_assert_eq!(set.get(ext_type::STREAM_ID).unwrap().data(), &sid[..]);
        }

        /// Any declared length above the limit is an overflow
        #[test]
        fn oversized_declaration_rejected(declared in (MAX_SID_LENGTH + 1)..=usize::from(u16::MAX)) {
            let mut wire = ext_type::STREAM_ID.to_be_bytes().to_vec();
            wire.extend_from_slice(&(declared as u16).to_be_bytes());
            wire.resize(4 + padded_len(declared), b'x');

            let err = ExtensionSet::decode(&wire, |_| MAX_SID_LENGTH).unwrap_err();
            prop_assert!(err.rejects_connection());
        }
    }
}

// ============================================================================
// Configuration Properties
// ============================================================================

mod config_properties {
    use super::*;
    use srt_options::core::constants::MAX_SID_LENGTH;
    use srt_options::prelude::*;

    proptest! {
        /// Stream id survives set, handshake, and get at every length
        #[test]
        fn stream_id_roundtrip(sid in prop::collection::vec(any::<u8>(), 0..=MAX_SID_LENGTH)) {
            let caller = SocketConfig::new();
            prop_assert_eq!(caller.set_option("streamid", &sid).unwrap(), sid.len());

            let accepted = SocketConfig::new().on_accept();
            let wire = caller.encode_outbound_extension(Role::Caller);
            accepted.decode_inbound_extension(&wire, Role::Responder).unwrap();

            let got = accepted.get_raw(OptionId::StreamId, MAX_SID_LENGTH).unwrap();
            prop_assert_eq!(got, sid);
        }

        /// Reads fail only when the buffer is smaller than the stored value
        #[test]
        fn get_capacity(len in 0usize..=MAX_SID_LENGTH, capacity in 0usize..1024) {
            let config = SocketConfig::new();
            config.set_option("streamid", &vec![b's'; len]).unwrap();

            match config.get_raw(OptionId::StreamId, capacity) {
                Ok(raw) => {
                    prop_assert!(capacity >= len);
                    prop_assert_eq!(raw.len(), len);
                }
                Err(err) => {
                    prop_assert!(capacity < len);
                    let is_length = matches!(err, OptionError::InvalidLength { .. });
                    prop_assert!(is_length);
                }
            }
        }

        /// Negative bandwidths other than the unlimited sentinel never stick
        #[test]
        fn max_bandwidth_rejects_below_sentinel(bw in i64::MIN..-1) {
            let config = SocketConfig::new();
            prop_assert!(config.set(OptionId::MaxBandwidth, bw).is_err());
            prop_assert_eq!(config.get(OptionId::MaxBandwidth), OptionValue::Int64(-1));
        }

        /// Negotiated latency is the maximum of both sides, on both sides
        #[test]
        fn latency_is_symmetric_max(a in 0u64..10_000, b in 0u64..10_000) {
            use std::time::Duration;

            let listener = SocketConfig::new();
            listener.set(OptionId::Latency, Duration::from_millis(a)).unwrap();
            listener.on_listen_freeze();
            let caller = SocketConfig::new();
            caller.set(OptionId::Latency, Duration::from_millis(b)).unwrap();

            let accepted = listener.on_accept();
            accepted
                .decode_inbound_extension(&caller.encode_outbound_extension(Role::Caller), Role::Responder)
                .unwrap();
            caller
                .decode_inbound_extension(&accepted.encode_outbound_extension(Role::Responder), Role::Caller)
                .unwrap();

            let expected = OptionValue::Duration(Duration::from_millis(a.max(b)));
            prop_assert_eq!(accepted.get(OptionId::RecvLatency), expected.clone());
            prop_assert_eq!(caller.get(OptionId::RecvLatency), expected);
        }
    }
}
