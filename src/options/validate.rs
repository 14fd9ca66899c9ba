//! Validation engine.
//!
//! Every application write goes through [`validate_and_set`]: phase gate,
//! length check, raw decode, semantic predicate, then storage with side
//! effects. A failed write never touches the state.

use std::time::Duration;

use tracing::{debug, trace};

use crate::config::ConfigState;
use crate::core::constants::{CONGESTION_FILE, CONGESTION_LIVE, DEFAULT_LINGER_SECS, LIVE_PAYLOAD_SIZE};
use crate::core::{OptionError, OptionResult};

use super::descriptor::{OptionDescriptor, TRANSTYPE_FILE, TRANSTYPE_LIVE};
use super::id::OptionId;
use super::value::{OptionKind, OptionValue};

/// Resolve an option name or alias.
pub fn resolve_name(name: &str) -> OptionResult<OptionId> {
    OptionId::from_name(name).ok_or_else(|| OptionError::UnknownOption(name.to_string()))
}

/// Resolve a raw numeric (`SRTO_*`) id.
pub fn resolve_raw(raw: i32) -> OptionResult<OptionId> {
    OptionId::from_raw(raw).ok_or_else(|| OptionError::UnknownOption(raw.to_string()))
}

/// Validate `raw` and store it as the value of `id`.
///
/// Returns the number of bytes consumed.
pub fn validate_and_set(state: &mut ConfigState, id: OptionId, raw: &[u8]) -> OptionResult<usize> {
    set_tracked(state, id, raw)?;
    Ok(raw.len())
}

/// Typed form of [`validate_and_set`].
///
/// The value is converted to its raw form and runs through the same pipeline.
pub fn validate_and_set_value(
    state: &mut ConfigState,
    id: OptionId,
    value: &OptionValue,
) -> OptionResult<()> {
    set_value_tracked(state, id, value).map(|_| ())
}

/// Name-based form of [`validate_and_set`].
pub fn set_by_name(state: &mut ConfigState, name: &str, raw: &[u8]) -> OptionResult<usize> {
    validate_and_set(state, resolve_name(name)?, raw)
}

/// Read the raw form of `id` into a fresh buffer.
///
/// Fails with `InvalidLength` only if `capacity` is below the stored size.
/// The returned buffer holds exactly the stored size.
pub fn validate_and_get(state: &ConfigState, id: OptionId, capacity: usize) -> OptionResult<Vec<u8>> {
    let raw = effective_value(state, id).to_raw();
    if capacity < raw.len() {
        return Err(OptionError::InvalidLength {
            option: id.name(),
            expected: raw.len(),
            actual: capacity,
        });
    }
    Ok(raw)
}

/// Read the raw form of `id` into `buf` and return its length.
///
/// Bytes of `buf` past the returned length are left untouched.
pub fn get_into(state: &ConfigState, id: OptionId, buf: &mut [u8]) -> OptionResult<usize> {
    let raw = validate_and_get(state, id, buf.len())?;
    buf[..raw.len()].copy_from_slice(&raw);
    Ok(raw.len())
}

/// Name-based form of [`validate_and_get`].
pub fn get_by_name(state: &ConfigState, name: &str, capacity: usize) -> OptionResult<Vec<u8>> {
    validate_and_get(state, resolve_name(name)?, capacity)
}

/// Value reported for `id`.
///
/// `latency` is write-only storage for its fan-out and reads back the
/// receiver latency.
pub fn effective_value(state: &ConfigState, id: OptionId) -> &OptionValue {
    match id {
        OptionId::Latency => state.value(OptionId::RecvLatency),
        _ => state.value(id),
    }
}

/// Validate and store, returning every option whose stored value changed.
pub(crate) fn set_tracked(
    state: &mut ConfigState,
    id: OptionId,
    raw: &[u8],
) -> OptionResult<Vec<OptionId>> {
    let desc = id.descriptor();

    if !desc.phases.contains(state.phase()) {
        debug!(option = desc.name, phase = ?state.phase(), "rejected set in locked phase");
        return Err(OptionError::InvalidPhase {
            option: desc.name,
            phase: state.phase(),
        });
    }

    check_length(desc, raw.len())?;
    let value = decode_raw(desc, raw)?;

    (desc.validate)(&value, state).map_err(|reason| OptionError::InvalidValue {
        option: desc.name,
        reason,
    })?;

    let changed = apply(state, id, value);
    debug!(option = desc.name, len = raw.len(), changed = changed.len(), "option set");
    Ok(changed)
}

/// Typed form of [`set_tracked`].
pub(crate) fn set_value_tracked(
    state: &mut ConfigState,
    id: OptionId,
    value: &OptionValue,
) -> OptionResult<Vec<OptionId>> {
    let desc = id.descriptor();
    if value.kind() != desc.kind {
        return Err(OptionError::InvalidValue {
            option: desc.name,
            reason: "value kind does not match option",
        });
    }
    if let OptionValue::Duration(d) = value {
        if d.as_millis() > i32::MAX as u128 {
            return Err(OptionError::InvalidValue {
                option: desc.name,
                reason: "duration exceeds 32-bit milliseconds",
            });
        }
    }
    set_tracked(state, id, &value.to_raw())
}

fn check_length(desc: &OptionDescriptor, len: usize) -> OptionResult<()> {
    let ok = match desc.kind.fixed_size() {
        Some(size) => len == size,
        None => len <= desc.max_len,
    };
    if ok {
        Ok(())
    } else {
        Err(OptionError::InvalidLength {
            option: desc.name,
            expected: desc.max_len,
            actual: len,
        })
    }
}

/// Decode a length-checked raw buffer in native byte order.
fn decode_raw(desc: &OptionDescriptor, raw: &[u8]) -> OptionResult<OptionValue> {
    let invalid = |reason: &'static str| OptionError::InvalidValue {
        option: desc.name,
        reason,
    };

    let value = match desc.kind {
        OptionKind::Bool => OptionValue::Bool(ne_i32(raw) != 0),
        OptionKind::Int32 => OptionValue::Int32(ne_i32(raw)),
        OptionKind::Int64 => OptionValue::Int64(ne_i64(raw)),
        OptionKind::Duration => {
            let ms = ne_i32(raw);
            let ms = u64::try_from(ms).map_err(|_| invalid("negative duration"))?;
            OptionValue::Duration(Duration::from_millis(ms))
        }
        OptionKind::Enum => {
            let v = ne_i32(raw);
            if desc.variant_name(v).is_none() {
                return Err(invalid("unknown discriminant"));
            }
            OptionValue::Enum(v)
        }
        OptionKind::Bytes => OptionValue::Bytes(raw.to_vec()),
    };
    Ok(value)
}

fn ne_i32(raw: &[u8]) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&raw[..4]);
    i32::from_ne_bytes(bytes)
}

fn ne_i64(raw: &[u8]) -> i64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&raw[..8]);
    i64::from_ne_bytes(bytes)
}

/// Store a validated value with its side effects.
fn apply(state: &mut ConfigState, id: OptionId, value: OptionValue) -> Vec<OptionId> {
    let mut changes = Vec::new();
    let mut put = |state: &mut ConfigState, id: OptionId, value: OptionValue| {
        if state.store(id, value) {
            changes.push(id);
        }
    };

    match id {
        OptionId::Latency => {
            put(state, OptionId::RecvLatency, value.clone());
            put(state, OptionId::PeerLatency, value.clone());
            put(state, OptionId::Latency, value);
        }
        OptionId::TransType => {
            let mode = value.as_i64();
            put(state, OptionId::TransType, value);
            for (option, v) in transtype_profile(mode) {
                trace!(option = %option, "transtype side effect");
                put(state, option, v);
            }
        }
        _ => put(state, id, value),
    }
    changes
}

/// Options forced by selecting a transmission type.
fn transtype_profile(mode: Option<i64>) -> Vec<(OptionId, OptionValue)> {
    match mode {
        Some(m) if m == i64::from(TRANSTYPE_LIVE) => vec![
            (OptionId::TsbpdMode, OptionValue::Bool(true)),
            (OptionId::TooLatePacketDrop, OptionValue::Bool(true)),
            (OptionId::SendDropDelay, OptionValue::Int32(0)),
            (OptionId::MessageApi, OptionValue::Bool(true)),
            (OptionId::NakReport, OptionValue::Bool(true)),
            (OptionId::PayloadSize, OptionValue::Int32(LIVE_PAYLOAD_SIZE)),
            (OptionId::Linger, OptionValue::Int32(0)),
            (OptionId::Congestion, OptionValue::from(CONGESTION_LIVE)),
        ],
        Some(m) if m == i64::from(TRANSTYPE_FILE) => vec![
            (OptionId::TsbpdMode, OptionValue::Bool(false)),
            (OptionId::RecvLatency, OptionValue::Duration(Duration::ZERO)),
            (OptionId::PeerLatency, OptionValue::Duration(Duration::ZERO)),
            (OptionId::TooLatePacketDrop, OptionValue::Bool(false)),
            (OptionId::SendDropDelay, OptionValue::Int32(-1)),
            (OptionId::MessageApi, OptionValue::Bool(false)),
            (OptionId::NakReport, OptionValue::Bool(false)),
            (OptionId::PayloadSize, OptionValue::Int32(0)),
            (OptionId::Linger, OptionValue::Int32(DEFAULT_LINGER_SECS)),
            (OptionId::Congestion, OptionValue::from(CONGESTION_FILE)),
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Phase;

    fn i32_raw(v: i32) -> [u8; 4] {
        v.to_ne_bytes()
    }

    #[test]
    fn test_fixed_length_must_match_exactly() {
        let mut state = ConfigState::new();

        for bad in [&[0u8; 2][..], &[0u8; 4][..], &[0u8; 12][..]] {
            let err = validate_and_set(&mut state, OptionId::MinInputBandwidth, bad).unwrap_err();
            assert!(matches!(err, OptionError::InvalidLength { expected: 8, .. }));
        }
        assert_eq!(state.value(OptionId::MinInputBandwidth), &OptionValue::Int64(0));

        let n = validate_and_set(&mut state, OptionId::MinInputBandwidth, &200i64.to_ne_bytes())
            .unwrap();
        assert_eq!(n, 8);
        assert_eq!(state.value(OptionId::MinInputBandwidth), &OptionValue::Int64(200));
    }

    #[test]
    fn test_byte_string_limits() {
        let mut state = ConfigState::new();

        assert_eq!(validate_and_set(&mut state, OptionId::StreamId, &[b'x'; 512]).unwrap(), 512);
        let err = validate_and_set(&mut state, OptionId::StreamId, &[b'x'; 513]).unwrap_err();
        assert_eq!(
            err,
            OptionError::InvalidLength {
                option: "stream_id",
                expected: 512,
                actual: 513
            }
        );
        assert_eq!(state.value(OptionId::StreamId).raw_len(), 512);

        // Empty and embedded nulls are fine
        validate_and_set(&mut state, OptionId::StreamId, b"").unwrap();
        validate_and_set(&mut state, OptionId::StreamId, b"a\0b").unwrap();
        assert_eq!(validate_and_get(&state, OptionId::StreamId, 3).unwrap(), b"a\0b");
    }

    #[test]
    fn test_phase_gating() {
        let mut state = ConfigState::new();
        state.set_phase(Phase::PreConnect);

        let err = validate_and_set(&mut state, OptionId::Mss, &i32_raw(1400)).unwrap_err();
        assert!(matches!(err, OptionError::InvalidPhase { option: "mss", .. }));

        state.set_phase(Phase::Connected);
        assert!(validate_and_set(&mut state, OptionId::StreamId, b"late").is_err());
        validate_and_set(&mut state, OptionId::MaxBandwidth, &1_000_000i64.to_ne_bytes()).unwrap();

        // Read-only in every phase
        for phase in [Phase::PreBind, Phase::PreConnect, Phase::Connected] {
            state.set_phase(phase);
            assert!(matches!(
                validate_and_set(&mut state, OptionId::PeerVersion, &i32_raw(1)),
                Err(OptionError::InvalidPhase { .. })
            ));
        }
    }

    #[test]
    fn test_invalid_values_leave_state_unchanged() {
        let mut state = ConfigState::new();

        let cases: &[(OptionId, Vec<u8>)] = &[
            (OptionId::MaxBandwidth, (-2i64).to_ne_bytes().to_vec()),
            (OptionId::InputBandwidth, (-1i64).to_ne_bytes().to_vec()),
            (OptionId::MinInputBandwidth, (-1i64).to_ne_bytes().to_vec()),
            (OptionId::Mss, i32_raw(75).to_vec()),
            (OptionId::IpTtl, i32_raw(0).to_vec()),
            (OptionId::TransType, i32_raw(7).to_vec()),
            (OptionId::RecvLatency, i32_raw(-5).to_vec()),
            (OptionId::PayloadSize, i32_raw(1457).to_vec()),
            (OptionId::Congestion, b"cubic".to_vec()),
        ];

        for (id, raw) in cases {
            let before = state.clone();
            let err = validate_and_set(&mut state, *id, raw).unwrap_err();
            assert!(matches!(err, OptionError::InvalidValue { .. }), "{id}: {err}");
            assert_eq!(state, before, "{id} mutated state");
        }
    }

    #[test]
    fn test_payload_limit_follows_mss() {
        let mut state = ConfigState::new();
        validate_and_set(&mut state, OptionId::Mss, &i32_raw(1000)).unwrap();
        assert!(validate_and_set(&mut state, OptionId::PayloadSize, &i32_raw(957)).is_err());
        validate_and_set(&mut state, OptionId::PayloadSize, &i32_raw(956)).unwrap();
    }

    #[test]
    fn test_bandwidth_sentinels() {
        let mut state = ConfigState::new();
        assert_eq!(
            validate_and_get(&state, OptionId::MinInputBandwidth, 8).unwrap(),
            0i64.to_ne_bytes()
        );
        validate_and_set(&mut state, OptionId::MaxBandwidth, &0i64.to_ne_bytes()).unwrap();
        validate_and_set(&mut state, OptionId::MaxBandwidth, &(-1i64).to_ne_bytes()).unwrap();
        // Independent slots
        assert_eq!(state.value(OptionId::InputBandwidth), &OptionValue::Int64(0));
    }

    #[test]
    fn test_get_capacity() {
        let mut state = ConfigState::new();
        validate_and_set(&mut state, OptionId::StreamId, b"abcde").unwrap();

        assert!(matches!(
            validate_and_get(&state, OptionId::StreamId, 4),
            Err(OptionError::InvalidLength { expected: 5, actual: 4, .. })
        ));
        assert_eq!(validate_and_get(&state, OptionId::StreamId, 512).unwrap(), b"abcde");

        let mut buf = [0xAAu8; 8];
        assert_eq!(get_into(&state, OptionId::StreamId, &mut buf).unwrap(), 5);
        assert_eq!(&buf, b"abcde\xAA\xAA\xAA");

        assert!(validate_and_get(&state, OptionId::MaxBandwidth, 4).is_err());
        assert_eq!(validate_and_get(&state, OptionId::MaxBandwidth, 100).unwrap().len(), 8);
    }

    #[test]
    fn test_latency_fans_out() {
        let mut state = ConfigState::new();
        let changed = set_tracked(&mut state, OptionId::Latency, &i32_raw(250)).unwrap();

        let expected = OptionValue::Duration(Duration::from_millis(250));
        assert_eq!(state.value(OptionId::RecvLatency), &expected);
        assert_eq!(state.value(OptionId::PeerLatency), &expected);
        assert!(state.is_explicit(OptionId::PeerLatency));
        assert!(changed.contains(&OptionId::RecvLatency));
        assert_eq!(validate_and_get(&state, OptionId::Latency, 4).unwrap(), i32_raw(250));

        validate_and_set(&mut state, OptionId::RecvLatency, &i32_raw(80)).unwrap();
        assert_eq!(validate_and_get(&state, OptionId::Latency, 4).unwrap(), i32_raw(80));
    }

    #[test]
    fn test_transtype_file_profile() {
        let mut state = ConfigState::new();
        validate_and_set(&mut state, OptionId::TransType, &i32_raw(TRANSTYPE_FILE)).unwrap();

        assert_eq!(state.value(OptionId::TsbpdMode), &OptionValue::Bool(false));
        assert_eq!(state.value(OptionId::TooLatePacketDrop), &OptionValue::Bool(false));
        assert_eq!(state.value(OptionId::RecvLatency), &OptionValue::Duration(Duration::ZERO));
        assert_eq!(state.value(OptionId::SendDropDelay), &OptionValue::Int32(-1));
        assert_eq!(state.value(OptionId::MessageApi), &OptionValue::Bool(false));
        assert_eq!(state.value(OptionId::PayloadSize), &OptionValue::Int32(0));
        assert_eq!(state.value(OptionId::Linger), &OptionValue::Int32(180));
        assert_eq!(state.value(OptionId::Congestion), &OptionValue::from("file"));
        assert!(state.is_explicit(OptionId::Congestion));

        validate_and_set(&mut state, OptionId::TransType, &i32_raw(TRANSTYPE_LIVE)).unwrap();
        assert_eq!(state.value(OptionId::PayloadSize), &OptionValue::Int32(1316));
        assert_eq!(state.value(OptionId::Linger), &OptionValue::Int32(0));
        assert_eq!(state.value(OptionId::Congestion), &OptionValue::from("live"));
    }

    #[test]
    fn test_typed_set() {
        let mut state = ConfigState::new();
        validate_and_set_value(&mut state, OptionId::MaxReorderTtl, &OptionValue::Int32(5)).unwrap();
        validate_and_set_value(&mut state, OptionId::RecvSync, &OptionValue::Bool(false)).unwrap();
        assert_eq!(state.value(OptionId::RecvSync), &OptionValue::Bool(false));

        let err = validate_and_set_value(&mut state, OptionId::MaxBandwidth, &OptionValue::Int32(5))
            .unwrap_err();
        assert!(matches!(err, OptionError::InvalidValue { .. }));

        let huge = OptionValue::Duration(Duration::from_secs(30 * 24 * 3600));
        assert!(validate_and_set_value(&mut state, OptionId::ConnectTimeout, &huge).is_err());
        assert_eq!(
            state.value(OptionId::ConnectTimeout),
            &OptionValue::Duration(Duration::from_millis(3000))
        );
    }

    #[test]
    fn test_name_lookup() {
        let mut state = ConfigState::new();
        set_by_name(&mut state, "lossmaxttl", &i32_raw(9)).unwrap();
        assert_eq!(get_by_name(&state, "max_reorder_ttl", 4).unwrap(), i32_raw(9));

        assert_eq!(
            set_by_name(&mut state, "nosuch", &[]).unwrap_err(),
            OptionError::UnknownOption("nosuch".into())
        );
        assert!(matches!(resolve_raw(3), Err(OptionError::UnknownOption(_))));
        assert_eq!(resolve_raw(46).unwrap(), OptionId::StreamId);
    }

    #[test]
    fn test_bool_accepts_any_nonzero() {
        let mut state = ConfigState::new();
        validate_and_set(&mut state, OptionId::Rendezvous, &i32_raw(7)).unwrap();
        assert_eq!(validate_and_get(&state, OptionId::Rendezvous, 4).unwrap(), i32_raw(1));
    }
}
