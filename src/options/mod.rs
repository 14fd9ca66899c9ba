//! Option registry and validation engine.
//!
//! | Module       | Contents                                             |
//! |--------------|------------------------------------------------------|
//! | `id`         | [`OptionId`], name and raw id lookup                 |
//! | `value`      | [`OptionKind`], [`OptionValue`]                      |
//! | `descriptor` | [`OptionDescriptor`] table, validators, wire rules   |
//! | `validate`   | set/get pipeline with side effects                   |

mod descriptor;
mod id;
mod validate;
mod value;

pub use descriptor::{
    Advertise, Combine, CombineRule, Direction, Inherit, OptionDescriptor, PhaseSet,
    TRANSTYPE_FILE, TRANSTYPE_LIVE, Validator, WireSpec,
};
pub use id::OptionId;
pub use validate::{
    effective_value, get_by_name, get_into, resolve_name, resolve_raw, set_by_name,
    validate_and_get, validate_and_set, validate_and_set_value,
};
pub use value::{Initial, OptionKind, OptionValue};

pub(crate) use validate::{set_tracked, set_value_tracked};
#[cfg(feature = "extensions")]
pub(crate) use value::duration_to_millis;
