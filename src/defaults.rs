//! Default-value propagation.
//!
//! Runs once per value set after the catalog is assembled: global records
//! first, then every project override. Only absent canonical slots are
//! filled; alias slots are left alone because an alias falls back to its
//! target lazily, at resolution time.

use crate::environment::Environment;
use crate::record::ValueSet;

/// Fill every absent canonical slot from the declared default. Idempotent.
pub fn propagate_defaults(values: &mut ValueSet) {
    let Some(default) = values.default.clone() else {
        return;
    };
    for env in Environment::ALL {
        let slot = values.slot_mut(env);
        if slot.is_none() {
            *slot = Some(default.clone());
        }
    }
}

/// Give an override without its own default the parent's default.
pub fn inherit_default(values: &mut ValueSet, parent_default: Option<&str>) {
    if values.default.is_none() {
        values.default = parent_default.map(str::to_string);
    }
}
