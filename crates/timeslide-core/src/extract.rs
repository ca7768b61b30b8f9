#![forbid(unsafe_code)]

//! Time extraction.
//!
//! Looks the configured field up in an item's properties bag first and in
//! its options bag second. The first present, non-null value wins; no type
//! coercion happens here.

use crate::item::TimedItem;
use crate::value::MetaValue;

/// Default name of the time field.
pub const DEFAULT_TIME_FIELD: &str = "time";

/// Raw time value of `item` under `field`, if any.
pub fn extract<'a, I: TimedItem + ?Sized>(item: &'a I, field: &str) -> Option<&'a MetaValue> {
    let lookup = |bag: Option<&'a crate::value::Metadata>| {
        bag.and_then(|bag| bag.get(field)).filter(|v| !v.is_null())
    };
    lookup(item.properties()).or_else(|| lookup(item.options()))
}
