//! Quicktag parsing.
//!
//! A quicktag packs a record tag into one string:
//!
//! ```text
//! TypeName_ModuleLabel[_InstanceName[_ProcessName]]
//! ```
//!
//! `gm2calo::CrystalHitArtRecords_islandFitterDAQ_fitter` becomes the type
//! descriptor `ROOT.vector(ROOT.gm2calo.CrystalHitArtRecord)` with module
//! label `islandFitterDAQ` and instance `fitter`.
//!
//! A type name ending in `s` is read as a collection of the name without that
//! `s`. This is a naming convention, not a pluralizer: irregular plurals and
//! single types that happen to end in `s` come out wrong. `art::TriggerResults`
//! is the one listed exception.
//!
//! Only one `s` is removed, so `ns::Hitss` is a collection of `ns::Hits`.
//! Earlier heist versions stripped every trailing `s` and read it as `ns::Hit`.

use crate::error::{HeistError, Result};
use crate::types::{COLLECTION_CTOR, ROOT_NAMESPACE};

/// Canonical descriptor of the trigger results record, never pluralized.
pub const TRIGGER_RESULTS: &str = "ROOT.art.TriggerResults";

/// The four fields of a parsed quicktag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuicktagFields {
    pub type_descriptor: String,
    pub module_label: String,
    pub instance: String,
    pub process: String,
}

/// Split a quicktag into a type descriptor and tag fields.
///
/// Trailing dots (as found on branch names) are ignored.
pub fn convert_quicktag(quicktag: &str) -> Result<QuicktagFields> {
    let trimmed = quicktag.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(HeistError::quicktag(
            quicktag,
            "you must specify at least TYPE and MODULE LABEL",
        ));
    }

    let fields: Vec<&str> = trimmed.split('_').collect();
    let (type_name, module_label, instance, process) = match fields.as_slice() {
        [t, m] => (*t, *m, "", ""),
        [t, m, i] => (*t, *m, *i, ""),
        [t, m, i, p] => (*t, *m, *i, *p),
        [_] => {
            return Err(HeistError::quicktag(
                quicktag,
                "you must specify at least TYPE and MODULE LABEL",
            ))
        }
        _ => {
            return Err(HeistError::quicktag(
                quicktag,
                format!("expected at most 4 '_'-separated fields, got {}", fields.len()),
            ))
        }
    };

    if type_name.is_empty() || module_label.is_empty() {
        return Err(HeistError::quicktag(
            quicktag,
            "TYPE and MODULE LABEL must not be empty",
        ));
    }

    Ok(QuicktagFields {
        type_descriptor: quicktag_type_descriptor(type_name),
        module_label: module_label.to_string(),
        instance: instance.to_string(),
        process: process.to_string(),
    })
}

/// Turn the type field of a quicktag into a canonical type descriptor.
pub fn quicktag_type_descriptor(type_name: &str) -> String {
    let dotted = type_name.replace("::", ".");
    let prefix = format!("{}.", ROOT_NAMESPACE);
    let prefixed = if dotted.starts_with(&prefix) {
        dotted
    } else {
        format!("{}{}", prefix, dotted)
    };

    match prefixed.strip_suffix('s') {
        Some(element) if prefixed != TRIGGER_RESULTS => {
            format!("{}{}({})", prefix, COLLECTION_CTOR, element)
        }
        _ => prefixed,
    }
}
