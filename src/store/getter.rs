//! Product getters.
//!
//! A getter is bound to one concrete type and fetches that type's product for
//! a tag from the current event.

use tracing::debug;

use super::EventData;
use crate::error::{HeistError, Result};
use crate::record::Record;
use crate::tag::InputTag;
use crate::types::{DecodeFn, Registry, TypeHandle};

/// Why a getter produced no record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("ProductNotFound")]
    NotFound,

    #[error("{0}")]
    Failed(String),
}

/// Fetches products of one type from an event.
pub trait ProductGetter: Send {
    /// The type this getter was created for.
    fn handle(&self) -> &TypeHandle;

    /// Fetch the product for `tag` from `event`.
    fn fetch(&self, event: &EventData, tag: &InputTag) -> std::result::Result<Record, FetchError>;
}

/// Getter that decodes a branch's JSON value with the type's decoder.
pub struct BranchGetter {
    handle: TypeHandle,
    decode: DecodeFn,
}

impl ProductGetter for BranchGetter {
    fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    fn fetch(&self, event: &EventData, tag: &InputTag) -> std::result::Result<Record, FetchError> {
        if tag.handle() != &self.handle {
            return Err(FetchError::Failed(format!(
                "getter for '{}' cannot fetch '{}'",
                self.handle.cpp_name(),
                tag.handle().cpp_name()
            )));
        }

        let (branch, value) = event.product(tag).ok_or(FetchError::NotFound)?;
        (self.decode)(value)
            .map_err(|e| FetchError::Failed(format!("failed to decode {}: {}", branch, e)))
    }
}

/// Create a [`BranchGetter`] for `handle`.
///
/// Fails unless the registry has a getter template declared for the type.
pub fn branch_getter(registry: &Registry, handle: &TypeHandle) -> Result<Box<dyn ProductGetter>> {
    let failed = |reason: &str| HeistError::GetterInstantiation {
        type_name: handle.cpp_name().to_string(),
        reason: reason.to_string(),
    };

    if !registry.is_declared(handle.cpp_name()) {
        return Err(failed("no getter template declared for this type"));
    }
    let decode = handle
        .decoder()
        .cloned()
        .ok_or_else(|| failed("type has no decoder"))?;

    debug!(type_name = %handle.cpp_name(), "created product getter");
    Ok(Box::new(BranchGetter {
        handle: handle.clone(),
        decode,
    }))
}
