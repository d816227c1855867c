//! Retrieved data products.
//!
//! A [`Record`] is one decoded product from the current event. Its value is
//! stored type-erased and recovered with [`Record::downcast_ref`] or
//! [`Record::into_inner`] using the Rust type registered for its descriptor.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A decoded data product.
pub struct Record {
    type_name: Arc<str>,
    len: Option<usize>,
    value: Box<dyn Any + Send>,
}

impl Record {
    /// Wrap a decoded value.
    ///
    /// `len` is the element count for collections and `None` for single
    /// elements.
    pub fn new<T: Any + Send>(type_name: Arc<str>, value: T, len: Option<usize>) -> Self {
        Self {
            type_name,
            len,
            value: Box::new(value),
        }
    }

    /// C++ name of the stored type, e.g. `vector<gm2calo::CrystalHitArtRecord>`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Element count, if the product is a collection.
    pub fn len(&self) -> Option<usize> {
        self.len
    }

    /// True for collections with zero elements.
    pub fn is_empty(&self) -> bool {
        self.len == Some(0)
    }

    pub fn is_collection(&self) -> bool {
        self.len.is_some()
    }

    /// Borrow the value as `T`, or `None` if `T` is not the decoded type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Take the value as `T`, handing the record back if `T` does not match.
    pub fn into_inner<T: Any>(self) -> std::result::Result<T, Self> {
        let Record {
            type_name,
            len,
            value,
        } = self;
        match value.downcast::<T>() {
            Ok(v) => Ok(*v),
            Err(value) => Err(Record {
                type_name,
                len,
                value,
            }),
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("type_name", &self.type_name)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// Outcome of looking up one record at the current event.
///
/// [`crate::Event::get_record`] collapses everything except `Found` into
/// "absent"; [`crate::Event::lookup`] keeps the outcomes apart.
#[derive(Debug)]
pub enum Lookup {
    /// A product with at least one element (or a single element).
    Found(Record),
    /// No product with this tag at this event.
    NotFound,
    /// A collection product with zero elements.
    Empty,
    /// The product exists but could not be retrieved.
    Failed(String),
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// The record, or `None` for every absent outcome.
    pub fn into_record(self) -> Option<Record> {
        match self {
            Lookup::Found(record) => Some(record),
            _ => None,
        }
    }
}
