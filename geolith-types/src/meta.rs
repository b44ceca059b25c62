use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Free-form key/value data attached to a geometry, in insertion order.
pub type Data = IndexMap<String, String>;

/// Metadata carried by every geometry: spatial reference id and attribute data.
///
/// Metadata does not take part in geometric comparisons or algorithms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Spatial reference system identifier.
    pub srid: Option<i32>,
    /// Attribute data, e.g. the non-geometry children of a KML placemark.
    pub data: Data,
}

impl Meta {
    /// Returns true if neither srid nor data is set.
    pub fn is_empty(&self) -> bool {
        self.srid.is_none() && self.data.is_empty()
    }
}

/// Access to the [`Meta`] of a geometry.
pub trait WithMeta: Sized {
    /// Metadata of the geometry.
    fn meta(&self) -> &Meta;
    /// Mutable metadata of the geometry.
    fn meta_mut(&mut self) -> &mut Meta;

    /// Spatial reference system identifier.
    fn srid(&self) -> Option<i32> {
        self.meta().srid
    }

    /// Attribute data.
    fn data(&self) -> &Data {
        &self.meta().data
    }

    /// Value of a single attribute.
    fn data_value(&self, key: &str) -> Option<&str> {
        self.meta().data.get(key).map(String::as_str)
    }

    /// Sets the spatial reference id.
    fn with_srid(mut self, srid: i32) -> Self {
        self.meta_mut().srid = Some(srid);
        self
    }

    /// Adds an attribute, replacing the previous value with the same key.
    fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta_mut().data.insert(key.into(), value.into());
        self
    }

    /// Replaces all the metadata.
    fn with_meta(mut self, meta: Meta) -> Self {
        *self.meta_mut() = meta;
        self
    }
}

macro_rules! impl_with_meta {
    ($type:ty) => {
        impl $crate::meta::WithMeta for $type {
            fn meta(&self) -> &$crate::meta::Meta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut $crate::meta::Meta {
                &mut self.meta
            }
        }
    };
}

pub(crate) use impl_with_meta;
