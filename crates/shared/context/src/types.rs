use chrono::{DateTime, Utc};
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Declared type of an attribute.
///
/// The tag is part of the lookup identity: two attributes with the same name
/// but different tags are distinct entries. The value family is closed; truly
/// opaque payloads go through [`TypeTag::Object`] with their concrete
/// [`TypeId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// UTF-8 text.
    Text,
    /// 64-bit signed integer.
    I64,
    /// 32-bit signed integer.
    I32,
    /// Boolean flag.
    Bool,
    /// 64-bit float.
    F64,
    /// Point in time (UTC).
    DateTime,
    /// Opaque object of the given concrete type.
    Object(TypeId),
}

/// Lookup identity of an attribute: a name paired with its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeKey {
    name: Cow<'static, str>,
    tag: TypeTag,
}

impl AttributeKey {
    /// Creates a key from a name and a declared type tag.
    pub fn new(name: impl Into<Cow<'static, str>>, tag: TypeTag) -> Self {
        Self { name: name.into(), tag }
    }

    /// The attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type tag.
    #[must_use]
    pub const fn tag(&self) -> TypeTag {
        self.tag
    }
}

/// An opaque payload stored by reference, remembering its concrete type.
#[derive(Clone)]
pub struct OpaqueObject {
    id: TypeId,
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl OpaqueObject {
    /// Wraps a shared value, capturing its concrete type identity.
    pub fn new<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self { id: TypeId::of::<T>(), type_name: std::any::type_name::<T>(), value }
    }

    /// The concrete type id of the stored value.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.id
    }

    /// The concrete type name of the stored value, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Cast-or-fail access to the stored value.
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.value.clone().downcast::<T>().ok()
    }
}

impl fmt::Debug for OpaqueObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueObject").field("type_name", &self.type_name).finish_non_exhaustive()
    }
}

impl PartialEq for OpaqueObject {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.value, &other.value)
    }
}

/// A stored attribute value; the variant family mirrors [`TypeTag`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// UTF-8 text.
    Text(Cow<'static, str>),
    /// 64-bit signed integer.
    I64(i64),
    /// 32-bit signed integer.
    I32(i32),
    /// Boolean flag.
    Bool(bool),
    /// 64-bit float.
    F64(f64),
    /// Point in time (UTC).
    DateTime(DateTime<Utc>),
    /// Opaque object of a declared concrete type.
    Object(OpaqueObject),
}

impl AttributeValue {
    /// The type tag this value is stored under.
    #[must_use]
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Text(_) => TypeTag::Text,
            Self::I64(_) => TypeTag::I64,
            Self::I32(_) => TypeTag::I32,
            Self::Bool(_) => TypeTag::Bool,
            Self::F64(_) => TypeTag::F64,
            Self::DateTime(_) => TypeTag::DateTime,
            Self::Object(obj) => TypeTag::Object(obj.type_id()),
        }
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for String {}
    impl Sealed for i64 {}
    impl Sealed for i32 {}
    impl Sealed for bool {}
    impl Sealed for f64 {}
    impl Sealed for chrono::DateTime<chrono::Utc> {}
}

/// A scalar type that can be stored in and read back from a context.
///
/// The family is closed (sealed); opaque payloads use the dedicated object
/// accessors instead.
pub trait AttributeType: private::Sealed + Sized {
    /// The tag values of this type are stored under.
    fn tag() -> TypeTag;
    /// Wraps the value for storage.
    fn into_value(self) -> AttributeValue;
    /// Reads the value back; `None` on a variant mismatch.
    fn from_value(value: &AttributeValue) -> Option<Self>;
}

impl AttributeType for String {
    fn tag() -> TypeTag {
        TypeTag::Text
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Text(Cow::Owned(self))
    }

    fn from_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Text(text) => Some(text.clone().into_owned()),
            _ => None,
        }
    }
}

macro_rules! scalar_attribute_type {
    ($ty:ty, $variant:ident, $tag:ident) => {
        impl AttributeType for $ty {
            fn tag() -> TypeTag {
                TypeTag::$tag
            }

            fn into_value(self) -> AttributeValue {
                AttributeValue::$variant(self)
            }

            fn from_value(value: &AttributeValue) -> Option<Self> {
                match value {
                    AttributeValue::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

scalar_attribute_type!(i64, I64, I64);
scalar_attribute_type!(i32, I32, I32);
scalar_attribute_type!(bool, Bool, Bool);
scalar_attribute_type!(f64, F64, F64);
scalar_attribute_type!(DateTime<Utc>, DateTime, DateTime);
