//! Three-state attribute values.
//!
//! Plan and state values arrive from the declarative harness in one of three states: not yet
//! resolved ([`Attr::Unknown`]), explicitly absent ([`Attr::Null`]) or a concrete value
//! ([`Attr::Known`]). The wire format only distinguishes absent from present, so every conversion
//! goes through the accessors here instead of collapsing the states implicitly.
//!
//! In JSON documents `null` is [`Attr::Null`], any other value is [`Attr::Known`] and the marker
//! object `{"$unknown": true}` is [`Attr::Unknown`].

use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};

use crate::mapper::MapperError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Attr<T> {
    /// Value depends on something not applied yet.
    Unknown,
    #[default]
    Null,
    Known(T),
}

impl<T> Attr<T> {
    pub fn known(value: impl Into<T>) -> Self {
        Self::Known(value.into())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Attr<&T> {
        match self {
            Self::Unknown => Attr::Unknown,
            Self::Null => Attr::Null,
            Self::Known(value) => Attr::Known(value),
        }
    }

    pub fn map<U, F>(self, f: F) -> Attr<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Unknown => Attr::Unknown,
            Self::Null => Attr::Null,
            Self::Known(value) => Attr::Known(f(value)),
        }
    }
}

impl<T: Clone> Attr<T> {
    /// The value of a required attribute. Unknown and null are both errors.
    pub fn required(&self, attribute: &'static str) -> Result<T, MapperError> {
        match self {
            Self::Known(value) => Ok(value.clone()),
            Self::Unknown => Err(MapperError::UnknownValue { attribute }),
            Self::Null => Err(MapperError::MissingValue { attribute }),
        }
    }

    /// The value of an optional attribute, `None` when null. Unknown is an error.
    pub fn optional(&self, attribute: &'static str) -> Result<Option<T>, MapperError> {
        match self {
            Self::Known(value) => Ok(Some(value.clone())),
            Self::Null => Ok(None),
            Self::Unknown => Err(MapperError::UnknownValue { attribute }),
        }
    }

    /// The value of an optional attribute the server fills in when omitted.
    ///
    /// Unknown is expected here (the harness marks it "known after apply"), so it is simply left
    /// out of the request like null.
    pub fn resolved(&self) -> Option<T> {
        self.as_known().cloned()
    }
}

impl Attr<String> {
    /// Maps an absent or empty wire string to null.
    pub fn non_empty(value: Option<String>) -> Self {
        match value {
            Some(value) if !value.is_empty() => Self::Known(value),
            _ => Self::Null,
        }
    }
}

impl<T> Attr<Vec<T>> {
    /// Maps an absent wire list to a known empty list.
    pub fn list(value: Option<Vec<T>>) -> Self {
        Self::Known(value.unwrap_or_default())
    }
}

impl<T> From<Option<T>> for Attr<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Known(value),
            None => Self::Null,
        }
    }
}

impl<T: Serialize> Serialize for Attr<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Known(value) => serializer.serialize_some(value),
            Self::Null => serializer.serialize_none(),
            Self::Unknown => Err(ser::Error::custom(
                "unknown values cannot be written to state",
            )),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct UnknownMarker {
    #[serde(rename = "$unknown")]
    unknown: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Encoded<T> {
    Unknown(UnknownMarker),
    Value(Option<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Attr<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Encoded::<T>::deserialize(deserializer)? {
            Encoded::Unknown(UnknownMarker { unknown: true }) => Ok(Self::Unknown),
            Encoded::Unknown(UnknownMarker { unknown: false }) => Err(de::Error::custom(
                "`$unknown` must be true, use null for an absent value",
            )),
            Encoded::Value(value) => Ok(Self::from(value)),
        }
    }
}
