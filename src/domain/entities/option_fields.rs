use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::ValidateLength;

/// Tri-state field for partial updates of nullable columns.
///
/// - `Unchanged` → key absent from the body
/// - `SetToNull` → key present with `null`
/// - `SetToValue` → key present with a value
///
/// Fields of this type must carry `#[serde(default)]` so an absent key
/// lands on `Unchanged`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OptionField<T> {
    #[default]
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => OptionField::SetToValue(v),
            None => OptionField::SetToNull,
        })
    }
}

impl<T: Serialize> Serialize for OptionField<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OptionField::SetToValue(v) => serializer.serialize_some(v),
            _ => serializer.serialize_none(),
        }
    }
}

// ---------------------- Validation support ----------------------

impl<T> ValidateLength<u64> for OptionField<T>
where
    T: ValidateLength<u64>
{
    fn length(&self) -> Option<u64> {
        match self {
            OptionField::SetToValue(value) => value.length(),
            _ => None,
        }
    }

    fn validate_length(&self, min: Option<u64>, max: Option<u64>, equal: Option<u64>) -> bool {
        match self {
            OptionField::SetToValue(value) => value.validate_length(min, max, equal),
            _ => true,
        }
    }
}

impl<T> OptionField<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// If `SetToValue`, returns a reference to inner value.
    pub fn value_ref(&self) -> Option<&T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Resolves the field against the value currently stored.
    pub fn resolve(&self, current: Option<T>) -> Option<T>
    where
        T: Clone,
    {
        match self {
            Self::Unchanged => current,
            Self::SetToNull => None,
            Self::SetToValue(v) => Some(v.clone()),
        }
    }
}

impl OptionField<String> {
    /// Empty strings from HTML forms mean "clear this field".
    pub fn normalize_blank(self) -> Self {
        match self {
            Self::SetToValue(v) if v.trim().is_empty() => Self::SetToNull,
            other => other,
        }
    }
}
