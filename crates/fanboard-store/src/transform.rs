use serde_json::Value;

use crate::error::StoreError;

/// A store-side field update. Transforms are applied atomically under the
/// store lock, so concurrent writers never observe a half-applied update
/// and signed increments commute.
#[derive(Debug, Clone)]
pub enum FieldTransform {
    /// Overwrite a field.
    Set { field: String, value: Value },
    /// Add a signed delta to a numeric field. Missing fields start at 0.
    Increment { field: String, delta: i64 },
    /// Add a value to an array field if absent. Idempotent: adding a value
    /// that is already present is a no-op.
    ArrayUnion { field: String, value: Value },
    /// Remove all occurrences of a value from an array field. Idempotent:
    /// removing an absent value is a no-op.
    ArrayRemove { field: String, value: Value },
}

impl FieldTransform {
    pub fn set(field: impl Into<String>, value: Value) -> Self {
        FieldTransform::Set {
            field: field.into(),
            value,
        }
    }

    pub fn increment(field: impl Into<String>, delta: i64) -> Self {
        FieldTransform::Increment {
            field: field.into(),
            delta,
        }
    }

    pub fn array_union(field: impl Into<String>, value: Value) -> Self {
        FieldTransform::ArrayUnion {
            field: field.into(),
            value,
        }
    }

    pub fn array_remove(field: impl Into<String>, value: Value) -> Self {
        FieldTransform::ArrayRemove {
            field: field.into(),
            value,
        }
    }

    /// Apply this transform to a field map in place.
    pub(crate) fn apply(
        &self,
        fields: &mut serde_json::Map<String, Value>,
    ) -> Result<(), StoreError> {
        match self {
            FieldTransform::Set { field, value } => {
                fields.insert(field.clone(), value.clone());
                Ok(())
            }
            FieldTransform::Increment { field, delta } => {
                let current = match fields.get(field) {
                    None => 0,
                    Some(v) => v.as_i64().ok_or_else(|| StoreError::NonNumericField {
                        field: field.clone(),
                    })?,
                };
                fields.insert(field.clone(), Value::from(current + delta));
                Ok(())
            }
            FieldTransform::ArrayUnion { field, value } => {
                let entry = fields
                    .entry(field.clone())
                    .or_insert_with(|| Value::Array(Vec::new()));
                let arr = entry.as_array_mut().ok_or_else(|| StoreError::NotAnArray {
                    field: field.clone(),
                })?;
                if !arr.iter().any(|v| v == value) {
                    arr.push(value.clone());
                }
                Ok(())
            }
            FieldTransform::ArrayRemove { field, value } => {
                match fields.get_mut(field) {
                    // Removing from a missing field is a no-op.
                    None => Ok(()),
                    Some(entry) => {
                        let arr =
                            entry.as_array_mut().ok_or_else(|| StoreError::NotAnArray {
                                field: field.clone(),
                            })?;
                        arr.retain(|v| v != value);
                        Ok(())
                    }
                }
            }
        }
    }
}
