//! Optional-field normalisation.
//!
//! Storage has only "NULL" and "a string" for optional columns. An explicit
//! empty value is written as NULL, so `Some("")` and `None` both read back as
//! `None`.

/// Collapse an empty optional string to `None`.
pub fn normalize_optional(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Owned variant of [`normalize_optional`].
pub fn normalize_owned(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
