use crate::error::KafkaPlusError;

/// Fail with a configuration error naming `field` when `value` is empty.
pub fn check_not_blank(field: &str, value: &str) -> Result<(), KafkaPlusError> {
    if value.trim().is_empty() {
        return Err(KafkaPlusError::missing_field(field));
    }

    Ok(())
}

/// Fail with a configuration error naming `field` when `value` is absent.
pub fn check_not_null<T>(field: &str, value: Option<&T>) -> Result<(), KafkaPlusError> {
    if value.is_none() {
        return Err(KafkaPlusError::missing_field(field));
    }

    Ok(())
}
