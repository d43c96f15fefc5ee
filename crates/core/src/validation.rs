//! Blank-field validation shared by category create and update.

use crate::error::CoreError;

pub const MSG_BLANK_NAME: &str = "Название категории не может быть пустым";
pub const MSG_BLANK_ICON: &str = "Иконка категории обязательна";
pub const MSG_BLANK_DESCRIPTION: &str = "Описание категории не может быть пустым";

/// Helper: ensure a field is non-empty after trimming.
pub fn require_non_blank(value: &str, message: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

/// Validate a category triple. Fields are checked in order (name, icon,
/// description) and the first blank one is reported.
pub fn validate_category_fields(
    name: &str,
    icon: &str,
    description: &str,
) -> Result<(), CoreError> {
    require_non_blank(name, MSG_BLANK_NAME)?;
    require_non_blank(icon, MSG_BLANK_ICON)?;
    require_non_blank(description, MSG_BLANK_DESCRIPTION)?;
    Ok(())
}
