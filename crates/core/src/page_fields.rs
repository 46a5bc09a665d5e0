//! Validation for the non-path page fields: title, template naming, and
//! parent linkage.

use crate::error::CoreError;
use crate::types::DbId;

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_TEMPLATE_NAME_LENGTH: usize = 100;

/// Validate a page title (non-empty, <= 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// A template page needs a name; a template name is meaningless without the
/// flag.
pub fn validate_template(is_template: bool, template_name: Option<&str>) -> Result<(), CoreError> {
    match (is_template, template_name) {
        (true, None) => Err(CoreError::Validation(
            "Template pages require a template name".into(),
        )),
        (false, Some(_)) => Err(CoreError::Validation(
            "Template name is only allowed on template pages".into(),
        )),
        (_, Some(name)) if name.trim().is_empty() => Err(CoreError::Validation(
            "Template name must not be empty".into(),
        )),
        (_, Some(name)) if name.chars().count() > MAX_TEMPLATE_NAME_LENGTH => {
            Err(CoreError::Validation(format!(
                "Template name must be at most {MAX_TEMPLATE_NAME_LENGTH} characters"
            )))
        }
        _ => Ok(()),
    }
}

/// A page cannot be its own parent.
pub fn validate_parent(page_id: DbId, parent_id: Option<DbId>) -> Result<(), CoreError> {
    if parent_id == Some(page_id) {
        return Err(CoreError::Validation(
            "A page cannot be its own parent".into(),
        ));
    }
    Ok(())
}

/// Sibling ordering hints are non-negative.
pub fn validate_position(position: i32) -> Result<(), CoreError> {
    if position < 0 {
        return Err(CoreError::Validation(
            "Position must be zero or greater".into(),
        ));
    }
    Ok(())
}
