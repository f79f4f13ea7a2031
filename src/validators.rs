/// Input validators
///
/// Field rules for credentials and blog content. Lengths are counted in
/// characters and mirror the column sizes in `migrations/`.

use crate::error::ValidationError;

const MIN_USERNAME_LENGTH: usize = 2;
const MAX_USERNAME_LENGTH: usize = 128;
const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_TITLE_LENGTH: usize = 100;
const MAX_DESC_LENGTH: usize = 255;
const MAX_IMG_LENGTH: usize = 255;
const MAX_TAG_NAME_LENGTH: usize = 100;

/// Both login fields must be present and non-empty
pub fn require_credentials(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::EmptyField("username"));
    }
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password"));
    }
    Ok(())
}

/// Username for a new or updated administrator, trimmed
pub fn validate_username(username: &str) -> Result<String, ValidationError> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("username"));
    }
    check_length("username", trimmed, MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH)?;

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidFormat("username"));
    }

    Ok(trimmed.to_string())
}

pub fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password"));
    }
    check_length("password", password, MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH)?;

    if password.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidFormat("password"));
    }

    Ok(())
}

pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("title"));
    }
    check_length("title", trimmed, 1, MAX_TITLE_LENGTH)?;
    Ok(trimmed.to_string())
}

pub fn validate_desc(desc: &str) -> Result<(), ValidationError> {
    check_length("desc", desc, 0, MAX_DESC_LENGTH)
}

pub fn validate_img(img: &str) -> Result<(), ValidationError> {
    check_length("img", img, 0, MAX_IMG_LENGTH)
}

/// Article and say bodies: anything but blank
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyField("content"));
    }
    Ok(())
}

pub fn validate_tag_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("name"));
    }
    check_length("name", trimmed, 1, MAX_TAG_NAME_LENGTH)?;

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidFormat("name"));
    }

    Ok(trimmed.to_string())
}

fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort(field, min));
    }
    if len > max {
        return Err(ValidationError::TooLong(field, max));
    }
    Ok(())
}
