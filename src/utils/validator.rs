use validator::ValidationError;

pub fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::new("name_blank"));
    }

    if trimmed.chars().count() > 100 {
        return Err(ValidationError::new("name_too_long"));
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::new("name_has_control_char"));
    }

    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        return Err(ValidationError::new("phone_invalid_char"));
    }

    if phone.chars().skip(1).any(|c| c == '+') {
        return Err(ValidationError::new("phone_misplaced_plus"));
    }

    if digits < 7 {
        return Err(ValidationError::new("phone_too_short"));
    }

    if digits > 15 {
        return Err(ValidationError::new("phone_too_long"));
    }

    Ok(())
}
