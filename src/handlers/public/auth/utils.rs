/// Validate display name format and requirements
pub fn validate_name_format(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if name.len() < 2 {
        return Err("Name must be at least 2 characters".to_string());
    }

    if name.len() > 100 {
        return Err("Name must be less than 100 characters".to_string());
    }

    Ok(())
}

/// Basic email format check; the mail provider does the real validation
/// when the activation message goes out.
pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    if !email.contains('@') || !email.contains('.') {
        return Err("Invalid email format".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Minimum password requirements for registration
pub fn validate_password_format(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_emails() {
        assert!(validate_email_format("ada@studyhall.app").is_ok());
        assert!(validate_email_format("no-at-sign").is_err());
        assert!(validate_email_format("@missing.local").is_err());
    }

    #[test]
    fn enforces_name_bounds() {
        assert!(validate_name_format("Ada").is_ok());
        assert!(validate_name_format("").is_err());
        assert!(validate_name_format("x").is_err());
    }

    #[test]
    fn enforces_password_length() {
        assert!(validate_password_format("longenough").is_ok());
        assert!(validate_password_format("short").is_err());
    }
}
