//! Input field validation.
//!
//! Each validator returns the error text shown to the user, or `Ok(())`.

pub const USERNAME_MIN_LENGTH: usize = 4;
pub const USERNAME_MAX_LENGTH: usize = 15;
pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const PASSWORD_MAX_LENGTH: usize = 150;
pub const DISPLAY_NAME_MIN_LENGTH: usize = 4;
pub const DISPLAY_NAME_MAX_LENGTH: usize = 50;
pub const BIO_MAX_LENGTH: usize = 160;
pub const POST_TEXT_MAX_LENGTH: usize = 280;

pub type ValidationResult = Result<(), String>;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn validate_username(username: &str) -> ValidationResult {
    let len = char_len(username);
    if username.chars().all(char::is_alphanumeric)
        && (USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&len)
    {
        Ok(())
    } else {
        Err(format!(
            "Username must be between {} and {} characters",
            USERNAME_MIN_LENGTH, USERNAME_MAX_LENGTH
        ))
    }
}

pub fn validate_password(password: &str) -> ValidationResult {
    if (PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&char_len(password)) {
        Ok(())
    } else {
        Err(format!(
            "The password must be at least {} characters",
            PASSWORD_MIN_LENGTH
        ))
    }
}

pub fn validate_display_name(display_name: &str) -> ValidationResult {
    if (DISPLAY_NAME_MIN_LENGTH..=DISPLAY_NAME_MAX_LENGTH).contains(&char_len(display_name)) {
        Ok(())
    } else {
        Err(format!(
            "Display Name must be between {} and {} characters",
            DISPLAY_NAME_MIN_LENGTH, DISPLAY_NAME_MAX_LENGTH
        ))
    }
}

pub fn validate_bio(bio: &str) -> ValidationResult {
    if char_len(bio) <= BIO_MAX_LENGTH {
        Ok(())
    } else {
        Err(format!("Bio must be less than {} characters", BIO_MAX_LENGTH))
    }
}

pub fn validate_email(email: &str) -> ValidationResult {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(format!("Invalid email: {}", email)),
    }
}

pub fn validate_post_text(text: &str) -> ValidationResult {
    if char_len(text) <= POST_TEXT_MAX_LENGTH {
        Ok(())
    } else {
        Err(format!(
            "Posts can have at most {} characters",
            POST_TEXT_MAX_LENGTH
        ))
    }
}

/// First failure among several checks.
pub fn first_error<I>(results: I) -> ValidationResult
where
    I: IntoIterator<Item = ValidationResult>,
{
    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("abcd").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("a_very_long_username").is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("ali-ce").is_err());
        assert_eq!(
            validate_username("x").unwrap_err(),
            "Username must be between 4 and 15 characters"
        );
    }

    #[test]
    fn test_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(151)).is_err());
    }

    #[test]
    fn test_display_name_and_bio() {
        assert!(validate_display_name("Alice A").is_ok());
        assert!(validate_display_name("Al").is_err());
        assert!(validate_bio("").is_ok());
        assert!(validate_bio(&"b".repeat(160)).is_ok());
        assert!(validate_bio(&"b".repeat(161)).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("a@b.c").is_ok());
        assert!(validate_email("  a@b.c ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("nobody").is_err());
        assert!(validate_email("@host").is_err());
    }

    #[test]
    fn test_post_text_counts_chars() {
        assert!(validate_post_text(&"é".repeat(280)).is_ok());
        assert!(validate_post_text(&"a".repeat(281)).is_err());
    }

    #[test]
    fn test_first_error() {
        assert!(first_error([Ok(()), Ok(())]).is_ok());
        assert_eq!(
            first_error([Ok(()), Err("one".to_string()), Err("two".to_string())]),
            Err("one".to_string())
        );
    }
}
