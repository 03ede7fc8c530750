//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest team name accepted, in characters.
pub const MAX_TEAM_NAME_CHARS: usize = 32;

/// Validates that a team name is not blank and fits on the scoreboard.
///
/// # Examples
///
/// ```ignore
/// validate_team_name("Red Foxes") // Ok
/// validate_team_name("   ")       // Err - blank
/// ```
pub fn validate_team_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("team_name_blank");
        err.message = Some("Team name must not be blank".into());
        return Err(err);
    }

    let chars = trimmed.chars().count();
    if chars > MAX_TEAM_NAME_CHARS {
        let mut err = ValidationError::new("team_name_length");
        err.message = Some(
            format!("Team name must be at most {MAX_TEAM_NAME_CHARS} characters (got {chars})")
                .into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates that a word category is not blank.
pub fn validate_category(category: &str) -> Result<(), ValidationError> {
    if category.trim().is_empty() {
        let mut err = ValidationError::new("category_blank");
        err.message = Some("Category must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_team_name_valid() {
        assert!(validate_team_name("A").is_ok());
        assert!(validate_team_name("  Red Foxes  ").is_ok());
        assert!(validate_team_name(&"é".repeat(MAX_TEAM_NAME_CHARS)).is_ok());
    }

    #[test]
    fn test_validate_team_name_invalid() {
        assert!(validate_team_name("").is_err());
        assert!(validate_team_name(" \t ").is_err());
        assert!(validate_team_name(&"x".repeat(MAX_TEAM_NAME_CHARS + 1)).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("famous rappers").is_ok());
        assert!(validate_category("  ").is_err());
    }
}
