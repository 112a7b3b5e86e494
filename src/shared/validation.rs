use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex for a single concept tag
    /// No commas (the admin form splits on them) and no surrounding whitespace
    /// - Valid: "Business Analysis", "Statistics & Mathematics", "5 Whys"
    /// - Invalid: " padded", "a,b", "", "trailing "
    pub static ref TAG_REGEX: Regex = Regex::new(r"^[^,\s](?:[^,]*[^,\s])?$").unwrap();
}

/// Longest accepted tag
pub const MAX_TAG_LENGTH: usize = 50;

/// `validator` hook for tag lists
pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    for tag in tags {
        if tag.chars().count() > MAX_TAG_LENGTH || !TAG_REGEX.is_match(tag) {
            let mut err = ValidationError::new("invalid_tag");
            err.message = Some(format!("Invalid tag '{}'", tag).into());
            return Err(err);
        }
    }
    Ok(())
}

/// `validator` hook for lists of image URLs
pub fn validate_image_urls(urls: &[String]) -> Result<(), ValidationError> {
    for url in urls {
        if !validator::ValidateUrl::validate_url(url) {
            let mut err = ValidationError::new("invalid_image_url");
            err.message = Some(format!("Invalid image URL '{}'", url).into());
            return Err(err);
        }
    }
    Ok(())
}

/// Trim an optional string, turning blank input into `None`
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_regex_valid() {
        assert!(TAG_REGEX.is_match("Business Analysis"));
        assert!(TAG_REGEX.is_match("Statistics & Mathematics"));
        assert!(TAG_REGEX.is_match("5 Whys"));
        assert!(TAG_REGEX.is_match("a"));
        assert!(TAG_REGEX.is_match("Problem-Solving"));
    }

    #[test]
    fn test_tag_regex_invalid() {
        assert!(!TAG_REGEX.is_match("")); // empty
        assert!(!TAG_REGEX.is_match(" padded")); // leading space
        assert!(!TAG_REGEX.is_match("trailing ")); // trailing space
        assert!(!TAG_REGEX.is_match("a,b")); // comma
        assert!(!TAG_REGEX.is_match(",")); // lone comma
    }

    #[test]
    fn test_validate_tags() {
        assert!(validate_tags(&["Framework".to_string(), "SWOT".to_string()]).is_ok());
        assert!(validate_tags(&[]).is_ok());
        assert!(validate_tags(&["ok".to_string(), "not,ok".to_string()]).is_err());
        assert!(validate_tags(&["x".repeat(MAX_TAG_LENGTH + 1)]).is_err());
    }

    #[test]
    fn test_validate_image_urls() {
        assert!(validate_image_urls(&["https://cdn.example.com/a.png".to_string()]).is_ok());
        assert!(validate_image_urls(&["not a url".to_string()]).is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  hi ".to_string())), Some("hi".to_string()));
        assert_eq!(normalize_optional(Some("   ".to_string())), None);
        assert_eq!(normalize_optional(None), None);
    }
}
