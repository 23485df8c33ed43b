/// Input validation utilities
pub mod validation {
    use regex::Regex;
    use std::sync::OnceLock;

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    static KEYWORD_REGEX: OnceLock<Regex> = OnceLock::new();

    pub const MAX_KEYWORD_LEN: usize = 50;
    pub const MAX_CATEGORY_NAME_LEN: usize = 50;

    /// Validate email format
    pub fn validate_email(email: &str) -> Result<(), String> {
        if email.is_empty() {
            return Err("Email cannot be empty".to_string());
        }

        if email.len() > 254 {
            return Err("Email too long (max 254 characters)".to_string());
        }

        let email_regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
        });

        if !email_regex.is_match(email) {
            return Err("Invalid email format".to_string());
        }

        Ok(())
    }

    /// Validate a hidden or user keyword. Returns the trimmed keyword.
    pub fn validate_keyword(keyword: &str) -> Result<String, String> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err("Keyword cannot be empty".to_string());
        }

        if keyword.chars().count() > MAX_KEYWORD_LEN {
            return Err(format!("Keyword too long (max {MAX_KEYWORD_LEN} characters)"));
        }

        // letters, digits, spaces and a little punctuation
        let keyword_regex = KEYWORD_REGEX.get_or_init(|| {
            Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} ._+#&'-]*$").unwrap()
        });

        if !keyword_regex.is_match(keyword) {
            return Err("Keyword contains invalid characters".to_string());
        }

        Ok(keyword.to_string())
    }

    /// Validate a category name. Returns the trimmed name.
    pub fn validate_category_name(name: &str) -> Result<String, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Category name cannot be empty".to_string());
        }

        if name.chars().count() > MAX_CATEGORY_NAME_LEN {
            return Err(format!(
                "Category name too long (max {MAX_CATEGORY_NAME_LEN} characters)"
            ));
        }

        // Allow most characters but prevent XSS
        if name.contains('<') || name.contains('>') || name.contains('"') {
            return Err("Category name contains invalid characters".to_string());
        }

        Ok(name.to_string())
    }

}
