use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating display name fields (register, account update)
    /// Letters, digits, then letters/digits/spaces and basic punctuation
    /// - Valid: "Ada Lovelace", "J. R. Hartley", "O'Brien", "Marie-Claire"
    /// - Invalid: "-dash", " leading space", "tab\tname", ""
    pub static ref DISPLAY_NAME_REGEX: Regex =
        Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} .,'\-]*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_regex_valid() {
        assert!(DISPLAY_NAME_REGEX.is_match("Ada Lovelace"));
        assert!(DISPLAY_NAME_REGEX.is_match("J. R. Hartley"));
        assert!(DISPLAY_NAME_REGEX.is_match("O'Brien"));
        assert!(DISPLAY_NAME_REGEX.is_match("Marie-Claire"));
        assert!(DISPLAY_NAME_REGEX.is_match("user123"));
        assert!(DISPLAY_NAME_REGEX.is_match("学生"));
    }

    #[test]
    fn test_display_name_regex_invalid() {
        assert!(!DISPLAY_NAME_REGEX.is_match("-dash")); // starts with punctuation
        assert!(!DISPLAY_NAME_REGEX.is_match(" leading")); // starts with space
        assert!(!DISPLAY_NAME_REGEX.is_match("tab\tname")); // control character
        assert!(!DISPLAY_NAME_REGEX.is_match("")); // empty
        assert!(!DISPLAY_NAME_REGEX.is_match("semi;colon")); // disallowed punctuation
    }
}
