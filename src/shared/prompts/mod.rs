//! Prompt template management module.
//!
//! Templates are stored in `templates/prompts/` and use Jinja2 syntax.
//!
//! # Usage
//!
//! ```ignore
//! use crate::shared::prompts::render_homework_explain_prompt;
//!
//! let prompt = render_homework_explain_prompt("What is 2 + 2?", None)?;
//! ```

pub mod engine;

pub use engine::TemplateError;

use engine::render_template_simple;
use std::collections::HashMap;

/// Render the homework explanation prompt.
///
/// A missing or blank reason renders as the literal "None" so the model
/// always sees the same prompt shape.
pub fn render_homework_explain_prompt(
    extracted_text: &str,
    reason: Option<&str>,
) -> Result<String, TemplateError> {
    let reason = reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or("None");

    let mut ctx: HashMap<&str, &str> = HashMap::new();
    ctx.insert("extracted_text", extracted_text);
    ctx.insert("reason", reason);

    render_template_simple("homework/explain.jinja", &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_prompt_with_reason() {
        let prompt =
            render_homework_explain_prompt("Solve x^2 = 9", Some("I forgot square roots")).unwrap();

        assert_eq!(
            prompt,
            "Explain this homework problem:\nSolve x^2 = 9\nReason: I forgot square roots"
        );
    }

    #[test]
    fn test_explain_prompt_defaults_reason_to_none() {
        let prompt = render_homework_explain_prompt("Solve x^2 = 9", None).unwrap();
        assert!(prompt.ends_with("Reason: None"));

        let blank = render_homework_explain_prompt("Solve x^2 = 9", Some("   ")).unwrap();
        assert!(blank.ends_with("Reason: None"));
    }
}
