//! Prompt Builder — interpolates budget-truncated input text into a
//! template's instruction skeleton.

use crate::llm::templates::Template;

/// Hard cutoff at the character boundary, multibyte-safe. Not sentence-aware:
/// the remote context limit is the only concern here.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// Builds the final prompt string for a template.
///
/// `resume_text` is ignored by templates that work from the posting alone.
/// Each input field is truncated to `char_budget` independently before
/// interpolation.
pub fn build_prompt(
    template: Template,
    resume_text: Option<&str>,
    job_text: &str,
    char_budget: usize,
) -> String {
    let mut prompt = template
        .skeleton()
        .replace("{oferta}", truncate_chars(job_text, char_budget));
    if template.needs_resume() {
        let resume = resume_text.unwrap_or_default();
        prompt = prompt.replace("{candidato}", truncate_chars(resume, char_budget));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_exact_at_the_budget_boundary() {
        let input = "a".repeat(100);
        assert_eq!(truncate_chars(&input, 40).chars().count(), 40);
        assert_eq!(truncate_chars(&input, 100).chars().count(), 100);
        assert_eq!(truncate_chars(&input, 200).chars().count(), 100);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let input = "ñ".repeat(10); // 2 bytes per char
        let out = truncate_chars(&input, 4);
        assert_eq!(out.chars().count(), 4);
        assert_eq!(out, "ññññ");
    }

    #[test]
    fn test_interpolated_fields_never_exceed_the_budget() {
        let long_job = "oferta ".repeat(10_000);
        let long_resume = "cv ".repeat(10_000);
        let budget = 500;

        let prompt = build_prompt(
            Template::FullScanReport,
            Some(&long_resume),
            &long_job,
            budget,
        );

        // Skeleton plus two fields of at most `budget` chars each.
        let skeleton_len = Template::FullScanReport.skeleton().chars().count();
        assert!(prompt.chars().count() <= skeleton_len + 2 * budget);
        assert!(!prompt.contains("{oferta}"));
        assert!(!prompt.contains("{candidato}"));
    }

    #[test]
    fn test_job_only_template_ignores_resume() {
        let prompt = build_prompt(
            Template::SingleInterviewQuestion,
            Some("my resume"),
            "the posting",
            1000,
        );
        assert!(prompt.contains("the posting"));
        assert!(!prompt.contains("my resume"));
    }
}
