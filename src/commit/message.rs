//! Commit message clean-up and security annotation.

/// Heading placed above the appended security report.
pub const SECURITY_HEADING: &str = "Security Analysis:";

/// Strip wrapping a model sometimes adds around a plain-text answer.
///
/// Removes a surrounding markdown fence (with or without a language tag) and
/// a single pair of outer quotes that wraps the whole answer. Text without
/// such wrapping is returned trimmed and otherwise unchanged.
pub fn clean_generated(text: &str) -> String {
    let mut result = text.trim();

    if let Some(inner) = result.strip_prefix("```")
        && let Some(inner) = inner.strip_suffix("```")
    {
        // Drop an optional language tag on the opening fence line
        result = match inner.split_once('\n') {
            Some((tag, rest)) if !tag.trim().contains(' ') => rest,
            _ => inner,
        }
        .trim();
    }

    for quote in ['"', '\'', '`'] {
        if result.len() >= 2 && result.starts_with(quote) && result.ends_with(quote) {
            let inner = &result[1..result.len() - 1];
            // Quotes belong to the text itself when more of them appear inside
            if !inner.contains(quote) {
                result = inner.trim();
            }
            break;
        }
    }

    result.to_string()
}

/// Append a security report to a commit message under [`SECURITY_HEADING`].
pub fn annotate_with_security_report(message: &str, report: &str) -> String {
    format!("{}\n\n{}\n{}", message.trim_end(), SECURITY_HEADING, report.trim())
}
