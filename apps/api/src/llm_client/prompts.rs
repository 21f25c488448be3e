// Shared prompt fragments and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Keeps the model inside the technical-interview role.
pub const INTERVIEWER_GUARDRAIL: &str = "\
    Remember: You are conducting a technical interview. \
    Stay focused on evaluating technical competency.";

/// Asks for a bare reply with no preamble.
pub const PLAIN_OUTPUT_INSTRUCTION: &str = "\
    Return only the requested content without additional formatting, \
    numbering, or commentary.";

/// Fills `{key}` placeholders in a single pass over the template.
///
/// Substituted values are copied verbatim; braces inside them are never
/// expanded. Unknown placeholders are left as they are.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substitution = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close))
        });
        match substitution {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
