// Prompt templates for the evaluation stages.

/// Resume summarisation prompt. Fill `{resume_text}` before sending.
pub const SUMMARIZE_PROMPT_TEMPLATE: &str = r#"You are a professional technical recruiter.
Summarize this resume into strict JSON with exactly these fields:
{ "summary": "80-100 word professional summary", "skills": ["skill1", "skill2"], "experience_years": <integer>, "education": "Highest qualification" }
Output ONLY valid JSON. No markdown, no explanations.
Resume:
{resume_text}"#;

/// Job-fit scoring prompt.
/// Fill: {title}, {description}, {must_have_skills}, {candidate_json}
pub const MATCH_PROMPT_TEMPLATE: &str = r#"You are an AI recruiter evaluating a candidate.
Based on the following, rate the candidate (0-100) and explain briefly.
Job Title: {title}
Description: {description}
Must-have Skills: {must_have_skills}
Candidate Summary: {candidate_json}
Respond in strict JSON:
{ "score": <integer>, "reasoning": "<2-line explanation>" }"#;

/// Fills `{name}` placeholders in one pass over `template`. Substituted values
/// are never rescanned, so placeholder-shaped text inside them stays literal.
/// Braces that do not open a known placeholder are copied through.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let hit = values.iter().find(|(name, _)| {
            after.starts_with(name) && after[name.len()..].starts_with('}')
        });
        match hit {
            Some(&(name, value)) => {
                out.push_str(value);
                rest = &after[name.len() + 1..];
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_leaves_unknown_braces_alone() {
        assert_eq!(
            fill("{ \"a\": {x} } {y}", &[("x", "1")]),
            "{ \"a\": 1 } {y}"
        );
    }

    #[test]
    fn test_fill_does_not_rescan_values() {
        let out = fill("{a}|{b}", &[("a", "{b}"), ("b", "two")]);
        assert_eq!(out, "{b}|two");
    }
}
