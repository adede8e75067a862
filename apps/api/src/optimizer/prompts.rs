// Prompt templates for each optimizable section.
// Placeholders are filled in one pass with `fill_template`; shared fragments
// come from llm_client::prompts.

/// Replace: {role_line}, {summary}, {experience_count}, {skills}, {factuality}, {format}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Rewrite the following professional summary so it is concise, compelling, and ATS-friendly.
{role_line}
The candidate has {experience_count} work experience entries and lists these skills: {skills}

Guidelines:
- 2 to 4 sentences, under 80 words
- Lead with professional identity and years of focus
- Weave in relevant keywords naturally
- Use active voice, no first-person pronouns

{factuality}

ORIGINAL SUMMARY:
{summary}

{format}"#;

/// Replace: {position}, {company}, {role_line}, {bullets}, {factuality}, {format}
pub const EXPERIENCE_PROMPT_TEMPLATE: &str = r#"Improve these resume bullet points for the position "{position}" at "{company}".
{role_line}

Guidelines:
- Start every bullet with a strong action verb
- Quantify impact where the original provides numbers
- Keep one bullet per original bullet, in the same order
- Each bullet under 30 words

{factuality}

ORIGINAL BULLETS:
{bullets}

{format}"#;

/// Replace: {name}, {technologies}, {role_line}, {description}, {factuality}, {format}
pub const PROJECT_PROMPT_TEMPLATE: &str = r#"Rewrite this project description for a resume.
Project: {name}
Technologies: {technologies}
{role_line}

Guidelines:
- 1 to 3 sentences
- Emphasise the problem solved, the technical approach, and the outcome
- Mention the key technologies naturally

{factuality}

ORIGINAL DESCRIPTION:
{description}

{format}"#;

/// Replace: {role_line}, {positions}, {skills}, {format}
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"Suggest up to 10 additional skills this candidate likely has or should highlight.
{role_line}
Positions held: {positions}
Current skills: {skills}

Guidelines:
- Only suggest skills NOT already listed
- Prefer concrete technical skills and tools recruiters search for
- Each suggestion is a short label (1 to 3 words)

{format}"#;

/// Substitutes `{name}` placeholders in `template` from `values` in a single
/// left-to-right pass. Inserted text is never scanned again, so values may
/// contain braces. Unknown placeholders are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        let hit = values.iter().find_map(|(name, value)| {
            tail.strip_prefix('{')
                .and_then(|t| t.strip_prefix(*name))
                .and_then(|t| t.strip_prefix('}'))
                .map(|after| (*value, after))
        });

        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
