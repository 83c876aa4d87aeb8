//! Prompt text sent to the model.

/// Build the structuring prompt for `text`, steered by `guidance`.
pub fn build_prompt(text: &str, guidance: &str) -> String {
    format!(
        r#"Analyze the following text and structure it into a series of presentation slides.
Your response MUST be a valid JSON array of objects. Each object should represent a slide and have two keys: "title" (a string) and "content" (an array of strings, where each string is a bullet point).
Do not include any explanatory text, markdown formatting, or code fences like ```json around the JSON output. The response should start with '[' and end with ']'.

Guidance for tone/structure: "{guidance}"

Text to process:
---
{text}
---

Example of desired JSON output:
[
    {{"title": "Slide 1 Title", "content": ["Bullet point 1.", "Bullet point 2."]}},
    {{"title": "Slide 2 Title", "content": ["Another point.", "More details here."]}}
]
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_text_and_guidance() {
        let prompt = build_prompt("Quarterly numbers went up.", "formal, 3 slides");
        assert!(prompt.contains("Guidance for tone/structure: \"formal, 3 slides\""));
        assert!(prompt.contains("---\nQuarterly numbers went up.\n---"));
        assert!(prompt.contains(r#"{"title": "Slide 1 Title", "content": ["Bullet point 1.", "Bullet point 2."]}"#));
    }

    #[test]
    fn test_empty_guidance_is_still_quoted() {
        assert!(build_prompt("x", "").contains("Guidance for tone/structure: \"\""));
    }
}
