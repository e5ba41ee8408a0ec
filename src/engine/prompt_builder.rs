/// Builds the full prompt sent to the text service.
/// This struct is intentionally dumb: it only formats text.
/// No parsing, no networking, no engine logic.
pub struct PromptBuilder;

const LORE_RULES: &str = "\
LORE RULES:
- Setting: low-magic forest frontier; medieval tech.
- POV: second-person ('you'); no modern slang.
- Do NOT contradict authored text or outcomes.
- 120-180 words. End with exactly 2-3 numbered options.
- Options short (<12 words) and mutually exclusive.
";

impl PromptBuilder {
    pub fn build(prior_text: &str, hint: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str(LORE_RULES);
        prompt.push('\n');
        push_task(&mut prompt);
        push_authored_text(&mut prompt, prior_text);
        push_hint(&mut prompt, hint);
        push_output_contract(&mut prompt);

        prompt
    }
}

fn push_task(prompt: &mut String) {
    prompt.push_str(
        "TASK:\n\
Write a short scene that continues from the authored text and steers toward the hint.\n\
Length: 120-180 words. Then provide exactly TWO brief choices (<= 12 words each).\n\n",
    );
}

fn push_authored_text(prompt: &mut String, prior_text: &str) {
    prompt.push_str("AUTHORED_TEXT:\n");
    prompt.push_str(prior_text);
    prompt.push_str("\n\n");
}

fn push_hint(prompt: &mut String, hint: &str) {
    prompt.push_str("NEXT_HINT:\n");
    prompt.push_str(hint);
    prompt.push_str("\n\n");
}

fn push_output_contract(prompt: &mut String) {
    prompt.push_str(
        "OUTPUT FORMAT (STRICT):\n\
{ \"scene\": \"SCENE_TEXT\", \"options\": [\"CHOICE_1\", \"CHOICE_2\"] }\n\
RULES:\n\
- Respond ONLY with a single JSON object as above.\n\
- No extra text, no markdown, no code fences.\n\
- Use plain ASCII quotes and characters.\n",
    );
}
