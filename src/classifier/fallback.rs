//! Keyword matching used when the trained classifier is unavailable

/// Reply used when no keyword list matches
pub const CLARIFYING_PROMPT: &str = "Thanks for sharing — I might need a bit more detail. \
Could you tell me whether this affects sleep, appetite, mood, or daily activities?";

const DISCLAIMER: &str = "\nThis is informational only — please consult a healthcare professional.";

/// Condition name and the substrings that suggest it, in reply order
const CONDITIONS: &[(&str, &[&str])] = &[
    (
        "Depression",
        &["sad", "depress", "hopeless", "empty", "guilty", "worthless", "tired", "suicidal"],
    ),
    (
        "Anxiety",
        &["anxious", "worried", "panic", "nervous", "tense", "restless", "heart", "sweat"],
    ),
    (
        "Bipolar Disorder",
        &["manic", "high", "euphoric", "impulsive", "spending", "risky", "mood swing", "mood swings"],
    ),
    (
        "PTSD",
        &["trauma", "flashback", "nightmare", "trigger", "hypervigilant", "startle", "avoid"],
    ),
    (
        "OCD",
        &["obsession", "compulsion", "ritual", "repeat", "check", "clean", "order"],
    ),
    (
        "Schizophrenia",
        &["hallucination", "delusion", "paranoid", "disorganized", "withdrawn"],
    ),
];

/// Conditions whose keyword list has a substring match in the text
pub fn matched_conditions(text: &str) -> Vec<&'static str> {
    let lowered = text.to_lowercase();
    CONDITIONS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(name, _)| *name)
        .collect()
}

/// Canned reply built from keyword matches
pub fn keyword_reply(text: &str) -> String {
    let matches = matched_conditions(text);
    if matches.is_empty() {
        return CLARIFYING_PROMPT.to_string();
    }

    let mut reply = format!(
        "Based on what you said, these might be related: {}.\n\nGeneral suggestions:\n",
        matches.join(", ")
    );
    if matches.contains(&"Depression") {
        reply.push_str(
            "• Depression: Consider therapy, staying active, and consult a professional.\n",
        );
    }
    if matches.contains(&"Anxiety") {
        reply.push_str(
            "• Anxiety: Try grounding/breathing exercises and seek help if interfering with life.\n",
        );
    }
    reply.push_str(DISCLAIMER);
    reply
}
