//! Prompt templates for compliant content generation and compliance review.
//!
//! Both builders are pure and accept any string, including empty ones;
//! non-emptiness is enforced by the request types before they get here.
//! User-supplied text is inserted verbatim, without escaping.

/// Tone used when a generation request does not specify one.
pub const DEFAULT_TONE: &str = "professional";

/// A system instruction together with the user turn sent after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Rules every piece of generated marketing copy must follow.
pub const COMPLIANCE_RULES: [&str; 3] = [
    "NEVER promise or guarantee returns. Avoid words like 'guarantee', 'will beat', 'risk-free'.",
    "ALWAYS include a disclaimer about risk. Example: \"Investing involves risk, including possible loss of principal.\"",
    "Do not make superlative claims that cannot be substantiated ('best', '#1', 'best-performing').",
];

const CHECK_SYSTEM_PROMPT: &str = "\
You are a strict compliance officer for the financial industry.
Your task is to review the provided marketing text and identify ANY potential compliance issues with SEC/FINRA rules.";

const CHECK_INSTRUCTIONS: &str = "\
Analyze the following text. Provide a concise report:
1. **Compliance Status:** [COMPLIANT/NON-COMPLIANT]
2. **Issues Found:** List any specific words, phrases, or themes that violate guidelines. If compliant, say \"None\".
3. **Suggested Rewrites:** For any non-compliant parts, provide a safer, compliant alternative.";

/// Prompt asking the model to write compliant marketing copy in `tone`.
///
/// The caller's `prompt` becomes the user turn unchanged.
pub fn build_generation_prompt(prompt: &str, tone: &str) -> PromptPair {
    let mut system = String::from(
        "You are a professional marketing copywriter and a certified compliance officer for the financial industry.\n\
         Your task is to generate marketing content based on the user's request that is engaging, compelling, \
         and 100% compliant with SEC and FINRA guidelines.\n\
         **Key Compliance Rules:**\n",
    );
    for rule in COMPLIANCE_RULES {
        system.push_str("- ");
        system.push_str(rule);
        system.push('\n');
    }
    system.push_str(&format!("- Maintain a {} tone.\n\n", tone));
    system.push_str("Output ONLY the generated text. Do not add any meta-commentary or labels.");

    PromptPair {
        system,
        user: prompt.to_string(),
    }
}

/// Prompt asking the model for a three-part compliance report on `text`.
pub fn build_check_prompt(text: &str) -> PromptPair {
    PromptPair {
        system: CHECK_SYSTEM_PROMPT.to_string(),
        user: format!("{}\n\nText to analyze:\n{}", CHECK_INSTRUCTIONS, text),
    }
}
