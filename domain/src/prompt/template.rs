//! Prompt templates for CodeMax turns

use crate::core::model::Model;

/// Templates for the system instruction and canned prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// Persona shared by every variant
    pub fn base_system() -> &'static str {
        "You are Eburon CodeMax, a world-class software engineer. You provide complete, production-ready source code in a single HTML block (CSS and JS included)."
    }

    /// Verification protocol appended to every system instruction
    pub fn verification_protocol() -> &'static str {
        r#"
CRITICAL VERIFICATION PROTOCOL:
1. Every code output must be self-documenting.
2. Include a hidden 'Verification Block' in comments at the start of the code summarizing the architecture.
3. If the user reports an error or asks for verification, perform a 'Step-by-Step' logic audit before recreating the code.
4. Ensure all JS handles errors gracefully to facilitate easier debugging.
"#
    }

    /// System instruction for the given model variant
    pub fn system_instruction(model: &Model) -> String {
        format!(
            "{} You are the {} variant. {}",
            Self::base_system(),
            model.variant(),
            Self::verification_protocol()
        )
    }

    /// Prompt asking the model to audit and repair a previous document
    pub fn verify_prompt(html: &str) -> String {
        format!(
            "Verify and fix this code for any potential issues:\n\n{}",
            html
        )
    }

    /// Suggestions shown on an empty conversation
    pub fn starter_prompts() -> &'static [&'static str] {
        &[
            "Build a logic gate visualizer",
            "Explain the Eburon architecture",
            "Design a minimalist CRM",
            "Verify my React code",
        ]
    }
}
