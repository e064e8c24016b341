// Prompt envelope shared by every caller of the model client, plus the
// instruction format the hosted Mistral model expects.

use serde::Serialize;

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_new_tokens: u32,
}

impl GenerationParams {
    /// Low temperature for scoring and summaries, where consistency matters.
    pub const PRECISE: Self = Self {
        temperature: 0.3,
        max_new_tokens: 500,
    };
    pub const CREATIVE: Self = Self {
        temperature: 0.7,
        max_new_tokens: 500,
    };
    pub const SHORT_CREATIVE: Self = Self {
        temperature: 0.7,
        max_new_tokens: 200,
    };
}

/// A fully formatted prompt: system instruction, user turn and sampling params.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
    pub params: GenerationParams,
}

impl Prompt {
    /// Renders the prompt in Mistral's `[INST]` instruction format.
    pub fn to_instruct(&self) -> String {
        format!(
            "<s>[INST] System: {}\nHuman: {}\n [/INST]",
            self.system, self.user
        )
    }
}
