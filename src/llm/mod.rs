pub mod gemini;
pub mod openai;

use std::sync::Arc;

use path_core::{PathError, PathGenerator};

use crate::config::{LlmConfig, LlmProviderKind};

pub use gemini::{GeminiConfig, GeminiGenerator};
pub use openai::{OpenAiConfig, OpenAiGenerator};

/// Build the generator selected by configuration.
pub fn build_generator(config: &LlmConfig) -> Result<Arc<dyn PathGenerator>, PathError> {
    let api_keys: Vec<String> = config
        .api_keys
        .iter()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect();

    let generator: Arc<dyn PathGenerator> = match config.provider {
        LlmProviderKind::Gemini => Arc::new(GeminiGenerator::new(GeminiConfig {
            api_keys,
            model: config.model(),
            api_base: config.api_base(),
            temperature: config.temperature,
            timeout: config.timeout(),
        })?),
        LlmProviderKind::OpenAi => Arc::new(OpenAiGenerator::new(OpenAiConfig {
            api_keys,
            model: config.model(),
            api_base: config.api_base(),
            temperature: config.temperature,
            timeout: config.timeout(),
        })?),
    };
    Ok(generator)
}
