use super::AgentConfig;
use crate::capability;
use crate::errors::FieldViolation;

/// Temperature range accepted by every provider.
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 2.0);

/// Output token budget range.
pub const MAX_TOKENS_RANGE: (u32, u32) = (100, 16000);

/// Minimum agent name length.
pub const MIN_NAME_LEN: usize = 2;

/// Minimum system-instructions length.
pub const MIN_PROMPT_LEN: usize = 10;

/// Validate an agent configuration before any commit is attempted.
///
/// Stateless. A non-empty result aborts the save with no network effect.
pub fn validate_agent(config: &AgentConfig) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if config.name.trim().chars().count() < MIN_NAME_LEN {
        violations.push(FieldViolation {
            path: "name".to_string(),
            message: format!("Name must be at least {MIN_NAME_LEN} characters"),
        });
    }

    let caps = capability::resolve(config.llm_provider, &config.llm_model);
    if config.language.is_empty() {
        violations.push(FieldViolation {
            path: "language".to_string(),
            message: "Language is required".to_string(),
        });
    } else if !caps.languages.contains(&config.language.as_str()) {
        violations.push(FieldViolation {
            path: "language".to_string(),
            message: format!(
                "Language '{}' is not available on the {:?} tier",
                config.language, caps.tier
            ),
        });
    }

    if config.system_prompt.trim().chars().count() < MIN_PROMPT_LEN {
        violations.push(FieldViolation {
            path: "systemPrompt".to_string(),
            message: format!("System instructions must be at least {MIN_PROMPT_LEN} characters"),
        });
    }

    if !(TEMPERATURE_RANGE.0..=TEMPERATURE_RANGE.1).contains(&config.temperature) {
        violations.push(FieldViolation {
            path: "temperature".to_string(),
            message: format!(
                "Temperature must be between {} and {}",
                TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1
            ),
        });
    }

    if !(MAX_TOKENS_RANGE.0..=MAX_TOKENS_RANGE.1).contains(&config.max_output_tokens) {
        violations.push(FieldViolation {
            path: "maxOutputTokens".to_string(),
            message: format!(
                "Max output tokens must be between {} and {}",
                MAX_TOKENS_RANGE.0, MAX_TOKENS_RANGE.1
            ),
        });
    }

    for (path, value) in [
        ("responsiveness", config.responsiveness),
        ("interruptionSensitivity", config.interruption_sensitivity),
    ] {
        if !(0.0..=1.0).contains(&value) {
            violations.push(FieldViolation {
                path: path.to_string(),
                message: "Must be between 0 and 1".to_string(),
            });
        }
    }

    // A tool selection may only be persisted for an enabled integration.
    for integration in config.enabled_tool_ids.keys() {
        if !config.enabled_integrations.contains(integration) {
            violations.push(FieldViolation {
                path: format!("enabledToolIds.{integration}"),
                message: "Tool selection for a disabled integration".to_string(),
            });
        }
    }

    violations
}
