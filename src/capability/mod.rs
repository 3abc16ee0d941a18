//! Tier and capability resolution.
//!
//! Pure functions from the selected language-model provider and model to the
//! derived pricing tier, the language set that tier unlocks, the model
//! options for the provider, and whether the voice tab applies. Invoked on
//! every provider/model change; idempotent and side-effect-free.

use crate::agents::{LlmProvider, PricingTier};

/// Models that resolve to the Budget tier when selected on a non-realtime
/// provider.
pub const BUDGET_MODELS: &[&str] = &[
    "gpt-4o-mini",
    "gpt-4.1-mini",
    "claude-3-5-haiku",
    "gemini-2.0-flash-lite",
    "llama-3.1-8b-instant",
];

// Language sets are strict supersets by tier: everything Budget offers is in
// Balanced, everything Balanced offers is in Premium.
const BUDGET_LANGUAGES: &[&str] = &["en-US", "en-GB", "es-ES"];
const BALANCED_LANGUAGES: &[&str] = &[
    "en-US", "en-GB", "es-ES", "fr-FR", "de-DE", "pt-BR", "hi-IN",
];
const PREMIUM_LANGUAGES: &[&str] = &[
    "en-US", "en-GB", "es-ES", "fr-FR", "de-DE", "pt-BR", "hi-IN", "ja-JP",
    "ko-KR", "zh-CN", "multi",
];

const OPENAI_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini", "gpt-4.1", "gpt-4.1-mini"];
const OPENAI_REALTIME_MODELS: &[&str] = &["gpt-4o-realtime", "gpt-4o-mini-realtime"];
const ANTHROPIC_MODELS: &[&str] = &["claude-sonnet-4", "claude-3-5-haiku"];
const GOOGLE_MODELS: &[&str] = &["gemini-2.5-pro", "gemini-2.0-flash", "gemini-2.0-flash-lite"];
const GROQ_MODELS: &[&str] = &["llama-3.3-70b-versatile", "llama-3.1-8b-instant"];

/// Resolved capability set for a provider/model selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub tier: PricingTier,
    pub languages: &'static [&'static str],
    pub model_options: &'static [&'static str],
    pub voice_tab_visible: bool,
}

/// Resolve the capability set. Rules evaluate in order; first match wins:
/// realtime provider → Premium, designated budget model → Budget,
/// otherwise Balanced.
pub fn resolve(provider: LlmProvider, model: &str) -> Capabilities {
    let tier = resolve_tier(provider, model);
    Capabilities {
        tier,
        languages: languages_for_tier(tier),
        model_options: model_options(provider),
        // The realtime provider carries an integrated speech pipeline, so
        // there is no separate STT/TTS stage to configure.
        voice_tab_visible: provider != LlmProvider::OpenaiRealtime,
    }
}

/// Tier rule set. The provider rule takes precedence over the model rule.
pub fn resolve_tier(provider: LlmProvider, model: &str) -> PricingTier {
    if provider == LlmProvider::OpenaiRealtime {
        return PricingTier::Premium;
    }
    if BUDGET_MODELS.contains(&model) {
        return PricingTier::Budget;
    }
    PricingTier::Balanced
}

/// Languages available at a tier.
pub fn languages_for_tier(tier: PricingTier) -> &'static [&'static str] {
    match tier {
        PricingTier::Budget => BUDGET_LANGUAGES,
        PricingTier::Balanced => BALANCED_LANGUAGES,
        PricingTier::Premium => PREMIUM_LANGUAGES,
    }
}

/// The designated default language substituted when a tier transition
/// invalidates the current selection.
pub fn default_language(_tier: PricingTier) -> &'static str {
    "en-US"
}

/// Deterministic language fallback on tier transition: keep the current
/// language if the new tier still offers it, else the tier default.
pub fn fallback_language(current: &str, tier: PricingTier) -> String {
    if languages_for_tier(tier).contains(&current) {
        current.to_string()
    } else {
        default_language(tier).to_string()
    }
}

/// Model options offered for a provider.
pub fn model_options(provider: LlmProvider) -> &'static [&'static str] {
    match provider {
        LlmProvider::Openai => OPENAI_MODELS,
        LlmProvider::OpenaiRealtime => OPENAI_REALTIME_MODELS,
        LlmProvider::Anthropic => ANTHROPIC_MODELS,
        LlmProvider::Google => GOOGLE_MODELS,
        LlmProvider::Groq => GROQ_MODELS,
    }
}
