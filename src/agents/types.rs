use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Provider Selections
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LlmProvider {
    #[default]
    Openai,
    /// Integrated speech-to-speech pipeline; no separate STT/TTS stage.
    OpenaiRealtime,
    Anthropic,
    Google,
    Groq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SttProvider {
    #[default]
    Deepgram,
    Whisper,
    Google,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    #[default]
    Elevenlabs,
    Openai,
    Cartesia,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TelephonyProvider {
    #[default]
    Twilio,
    Telnyx,
    Plivo,
}

/// Derived capability bucket gating language and model choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PricingTier {
    Budget,
    #[default]
    Balanced,
    Premium,
}

// ============================================================================
// Agent Configuration
// ============================================================================

/// A named bundle of speech, language-model, telephony, and tool-integration
/// settings, mirrored into the external voice-orchestration platform.
///
/// Mutated only through full-configuration replace; there is no
/// partial-field PATCH at this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub language: String,
    #[serde(default)]
    pub stt_provider: SttProvider,
    #[serde(default)]
    pub tts_provider: TtsProvider,
    pub voice_id: Option<String>,
    #[serde(default)]
    pub llm_provider: LlmProvider,
    pub llm_model: String,
    pub system_prompt: String,
    pub greeting: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default)]
    pub telephony_provider: TelephonyProvider,
    pub phone_number_id: Option<String>,
    #[serde(default)]
    pub recording_enabled: bool,
    #[serde(default = "default_true")]
    pub transcript_enabled: bool,
    #[serde(default = "default_responsiveness")]
    pub responsiveness: f64,
    #[serde(default = "default_interruption_sensitivity")]
    pub interruption_sensitivity: f64,
    #[serde(default)]
    pub backchannel_enabled: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub pricing_tier: PricingTier,
    #[serde(default)]
    pub enabled_integrations: Vec<String>,
    #[serde(default)]
    pub enabled_tool_ids: HashMap<String, Vec<String>>,
    pub created_at: String,
    pub updated_at: String,
}

impl AgentConfig {
    /// A fresh configuration with platform defaults and a random id.
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            language: "en-US".to_string(),
            stt_provider: SttProvider::default(),
            tts_provider: TtsProvider::default(),
            voice_id: None,
            llm_provider: LlmProvider::default(),
            llm_model: "gpt-4o".to_string(),
            system_prompt: String::new(),
            greeting: None,
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            telephony_provider: TelephonyProvider::default(),
            phone_number_id: None,
            recording_enabled: false,
            transcript_enabled: true,
            responsiveness: default_responsiveness(),
            interruption_sensitivity: default_interruption_sensitivity(),
            backchannel_enabled: false,
            active: true,
            pricing_tier: PricingTier::default(),
            enabled_integrations: Vec::new(),
            enabled_tool_ids: HashMap::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

// ============================================================================
// Sub-Resources
// ============================================================================

/// Agent ↔ workspace membership. Replaced wholesale on every save, never
/// incrementally diffed by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceAssignment {
    pub agent_id: String,
    pub workspace_ids: Vec<String>,
}

/// Widget embed settings; same save cadence as the agent, distinct store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedSettings {
    pub button_label: String,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            button_label: "Talk to us".to_string(),
        }
    }
}

/// Link between a local configuration and its mirrored remote representation.
///
/// Created lazily; may lag behind local edits until a reconciliation is
/// explicitly requested. Not owned by the agent's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RemoteBinding {
    pub remote_id: Option<String>,
}

impl RemoteBinding {
    pub fn is_bound(&self) -> bool {
        self.remote_id.is_some()
    }
}

// ============================================================================
// Serde Defaults
// ============================================================================

fn default_true() -> bool {
    true
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    4096
}

fn default_responsiveness() -> f64 {
    0.8
}

fn default_interruption_sensitivity() -> f64 {
    0.5
}
