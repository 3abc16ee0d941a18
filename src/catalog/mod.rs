//! Static integration and tool catalog.
//!
//! Catalog entries are product data, not user data: every workspace sees the
//! same integrations and tools. Each tool carries a risk level and a
//! `default_enabled` flag; the flag is consulted only at the moment an
//! integration transitions from disabled to enabled.

use once_cell::sync::Lazy;
use serde::Serialize;

/// Risk classification for an invocable tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Moderate,
    High,
}

/// A single invocable action within an integration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDef {
    pub id: &'static str,
    pub name: &'static str,
    pub risk_level: RiskLevel,
    pub default_enabled: bool,
}

/// An external capability an agent may be wired to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationDef {
    pub id: &'static str,
    pub name: &'static str,
    pub auth_kind: &'static str,
    pub tools: &'static [ToolDef],
}

static CALENDAR_TOOLS: &[ToolDef] = &[
    ToolDef {
        id: "check_availability",
        name: "Check availability",
        risk_level: RiskLevel::Safe,
        default_enabled: true,
    },
    ToolDef {
        id: "book_appointment",
        name: "Book appointment",
        risk_level: RiskLevel::Moderate,
        default_enabled: true,
    },
    ToolDef {
        id: "cancel_appointment",
        name: "Cancel appointment",
        risk_level: RiskLevel::High,
        default_enabled: false,
    },
];

static CRM_TOOLS: &[ToolDef] = &[
    ToolDef {
        id: "lookup_contact",
        name: "Look up contact",
        risk_level: RiskLevel::Safe,
        default_enabled: true,
    },
    ToolDef {
        id: "create_contact",
        name: "Create contact",
        risk_level: RiskLevel::Moderate,
        default_enabled: false,
    },
    ToolDef {
        id: "update_contact",
        name: "Update contact",
        risk_level: RiskLevel::Moderate,
        default_enabled: false,
    },
    ToolDef {
        id: "delete_contact",
        name: "Delete contact",
        risk_level: RiskLevel::High,
        default_enabled: false,
    },
];

static SMS_TOOLS: &[ToolDef] = &[
    ToolDef {
        id: "send_followup_sms",
        name: "Send follow-up SMS",
        risk_level: RiskLevel::Moderate,
        default_enabled: true,
    },
];

static INTEGRATIONS: Lazy<Vec<IntegrationDef>> = Lazy::new(|| {
    let list = vec![
        IntegrationDef {
            id: "calendar",
            name: "Appointment calendar",
            auth_kind: "oauth",
            tools: CALENDAR_TOOLS,
        },
        IntegrationDef {
            id: "crm",
            name: "Contact CRM",
            auth_kind: "api-key",
            tools: CRM_TOOLS,
        },
        IntegrationDef {
            id: "sms",
            name: "SMS follow-up",
            auth_kind: "api-key",
            tools: SMS_TOOLS,
        },
    ];
    // High-risk tools must be opted into explicitly.
    debug_assert!(list
        .iter()
        .flat_map(|i| i.tools)
        .all(|t| !(t.default_enabled && t.risk_level == RiskLevel::High)));
    list
});

/// All catalog integrations.
pub fn integrations() -> &'static [IntegrationDef] {
    &INTEGRATIONS
}

/// Look up an integration by id.
pub fn find_integration(id: &str) -> Option<&'static IntegrationDef> {
    INTEGRATIONS.iter().find(|i| i.id == id)
}

/// Tool ids seeded when an integration is first enabled.
pub fn default_enabled_tools(integration_id: &str) -> Vec<String> {
    find_integration(integration_id)
        .map(|i| {
            i.tools
                .iter()
                .filter(|t| t.default_enabled)
                .map(|t| t.id.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// All tool ids of an integration, regardless of default state.
pub fn all_tools(integration_id: &str) -> Vec<String> {
    find_integration(integration_id)
        .map(|i| i.tools.iter().map(|t| t.id.to_string()).collect())
        .unwrap_or_default()
}
