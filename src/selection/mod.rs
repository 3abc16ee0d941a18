//! Tool selection state.
//!
//! Tracks which integrations an agent has switched on and which tools are
//! selected within each. Two invariants hold across every transition: a tool
//! set exists only for an enabled integration, and disabling an integration
//! drops its tool set in the same transition, so no orphaned selections
//! survive.
//!
//! Membership in the raw enabled set is not itself authoritative for
//! persistence: the save boundary treats an integration with zero selected
//! tools as not enabled. That reconciliation runs exactly once per save, via
//! [`ToolSelection::for_persistence`].

use crate::catalog;
use std::collections::{BTreeMap, BTreeSet};

/// In-session tool selection state for one agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolSelection {
    enabled: BTreeSet<String>,
    tools: BTreeMap<String, BTreeSet<String>>,
}

/// The selection as persisted: enabled integration ids plus the tool map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSelection {
    pub enabled_integrations: Vec<String>,
    pub enabled_tool_ids: BTreeMap<String, Vec<String>>,
}

impl ToolSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild selection state from persisted fields (e.g. when an edit
    /// session opens on an existing agent).
    pub fn from_persisted(
        enabled_integrations: &[String],
        enabled_tool_ids: &std::collections::HashMap<String, Vec<String>>,
    ) -> Self {
        let enabled: BTreeSet<String> = enabled_integrations.iter().cloned().collect();
        let tools = enabled_tool_ids
            .iter()
            .filter(|(id, _)| enabled.contains(*id))
            .map(|(id, list)| (id.clone(), list.iter().cloned().collect()))
            .collect();
        Self { enabled, tools }
    }

    /// Whether the integration is currently switched on.
    pub fn is_enabled(&self, integration: &str) -> bool {
        self.enabled.contains(integration)
    }

    /// Selected tool ids for an integration, in stable order.
    pub fn selected_tools(&self, integration: &str) -> Vec<String> {
        self.tools
            .get(integration)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Switch an integration on, seeding exactly the catalog's
    /// `default_enabled` tools. Re-enabling never resurrects tools selected
    /// in an earlier session.
    pub fn enable_integration(&mut self, integration: &str) {
        self.enabled.insert(integration.to_string());
        let seed: BTreeSet<String> = catalog::default_enabled_tools(integration)
            .into_iter()
            .collect();
        self.tools.insert(integration.to_string(), seed);
    }

    /// Switch an integration off and drop its tool set entirely.
    pub fn disable_integration(&mut self, integration: &str) {
        self.enabled.remove(integration);
        self.tools.remove(integration);
    }

    /// Toggle a single tool. No effect if the integration is disabled.
    pub fn set_tool_enabled(&mut self, integration: &str, tool: &str, enabled: bool) {
        if !self.enabled.contains(integration) {
            return;
        }
        let set = self.tools.entry(integration.to_string()).or_default();
        if enabled {
            set.insert(tool.to_string());
        } else {
            set.remove(tool);
        }
    }

    /// Select every catalog tool of the integration. No effect if disabled.
    pub fn select_all(&mut self, integration: &str) {
        if !self.enabled.contains(integration) {
            return;
        }
        let all: BTreeSet<String> = catalog::all_tools(integration).into_iter().collect();
        self.tools.insert(integration.to_string(), all);
    }

    /// Deselect every tool of the integration, leaving it enabled with an
    /// empty set. No effect if disabled.
    pub fn clear_all(&mut self, integration: &str) {
        if !self.enabled.contains(integration) {
            return;
        }
        self.tools.insert(integration.to_string(), BTreeSet::new());
    }

    /// Save-boundary derivation: an integration persists as enabled only if
    /// it has at least one selected tool. Call once per save, not per
    /// keystroke.
    pub fn for_persistence(&self) -> PersistedSelection {
        let enabled_tool_ids: BTreeMap<String, Vec<String>> = self
            .tools
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(id, set)| (id.clone(), set.iter().cloned().collect()))
            .collect();
        let enabled_integrations = enabled_tool_ids.keys().cloned().collect();
        PersistedSelection {
            enabled_integrations,
            enabled_tool_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn enable_seeds_default_tools_only() {
        let mut sel = ToolSelection::new();
        sel.enable_integration("calendar");
        assert_eq!(
            sel.selected_tools("calendar"),
            vec!["book_appointment", "check_availability"]
        );
    }

    #[test]
    fn enable_integration_without_defaults_seeds_empty() {
        let mut sel = ToolSelection::new();
        sel.enable_integration("crm");
        // crm has default tools; use a fabricated integration with none.
        sel.enable_integration("unknown");
        assert!(sel.is_enabled("unknown"));
        assert!(sel.selected_tools("unknown").is_empty());
    }

    #[test]
    fn disable_removes_tool_entry_entirely() {
        let mut sel = ToolSelection::new();
        sel.enable_integration("calendar");
        sel.disable_integration("calendar");
        assert!(!sel.is_enabled("calendar"));
        assert!(sel.tools.get("calendar").is_none());
    }

    #[test]
    fn reenable_reseeds_defaults_dropping_extra_selections() {
        let mut sel = ToolSelection::new();
        sel.enable_integration("calendar");
        sel.set_tool_enabled("calendar", "cancel_appointment", true);
        assert!(sel
            .selected_tools("calendar")
            .contains(&"cancel_appointment".to_string()));

        sel.disable_integration("calendar");
        sel.enable_integration("calendar");
        // Only the defaults come back; the earlier manual pick is gone.
        assert_eq!(
            sel.selected_tools("calendar"),
            vec!["book_appointment", "check_availability"]
        );
    }

    #[test]
    fn set_tool_is_noop_when_integration_disabled() {
        let mut sel = ToolSelection::new();
        sel.set_tool_enabled("calendar", "check_availability", true);
        assert!(sel.selected_tools("calendar").is_empty());
        assert!(!sel.is_enabled("calendar"));
    }

    #[test]
    fn select_all_and_clear_all() {
        let mut sel = ToolSelection::new();
        sel.enable_integration("crm");
        sel.select_all("crm");
        assert_eq!(sel.selected_tools("crm").len(), 4);
        sel.clear_all("crm");
        assert!(sel.selected_tools("crm").is_empty());
        // Still enabled in the raw set after clear_all.
        assert!(sel.is_enabled("crm"));
    }

    #[test]
    fn persistence_excludes_empty_tool_sets() {
        let mut sel = ToolSelection::new();
        sel.enable_integration("calendar");
        sel.enable_integration("crm");
        sel.clear_all("crm");

        let persisted = sel.for_persistence();
        assert_eq!(persisted.enabled_integrations, vec!["calendar"]);
        assert!(!persisted.enabled_tool_ids.contains_key("crm"));
    }

    #[test]
    fn persistence_excludes_empties_for_all_inputs() {
        // For every catalog integration with its tools cleared, none may
        // persist as enabled.
        for integration in crate::catalog::integrations() {
            let mut sel = ToolSelection::new();
            sel.enable_integration(integration.id);
            sel.clear_all(integration.id);
            let persisted = sel.for_persistence();
            assert!(
                !persisted
                    .enabled_integrations
                    .contains(&integration.id.to_string()),
                "{} persisted with zero tools",
                integration.id
            );
        }
    }

    #[test]
    fn from_persisted_drops_orphaned_tool_entries() {
        let mut tool_ids = HashMap::new();
        tool_ids.insert("crm".to_string(), vec!["lookup_contact".to_string()]);
        // crm is not in the enabled list: the orphaned entry must not load.
        let sel = ToolSelection::from_persisted(&["calendar".to_string()], &tool_ids);
        assert!(sel.selected_tools("crm").is_empty());
        assert!(sel.is_enabled("calendar"));
    }
}
