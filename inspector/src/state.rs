//! Per-session UI state: foldout and tab selections, play mode.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// UI state that survives inspector rebuilds.
///
/// Keys are `"<type>::<group path>"` so that equally named groups of
/// different types do not share state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InspectorState {
    #[serde(default)]
    foldouts: HashMap<String, bool>,
    #[serde(default)]
    tabs: HashMap<String, usize>,
    /// Whether the host is running the game. Buttons check this.
    #[serde(default)]
    pub play_mode: bool,
}

impl InspectorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(type_name: &str, path: &str) -> String {
        format!("{type_name}::{path}")
    }

    /// Foldout groups start open.
    pub fn foldout(&self, key: &str) -> bool {
        self.foldouts.get(key).copied().unwrap_or(true)
    }

    pub fn set_foldout(&mut self, key: String, open: bool) {
        self.foldouts.insert(key, open);
    }

    pub fn tab(&self, key: &str) -> usize {
        self.tabs.get(key).copied().unwrap_or(0)
    }

    pub fn set_tab(&mut self, key: String, selected: usize) {
        self.tabs.insert(key, selected);
    }

    pub fn to_ron(&self) -> Result<String, StateError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn from_ron(text: &str) -> Result<Self, StateError> {
        Ok(ron::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let state = InspectorState::new();
        assert!(state.foldout("Player::Stats"));
        assert_eq!(state.tab("Player::Tabs"), 0);
    }

    #[test]
    fn persists_through_ron() {
        let mut state = InspectorState::new();
        state.set_foldout(InspectorState::key("Player", "Stats"), false);
        state.set_tab(InspectorState::key("Player", "Tabs"), 2);
        state.play_mode = true;

        let text = state.to_ron().unwrap();
        let restored = InspectorState::from_ron(&text).unwrap();
        assert_eq!(restored, state);
        assert!(!restored.foldout("Player::Stats"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(InspectorState::from_ron("not ron at all (").is_err());
    }
}
