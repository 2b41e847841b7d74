use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub keys: Vec<(KeyCode, KeyModifiers)>,
    pub label: String,
    pub description: String,
}

impl KeyBinding {
    pub fn new(keys: &[(KeyCode, KeyModifiers)], label: &str, description: &str) -> Self {
        Self {
            keys: keys.to_vec(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        // Shifted letters arrive with SHIFT set; the char already says so
        let modifiers = match event.code {
            KeyCode::Char(_) => event.modifiers.difference(KeyModifiers::SHIFT),
            _ => event.modifiers,
        };
        self.keys
            .iter()
            .any(|(key, mods)| *key == event.code && *mods == modifiers)
    }
}

/// What a key press asks the table to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ToggleHelp,
    LineDown,
    LineUp,
    PageDown,
    PageUp,
    Top,
    Bottom,
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(KeyAction, KeyBinding)>,
}

impl Default for KeyMap {
    fn default() -> Self {
        const NONE: KeyModifiers = KeyModifiers::NONE;
        Self {
            bindings: vec![
                (
                    KeyAction::Quit,
                    KeyBinding::new(
                        &[(KeyCode::Char('c'), KeyModifiers::CONTROL), (KeyCode::Char('q'), NONE)],
                        "Ctrl+C / q",
                        "Quit application",
                    ),
                ),
                (
                    KeyAction::ToggleHelp,
                    KeyBinding::new(
                        &[(KeyCode::Char('g'), KeyModifiers::CONTROL), (KeyCode::Char('?'), NONE)],
                        "Ctrl+G / ?",
                        "Show/hide help",
                    ),
                ),
                (
                    KeyAction::LineDown,
                    KeyBinding::new(&[(KeyCode::Down, NONE), (KeyCode::Char('j'), NONE)], "↓ / j", "Scroll down"),
                ),
                (
                    KeyAction::LineUp,
                    KeyBinding::new(&[(KeyCode::Up, NONE), (KeyCode::Char('k'), NONE)], "↑ / k", "Scroll up"),
                ),
                (
                    KeyAction::PageDown,
                    KeyBinding::new(
                        &[(KeyCode::PageDown, NONE), (KeyCode::Char(' '), NONE)],
                        "PgDn / Space",
                        "Scroll one screen down",
                    ),
                ),
                (
                    KeyAction::PageUp,
                    KeyBinding::new(&[(KeyCode::PageUp, NONE)], "PgUp", "Scroll one screen up"),
                ),
                (
                    KeyAction::Top,
                    KeyBinding::new(&[(KeyCode::Home, NONE), (KeyCode::Char('g'), NONE)], "Home / g", "Jump to top"),
                ),
                (
                    KeyAction::Bottom,
                    KeyBinding::new(&[(KeyCode::End, NONE), (KeyCode::Char('G'), NONE)], "End / G", "Jump to bottom"),
                ),
            ],
        }
    }
}

impl KeyMap {
    /// Resolve a key press to an action
    pub fn action_for(&self, event: &KeyEvent) -> Option<KeyAction> {
        self.bindings
            .iter()
            .find(|(_, binding)| binding.matches(event))
            .map(|(action, _)| *action)
    }

    /// Get help text for all key bindings
    pub fn help_text(&self) -> String {
        self.bindings
            .iter()
            .map(|(_, binding)| format!("{:<14} {}", binding.label, binding.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
