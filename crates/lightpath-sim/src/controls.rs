use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Keys currently held down, as reported by the input layer.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    held: HashSet<String>,
}

impl InputFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            held: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }
}

/// Per-step turning intent of one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnIntent {
    pub left: bool,
    pub right: bool,
}

impl TurnIntent {
    pub fn swapped(self) -> Self {
        Self {
            left: self.right,
            right: self.left,
        }
    }
}

/// Left/right bindings of one player seat. Unbound keys never fire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlScheme {
    pub left: Option<String>,
    pub right: Option<String>,
}

impl ControlScheme {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: Some(left.into()),
            right: Some(right.into()),
        }
    }
}

/// Control bindings for every seat, indexed by zero-based slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlMap {
    pub schemes: Vec<ControlScheme>,
}

impl Default for ControlMap {
    fn default() -> Self {
        Self {
            schemes: vec![
                ControlScheme::new("ArrowLeft", "ArrowRight"),
                ControlScheme::new("KeyA", "KeyD"),
                ControlScheme::new("KeyJ", "KeyL"),
                ControlScheme::new("Numpad4", "Numpad6"),
            ],
        }
    }
}

impl ControlMap {
    pub fn scheme(&self, slot: usize) -> Option<&ControlScheme> {
        self.schemes.get(slot)
    }

    /// Raw intent for `slot`. Unmapped seats and keys resolve to no turn.
    pub fn intent(&self, slot: usize, input: &InputFrame) -> TurnIntent {
        let Some(scheme) = self.scheme(slot) else {
            return TurnIntent::default();
        };
        let held = |key: &Option<String>| key.as_deref().is_some_and(|k| input.is_held(k));
        TurnIntent {
            left: held(&scheme.left),
            right: held(&scheme.right),
        }
    }

    /// Replace the bindings of `slot`, growing the table with unbound
    /// seats if needed.
    pub fn bind(&mut self, slot: usize, scheme: ControlScheme) {
        if slot >= self.schemes.len() {
            self.schemes.resize_with(slot + 1, ControlScheme::default);
        }
        self.schemes[slot] = scheme;
    }
}
