/// Named key events mapped to fixed operations
use std::collections::HashMap;

use crate::error::EngineError;
use crate::operation::{Operation, Timing};
use crate::script::parse_keymap;

/// Table from key names to the operation each key requests
///
/// Key names follow the browser `KeyboardEvent.key` values: printable keys
/// are the character itself, others are names such as `ArrowLeft`, `Home`
/// or `PageDown`.
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    bindings: HashMap<String, Operation>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrows, WASD and the numeric keypad turn the world by `degrees`.
    pub fn standard(degrees: f64, timing: Timing) -> Self {
        let d = degrees;
        let table: [(&[&str], (f64, f64)); 8] = [
            (&["ArrowLeft", "a", "A", "4"], (0.0, -d)),
            (&["ArrowRight", "d", "D", "6"], (0.0, d)),
            (&["ArrowUp", "w", "W", "8"], (-d, 0.0)),
            (&["ArrowDown", "s", "S", "2"], (d, 0.0)),
            (&["7", "Home"], (-d, -d)),
            (&["9", "PageUp"], (-d, d)),
            (&["1", "End"], (d, -d)),
            (&["3", "PageDown"], (d, d)),
        ];

        let mut map = Self::new();
        for (keys, (x, y)) in table {
            let op = Operation::rotate(x, y, 0.0).with_timing(timing);
            for key in keys {
                map.bind(key, op);
            }
        }
        map
    }

    /// Read bindings in the key map text format.
    pub fn parse(input: &str, timing: Timing) -> Result<Self, EngineError> {
        let mut map = Self::new();
        for (key, op) in parse_keymap(input, timing)? {
            if map.bindings.contains_key(&key) {
                log::warn!("key `{key}` bound more than once, keeping the last binding");
            }
            map.bind(&key, op);
        }
        Ok(map)
    }

    pub fn bind(&mut self, key: &str, op: Operation) {
        self.bindings.insert(key.to_string(), op);
    }

    /// Operation requested by `key`, if any
    pub fn lookup(&self, key: &str) -> Option<Operation> {
        self.bindings.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationKind;
    use std::time::Duration;

    #[test]
    fn test_standard_bindings() {
        let timing = Timing::new(Duration::from_millis(500), 30).unwrap();
        assert!(KeyMap::new().is_empty());
        let map = KeyMap::standard(30.0, timing);
        assert!(!map.is_empty());
        assert_eq!(map.len(), 24);

        let left = map.lookup("ArrowLeft").unwrap();
        assert_eq!(left, Operation::rotate(0.0, -30.0, 0.0).with_timing(timing));
        assert_eq!(map.lookup("a"), Some(left));
        assert_eq!(map.lookup("PageDown").unwrap().amount.x, 30.0);
        assert_eq!(map.lookup("PageDown").unwrap().amount.y, 30.0);
        assert_eq!(map.lookup("q"), None);
    }

    #[test]
    fn test_parsed_bindings_replace_earlier_ones() {
        let text = "z => scale 2 2 2\nz, x => translate 1 0 0\n";
        let map = KeyMap::parse(text, Timing::immediate()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.lookup("z").unwrap().kind, OperationKind::Translate);
    }
}
