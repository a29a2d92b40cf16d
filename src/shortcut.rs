//! Abbreviation expansion at word boundaries.
//!
//! A shortcut maps an ASCII trigger (`vn`) to an arbitrary Unicode
//! replacement (`Việt Nam`). Shortcuts fire only when a word boundary is
//! reached and the raw spelling of the buffer equals a trigger; they never
//! fire mid-word. The typed case is propagated onto the replacement:
//! `VN` expands to `VIỆT NAM` and `Vn` to `Việt Nam`.
use std::collections::HashMap;

/// The shortcut table. Triggers are matched case-insensitively; iteration
/// order is irrelevant because only exact matches fire.
#[derive(Debug, Default)]
pub struct ShortcutTable {
    entries: HashMap<String, String>,
}

impl ShortcutTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a shortcut.
    pub fn add(&mut self, trigger: &str, replacement: &str) {
        self.entries
            .insert(trigger.to_lowercase(), replacement.to_string());
    }

    /// Remove a shortcut; reports whether it existed.
    pub fn remove(&mut self, trigger: &str) -> bool {
        self.entries.remove(&trigger.to_lowercase()).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expansion for a finished word, with the boundary character appended so
    /// the whole replacement goes out as one edit.
    pub fn expand(&self, typed: &str, boundary: Option<char>) -> Option<String> {
        let replacement = self.entries.get(&typed.to_lowercase())?;
        let mut output = apply_case(typed, replacement);
        if let Some(ch) = boundary {
            output.push(ch);
        }
        Some(output)
    }
}

/// Propagate the case of the typed trigger onto the replacement.
fn apply_case(typed: &str, replacement: &str) -> String {
    let mut chars = typed.chars();
    let first_upper = chars.next().map(|c| c.is_uppercase()).unwrap_or(false);
    let all_upper = first_upper && typed.chars().all(|c| !c.is_lowercase());

    if all_upper && typed.chars().count() > 1 {
        return replacement.to_uppercase();
    }
    if first_upper {
        let mut out = replacement.chars();
        return match out.next() {
            Some(c) => c.to_uppercase().collect::<String>() + out.as_str(),
            None => String::new(),
        };
    }
    replacement.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ShortcutTable {
        let mut t = ShortcutTable::new();
        t.add("vn", "Việt Nam");
        t.add("hcm", "Hồ Chí Minh");
        t
    }

    #[test]
    fn exact_match_expands_with_boundary() {
        let t = table();
        assert_eq!(t.expand("vn", Some(' ')).as_deref(), Some("Việt Nam "));
        assert_eq!(t.expand("hcm", None).as_deref(), Some("Hồ Chí Minh"));
    }

    #[test]
    fn prefixes_do_not_fire() {
        let t = table();
        assert_eq!(t.expand("v", Some(' ')), None);
        assert_eq!(t.expand("vns", Some(' ')), None);
    }

    #[test]
    fn case_propagation() {
        let t = table();
        assert_eq!(t.expand("VN", None).as_deref(), Some("VIỆT NAM"));
        assert_eq!(t.expand("Vn", None).as_deref(), Some("Việt Nam"));
        assert_eq!(t.expand("vn", None).as_deref(), Some("Việt Nam"));
    }

    #[test]
    fn add_remove_clear() {
        let mut t = table();
        assert_eq!(t.len(), 2);
        assert!(t.remove("VN"));
        assert!(!t.remove("vn"));
        assert_eq!(t.len(), 1);
        t.clear();
        assert!(t.is_empty());
    }

    #[test]
    fn replacement_can_be_replaced() {
        let mut t = ShortcutTable::new();
        t.add("btw", "by the way");
        t.add("btw", "nhân tiện");
        assert_eq!(t.expand("btw", None).as_deref(), Some("nhân tiện"));
        assert_eq!(t.len(), 1);
    }
}
