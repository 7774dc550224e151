// Roster management: candidate names and the used-set exclusion state.

use serde::{Deserialize, Serialize};

/// The working set of candidate names plus the names already drawn in the
/// current no-repeat cycle.
///
/// Names are unique (case-sensitive) and kept in insertion order; display
/// and iteration follow that order. The used set is always a subset of the
/// roster: removing a name removes it from both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    names: Vec<String>,
    used: Vec<String>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Roster::default()
    }

    /// Rebuild a roster from persisted parts.
    ///
    /// Input is sanitized the same way `import_lines` sanitizes raw text:
    /// blank and duplicate names are dropped. Used names not present in the
    /// roster (e.g. stale persisted state) are pruned so the subset
    /// invariant holds from the first snapshot onward.
    pub fn from_parts(names: Vec<String>, used: Vec<String>) -> Self {
        let mut roster = Roster::new();
        for name in names {
            roster.insert(name.trim());
        }
        for name in used {
            let name = name.trim();
            if roster.contains(name) && !roster.is_used(name) {
                roster.used.push(name.to_string());
            }
        }
        roster
    }

    /// Import names from raw multi-line text.
    ///
    /// Splits on line breaks, trims each line, drops empty lines and names
    /// already present (exact match), and appends the survivors in the
    /// order given. Returns the number of names actually added.
    pub fn import_lines(&mut self, raw: &str) -> usize {
        let mut added = 0;
        for line in raw.lines() {
            if self.insert(line.trim()) {
                added += 1;
            }
        }
        added
    }

    fn insert(&mut self, name: &str) -> bool {
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Remove a name from the roster and the used set.
    ///
    /// Idempotent: removing an absent name is a no-op. Returns whether the
    /// roster actually changed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.used.retain(|n| n != name);
        self.names.len() != before
    }

    /// Empty the roster and the used set.
    pub fn clear(&mut self) {
        self.names.clear();
        self.used.clear();
    }

    /// All names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Names drawn in the current no-repeat cycle, in draw order.
    pub fn used(&self) -> &[String] {
        &self.used
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names not yet drawn in the current cycle, in roster order.
    pub fn available(&self) -> Vec<String> {
        self.names
            .iter()
            .filter(|n| !self.is_used(n))
            .cloned()
            .collect()
    }

    pub fn available_count(&self) -> usize {
        self.names.iter().filter(|n| !self.is_used(n)).count()
    }

    /// Mark names as drawn. Names already used (or unknown) are skipped.
    pub fn mark_used(&mut self, names: &[String]) {
        for name in names {
            if self.contains(name) && !self.is_used(name) {
                self.used.push(name.clone());
            }
        }
    }

    /// Return names to the available pool.
    pub fn unmark_used(&mut self, names: &[String]) {
        self.used.retain(|n| !names.contains(n));
    }

    /// Clear the used set, starting a fresh no-repeat cycle.
    pub fn reset_used(&mut self) {
        self.used.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_of(names: &[&str]) -> Roster {
        let mut roster = Roster::new();
        roster.import_lines(&names.join("\n"));
        roster
    }

    #[test]
    fn import_trims_and_drops_empty_lines() {
        let mut roster = Roster::new();
        let added = roster.import_lines("  Alice  \n\nBob\n   \nCarol");
        assert_eq!(added, 3);
        assert_eq!(roster.names(), &["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn import_drops_exact_duplicates() {
        let mut roster = roster_of(&["Alice", "Bob"]);
        let added = roster.import_lines("Alice\nDave\nBob\nDave");
        assert_eq!(added, 1);
        assert_eq!(roster.names(), &["Alice", "Bob", "Dave"]);
    }

    #[test]
    fn import_is_case_sensitive() {
        let mut roster = roster_of(&["alice"]);
        let added = roster.import_lines("Alice");
        assert_eq!(added, 1);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn import_nothing_new_is_noop() {
        let mut roster = roster_of(&["Alice"]);
        let added = roster.import_lines("Alice\n\n  ");
        assert_eq!(added, 0);
        assert_eq!(roster.names(), &["Alice"]);
    }

    #[test]
    fn import_preserves_insertion_order() {
        let roster = roster_of(&["Zoe", "Alice", "Mid"]);
        assert_eq!(roster.names(), &["Zoe", "Alice", "Mid"]);
    }

    #[test]
    fn remove_also_clears_used() {
        let mut roster = roster_of(&["Alice", "Bob"]);
        roster.mark_used(&["Alice".to_string()]);
        assert!(roster.remove("Alice"));
        assert!(!roster.contains("Alice"));
        assert!(!roster.is_used("Alice"));
        assert_eq!(roster.available_count(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut roster = roster_of(&["Alice"]);
        assert!(roster.remove("Alice"));
        assert!(!roster.remove("Alice"));
        assert!(roster.is_empty());
    }

    #[test]
    fn available_excludes_used_in_roster_order() {
        let mut roster = roster_of(&["Alice", "Bob", "Carol", "Dave"]);
        roster.mark_used(&["Bob".to_string(), "Dave".to_string()]);
        assert_eq!(roster.available(), vec!["Alice", "Carol"]);
        assert_eq!(roster.available_count(), 2);
    }

    #[test]
    fn mark_used_skips_unknown_and_duplicate_names() {
        let mut roster = roster_of(&["Alice"]);
        roster.mark_used(&["Alice".to_string(), "Ghost".to_string()]);
        roster.mark_used(&["Alice".to_string()]);
        assert_eq!(roster.used(), &["Alice"]);
    }

    #[test]
    fn unmark_used_restores_availability() {
        let mut roster = roster_of(&["Alice", "Bob"]);
        roster.mark_used(&["Alice".to_string(), "Bob".to_string()]);
        roster.unmark_used(&["Alice".to_string()]);
        assert_eq!(roster.available(), vec!["Alice"]);
        assert!(roster.is_used("Bob"));
    }

    #[test]
    fn reset_used_keeps_roster() {
        let mut roster = roster_of(&["Alice", "Bob"]);
        roster.mark_used(&["Alice".to_string()]);
        roster.reset_used();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.available_count(), 2);
    }

    #[test]
    fn clear_empties_everything() {
        let mut roster = roster_of(&["Alice", "Bob"]);
        roster.mark_used(&["Alice".to_string()]);
        roster.clear();
        assert!(roster.is_empty());
        assert!(roster.used().is_empty());
    }

    #[test]
    fn from_parts_prunes_stale_used_names() {
        let roster = Roster::from_parts(
            vec!["Alice".into(), "Bob".into()],
            vec!["Bob".into(), "Ghost".into(), "Bob".into()],
        );
        assert_eq!(roster.names(), &["Alice", "Bob"]);
        assert_eq!(roster.used(), &["Bob"]);
    }

    #[test]
    fn from_parts_sanitizes_names() {
        let roster = Roster::from_parts(
            vec!["  Alice ".into(), "".into(), "Alice".into()],
            vec![],
        );
        assert_eq!(roster.names(), &["Alice"]);
    }
}
