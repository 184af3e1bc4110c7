use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::world::{Coord, World};

/// Flat save snapshot. Both fields are optional on the way in so that a
/// partial document only overwrites what it carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub position: Option<Coord>,
    #[serde(default)]
    pub discovered: Option<Vec<String>>,
}

/// Where the player is, what they've seen, and the one-line status.
#[derive(Debug, Clone)]
pub struct PlayerState {
    position: Coord,
    discovered: HashSet<Coord>,
    status_message: String,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerState {
    pub fn new() -> Self {
        PlayerState {
            position: Coord::ORIGIN,
            discovered: HashSet::new(),
            status_message: String::new(),
        }
    }

    pub fn initialize_at_start(&mut self, world: &World) {
        let start = world.get_start_position();
        self.set_position(start);
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    /// Overwrites the position without any validity check and marks it
    /// discovered.
    pub fn set_position(&mut self, at: Coord) {
        self.position = at;
        self.mark_discovered(at);
    }

    pub fn mark_discovered(&mut self, at: Coord) {
        self.discovered.insert(at);
    }

    pub fn is_discovered(&self, at: Coord) -> bool {
        self.discovered.contains(&at)
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    /// Forget everything except the tile the player stands on.
    pub fn reset_discovery(&mut self) {
        self.discovered.clear();
        self.discovered.insert(self.position);
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn serialize(&self) -> Snapshot {
        let mut keys: Vec<Coord> = self.discovered.iter().copied().collect();
        keys.sort_unstable();
        Snapshot {
            position: Some(self.position),
            discovered: Some(keys.iter().map(Coord::key).collect()),
        }
    }

    pub fn deserialize(&mut self, snapshot: &Snapshot) {
        if let Some(discovered) = &snapshot.discovered {
            let mut set = HashSet::with_capacity(discovered.len());
            for key in discovered {
                match Coord::parse_key(key) {
                    Some(at) => {
                        set.insert(at);
                    }
                    None => warn!(key = %key, "snapshot_discovered_key_skipped"),
                }
            }
            self.discovered = set;
        }

        if let Some(position) = snapshot.position {
            self.position = position;
        }
        self.discovered.insert(self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_position_marks_discovered() {
        let mut state = PlayerState::new();
        let at = Coord::new(2, -1, 5);
        assert!(!state.is_discovered(at));

        state.set_position(at);
        assert_eq!(state.position(), at);
        assert!(state.is_discovered(at));
    }

    #[test]
    fn status_message_is_last_write_wins() {
        let mut state = PlayerState::new();
        state.set_status_message("first");
        state.set_status_message("second");
        assert_eq!(state.status_message(), "second");
        state.clear_status_message();
        assert_eq!(state.status_message(), "");
    }

    #[test]
    fn snapshot_round_trip_keeps_position_and_membership() {
        let mut state = PlayerState::new();
        for at in [
            Coord::new(0, 0, 0),
            Coord::new(0, 0, 1),
            Coord::new(1, 4, -3),
            Coord::new(-2, 10, 10),
        ] {
            state.set_position(at);
        }

        let json = serde_json::to_string(&state.serialize()).expect("encode");
        let decoded: Snapshot = serde_json::from_str(&json).expect("decode");

        let mut restored = PlayerState::new();
        restored.deserialize(&decoded);

        assert_eq!(restored.position(), state.position());
        assert_eq!(restored.discovered, state.discovered);
    }

    #[test]
    fn deserialize_tolerates_missing_fields() {
        let mut state = PlayerState::new();
        state.set_position(Coord::new(0, 3, 3));
        state.mark_discovered(Coord::new(0, 3, 4));

        let only_discovered: Snapshot =
            serde_json::from_str(r#"{ "discovered": ["0,9,9"] }"#).expect("decode");
        state.deserialize(&only_discovered);
        assert_eq!(state.position(), Coord::new(0, 3, 3));
        assert!(state.is_discovered(Coord::new(0, 9, 9)));
        assert!(!state.is_discovered(Coord::new(0, 3, 4)));
        assert!(state.is_discovered(Coord::new(0, 3, 3)));

        let empty: Snapshot = serde_json::from_str("{}").expect("decode");
        state.deserialize(&empty);
        assert_eq!(state.position(), Coord::new(0, 3, 3));
        assert_eq!(state.discovered_count(), 2);
    }

    #[test]
    fn deserialize_skips_unparseable_keys() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{ "position": { "z": 1, "y": 2, "x": 3 }, "discovered": ["1,2,3", "bogus", "4,5"] }"#,
        )
        .expect("decode");

        let mut state = PlayerState::new();
        state.deserialize(&snapshot);
        assert_eq!(state.position(), Coord::new(1, 2, 3));
        assert_eq!(state.discovered_count(), 1);
    }

    #[test]
    fn serialized_keys_are_sorted_text() {
        let mut state = PlayerState::new();
        state.set_position(Coord::new(1, 0, 0));
        state.set_position(Coord::new(0, 5, 5));

        let snapshot = state.serialize();
        assert_eq!(
            snapshot.discovered,
            Some(vec!["0,5,5".to_string(), "1,0,0".to_string()])
        );
    }

    #[test]
    fn reset_discovery_keeps_current_tile() {
        let mut state = PlayerState::new();
        state.set_position(Coord::new(0, 0, 0));
        state.set_position(Coord::new(0, 0, 1));
        state.reset_discovery();
        assert_eq!(state.discovered_count(), 1);
        assert!(state.is_discovered(Coord::new(0, 0, 1)));
    }
}
