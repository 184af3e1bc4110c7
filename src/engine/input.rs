use crate::engine::movement::Direction;

/// Map a key name to a movement direction. Arrow keys arrive as words from
/// the terminal front end and as `Arrow*` names from the browser.
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "w" | "W" | "k" | "up" | "ArrowUp" => Some(Direction::North),
        "s" | "S" | "j" | "down" | "ArrowDown" => Some(Direction::South),
        "a" | "A" | "h" | "left" | "ArrowLeft" => Some(Direction::West),
        "d" | "D" | "l" | "right" | "ArrowRight" => Some(Direction::East),
        other => Direction::from_name(other),
    }
}
