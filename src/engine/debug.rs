use tracing::info;

use crate::Game;
use crate::engine::movement::Direction;
use crate::engine::persist::SaveStore;
use crate::world::{Coord, Tile, TileData, TileKind};

const TEST_TELEPORTER_CODE: &str = "30";
const TEST_OFFSET: i32 = 5;

/// Snapshot of the debug-relevant state.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStatus {
    pub position: Coord,
    pub tile: Option<Tile>,
    pub discovered: usize,
}

/// Developer tooling. Built once by the entry point and handed the game on
/// each call; nothing here autosaves.
#[derive(Debug, Default)]
pub struct DebugControls {
    links_created: u32,
}

impl DebugControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the player anywhere, void included.
    pub fn teleport_to<S: SaveStore>(&mut self, game: &mut Game<S>, at: Coord) {
        game.state.set_position(at);
        game.state
            .set_status_message(format!("Debug: Teleported to {at}"));
        info!(to = %at, "debug_teleport");
    }

    pub fn go_to_origin<S: SaveStore>(&mut self, game: &mut Game<S>) {
        let start = game.world.get_start_position();
        self.teleport_to(game, start);
    }

    /// Step one tile ignoring void. Does nothing at the edge of the grid.
    pub fn shift<S: SaveStore>(&mut self, game: &mut Game<S>, direction: Direction) {
        let (dy, dx) = direction.delta();
        if let Some(to) = game.state.position().offset(dy, dx) {
            self.teleport_to(game, to);
        }
    }

    /// Mark every tile of the current floor discovered.
    pub fn reveal_all<S: SaveStore>(&mut self, game: &mut Game<S>) -> usize {
        let z = game.state.position().z;
        let Some(floor) = game.world.get_floor(z) else {
            return 0;
        };

        let count = floor.tiles.len();
        for pos in floor.tiles.keys() {
            game.state.mark_discovered(pos.on_floor(z));
        }
        game.state
            .set_status_message("Debug: Revealed all tiles on current floor");
        info!(z, count, "debug_reveal_all");
        count
    }

    pub fn hide_all<S: SaveStore>(&mut self, game: &mut Game<S>) {
        game.state.reset_discovery();
        game.state.set_status_message("Debug: Reset discovery");
        info!("debug_hide_all");
    }

    /// Place a bare tile under the player. False if the floor isn't loaded.
    pub fn spawn_tile<S: SaveStore>(&mut self, game: &mut Game<S>, code: &str) -> bool {
        let at = game.state.position();
        if !game.world.insert_tile(at, Tile::plain(code)) {
            return false;
        }
        game.state
            .set_status_message(format!("Debug: Spawned tile {code} at current position"));
        info!(code, at = %at, "debug_spawn_tile");
        true
    }

    pub fn spawn_tile_with_data<S: SaveStore>(
        &mut self,
        game: &mut Game<S>,
        code: &str,
        data: TileData,
    ) -> bool {
        let at = game.state.position();
        let tile = Tile {
            code: code.to_string(),
            data: Some(data),
        };
        game.world.insert_tile(at, tile)
    }

    /// Spawn a tile of `code` set up to exercise its behaviour: stairs get a
    /// destination five tiles away, teleporters get a linked partner, signs
    /// get text.
    pub fn test_tile<S: SaveStore>(&mut self, game: &mut Game<S>, code: &str) -> bool {
        let here = game.state.position();
        let def = game.world.resolve_code(code).cloned();
        let label = def
            .as_ref()
            .map(|d| d.label.clone())
            .unwrap_or_else(|| code.to_string());

        let placed = match def.map(|d| d.kind) {
            Some(kind) if kind.is_stairs() => self.spawn_tile_with_data(
                game,
                code,
                TileData {
                    to: here.offset(TEST_OFFSET, TEST_OFFSET),
                    ..TileData::default()
                },
            ),
            Some(TileKind::Teleport) => self.create_test_teleporter(game).is_some(),
            Some(TileKind::Message) => self.spawn_tile_with_data(
                game,
                code,
                TileData {
                    text: Some(format!("Test message for {label}")),
                    ..TileData::default()
                },
            ),
            _ => self.spawn_tile(game, code),
        };

        if placed {
            game.state
                .set_status_message(format!("Debug: Testing {label}"));
        }
        placed
    }

    /// Two linked teleporters: one under the player, one five tiles down and
    /// right. Returns the new link id; `None` if the floor isn't loaded or the
    /// partner would fall off the grid.
    pub fn create_test_teleporter<S: SaveStore>(&mut self, game: &mut Game<S>) -> Option<String> {
        let here = game.state.position();
        if !game.world.is_floor_loaded(here.z) {
            return None;
        }
        let there = here.offset(TEST_OFFSET, TEST_OFFSET)?;

        self.links_created += 1;
        let link_id = format!("debug-link-{}", self.links_created);

        for at in [here, there] {
            let tile = Tile {
                code: TEST_TELEPORTER_CODE.to_string(),
                data: Some(TileData {
                    link_id: Some(link_id.clone()),
                    ..TileData::default()
                }),
            };
            game.world.insert_tile(at, tile);
        }
        game.world.insert_link(here.z, link_id.clone(), [here, there]);
        info!(link_id = %link_id, from = %here, to = %there, "debug_teleporter_created");
        Some(link_id)
    }

    pub fn status<S: SaveStore>(&self, game: &Game<S>) -> DebugStatus {
        let position = game.state.position();
        DebugStatus {
            position,
            tile: game.world.tile_at(position).cloned(),
            discovered: game.state.discovered_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::persist::MemorySaveStore;
    use crate::world::World;

    fn game() -> Game<MemorySaveStore> {
        let mut world = World::new();
        world
            .load_tile_codes_from_str(
                r#"{ "codes": {
                    "00": { "kind": "origin", "label": "Floor", "silent": true },
                    "10": { "kind": "stairs_down", "label": "Stairs Down" },
                    "30": { "kind": "teleport", "label": "Teleporter" },
                    "40": { "kind": "message", "label": "Sign" }
                } }"#,
            )
            .expect("codes");
        world
            .load_floor_from_str(
                0,
                r#"{ "start": { "z": 0, "y": 1, "x": 1 }, "tiles": {
                    "0,0": { "code": "00" },
                    "1,1": { "code": "00" },
                    "2,2": { "code": "00" }
                } }"#,
            )
            .expect("floor");
        let mut game = Game::new(world, MemorySaveStore::new());
        game.initialize();
        game
    }

    #[test]
    fn teleport_ignores_void_and_does_not_save() {
        let mut game = game();
        let mut debug = DebugControls::new();

        debug.teleport_to(&mut game, Coord::new(3, 50, 50));
        assert_eq!(game.state.position(), Coord::new(3, 50, 50));
        assert_eq!(game.state.status_message(), "Debug: Teleported to 3 . 50 . 50");
        assert_eq!(game.store().write_count(), 0);

        debug.go_to_origin(&mut game);
        assert_eq!(game.state.position(), Coord::new(0, 1, 1));

        debug.shift(&mut game, Direction::North);
        assert_eq!(game.state.position(), Coord::new(0, 0, 1));
    }

    #[test]
    fn reveal_and_hide_discovery() {
        let mut game = game();
        let mut debug = DebugControls::new();

        assert_eq!(debug.reveal_all(&mut game), 3);
        assert!(game.state.is_discovered(Coord::new(0, 2, 2)));
        assert_eq!(debug.status(&game).discovered, 3);

        debug.hide_all(&mut game);
        assert_eq!(game.state.discovered_count(), 1);
        assert!(game.state.is_discovered(Coord::new(0, 1, 1)));
        assert_eq!(game.state.status_message(), "Debug: Reset discovery");
    }

    #[test]
    fn spawn_requires_loaded_floor() {
        let mut game = game();
        let mut debug = DebugControls::new();

        debug.teleport_to(&mut game, Coord::new(0, 7, 7));
        assert!(debug.spawn_tile(&mut game, "40"));
        assert_eq!(game.world.get_tile(0, 7, 7).map(|t| t.code.as_str()), Some("40"));

        debug.teleport_to(&mut game, Coord::new(9, 0, 0));
        assert!(!debug.spawn_tile(&mut game, "40"));
        assert_eq!(debug.status(&game).tile, None);
    }

    #[test]
    fn test_teleporter_links_both_ends() {
        let mut game = game();
        let mut debug = DebugControls::new();

        let link = debug.create_test_teleporter(&mut game).expect("link");
        let here = Coord::new(0, 1, 1);
        let there = Coord::new(0, 6, 6);
        assert_eq!(game.world.get_link_destination(0, &link, here), Some(there));
        assert_eq!(game.world.get_link_destination(0, &link, there), Some(here));

        let second = debug.create_test_teleporter(&mut game).expect("link");
        assert_ne!(link, second);
    }

    #[test]
    fn grid_edge_is_respected() {
        let mut game = game();
        let mut debug = DebugControls::new();
        let edge = Coord::new(0, i32::MAX, 0);

        debug.teleport_to(&mut game, edge);
        debug.shift(&mut game, Direction::South);
        assert_eq!(game.state.position(), edge);

        assert_eq!(debug.create_test_teleporter(&mut game), None);

        // Stairs still spawn, just without a destination.
        assert!(debug.test_tile(&mut game, "10"));
        let tile = game.world.get_tile(0, i32::MAX, 0).expect("stairs");
        assert_eq!(tile.data.as_ref().and_then(|d| d.to), None);
    }

    #[test]
    fn test_tile_sets_up_by_kind() {
        let mut game = game();
        let mut debug = DebugControls::new();

        assert!(debug.test_tile(&mut game, "10"));
        let tile = game.world.get_tile(0, 1, 1).expect("stairs");
        assert_eq!(tile.data.as_ref().and_then(|d| d.to), Some(Coord::new(0, 6, 6)));
        assert_eq!(game.state.status_message(), "Debug: Testing Stairs Down");

        assert!(debug.test_tile(&mut game, "40"));
        let tile = game.world.get_tile(0, 1, 1).expect("sign");
        assert_eq!(tile.text(), Some("Test message for Sign"));

        assert!(debug.test_tile(&mut game, "30"));
        assert!(game.world.get_tile(0, 6, 6).is_some());
    }
}
