pub mod config;
pub mod engine;
pub mod error;
pub mod world;

use tracing::info;

use engine::{
    DEFAULT_VIEWPORT_SIZE, Direction, Frame, MoveOutcome, PlayerState, SaveStore, build_frame,
    direction_for_key, load_state, save_state, try_handle_movement,
};
use world::World;

pub use error::{ConfigError, LoadError, PersistenceError};
pub use world::{AssetDir, Coord};

/// One running session: the loaded world, the player, and the save slot.
pub struct Game<S: SaveStore> {
    pub world: World,
    pub state: PlayerState,
    store: S,
    viewport_size: usize,
}

#[cfg(feature = "wasm")]
mod wasm_bindings {
    use super::*;
    use crate::engine::{DebugControls, MemorySaveStore};
    use serde_wasm_bindgen::to_value;
    use wasm_bindgen::prelude::*;

    /// Browser handle. The page fetches the JSON documents and owns
    /// localStorage; it reads `snapshot()` after each step to persist it.
    #[wasm_bindgen]
    pub struct WasmGame {
        game: Game<MemorySaveStore>,
        debug: DebugControls,
    }

    #[wasm_bindgen]
    impl WasmGame {
        /// Create a game from the tile-code table and an optional saved
        /// snapshot. Load floors, then call `init()`.
        #[wasm_bindgen(constructor)]
        pub fn new(tile_codes_json: &str, saved: Option<String>) -> Result<WasmGame, JsValue> {
            let mut world = World::new();
            world
                .load_tile_codes_from_str(tile_codes_json)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            let store = match saved {
                Some(raw) => MemorySaveStore::with_contents(raw),
                None => MemorySaveStore::new(),
            };
            Ok(WasmGame {
                game: Game::new(world, store),
                debug: DebugControls::new(),
            })
        }

        #[wasm_bindgen(js_name = loadFloor)]
        pub fn load_floor(&mut self, z: i32, floor_json: &str) -> Result<(), JsValue> {
            self.game
                .world
                .load_floor_from_str(z, floor_json)
                .map(|_| ())
                .map_err(|e| JsValue::from_str(&e.to_string()))
        }

        /// Place the player and return the first frame.
        #[wasm_bindgen]
        pub fn init(&mut self) -> JsValue {
            let frame = self.game.initialize();
            to_value(&frame).unwrap_or(JsValue::NULL)
        }

        /// Handle a key press; returns the new frame, or null if the key
        /// isn't a move.
        #[wasm_bindgen]
        pub fn step(&mut self, key: &str) -> JsValue {
            match self.game.step_key(key) {
                Some((frame, _)) => to_value(&frame).unwrap_or(JsValue::NULL),
                None => JsValue::NULL,
            }
        }

        #[wasm_bindgen]
        pub fn frame(&self) -> JsValue {
            to_value(&self.game.frame()).unwrap_or(JsValue::NULL)
        }

        /// Latest saved snapshot JSON, if anything has been saved.
        #[wasm_bindgen]
        pub fn snapshot(&self) -> Option<String> {
            self.game.store().contents().map(str::to_string)
        }

        #[wasm_bindgen(js_name = debugTeleport)]
        pub fn debug_teleport(&mut self, z: i32, y: i32, x: i32) -> JsValue {
            self.debug.teleport_to(&mut self.game, Coord::new(z, y, x));
            self.frame()
        }

        #[wasm_bindgen(js_name = debugRevealAll)]
        pub fn debug_reveal_all(&mut self) -> JsValue {
            self.debug.reveal_all(&mut self.game);
            self.frame()
        }

        #[wasm_bindgen(js_name = debugHideAll)]
        pub fn debug_hide_all(&mut self) -> JsValue {
            self.debug.hide_all(&mut self.game);
            self.frame()
        }
    }
}

impl<S: SaveStore> Game<S> {
    pub fn new(world: World, store: S) -> Self {
        Game {
            world,
            state: PlayerState::new(),
            store,
            viewport_size: DEFAULT_VIEWPORT_SIZE,
        }
    }

    /// Even sizes are rounded up to the next odd one when the grid is built.
    pub fn with_viewport_size(mut self, size: usize) -> Self {
        self.viewport_size = size;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Put the player on the start tile, then rehydrate from the save slot
    /// if it holds a snapshot.
    pub fn initialize(&mut self) -> Frame {
        self.state.initialize_at_start(&self.world);
        let restored = load_state(&self.store, &mut self.state);
        info!(
            restored,
            position = %self.state.position(),
            discovered = self.state.discovered_count(),
            "game_initialized"
        );
        self.frame()
    }

    /// Resolve one directional move and return what to draw.
    pub fn step(&mut self, direction: Direction) -> (Frame, MoveOutcome) {
        let outcome =
            try_handle_movement(&self.world, &mut self.state, &mut self.store, direction);
        (self.frame(), outcome)
    }

    /// Like `step`, from a key or direction name. Unrecognised input is a
    /// no-op and yields `None`.
    pub fn step_key(&mut self, key: &str) -> Option<(Frame, MoveOutcome)> {
        let direction = direction_for_key(key)?;
        Some(self.step(direction))
    }

    pub fn frame(&self) -> Frame {
        build_frame(&self.world, &self.state, self.viewport_size)
    }

    pub fn save(&mut self) -> bool {
        save_state(&mut self.store, &self.state)
    }
}
