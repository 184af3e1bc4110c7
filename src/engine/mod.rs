mod actions;
mod debug;
mod input;
mod movement;
mod output;
mod persist;
mod render;
mod state;

pub use actions::{
    INVALID_TELEPORTER, NO_DESTINATION, TELEPORTED, floor_change_message, handle_tile_interaction,
};

pub use debug::{DebugControls, DebugStatus};
pub use input::direction_for_key;
pub use movement::{Direction, MoveOutcome, try_handle_movement};
pub use output::{Cell, CodeInfo, Frame, Viewport};

pub use persist::{
    DEFAULT_SLOT, FileSaveStore, MemorySaveStore, SaveStore, decode_snapshot, encode_snapshot,
    load_state, save_state,
};

pub use render::{DEFAULT_VIEWPORT_SIZE, build_frame, build_viewport, format_position, render_text};
pub use state::{PlayerState, Snapshot};
