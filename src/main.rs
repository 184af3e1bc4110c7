use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dungeon_walker::config::{Config, DEFAULT_CONFIG_PATH};
use dungeon_walker::engine::{
    DebugControls, Direction, FileSaveStore, Frame, MoveOutcome, render_text,
};
use dungeon_walker::world::World;
use dungeon_walker::{AssetDir, Coord, Game};

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn flush_frame(frame: &Frame) {
    println!();
    print!("{}", render_text(frame));
}

fn print_help() {
    println!("Move with w/a/s/d, arrow names (up, down, left, right) or north/south/east/west.");
    println!("'look' redraws, 'quit' exits.");
    println!("Debug: :tp Z Y X | :origin | :shift DIR | :reveal | :hide | :spawn CODE");
    println!("       :test CODE | :teleporter | :status");
}

fn main() -> ExitCode {
    let config_path: PathBuf = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config '{}': {e}", config_path.display());
            return ExitCode::FAILURE;
        }
    };
    let base = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let config = config.resolve_relative_to(&base);

    init_tracing(&config.log_filter);
    info!(config = %config_path.display(), "=== Dungeon Walker Startup ===");

    let assets = AssetDir::new(&config.asset_dir);
    let world = match World::load_from_dir(&assets, &config.floors) {
        Ok(w) => w,
        Err(e) => {
            error!(error = %e, assets = %assets.root().display(), "startup_failed");
            eprintln!("Failed to load game: {e}");
            return ExitCode::FAILURE;
        }
    };

    let store = FileSaveStore::new(&config.save_path);
    let mut game = Game::new(world, store).with_viewport_size(config.viewport_size);
    let mut debug = DebugControls::new();

    println!("Coordinate Dungeon Walker");
    println!("Type 'help' for controls.");
    flush_frame(&game.initialize());

    match run_loop(&mut game, &mut debug) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "input_failed");
            ExitCode::FAILURE
        }
    }
}

fn run_loop(game: &mut Game<FileSaveStore>, debug: &mut DebugControls) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!("\nGoodbye.");
            return Ok(());
        };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let lower = input.to_lowercase();
        if lower == "quit" || lower == "exit" {
            println!("Goodbye.");
            return Ok(());
        } else if lower == "help" || lower == "?" {
            print_help();
        } else if lower == "look" {
            flush_frame(&game.frame());
        } else if let Some(cmd) = input.strip_prefix(':') {
            run_debug_command(game, debug, cmd);
            flush_frame(&game.frame());
        } else {
            match game.step_key(input) {
                Some((frame, MoveOutcome::Blocked)) => {
                    println!("You can't go that way.");
                    flush_frame(&frame);
                }
                Some((frame, _)) => flush_frame(&frame),
                None => println!("I don't understand that command."),
            }
        }
    }
}

fn run_debug_command(game: &mut Game<FileSaveStore>, debug: &mut DebugControls, cmd: &str) {
    let mut parts = cmd.split_whitespace();
    let verb = parts.next().unwrap_or("");
    let args: Vec<&str> = parts.collect();

    match verb {
        "tp" => {
            let nums: Vec<i32> = args.iter().filter_map(|a| a.parse().ok()).collect();
            match nums.as_slice() {
                [z, y, x] => debug.teleport_to(game, Coord::new(*z, *y, *x)),
                _ => println!("Usage: :tp Z Y X"),
            }
        }
        "origin" => debug.go_to_origin(game),
        "shift" => match args.first().and_then(|d| Direction::from_name(d)) {
            Some(direction) => debug.shift(game, direction),
            None => println!("Usage: :shift north|south|east|west"),
        },
        "reveal" => {
            debug.reveal_all(game);
        }
        "hide" => debug.hide_all(game),
        "spawn" | "test" => {
            let Some(code) = args.first() else {
                println!("Usage: :{verb} CODE");
                return;
            };
            let placed = if verb == "spawn" {
                debug.spawn_tile(game, code)
            } else {
                debug.test_tile(game, code)
            };
            if !placed {
                println!("No floor loaded here.");
            }
        }
        "teleporter" => match debug.create_test_teleporter(game) {
            Some(link_id) => println!("Created link {link_id}."),
            None => println!("No floor loaded here."),
        },
        "status" => {
            let status = debug.status(game);
            println!(
                "position={} tile={} discovered={}",
                status.position,
                status.tile.map(|t| t.code).unwrap_or_else(|| "--".to_string()),
                status.discovered
            );
        }
        _ => println!("Unknown debug command ':{verb}'. Type 'help'."),
    }
}
