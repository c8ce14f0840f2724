//! kartbox - interactive rigid body sandbox
//!
//! Headless driver: a line-oriented command loop stands in for the
//! scripting bridge, issuing thread-safe world operations while the
//! simulation ticks in the background. After every command the driver pulls
//! accumulated pose changes and forwards them to the renderer seam, the way
//! a render loop would.

use std::io::{self, BufRead, Write};

use kartbox::config::AppConfig;
use kartbox::repl::{self, Command};
use kartbox_core::{Game, NullRenderer, Renderer, Status};

fn main() {
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    if let Some(e) = load_error {
        log::warn!("Failed to load config: {e}. Using defaults.");
    }

    let mut game = Game::with_config(NullRenderer, config.physics.to_world_config());
    game.physics().run();
    println!("kartbox ready ('help' for commands)");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let Some(Ok(line)) = lines.next() else {
            break;
        };

        match repl::parse(&line) {
            Ok(Some(command)) => {
                if !execute(&mut game, &config, command) {
                    break;
                }
            }
            Ok(None) => {}
            Err(message) => println!("error: {message}"),
        }

        let forwarded = game.pump_changes();
        if forwarded > 0 {
            log::debug!("{forwarded} transform updates forwarded");
        }
    }

    game.physics().stop();
    log::info!("simulation stopped, bye");
}

/// Apply one command; returns `false` when the driver should exit
fn execute<R: Renderer>(game: &mut Game<R>, config: &AppConfig, command: Command) -> bool {
    match command {
        Command::AddCube { x, y, z, scale } => {
            let scale = scale.unwrap_or(config.game.default_cube_scale);
            let id = game.add_cube(x, y, z, scale);
            println!("cube {id}");
        }
        Command::AddCar { x, y, z } => {
            let id = game.add_car(x, y, z);
            println!("car {id}");
        }
        Command::Remove { id } => game.remove_cube(id),
        Command::Engine { id, active } => game.physics().set_engine_force(id, active),
        Command::Steer { id, value } => game.physics().set_steering(id, value),
        Command::Step { ticks } => {
            if game.physics().status() != Status::Idle {
                println!("error: stop the simulation before stepping manually");
            } else {
                for _ in 0..ticks {
                    game.physics().single_step();
                }
            }
        }
        Command::Run => game.physics().run(),
        Command::Stop => game.physics().stop(),
        Command::Dump => print!("{}", game.physics().debug_dump()),
        Command::Help => println!("{}", repl::USAGE),
        Command::Quit => return false,
    }
    true
}
