//! Command parser for the interactive driver
//!
//! The binary reads one command per line and forwards it to the game, the
//! same shape of calls a scripting bridge would make. Parsing is kept apart
//! from execution so it can be tested without a world.

use kartbox_physics::ObjectId;

/// One parsed user command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Drop a cube; `scale` falls back to the configured default
    AddCube {
        x: f32,
        y: f32,
        z: f32,
        scale: Option<f32>,
    },
    /// Drop a vehicle
    AddCar { x: f32, y: f32, z: f32 },
    /// Remove an object
    Remove { id: ObjectId },
    /// Switch a vehicle's engine on or off
    Engine { id: ObjectId, active: bool },
    /// Steer a vehicle's front wheels
    Steer { id: ObjectId, value: f32 },
    /// Advance N fixed steps (only valid while stopped)
    Step { ticks: u32 },
    /// Start the background simulation thread
    Run,
    /// Stop the background simulation thread
    Stop,
    /// Print the world listing
    Dump,
    /// Print the command summary
    Help,
    /// Leave the driver
    Quit,
}

/// Parse one input line; `None` for blank lines
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match keyword {
        "add" => Command::AddCube {
            x: number(&args, 0)?,
            y: number(&args, 1)?,
            z: number(&args, 2)?,
            scale: if args.len() > 3 {
                Some(number(&args, 3)?)
            } else {
                None
            },
        },
        "car" => Command::AddCar {
            x: number(&args, 0)?,
            y: number(&args, 1)?,
            z: number(&args, 2)?,
        },
        "remove" => Command::Remove { id: id(&args, 0)? },
        "engine" => Command::Engine {
            id: id(&args, 0)?,
            active: match args.get(1).copied() {
                Some("on") => true,
                Some("off") => false,
                other => return Err(format!("expected on|off, got {other:?}")),
            },
        },
        "steer" => Command::Steer {
            id: id(&args, 0)?,
            value: number(&args, 1)?,
        },
        "step" => Command::Step {
            ticks: match args.first() {
                Some(word) => word
                    .parse()
                    .map_err(|_| format!("bad tick count '{word}'"))?,
                None => 1,
            },
        },
        "run" => Command::Run,
        "stop" => Command::Stop,
        "dump" => Command::Dump,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

/// Usage text for the `help` command
pub const USAGE: &str = "\
commands:
  add <x> <y> <z> [scale]   drop a cube
  car <x> <y> <z>           drop a vehicle
  remove <id>               remove an object
  engine <id> on|off        toggle a vehicle's engine
  steer <id> <value>        steer a vehicle's front wheels
  step [n]                  advance n fixed steps (while stopped)
  run | stop                start/stop the simulation thread
  dump                      print the world listing
  quit                      leave";

fn number(args: &[&str], index: usize) -> Result<f32, String> {
    let word = args
        .get(index)
        .ok_or_else(|| format!("missing argument {}", index + 1))?;
    word.parse()
        .map_err(|_| format!("bad number '{word}' at argument {}", index + 1))
}

fn id(args: &[&str], index: usize) -> Result<ObjectId, String> {
    let word = args
        .get(index)
        .ok_or_else(|| format!("missing argument {}", index + 1))?;
    word.parse()
        .map_err(|_| format!("bad object id '{word}' at argument {}", index + 1))
}
