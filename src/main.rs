//! Rolling Ball headless runner
//!
//! Plays one level with the given equations and reports the outcome.
//!
//! Usage: `rolling-ball <level-id | level.json> <EXPR[;CONDITION]>...`

use std::process::ExitCode;

use rolling_ball::consts::SIM_DT;
use rolling_ball::{LevelBlueprint, RoundEnd, Simulator, parse};

/// Give up on rounds that neither win nor lose within this many seconds
const MAX_ROUND_SECS: f64 = 120.0;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((level_arg, equations)) = args.split_first() else {
        eprintln!("Usage: rolling-ball <level-id | level.json> <EXPR[;CONDITION]>...");
        return ExitCode::from(2);
    };

    let blueprint = match load_level(level_arg) {
        Ok(blueprint) => blueprint,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };
    log::info!("Playing {} (id {})", blueprint.name, blueprint.id);

    let mut sim = Simulator::new(blueprint.instantiate(), |_, _| {});
    let mut num_equations = 0;
    for equation in equations {
        let (expression, condition) = equation
            .split_once(';')
            .unwrap_or((equation.as_str(), ""));
        match parse(expression, condition) {
            Ok(Some(function)) => {
                sim.add_graph(function);
                num_equations += 1;
            }
            Ok(None) => log::debug!("Skipping empty equation"),
            Err(e) => {
                eprintln!("Syntax error in '{equation}': {e}");
                return ExitCode::from(2);
            }
        }
    }

    sim.toggle_playing();
    let max_ticks = (MAX_ROUND_SECS / SIM_DT).ceil() as u32;
    let outcome = (0..max_ticks).find_map(|_| sim.update());

    match outcome {
        Some(RoundEnd {
            won: true,
            elapsed_secs,
        }) => {
            let score = blueprint.score(num_equations, elapsed_secs);
            println!("Won in {elapsed_secs:.2}s with {num_equations} equation(s)");
            println!("Score: {:.0}%", score * 100.0);
            ExitCode::SUCCESS
        }
        Some(RoundEnd {
            won: false,
            elapsed_secs,
        }) => {
            let (x, y) = sim.ball_position();
            println!("Lost after {elapsed_secs:.2}s at ({x:.2}, {y:.2})");
            ExitCode::FAILURE
        }
        None => {
            println!("No result after {MAX_ROUND_SECS:.0}s");
            ExitCode::FAILURE
        }
    }
}

/// A built-in level id or a path to a JSON blueprint
fn load_level(arg: &str) -> Result<LevelBlueprint, String> {
    if let Ok(id) = arg.parse::<u32>() {
        return LevelBlueprint::by_id(id).ok_or_else(|| format!("No built-in level with id {id}"));
    }

    let json = std::fs::read_to_string(arg).map_err(|e| format!("Cannot read {arg}: {e}"))?;
    LevelBlueprint::from_json(&json).map_err(|e| format!("Invalid level file {arg}: {e}"))
}
