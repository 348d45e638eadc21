#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless maze chase rounds.
//!
//! Drives the fixed per-tick order: player intent, clock, player control,
//! ghost control, referee. Notable events are printed as they happen and a
//! summary closes the run.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use maze_chase_core::{Command, Direction, Event};
use maze_chase_system_ghost_ai::{Config as GhostAiConfig, GhostAi};
use maze_chase_system_player_control::PlayerControl;
use maze_chase_system_referee::Referee;
use maze_chase_world::{apply, query, World};

const TICK_DT: Duration = Duration::from_micros(16_667);

#[derive(Debug, Parser)]
#[command(name = "maze-chase", about = "Headless maze chase simulation runner")]
struct Args {
    /// Seed for the ghost controller's random draws.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Maximum number of ticks to simulate before stopping.
    #[arg(long, default_value_t = 3_600)]
    max_ticks: u64,

    /// Intent script, one symbol per tick: `U`, `D`, `L`, `R`, or `.` for no
    /// intent. The final symbol is held for the rest of the run.
    #[arg(long)]
    intents: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let script = args.intents.as_deref().map(parse_intents).transpose()?;

    let mut world = World::new().context("constructing the classic level")?;
    let mut ghost_ai = GhostAi::new(GhostAiConfig::new(args.seed));
    let player_control = PlayerControl;
    let referee = Referee;

    let mut ticks_run = 0;
    while ticks_run < args.max_ticks && !query::phase(&world).is_terminal() {
        let intent = scripted_intent(script.as_deref(), ticks_run);
        let events = run_tick(&mut world, &player_control, &mut ghost_ai, &referee, intent);
        report(ticks_run, &events);
        ticks_run += 1;
    }

    let player = query::player(&world);
    println!(
        "{:?} after {ticks_run} ticks: score {}, lives {}, pellets left {}",
        query::phase(&world),
        player.score,
        player.lives,
        query::pellets_remaining(&world),
    );
    Ok(())
}

/// Runs one simulation tick in the fixed order and returns its events.
fn run_tick(
    world: &mut World,
    player_control: &PlayerControl,
    ghost_ai: &mut GhostAi,
    referee: &Referee,
    intent: Option<Direction>,
) -> Vec<Event> {
    let mut events = Vec::new();
    apply(
        world,
        Command::SetPlayerIntent { direction: intent },
        &mut events,
    );
    apply(world, Command::Tick { dt: TICK_DT }, &mut events);

    let mut steps = Vec::new();
    {
        let player = query::player(world);
        let maze = query::maze_view(world);
        player_control.handle(&events, &player, maze, &mut steps);
    }
    for command in steps.drain(..) {
        apply(world, command, &mut events);
    }

    // Ghosts pursue the player's post-move position.
    {
        let player = query::player(world);
        let ghosts = query::ghosts(world);
        let maze = query::maze_view(world);
        ghost_ai.handle(&events, &player, &ghosts, maze, &mut steps);
    }
    for command in steps {
        apply(world, command, &mut events);
    }

    let mut rulings = Vec::new();
    {
        let player = query::player(world);
        let ghosts = query::ghosts(world);
        let maze = query::maze_view(world);
        referee.handle(&events, &player, &ghosts, maze, &mut rulings);
    }
    for command in rulings {
        apply(world, command, &mut events);
    }
    events
}

fn parse_intents(script: &str) -> Result<Vec<Option<Direction>>> {
    script
        .chars()
        .map(|symbol| match symbol {
            'U' | 'u' => Ok(Some(Direction::Up)),
            'D' | 'd' => Ok(Some(Direction::Down)),
            'L' | 'l' => Ok(Some(Direction::Left)),
            'R' | 'r' => Ok(Some(Direction::Right)),
            '.' => Ok(None),
            other => bail!("unsupported intent symbol {other:?}"),
        })
        .collect()
}

fn scripted_intent(script: Option<&[Option<Direction>]>, tick: u64) -> Option<Direction> {
    let script = script?;
    let last = script.len().checked_sub(1)?;
    let index = usize::try_from(tick).unwrap_or(last).min(last);
    script[index]
}

fn report(tick: u64, events: &[Event]) {
    for event in events {
        match event {
            Event::PelletEaten { score, .. } => {
                println!("tick {tick:>5}: pellet eaten (+{score})");
            }
            Event::PowerPelletEaten { score, .. } => {
                println!("tick {tick:>5}: power pellet eaten (+{score})");
            }
            Event::GhostsFrightened { ticks } => {
                println!("tick {tick:>5}: ghosts frightened for {ticks} ticks");
            }
            Event::GhostCalmed { ghost_id } => {
                println!("tick {tick:>5}: ghost {} calmed", ghost_id.get());
            }
            Event::GhostEaten { ghost_id, score } => {
                println!("tick {tick:>5}: ghost {} eaten (+{score})", ghost_id.get());
            }
            Event::PlayerCaptured {
                ghost_id,
                lives_remaining,
            } => {
                println!(
                    "tick {tick:>5}: caught by ghost {}, {lives_remaining} lives left",
                    ghost_id.get(),
                );
            }
            Event::RoundWon { score } => {
                println!("tick {tick:>5}: round won with score {score}");
            }
            Event::RoundLost { score } => {
                println!("tick {tick:>5}: round lost with score {score}");
            }
            Event::TimeAdvanced { .. }
            | Event::PlayerMoved { .. }
            | Event::GhostMoved { .. } => {}
        }
    }
}
