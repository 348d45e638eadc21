#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ghost controller implementing the wander and pursue movement policies.
//!
//! Every tick each ghost picks a direction and the system emits one
//! [`Command::StepGhost`] for it, valid or not: the candidate set is filtered
//! through the collision oracle, but a retained heading is committed without
//! re-validation, so ghosts drift through walls that close in on them. Random
//! draws come from a seeded [`ChaCha8Rng`], making runs replayable.

use maze_chase_core::{
    Command, Direction, Event, GhostPolicy, GhostSnapshot, GhostView, MazeView, PlayerSnapshot,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Probability that a wandering ghost abandons its heading this tick.
const REDIRECT_PROBABILITY: f64 = 0.1;

/// Configuration parameters required to construct the ghost controller.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that drives every ghost's movement decision.
#[derive(Debug)]
pub struct GhostAi {
    rng: ChaCha8Rng,
}

impl GhostAi {
    /// Creates a new ghost controller using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and immutable views to emit ghost steps.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        ghosts: &GhostView,
        maze: MazeView<'_>,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for ghost in ghosts.iter() {
            let valid = valid_directions(ghost, &maze);
            let direction = self.choose_direction(ghost, player, &valid);
            out.push(Command::StepGhost {
                ghost_id: ghost.id,
                direction,
            });
        }
    }

    fn choose_direction(
        &mut self,
        ghost: &GhostSnapshot,
        player: &PlayerSnapshot,
        valid: &[Direction],
    ) -> Direction {
        if ghost.policy == GhostPolicy::Pursue && !ghost.frightened {
            if let Some(preferred) = preferred_direction(ghost, player) {
                if valid.contains(&preferred) {
                    return preferred;
                }
            }
            return valid.choose(&mut self.rng).copied().unwrap_or(ghost.direction);
        }

        if self.rng.gen_bool(REDIRECT_PROBABILITY) {
            if let Some(direction) = valid.choose(&mut self.rng) {
                return *direction;
            }
        }
        ghost.direction
    }
}

/// Cardinal directions whose one-step probe box clears the walls.
fn valid_directions(ghost: &GhostSnapshot, maze: &MazeView<'_>) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|direction| {
            let (dx, dy) = direction.offset();
            let probe = ghost.bounds().translated(dx * ghost.speed, dy * ghost.speed);
            !maze.collides(&probe)
        })
        .collect()
}

/// The per-axis sign of the delta to the player, when it is a cardinal.
///
/// A diagonal or zero delta has no cardinal preference and yields `None`,
/// pushing the pursuer onto a random valid direction instead.
fn preferred_direction(ghost: &GhostSnapshot, player: &PlayerSnapshot) -> Option<Direction> {
    let dx = player.position.x() - ghost.position.x();
    let dy = player.position.y() - ghost.position.y();
    match (dx.partial_cmp(&0.0)?, dy.partial_cmp(&0.0)?) {
        (std::cmp::Ordering::Greater, std::cmp::Ordering::Equal) => Some(Direction::Right),
        (std::cmp::Ordering::Less, std::cmp::Ordering::Equal) => Some(Direction::Left),
        (std::cmp::Ordering::Equal, std::cmp::Ordering::Greater) => Some(Direction::Down),
        (std::cmp::Ordering::Equal, std::cmp::Ordering::Less) => Some(Direction::Up),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use maze_chase_core::{GhostId, Position, Tile};

    use super::*;

    fn open_maze() -> Vec<Tile> {
        vec![Tile::Empty; 25]
    }

    fn ghost_at(x: f32, y: f32, policy: GhostPolicy) -> GhostSnapshot {
        GhostSnapshot {
            id: GhostId::new(0),
            position: Position::new(x, y),
            direction: Direction::Right,
            speed: 2.3,
            size: 24.0,
            policy,
            frightened: false,
            frightened_ticks: 0,
            spawn: Position::new(x, y),
        }
    }

    fn player_at(x: f32, y: f32) -> PlayerSnapshot {
        PlayerSnapshot {
            position: Position::new(x, y),
            direction: Direction::Right,
            desired: None,
            speed: 2.7,
            size: 24.0,
            lives: 3,
            score: 0,
            powered: false,
        }
    }

    fn advanced() -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_micros(16_667),
        }]
    }

    #[test]
    fn emits_one_step_per_ghost_per_tick() {
        let tiles = open_maze();
        let maze = MazeView::new(&tiles, 5, 5, 24.0);
        let ghosts = GhostView::from_snapshots(vec![
            ghost_at(24.0, 24.0, GhostPolicy::Wander),
            GhostSnapshot {
                id: GhostId::new(1),
                ..ghost_at(48.0, 24.0, GhostPolicy::Pursue)
            },
        ]);
        let mut ai = GhostAi::new(Config::new(7));
        let mut out = Vec::new();
        ai.handle(&advanced(), &player_at(0.0, 24.0), &ghosts, maze, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn pursuer_commits_the_axis_aligned_preference() {
        let tiles = open_maze();
        let maze = MazeView::new(&tiles, 5, 5, 24.0);
        let ghosts = GhostView::from_snapshots(vec![ghost_at(48.0, 24.0, GhostPolicy::Pursue)]);
        let mut ai = GhostAi::new(Config::new(7));
        let mut out = Vec::new();
        // Player straight to the left of the pursuer.
        ai.handle(&advanced(), &player_at(0.0, 24.0), &ghosts, maze, &mut out);
        assert_eq!(
            out,
            vec![Command::StepGhost {
                ghost_id: GhostId::new(0),
                direction: Direction::Left,
            }]
        );
    }

    #[test]
    fn frightened_pursuer_falls_back_to_wandering() {
        let tiles = open_maze();
        let maze = MazeView::new(&tiles, 5, 5, 24.0);
        let mut frightened = ghost_at(48.0, 24.0, GhostPolicy::Pursue);
        frightened.frightened = true;
        frightened.frightened_ticks = 480;
        let ghosts = GhostView::from_snapshots(vec![frightened]);

        // Whatever the draws, the decision must ignore the player's location:
        // with the same seed the choice is identical for opposite players.
        let mut left = Vec::new();
        GhostAi::new(Config::new(11)).handle(
            &advanced(),
            &player_at(0.0, 24.0),
            &ghosts,
            maze,
            &mut left,
        );
        let mut right = Vec::new();
        GhostAi::new(Config::new(11)).handle(
            &advanced(),
            &player_at(96.0, 24.0),
            &ghosts,
            maze,
            &mut right,
        );
        assert_eq!(left, right);
    }

    #[test]
    fn walled_in_ghost_retains_its_heading() {
        let tiles = vec![
            Tile::Wall,
            Tile::Wall,
            Tile::Wall,
            Tile::Wall,
            Tile::Empty,
            Tile::Wall,
            Tile::Wall,
            Tile::Wall,
            Tile::Wall,
        ];
        let maze = MazeView::new(&tiles, 3, 3, 24.0);
        let ghosts = GhostView::from_snapshots(vec![ghost_at(24.0, 24.0, GhostPolicy::Pursue)]);
        let mut ai = GhostAi::new(Config::new(3));
        let mut out = Vec::new();
        ai.handle(&advanced(), &player_at(72.0, 24.0), &ghosts, maze, &mut out);
        assert_eq!(
            out,
            vec![Command::StepGhost {
                ghost_id: GhostId::new(0),
                direction: Direction::Right,
            }]
        );
    }

    #[test]
    fn diagonal_delta_has_no_preference() {
        let ghost = ghost_at(48.0, 48.0, GhostPolicy::Pursue);
        assert_eq!(preferred_direction(&ghost, &player_at(0.0, 0.0)), None);
        assert_eq!(preferred_direction(&ghost, &player_at(48.0, 48.0)), None);
        assert_eq!(
            preferred_direction(&ghost, &player_at(48.0, 96.0)),
            Some(Direction::Down)
        );
    }
}
