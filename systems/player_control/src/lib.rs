#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player controller that gates movement behind the collision oracle.
//!
//! Each tick the controller first tries to honor the buffered desired
//! direction, falling back to the committed heading, and emits a
//! [`Command::StepPlayer`] only when the destination box is clear. A blocked
//! player stays put; there are no partial steps. Turning is resolved
//! mid-cell, so a buffered turn commits the moment its probe box clears the
//! walls rather than waiting for tile alignment.

use maze_chase_core::{Command, Direction, Event, MazeView, PlayerSnapshot};

/// Pure system that converts buffered player intent into validated steps.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerControl;

impl PlayerControl {
    /// Consumes world events and immutable views to emit player steps.
    pub fn handle(
        &self,
        events: &[Event],
        player: &PlayerSnapshot,
        maze: MazeView<'_>,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let mut direction = player.direction;
        if let Some(desired) = player.desired {
            if desired != direction && step_clear(player, desired, &maze) {
                direction = desired;
            }
        }

        if step_clear(player, direction, &maze) {
            out.push(Command::StepPlayer { direction });
        }
    }
}

/// True when advancing one step in `direction` keeps the player off walls.
fn step_clear(player: &PlayerSnapshot, direction: Direction, maze: &MazeView<'_>) -> bool {
    let (dx, dy) = direction.offset();
    let probe = player
        .bounds()
        .translated(dx * player.speed, dy * player.speed);
    !maze.collides(&probe)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use maze_chase_core::{Position, Tile};

    use super::*;

    fn corridor() -> Vec<Tile> {
        // 3x3: solid walls except the middle row.
        let mut tiles = vec![Tile::Wall; 9];
        for column in 0..3 {
            tiles[3 + column] = Tile::Empty;
        }
        tiles
    }

    fn snapshot(position: Position, direction: Direction, desired: Option<Direction>) -> PlayerSnapshot {
        PlayerSnapshot {
            position,
            direction,
            desired,
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
    fn emits_nothing_without_a_time_advance() {
        let tiles = corridor();
        let maze = MazeView::new(&tiles, 3, 3, 24.0);
        let player = snapshot(Position::new(24.0, 24.0), Direction::Right, None);
        let mut out = Vec::new();
        PlayerControl.handle(&[], &player, maze, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn steps_along_the_committed_heading_when_clear() {
        let tiles = corridor();
        let maze = MazeView::new(&tiles, 3, 3, 24.0);
        let player = snapshot(Position::new(24.0, 24.0), Direction::Right, None);
        let mut out = Vec::new();
        PlayerControl.handle(&advanced(), &player, maze, &mut out);
        assert_eq!(
            out,
            vec![Command::StepPlayer {
                direction: Direction::Right,
            }]
        );
    }

    #[test]
    fn blocked_intent_keeps_the_current_heading() {
        let tiles = corridor();
        let maze = MazeView::new(&tiles, 3, 3, 24.0);
        let player = snapshot(
            Position::new(24.0, 24.0),
            Direction::Right,
            Some(Direction::Up),
        );
        let mut out = Vec::new();
        PlayerControl.handle(&advanced(), &player, maze, &mut out);
        assert_eq!(
            out,
            vec![Command::StepPlayer {
                direction: Direction::Right,
            }]
        );
    }

    #[test]
    fn fully_blocked_player_stays_put() {
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
        let player = snapshot(Position::new(24.0, 24.0), Direction::Left, None);
        let mut out = Vec::new();
        PlayerControl.handle(&advanced(), &player, maze, &mut out);
        assert!(out.is_empty());
    }
}
