#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round referee that detects overlaps and requests their consequences.
//!
//! The referee only observes: it reports pellet overlaps before ghost
//! overlaps, mirroring the per-tick rule order, and leaves arbitration to the
//! world. Commands it emits may have been made stale by an earlier command in
//! the same batch (a capture can reset everyone to spawn); the world
//! re-validates each request against live state, so stale requests degrade to
//! no-ops rather than corrupting the round.

use maze_chase_core::{Command, Event, GhostView, MazeView, PlayerSnapshot, Tile};

/// Pure system that converts detected overlaps into consumption and capture
/// requests.
#[derive(Clone, Copy, Debug, Default)]
pub struct Referee;

impl Referee {
    /// Consumes world events and immutable views to emit rule commands.
    pub fn handle(
        &self,
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

        let player_bounds = player.bounds();

        // Pellets are ruled on before contacts. A power pellet consumed this
        // tick frightens every ghost before any contact is judged, so the
        // capture requests anticipate the flip.
        let mut powering = false;
        for (cell, tile) in maze.tiles_overlapping(&player_bounds) {
            if tile.is_edible() {
                powering |= tile == Tile::PowerPellet;
                out.push(Command::ConsumePellet { cell });
            }
        }

        for ghost in ghosts.iter() {
            if !ghost.bounds().intersects(&player_bounds) {
                continue;
            }
            if ghost.frightened || powering {
                out.push(Command::CaptureGhost { ghost_id: ghost.id });
            } else {
                out.push(Command::CapturePlayer { ghost_id: ghost.id });
            }
        }
    }
}
