#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for the maze chase engine.
//!
//! The world owns the maze grid, the player, and the ghosts. All mutation
//! flows through [`apply`], which consumes a [`Command`], arbitrates it
//! against the current state, and broadcasts [`Event`]s describing what
//! actually happened. Read access goes through the [`query`] module, which
//! hands out snapshots and borrowed views so systems never touch live state.

use maze_chase_core::{
    BoundingBox, Command, Direction, Event, GhostId, GhostPolicy, MazeView, Position, RoundPhase,
    Tile, TilePoint,
};
use thiserror::Error;

const TILE_LENGTH: f32 = 24.0;
const ENTITY_SIZE: f32 = 24.0;
const PLAYER_SPEED: f32 = 2.7;
const GHOST_SPEED: f32 = 2.3;
const STARTING_LIVES: u32 = 3;
const PELLET_SCORE: u32 = 10;
const POWER_PELLET_SCORE: u32 = 50;
const GHOST_SCORE: u32 = 200;
const FRIGHTENED_TICKS: u32 = 480;

const CLASSIC_PLAYER_SPAWN: TilePoint = TilePoint::new(14, 20);
const CLASSIC_GHOST_ROW: u32 = 14;
const CLASSIC_GHOST_COUNT: u32 = 4;

// 28 columns by 26 rows; '0' wall, '1' pellet, '2' power pellet, '9' open.
const CLASSIC_LAYOUT: [&str; 26] = [
    "0000000000000000000000000000",
    "0111111110111111111011111110",
    "0120000010100000010100000210",
    "0111111110111111111011111110",
    "0100000010001000001000000010",
    "0111111011111111101111111110",
    "0000010100001000100001000000",
    "1111010111110111101111011111",
    "0001010000010000100001010000",
    "0111111110111111111011111110",
    "0100000010100000010100000010",
    "0111111110111111111011111110",
    "0000000000000000000000000000",
    "0000000000000000000000000000",
    "0111111110111111111011111110",
    "0120000010100000010100000210",
    "0111111110111111111011111110",
    "0100000010001000001000000010",
    "0111111011111111101111111110",
    "0000010100001000100001000000",
    "1111010111110111101111011111",
    "0001010000010000100001010000",
    "0111111110111111111011111110",
    "0100000010100000010100000010",
    "0111111110111111111011111110",
    "0000000000000000000000000000",
];

/// Errors raised while parsing a maze layout.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// The layout contained no rows or no columns.
    #[error("maze layout contains no cells")]
    Empty,
    /// A row's width disagreed with the first row's width.
    #[error("maze row {row} holds {found} cells, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width actually found.
        found: usize,
    },
}

/// Immutable per-ghost configuration used when constructing a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostSeed {
    spawn: TilePoint,
    policy: GhostPolicy,
}

impl GhostSeed {
    /// Creates a seed placing a ghost with the given policy at a tile.
    #[must_use]
    pub const fn new(spawn: TilePoint, policy: GhostPolicy) -> Self {
        Self { spawn, policy }
    }
}

/// Initial configuration from which a [`World`] is constructed.
#[derive(Clone, Debug)]
pub struct Setup {
    layout: Vec<String>,
    player_spawn: TilePoint,
    ghosts: Vec<GhostSeed>,
}

impl Setup {
    /// Creates a setup from symbolic layout rows and spawn placements.
    #[must_use]
    pub fn new(layout: &[&str], player_spawn: TilePoint, ghosts: Vec<GhostSeed>) -> Self {
        Self {
            layout: layout.iter().map(|row| (*row).to_string()).collect(),
            player_spawn,
            ghosts,
        }
    }

    /// The stock level: the classic layout, one pursuer, three wanderers.
    #[must_use]
    pub fn classic() -> Self {
        let ghosts = (0..CLASSIC_GHOST_COUNT)
            .map(|index| {
                let policy = if index == 0 {
                    GhostPolicy::Pursue
                } else {
                    GhostPolicy::Wander
                };
                GhostSeed::new(TilePoint::new(13 + index, CLASSIC_GHOST_ROW), policy)
            })
            .collect();
        Self::new(&CLASSIC_LAYOUT, CLASSIC_PLAYER_SPAWN, ghosts)
    }
}

#[derive(Clone, Debug)]
struct Maze {
    columns: u32,
    rows: u32,
    tile_length: f32,
    tiles: Vec<Tile>,
    pellets_remaining: u32,
}

impl Maze {
    fn parse(layout: &[&str]) -> Result<Self, MazeError> {
        let expected = layout.first().map_or(0, |row| row.chars().count());
        if layout.is_empty() || expected == 0 {
            return Err(MazeError::Empty);
        }

        let mut tiles = Vec::with_capacity(layout.len() * expected);
        let mut pellets_remaining = 0;
        for (row, symbols) in layout.iter().enumerate() {
            let found = symbols.chars().count();
            if found != expected {
                return Err(MazeError::RaggedRow {
                    row,
                    expected,
                    found,
                });
            }
            for symbol in symbols.chars() {
                let tile = match symbol {
                    '0' => Tile::Wall,
                    '1' => Tile::Pellet,
                    '2' => Tile::PowerPellet,
                    _ => Tile::Empty,
                };
                if tile.is_edible() {
                    pellets_remaining += 1;
                }
                tiles.push(tile);
            }
        }

        Ok(Self {
            columns: expected as u32,
            rows: layout.len() as u32,
            tile_length: TILE_LENGTH,
            tiles,
            pellets_remaining,
        })
    }

    fn view(&self) -> MazeView<'_> {
        MazeView::new(&self.tiles, self.columns, self.rows, self.tile_length)
    }

    fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Removes the edible tile at `cell`, if one is present. Idempotent:
    /// walls, empty cells, and out-of-bounds cells all return `None`.
    fn consume(&mut self, cell: TilePoint) -> Option<Tile> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let index = (cell.row() * self.columns + cell.column()) as usize;
        let tile = self.tiles[index];
        if !tile.is_edible() {
            return None;
        }
        self.tiles[index] = Tile::Empty;
        self.pellets_remaining -= 1;
        Some(tile)
    }

    fn tile_origin(&self, cell: TilePoint) -> Position {
        Position::new(
            cell.column() as f32 * self.tile_length,
            cell.row() as f32 * self.tile_length,
        )
    }
}

#[derive(Clone, Debug)]
struct Player {
    position: Position,
    spawn: Position,
    direction: Direction,
    desired: Option<Direction>,
    lives: u32,
    score: u32,
}

#[derive(Clone, Debug)]
struct Ghost {
    id: GhostId,
    position: Position,
    spawn: Position,
    direction: Direction,
    policy: GhostPolicy,
    frightened: bool,
    frightened_ticks: u32,
}

impl Ghost {
    /// Returns the ghost to its spawn and clears the frightened flag. The
    /// countdown is left as-is; it only matters while the flag is set.
    fn reset(&mut self) {
        self.position = self.spawn;
        self.frightened = false;
    }
}

/// Authoritative simulation state: maze, player, ghosts, and round phase.
#[derive(Clone, Debug)]
pub struct World {
    maze: Maze,
    player: Player,
    ghosts: Vec<Ghost>,
    phase: RoundPhase,
}

impl World {
    /// Creates a world running the classic level.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError`] when the layout fails to parse.
    pub fn new() -> Result<Self, MazeError> {
        Self::with_setup(Setup::classic())
    }

    /// Creates a world from an explicit setup.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError`] when the layout fails to parse.
    pub fn with_setup(setup: Setup) -> Result<Self, MazeError> {
        let rows: Vec<&str> = setup.layout.iter().map(String::as_str).collect();
        let maze = Maze::parse(&rows)?;

        let player_spawn = maze.tile_origin(setup.player_spawn);
        let player = Player {
            position: player_spawn,
            spawn: player_spawn,
            direction: Direction::Right,
            desired: None,
            lives: STARTING_LIVES,
            score: 0,
        };

        let ghosts = setup
            .ghosts
            .iter()
            .enumerate()
            .map(|(index, seed)| {
                let spawn = maze.tile_origin(seed.spawn);
                Ghost {
                    id: GhostId::new(index as u32),
                    position: spawn,
                    spawn,
                    direction: Direction::Right,
                    policy: seed.policy,
                    frightened: false,
                    frightened_ticks: 0,
                }
            })
            .collect();

        Ok(Self {
            maze,
            player,
            ghosts,
            phase: RoundPhase::Playing,
        })
    }
}

/// Applies a command to the world, appending resulting events.
///
/// Terminal phases freeze the world: every command is ignored once the round
/// is won or lost. Step commands are committed as requested (the player
/// controller validates before emitting; ghosts move unvalidated). Capture
/// and consumption requests are re-validated against live state, so requests
/// made stale by an earlier command in the same batch degrade to no-ops.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.phase.is_terminal() {
        return;
    }

    match command {
        Command::Tick { dt } => {
            for ghost in &mut world.ghosts {
                if !ghost.frightened {
                    continue;
                }
                ghost.frightened_ticks = ghost.frightened_ticks.saturating_sub(1);
                if ghost.frightened_ticks == 0 {
                    ghost.frightened = false;
                    out_events.push(Event::GhostCalmed { ghost_id: ghost.id });
                }
            }
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SetPlayerIntent { direction } => {
            world.player.desired = direction;
        }
        Command::StepPlayer { direction } => {
            let from = world.player.position;
            let to = from
                .offset_by(direction, PLAYER_SPEED)
                .wrapped(world.maze.width(), world.maze.height());
            world.player.direction = direction;
            world.player.position = to;
            out_events.push(Event::PlayerMoved { from, to });
        }
        Command::StepGhost { ghost_id, direction } => {
            let width = world.maze.width();
            let height = world.maze.height();
            if let Some(ghost) = world.ghosts.iter_mut().find(|ghost| ghost.id == ghost_id) {
                let from = ghost.position;
                let to = from.offset_by(direction, GHOST_SPEED).wrapped(width, height);
                ghost.direction = direction;
                ghost.position = to;
                out_events.push(Event::GhostMoved { ghost_id, from, to });
            }
        }
        Command::ConsumePellet { cell } => match world.maze.consume(cell) {
            Some(Tile::Pellet) => {
                world.player.score += PELLET_SCORE;
                out_events.push(Event::PelletEaten {
                    cell,
                    score: PELLET_SCORE,
                });
                conclude_if_cleared(world, out_events);
            }
            Some(Tile::PowerPellet) => {
                world.player.score += POWER_PELLET_SCORE;
                out_events.push(Event::PowerPelletEaten {
                    cell,
                    score: POWER_PELLET_SCORE,
                });
                for ghost in &mut world.ghosts {
                    ghost.frightened = true;
                    ghost.frightened_ticks = FRIGHTENED_TICKS;
                }
                out_events.push(Event::GhostsFrightened {
                    ticks: FRIGHTENED_TICKS,
                });
                conclude_if_cleared(world, out_events);
            }
            _ => {}
        },
        Command::CaptureGhost { ghost_id } => {
            let player_bounds = entity_bounds(world.player.position);
            if let Some(ghost) = world.ghosts.iter_mut().find(|ghost| ghost.id == ghost_id) {
                let overlapping = entity_bounds(ghost.position).intersects(&player_bounds);
                if ghost.frightened && overlapping {
                    ghost.reset();
                    world.player.score += GHOST_SCORE;
                    out_events.push(Event::GhostEaten {
                        ghost_id,
                        score: GHOST_SCORE,
                    });
                }
            }
        }
        Command::CapturePlayer { ghost_id } => {
            let player_bounds = entity_bounds(world.player.position);
            let hostile_overlap = world.ghosts.iter().any(|ghost| {
                ghost.id == ghost_id
                    && !ghost.frightened
                    && entity_bounds(ghost.position).intersects(&player_bounds)
            });
            if !hostile_overlap {
                return;
            }

            world.player.lives = world.player.lives.saturating_sub(1);
            world.player.position = world.player.spawn;
            for ghost in &mut world.ghosts {
                ghost.reset();
            }
            out_events.push(Event::PlayerCaptured {
                ghost_id,
                lives_remaining: world.player.lives,
            });
            if world.player.lives == 0 {
                world.phase = RoundPhase::GameOver;
                out_events.push(Event::RoundLost {
                    score: world.player.score,
                });
            }
        }
    }
}

fn conclude_if_cleared(world: &mut World, out_events: &mut Vec<Event>) {
    if world.maze.pellets_remaining == 0 {
        world.phase = RoundPhase::Won;
        out_events.push(Event::RoundWon {
            score: world.player.score,
        });
    }
}

fn entity_bounds(position: Position) -> BoundingBox {
    BoundingBox::new(position.x(), position.y(), ENTITY_SIZE, ENTITY_SIZE)
}

/// Read-only queries over the world, exposed as snapshots and views.
pub mod query {
    use maze_chase_core::{GhostSnapshot, GhostView, MazeView, PlayerSnapshot, RoundPhase};

    use crate::{World, ENTITY_SIZE, GHOST_SPEED, PLAYER_SPEED};

    /// Borrowed view of the maze grid for collision and pellet queries.
    #[must_use]
    pub fn maze_view(world: &World) -> MazeView<'_> {
        world.maze.view()
    }

    /// Snapshot of the player's kinematics, lives, and score.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            direction: world.player.direction,
            desired: world.player.desired,
            speed: PLAYER_SPEED,
            size: ENTITY_SIZE,
            lives: world.player.lives,
            score: world.player.score,
            powered: world.ghosts.iter().any(|ghost| ghost.frightened),
        }
    }

    /// Snapshot of every ghost, ordered by identifier.
    #[must_use]
    pub fn ghosts(world: &World) -> GhostView {
        GhostView::from_snapshots(
            world
                .ghosts
                .iter()
                .map(|ghost| GhostSnapshot {
                    id: ghost.id,
                    position: ghost.position,
                    direction: ghost.direction,
                    speed: GHOST_SPEED,
                    size: ENTITY_SIZE,
                    policy: ghost.policy,
                    frightened: ghost.frightened,
                    frightened_ticks: ghost.frightened_ticks,
                    spawn: ghost.spawn,
                })
                .collect(),
        )
    }

    /// Current round phase.
    #[must_use]
    pub fn phase(world: &World) -> RoundPhase {
        world.phase
    }

    /// Number of edible tiles still on the grid.
    #[must_use]
    pub fn pellets_remaining(world: &World) -> u32 {
        world.maze.pellets_remaining
    }
}
