#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{ops::Range, time::Duration};

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by one tick.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Buffers the player's desired direction for the next movement pass.
    SetPlayerIntent {
        /// Direction the player wants to travel, or `None` for no intent.
        direction: Option<Direction>,
    },
    /// Commits a validated player move in the given direction.
    StepPlayer {
        /// Direction of travel for the committed step.
        direction: Direction,
    },
    /// Commits a ghost move in the given direction without validation.
    StepGhost {
        /// Identifier of the ghost attempting to move.
        ghost_id: GhostId,
        /// Direction of travel for the step.
        direction: Direction,
    },
    /// Requests consumption of the pellet occupying the provided cell.
    ConsumePellet {
        /// Grid cell whose pellet should be consumed.
        cell: TilePoint,
    },
    /// Requests that a frightened ghost overlapping the player be eaten.
    CaptureGhost {
        /// Identifier of the ghost to capture.
        ghost_id: GhostId,
    },
    /// Requests that a hostile ghost overlapping the player cost a life.
    CapturePlayer {
        /// Identifier of the ghost that caught the player.
        ghost_id: GhostId,
    },
}

/// Events broadcast by the world after processing commands.
///
/// The consumption variants double as the observable triggers an external
/// audio layer may subscribe to: [`Event::PelletEaten`],
/// [`Event::PowerPelletEaten`], [`Event::GhostEaten`], and
/// [`Event::PlayerCaptured`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player moved between two positions.
    PlayerMoved {
        /// Position the player occupied before moving.
        from: Position,
        /// Position the player occupies after wrapping.
        to: Position,
    },
    /// Confirms that a ghost moved between two positions.
    GhostMoved {
        /// Identifier of the ghost that moved.
        ghost_id: GhostId,
        /// Position the ghost occupied before moving.
        from: Position,
        /// Position the ghost occupies after wrapping.
        to: Position,
    },
    /// Announces that the player consumed a pellet.
    PelletEaten {
        /// Cell that held the pellet.
        cell: TilePoint,
        /// Points awarded for the pellet.
        score: u32,
    },
    /// Announces that the player consumed a power pellet.
    PowerPelletEaten {
        /// Cell that held the power pellet.
        cell: TilePoint,
        /// Points awarded for the power pellet.
        score: u32,
    },
    /// Announces that every ghost entered the frightened state.
    GhostsFrightened {
        /// Number of ticks the frightened state lasts.
        ticks: u32,
    },
    /// Announces that a ghost's frightened countdown expired.
    GhostCalmed {
        /// Identifier of the ghost that returned to normal.
        ghost_id: GhostId,
    },
    /// Announces that the player ate a frightened ghost.
    GhostEaten {
        /// Identifier of the ghost that was eaten.
        ghost_id: GhostId,
        /// Points awarded for the capture.
        score: u32,
    },
    /// Announces that a hostile ghost caught the player.
    PlayerCaptured {
        /// Identifier of the ghost that caught the player.
        ghost_id: GhostId,
        /// Lives the player has left after the capture.
        lives_remaining: u32,
    },
    /// Announces that the final pellet was consumed and the round is won.
    RoundWon {
        /// Score at the moment of victory.
        score: u32,
    },
    /// Announces that the player's last life was lost.
    RoundLost {
        /// Score at the moment of defeat.
        score: u32,
    },
}

/// Cardinal movement directions available to entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// All four cardinal directions in a fixed evaluation order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset of the direction in continuous space.
    #[must_use]
    pub const fn offset(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

/// Unique identifier assigned to a ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GhostId(u32);

impl GhostId {
    /// Creates a new ghost identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Movement policy attached to a ghost instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GhostPolicy {
    /// Direction persistence with occasional random redirection.
    Wander,
    /// Distance-closing bias toward the player's position.
    Pursue,
}

/// Lifecycle phase of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// The round is running and the simulation accepts commands.
    Playing,
    /// Every pellet was consumed; the round ended in victory.
    Won,
    /// The player's last life was lost; the round ended in defeat.
    GameOver,
}

impl RoundPhase {
    /// Reports whether the phase halts further simulation.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, RoundPhase::Playing)
    }
}

/// Kind of a single maze grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Solid cell that blocks movement.
    Wall,
    /// Open cell holding an ordinary pellet.
    Pellet,
    /// Open cell holding a power pellet.
    PowerPellet,
    /// Open cell with nothing to consume.
    Empty,
}

impl Tile {
    /// Reports whether the tile still holds something the player can eat.
    #[must_use]
    pub const fn is_edible(self) -> bool {
        matches!(self, Tile::Pellet | Tile::PowerPellet)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePoint {
    column: u32,
    row: u32,
}

impl TilePoint {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Continuous position with sub-tile precision, distinct from grid cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new continuous position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in world units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in world units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns the position displaced by `distance` along `direction`.
    #[must_use]
    pub fn offset_by(self, direction: Direction, distance: f32) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }

    /// Wraps the position modulo the playfield extent on both axes.
    ///
    /// An entity exiting one edge reappears at the opposite edge (tunnel
    /// effect). The result always satisfies `0 <= x < width` and
    /// `0 <= y < height` for positive extents.
    #[must_use]
    pub fn wrapped(self, width: f32, height: f32) -> Self {
        Self {
            x: self.x.rem_euclid(width),
            y: self.y.rem_euclid(height),
        }
    }
}

/// Axis-aligned bounding box in continuous space.
///
/// Intersection is strict: boxes that merely share an edge do not overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl BoundingBox {
    /// Creates a new bounding box from its upper-left corner and extent.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal coordinate of the upper-left corner.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate of the upper-left corner.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Horizontal extent of the box.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the box.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Returns the box displaced by the provided offsets.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Reports whether two boxes overlap with positive area.
    #[must_use]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Continuous position of the player's upper-left corner.
    pub position: Position,
    /// Direction the player is committed to.
    pub direction: Direction,
    /// Buffered desired direction awaiting validation, if any.
    pub desired: Option<Direction>,
    /// Distance the player covers per tick.
    pub speed: f32,
    /// Side length of the player's square bounding box.
    pub size: f32,
    /// Lives remaining before the round is lost.
    pub lives: u32,
    /// Points accrued so far.
    pub score: u32,
    /// True while any ghost is frightened. Display only; the collision
    /// outcome dispatches on each ghost's own flag.
    pub powered: bool,
}

impl PlayerSnapshot {
    /// Bounding box derived from the player's position and size.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.position.x(), self.position.y(), self.size, self.size)
    }
}

/// Immutable representation of a single ghost's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostSnapshot {
    /// Unique identifier assigned to the ghost.
    pub id: GhostId,
    /// Continuous position of the ghost's upper-left corner.
    pub position: Position,
    /// Direction the ghost last committed to.
    pub direction: Direction,
    /// Distance the ghost covers per tick.
    pub speed: f32,
    /// Side length of the ghost's square bounding box.
    pub size: f32,
    /// Movement policy attached to the ghost.
    pub policy: GhostPolicy,
    /// True while the ghost is vulnerable instead of hostile.
    pub frightened: bool,
    /// Ticks remaining before the frightened state expires.
    pub frightened_ticks: u32,
    /// Immutable spawn position the ghost resets to.
    pub spawn: Position,
}

impl GhostSnapshot {
    /// Bounding box derived from the ghost's position and size.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.position.x(), self.position.y(), self.size, self.size)
    }
}

/// Read-only snapshot describing all ghosts within the maze.
#[derive(Clone, Debug, Default)]
pub struct GhostView {
    snapshots: Vec<GhostSnapshot>,
}

impl GhostView {
    /// Creates a new ghost view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<GhostSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured ghost snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<GhostSnapshot> {
        self.snapshots
    }
}

/// Read-only view into the maze's tile grid.
///
/// The collision oracle lives here: [`MazeView::collides`] is a pure query
/// with no side effects, evaluated once per candidate direction per entity
/// per tick.
#[derive(Clone, Copy, Debug)]
pub struct MazeView<'a> {
    tiles: &'a [Tile],
    columns: u32,
    rows: u32,
    tile_length: f32,
}

impl<'a> MazeView<'a> {
    /// Captures a new maze view backed by the provided tile slice.
    #[must_use]
    pub fn new(tiles: &'a [Tile], columns: u32, rows: u32, tile_length: f32) -> Self {
        Self {
            tiles,
            columns,
            rows,
            tile_length,
        }
    }

    /// Number of tile columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total width of the playfield measured in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the playfield measured in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Returns the current kind of the provided cell, if it is in bounds.
    #[must_use]
    pub fn tile(&self, cell: TilePoint) -> Option<Tile> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            self.tiles.get(row * width + column).copied()
        } else {
            None
        }
    }

    /// Reports whether the provided box overlaps any wall tile.
    ///
    /// Coordinates beyond the grid resolve to "no wall"; the wrap rule makes
    /// them legal, never an error.
    #[must_use]
    pub fn collides(&self, bounds: &BoundingBox) -> bool {
        self.tiles_overlapping(bounds)
            .any(|(_, tile)| tile == Tile::Wall)
    }

    /// Enumerates the in-bounds cells whose area overlaps the provided box.
    pub fn tiles_overlapping(
        &self,
        bounds: &BoundingBox,
    ) -> impl Iterator<Item = (TilePoint, Tile)> + 'a {
        let view = *self;
        let columns = axis_range(bounds.x(), bounds.width(), view.tile_length, view.columns);
        let rows = axis_range(bounds.y(), bounds.height(), view.tile_length, view.rows);
        rows.flat_map(move |row| {
            columns
                .clone()
                .map(move |column| TilePoint::new(column, row))
        })
        .filter_map(move |cell| view.tile(cell).map(|tile| (cell, tile)))
    }
}

fn axis_range(start: f32, extent: f32, tile_length: f32, limit: u32) -> Range<u32> {
    if extent <= 0.0 || tile_length <= 0.0 {
        return 0..0;
    }

    let bound = i64::from(limit);
    let first = (start / tile_length).floor() as i64;
    let last = ((start + extent) / tile_length).ceil() as i64;
    let first = first.clamp(0, bound) as u32;
    let last = last.clamp(0, bound) as u32;
    first..last
}

#[cfg(test)]
mod tests {
    use super::{BoundingBox, Direction, GhostId, GhostPolicy, MazeView, Position, Tile, TilePoint};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn direction_offsets_are_unit_vectors() {
        assert_eq!(Direction::Up.offset(), (0.0, -1.0));
        assert_eq!(Direction::Down.offset(), (0.0, 1.0));
        assert_eq!(Direction::Left.offset(), (-1.0, 0.0));
        assert_eq!(Direction::Right.offset(), (1.0, 0.0));
    }

    #[test]
    fn wrapping_keeps_positions_inside_the_playfield() {
        let wrapped = Position::new(-3.0, 101.5).wrapped(100.0, 100.0);
        assert_eq!(wrapped, Position::new(97.0, 1.5));

        let unchanged = Position::new(12.0, 34.0).wrapped(100.0, 100.0);
        assert_eq!(unchanged, Position::new(12.0, 34.0));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let left = BoundingBox::new(0.0, 0.0, 24.0, 24.0);
        let adjacent = BoundingBox::new(24.0, 0.0, 24.0, 24.0);
        let overlapping = BoundingBox::new(23.0, 12.0, 24.0, 24.0);

        assert!(!left.intersects(&adjacent));
        assert!(left.intersects(&overlapping));
        assert!(overlapping.intersects(&left));
    }

    #[test]
    fn collision_oracle_detects_wall_overlap() {
        let tiles = vec![Tile::Wall, Tile::Empty, Tile::Empty, Tile::Pellet];
        let view = MazeView::new(&tiles, 2, 2, 24.0);

        let inside_wall = BoundingBox::new(4.0, 4.0, 24.0, 24.0);
        let open = BoundingBox::new(24.0, 24.0, 24.0, 24.0);
        let edge_touching = BoundingBox::new(24.0, 0.0, 24.0, 24.0);

        assert!(view.collides(&inside_wall));
        assert!(!view.collides(&open));
        assert!(!view.collides(&edge_touching));
    }

    #[test]
    fn out_of_bounds_queries_resolve_to_no_wall() {
        let tiles = vec![Tile::Wall; 4];
        let view = MazeView::new(&tiles, 2, 2, 24.0);

        let beyond = BoundingBox::new(-60.0, -60.0, 24.0, 24.0);
        assert!(!view.collides(&beyond));
        assert_eq!(view.tiles_overlapping(&beyond).count(), 0);
    }

    #[test]
    fn overlapping_cells_report_their_tiles() {
        let tiles = vec![Tile::Pellet, Tile::PowerPellet, Tile::Empty, Tile::Wall];
        let view = MazeView::new(&tiles, 2, 2, 24.0);

        let spanning = BoundingBox::new(12.0, 0.0, 24.0, 24.0);
        let cells: Vec<_> = view.tiles_overlapping(&spanning).collect();

        assert_eq!(
            cells,
            vec![
                (TilePoint::new(0, 0), Tile::Pellet),
                (TilePoint::new(1, 0), Tile::PowerPellet),
            ]
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn ghost_id_round_trips_through_bincode() {
        assert_round_trip(&GhostId::new(42));
    }

    #[test]
    fn direction_round_trips_through_bincode() {
        assert_round_trip(&Direction::Left);
    }

    #[test]
    fn ghost_policy_round_trips_through_bincode() {
        assert_round_trip(&GhostPolicy::Pursue);
    }

    #[test]
    fn tile_point_round_trips_through_bincode() {
        assert_round_trip(&TilePoint::new(5, 7));
    }

    #[test]
    fn tile_round_trips_through_bincode() {
        assert_round_trip(&Tile::PowerPellet);
    }
}
