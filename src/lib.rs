use std::{error, fmt::Display, path::PathBuf};

use clap::Parser;
use log::{debug, trace};

pub mod grid;
pub mod narrow;
pub mod wide;

pub use grid::{parse_game, read_game, Grid, GridBuilder, PlainTile, Tile, WideTile};
pub use narrow::NarrowBoard;
pub use wide::WideBoard;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    EmptyMap,
    InconsistentRow(usize, usize),
    MultipleRobots(Position, Position),
    InvalidCharForMap(char),
    NoRobotInMap,
    InvalidCharForDirection(char),
    GridTooWide(usize, usize), // (given width, max width)
    BrokenWideBox(Position),
    OffGrid(Position, Direction), // (position of the last pushed thing, push direction)
    RobotInWall(Position),
    RobotInBox(Position),
    BoxInWall(Position),
    OverlappingBoxes(Position, Position),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptyMap => write!(f, "Given map has no row, expect at least one."),
            Error::InconsistentRow(expect_col_n, this_col_n) => write!(
                f,
                "Expect {} columns in each row, given {}.",
                expect_col_n, this_col_n
            ),
            Error::MultipleRobots(last_position, this_position) => write!(
                f,
                "Given two robots in map({}, {}), expect only one.",
                last_position, this_position
            ),
            Error::InvalidCharForMap(c) => write!(f, "Invalid character({}) for map.", c),
            Error::NoRobotInMap => write!(f, "No robot found in given map, expect one."),
            Error::InvalidCharForDirection(c) => {
                write!(f, "Invalid character({}) for direction.", c)
            }
            Error::GridTooWide(col_n, max_col_n) => write!(
                f,
                "Given map has {} columns, at most {} columns are supported.",
                col_n, max_col_n
            ),
            Error::BrokenWideBox(pos) => {
                write!(f, "Found half of a wide box at {} in map.", pos)
            }
            Error::OffGrid(pos, dir) => write!(
                f,
                "Pushing from {} towards {} would leave the map.",
                pos, dir
            ),
            Error::RobotInWall(pos) => write!(f, "Robot ends up in a wall at {}.", pos),
            Error::RobotInBox(pos) => write!(f, "Robot ends up in a box at {}.", pos),
            Error::BoxInWall(pos) => write!(f, "Box ends up in a wall at {}.", pos),
            Error::OverlappingBoxes(pos0, pos1) => {
                write!(f, "Boxes at {} and {} overlap each other.", pos0, pos1)
            }
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    /// Text file with the warehouse map, a blank line, then the robot's moves
    #[arg(default_value = "input.txt")]
    pub input_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub r: usize,
    pub c: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

impl Position {
    pub fn new(r: usize, c: usize) -> Self {
        Self { r, c }
    }

    /// Adjacent position in `dir`, `None` above the first row or left of the first column.
    pub fn neighbor(&self, dir: Direction) -> Option<Self> {
        let r = self.r.checked_add_signed(dir.dy())?;
        let c = self.c.checked_add_signed(dir.dx())?;
        Some(Position::new(r, c))
    }

    /// The GPS coordinate of a box whose reference cell is here.
    pub fn gps(&self) -> usize {
        self.r * 100 + self.c
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "^"),
            Direction::Right => write!(f, ">"),
            Direction::Down => write!(f, "v"),
            Direction::Left => write!(f, "<"),
        }
    }
}

impl TryFrom<char> for Direction {
    type Error = Error;

    fn try_from(value: char) -> std::result::Result<Self, Self::Error> {
        match value {
            '^' => Ok(Direction::Up),
            '>' => Ok(Direction::Right),
            'v' => Ok(Direction::Down),
            '<' => Ok(Direction::Left),
            other => Err(Error::InvalidCharForDirection(other)),
        }
    }
}

impl Direction {
    pub fn dx(&self) -> isize {
        match self {
            Direction::Right => 1,
            Direction::Left => -1,
            Direction::Up | Direction::Down => 0,
        }
    }

    pub fn dy(&self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
            Direction::Right | Direction::Left => 0,
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// A warehouse the robot can be driven through, one push at a time.
pub trait Warehouse: Display {
    fn robot(&self) -> &Position;

    /// Try to push the robot one step in `dir`.
    ///
    /// Returns `Ok(false)` if something in the way is blocked by a wall, in which case
    /// nothing moves. A push that would carry the robot or a box out of the map is an
    /// error and also leaves the warehouse untouched.
    fn try_move(&mut self, dir: Direction) -> Result<bool, Error>;

    /// Verify that no box sits in a wall or another box, and the robot stands on floor.
    fn check_consistency(&self) -> Result<(), Error>;

    /// Sum of the GPS coordinates of all boxes.
    fn gps_sum(&self) -> usize;

    fn simulate(&mut self, dirs: &[Direction]) -> Result<(), Error> {
        for (ind, dir) in dirs.iter().enumerate() {
            if !self.try_move(*dir)? {
                debug!(
                    "Move {}({}) is blocked, robot stays at {}.",
                    ind,
                    dir,
                    self.robot()
                );
            }
            trace!("After move {}({}):\n{}", ind, dir, self);
            self.check_consistency()?;
        }

        Ok(())
    }
}
