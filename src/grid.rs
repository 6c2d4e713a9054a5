use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use anyhow::{Context, Result};

use crate::{Direction, Error, Position};

pub trait Tile: Copy + Eq + Display + TryFrom<char, Error = Error> {
    const ROBOT: Self;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlainTile {
    Wall,
    Robot,
    Box,
    Floor,
}

impl Display for PlainTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tile_char = match self {
            PlainTile::Wall => '#',
            PlainTile::Robot => '@',
            PlainTile::Box => 'O',
            PlainTile::Floor => '.',
        };

        write!(f, "{}", tile_char)
    }
}

impl TryFrom<char> for PlainTile {
    type Error = Error;

    fn try_from(value: char) -> std::result::Result<Self, Self::Error> {
        match value {
            '#' => Ok(PlainTile::Wall),
            '@' => Ok(PlainTile::Robot),
            'O' => Ok(PlainTile::Box),
            '.' => Ok(PlainTile::Floor),
            other => Err(Error::InvalidCharForMap(other)),
        }
    }
}

impl Tile for PlainTile {
    const ROBOT: Self = PlainTile::Robot;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WideTile {
    Wall,
    WideBoxLeft,
    WideBoxRight,
    Robot,
    Floor,
}

impl Display for WideTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tile_char = match self {
            WideTile::Wall => '#',
            WideTile::Robot => '@',
            WideTile::WideBoxLeft => '[',
            WideTile::WideBoxRight => ']',
            WideTile::Floor => '.',
        };

        write!(f, "{}", tile_char)
    }
}

impl TryFrom<char> for WideTile {
    type Error = Error;

    fn try_from(value: char) -> std::result::Result<Self, Self::Error> {
        match value {
            '#' => Ok(WideTile::Wall),
            '@' => Ok(WideTile::Robot),
            '[' => Ok(WideTile::WideBoxLeft),
            ']' => Ok(WideTile::WideBoxRight),
            '.' => Ok(WideTile::Floor),
            other => Err(Error::InvalidCharForMap(other)),
        }
    }
}

impl Tile for WideTile {
    const ROBOT: Self = WideTile::Robot;
}

/// Rectangular layout of a warehouse as read from input, with exactly one robot.
#[derive(Debug, Clone)]
pub struct Grid<T: Tile> {
    tiles: Vec<T>,
    robot_pos: Position,
    row_n: usize,
    col_n: usize,
}

impl<T: Tile> Display for Grid<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.tiles.chunks(self.col_n.max(1)) {
            for tile in row {
                write!(f, "{}", tile)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl<T: Tile> FromStr for Grid<T> {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut builder = GridBuilder::new();
        for line in s.lines().take_while(|line| !line.trim().is_empty()) {
            builder.add_row(line)?;
        }

        builder.build()
    }
}

impl<T: Tile> Grid<T> {
    pub fn row_n(&self) -> usize {
        self.row_n
    }

    pub fn col_n(&self) -> usize {
        self.col_n
    }

    pub fn robot_pos(&self) -> &Position {
        &self.robot_pos
    }

    pub fn tile(&self, pos: &Position) -> Option<T> {
        if pos.r < self.row_n && pos.c < self.col_n {
            self.tiles.get(pos.r * self.col_n + pos.c).copied()
        } else {
            None
        }
    }

    /// All tiles in row-major order, paired with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (Position, T)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(ind, tile)| (Position::new(ind / self.col_n, ind % self.col_n), *tile))
    }

    pub fn position_iter(&self, tile: T) -> impl Iterator<Item = Position> + '_ {
        self.iter()
            .filter(move |(_, this_tile)| *this_tile == tile)
            .map(|(pos, _)| pos)
    }
}

impl Grid<PlainTile> {
    pub fn widen(&self) -> Grid<WideTile> {
        let mut tiles = Vec::with_capacity(self.tiles.len() * 2);
        for tile in self.tiles.iter() {
            tiles.extend_from_slice(&match tile {
                PlainTile::Wall => [WideTile::Wall, WideTile::Wall],
                PlainTile::Robot => [WideTile::Robot, WideTile::Floor],
                PlainTile::Box => [WideTile::WideBoxLeft, WideTile::WideBoxRight],
                PlainTile::Floor => [WideTile::Floor, WideTile::Floor],
            });
        }
        let robot_pos = Position::new(self.robot_pos.r, self.robot_pos.c * 2);

        Grid::<WideTile> {
            tiles,
            robot_pos,
            row_n: self.row_n,
            col_n: self.col_n * 2,
        }
    }
}

pub struct GridBuilder<T: Tile> {
    tiles: Vec<T>,
    robot_pos: Option<Position>,
    row_n: usize,
    col_n: Option<usize>,
}

impl<T: Tile> Default for GridBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Tile> GridBuilder<T> {
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            robot_pos: None,
            row_n: 0,
            col_n: None,
        }
    }

    pub fn add_row(&mut self, text: &str) -> Result<(), Error> {
        let this_col_n = text.chars().count();
        let expect_col_n = *self.col_n.get_or_insert(this_col_n);
        if expect_col_n != this_col_n {
            return Err(Error::InconsistentRow(expect_col_n, this_col_n));
        }

        for (ind, c) in text.chars().enumerate() {
            let tile = T::try_from(c)?;
            if tile == T::ROBOT {
                let this_robot_pos = Position::new(self.row_n, ind);
                if let Some(last_robot_pos) = self.robot_pos {
                    return Err(Error::MultipleRobots(last_robot_pos, this_robot_pos));
                }

                self.robot_pos = Some(this_robot_pos);
            }

            self.tiles.push(tile);
        }
        self.row_n += 1;

        Ok(())
    }

    pub fn build(self) -> Result<Grid<T>, Error> {
        if self.row_n == 0 {
            return Err(Error::EmptyMap);
        }

        if let Some(robot_pos) = self.robot_pos {
            Ok(Grid::<T> {
                tiles: self.tiles,
                robot_pos,
                row_n: self.row_n,
                col_n: self.col_n.unwrap_or(0),
            })
        } else {
            Err(Error::NoRobotInMap)
        }
    }
}

/// Feeds input lines to the grid builder until the first blank line, then decodes moves.
struct GameParser<T: Tile> {
    builder: GridBuilder<T>,
    move_dirs: Vec<Direction>,
    in_moves: bool,
}

impl<T: Tile> GameParser<T> {
    fn new() -> Self {
        Self {
            builder: GridBuilder::new(),
            move_dirs: Vec::new(),
            in_moves: false,
        }
    }

    fn feed_line(&mut self, line: &str) -> Result<(), Error> {
        if self.in_moves {
            for c in line.trim_end().chars() {
                self.move_dirs.push(Direction::try_from(c)?);
            }
        } else if line.trim().is_empty() {
            self.in_moves = true;
        } else {
            self.builder.add_row(line)?;
        }

        Ok(())
    }

    fn finish(self) -> Result<(Grid<T>, Vec<Direction>), Error> {
        Ok((self.builder.build()?, self.move_dirs))
    }
}

/// Parse a whole puzzle text: the map, a blank line, then lines of moves.
pub fn parse_game<T: Tile>(text: &str) -> Result<(Grid<T>, Vec<Direction>), Error> {
    let mut parser = GameParser::new();
    for line in text.lines() {
        parser.feed_line(line)?;
    }

    parser.finish()
}

pub fn read_game<T: Tile, P: AsRef<Path>>(path: P) -> Result<(Grid<T>, Vec<Direction>)> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open given file({}).", path.as_ref().display()))?;
    let reader = BufReader::new(file);
    let mut parser = GameParser::new();
    for (ind, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!(
                "Failed to read line {} in given file({}).",
                ind + 1,
                path.as_ref().display()
            )
        })?;
        parser.feed_line(&line).with_context(|| {
            format!(
                "Failed to parse line {} in given file({}).",
                ind + 1,
                path.as_ref().display()
            )
        })?;
    }

    Ok(parser.finish()?)
}
