//! Warehouse with single-width boxes, kept as one bit mask per row.

use std::fmt::Display;

use crate::{Direction, Error, Grid, PlainTile, Position, Warehouse};

type RowMask = u64;

const MAX_COL_N: usize = RowMask::BITS as usize;

#[derive(Debug, Clone)]
pub struct NarrowBoard {
    walls: Vec<RowMask>,
    boxes: Vec<RowMask>,
    robot_pos: Position,
    row_n: usize,
    col_n: usize,
}

impl Display for NarrowBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in 0..self.row_n {
            for c in 0..self.col_n {
                let pos = Position::new(r, c);
                let tile = if is_set(&self.walls, &pos) {
                    PlainTile::Wall
                } else if is_set(&self.boxes, &pos) {
                    PlainTile::Box
                } else if pos == self.robot_pos {
                    PlainTile::Robot
                } else {
                    PlainTile::Floor
                };
                write!(f, "{}", tile)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl NarrowBoard {
    pub fn new(grid: &Grid<PlainTile>) -> Result<Self, Error> {
        if grid.col_n() > MAX_COL_N {
            return Err(Error::GridTooWide(grid.col_n(), MAX_COL_N));
        }

        let mut walls = vec![0; grid.row_n()];
        let mut boxes = vec![0; grid.row_n()];
        for (pos, tile) in grid.iter() {
            match tile {
                PlainTile::Wall => set(&mut walls, &pos),
                PlainTile::Box => set(&mut boxes, &pos),
                PlainTile::Robot | PlainTile::Floor => (),
            }
        }

        Ok(Self {
            walls,
            boxes,
            robot_pos: *grid.robot_pos(),
            row_n: grid.row_n(),
            col_n: grid.col_n(),
        })
    }

    pub fn box_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.boxes.iter().enumerate().flat_map(|(r, row)| {
            (0..self.col_n)
                .filter(move |c| row & bit(*c) != 0)
                .map(move |c| Position::new(r, c))
        })
    }

    pub fn has_box(&self, pos: &Position) -> bool {
        self.in_bounds(pos) && is_set(&self.boxes, pos)
    }

    pub fn has_wall(&self, pos: &Position) -> bool {
        self.in_bounds(pos) && is_set(&self.walls, pos)
    }

    fn in_bounds(&self, pos: &Position) -> bool {
        pos.r < self.row_n && pos.c < self.col_n
    }

    fn step(&self, pos: &Position, dir: Direction) -> Option<Position> {
        pos.neighbor(dir).filter(|next_pos| self.in_bounds(next_pos))
    }

    // Robot cell plus the run of boxes right behind it in `dir`.
    fn gather_move_chain(&self, dir: Direction) -> Result<Vec<RowMask>, Error> {
        let mut chain = vec![0; self.row_n];
        let mut pos = self.robot_pos;
        loop {
            set(&mut chain, &pos);
            let next_pos = self.step(&pos, dir).ok_or(Error::OffGrid(pos, dir))?;
            if !is_set(&self.boxes, &next_pos) {
                return Ok(chain);
            }

            pos = next_pos;
        }
    }
}

impl Warehouse for NarrowBoard {
    fn robot(&self) -> &Position {
        &self.robot_pos
    }

    fn try_move(&mut self, dir: Direction) -> Result<bool, Error> {
        let chain = self.gather_move_chain(dir)?;
        let mut shifted = shift(&chain, dir);
        if overlap(&self.walls, &shifted) {
            return Ok(false);
        }

        // The chain stays inside the map, so the robot's next cell does too.
        let robot_pos = self
            .step(&self.robot_pos, dir)
            .ok_or(Error::OffGrid(self.robot_pos, dir))?;
        self.robot_pos = robot_pos;
        clear(&mut shifted, &robot_pos);
        remove(&mut self.boxes, &chain);
        add(&mut self.boxes, &shifted);

        Ok(true)
    }

    fn check_consistency(&self) -> Result<(), Error> {
        if self.has_wall(&self.robot_pos) {
            return Err(Error::RobotInWall(self.robot_pos));
        }
        if self.has_box(&self.robot_pos) {
            return Err(Error::RobotInBox(self.robot_pos));
        }

        for (r, (wall_row, box_row)) in self.walls.iter().zip(self.boxes.iter()).enumerate() {
            let both = wall_row & box_row;
            if both != 0 {
                return Err(Error::BoxInWall(Position::new(
                    r,
                    both.trailing_zeros() as usize,
                )));
            }
        }

        Ok(())
    }

    fn gps_sum(&self) -> usize {
        self.box_positions().map(|pos| pos.gps()).sum()
    }
}

fn bit(c: usize) -> RowMask {
    1 << c
}

fn is_set(mask: &[RowMask], pos: &Position) -> bool {
    mask[pos.r] & bit(pos.c) != 0
}

fn set(mask: &mut [RowMask], pos: &Position) {
    mask[pos.r] |= bit(pos.c);
}

fn clear(mask: &mut [RowMask], pos: &Position) {
    mask[pos.r] &= !bit(pos.c);
}

fn overlap(lhs: &[RowMask], rhs: &[RowMask]) -> bool {
    lhs.iter().zip(rhs.iter()).any(|(l, r)| l & r != 0)
}

fn remove(lhs: &mut [RowMask], rhs: &[RowMask]) {
    for (l, r) in lhs.iter_mut().zip(rhs.iter()) {
        *l &= !r;
    }
}

fn add(lhs: &mut [RowMask], rhs: &[RowMask]) {
    for (l, r) in lhs.iter_mut().zip(rhs.iter()) {
        *l |= r;
    }
}

// Bits pushed past the first or last row/column are dropped.
fn shift(mask: &[RowMask], dir: Direction) -> Vec<RowMask> {
    let row_n = mask.len();
    let mut out = vec![0; row_n];
    match dir {
        Direction::Up => {
            for r in 1..row_n {
                out[r - 1] = mask[r];
            }
        }
        Direction::Down => {
            for r in 1..row_n {
                out[r] = mask[r - 1];
            }
        }
        Direction::Right => {
            for (o, m) in out.iter_mut().zip(mask.iter()) {
                *o = m << 1;
            }
        }
        Direction::Left => {
            for (o, m) in out.iter_mut().zip(mask.iter()) {
                *o = m >> 1;
            }
        }
    }

    out
}
