//! Warehouse with double-width boxes, kept as sets of coordinates.
//!
//! A box is identified by its left cell and covers `BOX_WIDTH` cells to the right of it
//! (inclusive). Pushing a box up or down may press on up to two boxes in the next row,
//! so the set of boxes that must move together is gathered row by row before anything
//! is touched.

use std::{collections::HashSet, fmt::Display};

use crate::{Direction, Error, Grid, Position, Warehouse, WideTile};

pub const BOX_WIDTH: usize = 2;

#[derive(Debug, Clone)]
pub struct WideBoard {
    walls: HashSet<Position>,
    boxes: HashSet<Position>,
    robot_pos: Position,
    row_n: usize,
    col_n: usize,
}

impl Display for WideBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in 0..self.row_n {
            for c in 0..self.col_n {
                let pos = Position::new(r, c);
                let tile = if self.walls.contains(&pos) {
                    WideTile::Wall
                } else if let Some(left_pos) = self.box_at(&pos) {
                    if left_pos == pos {
                        WideTile::WideBoxLeft
                    } else {
                        WideTile::WideBoxRight
                    }
                } else if pos == self.robot_pos {
                    WideTile::Robot
                } else {
                    WideTile::Floor
                };
                write!(f, "{}", tile)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl WideBoard {
    pub fn new(grid: &Grid<WideTile>) -> Result<Self, Error> {
        let mut walls = HashSet::new();
        let mut boxes = HashSet::new();
        for (pos, tile) in grid.iter() {
            match tile {
                WideTile::Wall => {
                    walls.insert(pos);
                }
                WideTile::WideBoxLeft => {
                    let right_pos = Position::new(pos.r, pos.c + 1);
                    if grid.tile(&right_pos) != Some(WideTile::WideBoxRight) {
                        return Err(Error::BrokenWideBox(pos));
                    }

                    boxes.insert(pos);
                }
                WideTile::WideBoxRight => {
                    let left_tile = pos.neighbor(Direction::Left).and_then(|p| grid.tile(&p));
                    if left_tile != Some(WideTile::WideBoxLeft) {
                        return Err(Error::BrokenWideBox(pos));
                    }
                }
                WideTile::Robot | WideTile::Floor => (),
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

    /// Left cells of all boxes, sorted by row then column.
    pub fn box_positions(&self) -> Vec<Position> {
        let mut positions = self.boxes.iter().copied().collect::<Vec<_>>();
        positions.sort();
        positions
    }

    pub fn has_wall(&self, pos: &Position) -> bool {
        self.walls.contains(pos)
    }

    /// Left cell of the box covering `pos`, if any.
    pub fn box_at(&self, pos: &Position) -> Option<Position> {
        (0..BOX_WIDTH)
            .filter_map(|offset| pos.c.checked_sub(offset))
            .map(|c| Position::new(pos.r, c))
            .find(|left_pos| self.boxes.contains(left_pos))
    }

    fn in_bounds(&self, pos: &Position) -> bool {
        pos.r < self.row_n && pos.c < self.col_n
    }

    fn step(&self, pos: &Position, dir: Direction) -> Option<Position> {
        pos.neighbor(dir).filter(|next_pos| self.in_bounds(next_pos))
    }

    fn footprint(left_pos: Position) -> impl Iterator<Item = Position> {
        (0..BOX_WIDTH).map(move |offset| Position::new(left_pos.r, left_pos.c + offset))
    }

    // Boxes in a row, one after another, starting at the cell the robot steps into.
    fn gather_horizontal(&self, start_pos: &Position, dir: Direction) -> Vec<Position> {
        let mut boxes_to_move = Vec::new();
        let mut pos = Some(*start_pos);
        while let Some(this_pos) = pos {
            let probe = if dir == Direction::Left {
                this_pos
                    .c
                    .checked_sub(BOX_WIDTH - 1)
                    .map(|c| Position::new(this_pos.r, c))
            } else {
                Some(this_pos)
            };
            match probe {
                Some(left_pos) if self.boxes.contains(&left_pos) => boxes_to_move.push(left_pos),
                _ => break,
            }

            pos = (0..BOX_WIDTH).try_fold(this_pos, |p, _| p.neighbor(dir));
        }

        boxes_to_move
    }

    // Boxes pressing on each other row by row, starting with the one the robot steps into.
    fn gather_vertical(&self, start_pos: &Position, dir: Direction) -> Vec<Position> {
        let Some(first_box) = self.box_at(start_pos) else {
            return Vec::new();
        };

        let mut boxes_to_move = vec![first_box];
        let mut last_row = vec![first_box];
        while let Some(next_r) = last_row[0].neighbor(dir).map(|p| p.r) {
            let mut next_row = HashSet::new();
            for left_pos in &last_row {
                // A box whose left cell is within `BOX_WIDTH - 1` of this one touches it.
                let min_c = left_pos.c.saturating_sub(BOX_WIDTH - 1);
                let max_c = left_pos.c + (BOX_WIDTH - 1);
                next_row.extend(
                    (min_c..=max_c)
                        .map(|c| Position::new(next_r, c))
                        .filter(|pos| self.boxes.contains(pos)),
                );
            }
            if next_row.is_empty() {
                break;
            }

            last_row = next_row.into_iter().collect();
            boxes_to_move.extend_from_slice(&last_row);
        }

        boxes_to_move
    }

    // `Ok(false)` if any shifted box would hit a wall.
    fn check_boxes_valid(&self, boxes_to_move: &[Position], dir: Direction) -> Result<bool, Error> {
        let shifted_cells = boxes_to_move
            .iter()
            .flat_map(|left_pos| Self::footprint(*left_pos))
            .map(|pos| self.step(&pos, dir).ok_or(Error::OffGrid(pos, dir)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(shifted_cells.iter().all(|pos| !self.walls.contains(pos)))
    }

    fn move_boxes(&mut self, boxes_to_move: &[Position], dir: Direction) -> Result<(), Error> {
        let shifted = boxes_to_move
            .iter()
            .map(|left_pos| left_pos.neighbor(dir).ok_or(Error::OffGrid(*left_pos, dir)))
            .collect::<Result<Vec<_>, _>>()?;

        for left_pos in boxes_to_move {
            self.boxes.remove(left_pos);
        }
        self.boxes.extend(shifted);

        Ok(())
    }
}

impl Warehouse for WideBoard {
    fn robot(&self) -> &Position {
        &self.robot_pos
    }

    fn try_move(&mut self, dir: Direction) -> Result<bool, Error> {
        let next_pos = self
            .step(&self.robot_pos, dir)
            .ok_or(Error::OffGrid(self.robot_pos, dir))?;
        if self.walls.contains(&next_pos) {
            return Ok(false);
        }

        let boxes_to_move = if dir.is_vertical() {
            self.gather_vertical(&next_pos, dir)
        } else {
            self.gather_horizontal(&next_pos, dir)
        };
        if !self.check_boxes_valid(&boxes_to_move, dir)? {
            return Ok(false);
        }

        self.move_boxes(&boxes_to_move, dir)?;
        self.robot_pos = next_pos;

        Ok(true)
    }

    fn check_consistency(&self) -> Result<(), Error> {
        if self.walls.contains(&self.robot_pos) {
            return Err(Error::RobotInWall(self.robot_pos));
        }
        if self.box_at(&self.robot_pos).is_some() {
            return Err(Error::RobotInBox(self.robot_pos));
        }

        for left_pos in &self.boxes {
            for pos in Self::footprint(*left_pos) {
                if self.walls.contains(&pos) {
                    return Err(Error::BoxInWall(pos));
                }
            }
            for offset in 1..BOX_WIDTH {
                let other_pos = Position::new(left_pos.r, left_pos.c + offset);
                if self.boxes.contains(&other_pos) {
                    return Err(Error::OverlappingBoxes(*left_pos, other_pos));
                }
            }
        }

        Ok(())
    }

    fn gps_sum(&self) -> usize {
        self.boxes.iter().map(|pos| pos.gps()).sum()
    }
}
