use std::fs;

use warehouse::{parse_game, Direction, Error, Grid, NarrowBoard, PlainTile, Position, Warehouse};

fn board(text: &str) -> NarrowBoard {
    let grid = text.parse::<Grid<PlainTile>>().unwrap();
    NarrowBoard::new(&grid).unwrap()
}

fn snapshot(board: &NarrowBoard) -> (Position, Vec<Position>) {
    (*board.robot(), board.box_positions().collect())
}

const TWO_BOXES: &str = "#######\n#...#.#\n#..OO@#\n#.....#\n#######";

#[test]
fn robot_pushes_box_chain_left() {
    let mut board = board(TWO_BOXES);

    assert!(board.try_move(Direction::Left).unwrap());
    assert_eq!(
        snapshot(&board),
        (
            Position::new(2, 4),
            vec![Position::new(2, 2), Position::new(2, 3)]
        )
    );

    assert!(board.try_move(Direction::Left).unwrap());
    assert_eq!(
        snapshot(&board),
        (
            Position::new(2, 3),
            vec![Position::new(2, 1), Position::new(2, 2)]
        )
    );
    assert_eq!(board.gps_sum(), 403);
}

#[test]
fn blocked_push_changes_nothing() {
    let mut board = board(TWO_BOXES);
    board.simulate(&[Direction::Left, Direction::Left]).unwrap();
    let before = snapshot(&board);

    assert!(!board.try_move(Direction::Left).unwrap());
    assert_eq!(snapshot(&board), before);

    // Wall right next to the robot.
    let mut board = self::board(TWO_BOXES);
    let before = snapshot(&board);
    assert!(!board.try_move(Direction::Right).unwrap());
    assert_eq!(snapshot(&board), before);
}

#[test]
fn boxes_never_overlap_walls_after_moves() {
    let text = fs::read_to_string("inputs.txt").unwrap();
    let (grid, move_dirs) = parse_game::<PlainTile>(&text).unwrap();
    let mut board = NarrowBoard::new(&grid).unwrap();

    for dir in move_dirs {
        board.try_move(dir).unwrap();
        board.check_consistency().unwrap();
        assert!(board.box_positions().all(|pos| !board.has_wall(&pos)));
        assert!(!board.has_wall(board.robot()) && !board.has_box(board.robot()));
    }
    assert_eq!(board.gps_sum(), 10092);
}

#[test]
fn small_example_scores_2028() {
    let text = fs::read_to_string("tests/data/input.txt").unwrap();
    let (grid, move_dirs) = parse_game::<PlainTile>(&text).unwrap();
    let mut board = NarrowBoard::new(&grid).unwrap();
    board.simulate(&move_dirs).unwrap();

    assert_eq!(
        board.to_string(),
        "########\n#....OO#\n##.....#\n#.....O#\n#.#O@..#\n#...O..#\n#...O..#\n########\n"
    );
    assert_eq!(board.gps_sum(), 2028);
}

#[test]
fn printed_board_parses_back_to_same_score() {
    let text = fs::read_to_string("inputs.txt").unwrap();
    let (grid, move_dirs) = parse_game::<PlainTile>(&text).unwrap();
    let mut board = NarrowBoard::new(&grid).unwrap();
    board.simulate(&move_dirs).unwrap();

    let reparsed = self::board(&board.to_string());
    assert_eq!(snapshot(&reparsed), snapshot(&board));
    assert_eq!(reparsed.gps_sum(), board.gps_sum());
}

#[test]
fn pushing_off_open_edge_is_an_error() {
    let mut board = board(".@OO");
    let before = snapshot(&board);

    assert_eq!(
        board.try_move(Direction::Right),
        Err(Error::OffGrid(Position::new(0, 3), Direction::Right))
    );
    assert_eq!(snapshot(&board), before);

    assert!(board.try_move(Direction::Left).unwrap());
    assert_eq!(
        board.try_move(Direction::Left),
        Err(Error::OffGrid(Position::new(0, 0), Direction::Left))
    );
    assert_eq!(
        board.try_move(Direction::Up),
        Err(Error::OffGrid(Position::new(0, 0), Direction::Up))
    );
}

#[test]
fn simulate_stops_at_first_error() {
    let mut board = board(".@O");

    assert!(board
        .simulate(&[Direction::Left, Direction::Right, Direction::Right])
        .is_err());
    assert_eq!(*board.robot(), Position::new(0, 1));
    assert_eq!(board.box_positions().collect::<Vec<_>>(), vec![Position::new(0, 2)]);
}

#[test]
fn maps_wider_than_a_row_mask_are_rejected() {
    let row = format!("@{}", ".".repeat(64));
    let grid = row.parse::<Grid<PlainTile>>().unwrap();

    assert_eq!(
        NarrowBoard::new(&grid).unwrap_err(),
        Error::GridTooWide(65, 64)
    );
}
