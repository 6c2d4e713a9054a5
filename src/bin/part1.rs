use anyhow::{Context, Result};
use clap::Parser;
use warehouse::{CLIArgs, NarrowBoard, PlainTile, Warehouse};

fn main() -> Result<()> {
    env_logger::init();

    let args = CLIArgs::parse();
    let (grid, move_dirs) = warehouse::read_game::<PlainTile, _>(&args.input_path)
        .with_context(|| {
            format!(
                "Failed to read game(map and move directions) from given file({}).",
                args.input_path.display()
            )
        })?;

    let mut board = NarrowBoard::new(&grid)?;
    board
        .simulate(&move_dirs)
        .context("Failed to simulate robot's moves in warehouse.")?;
    println!("{}", board.gps_sum());

    Ok(())
}
