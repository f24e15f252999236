use tilepush_core::{CellCoord, SpriteType};
use tilepush_world::{query, World};

/// Renders the world as text, showing the topmost sprite of every tile.
///
/// Empty tiles fall back to the background type, or `.` when none is set.
pub(crate) fn render(world: &World) -> String {
    let grid = query::grid(world);
    let (width, height) = grid.dimensions();
    let filler = query::background(world).unwrap_or(SpriteType::EMPTY).get();

    let mut board = String::new();
    for row in 0..height {
        for column in 0..width {
            let tile = grid.tile(CellCoord::new(column, row));
            board.push(tile.first().map_or(filler, |sprite| sprite.kind.get()));
        }
        board.push('\n');
    }
    board
}
