//! Parser for rectangular text maps.

use tilepush_core::{CellCoord, EngineError, SpriteType};

/// Sprite placements decoded from a text map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MapLayout {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Placements in row-major order.
    pub(crate) placements: Vec<(CellCoord, SpriteType)>,
}

/// Decodes a map, one character per cell, with `.` and spaces marking empty cells.
///
/// Leading and trailing whitespace is ignored on the whole block and on every
/// line, after which all lines must share the same length.
pub(crate) fn parse(text: &str) -> Result<MapLayout, EngineError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EngineError::EmptyMap);
    }

    let rows: Vec<&str> = trimmed.split('\n').map(str::trim).collect();
    let expected = rows.first().map_or(0, |row| row.chars().count());
    for (index, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != expected {
            return Err(EngineError::NonRectangularMap {
                row: index,
                expected,
                found,
            });
        }
    }

    let (width, height) = dimensions(expected, rows.len())?;

    let mut placements = Vec::new();
    for (row, line) in (0..height).zip(rows) {
        for (column, tag) in (0..width).zip(line.chars()) {
            if tag == SpriteType::EMPTY.get() || tag.is_whitespace() {
                continue;
            }
            placements.push((CellCoord::new(column, row), SpriteType::new(tag)));
        }
    }

    Ok(MapLayout {
        width,
        height,
        placements,
    })
}

fn dimensions(columns: usize, rows: usize) -> Result<(u32, u32), EngineError> {
    match (u32::try_from(columns), u32::try_from(rows)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(EngineError::OversizedMap { columns, rows }),
    }
}
