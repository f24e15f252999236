//! Derived per-cell occupant index.

use tilepush_core::{CellCoord, SpriteSnapshot};

use crate::legend::Legend;

/// Dense grid listing the sprites stacked on each cell.
///
/// The index is a pure function of the sprite store, the legend and the grid
/// dimensions. It is never cached: every read site rebuilds it so the listing
/// always reflects the latest mutation. Within a cell sprites are ordered by
/// their type's position in the legend, and sprites of equal rank keep the
/// order in which they appear in the store.
#[derive(Clone, Debug, Default)]
pub struct GridIndex {
    width: u32,
    height: u32,
    cells: Vec<Vec<SpriteSnapshot>>,
}

impl GridIndex {
    /// Buckets the provided sprites by cell and stacks each bucket by legend order.
    pub(crate) fn build(
        sprites: impl IntoIterator<Item = SpriteSnapshot>,
        legend: &Legend,
        width: u32,
        height: u32,
    ) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut cells: Vec<Vec<SpriteSnapshot>> = vec![Vec::new(); capacity];

        for sprite in sprites {
            if let Some(bucket) = index(width, height, sprite.cell).and_then(|i| cells.get_mut(i))
            {
                bucket.push(sprite);
            }
        }

        // Unregistered types rank as `None`, ahead of every legend entry.
        for bucket in &mut cells {
            bucket.sort_by_key(|sprite| legend.order_of(sprite.kind));
        }

        Self {
            width,
            height,
            cells,
        }
    }

    /// Stack of sprites occupying the cell, empty when the cell lies outside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> &[SpriteSnapshot] {
        index(self.width, self.height, cell)
            .and_then(|i| self.cells.get(i))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Lenient lookup by signed coordinates.
    #[must_use]
    pub fn tile_at(&self, x: i64, y: i64) -> &[SpriteSnapshot] {
        CellCoord::checked(x, y, self.width, self.height)
            .map(|cell| self.tile(cell))
            .unwrap_or(&[])
    }

    /// Reports whether no sprite occupies the cell.
    #[must_use]
    pub fn is_empty(&self, cell: CellCoord) -> bool {
        self.tile(cell).is_empty()
    }

    /// Provides the dimensions of the indexed grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &[SpriteSnapshot])> + '_ {
        let width = self.width.max(1);
        self.cells.iter().enumerate().map(move |(i, bucket)| {
            let i = u32::try_from(i).unwrap_or(u32::MAX);
            (CellCoord::new(i % width, i / width), bucket.as_slice())
        })
    }

    /// Iterates over every cell column by column, top to bottom within a column.
    pub fn iter_column_major(&self) -> impl Iterator<Item = (CellCoord, &[SpriteSnapshot])> + '_ {
        (0..self.width).flat_map(move |column| {
            (0..self.height).map(move |row| {
                let cell = CellCoord::new(column, row);
                (cell, self.tile(cell))
            })
        })
    }
}

fn index(width: u32, height: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() < width && cell.row() < height {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(width).ok()?;
        Some(row * width + column)
    } else {
        None
    }
}
