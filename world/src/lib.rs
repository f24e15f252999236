#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tilepush.

mod grid;
mod legend;
mod map;
mod palette;
mod push;
mod sprites;

use std::collections::{HashMap, HashSet};

use tilepush_core::{CellCoord, Command, EngineError, Event, SpriteId, SpriteType};
use tracing::debug;

pub use grid::GridIndex;
pub use push::DEFAULT_PUSH_LIMIT;

use legend::Legend;
use palette::{Palette, TextLine};
use sprites::SpriteStore;

/// Represents the authoritative Tilepush world state.
#[derive(Debug)]
pub struct World {
    legend: Legend,
    width: u32,
    height: u32,
    sprites: SpriteStore,
    solids: HashSet<SpriteType>,
    pushables: HashMap<SpriteType, HashSet<SpriteType>>,
    background: Option<SpriteType>,
    texts: Vec<TextLine>,
    palette: Palette,
    push_limit: u32,
}

impl World {
    /// Creates an empty world with no legend and a zero-sized grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            legend: Legend::default(),
            width: 0,
            height: 0,
            sprites: SpriteStore::new(),
            solids: HashSet::new(),
            pushables: HashMap::new(),
            background: None,
            texts: Vec::new(),
            palette: Palette::new(),
            push_limit: DEFAULT_PUSH_LIMIT,
        }
    }

    pub(crate) fn grid(&self) -> GridIndex {
        GridIndex::build(self.sprites.snapshots(), &self.legend, self.width, self.height)
    }

    pub(crate) fn is_solid(&self, kind: SpriteType) -> bool {
        self.solids.contains(&kind)
    }

    pub(crate) fn can_push(&self, mover: SpriteType, occupant: SpriteType) -> bool {
        self.pushables
            .get(&mover)
            .is_some_and(|pushable| pushable.contains(&occupant))
    }

    fn load_map(&mut self, text: &str, out_events: &mut Vec<Event>) -> Result<(), EngineError> {
        let layout = map::parse(text)?;
        for (_, kind) in &layout.placements {
            self.legend.require(*kind)?;
        }

        self.width = layout.width;
        self.height = layout.height;
        for removed in self.sprites.clear() {
            out_events.push(Event::SpriteRemoved {
                sprite: removed.id,
                kind: removed.kind,
                cell: removed.cell,
            });
        }

        let placed = layout.placements.len();
        for (cell, kind) in layout.placements {
            let sprite = self.sprites.insert(kind, cell);
            out_events.push(Event::SpriteAdded { sprite, kind, cell });
        }

        debug!(width = self.width, height = self.height, sprites = placed, "map loaded");
        out_events.push(Event::MapLoaded {
            width: self.width,
            height: self.height,
            sprites: placed,
        });
        Ok(())
    }

    fn add_sprite(
        &mut self,
        x: i32,
        y: i32,
        kind: SpriteType,
        out_events: &mut Vec<Event>,
    ) -> Result<(), EngineError> {
        if kind.is_empty_marker() {
            return Ok(());
        }

        let cell = self.checked_cell(x, y)?;
        self.legend.require(kind)?;

        let sprite = self.sprites.insert(kind, cell);
        out_events.push(Event::SpriteAdded { sprite, kind, cell });
        Ok(())
    }

    fn replace_sprite(
        &mut self,
        sprite: SpriteId,
        kind: SpriteType,
        out_events: &mut Vec<Event>,
    ) -> Result<(), EngineError> {
        if self.sprites.get(sprite).is_none() {
            return Err(EngineError::UnknownSprite(sprite));
        }
        self.legend.require(kind)?;

        if let Some(removed) = self.sprites.remove(sprite) {
            out_events.push(Event::SpriteRemoved {
                sprite,
                kind: removed.kind,
                cell: removed.cell,
            });
            let replacement = self.sprites.insert(kind, removed.cell);
            out_events.push(Event::SpriteAdded {
                sprite: replacement,
                kind,
                cell: removed.cell,
            });
        }
        Ok(())
    }

    fn remove_sprite(&mut self, sprite: SpriteId, out_events: &mut Vec<Event>) {
        if let Some(removed) = self.sprites.remove(sprite) {
            out_events.push(Event::SpriteRemoved {
                sprite,
                kind: removed.kind,
                cell: removed.cell,
            });
        }
    }

    fn clear_tile(&mut self, x: i32, y: i32, out_events: &mut Vec<Event>) {
        let Some(cell) = CellCoord::checked(x.into(), y.into(), self.width, self.height) else {
            return;
        };
        for removed in self.sprites.remove_at(cell) {
            out_events.push(Event::SpriteRemoved {
                sprite: removed.id,
                kind: removed.kind,
                cell,
            });
        }
    }

    fn request_move(
        &mut self,
        sprite: SpriteId,
        dx: i32,
        dy: i32,
        axis: PendingAxis,
        out_events: &mut Vec<Event>,
    ) -> Result<(), EngineError> {
        if self.sprites.get(sprite).is_none() {
            return Err(EngineError::UnknownSprite(sprite));
        }

        if !self.attempt_move(sprite, dx, dy, 0, out_events) {
            out_events.push(Event::MoveRejected { sprite, dx, dy });
            return Ok(());
        }

        if let Some(entry) = self.sprites.get_mut(sprite) {
            match axis {
                PendingAxis::Both => {
                    entry.pending_dx = dx;
                    entry.pending_dy = dy;
                }
                PendingAxis::Horizontal => entry.pending_dx = dx,
                PendingAxis::Vertical => entry.pending_dy = dy,
            }
        }
        Ok(())
    }

    fn current_cell(&self, sprite: SpriteId) -> Result<CellCoord, EngineError> {
        self.sprites
            .get(sprite)
            .map(|entry| entry.cell)
            .ok_or(EngineError::UnknownSprite(sprite))
    }

    fn checked_cell(&self, x: i32, y: i32) -> Result<CellCoord, EngineError> {
        CellCoord::checked(x.into(), y.into(), self.width, self.height).ok_or(
            EngineError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            },
        )
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Which pending delta components a successful move records.
#[derive(Clone, Copy, Debug)]
enum PendingAxis {
    Both,
    Horizontal,
    Vertical,
}

/// Applies the provided command to the world.
///
/// Successful commands report their effects through `out_events`. A failing
/// command leaves the world untouched, except that a refused move keeps any
/// pushes that were committed before the refusal was decided.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    match command {
        Command::SetLegend { entries } => {
            world.legend = Legend::from_entries(entries)?;
        }
        Command::LoadMap { text } => world.load_map(&text, out_events)?,
        Command::AddSprite { x, y, kind } => world.add_sprite(x, y, kind, out_events)?,
        Command::RemoveSprite { sprite } => world.remove_sprite(sprite, out_events),
        Command::ClearTile { x, y } => world.clear_tile(x, y, out_events),
        Command::SetSolids { solids } => {
            world.solids = solids.into_iter().collect();
        }
        Command::SetPushables { pushables } => {
            world.pushables = pushables
                .into_iter()
                .map(|(mover, pushed)| (mover, pushed.into_iter().collect()))
                .collect();
        }
        Command::SetBackground { kind } => world.background = kind,
        Command::MoveSprite { sprite, dx, dy } => {
            world.request_move(sprite, dx, dy, PendingAxis::Both, out_events)?;
        }
        Command::SetSpriteX { sprite, x } => {
            let current = world.current_cell(sprite)?;
            let dx = signed_delta(current.column(), x);
            world.request_move(sprite, dx, 0, PendingAxis::Horizontal, out_events)?;
        }
        Command::SetSpriteY { sprite, y } => {
            let current = world.current_cell(sprite)?;
            let dy = signed_delta(current.row(), y);
            world.request_move(sprite, 0, dy, PendingAxis::Vertical, out_events)?;
        }
        Command::SetSpriteType { sprite, kind } => world.replace_sprite(sprite, kind, out_events)?,
        Command::ResetPendingDeltas => {
            for sprite in world.sprites.iter_mut() {
                sprite.pending_dx = 0;
                sprite.pending_dy = 0;
            }
        }
        Command::AddText { content, options } => {
            let line = TextLine::new(content, options, &world.palette);
            world.texts.push(line);
        }
        Command::ClearText => world.texts.clear(),
        Command::SetColor {
            key,
            red,
            green,
            blue,
        } => world.palette.set_rgb(key, red, green, blue)?,
        Command::ConfigurePushLimit { max_depth } => world.push_limit = max_depth,
    }
    Ok(())
}

/// Delta from `current` to `desired`, saturated so unreachable targets stay unreachable.
fn signed_delta(current: u32, desired: i32) -> i32 {
    let delta = i64::from(desired) - i64::from(current);
    i32::try_from(delta).unwrap_or(if delta < 0 { i32::MIN } else { i32::MAX })
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tilepush_core::{LegendEntry, Rgba, SpriteId, SpriteSnapshot, SpriteType, TextSnapshot};

    use super::{GridIndex, World};

    /// Number of columns in the current map.
    #[must_use]
    pub fn width(world: &World) -> u32 {
        world.width
    }

    /// Number of rows in the current map.
    #[must_use]
    pub fn height(world: &World) -> u32 {
        world.height
    }

    /// Rebuilds the per-cell occupant index from the current sprites.
    #[must_use]
    pub fn grid(world: &World) -> GridIndex {
        world.grid()
    }

    /// Sprites stacked on the cell in legend order; empty outside the grid.
    #[must_use]
    pub fn tile(world: &World, x: i32, y: i32) -> Vec<SpriteSnapshot> {
        world.grid().tile_at(x.into(), y.into()).to_vec()
    }

    /// Tiles on which every requested type occurs exactly once.
    ///
    /// Tiles may hold additional sprites of other types. Tiles are reported
    /// column by column. A request naming the same type twice matches nothing.
    #[must_use]
    pub fn tiles_with(world: &World, types: &[SpriteType]) -> Vec<Vec<SpriteSnapshot>> {
        world
            .grid()
            .iter_column_major()
            .filter(|(_, tile)| holds_each_once(tile, types))
            .map(|(_, tile)| tile.to_vec())
            .collect()
    }

    /// Reports whether any sprite on the cell has one of the provided types.
    #[must_use]
    pub fn has_type_any(world: &World, x: i32, y: i32, types: &[SpriteType]) -> bool {
        tile(world, x, y)
            .iter()
            .any(|sprite| types.contains(&sprite.kind))
    }

    /// Reports whether every sprite on the cell has one of the provided types.
    ///
    /// An empty cell satisfies any set of types.
    #[must_use]
    pub fn has_type_all(world: &World, x: i32, y: i32, types: &[SpriteType]) -> bool {
        tile(world, x, y)
            .iter()
            .all(|sprite| types.contains(&sprite.kind))
    }

    /// First sprite of the type in insertion order.
    #[must_use]
    pub fn first(world: &World, kind: SpriteType) -> Option<SpriteSnapshot> {
        world
            .sprites
            .iter()
            .find(|sprite| sprite.kind == kind)
            .map(|sprite| sprite.snapshot())
    }

    /// Every sprite, or every sprite of the type, in insertion order.
    #[must_use]
    pub fn all(world: &World, kind: Option<SpriteType>) -> Vec<SpriteSnapshot> {
        world
            .sprites
            .iter()
            .filter(|sprite| kind.map_or(true, |kind| sprite.kind == kind))
            .map(|sprite| sprite.snapshot())
            .collect()
    }

    /// Looks up a live sprite by handle.
    #[must_use]
    pub fn sprite(world: &World, sprite: SpriteId) -> Option<SpriteSnapshot> {
        world.sprites.get(sprite).map(|entry| entry.snapshot())
    }

    /// Text layer with colours resolved against the current palette.
    #[must_use]
    pub fn texts(world: &World) -> Vec<TextSnapshot> {
        world
            .texts
            .iter()
            .map(|line| line.resolve(&world.palette))
            .collect()
    }

    /// Background sprite type, if any.
    #[must_use]
    pub fn background(world: &World) -> Option<SpriteType> {
        world.background
    }

    /// Ordered legend entries.
    #[must_use]
    pub fn legend(world: &World) -> &[LegendEntry] {
        world.legend.entries()
    }

    /// Reports whether the type blocks solid movers.
    #[must_use]
    pub fn is_solid(world: &World, kind: SpriteType) -> bool {
        world.is_solid(kind)
    }

    /// Reports whether sprites of type `mover` may push sprites of type `occupant`.
    #[must_use]
    pub fn can_push(world: &World, mover: SpriteType, occupant: SpriteType) -> bool {
        world.can_push(mover, occupant)
    }

    /// Palette entries in their canonical order.
    #[must_use]
    pub fn palette(world: &World) -> &[(char, Rgba)] {
        world.palette.entries()
    }

    /// Maximum push chain depth.
    #[must_use]
    pub fn push_limit(world: &World) -> u32 {
        world.push_limit
    }

    fn holds_each_once(tile: &[SpriteSnapshot], types: &[SpriteType]) -> bool {
        types.iter().enumerate().all(|(index, kind)| {
            !types[..index].contains(kind)
                && tile.iter().filter(|sprite| sprite.kind == *kind).count() == 1
        })
    }
}
