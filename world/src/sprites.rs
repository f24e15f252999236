//! Authoritative sprite storage keyed by stable handles.

use std::collections::BTreeMap;

use tilepush_core::{CellCoord, SpriteId, SpriteSnapshot, SpriteType};

#[derive(Clone, Debug)]
pub(crate) struct Sprite {
    pub(crate) id: SpriteId,
    pub(crate) kind: SpriteType,
    pub(crate) cell: CellCoord,
    pub(crate) pending_dx: i32,
    pub(crate) pending_dy: i32,
}

impl Sprite {
    pub(crate) fn snapshot(&self) -> SpriteSnapshot {
        SpriteSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            pending_dx: self.pending_dx,
            pending_dy: self.pending_dy,
        }
    }
}

/// Arena that owns every live sprite, keyed by handle.
///
/// Handles are allocated in increasing order and never reused, so iterating
/// the map by key visits sprites in insertion order and a handle held across a
/// removal cannot alias a sprite created later.
#[derive(Debug)]
pub(crate) struct SpriteStore {
    sprites: BTreeMap<SpriteId, Sprite>,
    next_sprite_id: SpriteId,
}

impl SpriteStore {
    pub(crate) fn new() -> Self {
        Self {
            sprites: BTreeMap::new(),
            next_sprite_id: SpriteId::new(0),
        }
    }

    /// Appends a sprite and returns its freshly allocated handle.
    pub(crate) fn insert(&mut self, kind: SpriteType, cell: CellCoord) -> SpriteId {
        let id = self.next_sprite_id;
        self.next_sprite_id = SpriteId::new(id.get().wrapping_add(1));
        let _ = self.sprites.insert(
            id,
            Sprite {
                id,
                kind,
                cell,
                pending_dx: 0,
                pending_dy: 0,
            },
        );
        id
    }

    pub(crate) fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: SpriteId) -> Option<Sprite> {
        self.sprites.remove(&id)
    }

    /// Removes every sprite occupying the cell, returning them in store order.
    pub(crate) fn remove_at(&mut self, cell: CellCoord) -> Vec<Sprite> {
        let occupants: Vec<SpriteId> = self
            .sprites
            .values()
            .filter(|sprite| sprite.cell == cell)
            .map(|sprite| sprite.id)
            .collect();
        occupants
            .into_iter()
            .filter_map(|id| self.sprites.remove(&id))
            .collect()
    }

    /// Removes every sprite, returning them in store order.
    pub(crate) fn clear(&mut self) -> Vec<Sprite> {
        std::mem::take(&mut self.sprites).into_values().collect()
    }

    /// Live sprites in insertion order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.sprites.values_mut()
    }

    pub(crate) fn snapshots(&self) -> impl Iterator<Item = SpriteSnapshot> + '_ {
        self.sprites.values().map(Sprite::snapshot)
    }
}
