//! Movement resolution with chained pushing.
//!
//! A solid mover entering an occupied cell asks every solid occupant it is
//! allowed to push to move by the same delta, recursively. Each successful
//! step is committed immediately: when the enclosing move is later refused,
//! sprites that were already pushed stay where they were pushed to.

use tilepush_core::{CellCoord, Event, SpriteId, SpriteSnapshot};
use tracing::{debug, trace, warn};

use crate::World;

/// Default bound on nested pushes triggered by a single move request.
pub const DEFAULT_PUSH_LIMIT: u32 = 1024;

impl World {
    /// Attempts to move the sprite by the delta, pushing occupants where permitted.
    ///
    /// Occupants of the destination are visited in stack order. Once a blocking
    /// occupant has been seen no further pushes are attempted, but pushes that
    /// already succeeded are not rolled back.
    pub(crate) fn attempt_move(
        &mut self,
        sprite: SpriteId,
        dx: i32,
        dy: i32,
        depth: u32,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(mover) = self.sprites.get(sprite) else {
            return false;
        };
        let (kind, from) = (mover.kind, mover.cell);

        let Some(target) = from.offset(dx, dy, self.width, self.height) else {
            trace!(sprite = sprite.get(), dx, dy, "move leaves the grid");
            return false;
        };

        let grid = self.grid();
        let stationary = dx == 0 && dy == 0;
        if stationary || !self.is_solid(kind) || grid.is_empty(target) {
            self.commit(sprite, from, target, out_events);
            return true;
        }

        let occupants: Vec<SpriteSnapshot> = grid.tile(target).to_vec();
        let mut can_move = true;
        for occupant in occupants {
            if !self.is_solid(occupant.kind) {
                continue;
            }

            if !self.can_push(kind, occupant.kind) {
                trace!(
                    sprite = sprite.get(),
                    blocker = occupant.id.get(),
                    "destination blocked"
                );
                can_move = false;
                continue;
            }

            if !can_move {
                continue;
            }

            if depth >= self.push_limit {
                warn!(
                    sprite = sprite.get(),
                    limit = self.push_limit,
                    "push chain exceeded the configured depth"
                );
                can_move = false;
                continue;
            }

            trace!(sprite = sprite.get(), pushed = occupant.id.get(), depth, "pushing");
            can_move = self.attempt_move(occupant.id, dx, dy, depth + 1, out_events);
        }

        if can_move {
            self.commit(sprite, from, target, out_events);
        }
        can_move
    }

    fn commit(&mut self, sprite: SpriteId, from: CellCoord, to: CellCoord, out_events: &mut Vec<Event>) {
        let Some(entry) = self.sprites.get_mut(sprite) else {
            return;
        };
        entry.cell = to;

        if from != to {
            debug!(
                sprite = sprite.get(),
                from = ?(from.column(), from.row()),
                to = ?(to.column(), to.row()),
                "sprite moved"
            );
            out_events.push(Event::SpriteMoved { sprite, from, to });
        }
    }
}
