#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tilepush engine.
//!
//! This crate defines the message surface that connects adapters and the
//! authoritative world. Adapters submit [`Command`] values describing desired
//! mutations, the world executes those commands via its `apply` entry point and
//! reports what actually changed through [`Event`] values. Failures surface as
//! [`EngineError`] values scoped to the single command that produced them.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

pub mod literal;

pub use literal::{bitmap, color, map, tune, Template};

/// Number of text columns available on a single line of the text layer.
pub const TEXT_COLUMNS: i32 = 21;

/// Palette key applied to text when no colour is requested.
pub const DEFAULT_TEXT_COLOR: char = 'L';

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the legend, defining valid sprite types and their stacking order.
    SetLegend {
        /// Ordered legend entries; earlier entries stack above later ones.
        entries: Vec<LegendEntry>,
    },
    /// Parses a rectangular text block and replaces every sprite with its contents.
    LoadMap {
        /// Multi-line map text, one character per cell.
        text: String,
    },
    /// Places a new sprite of the provided type at the given cell.
    AddSprite {
        /// Column of the requested cell.
        x: i32,
        /// Row of the requested cell.
        y: i32,
        /// Type tag of the sprite to create.
        kind: SpriteType,
    },
    /// Removes a sprite from the world.
    RemoveSprite {
        /// Handle of the sprite to remove.
        sprite: SpriteId,
    },
    /// Removes every sprite occupying the given cell.
    ClearTile {
        /// Column of the cell to clear.
        x: i32,
        /// Row of the cell to clear.
        y: i32,
    },
    /// Replaces the set of solid sprite types.
    SetSolids {
        /// Types that block solid movers.
        solids: Vec<SpriteType>,
    },
    /// Replaces the push permissions keyed by mover type.
    SetPushables {
        /// Types each mover type is allowed to push.
        pushables: BTreeMap<SpriteType, Vec<SpriteType>>,
    },
    /// Sets or clears the background sprite type.
    SetBackground {
        /// Type painted beneath every cell, if any.
        kind: Option<SpriteType>,
    },
    /// Requests that a sprite move by the provided delta, pushing where allowed.
    MoveSprite {
        /// Handle of the sprite attempting to move.
        sprite: SpriteId,
        /// Requested column delta.
        dx: i32,
        /// Requested row delta.
        dy: i32,
    },
    /// Requests that a sprite move horizontally to the provided column.
    SetSpriteX {
        /// Handle of the sprite attempting to move.
        sprite: SpriteId,
        /// Desired column.
        x: i32,
    },
    /// Requests that a sprite move vertically to the provided row.
    SetSpriteY {
        /// Handle of the sprite attempting to move.
        sprite: SpriteId,
        /// Desired row.
        y: i32,
    },
    /// Replaces a sprite with a sprite of another type at the same cell.
    SetSpriteType {
        /// Handle of the sprite to replace.
        sprite: SpriteId,
        /// Type of the replacement sprite.
        kind: SpriteType,
    },
    /// Zeroes the pending deltas recorded on every sprite.
    ResetPendingDeltas,
    /// Appends a line of text to the text layer.
    AddText {
        /// Text to display.
        content: String,
        /// Optional placement and colour overrides.
        options: TextOptions,
    },
    /// Removes every line from the text layer.
    ClearText,
    /// Rewrites the RGB components of a palette colour.
    SetColor {
        /// Palette key of the colour to rewrite.
        key: char,
        /// New red component.
        red: u8,
        /// New green component.
        green: u8,
        /// New blue component.
        blue: u8,
    },
    /// Bounds the depth of recursive push chains.
    ConfigurePushLimit {
        /// Maximum number of nested pushes a single move may trigger.
        max_depth: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a map was loaded and the grid resized.
    MapLoaded {
        /// Number of columns in the loaded map.
        width: u32,
        /// Number of rows in the loaded map.
        height: u32,
        /// Number of sprites placed by the map.
        sprites: usize,
    },
    /// Confirms that a sprite was created.
    SpriteAdded {
        /// Handle assigned to the new sprite.
        sprite: SpriteId,
        /// Type of the new sprite.
        kind: SpriteType,
        /// Cell the sprite occupies.
        cell: CellCoord,
    },
    /// Confirms that a sprite was removed.
    SpriteRemoved {
        /// Handle of the removed sprite.
        sprite: SpriteId,
        /// Type of the removed sprite.
        kind: SpriteType,
        /// Cell the sprite occupied when removed.
        cell: CellCoord,
    },
    /// Confirms that a sprite changed cells, either on its own or by being pushed.
    SpriteMoved {
        /// Handle of the sprite that moved.
        sprite: SpriteId,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// Reports that a requested move was refused.
    ///
    /// Pushed sprites may already have moved before the refusal; their
    /// [`Event::SpriteMoved`] events precede this one.
    MoveRejected {
        /// Handle of the sprite whose move was refused.
        sprite: SpriteId,
        /// Requested column delta.
        dx: i32,
        /// Requested row delta.
        dy: i32,
    },
}

/// Errors raised by a single command or query.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A write targeted a cell outside the configured dimensions.
    #[error("sprite out of bounds: ({x}, {y}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
        /// Configured grid width.
        width: u32,
        /// Configured grid height.
        height: u32,
    },
    /// The type tag is not registered in the legend.
    #[error("unknown sprite type: {0}")]
    UnknownType(SpriteType),
    /// Map rows have differing lengths.
    #[error("level must be rectangular: row {row} has {found} columns, expected {expected}")]
    NonRectangularMap {
        /// Zero-based index of the first offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// The map text contained no rows.
    #[error("tried to set an empty map")]
    EmptyMap,
    /// The map text has more rows or columns than a grid coordinate can address.
    #[error("map of {columns}x{rows} cells exceeds the addressable grid")]
    OversizedMap {
        /// Number of characters per row.
        columns: usize,
        /// Number of rows.
        rows: usize,
    },
    /// A tagged-literal helper was called as a plain function.
    #[error("{0}")]
    Misuse(&'static str),
    /// The handle does not refer to a live sprite.
    #[error("no live sprite with id {}", .0.get())]
    UnknownSprite(SpriteId),
    /// The palette has no colour under the provided key.
    #[error("unknown palette colour: {0:?}")]
    UnknownColor(char),
    /// The legend registers the same type tag twice.
    #[error("sprite type {0} appears more than once in the legend")]
    DuplicateLegendType(SpriteType),
    /// The legend tried to register the empty-cell marker.
    #[error("sprite type {0} is reserved for empty cells")]
    ReservedType(SpriteType),
}

/// Single-character tag naming a sprite type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteType(char);

impl SpriteType {
    /// Tag reserved for empty cells in map text.
    pub const EMPTY: Self = Self('.');

    /// Creates a new type tag from the provided character.
    #[must_use]
    pub const fn new(tag: char) -> Self {
        Self(tag)
    }

    /// Retrieves the character backing the tag.
    #[must_use]
    pub const fn get(&self) -> char {
        self.0
    }

    /// Reports whether the tag is the empty-cell marker.
    #[must_use]
    pub const fn is_empty_marker(&self) -> bool {
        self.0 == Self::EMPTY.0
    }
}

impl fmt::Display for SpriteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Stable handle identifying a sprite for its whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(u32);

impl SpriteId {
    /// Creates a new sprite handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Converts signed coordinates into a cell when they fall inside the grid.
    #[must_use]
    pub fn checked(x: i64, y: i64, columns: u32, rows: u32) -> Option<Self> {
        let column = u32::try_from(x).ok()?;
        let row = u32::try_from(y).ok()?;
        (column < columns && row < rows).then_some(Self { column, row })
    }

    /// Offsets the cell by a delta, returning `None` when the result leaves the grid.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32, columns: u32, rows: u32) -> Option<Self> {
        Self::checked(
            i64::from(self.column) + i64::from(dx),
            i64::from(self.row) + i64::from(dy),
            columns,
            rows,
        )
    }
}

/// Ordered legend entry pairing a type tag with its opaque kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Tag used by sprites and map text.
    #[serde(rename = "type")]
    pub tag: SpriteType,
    /// Opaque payload handed to renderers, typically bitmap text.
    pub kind: String,
}

impl LegendEntry {
    /// Creates a legend entry.
    #[must_use]
    pub fn new(tag: SpriteType, kind: impl Into<String>) -> Self {
        Self {
            tag,
            kind: kind.into(),
        }
    }
}

/// Immutable representation of a single sprite's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteSnapshot {
    /// Handle of the sprite.
    pub id: SpriteId,
    /// Type tag of the sprite.
    pub kind: SpriteType,
    /// Cell currently occupied by the sprite.
    pub cell: CellCoord,
    /// Column delta of the last successful horizontal move request.
    pub pending_dx: i32,
    /// Row delta of the last successful vertical move request.
    pub pending_dy: i32,
}

/// Colour expressed as byte RGBA components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    red: u8,
    green: u8,
    blue: u8,
    alpha: u8,
}

impl Rgba {
    /// Creates a colour from byte RGBA components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Alpha component of the color.
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Returns the colour with its RGB replaced and alpha preserved.
    #[must_use]
    pub const fn with_rgb(self, red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, self.alpha)
    }
}

/// Optional placement and colour overrides for a text line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOptions {
    /// Column of the first character; centred when absent.
    pub x: Option<i32>,
    /// Row of the line; zero when absent.
    pub y: Option<i32>,
    /// Palette key of the text colour.
    pub color: Option<char>,
}

/// Line of text resolved against the palette.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSnapshot {
    /// Column of the first character.
    pub x: i32,
    /// Row of the line.
    pub y: i32,
    /// Colour currently assigned to the line's palette key.
    pub color: Rgba,
    /// Text content.
    pub content: String,
}
