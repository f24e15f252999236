//! Colour palette and text layer owned by the world.

use tilepush_core::{EngineError, Rgba, TextOptions, TextSnapshot, DEFAULT_TEXT_COLOR, TEXT_COLUMNS};

const BUILTIN_COLORS: [(char, Rgba); 16] = [
    ('0', Rgba::new(0, 0, 0, 255)),
    ('L', Rgba::new(73, 80, 87, 255)),
    ('1', Rgba::new(145, 151, 156, 255)),
    ('2', Rgba::new(248, 249, 250, 255)),
    ('3', Rgba::new(235, 44, 71, 255)),
    ('C', Rgba::new(139, 65, 46, 255)),
    ('7', Rgba::new(25, 177, 248, 255)),
    ('5', Rgba::new(19, 21, 224, 255)),
    ('6', Rgba::new(254, 230, 16, 255)),
    ('F', Rgba::new(149, 140, 50, 255)),
    ('4', Rgba::new(45, 225, 62, 255)),
    ('D', Rgba::new(29, 148, 16, 255)),
    ('8', Rgba::new(245, 109, 187, 255)),
    ('H', Rgba::new(170, 58, 197, 255)),
    ('9', Rgba::new(245, 113, 23, 255)),
    ('.', Rgba::new(0, 0, 0, 0)),
];

/// Named colours, keyed by single characters.
#[derive(Clone, Debug)]
pub(crate) struct Palette {
    colors: Vec<(char, Rgba)>,
}

impl Palette {
    pub(crate) fn new() -> Self {
        Self {
            colors: BUILTIN_COLORS.to_vec(),
        }
    }

    pub(crate) fn get(&self, key: char) -> Option<Rgba> {
        self.colors
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, color)| *color)
    }

    /// Rewrites the RGB components of a colour, keeping its alpha.
    pub(crate) fn set_rgb(&mut self, key: char, red: u8, green: u8, blue: u8) -> Result<(), EngineError> {
        let (_, color) = self
            .colors
            .iter_mut()
            .find(|(candidate, _)| *candidate == key)
            .ok_or(EngineError::UnknownColor(key))?;
        *color = color.with_rgb(red, green, blue);
        Ok(())
    }

    pub(crate) fn entries(&self) -> &[(char, Rgba)] {
        &self.colors
    }
}

/// Text line as stored; colour resolution is deferred to query time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TextLine {
    x: i32,
    y: i32,
    color: char,
    content: String,
}

impl TextLine {
    /// Applies default placement and colour to the provided options.
    pub(crate) fn new(content: String, options: TextOptions, palette: &Palette) -> Self {
        let length = i32::try_from(content.chars().count()).unwrap_or(i32::MAX);
        let centred = (TEXT_COLUMNS - length).div_euclid(2);
        let color = options
            .color
            .filter(|key| palette.get(*key).is_some())
            .unwrap_or(DEFAULT_TEXT_COLOR);

        Self {
            x: options.x.unwrap_or(centred),
            y: options.y.unwrap_or(0),
            color,
            content,
        }
    }

    pub(crate) fn resolve(&self, palette: &Palette) -> TextSnapshot {
        TextSnapshot {
            x: self.x,
            y: self.y,
            color: palette.get(self.color).unwrap_or_default(),
            content: self.content.clone(),
        }
    }
}
