//! Tagged template constructors for asset literals.
//!
//! Hosts describe maps, bitmaps, colours and tunes as tagged templates. At this
//! layer each constructor simply stitches the template back together; the
//! asset itself is interpreted by whichever collaborator consumes it.

use crate::EngineError;

const UNTAGGED_CALL: &str =
    "tagged template literal must be used like name`text`, instead of name(`text`)";

/// Invocation of an asset constructor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Template<'a> {
    /// Tagged use: literal segments interleaved with interpolated values.
    Tagged {
        /// Literal segments of the template.
        strings: &'a [&'a str],
        /// Values interpolated between consecutive segments.
        values: &'a [&'a str],
    },
    /// Plain call with an already-built string.
    Plain(&'a str),
}

impl<'a> Template<'a> {
    /// Tagged template with a single literal segment and no interpolations.
    #[must_use]
    pub const fn literal(strings: &'a [&'a str]) -> Self {
        Self::Tagged {
            strings,
            values: &[],
        }
    }

    fn render(self) -> Result<String, EngineError> {
        let Self::Tagged { strings, values } = self else {
            return Err(EngineError::Misuse(UNTAGGED_CALL));
        };

        let mut rendered = String::new();
        for (index, segment) in strings.iter().enumerate() {
            rendered.push_str(segment);
            if let Some(value) = values.get(index) {
                rendered.push_str(value);
            }
        }
        Ok(rendered)
    }
}

/// Map text constructor.
pub fn map(template: Template<'_>) -> Result<String, EngineError> {
    template.render()
}

/// Bitmap text constructor.
pub fn bitmap(template: Template<'_>) -> Result<String, EngineError> {
    template.render()
}

/// Colour key constructor.
pub fn color(template: Template<'_>) -> Result<String, EngineError> {
    template.render()
}

/// Tune text constructor.
pub fn tune(template: Template<'_>) -> Result<String, EngineError> {
    template.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolations_are_spliced_between_segments() {
        let rendered = map(Template::Tagged {
            strings: &["p.", "\n..", ""],
            values: &["w", "b"],
        })
        .expect("tagged template renders");
        assert_eq!(rendered, "p.w\n..b");
    }

    #[test]
    fn single_segment_passes_through() {
        let text = "0000\n0..0";
        assert_eq!(bitmap(Template::literal(&[text])), Ok(text.to_owned()));
        assert_eq!(tune(Template::literal(&[""])), Ok(String::new()));
    }

    #[test]
    fn plain_call_is_misuse() {
        let error = color(Template::Plain("3")).expect_err("plain call rejected");
        assert!(matches!(error, EngineError::Misuse(_)));
        assert!(error.to_string().contains("name`text`"));
    }
}
