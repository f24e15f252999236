use anyhow::{bail, Result};

/// Single step of a replayed move script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Up,
    Left,
    Down,
    Right,
}

impl Step {
    /// Column and row delta requested by the step.
    pub(crate) const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Left => (-1, 0),
            Self::Down => (0, 1),
            Self::Right => (1, 0),
        }
    }
}

/// Parses a script of `w`, `a`, `s` and `d` keys; whitespace is ignored.
pub(crate) fn parse(script: &str) -> Result<Vec<Step>> {
    script
        .chars()
        .filter(|key| !key.is_whitespace())
        .enumerate()
        .map(|(index, key)| match key.to_ascii_lowercase() {
            'w' => Ok(Step::Up),
            'a' => Ok(Step::Left),
            's' => Ok(Step::Down),
            'd' => Ok(Step::Right),
            other => bail!("unrecognised move {other:?} at step {index}"),
        })
        .collect()
}
