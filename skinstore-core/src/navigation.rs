//! Carousel navigation driven by wheel and keyboard input.
//!
//! Input never touches the carousel directly: a [`WheelSignal`] or key name
//! is translated into a [`NavCommand`], which is then applied to anything
//! implementing [`Navigator`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavCommand {
    Advance,
    Retreat,
}

/// Vertical scroll delta from a wheel or trackpad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelSignal {
    pub delta_y: f64,
}

impl WheelSignal {
    #[must_use]
    pub const fn new(delta_y: f64) -> Self {
        Self { delta_y }
    }

    /// Scrolling down advances, scrolling up retreats.
    #[must_use]
    pub fn command(self) -> Option<NavCommand> {
        if self.delta_y > 0.0 {
            Some(NavCommand::Advance)
        } else if self.delta_y < 0.0 {
            Some(NavCommand::Retreat)
        } else {
            None
        }
    }
}

// Maps KeyboardEvent.key values; anything else is ignored
#[must_use]
pub fn key_to_command(key: &str) -> Option<NavCommand> {
    match key {
        "ArrowRight" | "ArrowDown" | "PageDown" => Some(NavCommand::Advance),
        "ArrowLeft" | "ArrowUp" | "PageUp" => Some(NavCommand::Retreat),
        _ => None,
    }
}

pub trait Navigator {
    fn advance(&mut self);
    fn retreat(&mut self);

    fn apply(&mut self, command: NavCommand) {
        match command {
            NavCommand::Advance => self.advance(),
            NavCommand::Retreat => self.retreat(),
        }
    }
}

/// Position within a fixed-length carousel that wraps at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CarouselCursor {
    len: usize,
    index: usize,
}

impl CarouselCursor {
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self { len, index: 0 }
    }

    /// Cursor at `index`, clamped to the last slot.
    #[must_use]
    pub const fn at(len: usize, index: usize) -> Self {
        let index = if len == 0 {
            0
        } else if index >= len {
            len - 1
        } else {
            index
        };
        Self { len, index }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index `offset` slots away from the current one, wrapping.
    #[must_use]
    pub fn offset(&self, offset: isize) -> usize {
        if self.len == 0 {
            return 0;
        }
        let len = self.len.cast_signed();
        let index = self.index.cast_signed();
        (index + offset).rem_euclid(len).cast_unsigned()
    }

    /// Indices of the visible window centered on the cursor.
    #[must_use]
    pub fn window(&self, visible: usize) -> Vec<usize> {
        if self.len == 0 {
            return Vec::new();
        }
        let visible = visible.min(self.len);
        let before = (visible / 2).cast_signed();
        (0..visible)
            .map(|i| self.offset(i.cast_signed() - before))
            .collect()
    }
}

impl Navigator for CarouselCursor {
    fn advance(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    fn retreat(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }
}

/// Feed a wheel signal to a navigator. Returns the command applied so the
/// caller can play its scroll cue.
pub fn handle_wheel<N: Navigator + ?Sized>(
    navigator: &mut N,
    signal: WheelSignal,
) -> Option<NavCommand> {
    let command = signal.command()?;
    navigator.apply(command);
    Some(command)
}
