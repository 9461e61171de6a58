//! The caret model: positions, the walker over legal positions, caret containers and
//! the fake caret.

pub mod container;
mod fake_caret;
mod line;
mod position;
pub mod predicates;
pub mod utils;
mod walker;

pub use fake_caret::{FakeCaret, FakeCaretState};
pub use line::{FakeCaretInfo, closest_fake_caret};
pub use position::CaretPosition;
pub use walker::{CaretWalker, Positions};

/// Which way a caret operation travels through the document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn from_forward(forward: bool) -> Self {
        if forward {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    pub fn is_forward(self) -> bool {
        self == Direction::Forward
    }
}
