//! Input abstraction layer.

use crate::session::Point;

pub mod mock;

/// Debounced button actions consumed by the game app.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputEvent {
    Up,
    Down,
    Confirm,
}

/// Polled input provider.
pub trait InputProvider {
    type Error;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error>;
}

/// Instantaneous cursor position in display coordinates.
pub trait PositionSource {
    type Error;

    fn read_position(&mut self) -> Result<Point, Self::Error>;
}
