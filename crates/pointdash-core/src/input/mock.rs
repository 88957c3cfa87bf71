use super::{InputEvent, InputProvider, PositionSource};
use crate::session::Point;

/// No-hardware input source used during bring-up.
#[derive(Default, Debug, Clone, Copy)]
pub struct MockInput;

impl MockInput {
    pub const fn new() -> Self {
        Self
    }
}

impl InputProvider for MockInput {
    type Error = core::convert::Infallible;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        Ok(None)
    }
}

/// Position source pinned to one point, for bring-up and tests.
#[derive(Default, Debug, Clone, Copy)]
pub struct FixedPosition(pub Point);

impl PositionSource for FixedPosition {
    type Error = core::convert::Infallible;

    fn read_position(&mut self) -> Result<Point, Self::Error> {
        Ok(self.0)
    }
}
