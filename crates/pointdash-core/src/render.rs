//! App-level view models consumed by the board renderer.

use crate::session::Point;

/// Status LED colors, one per armed/active session state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LedColor {
    /// Violet: a player is selected and the device waits for a game.
    Armed,
    /// Green: a game is in progress.
    Active,
}

/// One visible roster row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MenuRowView<'a> {
    pub name: &'a str,
    pub selected: bool,
}

/// Full-frame view model; the renderer clears, draws, and flushes per screen.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Screen<'a> {
    /// "READY / Click !" prompt while waiting for a game assignment.
    Idle,
    /// Placeholder while the roster is empty.
    NoPlayers,
    /// Scrollable player list; `rows` is the visible window only.
    Menu { rows: &'a [MenuRowView<'a>] },
    /// Live play: elapsed time plus the player and (when resolved) target
    /// pixels.
    Play {
        elapsed_ms: u64,
        player: Point,
        target: Option<Point>,
    },
    /// Final time plus the replay / change-player prompts.
    EndChoice { elapsed_ms: u64 },
}
