//! Session state machine: player selection, game polling, play, and finish.

use log::{debug, info};

use crate::{
    input::{InputEvent, InputProvider, PositionSource},
    menu::{PlayerMenu, VISIBLE_ROWS},
    render::{LedColor, MenuRowView, Screen},
    session::{
        ActiveGame, BackendError, BackendRequest, BackendResponse, GameSession, PlayerId,
        PlayerRoster, Point, euclidean_distance,
    },
};

/// Active-game poll cadence while armed.
const READY_POLL_INTERVAL_MS: u64 = 1_000;
/// Per-axis proximity that counts as reaching the target.
const ARRIVAL_THRESHOLD: i32 = 3;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum PhaseState {
    /// Browsing the roster; the menu refreshes itself while idle.
    Select,
    /// A player is locked in and the backend is polled for a game.
    Ready { player: PlayerId, next_poll_ms: u64 },
    /// A game is running; the position is tracked every tick.
    Play {
        player: PlayerId,
        session: GameSession,
    },
    /// Result shown; Confirm replays, Down returns to selection.
    End { player: PlayerId, elapsed_ms: u64 },
}

pub struct GameApp<IN, POS>
where
    IN: InputProvider,
    POS: PositionSource,
{
    input: IN,
    position: POS,
    menu: PlayerMenu,
    phase: PhaseState,
    last_pos: Point,
    pending_redraw: bool,
    pending_request: Option<BackendRequest>,
    led_update: Option<LedColor>,
}

include!("view.rs");
include!("input.rs");
include!("runtime.rs");

#[cfg(test)]
mod tests;
