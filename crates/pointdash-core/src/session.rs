//! Session data model shared between the state machine and the backend.

use heapless::{String, Vec};

pub type PlayerId = u32;
pub type GameId = u32;

pub const PLAYER_NAME_BYTES: usize = 24;
pub const MAX_PLAYERS: usize = 16;

/// One selectable player, in backend list order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String<PLAYER_NAME_BYTES>,
}

/// Full roster snapshot; refreshes replace it wholesale.
pub type PlayerRoster = Vec<Player, MAX_PLAYERS>;

/// A point in display-pixel coordinates.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Backend-assigned game.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ActiveGame {
    pub id: GameId,
    /// `None` when either target coordinate was absent from the payload; a
    /// game without a resolved target can be played but never completes.
    pub target: Option<Point>,
}

/// State owned by the play phase, captured when the game arrives.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GameSession {
    pub game: ActiveGame,
    pub start_ms: u64,
    pub start_pos: Point,
}

/// Why a backend round-trip failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BackendError {
    /// Connect, read, or write failure, including timeouts.
    Transport,
    /// The server answered with a status the operation does not accept.
    Status,
    /// The response body did not parse.
    Payload,
}

/// One backend round-trip staged by the state machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BackendRequest {
    ListPlayers,
    PollActiveGame {
        player: PlayerId,
    },
    SubmitResult {
        game: GameId,
        time_sec: f32,
        distance: f32,
    },
}

/// Completion of a [`BackendRequest`], fed back into the state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum BackendResponse {
    Roster(Result<PlayerRoster, BackendError>),
    Game(Result<Option<ActiveGame>, BackendError>),
    Submit(Result<(), BackendError>),
}

/// Straight-line distance between two display points.
pub fn euclidean_distance(a: Point, b: Point) -> f32 {
    let dx = (b.x - a.x) as f32;
    let dy = (b.y - a.y) as f32;
    libm::sqrtf(dx * dx + dy * dy)
}
