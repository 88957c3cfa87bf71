use super::*;
use crate::{
    input::{InputEvent, InputProvider, PositionSource},
    render::{LedColor, Screen},
    session::{ActiveGame, BackendError, BackendRequest, BackendResponse, Player, PlayerRoster},
};
use heapless::String as HeaplessString;

struct ScriptedInput<'a> {
    events: &'a [InputEvent],
    cursor: usize,
}

impl<'a> ScriptedInput<'a> {
    const fn new(events: &'a [InputEvent]) -> Self {
        Self { events, cursor: 0 }
    }
}

impl InputProvider for ScriptedInput<'_> {
    type Error = ();

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        let Some(event) = self.events.get(self.cursor).copied() else {
            return Ok(None);
        };
        self.cursor = self.cursor.saturating_add(1);
        Ok(Some(event))
    }
}

struct ScriptedPosition<'a> {
    points: &'a [Point],
    cursor: usize,
}

impl<'a> ScriptedPosition<'a> {
    const fn new(points: &'a [Point]) -> Self {
        Self { points, cursor: 0 }
    }
}

impl PositionSource for ScriptedPosition<'_> {
    type Error = ();

    fn read_position(&mut self) -> Result<Point, Self::Error> {
        // The last point repeats once the script runs out.
        let idx = self.cursor.min(self.points.len().saturating_sub(1));
        let point = *self.points.get(idx).ok_or(())?;
        self.cursor = self.cursor.saturating_add(1);
        Ok(point)
    }
}

fn roster_of(names: &[(u32, &str)]) -> PlayerRoster {
    let mut out = PlayerRoster::new();
    for (id, name) in names {
        let mut owned: HeaplessString<24> = HeaplessString::new();
        owned.push_str(name).unwrap();
        out.push(Player {
            id: *id,
            name: owned,
        })
        .unwrap();
    }
    out
}

fn five_roster() -> PlayerRoster {
    roster_of(&[(1, "Ada"), (2, "Ben"), (3, "Cleo"), (4, "Dan"), (5, "Eve")])
}

type TestApp<'a> = GameApp<ScriptedInput<'a>, ScriptedPosition<'a>>;

// Position scripts outlive the app, so they live in consts rather than
// temporaries.
const ORIGIN: &[Point] = &[Point::new(0, 0)];
const PLAY_START: &[Point] = &[Point::new(30, 40)];
const AT_TARGET: &[Point] = &[Point::new(9, 19)];
const OFF_BY_ONE_AXIS: &[Point] = &[Point::new(10, 23)];

fn app_with<'a>(events: &'a [InputEvent], points: &'a [Point]) -> TestApp<'a> {
    GameApp::new(ScriptedInput::new(events), ScriptedPosition::new(points))
}

fn screen_is_no_players(app: &TestApp<'_>, now_ms: u64) -> bool {
    let mut matched = false;
    app.with_screen(now_ms, |screen| {
        matched = matches!(screen, Screen::NoPlayers);
    });
    matched
}

#[test]
fn boot_requests_roster_and_shows_placeholder() {
    let mut app = app_with(&[], ORIGIN);
    assert_eq!(app.tick(0), TickResult::RenderRequested);
    assert_eq!(app.take_request(), Some(BackendRequest::ListPlayers));
    assert!(screen_is_no_players(&app, 0));
}

#[test]
fn empty_roster_ignores_every_button() {
    let events = [InputEvent::Up, InputEvent::Down, InputEvent::Confirm];
    let mut app = app_with(&events, ORIGIN);
    app.tick(0);
    assert!(app.take_led_update().is_none());
    assert!(screen_is_no_players(&app, 0));
}

#[test]
fn roster_refresh_is_rate_limited_after_success() {
    let mut app = app_with(&[], ORIGIN);
    app.tick(0);
    assert_eq!(app.take_request(), Some(BackendRequest::ListPlayers));
    app.apply_response(50, BackendResponse::Roster(Ok(five_roster())));

    app.tick(60);
    assert_eq!(app.take_request(), None);
    // Exactly one interval after the fetch is still inside the window.
    app.tick(3_050);
    assert_eq!(app.take_request(), None);
    app.tick(3_051);
    assert_eq!(app.take_request(), Some(BackendRequest::ListPlayers));
}

#[test]
fn failed_refresh_retries_on_the_next_tick() {
    let mut app = app_with(&[], ORIGIN);
    app.tick(0);
    assert_eq!(app.take_request(), Some(BackendRequest::ListPlayers));
    app.apply_response(50, BackendResponse::Roster(Err(BackendError::Transport)));

    app.tick(60);
    assert_eq!(app.take_request(), Some(BackendRequest::ListPlayers));
}

#[test]
fn identical_roster_refresh_requests_no_render() {
    let mut app = app_with(&[], ORIGIN);
    app.tick(0);
    app.take_request();
    app.apply_response(0, BackendResponse::Roster(Ok(five_roster())));
    // Drain the redraw triggered by the first roster.
    assert_eq!(app.tick(10), TickResult::RenderRequested);

    app.apply_response(4_000, BackendResponse::Roster(Ok(five_roster())));
    assert_eq!(app.tick(4_010), TickResult::NoRender);
}

#[test]
fn cursor_walks_and_clamps_through_the_menu() {
    let presses = [
        InputEvent::Down,
        InputEvent::Down,
        InputEvent::Down,
        InputEvent::Down,
        InputEvent::Down,
    ];
    let mut app = app_with(&presses, ORIGIN);
    app.apply_response(0, BackendResponse::Roster(Ok(five_roster())));
    app.tick(0);

    let mut selected_name = HeaplessString::<24>::new();
    app.with_screen(0, |screen| {
        let Screen::Menu { rows } = screen else {
            panic!("expected menu screen");
        };
        assert_eq!(rows.len(), 4);
        // Window scrolled once: Ben..Eve with the cursor on the last row.
        assert_eq!(rows[0].name, "Ben");
        assert!(rows[3].selected);
        selected_name.push_str(rows[3].name).unwrap();
    });
    assert_eq!(selected_name.as_str(), "Eve");
}

#[test]
fn confirm_arms_the_session() {
    let mut app = app_with(&[InputEvent::Confirm], ORIGIN);
    app.apply_response(0, BackendResponse::Roster(Ok(five_roster())));
    assert_eq!(app.tick(10), TickResult::RenderRequested);

    assert_eq!(app.take_led_update(), Some(LedColor::Armed));
    let mut idle = false;
    app.with_screen(10, |screen| idle = matches!(screen, Screen::Idle));
    assert!(idle);
}

#[test]
fn armed_session_polls_once_per_second() {
    let mut app = app_with(&[InputEvent::Confirm], ORIGIN);
    app.apply_response(0, BackendResponse::Roster(Ok(five_roster())));
    app.tick(10);

    app.tick(20);
    assert_eq!(
        app.take_request(),
        Some(BackendRequest::PollActiveGame { player: 1 })
    );
    app.apply_response(40, BackendResponse::Game(Ok(None)));

    app.tick(500);
    assert_eq!(app.take_request(), None);
    app.tick(1_050);
    assert_eq!(
        app.take_request(),
        Some(BackendRequest::PollActiveGame { player: 1 })
    );
}

#[test]
fn poll_failures_keep_polling() {
    let mut app = app_with(&[InputEvent::Confirm], ORIGIN);
    app.apply_response(0, BackendResponse::Roster(Ok(five_roster())));
    app.tick(10);
    app.tick(20);
    app.take_request();

    app.apply_response(30, BackendResponse::Game(Err(BackendError::Status)));
    let mut idle = false;
    app.with_screen(30, |screen| idle = matches!(screen, Screen::Idle));
    assert!(idle);

    app.tick(1_100);
    assert_eq!(
        app.take_request(),
        Some(BackendRequest::PollActiveGame { player: 1 })
    );
}

#[test]
fn assigned_game_starts_play_with_sampled_position() {
    let mut app = app_with(&[InputEvent::Confirm], PLAY_START);
    app.apply_response(0, BackendResponse::Roster(Ok(five_roster())));
    app.tick(10);

    app.apply_response(
        2_000,
        BackendResponse::Game(Ok(Some(ActiveGame {
            id: 42,
            target: Some(Point::new(100, 50)),
        }))),
    );
    assert_eq!(app.take_led_update(), Some(LedColor::Active));

    assert_eq!(app.tick(2_500), TickResult::RenderRequested);
    app.with_screen(2_500, |screen| {
        let Screen::Play {
            elapsed_ms,
            player,
            target,
        } = screen
        else {
            panic!("expected play screen");
        };
        assert_eq!(elapsed_ms, 500);
        assert_eq!(player, Point::new(30, 40));
        assert_eq!(target, Some(Point::new(100, 50)));
    });
}

#[test]
fn reaching_the_target_submits_and_shows_the_result() {
    // Position stays at (9, 19); target (10, 20) is within the threshold.
    let mut app = app_with(&[InputEvent::Confirm], AT_TARGET);
    app.apply_response(0, BackendResponse::Roster(Ok(five_roster())));
    app.tick(10);
    app.apply_response(
        1_000,
        BackendResponse::Game(Ok(Some(ActiveGame {
            id: 42,
            target: Some(Point::new(10, 20)),
        }))),
    );

    assert_eq!(app.tick(4_000), TickResult::RenderRequested);
    let Some(BackendRequest::SubmitResult {
        game,
        time_sec,
        distance,
    }) = app.take_request()
    else {
        panic!("expected a result submission");
    };
    assert_eq!(game, 42);
    assert!((time_sec - 3.0).abs() < 1e-6);
    // Start (9,19) to target (10,20) is sqrt(2).
    assert!((distance - 1.414_213_5).abs() < 1e-5);

    assert_eq!(app.take_led_update(), Some(LedColor::Armed));
    app.with_screen(4_000, |screen| {
        let Screen::EndChoice { elapsed_ms } = screen else {
            panic!("expected end screen");
        };
        assert_eq!(elapsed_ms, 3_000);
    });
}

#[test]
fn near_misses_on_one_axis_do_not_finish() {
    // X is close but Y misses by exactly the threshold.
    let mut app = app_with(&[InputEvent::Confirm], OFF_BY_ONE_AXIS);
    app.apply_response(0, BackendResponse::Roster(Ok(five_roster())));
    app.tick(10);
    app.take_request();
    app.apply_response(
        1_000,
        BackendResponse::Game(Ok(Some(ActiveGame {
            id: 42,
            target: Some(Point::new(10, 20)),
        }))),
    );

    app.tick(2_000);
    assert_eq!(app.take_request(), None);
}

#[test]
fn unresolved_target_keeps_playing_forever() {
    let mut app = app_with(&[InputEvent::Confirm], ORIGIN);
    app.apply_response(0, BackendResponse::Roster(Ok(five_roster())));
    app.tick(10);
    app.take_request();
    app.apply_response(
        1_000,
        BackendResponse::Game(Ok(Some(ActiveGame {
            id: 7,
            target: None,
        }))),
    );

    for now_ms in [2_000u64, 60_000, 600_000] {
        assert_eq!(app.tick(now_ms), TickResult::RenderRequested);
        assert_eq!(app.take_request(), None);
    }
}

#[test]
fn play_ignores_buttons() {
    let events = [InputEvent::Confirm, InputEvent::Down, InputEvent::Up];
    let mut app = app_with(&events, ORIGIN);
    app.apply_response(0, BackendResponse::Roster(Ok(five_roster())));
    // Confirm arms; the remaining presses arrive during play and must be
    // swallowed.
    app.tick(10);
    app.apply_response(
        1_000,
        BackendResponse::Game(Ok(Some(ActiveGame {
            id: 7,
            target: Some(Point::new(100, 50)),
        }))),
    );
    app.tick(1_100);

    let mut playing = false;
    app.with_screen(1_100, |screen| playing = matches!(screen, Screen::Play { .. }));
    assert!(playing);
}

fn finished_app<'a>(events: &'a [InputEvent], points: &'a [Point]) -> TestApp<'a> {
    let mut app = app_with(events, points);
    app.apply_response(0, BackendResponse::Roster(Ok(five_roster())));
    app.tick(10);
    app.apply_response(
        1_000,
        BackendResponse::Game(Ok(Some(ActiveGame {
            id: 42,
            target: Some(Point::new(10, 20)),
        }))),
    );
    app.tick(4_000);
    app.take_request();
    app.take_led_update();
    app
}

#[test]
fn end_confirm_replays_with_the_same_player() {
    let mut app = finished_app(&[InputEvent::Confirm], AT_TARGET);

    // Inject the replay press directly.
    app.apply_input_event(InputEvent::Confirm, 5_000);
    assert_eq!(app.take_led_update(), Some(LedColor::Armed));
    app.tick(5_010);
    assert_eq!(
        app.take_request(),
        Some(BackendRequest::PollActiveGame { player: 1 })
    );
}

#[test]
fn end_down_returns_to_selection() {
    let mut app = finished_app(&[InputEvent::Confirm], AT_TARGET);

    app.apply_input_event(InputEvent::Down, 5_000);
    let mut menu = false;
    app.with_screen(5_000, |screen| {
        menu = matches!(screen, Screen::Menu { .. });
    });
    assert!(menu);
}

#[test]
fn submit_failure_still_shows_the_result() {
    let mut app = finished_app(&[InputEvent::Confirm], AT_TARGET);

    app.apply_response(4_100, BackendResponse::Submit(Err(BackendError::Transport)));
    let mut ended = false;
    app.with_screen(4_100, |screen| {
        ended = matches!(screen, Screen::EndChoice { .. });
    });
    assert!(ended);
}

#[test]
fn roster_updates_while_armed_do_not_redraw_the_menu() {
    let mut app = app_with(&[InputEvent::Confirm], ORIGIN);
    app.apply_response(0, BackendResponse::Roster(Ok(five_roster())));
    app.tick(10);
    app.tick(20);
    app.take_request();

    app.apply_response(30, BackendResponse::Roster(Ok(roster_of(&[(1, "Ada")]))));
    assert_eq!(app.tick(40), TickResult::NoRender);
}
