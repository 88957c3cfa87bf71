//! HTTP paths and JSON bodies for the game backend.
//!
//! The payloads are small and flat, so they are written with `core::fmt` and
//! scanned with a shallow key lookup instead of a full JSON stack. Parse
//! failures surface as [`BackendError::Payload`] and never panic.

use core::fmt::Write;

use heapless::String;

use crate::session::{
    ActiveGame, BackendError, GameId, MAX_PLAYERS, Player, PlayerId, PlayerRoster, Point,
};

pub const PLAYERS_PATH: &str = "/players";
pub const PATH_BYTES: usize = 48;
pub const FINISH_BODY_BYTES: usize = 64;

pub fn active_game_path(player: PlayerId) -> String<PATH_BYTES> {
    let mut path = String::new();
    let _ = write!(path, "/games/active/{}", player);
    path
}

pub fn finish_path(game: GameId) -> String<PATH_BYTES> {
    let mut path = String::new();
    let _ = write!(path, "/games/{}/direct-finish", game);
    path
}

/// Body for the direct-finish POST: seconds to three decimals, distance to
/// two, matching what the backend stores.
pub fn finish_body(time_sec: f32, distance: f32) -> String<FINISH_BODY_BYTES> {
    let mut body = String::new();
    let _ = write!(
        body,
        "{{\"time_sec\":{:.3},\"distance\":{:.2}}}",
        time_sec, distance
    );
    body
}

/// Status code from an HTTP response head (`"HTTP/1.1 200 OK"` -> 200).
pub fn response_status(head: &str) -> Option<u16> {
    let mut parts = head.split_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

/// Parse the `GET /players` body, an array of `{id, username}` objects.
///
/// Names longer than the buffer are truncated and players past the roster
/// capacity are dropped; neither is an error.
pub fn parse_players(body: &str) -> Result<PlayerRoster, BackendError> {
    let trimmed = body.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(BackendError::Payload)?;

    let mut roster = PlayerRoster::new();
    let mut rest = inner;
    while let Some(start) = rest.find('{') {
        let end = rest[start..].find('}').ok_or(BackendError::Payload)? + start;
        let object = &rest[start..=end];

        let id = int_field(object, "id").ok_or(BackendError::Payload)?;
        let raw_name = string_field(object, "username").ok_or(BackendError::Payload)?;
        let mut name = String::new();
        for ch in raw_name.chars() {
            if name.push(ch).is_err() {
                break;
            }
        }

        if roster
            .push(Player {
                id: id as PlayerId,
                name,
            })
            .is_err()
        {
            log::debug!("player list truncated to {} entries", MAX_PLAYERS);
            break;
        }
        rest = &rest[end + 1..];
    }
    Ok(roster)
}

/// Parse a 200 body from `GET /games/active/{player}`.
///
/// The game id is mandatory. A missing or partial `targetPoint` leaves the
/// target unresolved instead of failing.
pub fn parse_active_game(body: &str) -> Result<ActiveGame, BackendError> {
    let id = int_field(body, "id").ok_or(BackendError::Payload)?;
    let target = object_field(body, "targetPoint").and_then(|point| {
        let x = int_field(point, "x")?;
        let y = int_field(point, "y")?;
        Some(Point::new(x as i32, y as i32))
    });
    Ok(ActiveGame {
        id: id as GameId,
        target,
    })
}

/// Slice starting at the value of `"key":`, or `None` when absent.
fn value_start<'a>(object: &'a str, key: &str) -> Option<&'a str> {
    let mut pattern: String<24> = String::new();
    let _ = write!(pattern, "\"{}\"", key);
    let at = object.find(pattern.as_str())?;
    let rest = &object[at + pattern.len()..];
    let colon = rest.find(':')?;
    Some(rest[colon + 1..].trim_start())
}

fn int_field(object: &str, key: &str) -> Option<i64> {
    let rest = value_start(object, key)?;
    let mut end = 0;
    for (idx, ch) in rest.char_indices() {
        if (ch == '-' && idx == 0) || ch.is_ascii_digit() {
            end = idx + ch.len_utf8();
        } else {
            break;
        }
    }
    rest[..end].parse().ok()
}

fn string_field<'a>(object: &'a str, key: &str) -> Option<&'a str> {
    // Escapes are not handled; player names are plain text.
    let rest = value_start(object, key)?;
    let rest = rest.strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(&rest[..end])
}

fn object_field<'a>(object: &'a str, key: &str) -> Option<&'a str> {
    let rest = value_start(object, key)?;
    if !rest.starts_with('{') {
        return None;
    }
    let mut depth = 0usize;
    for (idx, ch) in rest.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}
