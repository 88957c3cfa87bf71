//! Minimal HTTP/1.1 client for the game backend.
//!
//! Every request opens a fresh connection with `Connection: close` and reads
//! the response to EOF, so neither keep-alive nor chunked parsing is needed.
//! Transport, status, and body failures collapse into [`BackendError`]; the
//! state machine decides what each one means for the session.

use core::fmt::Write as _;
use core::net::Ipv4Addr;

use embassy_net::{Stack, tcp::TcpSocket};
use embassy_time::{Duration, WithTimeout};
use heapless::String;
use log::debug;

use pointdash_core::{
    protocol::{self, PLAYERS_PATH},
    session::{ActiveGame, BackendError, BackendRequest, BackendResponse, GameId, PlayerId, PlayerRoster},
};

const REQUEST_BYTES: usize = 256;
const RESPONSE_BYTES: usize = 2_048;
const RX_BUFFER_BYTES: usize = 2_048;
const TX_BUFFER_BYTES: usize = 512;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct BackendClient<'d> {
    stack: Stack<'d>,
    host: Ipv4Addr,
    port: u16,
}

impl<'d> BackendClient<'d> {
    pub const fn new(stack: Stack<'d>, host: Ipv4Addr, port: u16) -> Self {
        Self { stack, host, port }
    }

    /// Execute one staged request. Failures are folded into the response
    /// payload; this never fails the caller.
    pub async fn execute(&mut self, request: &BackendRequest) -> BackendResponse {
        match *request {
            BackendRequest::ListPlayers => BackendResponse::Roster(self.list_players().await),
            BackendRequest::PollActiveGame { player } => {
                BackendResponse::Game(self.poll_active_game(player).await)
            }
            BackendRequest::SubmitResult {
                game,
                time_sec,
                distance,
            } => BackendResponse::Submit(self.submit_result(game, time_sec, distance).await),
        }
    }

    async fn list_players(&mut self) -> Result<PlayerRoster, BackendError> {
        let (status, body) = self.round_trip("GET", PLAYERS_PATH, None).await?;
        if status != 200 {
            debug!("player list returned status {}", status);
            return Err(BackendError::Status);
        }
        protocol::parse_players(&body)
    }

    async fn poll_active_game(
        &mut self,
        player: PlayerId,
    ) -> Result<Option<ActiveGame>, BackendError> {
        let path = protocol::active_game_path(player);
        let (status, body) = self.round_trip("GET", &path, None).await?;
        // Anything but 200 means no game is waiting for this player.
        if status != 200 {
            return Ok(None);
        }
        match protocol::parse_active_game(&body) {
            Ok(game) => Ok(Some(game)),
            Err(err) => {
                debug!("active-game body rejected: {:?}", err);
                Err(err)
            }
        }
    }

    async fn submit_result(
        &mut self,
        game: GameId,
        time_sec: f32,
        distance: f32,
    ) -> Result<(), BackendError> {
        let path = protocol::finish_path(game);
        let body = protocol::finish_body(time_sec, distance);
        let (status, _) = self.round_trip("POST", &path, Some(&body)).await?;
        if status / 100 == 2 {
            Ok(())
        } else {
            debug!("result submission returned status {}", status);
            Err(BackendError::Status)
        }
    }

    async fn round_trip(
        &mut self,
        method: &str,
        path: &str,
        body: Option<&str>,
    ) -> Result<(u16, String<RESPONSE_BYTES>), BackendError> {
        if self.stack.config_v4().is_none() {
            return Err(BackendError::Transport);
        }

        let mut rx_buffer = [0u8; RX_BUFFER_BYTES];
        let mut tx_buffer = [0u8; TX_BUFFER_BYTES];
        let mut socket = TcpSocket::new(self.stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(REQUEST_TIMEOUT));

        socket
            .connect((self.host, self.port))
            .with_timeout(REQUEST_TIMEOUT)
            .await
            .map_err(|_| BackendError::Transport)?
            .map_err(|_| BackendError::Transport)?;

        let mut request: String<REQUEST_BYTES> = String::new();
        let _ = write!(
            request,
            "{} {} HTTP/1.1\r\nHost: {}:{}\r\nConnection: close\r\n",
            method, path, self.host, self.port
        );
        match body {
            Some(body) => {
                let _ = write!(
                    request,
                    "Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                    body.len(),
                    body
                );
            }
            None => {
                let _ = request.push_str("\r\n");
            }
        }

        let mut remaining = request.as_bytes();
        while !remaining.is_empty() {
            let written = socket
                .write(remaining)
                .with_timeout(REQUEST_TIMEOUT)
                .await
                .map_err(|_| BackendError::Transport)?
                .map_err(|_| BackendError::Transport)?;
            if written == 0 {
                return Err(BackendError::Transport);
            }
            remaining = &remaining[written..];
        }

        let mut raw = [0u8; RESPONSE_BYTES];
        let mut total = 0usize;
        while total < raw.len() {
            match socket
                .read(&mut raw[total..])
                .with_timeout(REQUEST_TIMEOUT)
                .await
            {
                Ok(Ok(0)) => break,
                Ok(Ok(read)) => total += read,
                Ok(Err(_)) | Err(_) => return Err(BackendError::Transport),
            }
        }
        socket.close();

        let text = core::str::from_utf8(&raw[..total]).map_err(|_| BackendError::Payload)?;
        let (head, body) = match text.split_once("\r\n\r\n") {
            Some((head, body)) => (head, body),
            None => (text, ""),
        };
        let status = protocol::response_status(head).ok_or(BackendError::Payload)?;

        let mut owned: String<RESPONSE_BYTES> = String::new();
        let _ = owned.push_str(body);
        Ok((status, owned))
    }
}
