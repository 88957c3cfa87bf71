impl<IN, POS> GameApp<IN, POS>
where
    IN: InputProvider,
    POS: PositionSource,
{
    fn tick_select(&mut self, now_ms: u64) -> TickResult {
        if self.pending_request.is_none() && self.menu.refresh_due(now_ms) {
            self.pending_request = Some(BackendRequest::ListPlayers);
        }
        self.take_redraw()
    }

    fn tick_ready(&mut self, now_ms: u64) -> TickResult {
        let PhaseState::Ready {
            player,
            next_poll_ms,
        } = self.phase
        else {
            return TickResult::NoRender;
        };
        if self.pending_request.is_none() && now_ms >= next_poll_ms {
            self.pending_request = Some(BackendRequest::PollActiveGame { player });
            self.phase = PhaseState::Ready {
                player,
                next_poll_ms: now_ms + READY_POLL_INTERVAL_MS,
            };
        }
        self.take_redraw()
    }

    fn tick_play(&mut self, now_ms: u64) -> TickResult {
        let PhaseState::Play { player, session } = self.phase else {
            return TickResult::NoRender;
        };
        if let Ok(pos) = self.position.read_position() {
            self.last_pos = pos;
        }

        if let Some(target) = session.game.target
            && (self.last_pos.x - target.x).abs() < ARRIVAL_THRESHOLD
            && (self.last_pos.y - target.y).abs() < ARRIVAL_THRESHOLD
        {
            self.finish_play(player, session, target, now_ms);
        } else {
            // The moving cursor redraws every tick while playing.
            self.pending_redraw = false;
        }
        TickResult::RenderRequested
    }

    fn finish_play(&mut self, player: PlayerId, session: GameSession, target: Point, now_ms: u64) {
        let elapsed_ms = now_ms.saturating_sub(session.start_ms);
        let distance = euclidean_distance(session.start_pos, target);
        info!(
            "target reached: game={} player={} elapsed_ms={}",
            session.game.id, player, elapsed_ms
        );
        self.pending_request = Some(BackendRequest::SubmitResult {
            game: session.game.id,
            time_sec: elapsed_ms as f32 / 1_000.0,
            distance,
        });
        self.led_update = Some(LedColor::Armed);
        self.phase = PhaseState::End { player, elapsed_ms };
        self.pending_redraw = false;
    }

    /// Feed the completion of a backend round-trip back into the machine.
    pub fn apply_response(&mut self, now_ms: u64, response: BackendResponse) {
        match response {
            BackendResponse::Roster(Ok(roster)) => self.apply_roster(now_ms, roster),
            BackendResponse::Roster(Err(err)) => {
                // The stale roster stays on screen; the refresh timer was not
                // advanced, so the next tick retries.
                debug!("player list refresh failed: {:?}", err);
            }
            BackendResponse::Game(result) => self.apply_game(now_ms, result),
            BackendResponse::Submit(Ok(())) => debug!("result submission acknowledged"),
            BackendResponse::Submit(Err(err)) => {
                // Fire-and-forget; a lost result is not retried.
                debug!("result submission failed: {:?}", err);
            }
        }
    }

    fn apply_roster(&mut self, now_ms: u64, roster: PlayerRoster) {
        let changed = self.menu.replace_roster(roster);
        self.menu.mark_refreshed(now_ms);
        if changed && matches!(self.phase, PhaseState::Select) {
            self.pending_redraw = true;
        }
    }

    fn apply_game(&mut self, now_ms: u64, result: Result<Option<ActiveGame>, BackendError>) {
        let PhaseState::Ready { player, .. } = self.phase else {
            return;
        };
        let game = match result {
            Ok(Some(game)) => game,
            // "No game yet" and poll failures both keep polling.
            Ok(None) => return,
            Err(err) => {
                debug!("active-game poll failed: {:?}", err);
                return;
            }
        };

        let start_pos = self.position.read_position().unwrap_or_default();
        self.last_pos = start_pos;
        info!("game {} assigned to player {}; play started", game.id, player);
        self.led_update = Some(LedColor::Active);
        self.phase = PhaseState::Play {
            player,
            session: GameSession {
                game,
                start_ms: now_ms,
                start_pos,
            },
        };
        self.pending_redraw = true;
    }
}
