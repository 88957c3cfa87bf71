impl<IN, POS> GameApp<IN, POS>
where
    IN: InputProvider,
    POS: PositionSource,
{
    fn process_inputs(&mut self, now_ms: u64) {
        loop {
            match self.input.poll_event() {
                Ok(Some(event)) => self.apply_input_event(event, now_ms),
                Ok(None) => break,
                Err(_) => {
                    debug!("input provider error; skipping poll");
                    break;
                }
            }
        }
    }

    fn apply_input_event(&mut self, event: InputEvent, now_ms: u64) {
        match self.phase {
            PhaseState::Select => self.apply_select_input(event, now_ms),
            PhaseState::End { player, .. } => self.apply_end_input(player, event, now_ms),
            // Buttons are inert while waiting for or playing a game.
            PhaseState::Ready { .. } | PhaseState::Play { .. } => {}
        }
    }

    fn apply_select_input(&mut self, event: InputEvent, now_ms: u64) {
        if self.menu.is_empty() {
            return;
        }
        match event {
            InputEvent::Up => {
                if self.menu.move_up() {
                    self.pending_redraw = true;
                }
            }
            InputEvent::Down => {
                if self.menu.move_down() {
                    self.pending_redraw = true;
                }
            }
            InputEvent::Confirm => {
                let Some(player) = self.menu.selected() else {
                    return;
                };
                let player = player.id;
                info!("player {} selected; waiting for a game", player);
                self.arm(player, now_ms);
            }
        }
    }

    fn apply_end_input(&mut self, player: PlayerId, event: InputEvent, now_ms: u64) {
        match event {
            InputEvent::Confirm => {
                info!("replay confirmed for player {}", player);
                self.arm(player, now_ms);
            }
            InputEvent::Down => {
                info!("returning to player selection");
                self.phase = PhaseState::Select;
                self.pending_redraw = true;
            }
            InputEvent::Up => {}
        }
    }

    fn arm(&mut self, player: PlayerId, now_ms: u64) {
        self.led_update = Some(LedColor::Armed);
        self.phase = PhaseState::Ready {
            player,
            next_poll_ms: now_ms,
        };
        self.pending_redraw = true;
    }
}
