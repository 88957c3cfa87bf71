impl<IN, POS> GameApp<IN, POS>
where
    IN: InputProvider,
    POS: PositionSource,
{
    pub fn new(input: IN, position: POS) -> Self {
        Self {
            input,
            position,
            menu: PlayerMenu::new(),
            phase: PhaseState::Select,
            last_pos: Point::default(),
            pending_redraw: true,
            pending_request: None,
            led_update: None,
        }
    }

    /// Run one loop iteration: drain input events, advance the current
    /// phase, and report whether the screen needs redrawing.
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        self.process_inputs(now_ms);
        match self.phase {
            PhaseState::Select => self.tick_select(now_ms),
            PhaseState::Ready { .. } => self.tick_ready(now_ms),
            PhaseState::Play { .. } => self.tick_play(now_ms),
            PhaseState::End { .. } => self.take_redraw(),
        }
    }

    /// Backend round-trip staged by the last tick, if any. The caller
    /// executes it and feeds the outcome to [`Self::apply_response`].
    pub fn take_request(&mut self) -> Option<BackendRequest> {
        self.pending_request.take()
    }

    /// Status-LED color change staged since the last call, if any.
    pub fn take_led_update(&mut self) -> Option<LedColor> {
        self.led_update.take()
    }

    /// Build the current screen and hand it to `f`. Borrowed row labels keep
    /// this allocation-free, hence the callback shape.
    pub fn with_screen<F>(&self, now_ms: u64, f: F)
    where
        F: FnOnce(Screen<'_>),
    {
        match self.phase {
            PhaseState::Select => {
                if self.menu.is_empty() {
                    f(Screen::NoPlayers);
                    return;
                }
                let mut rows = [MenuRowView {
                    name: "",
                    selected: false,
                }; VISIBLE_ROWS];
                let visible = self.menu.visible();
                for (slot, player) in rows.iter_mut().zip(visible) {
                    slot.name = player.name.as_str();
                }
                rows[self.menu.cursor() - self.menu.offset()].selected = true;
                f(Screen::Menu {
                    rows: &rows[..visible.len()],
                });
            }
            PhaseState::Ready { .. } => f(Screen::Idle),
            PhaseState::Play { session, .. } => f(Screen::Play {
                elapsed_ms: now_ms.saturating_sub(session.start_ms),
                player: self.last_pos,
                target: session.game.target,
            }),
            PhaseState::End { elapsed_ms, .. } => f(Screen::EndChoice { elapsed_ms }),
        }
    }

    fn take_redraw(&mut self) -> TickResult {
        if self.pending_redraw {
            self.pending_redraw = false;
            TickResult::RenderRequested
        } else {
            TickResult::NoRender
        }
    }
}
