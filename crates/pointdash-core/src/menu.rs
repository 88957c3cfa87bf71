//! Scrollable player menu with a periodic roster refresh timer.

use crate::session::{Player, PlayerRoster};

/// Roster rows that fit on screen at once.
pub const VISIBLE_ROWS: usize = 4;
/// Minimum spacing between roster fetches while idling in the menu.
pub const REFRESH_INTERVAL_MS: u64 = 3_000;

/// Cursor plus scroll window over the player roster.
///
/// Invariant for a non-empty roster:
/// `offset <= cursor <= offset + VISIBLE_ROWS - 1`, with both indices inside
/// the roster. An empty roster pins both to zero.
#[derive(Debug, Default)]
pub struct PlayerMenu {
    roster: PlayerRoster,
    cursor: usize,
    offset: usize,
    last_refresh_ms: Option<u64>,
}

impl PlayerMenu {
    pub const fn new() -> Self {
        Self {
            roster: PlayerRoster::new(),
            cursor: 0,
            offset: 0,
            last_refresh_ms: None,
        }
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Rows inside the current scroll window, top to bottom.
    pub fn visible(&self) -> &[Player] {
        let end = (self.offset + VISIBLE_ROWS).min(self.roster.len());
        &self.roster[self.offset..end]
    }

    pub fn selected(&self) -> Option<&Player> {
        self.roster.get(self.cursor)
    }

    /// True when a roster fetch should be attempted. A menu that has never
    /// fetched is always due.
    pub fn refresh_due(&self, now_ms: u64) -> bool {
        match self.last_refresh_ms {
            Some(last) => now_ms.saturating_sub(last) > REFRESH_INTERVAL_MS,
            None => true,
        }
    }

    /// Record a completed fetch. Only successful fetches call this, so a
    /// failed one retries on the next poll.
    pub fn mark_refreshed(&mut self, now_ms: u64) {
        self.last_refresh_ms = Some(now_ms);
    }

    /// Wholesale roster replacement; returns whether anything changed.
    ///
    /// A structurally equal roster is ignored so an ongoing selection is not
    /// disturbed by the periodic refresh.
    pub fn replace_roster(&mut self, roster: PlayerRoster) -> bool {
        if roster == self.roster {
            return false;
        }
        self.roster = roster;
        self.clamp();
        true
    }

    /// Move the cursor up one row; returns whether it moved.
    pub fn move_up(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.offset = self.offset.min(self.cursor);
        true
    }

    /// Move the cursor down one row, scrolling the window when the cursor
    /// leaves it; returns whether it moved.
    pub fn move_down(&mut self) -> bool {
        if self.roster.is_empty() || self.cursor + 1 >= self.roster.len() {
            return false;
        }
        self.cursor += 1;
        if self.cursor >= self.offset + VISIBLE_ROWS {
            self.offset = self.cursor + 1 - VISIBLE_ROWS;
        }
        true
    }

    fn clamp(&mut self) {
        if self.roster.is_empty() {
            self.cursor = 0;
            self.offset = 0;
            return;
        }
        self.cursor = self.cursor.min(self.roster.len() - 1);
        self.offset = self.offset.min(self.cursor);
    }
}
