//! The terminal application

use crate::game_ui::render_game;
use crate::tui::Render;
use crate::update::ControlsSupport;
use rand::rngs::StdRng;
use ratatui::Frame;
use termsweeper::{Direction, Minesweeper, MinesweeperAction, MinesweeperError};
use tracing::info;

/// The terminal application
#[derive(Debug)]
pub struct App {
    /// The game instance.
    pub game: Minesweeper,
    /// The part of the field that's currently on the screen.
    pub viewport: Viewport,
    /// Whether the leave key was pressed during a game and the app now waits for the user to confirm leaving.
    pub awaiting_leave_confirmation: bool,
    /// Indicates that the main application loop should be broken on the next iteration and thus the app should quit.
    pub should_quit: bool,
    /// The mines of every new game are taken from here.
    rng: StdRng,
    mines_amount: u16,
}

impl App {
    pub fn new(
        rows_amount: u8,
        columns_amount: u8,
        mines_amount: u16,
        mut rng: StdRng,
    ) -> Result<App, MinesweeperError> {
        let game = Minesweeper::new(rows_amount, columns_amount, mines_amount, &mut rng)?;

        Ok(App {
            game,
            viewport: Viewport::default(),
            awaiting_leave_confirmation: false,
            should_quit: false,
            rng,
            mines_amount,
        })
    }

    /// Replaces the finished game with a new one of the same size.
    fn restart(&mut self) -> Result<(), MinesweeperError> {
        let (rows_amount, columns_amount, _) = self.game.get_field().get_size();

        info!("restarting");
        self.game = Minesweeper::new(rows_amount, columns_amount, self.mines_amount, &mut self.rng)?;
        self.viewport.follow(self.game.get_cursor_position(), (rows_amount, columns_amount));

        Ok(())
    }

    /// Quit the application altogether.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl ControlsSupport for App {
    fn move_cursor(&mut self, direction: Direction) {
        if self.awaiting_leave_confirmation {
            return;
        }

        self.game.move_cursor(direction);

        let (rows_amount, columns_amount, _) = self.game.get_field().get_size();
        self.viewport
            .follow(self.game.get_cursor_position(), (rows_amount, columns_amount));
    }

    /// Opens the selected cell, or starts a new game if the current one is over, or confirms leaving.
    fn perform_main_action(&mut self) -> Result<(), MinesweeperError> {
        if self.awaiting_leave_confirmation {
            self.quit();
        } else if self.game.get_status().is_over() {
            self.restart()?;
        } else {
            self.game.take_action(MinesweeperAction::OpenCell)?;
        }

        Ok(())
    }

    /// Toggles the flag of the selected cell.
    fn perform_secondary_action(&mut self) -> Result<(), MinesweeperError> {
        if !self.awaiting_leave_confirmation && !self.game.get_status().is_over() {
            self.game.take_action(MinesweeperAction::FlagCell)?;
        }

        Ok(())
    }

    /// Leaves right away when forced or when the game is over. Otherwise asks for a confirmation first, and a second
    /// press cancels the question.
    fn leave(&mut self, force: bool) {
        if force || self.game.get_status().is_over() {
            self.quit();
        } else {
            self.awaiting_leave_confirmation = !self.awaiting_leave_confirmation;
        }
    }
}

impl Render for App {
    fn render(&mut self, frame: &mut Frame) {
        render_game(self, frame);
    }
}

/// The viewport is a sliding window into the field, used when the field is too big to be displayed in the terminal.
///
/// So, for example, for the 5x5 field where there would only be 3 visible rows and 3 visible columns, in order to
/// only display the portion of the field shown below, the `offset` must be `(2, 2)` and `visible` must be `(3, 3)`.
///
/// ```text
/// * * * * *
/// * * * * *
///    _______
/// * *|* * *|
/// * *|* * *|
/// * *|* * *|
///    _______
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// The first visible row and column.
    pub offset: (u8, u8),
    /// The amounts of visible rows and columns.
    pub visible: (u8, u8),
}

impl Viewport {
    /// Changes the amount of visible rows and columns (limited by the field's size) and moves the window so that the
    /// cursor stays on the screen.
    pub fn resize(&mut self, visible: (u8, u8), cursor_position: (u8, u8), field_size: (u8, u8)) {
        self.visible = (visible.0.min(field_size.0), visible.1.min(field_size.1));
        self.follow(cursor_position, field_size);
    }

    /// Moves the window so that the cursor is visible, keeping one more cell beyond the cursor on the screen when
    /// there's room for it.
    pub fn follow(&mut self, cursor_position: (u8, u8), field_size: (u8, u8)) {
        self.offset = (
            follow_axis(self.offset.0, self.visible.0, cursor_position.0, field_size.0),
            follow_axis(self.offset.1, self.visible.1, cursor_position.1, field_size.1),
        );
    }

    /// Whether there are hidden cells above, to the left, below and to the right (in that order).
    pub fn hidden_sides(&self, field_size: (u8, u8)) -> [bool; 4] {
        [
            self.offset.0 > 0,
            self.offset.1 > 0,
            (self.offset.0 as u16 + self.visible.0 as u16) < field_size.0 as u16,
            (self.offset.1 as u16 + self.visible.1 as u16) < field_size.1 as u16,
        ]
    }
}

fn follow_axis(offset: u8, visible: u8, cursor: u8, total: u8) -> u8 {
    if visible == 0 || visible >= total {
        return 0;
    }

    let (offset, visible, cursor) = (offset as u16, visible as u16, cursor as u16);
    let margin = if visible >= 3 { 1 } else { 0 };

    let offset = if cursor < offset + margin {
        cursor.saturating_sub(margin)
    } else if cursor + margin >= offset + visible {
        cursor + margin + 1 - visible
    } else {
        offset
    };

    offset.min(total as u16 - visible) as u8
}
