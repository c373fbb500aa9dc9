pub mod field;

use field::{Field, FieldError};
use rand::Rng;
use std::cmp;
use std::fmt::{Display, Formatter};
use tracing::{debug, info};

/// The enum represents the variants of everything that can possibly go wrong during the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinesweeperError {
    /// This is used when something's wrong with the field. The `FieldError` variant is just a wrapper for the original
    /// [`FieldError`] type. The [`From`] trait is implemented for the `MinesweeperError` to en-wrap with it
    /// `FieldError`s.
    FieldError(FieldError),
    /// The error indicates that the game has already ended, and therefore the requested action could not be performed.
    GameAlreadyEnded,
}

impl From<FieldError> for MinesweeperError {
    fn from(field_error: FieldError) -> Self {
        MinesweeperError::FieldError(field_error)
    }
}

impl Display for MinesweeperError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MinesweeperError::FieldError(field_error) => write!(f, "{field_error}"),
            MinesweeperError::GameAlreadyEnded => write!(f, "the game has already ended"),
        }
    }
}

impl std::error::Error for MinesweeperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MinesweeperError::FieldError(field_error) => Some(field_error),
            MinesweeperError::GameAlreadyEnded => None,
        }
    }
}

/// The status of a game.
///
/// `Won` and `Lost` are final: once reached, the game never leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinesweeperStatus {
    InProgress,
    /// Every mine has been flagged.
    Won,
    /// A mine has been opened.
    Lost,
}

impl MinesweeperStatus {
    pub fn is_over(&self) -> bool {
        *self != MinesweeperStatus::InProgress
    }
}

/// The directions the cursor can be moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

/// Describes all the possible actions a user can take. The cell actions apply to the cell under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinesweeperAction {
    /// Move the cursor by one cell.
    MoveCursor(Direction),
    /// Open the selected cell.
    OpenCell,
    /// Toggle the flag of the selected cell.
    FlagCell,
}

/// What a frontend should draw for a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub is_cursor: bool,
    pub content: CellContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellContent {
    Closed,
    Flagged,
    /// An open cell without mines around it.
    Empty,
    /// An open cell with the given number (1 to 8) of mines around it.
    Number(u8),
    /// An open mine, i.e. the one that ended the game.
    Mine,
    /// A mine nobody found. Only shown once the game is lost.
    MissedMine,
    /// A flag placed on a cell without a mine. Only shown once the game is lost.
    WrongFlag,
}

/// The struct representing a Minesweeper game itself: the field, the cursor and the status.
#[derive(Debug, Clone)]
pub struct Minesweeper {
    /// The field used in the game.
    field: Field,
    /// The currently selected cell, `(row_index, column_index)`. Always within the field.
    cursor_position: (u8, u8),
    /// The game status.
    status: MinesweeperStatus,
}

impl Minesweeper {
    /// Starts a new game on a field with randomly placed mines taken from the provided source of randomness.
    pub fn new<R: Rng + ?Sized>(
        rows_amount: u8,
        columns_amount: u8,
        mines_amount: u16,
        rng: &mut R,
    ) -> Result<Self, MinesweeperError> {
        let field = Field::new(rows_amount, columns_amount, mines_amount, rng)?;

        Ok(Minesweeper::from_field(field))
    }

    /// Starts a new game with the mines at the given `(row_index, column_index)` positions.
    pub fn with_mines(
        rows_amount: u8,
        columns_amount: u8,
        mines_positions: &[(u8, u8)],
    ) -> Result<Self, MinesweeperError> {
        let field = Field::with_mines(rows_amount, columns_amount, mines_positions)?;

        Ok(Minesweeper::from_field(field))
    }

    fn from_field(field: Field) -> Self {
        let (rows_amount, columns_amount, _) = field.get_size();
        info!(
            rows = rows_amount,
            columns = columns_amount,
            mines = field.get_mines_amount(),
            "new game"
        );

        Minesweeper {
            field,
            cursor_position: (0, 0),
            status: MinesweeperStatus::InProgress,
        }
    }

    /// The method performs the requested action and returns the (possibly updated) status of the game.
    ///
    /// Moving the cursor is always allowed, so that the field can be inspected after the game has ended. Opening and
    /// flagging fail with [`MinesweeperError::GameAlreadyEnded`] once the game is over.
    pub fn take_action(
        &mut self,
        action: MinesweeperAction,
    ) -> Result<&MinesweeperStatus, MinesweeperError> {
        debug!(?action, cursor = ?self.cursor_position, "taking action");

        match action {
            MinesweeperAction::MoveCursor(direction) => {
                self.move_cursor(direction);
                Ok(&self.status)
            }
            MinesweeperAction::OpenCell => self.open_cell(self.cursor_position),
            MinesweeperAction::FlagCell => self.toggle_flag(self.cursor_position),
        }
    }

    /// Opens the cell at the given position.
    ///
    /// Opening a mine loses the game right away and opens nothing but that mine. Opening an empty cell opens it (and,
    /// if there are no mines around it, the whole surrounding region, see [`Field::open_cell`]). Open and flagged cells
    /// are left as they are.
    pub fn open_cell(&mut self, position: (u8, u8)) -> Result<&MinesweeperStatus, MinesweeperError> {
        self.ensure_in_progress()?;

        let cell = self
            .field
            .get_cell(position)
            .ok_or(FieldError::InvalidCellPosition(position))?;

        if cell.is_flagged() || cell.is_open() {
            return Ok(&self.status);
        }

        let is_mined = cell.is_mined();
        self.field.open_cell(position);

        if is_mined {
            self.end(MinesweeperStatus::Lost);
        }

        Ok(&self.status)
    }

    /// Toggles the flag of the cell at the given position (open cells can't be flagged) and wins the game if every
    /// mine is flagged afterwards. Flags on cells without mines don't prevent a victory.
    pub fn toggle_flag(&mut self, position: (u8, u8)) -> Result<&MinesweeperStatus, MinesweeperError> {
        self.ensure_in_progress()?;

        if !self.field.contains(position) {
            return Err(FieldError::InvalidCellPosition(position).into());
        }

        if self.field.toggle_cell_flag(position) && self.field.check_all_mines_flagged() {
            self.end(MinesweeperStatus::Won);
        }

        Ok(&self.status)
    }

    /// Moves the cursor by one cell. The cursor stops at the field's edges.
    pub fn move_cursor(&mut self, direction: Direction) {
        let (rows_amount, columns_amount, _) = self.field.get_size();
        let (row_index, column_index) = self.cursor_position;

        self.cursor_position = match direction {
            Direction::Up => (row_index.saturating_sub(1), column_index),
            Direction::Left => (row_index, column_index.saturating_sub(1)),
            Direction::Down => (cmp::min(row_index + 1, rows_amount - 1), column_index),
            Direction::Right => (row_index, cmp::min(column_index + 1, columns_amount - 1)),
        };
    }

    fn ensure_in_progress(&self) -> Result<(), MinesweeperError> {
        if self.status.is_over() {
            Err(MinesweeperError::GameAlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn end(&mut self, status: MinesweeperStatus) {
        info!(
            ?status,
            open_cells = self.field.get_open_cells_amount(),
            flags = self.field.get_flagged_cells_amount(),
            "game over"
        );

        self.status = status;
    }

    pub fn get_status(&self) -> &MinesweeperStatus {
        &self.status
    }

    pub fn get_field(&self) -> &Field {
        &self.field
    }

    pub fn get_cursor_position(&self) -> (u8, u8) {
        self.cursor_position
    }

    /// The number of mines minus the number of placed flags. Goes negative when there are more flags than mines.
    pub fn get_remaining_flags(&self) -> i32 {
        self.field.get_mines_amount() as i32 - self.field.get_flagged_cells_amount() as i32
    }

    /// Describes how the cell at the given position should be shown, or returns [`None`] if there's no such cell.
    ///
    /// While the game is in progress, closed cells hide their contents. After a victory every closed cell shows what's
    /// inside; after a loss the missed mines and the wrong flags are revealed.
    pub fn get_cell_view(&self, position: (u8, u8)) -> Option<CellView> {
        let cell = self.field.get_cell(position)?;

        let revealed = |cell: &field::cell::Cell| match cell.get_mines_around_amount() {
            None => CellContent::Mine,
            Some(0) => CellContent::Empty,
            Some(n) => CellContent::Number(n),
        };

        let content = match (self.status, cell.is_open(), cell.is_flagged()) {
            (_, true, _) => revealed(cell),
            (MinesweeperStatus::Lost, false, true) if !cell.is_mined() => CellContent::WrongFlag,
            (MinesweeperStatus::Lost, false, false) if cell.is_mined() => CellContent::MissedMine,
            (_, false, true) => CellContent::Flagged,
            (MinesweeperStatus::Won, false, false) => revealed(cell),
            (_, false, false) => CellContent::Closed,
        };

        Some(CellView {
            is_cursor: position == self.cursor_position,
            content,
        })
    }
}
