use std::fmt::{Debug, Display, Formatter};

/// The cell variant.
///
/// A cell can either be empty or contain a mine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CellVariant {
    /// Represents an empty cell. The empty cell is one that doesn't contain a mine.
    ///
    /// The parameter represents the amount of mines around the cell.
    Empty(u8),
    /// Represents a mined cell.
    Mine,
}

/// The cell's state.
///
/// A cell can either be open or closed. When closed, it can also either be or not be flagged.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CellState {
    /// Represents a closed cell.
    ///
    /// The boolean value indicates whether the cell's flagged (`true`) or not (`false`).
    Closed(bool),
    /// Represents an open cell.
    Open,
}

/// A single cell of the field: what it hides (a mine or the number of mines around it) and whether the player has
/// opened or flagged it.
///
/// The cell doesn't know its own position, the field addresses it by index.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    variant: CellVariant,
    state: CellState,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new()
    }
}

impl Cell {
    /// Creates a new closed un-flagged empty `Cell` instance.
    pub fn new() -> Self {
        Cell {
            variant: CellVariant::Empty(0),
            state: CellState::Closed(false),
        }
    }

    /// Checks whether the cell is mined.
    pub fn is_mined(&self) -> bool {
        self.variant == CellVariant::Mine
    }

    /// Puts a mine into the cell. Returns `false` if the cell was mined already.
    pub fn mine(&mut self) -> bool {
        let was_mined = self.is_mined();
        self.variant = CellVariant::Mine;

        !was_mined
    }

    /// Returns the amount of mines around the cell or `None` if the cell itself is mined.
    pub fn get_mines_around_amount(&self) -> Option<u8> {
        if let CellVariant::Empty(adjacent_mines_amount) = self.variant {
            Some(adjacent_mines_amount)
        } else {
            None
        }
    }

    /// Stores the number of mines around the cell.
    ///
    /// Won't produce any effect if the cell itself is mined.
    pub fn set_mines_around_amount(&mut self, adjacent_mines_amount: u8) {
        if let CellVariant::Empty(_) = self.variant {
            self.variant = CellVariant::Empty(adjacent_mines_amount);
        }
    }

    /// Checks whether the cell is open.
    pub fn is_open(&self) -> bool {
        self.state == CellState::Open
    }

    /// Opens the cell. Opening drops the flag (if any); re-opening an open cell changes nothing.
    pub fn open(&mut self) {
        self.state = CellState::Open;
    }

    /// Check whether the cell is flagged.
    pub fn is_flagged(&self) -> bool {
        if let CellState::Closed(is_flagged) = self.state {
            is_flagged
        } else {
            false
        }
    }

    /// Toggles the flag of the cell. Returns whether the flag was actually toggled.
    ///
    /// Won't produce any effect if the cell itself is open.
    pub fn toggle_flag(&mut self) -> bool {
        if let CellState::Closed(is_flagged) = self.state {
            self.state = CellState::Closed(!is_flagged);
            true
        } else {
            false
        }
    }
}

/// The `Debug` implementation shows what the cell hides regardless of its state (flags are still shown).
impl Debug for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let CellState::Closed(true) = self.state {
            return write!(f, "F");
        }

        match self.variant {
            CellVariant::Empty(0) => write!(f, "."),
            CellVariant::Empty(n) => write!(f, "{n}"),
            CellVariant::Mine => write!(f, "*"),
        }
    }
}

/// The `Display` implementation represents the cell the way the player sees it.
impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.state {
            CellState::Closed(true) => write!(f, "F"),
            CellState::Closed(false) => write!(f, "#"),
            CellState::Open => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Cell, CellState, CellVariant};

    #[test]
    fn new_creates_a_closed_unflagged_empty_cell() {
        assert_eq!(
            Cell::new(),
            Cell {
                variant: CellVariant::Empty(0),
                state: CellState::Closed(false),
            }
        );
    }

    #[test]
    fn mine_reports_whether_the_cell_was_free() {
        let mut cell = Cell::new();

        assert!(cell.mine());
        assert!(cell.is_mined());
        assert!(!cell.mine());
        assert!(cell.is_mined());
    }

    #[test]
    fn mines_around_amount_is_none_for_a_mine() {
        let mut cell = Cell::new();
        cell.mine();
        cell.set_mines_around_amount(3);

        assert_eq!(cell.get_mines_around_amount(), None);
    }

    #[test]
    fn mines_around_amount_is_stored_for_an_empty_cell() {
        let mut cell = Cell::new();
        cell.set_mines_around_amount(3);

        assert_eq!(cell.get_mines_around_amount(), Some(3));
    }

    #[test]
    fn toggle_flag_correctly_toggles_the_flag() {
        let mut cell = Cell::new();
        assert!(!cell.is_flagged());

        assert!(cell.toggle_flag());
        assert!(cell.is_flagged());

        assert!(cell.toggle_flag());
        assert!(!cell.is_flagged());
    }

    #[test]
    fn toggle_flag_does_not_do_anything_for_open_cells() {
        let mut cell = Cell::new();
        cell.open();

        assert!(!cell.toggle_flag());
        assert!(cell.is_open());
        assert!(!cell.is_flagged());
    }

    #[test]
    fn opening_a_flagged_cell_drops_the_flag() {
        let mut cell = Cell::new();
        cell.toggle_flag();
        cell.open();

        assert!(cell.is_open());
        assert!(!cell.is_flagged());
    }

    #[test]
    fn display_hides_closed_cells_and_debug_does_not() {
        let mut cell = Cell::new();
        cell.set_mines_around_amount(2);

        assert_eq!(format!("{cell}"), "#");
        assert_eq!(format!("{cell:?}"), "2");

        cell.open();
        assert_eq!(format!("{cell}"), "2");
    }
}
