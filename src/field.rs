pub mod cell;

use cell::Cell;
use rand::Rng;
use std::fmt::{Debug, Display, Formatter};
use tracing::trace;

/// The enum represents all the variants of what can possibly go wrong when working with fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Used when the user tries to create a field with zero rows or zero columns.
    NotEnoughCells,
    /// Used when the required number of mines is more than the total number of cells.
    ///
    /// The value represents the maximum allowed number of mines for the field with the given dimensions.
    InvalidMinesAmount(u16),
    /// Used when a cell position lies beyond the field's bounds.
    ///
    /// The value represents the requested cell's row and column indices respectively.
    InvalidCellPosition((u8, u8)),
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::NotEnoughCells => write!(f, "the field must have at least one row and one column"),
            FieldError::InvalidMinesAmount(max) => {
                write!(f, "the number of mines must be between 0 and {max}")
            }
            FieldError::InvalidCellPosition((row_index, column_index)) => {
                write!(f, "there's no cell at row {row_index}, column {column_index}")
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// The field representation.
///
/// The field is a rectangular grid of cells stored row by row in a flat vector, so that the cell at
/// `(row_index, column_index)` lives at `row_index * columns_amount + column_index`.
#[derive(Clone, PartialEq, Eq)]
pub struct Field {
    cells: Vec<Cell>,
    rows_amount: u8,
    columns_amount: u8,
    /// The total number of mined cells.
    mines_amount: u16,
}

impl Field {
    /// Creates a new [`Field`] with the provided dimensions and randomly distributed mines.
    ///
    /// Mines are placed by picking a uniformly random cell over and over, skipping the already mined ones, until
    /// exactly `mines_amount` distinct cells hold a mine. The numbers of mines around the empty cells are computed
    /// right after that and never change again.
    ///
    /// The method might fail with [`FieldError::NotEnoughCells`] if either of the dimensions is zero or with
    /// [`FieldError::InvalidMinesAmount`] if there are more mines requested than there are cells.
    pub fn new<R: Rng + ?Sized>(
        rows_amount: u8,
        columns_amount: u8,
        mines_amount: u16,
        rng: &mut R,
    ) -> Result<Self, FieldError> {
        let mut field = Field::empty(rows_amount, columns_amount, mines_amount)?;

        field.place_mines(rng);
        field.update_mines_around_values();

        Ok(field)
    }

    /// Creates a new [`Field`] with mines at exactly the given positions. Repeated positions count once.
    ///
    /// Fails with [`FieldError::InvalidCellPosition`] on the first position that's out of the field's bounds.
    pub fn with_mines(
        rows_amount: u8,
        columns_amount: u8,
        mines_positions: &[(u8, u8)],
    ) -> Result<Self, FieldError> {
        let mut field = Field::empty(rows_amount, columns_amount, 0)?;

        for &position in mines_positions {
            let cell = field
                .get_cell_mut(position)
                .ok_or(FieldError::InvalidCellPosition(position))?;

            if cell.mine() {
                field.mines_amount += 1;
            }
        }

        field.update_mines_around_values();

        Ok(field)
    }

    /// Validates the dimensions and the mines amount and creates a field without any mines.
    fn empty(rows_amount: u8, columns_amount: u8, mines_amount: u16) -> Result<Self, FieldError> {
        let cells_amount = rows_amount as u16 * columns_amount as u16;

        if cells_amount == 0 {
            Err(FieldError::NotEnoughCells)
        } else if mines_amount > cells_amount {
            Err(FieldError::InvalidMinesAmount(cells_amount))
        } else {
            Ok(Field {
                cells: vec![Cell::new(); cells_amount as usize],
                rows_amount,
                columns_amount,
                mines_amount,
            })
        }
    }

    /// Rejection sampling: keeps drawing cells until enough distinct ones are mined.
    fn place_mines<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut placed_amount = 0;
        let mut draws_amount = 0u64;

        while placed_amount < self.mines_amount {
            let index = rng.gen_range(0..self.cells.len());
            draws_amount += 1;

            if self.cells[index].mine() {
                placed_amount += 1;
            }
        }

        trace!(mines = placed_amount, draws = draws_amount, "mines placed");
    }

    /// Stores in every empty cell the number of mined cells among its (up to 8) neighbours.
    fn update_mines_around_values(&mut self) {
        for index in 0..self.cells.len() {
            if self.cells[index].is_mined() {
                continue;
            }

            let mines_around_amount = self
                .get_adjacent_cells_positions(self.position_of(index))
                .into_iter()
                .filter(|&position| self.get_cell(position).is_some_and(|cell| cell.is_mined()))
                .count() as u8;

            self.cells[index].set_mines_around_amount(mines_around_amount);
        }
    }

    /// Returns the field's height (the number of rows), width (the number of columns) and the two values multiplied,
    /// which is effectively the total number of cells.
    pub fn get_size(&self) -> (u8, u8, u16) {
        (
            self.rows_amount,
            self.columns_amount,
            self.cells.len() as u16,
        )
    }

    pub fn get_mines_amount(&self) -> u16 {
        self.mines_amount
    }

    /// Checks whether the position lies within the field.
    pub fn contains(&self, (row_index, column_index): (u8, u8)) -> bool {
        row_index < self.rows_amount && column_index < self.columns_amount
    }

    fn index_of(&self, position: (u8, u8)) -> Option<usize> {
        self.contains(position)
            .then(|| position.0 as usize * self.columns_amount as usize + position.1 as usize)
    }

    fn position_of(&self, index: usize) -> (u8, u8) {
        let columns_amount = self.columns_amount as usize;

        ((index / columns_amount) as u8, (index % columns_amount) as u8)
    }

    /// Returns a read-only cell reference by its position or [`None`] if there's no cell at the given position.
    pub fn get_cell(&self, position: (u8, u8)) -> Option<&Cell> {
        self.index_of(position).map(|index| &self.cells[index])
    }

    /// Returns a mutable cell reference by its position or [`None`] if there's no cell at the given position.
    fn get_cell_mut(&mut self, position: (u8, u8)) -> Option<&mut Cell> {
        self.index_of(position).map(|index| &mut self.cells[index])
    }

    /// Returns the positions of the cell's neighbours, row by row. Positions outside of the field are left out, so a
    /// corner cell has 3 neighbours and an edge cell has 5.
    pub fn get_adjacent_cells_positions(&self, (row_index, column_index): (u8, u8)) -> Vec<(u8, u8)> {
        // `i16` to be able to step before the first row/column without overflow.
        let (row_index, column_index) = (row_index as i16, column_index as i16);
        let (rows_amount, columns_amount) = (self.rows_amount as i16, self.columns_amount as i16);

        (row_index - 1..=row_index + 1)
            .flat_map(|r| (column_index - 1..=column_index + 1).map(move |c| (r, c)))
            .filter(|&(r, c)| (r, c) != (row_index, column_index))
            .filter(|&(r, c)| r >= 0 && c >= 0 && r < rows_amount && c < columns_amount)
            .map(|(r, c)| (r as u8, c as u8))
            .collect()
    }

    /// Opens a cell by its position and returns the amount of cells that got opened.
    ///
    /// If the opened cell has no mines around it, all of its neighbours get opened as well, and so on for every such
    /// cell, which opens the whole connected region of empty cells together with its numbered border. The region is
    /// walked with an explicit stack, so the depth doesn't depend on the field's size.
    ///
    /// Open and flagged cells are never (re-)opened. The method doesn't check for mines: a mined target gets opened
    /// alone, and the chain never reaches a mine since no mine borders a cell with zero mines around it.
    pub fn open_cell(&mut self, position: (u8, u8)) -> u16 {
        let mut opened_amount = 0;
        let mut pending_positions = vec![position];

        while let Some(position) = pending_positions.pop() {
            let Some(cell) = self.get_cell_mut(position) else {
                continue;
            };

            if cell.is_open() || cell.is_flagged() {
                continue;
            }

            cell.open();
            opened_amount += 1;

            if let Some(0) = cell.get_mines_around_amount() {
                pending_positions.extend(
                    self.get_adjacent_cells_positions(position)
                        .into_iter()
                        .filter(|&adjacent_position| {
                            self.get_cell(adjacent_position)
                                .is_some_and(|cell| !cell.is_open() && !cell.is_flagged())
                        }),
                );
            }
        }

        trace!(?position, opened = opened_amount, "cells opened");

        opened_amount
    }

    /// Toggles the flag for the cell (if any) with the given position. Returns whether the flag was toggled, which is
    /// not the case for open cells and non-existing positions.
    pub fn toggle_cell_flag(&mut self, position: (u8, u8)) -> bool {
        self.get_cell_mut(position)
            .is_some_and(|cell| cell.toggle_flag())
    }

    /// The method returns the total number of all the currently flagged cells in the field.
    pub fn get_flagged_cells_amount(&self) -> u16 {
        self.cells.iter().filter(|cell| cell.is_flagged()).count() as u16
    }

    /// The number of flags that are placed on mines.
    pub fn get_correctly_flagged_cells_amount(&self) -> u16 {
        self.cells
            .iter()
            .filter(|cell| cell.is_flagged() && cell.is_mined())
            .count() as u16
    }

    pub fn get_open_cells_amount(&self) -> u16 {
        self.cells.iter().filter(|cell| cell.is_open()).count() as u16
    }

    /// Checks that every mine is flagged. Flags on empty cells don't matter.
    ///
    /// This is effectively the win-condition for the game.
    pub fn check_all_mines_flagged(&self) -> bool {
        self.get_correctly_flagged_cells_amount() == self.mines_amount
    }

    fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.columns_amount as usize)
    }
}

/// Shows every cell's contents, closed or not.
impl Debug for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{:?} ", cell)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

/// Shows the field as the player sees it, with the row and column indices along the edges.
impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "    ")?;

        for column_index in 0..self.columns_amount {
            write!(f, "{:^3}", column_index)?;
        }

        writeln!(f)?;

        for (row_index, row) in self.rows().enumerate() {
            write!(f, "{:^4}", row_index)?;

            for cell in row {
                write!(f, "{:^3}", cell.to_string())?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Cell, Field, FieldError};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn create_field_instance_correct_params() {
        let mut rng = StdRng::seed_from_u64(1);
        let field = Field::new(3, 4, 5, &mut rng).unwrap();

        assert_eq!(field.get_size(), (3, 4, 12));
        assert_eq!(field.get_mines_amount(), 5);
        assert!(field.cells.iter().all(|cell| !cell.is_open() && !cell.is_flagged()));
    }

    #[test]
    fn create_field_fails_when_not_enough_cells() {
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(Field::new(0, 5, 0, &mut rng), Err(FieldError::NotEnoughCells));
        assert_eq!(Field::new(5, 0, 0, &mut rng), Err(FieldError::NotEnoughCells));
    }

    #[test]
    fn create_field_fails_when_too_many_mines() {
        let mut rng = StdRng::seed_from_u64(1);
        let field = Field::new(3, 3, 10, &mut rng);

        assert_eq!(field, Err(FieldError::InvalidMinesAmount(9)));
    }

    #[test]
    fn create_field_accepts_no_mines_and_all_mines() {
        let mut rng = StdRng::seed_from_u64(1);

        let empty = Field::new(3, 3, 0, &mut rng).unwrap();
        assert!(empty.cells.iter().all(|cell| cell.get_mines_around_amount() == Some(0)));

        let full = Field::new(3, 3, 9, &mut rng).unwrap();
        assert!(full.cells.iter().all(|cell| cell.is_mined()));
    }

    #[test]
    fn the_field_gets_populated_with_the_exact_amount_of_mines() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let field = Field::new(9, 9, 40, &mut rng).unwrap();

            assert_eq!(field.cells.iter().filter(|cell| cell.is_mined()).count(), 40);
        }
    }

    #[test]
    fn different_seeds_give_different_layouts() {
        let mines_of = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let field = Field::new(16, 16, 40, &mut rng).unwrap();
            field.cells.iter().map(|cell| cell.is_mined()).collect::<Vec<_>>()
        };

        assert_eq!(mines_of(7), mines_of(7));
        assert_ne!(mines_of(7), mines_of(8));
    }

    #[test]
    fn mines_around_values_match_a_brute_force_count() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let field = Field::new(7, 11, 20, &mut rng).unwrap();

            for row_index in 0..7i16 {
                for column_index in 0..11i16 {
                    let cell = field.get_cell((row_index as u8, column_index as u8)).unwrap();

                    if cell.is_mined() {
                        assert_eq!(cell.get_mines_around_amount(), None);
                        continue;
                    }

                    let mut expected = 0;
                    for r in row_index - 1..=row_index + 1 {
                        for c in column_index - 1..=column_index + 1 {
                            if (r, c) == (row_index, column_index) || r < 0 || c < 0 || r >= 7 || c >= 11 {
                                continue;
                            }
                            if field.get_cell((r as u8, c as u8)).unwrap().is_mined() {
                                expected += 1;
                            }
                        }
                    }

                    assert_eq!(cell.get_mines_around_amount(), Some(expected));
                }
            }
        }
    }

    fn create_stub_mined_field(enlarged: bool) -> Field {
        // "mine", "mine", "none"
        // "none", "none", "mine"
        // "none", "none", "none"
        // "none", "none", "none" <- only when enlarged
        let rows_amount = if enlarged { 4 } else { 3 };

        Field::with_mines(rows_amount, 3, &[(0, 0), (0, 1), (1, 2)]).unwrap()
    }

    #[test]
    fn with_mines_places_the_given_mines_only_once() {
        let field = Field::with_mines(3, 3, &[(1, 1), (1, 1), (2, 0)]).unwrap();

        assert_eq!(field.get_mines_amount(), 2);
        assert!(field.get_cell((1, 1)).unwrap().is_mined());
        assert!(field.get_cell((2, 0)).unwrap().is_mined());
    }

    #[test]
    fn with_mines_fails_on_invalid_position() {
        let field = Field::with_mines(3, 3, &[(0, 0), (3, 1)]);

        assert_eq!(field, Err(FieldError::InvalidCellPosition((3, 1))));
    }

    #[test]
    fn mines_around_values_get_computed_correctly() {
        let field = create_stub_mined_field(false);

        let result = field
            .cells
            .iter()
            .map(|cell| cell.get_mines_around_amount())
            .collect::<Vec<Option<u8>>>();

        assert_eq!(
            result,
            [
                None,
                None,
                Some(2),
                Some(2),
                Some(3),
                None,
                Some(0),
                Some(1),
                Some(1)
            ]
        );
    }

    #[test]
    fn get_cell_correctly_finds_the_cell_by_its_position() {
        let field = create_stub_mined_field(true);

        assert_eq!(field.get_cell((1, 2)), Some(&field.cells[5]));
        assert_eq!(field.get_cell((3, 0)), Some(&field.cells[9]));
    }

    #[test]
    fn get_cell_returns_none_for_non_existing_cells() {
        let field = create_stub_mined_field(false);

        assert!(field.get_cell((3, 0)).is_none());
        assert!(field.get_cell((0, 3)).is_none());
    }

    #[test]
    fn adjacent_cells_positions_are_clipped_at_the_edges() {
        let field = create_stub_mined_field(true);

        assert_eq!(field.get_adjacent_cells_positions((0, 0)), vec![(0, 1), (1, 0), (1, 1)]);
        assert_eq!(field.get_adjacent_cells_positions((3, 2)), vec![(2, 1), (2, 2), (3, 1)]);
        assert_eq!(
            field.get_adjacent_cells_positions((1, 0)),
            vec![(0, 0), (0, 1), (1, 1), (2, 0), (2, 1)]
        );
        assert_eq!(field.get_adjacent_cells_positions((1, 1)).len(), 8);
    }

    #[test]
    fn open_cell_opens_only_a_numbered_cell() {
        let mut field = create_stub_mined_field(false);

        assert_eq!(field.open_cell((0, 2)), 1);
        assert!(field.get_cell((0, 2)).unwrap().is_open());
        assert_eq!(field.get_open_cells_amount(), 1);
    }

    #[test]
    fn open_cell_chain_opens_empty_cells() {
        let mut field = create_stub_mined_field(true);
        field.open_cell((2, 0));

        let open_cells_positions = [(1u8, 0u8), (1, 1), (2, 0), (2, 1), (2, 2), (3, 0), (3, 1), (3, 2)];
        let closed_cells_positions = [(0u8, 0u8), (0, 1), (0, 2), (1, 2)];

        // A meta-assertion. Make sure we're not forgetting any cells.
        assert_eq!(
            field.get_size().2,
            (open_cells_positions.len() + closed_cells_positions.len()) as u16
        );

        assert!(open_cells_positions
            .into_iter()
            .all(|position| field.get_cell(position).unwrap().is_open()));
        assert!(closed_cells_positions
            .into_iter()
            .all(|position| !field.get_cell(position).unwrap().is_open()));
    }

    #[test]
    fn open_cell_chain_stops_at_flagged_cells() {
        let mut field = create_stub_mined_field(true);
        field.toggle_cell_flag((3, 2));
        field.open_cell((2, 0));

        let cell = field.get_cell((3, 2)).unwrap();
        assert!(!cell.is_open());
        assert!(cell.is_flagged());
        // (2, 2) is still reached through (3, 1).
        assert!(field.get_cell((2, 2)).unwrap().is_open());
    }

    #[test]
    fn open_cell_on_an_open_cell_is_a_no_op() {
        let mut field = create_stub_mined_field(true);

        assert_eq!(field.open_cell((2, 0)), 8);
        assert_eq!(field.open_cell((2, 0)), 0);
        assert_eq!(field.get_open_cells_amount(), 8);
    }

    #[test]
    fn open_cell_handles_huge_empty_fields() {
        let mut field = Field::with_mines(255, 255, &[]).unwrap();

        assert_eq!(field.open_cell((128, 128)), 255 * 255);
    }

    #[test]
    fn the_chain_never_opens_a_mine() {
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut field = Field::new(12, 12, 15, &mut rng).unwrap();

            let empty_index = field
                .cells
                .iter()
                .position(|cell| cell.get_mines_around_amount() == Some(0));

            if let Some(index) = empty_index {
                field.open_cell(field.position_of(index));
                assert!(field.cells.iter().all(|cell| !(cell.is_open() && cell.is_mined())));
            }
        }
    }

    #[test]
    fn toggle_cell_flag_correctly_toggles_the_flag() {
        let mut field = create_stub_mined_field(false);

        assert!(field.toggle_cell_flag((1, 1)));
        assert!(field.get_cell((1, 1)).unwrap().is_flagged());

        assert!(field.toggle_cell_flag((1, 1)));
        assert!(!field.get_cell((1, 1)).unwrap().is_flagged());
    }

    #[test]
    fn toggle_cell_flag_has_no_effect_on_open_or_missing_cells() {
        let mut field = create_stub_mined_field(false);
        field.open_cell((0, 2));

        assert!(!field.toggle_cell_flag((0, 2)));
        assert!(!field.toggle_cell_flag((5, 5)));
        assert_eq!(field.get_flagged_cells_amount(), 0);
    }

    #[test]
    fn flag_counters_are_computed_correctly() {
        let mut field = create_stub_mined_field(false);

        field.toggle_cell_flag((0, 0));
        field.toggle_cell_flag((0, 1));
        field.toggle_cell_flag((2, 2));

        assert_eq!(field.get_flagged_cells_amount(), 3);
        assert_eq!(field.get_correctly_flagged_cells_amount(), 2);
        assert!(!field.check_all_mines_flagged());

        field.toggle_cell_flag((1, 2));
        assert!(field.check_all_mines_flagged());
    }

    #[test]
    fn display_shows_the_field_as_the_player_sees_it() {
        let mut field = create_stub_mined_field(false);
        field.open_cell((2, 0));
        field.toggle_cell_flag((0, 0));

        let rendered = field.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].split_whitespace().collect::<Vec<_>>(), ["0", "F", "#", "#"]);
        assert_eq!(lines[3].split_whitespace().collect::<Vec<_>>(), ["2", ".", "1", "#"]);
    }

    #[test]
    fn debug_shows_every_cell() {
        let field = create_stub_mined_field(false);

        assert_eq!(format!("{field:?}"), "* * 2 \n2 3 * \n. 1 1 \n");
    }

    #[test]
    fn cells_default_to_closed_and_empty() {
        assert_eq!(Cell::default(), Cell::new());
    }
}
