//! The game renderer functions.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    prelude::Frame,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Block, BorderType, Borders, Clear, Paragraph, Row, Table, Widget,
    },
};
use termsweeper::{CellContent, CellView, MinesweeperStatus};

/// The arrows shown on the field's border when there are more cells above/to the left/below/to the right
/// (respectively). The order matches [`crate::app::Viewport::hidden_sides`].
const ARROW_SYMBOLS: [&str; 4] = [" ↑ ", " ← ", " ↓ ", " → "];
/// The number of terminal columns a single cell occupies.
const CELL_WIDTH: u16 = 3;
/// The rows and columns taken by the borders around the field.
const BORDERS_SIZE: u16 = 2;

const CLOSED_CELL_SYMBOL: &str = " ■ ";
const FLAG_SYMBOL: &str = " F ";
const MINE_SYMBOL: &str = " * ";
const WRONG_FLAG_SYMBOL: &str = " X ";
const FIELD_BORDER_COLOR: Color = Color::Cyan;
const CLOSED_CELL_COLOR: Color = Color::Gray;
const FLAG_COLOR: Color = Color::LightRed;
const INFO_WIDGET_BLOCK_COLOR: Color = Color::Cyan;
const VICTORY_POPUP_BORDER_COLOR: Color = Color::Green;
const LOSS_POPUP_BORDER_COLOR: Color = Color::Red;
const LEAVE_CONFIRMATION_POPUP_BORDER_COLOR: Color = Color::Yellow;
const LEGEND_TEXT_COLOR: Color = Color::DarkGray;

/// The classic colors of the numbers, from 1 to 8.
const NUMBER_COLORS: [Color; 8] = [
    Color::LightBlue,
    Color::Green,
    Color::LightRed,
    Color::Blue,
    Color::Red,
    Color::Cyan,
    Color::Magenta,
    Color::Gray,
];

const LEGEND: [(&str, &str); 4] = [
    ("[↑][←][↓][→] / [w][a][s][d] / [h][j][k][l]", "move the cursor"),
    ("[SPACE] / [ENTER]", "open the selected cell"),
    ("[f]", "toggle flag for the selected cell"),
    ("[q] / [ESC]", "leave"),
];
const VICTORY_POPUP_TEXT: [&str; 5] = [
    "You won! Congratulations!",
    "",
    "Use:",
    "[SPACE] / [ENTER] to start a new game",
    "[q] / [ESC] to leave",
];
const LOSS_POPUP_TEXT: [&str; 5] = [
    "You lost... Wanna try again?",
    "",
    "Use:",
    "[SPACE] / [ENTER] to start a new game",
    "[q] / [ESC] to leave",
];
const LEAVE_CONFIRMATION_POPUP_TEXT: [&str; 6] = [
    "Are you sure you want to quit?",
    "The progress shall not be saved!",
    "",
    "Use:",
    "[SPACE] / [ENTER] - CONFIRM",
    "[q] / [ESC] - CANCEL",
];

pub fn render_game(app: &mut App, frame: &mut Frame) {
    let root_container = frame.size();

    // the layout consists of the field, the stats and the legend, top to bottom
    let [field_container, stats_container, legend_container] = create_app_layout(root_container);

    let (total_rows_amount, total_columns_amount, _) = app.game.get_field().get_size();
    let field_size = (total_rows_amount, total_columns_amount);

    // fit the viewport into whatever is left inside the field's border
    let visible = (
        clamp_to_u8(field_container.height.saturating_sub(BORDERS_SIZE)),
        clamp_to_u8(field_container.width.saturating_sub(BORDERS_SIZE) / CELL_WIDTH),
    );
    app.viewport
        .resize(visible, app.game.get_cursor_position(), field_size);

    // 1. Render the border around the field together with the arrows for the hidden parts
    frame.render_widget(
        build_field_block(app.viewport.hidden_sides(field_size)),
        field_container,
    );

    // 2. Render the visible part of the grid, centered inside the border
    let grid_container = center(
        field_container.inner(&Margin::new(1, 1)),
        app.viewport.visible.1 as u16 * CELL_WIDTH,
        app.viewport.visible.0 as u16,
    );
    frame.render_widget(build_grid_widget(app), grid_container);

    // 3. Render the stats
    let stats_containers = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([33, 34, 33]))
        .split(stats_container);

    let field = app.game.get_field();
    let safe_cells_amount = field.get_size().2 - field.get_mines_amount();

    frame.render_widget(
        build_info_widget("Flags left", app.game.get_remaining_flags().to_string()),
        stats_containers[0],
    );
    frame.render_widget(
        build_info_widget("Mines", field.get_mines_amount().to_string()),
        stats_containers[1],
    );
    frame.render_widget(
        build_info_widget(
            "Open",
            format!("{}/{}", field.get_open_cells_amount(), safe_cells_amount),
        ),
        stats_containers[2],
    );

    // 4. Render the legend
    frame.render_widget(build_legend_widget(), legend_container);

    // 5. Render the outcome popup in case the game has ended
    match app.game.get_status() {
        MinesweeperStatus::Won => render_popup(frame, &VICTORY_POPUP_TEXT, VICTORY_POPUP_BORDER_COLOR),
        MinesweeperStatus::Lost => render_popup(frame, &LOSS_POPUP_TEXT, LOSS_POPUP_BORDER_COLOR),
        MinesweeperStatus::InProgress => {}
    }

    // 6. Render the leave confirmation popup in case the leave has been requested
    if app.awaiting_leave_confirmation {
        render_popup(
            frame,
            &LEAVE_CONFIRMATION_POPUP_TEXT,
            LEAVE_CONFIRMATION_POPUP_BORDER_COLOR,
        );
    }
}

/// Splits the screen into the field, a row of stats and the legend.
fn create_app_layout(container: Rect) -> [Rect; 3] {
    // 2 rows for the borders and one for the contents
    let stats_container_height = 3;
    let legend_container_height = LEGEND.len() as u16;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(BORDERS_SIZE + 1),
            Constraint::Length(stats_container_height),
            Constraint::Length(legend_container_height),
        ])
        .split(container);

    [layout[0], layout[1], layout[2]]
}

fn clamp_to_u8(value: u16) -> u8 {
    value.min(u8::MAX as u16) as u8
}

/// Returns a rectangle of the given size in the middle of the container (cut to the container's size).
fn center(container: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(container.width);
    let height = height.min(container.height);

    Rect::new(
        container.x + (container.width - width) / 2,
        container.y + (container.height - height) / 2,
        width,
        height,
    )
}

/// The border around the field. The arrows are put into the border's titles: up and down in the middle of the top and
/// bottom lines, left and right into the bottom corners.
fn build_field_block(hidden_sides: [bool; 4]) -> Block<'static> {
    let positions = [
        (Alignment::Center, Position::Top),
        (Alignment::Left, Position::Bottom),
        (Alignment::Center, Position::Bottom),
        (Alignment::Right, Position::Bottom),
    ];

    hidden_sides
        .into_iter()
        .zip(ARROW_SYMBOLS.into_iter().zip(positions))
        .filter(|(is_hidden, _)| *is_hidden)
        .fold(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(FIELD_BORDER_COLOR)),
            |block, (_, (symbol, (alignment, position)))| {
                block.title(Title::from(symbol).alignment(alignment).position(position))
            },
        )
}

/// One line per visible row, one span per visible cell.
fn build_grid_widget(app: &App) -> impl Widget {
    let (row_offset, column_offset) = app.viewport.offset;
    let (visible_rows_amount, visible_columns_amount) = app.viewport.visible;

    let lines: Vec<Line> = (row_offset..row_offset.saturating_add(visible_rows_amount))
        .map(|row_index| {
            Line::from(
                (column_offset..column_offset.saturating_add(visible_columns_amount))
                    .filter_map(|column_index| app.game.get_cell_view((row_index, column_index)))
                    .map(build_cell_span)
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    Paragraph::new(lines)
}

/// Picks the symbol and the colors for a single cell. The selected cell is drawn with swapped colors.
fn build_cell_span(view: CellView) -> Span<'static> {
    let (symbol, style) = match view.content {
        CellContent::Closed => (CLOSED_CELL_SYMBOL.to_string(), Style::default().fg(CLOSED_CELL_COLOR)),
        CellContent::Flagged => (
            FLAG_SYMBOL.to_string(),
            Style::default().fg(FLAG_COLOR).add_modifier(Modifier::BOLD),
        ),
        CellContent::Empty => ("   ".to_string(), Style::default()),
        CellContent::Number(n) => (
            format!(" {n} "),
            Style::default()
                .fg(NUMBER_COLORS[(n.clamp(1, 8) - 1) as usize])
                .add_modifier(Modifier::BOLD),
        ),
        CellContent::Mine => (MINE_SYMBOL.to_string(), Style::default().fg(Color::White).bg(Color::Red)),
        CellContent::MissedMine => (MINE_SYMBOL.to_string(), Style::default().fg(Color::White)),
        CellContent::WrongFlag => (WRONG_FLAG_SYMBOL.to_string(), Style::default().fg(Color::Red)),
    };

    let style = if view.is_cursor {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    };

    Span::styled(symbol, style)
}

/// A titled box with a single centered value.
fn build_info_widget(title: &'static str, value: String) -> impl Widget {
    Paragraph::new(value).alignment(Alignment::Center).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(INFO_WIDGET_BLOCK_COLOR)),
    )
}

/// The controls, keys on the left and their meaning on the right.
fn build_legend_widget() -> impl Widget {
    let rows = LEGEND.map(|(keys, description)| {
        Row::new([
            Line::from(keys).alignment(Alignment::Right),
            Line::from(format!(": {description}")).alignment(Alignment::Left),
        ])
    });

    Table::new(rows, Constraint::from_percentages([50, 50])).fg(LEGEND_TEXT_COLOR)
}

/// Renders the lines in a bordered box in the middle of the screen. The box is as wide as the longest line and as tall
/// as the number of lines (plus the borders).
fn render_popup(frame: &mut Frame, lines: &[&str], border_color: Color) {
    let text_width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0) as u16;

    let container = center(
        frame.size(),
        text_width + BORDERS_SIZE,
        lines.len() as u16 + BORDERS_SIZE,
    );

    let popup = Paragraph::new(lines.join("\n"))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color)),
        );

    // clear the region so that the field doesn't shine through
    frame.render_widget(Clear, container);
    frame.render_widget(popup, container);
}

#[cfg(test)]
mod test {
    use super::{build_cell_span, center};
    use ratatui::{layout::Rect, style::Modifier};
    use termsweeper::{CellContent, CellView};

    #[test]
    fn center_puts_the_rectangle_in_the_middle() {
        let container = Rect::new(2, 4, 20, 10);

        assert_eq!(center(container, 6, 4), Rect::new(9, 7, 6, 4));
        assert_eq!(center(container, 50, 50), container);
    }

    #[test]
    fn cells_are_three_columns_wide() {
        let contents = [
            CellContent::Closed,
            CellContent::Flagged,
            CellContent::Empty,
            CellContent::Number(3),
            CellContent::Mine,
            CellContent::MissedMine,
            CellContent::WrongFlag,
        ];

        for content in contents {
            let span = build_cell_span(CellView { is_cursor: false, content });
            assert_eq!(span.width(), 3, "{content:?}");
        }
    }

    #[test]
    fn the_selected_cell_is_reversed() {
        let selected = build_cell_span(CellView { is_cursor: true, content: CellContent::Number(2) });
        let other = build_cell_span(CellView { is_cursor: false, content: CellContent::Number(2) });

        assert_eq!(selected.content, " 2 ");
        assert!(selected.style.add_modifier.contains(Modifier::REVERSED));
        assert!(!other.style.add_modifier.contains(Modifier::REVERSED));
    }
}
