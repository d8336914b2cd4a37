//! Terminal screen state types for rendering PTY output.
//!
//! A snapshot of one session's emulated screen, extracted from its vt100
//! parser once per frame and consumed by the rendering widget.

/// Terminal screen state for rendering.
#[derive(Debug, Clone)]
pub struct ScreenState {
    /// Rows of the visible screen. Each row is a list of cells.
    pub rows: Vec<ScreenRow>,
    /// Cursor position (row, col).
    pub cursor: (u16, u16),
    /// Whether the cursor is visible.
    pub cursor_visible: bool,
}

/// A row of cells on the screen.
#[derive(Debug, Clone)]
pub struct ScreenRow {
    /// The cells in this row.
    pub cells: Vec<ScreenCell>,
}

/// A single cell on the terminal screen.
#[derive(Debug, Clone)]
pub struct ScreenCell {
    /// The character(s) in this cell.
    pub contents: String,
    /// Foreground color.
    pub fg: TermColor,
    /// Background color.
    pub bg: TermColor,
    /// Text attributes.
    pub attrs: CellAttrs,
}

/// Terminal color representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermColor {
    /// Color type and value.
    pub kind: ColorKind,
}

/// Color kinds supported.
#[derive(Debug, Clone, Copy, Default)]
pub enum ColorKind {
    /// Default terminal color.
    #[default]
    Default,
    /// 256-color palette index.
    Indexed(u8),
    /// 24-bit RGB color.
    Rgb(u8, u8, u8),
}

/// Cell text attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellAttrs {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub inverse: bool,
}

impl TermColor {
    /// Convert from vt100 color.
    pub fn from_vt100(color: vt100::Color) -> Self {
        let kind = match color {
            vt100::Color::Default => ColorKind::Default,
            vt100::Color::Idx(idx) => ColorKind::Indexed(idx),
            vt100::Color::Rgb(r, g, b) => ColorKind::Rgb(r, g, b),
        };
        Self { kind }
    }

    /// Convert to ratatui color for rendering.
    pub fn to_ratatui(&self) -> ratatui::style::Color {
        match self.kind {
            ColorKind::Default => ratatui::style::Color::Reset,
            ColorKind::Indexed(idx) => ratatui::style::Color::Indexed(idx),
            ColorKind::Rgb(r, g, b) => ratatui::style::Color::Rgb(r, g, b),
        }
    }
}

impl CellAttrs {
    /// Convert from vt100 cell.
    pub fn from_vt100_cell(cell: &vt100::Cell) -> Self {
        Self {
            bold: cell.bold(),
            italic: cell.italic(),
            underline: cell.underline(),
            inverse: cell.inverse(),
        }
    }
}

/// Extract the visible screen from a vt100 parser.
pub fn screen_state_from_vt100(parser: &vt100::Parser) -> ScreenState {
    let screen = parser.screen();
    let (rows, cols) = screen.size();

    let mut screen_rows = Vec::with_capacity(rows as usize);

    for row_idx in 0..rows {
        let mut cells = Vec::with_capacity(cols as usize);
        for col_idx in 0..cols {
            let Some(cell) = screen.cell(row_idx, col_idx) else {
                continue;
            };
            cells.push(ScreenCell {
                contents: cell.contents(),
                fg: TermColor::from_vt100(cell.fgcolor()),
                bg: TermColor::from_vt100(cell.bgcolor()),
                attrs: CellAttrs::from_vt100_cell(cell),
            });
        }
        screen_rows.push(ScreenRow { cells });
    }

    let cursor = screen.cursor_position();

    ScreenState {
        rows: screen_rows,
        cursor,
        cursor_visible: !screen.hide_cursor(),
    }
}
