use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::session::{CellAttrs, ScreenState, TermColor};

/// Focus marker drawn at the focused pane's top-right corner.
const FOCUS_INDICATOR: &str = "[ACTIVE]";

/// Renders one session's emulated screen at its viewport rectangle.
///
/// Panes are borderless: the two viewports partition the physical rows
/// exactly, and the focus marker is overlaid on the top line instead of
/// spending rows on chrome.
pub struct TerminalPane<'a> {
    screen: &'a ScreenState,
    focused: bool,
}

impl<'a> TerminalPane<'a> {
    pub fn new(screen: &'a ScreenState, focused: bool) -> Self {
        Self { screen, focused }
    }
}

impl Widget for TerminalPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        for (row_idx, screen_row) in self.screen.rows.iter().enumerate() {
            if row_idx as u16 >= area.height {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, cell) in screen_row.cells.iter().enumerate() {
                if col_idx as u16 >= area.width {
                    break;
                }
                let x = area.x + col_idx as u16;

                if !cell.contents.is_empty() {
                    let style = convert_cell_style(&cell.fg, &cell.bg, &cell.attrs);
                    buf.set_string(x, y, &cell.contents, style);
                }
            }
        }

        if self.focused && area.width > FOCUS_INDICATOR.len() as u16 {
            let x = area.x + area.width - FOCUS_INDICATOR.len() as u16;
            buf.set_string(
                x,
                area.y,
                FOCUS_INDICATOR,
                Style::default().add_modifier(Modifier::REVERSED),
            );
        }

        if self.screen.cursor_visible {
            let (cursor_row, cursor_col) = self.screen.cursor;
            let cursor_x = area.x + cursor_col;
            let cursor_y = area.y + cursor_row;

            if cursor_y < area.y + area.height && cursor_x < area.x + area.width {
                let style = if self.focused {
                    Style::default().bg(Color::White).fg(Color::Black)
                } else {
                    Style::default().bg(Color::DarkGray)
                };
                if let Some(cell) = buf.cell_mut((cursor_x, cursor_y)) {
                    cell.set_style(style);
                }
            }
        }
    }
}

fn convert_cell_style(fg: &TermColor, bg: &TermColor, attrs: &CellAttrs) -> Style {
    let mut style = Style::default();

    style = style.fg(fg.to_ratatui());
    style = style.bg(bg.to_ratatui());

    if attrs.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if attrs.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if attrs.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if attrs.inverse {
        style = style.add_modifier(Modifier::REVERSED);
    }

    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::screen_state_from_vt100;

    fn state_with(bytes: &[u8]) -> ScreenState {
        let mut parser = vt100::Parser::new(12, 80, 0);
        parser.process(bytes);
        screen_state_from_vt100(&parser)
    }

    fn symbols(buf: &Buffer, y: u16, x_range: std::ops::Range<u16>) -> String {
        x_range
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_renders_cells_at_viewport_origin() {
        let state = state_with(b"hello");
        let area = Rect::new(0, 12, 80, 12);
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));

        TerminalPane::new(&state, false).render(area, &mut buf);

        assert_eq!(symbols(&buf, 12, 0..5), "hello");
        // Nothing leaks above the pane's origin row.
        assert_eq!(symbols(&buf, 11, 0..5), "     ");
    }

    #[test]
    fn test_focus_indicator_only_on_focused_pane() {
        let state = state_with(b"");
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));

        TerminalPane::new(&state, true).render(Rect::new(0, 0, 80, 12), &mut buf);
        TerminalPane::new(&state, false).render(Rect::new(0, 12, 80, 12), &mut buf);

        assert_eq!(symbols(&buf, 0, 72..80), "[ACTIVE]");
        assert_eq!(symbols(&buf, 12, 72..80), "        ");
    }
}
