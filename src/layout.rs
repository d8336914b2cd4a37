//! Viewport geometry for the stacked two-pane layout.

use ratatui::layout::Rect;

/// The rectangular region of the physical screen assigned to one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub rows: u16,
    pub cols: u16,
    /// This viewport's top line within the physical screen.
    pub origin_row: u16,
}

impl Viewport {
    /// The screen rectangle this viewport occupies.
    pub fn to_rect(self) -> Rect {
        Rect::new(0, self.origin_row, self.cols, self.rows)
    }
}

/// Split the physical screen into two stacked viewports.
///
/// The top pane gets `rows / 2` lines and the bottom pane the remainder, so
/// the two regions partition every physical row with no gap or overlap.
pub fn split_stacked(rows: u16, cols: u16) -> [Viewport; 2] {
    let top = rows / 2;
    let bottom = rows - top;
    [
        Viewport {
            rows: top,
            cols,
            origin_row: 0,
        },
        Viewport {
            rows: bottom,
            cols,
            origin_row: top,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_80x24() {
        let [top, bottom] = split_stacked(24, 80);
        assert_eq!(top, Viewport { rows: 12, cols: 80, origin_row: 0 });
        assert_eq!(bottom, Viewport { rows: 12, cols: 80, origin_row: 12 });
    }

    #[test]
    fn test_split_odd_rows() {
        let [top, bottom] = split_stacked(25, 80);
        assert_eq!(top.rows, 12);
        assert_eq!(bottom.rows, 13);
        assert_eq!(bottom.origin_row, 12);
    }

    #[test]
    fn test_split_partitions_all_rows() {
        for rows in 2..100u16 {
            let [top, bottom] = split_stacked(rows, 132);
            assert_eq!(top.rows + bottom.rows, rows);
            assert_eq!(top.origin_row, 0);
            assert_eq!(bottom.origin_row, top.rows);
            assert_eq!(top.cols, 132);
            assert_eq!(bottom.cols, 132);
        }
    }

    #[test]
    fn test_to_rect() {
        let [_, bottom] = split_stacked(24, 80);
        assert_eq!(bottom.to_rect(), Rect::new(0, 12, 80, 12));
    }
}
