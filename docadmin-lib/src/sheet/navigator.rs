//! Arrow-key traversal of the edit grid.

use crate::input::{Key, KeyCombo};

/// The interactive element inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellKind {
    /// Single-line text input.
    #[default]
    Input,
    /// Dropdown.
    Select,
    /// Button, e.g. the row delete action.
    Button,
    /// Multi-line text; plain arrows move the caret.
    TextArea,
}

impl CellKind {
    /// Whether focusing this element should select its text.
    pub fn selects_text(&self) -> bool {
        matches!(self, CellKind::Input | CellKind::TextArea)
    }
}

/// A cell position in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPosition {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl CellPosition {
    /// Create a new position.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Where focus should go after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationMove {
    /// Cell to focus.
    pub target: CellPosition,
    /// Select the target's text after focusing.
    pub select_text: bool,
}

/// Grid navigator.
///
/// Up and Down stay within the column. Left and Right wrap across row
/// boundaries. From a text area only Shift+arrow navigates. Moves that would
/// leave the grid are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Navigator {
    rows: usize,
    columns: Vec<CellKind>,
}

impl Navigator {
    /// Navigator for `rows` rows whose cells have the given kinds.
    pub fn new(rows: usize, columns: Vec<CellKind>) -> Self {
        Self { rows, columns }
    }

    /// Row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Kind of the cell at `col`.
    pub fn kind(&self, col: usize) -> Option<CellKind> {
        self.columns.get(col).copied()
    }

    /// Resolve a key press at `from`. `None` leaves focus where it is.
    pub fn navigate(&self, from: CellPosition, combo: KeyCombo) -> Option<NavigationMove> {
        let kind = self.kind(from.col)?;
        if from.row >= self.rows {
            return None;
        }
        if kind == CellKind::TextArea && !combo.modifiers.shift {
            return None;
        }

        let last_row = self.rows - 1;
        let last_col = self.columns.len() - 1;
        let CellPosition { row, col } = from;

        let target = match combo.key {
            Key::Up if row > 0 => CellPosition::new(row - 1, col),
            Key::Down if row < last_row => CellPosition::new(row + 1, col),
            Key::Right if col < last_col => CellPosition::new(row, col + 1),
            Key::Right if row < last_row => CellPosition::new(row + 1, 0),
            Key::Left if col > 0 => CellPosition::new(row, col - 1),
            Key::Left if row > 0 => CellPosition::new(row - 1, last_col),
            _ => return None,
        };

        let select_text = self.kind(target.col).is_some_and(|k| k.selects_text());
        Some(NavigationMove {
            target,
            select_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Navigator {
        Navigator::new(2, vec![CellKind::Input, CellKind::Select, CellKind::Button])
    }

    fn target(nav: &Navigator, row: usize, col: usize, key: Key) -> Option<CellPosition> {
        nav.navigate(CellPosition::new(row, col), KeyCombo::key(key))
            .map(|m| m.target)
    }

    #[test]
    fn test_vertical_bounds() {
        let nav = grid();
        assert_eq!(target(&nav, 0, 1, Key::Down), Some(CellPosition::new(1, 1)));
        assert_eq!(target(&nav, 1, 1, Key::Down), None);
        assert_eq!(target(&nav, 0, 1, Key::Up), None);
    }

    #[test]
    fn test_horizontal_wrap() {
        let nav = grid();
        assert_eq!(target(&nav, 1, 0, Key::Left), Some(CellPosition::new(0, 2)));
        assert_eq!(target(&nav, 0, 0, Key::Left), None);
        assert_eq!(target(&nav, 1, 2, Key::Right), None);
    }

    #[test]
    fn test_textarea_needs_shift() {
        let nav = Navigator::new(2, vec![CellKind::TextArea, CellKind::Input]);
        let at = CellPosition::new(0, 0);
        assert_eq!(nav.navigate(at, KeyCombo::key(Key::Right)), None);

        let moved = nav.navigate(at, KeyCombo::key(Key::Right).shift()).unwrap();
        assert_eq!(moved.target, CellPosition::new(0, 1));
        assert!(moved.select_text);
    }

    #[test]
    fn test_select_text_only_for_text_cells() {
        let nav = grid();
        let moved = nav
            .navigate(CellPosition::new(0, 0), KeyCombo::key(Key::Right))
            .unwrap();
        assert!(!moved.select_text);
    }

    #[test]
    fn test_other_keys_ignored() {
        let nav = grid();
        assert_eq!(target(&nav, 0, 0, Key::Enter), None);
        assert_eq!(target(&nav, 5, 0, Key::Down), None);
    }
}
