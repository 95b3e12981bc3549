use serde::{Deserialize, Serialize};

/// One grid position as the engine stores it.
///
/// `touching_mines` and `touching_flags` are maintained incrementally by the board and always equal the
/// number of mined, respectively flagged, in-bounds neighbours.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub has_mine: bool,
    pub revealed: bool,
    pub flagged: bool,
    pub touching_mines: u8,
    pub touching_flags: u8,
}

/// Copy of a [`Cell`] taken when it changed. Holding one never observes later engine mutations.
pub type CellSnapshot = Cell;

impl Cell {
    pub const fn is_hidden(self) -> bool {
        !self.revealed && !self.flagged
    }

    /// Whether enough neighbours are flagged to satisfy the clue on this cell.
    pub const fn is_satisfied(self) -> bool {
        self.touching_flags >= self.touching_mines
    }

    /// Whether a surrounding reveal would be accepted on this cell.
    pub const fn is_chordable(self) -> bool {
        self.revealed && !self.has_mine && self.touching_mines > 0 && self.is_satisfied()
    }

    /// What a consumer is allowed to show for this cell.
    pub const fn view(self) -> CellView {
        match (self.revealed, self.flagged, self.has_mine) {
            (true, _, true) => CellView::Mine,
            (true, _, false) => CellView::Revealed {
                touching_mines: self.touching_mines,
                satisfied: self.touching_mines > 0 && self.is_satisfied(),
            },
            (false, true, _) => CellView::Flagged,
            (false, false, _) => CellView::Hidden,
        }
    }
}

/// Player-visible projection of a [`CellSnapshot`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed { touching_mines: u8, satisfied: bool },
    Mine,
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revealed_clue_is_satisfied_once_flags_match() {
        let mut cell = Cell {
            revealed: true,
            touching_mines: 2,
            touching_flags: 1,
            ..Cell::default()
        };
        assert!(!cell.is_chordable());
        assert_eq!(
            cell.view(),
            CellView::Revealed {
                touching_mines: 2,
                satisfied: false
            }
        );

        cell.touching_flags = 2;
        assert!(cell.is_chordable());
    }

    #[test]
    fn zero_clue_is_never_chordable() {
        let cell = Cell {
            revealed: true,
            ..Cell::default()
        };
        assert!(!cell.is_chordable());
        assert_eq!(
            cell.view(),
            CellView::Revealed {
                touching_mines: 0,
                satisfied: false
            }
        );
    }

    #[test]
    fn hidden_mine_is_not_exposed() {
        let cell = Cell {
            has_mine: true,
            touching_mines: 3,
            ..Cell::default()
        };
        assert_eq!(cell.view(), CellView::Hidden);
        assert_eq!(
            Cell {
                revealed: true,
                ..cell
            }
            .view(),
            CellView::Mine
        );
    }
}
