/// Highlighted row in an aggregated result list.
///
/// The index ranges over `[0, total]`: 0 is the "new entry" row, `1..=total`
/// are the candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionCursor {
    index: usize,
    total: usize,
}

impl SelectionCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn move_up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.index < self.total {
            self.index += 1;
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// New candidate count; pulls the index back inside the range.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.index = self.index.min(total);
    }

    pub fn select(&mut self, index: usize) {
        self.index = index.min(self.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_are_clamped() {
        let mut c = SelectionCursor::default();
        c.move_up();
        assert_eq!(c.index(), 0);
        c.move_down();
        assert_eq!(c.index(), 0);

        c.set_total(2);
        c.move_down();
        c.move_down();
        c.move_down();
        assert_eq!(c.index(), 2);
        c.move_up();
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn test_shrinking_total_reclamps() {
        let mut c = SelectionCursor::default();
        c.set_total(5);
        c.select(5);
        c.set_total(3);
        assert_eq!(c.index(), 3);
        c.set_total(0);
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_index_stays_in_range_across_changes() {
        let mut c = SelectionCursor::default();
        for (total, moves) in [(4usize, 6usize), (1, 3), (7, 2), (0, 5), (3, 1)] {
            c.set_total(total);
            for _ in 0..moves {
                c.move_down();
            }
            assert!(c.index() <= c.total());
        }
    }

    #[test]
    fn test_select_clamps() {
        let mut c = SelectionCursor::default();
        c.set_total(2);
        c.select(9);
        assert_eq!(c.index(), 2);
        c.reset();
        assert_eq!(c.index(), 0);
        assert_eq!(c.total(), 2);
    }
}
