//! Panel focus rings and list cursors.

/// A fixed ring of panels. `next` and `prev` wrap around.
#[derive(Debug, Clone)]
pub struct FocusRing<P: 'static> {
    panels: &'static [P],
    index: usize,
}

impl<P: Copy + PartialEq> FocusRing<P> {
    pub fn new(panels: &'static [P]) -> Self {
        Self { panels, index: 0 }
    }

    pub fn current(&self) -> P {
        self.panels[self.index]
    }

    pub fn is(&self, panel: P) -> bool {
        self.current() == panel
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.panels.len();
    }

    pub fn prev(&mut self) {
        self.index = (self.index + self.panels.len() - 1) % self.panels.len();
    }

    /// Jump to `panel` if it is in the ring.
    pub fn focus(&mut self, panel: P) {
        if let Some(index) = self.panels.iter().position(|p| *p == panel) {
            self.index = index;
        }
    }
}

/// Clamp a cursor into `[0, len - 1]`, or 0 for an empty list.
pub fn clamp(cursor: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        cursor.min(len - 1)
    }
}

/// Move a cursor up one row. Stops at the top.
pub fn up(cursor: &mut usize) {
    *cursor = cursor.saturating_sub(1);
}

/// Move a cursor down one row. Stops at the last row.
pub fn down(cursor: &mut usize, len: usize) {
    *cursor = clamp(*cursor + 1, len);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Panel {
        A,
        B,
        C,
    }

    const PANELS: &[Panel] = &[Panel::A, Panel::B, Panel::C];

    #[test]
    fn test_next_wraps_around_ring() {
        let mut ring = FocusRing::new(PANELS);
        for _ in 0..PANELS.len() {
            ring.next();
        }
        assert_eq!(ring.current(), Panel::A);

        ring.prev();
        assert_eq!(ring.current(), Panel::C);
    }

    #[test]
    fn test_prev_inverts_next() {
        let mut ring = FocusRing::new(PANELS);
        ring.focus(Panel::B);
        for _ in 0..5 {
            ring.next();
            ring.prev();
        }
        assert!(ring.is(Panel::B));
    }

    #[test]
    fn test_cursor_clamps() {
        let mut cursor = 0;
        up(&mut cursor);
        assert_eq!(cursor, 0);

        down(&mut cursor, 2);
        down(&mut cursor, 2);
        assert_eq!(cursor, 1);

        assert_eq!(clamp(7, 3), 2);
        assert_eq!(clamp(7, 0), 0);
    }
}
