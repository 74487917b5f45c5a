//! Hit point bar geometry.

/// Column widths of the three bar segments. Always sums to the requested width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HpBarSegments {
    pub current: u16,
    pub temporary: u16,
    pub empty: u16,
}

/// Split `width` columns between current HP, temporary HP and empty space.
///
/// The scale is `max(maximum, current + temporary)` so temporary HP above
/// maximum still fits. Temporary HP always gets at least one column when
/// present, taken from the current segment if the bar would overflow.
pub fn hp_bar_segments(current: i32, maximum: i32, temporary: i32, width: u16) -> HpBarSegments {
    if width == 0 {
        return HpBarSegments::default();
    }
    let current = current.max(0) as i64;
    let temporary = temporary.max(0) as i64;
    let scale = (maximum.max(0) as i64).max(current + temporary);
    if scale == 0 {
        return HpBarSegments {
            empty: width,
            ..Default::default()
        };
    }

    let total = width as i64;
    let mut current_w = current * total / scale;
    let mut temp_w = temporary * total / scale;
    if temporary > 0 && temp_w == 0 {
        temp_w = 1;
    }
    if current_w + temp_w > total {
        current_w = total - temp_w;
    }

    HpBarSegments {
        current: current_w as u16,
        temporary: temp_w as u16,
        empty: (total - current_w - temp_w) as u16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(s: HpBarSegments) -> u16 {
        s.current + s.temporary + s.empty
    }

    #[test]
    fn test_full_and_half() {
        let full = hp_bar_segments(20, 20, 0, 20);
        assert_eq!(full.current, 20);
        assert_eq!(full.empty, 0);

        let half = hp_bar_segments(10, 20, 0, 20);
        assert_eq!(half.current, 10);
        assert_eq!(half.empty, 10);
    }

    #[test]
    fn test_temp_always_visible() {
        let bar = hp_bar_segments(100, 100, 1, 10);
        assert_eq!(bar.temporary, 1);
        assert_eq!(sum(bar), 10);
        assert_eq!(bar.current, 9);
    }

    #[test]
    fn test_temp_beyond_maximum_rescales() {
        let bar = hp_bar_segments(20, 20, 20, 20);
        assert_eq!(bar.current, 10);
        assert_eq!(bar.temporary, 10);
        assert_eq!(bar.empty, 0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(hp_bar_segments(5, 10, 3, 0), HpBarSegments::default());

        let empty = hp_bar_segments(0, 0, 0, 12);
        assert_eq!(empty.empty, 12);

        let negative = hp_bar_segments(-4, 10, -2, 8);
        assert_eq!(negative.current, 0);
        assert_eq!(negative.temporary, 0);
        assert_eq!(negative.empty, 8);
    }

    #[test]
    fn test_widths_always_sum() {
        for width in 1..30u16 {
            for current in 0..25 {
                for temp in 0..6 {
                    let bar = hp_bar_segments(current, 20, temp, width);
                    assert_eq!(sum(bar), width, "{current}/{temp}/{width}");
                    if temp > 0 {
                        assert!(bar.temporary >= 1);
                    }
                }
            }
        }
    }
}
