/// Back-to-front ordering for the painter's algorithm.
///
/// Occlusion is resolved by draw order alone: primitives are sorted by a
/// single depth scalar, farthest (largest depth) first. This is only
/// correct for the convex-ish shapes the generators produce, not for
/// arbitrary scenes with interpenetrating or cyclically overlapping
/// primitives.
use crate::geometry::{Curve, Face, Primitive};

/// Types that carry a depth scalar used solely for draw ordering
pub trait Depth {
    fn depth(&self) -> f64;
}

impl Depth for Curve {
    fn depth(&self) -> f64 {
        self.depth
    }
}

impl Depth for Face {
    fn depth(&self) -> f64 {
        self.depth
    }
}

impl Depth for Primitive {
    fn depth(&self) -> f64 {
        match self {
            Primitive::Curve(curve) => curve.depth,
            Primitive::Face(face) => face.depth,
        }
    }
}

/// Sort in place, descending by depth.
///
/// The sort is stable, so equal depths keep their emission order and
/// sorting an already sorted slice leaves it unchanged. `f64::total_cmp`
/// makes the order total even if a NaN slips in.
pub fn sort_by_depth<T: Depth>(primitives: &mut [T]) {
    primitives.sort_by(|a, b| b.depth().total_cmp(&a.depth()));
}

/// Owned variant of [`sort_by_depth`]
pub fn sorted_by_depth<T: Depth>(mut primitives: Vec<T>) -> Vec<T> {
    sort_by_depth(&mut primitives);
    primitives
}

/// Check whether a slice is already in back-to-front order
pub fn is_back_to_front<T: Depth>(primitives: &[T]) -> bool {
    primitives
        .windows(2)
        .all(|w| w[0].depth().total_cmp(&w[1].depth()).is_ge())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Tagged(f64, usize);

    impl Depth for Tagged {
        fn depth(&self) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_sort_descending() {
        let sorted = sorted_by_depth(vec![Tagged(1.0, 0), Tagged(3.0, 1), Tagged(-2.0, 2)]);
        let order: Vec<usize> = sorted.iter().map(|t| t.1).collect();
        assert_eq!(order, vec![1, 0, 2]);
        assert!(is_back_to_front(&sorted));
    }

    #[test]
    fn test_ties_keep_emission_order() {
        let input = vec![
            Tagged(0.5, 0),
            Tagged(2.0, 1),
            Tagged(0.5, 2),
            Tagged(2.0, 3),
            Tagged(0.5, 4),
        ];
        let sorted = sorted_by_depth(input);
        let order: Vec<usize> = sorted.iter().map(|t| t.1).collect();
        assert_eq!(order, vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let once = sorted_by_depth(vec![
            Tagged(4.0, 0),
            Tagged(-1.0, 1),
            Tagged(4.0, 2),
            Tagged(0.0, 3),
        ]);
        let twice = sorted_by_depth(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nan_does_not_break_order() {
        let sorted = sorted_by_depth(vec![Tagged(1.0, 0), Tagged(f64::NAN, 1), Tagged(2.0, 2)]);
        assert!(is_back_to_front(&sorted));
        assert_eq!(sorted.len(), 3);
    }
}
