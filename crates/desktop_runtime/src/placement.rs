//! Pseudo-random placement for windows created without an explicit position.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::model::{PointerPosition, Viewport};

#[derive(Debug, Clone)]
pub struct Placement {
    rng: StdRng,
}

impl Placement {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Picks a top-left corner that keeps a `w`×`h` window inside the viewport, leaving
    /// `bottom_margin` free above the bottom edge. Oversized windows are pinned to `0`.
    pub fn next_position(
        &mut self,
        w: i32,
        h: i32,
        viewport: Viewport,
        bottom_margin: i32,
    ) -> PointerPosition {
        let free_x = (viewport.width - w).max(0);
        let free_y = (viewport.height - h - bottom_margin).max(0);
        PointerPosition {
            x: scaled(self.rng.gen::<f64>(), free_x),
            y: scaled(self.rng.gen::<f64>(), free_y),
        }
    }
}

fn scaled(r: f64, span: i32) -> i32 {
    (r * f64::from(span)).floor() as i32
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn positions_stay_inside_free_area() {
        let mut placement = Placement::seeded(7);
        let viewport = Viewport {
            width: 800,
            height: 600,
        };
        for _ in 0..200 {
            let at = placement.next_position(300, 200, viewport, 40);
            assert!((0..=500).contains(&at.x), "x {}", at.x);
            assert!((0..=360).contains(&at.y), "y {}", at.y);
        }
    }

    #[test]
    fn oversized_window_is_pinned_to_origin() {
        let mut placement = Placement::seeded(1);
        let viewport = Viewport {
            width: 320,
            height: 240,
        };

        assert_eq!(
            placement.next_position(640, 480, viewport, 40),
            PointerPosition { x: 0, y: 0 }
        );
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let viewport = Viewport::default();
        let mut a = Placement::seeded(42);
        let mut b = Placement::seeded(42);

        for _ in 0..5 {
            assert_eq!(
                a.next_position(400, 300, viewport, 40),
                b.next_position(400, 300, viewport, 40)
            );
        }
    }
}
