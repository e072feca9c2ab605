use crate::rect::Rect;

/// Part of a container covered by a view, relative to the container's top-left
/// corner and clipped to its bounds.
///
/// Width or height end up at or below zero when the view lies outside the
/// container; such a region must not be drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Distance from the container's bottom edge to the region's bottom edge,
    /// i.e. the vertical offset for a bottom-left origin draw surface.
    pub y_up: f64,
}

impl Region {
    /// Computes the region of `sub` inside `container`. Both rectangles are in
    /// the same screen space.
    pub fn split(container: &Rect, sub: &Rect) -> Self {
        let right = sub.right().min(container.right()) - container.left;
        let left = (sub.left - container.left).max(0.0);
        let bottom = sub.bottom().min(container.bottom()) - container.top;
        let top = (sub.top - container.top).max(0.0);

        let width = container.width.min(right - left);
        let height = container.height.min(bottom - top);

        Self {
            left,
            top,
            width,
            height,
            y_up: container.height - bottom,
        }
    }

    pub fn is_drawable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Width over height, `None` when the region has no height.
    pub fn aspect(&self) -> Option<f64> {
        if self.height > 0.0 {
            Some(self.width / self.height)
        } else {
            None
        }
    }

    /// Hit test in container-relative, top-left origin coordinates.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.is_drawable()
            && x >= self.left
            && x < self.left + self.width
            && y >= self.top
            && y < self.top + self.height
    }

    pub fn to_scissor(&self) -> ScissorBox {
        ScissorBox {
            x: self.left.round() as i32,
            y: self.y_up.round() as i32,
            width: self.width.max(0.0).round() as i32,
            height: self.height.max(0.0).round() as i32,
        }
    }
}

/// Integer pixel box with a bottom-left origin, as consumed by scissor and
/// viewport calls.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScissorBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    #[test]
    fn inside_keeps_size() {
        let sub = Rect::new(100.0, 50.0, 300.0, 200.0);
        let region = Region::split(&CANVAS, &sub);

        assert_eq!(region.left, 100.0);
        assert_eq!(region.top, 50.0);
        assert_eq!(region.width, 300.0);
        assert_eq!(region.height, 200.0);
        assert_eq!(region.y_up, 350.0);
        assert!(region.is_drawable());
    }

    #[test]
    fn left_half() {
        let region = Region::split(&CANVAS, &Rect::new(0.0, 0.0, 400.0, 600.0));

        assert_eq!(
            region,
            Region {
                left: 0.0,
                top: 0.0,
                width: 400.0,
                height: 600.0,
                y_up: 0.0,
            }
        );

        let aspect = region.aspect().unwrap();
        assert!((aspect - 0.667).abs() < 1e-3);
    }

    #[test]
    fn outside_is_skipped() {
        let right_of = Region::split(&CANVAS, &Rect::new(900.0, 0.0, 100.0, 100.0));
        assert!(right_of.width <= 0.0);
        assert!(!right_of.is_drawable());

        let left_of = Region::split(&CANVAS, &Rect::new(-200.0, 0.0, 100.0, 100.0));
        assert!(left_of.width <= 0.0);
        assert!(!left_of.is_drawable());

        let below = Region::split(&CANVAS, &Rect::new(0.0, 700.0, 100.0, 100.0));
        assert!(below.height <= 0.0);
        assert_eq!(below.aspect(), None);
        assert!(!below.is_drawable());
    }

    #[test]
    fn partial_overlap_is_intersection() {
        let bottom_right = Region::split(&CANVAS, &Rect::new(600.0, 400.0, 400.0, 400.0));
        assert_eq!(
            (
                bottom_right.left,
                bottom_right.top,
                bottom_right.width,
                bottom_right.height
            ),
            (600.0, 400.0, 200.0, 200.0)
        );
        assert_eq!(bottom_right.y_up, 0.0);

        let top_left = Region::split(&CANVAS, &Rect::new(-100.0, -50.0, 300.0, 200.0));
        assert_eq!(
            (top_left.left, top_left.top, top_left.width, top_left.height),
            (0.0, 0.0, 200.0, 150.0)
        );
        assert_eq!(top_left.y_up, 450.0);
    }

    #[test]
    fn offset_container() {
        let canvas = Rect::new(20.0, 30.0, 400.0, 300.0);
        let region = Region::split(&canvas, &Rect::new(220.0, 30.0, 200.0, 300.0));

        assert_eq!(region.left, 200.0);
        assert_eq!(region.top, 0.0);
        assert_eq!(region.width, 200.0);
        assert_eq!(region.height, 300.0);
        assert_eq!(region.aspect(), Some(200.0 / 300.0));
    }

    #[test]
    fn larger_than_container_is_clamped() {
        let region = Region::split(&CANVAS, &Rect::new(-50.0, -50.0, 1000.0, 1000.0));

        assert_eq!(region.width, 800.0);
        assert_eq!(region.height, 600.0);
        assert_eq!(region.y_up, 0.0);
    }

    #[test]
    fn zero_height_has_no_aspect() {
        let region = Region::split(&CANVAS, &Rect::new(0.0, 0.0, 100.0, 0.0));

        assert_eq!(region.height, 0.0);
        assert_eq!(region.aspect(), None);
        assert!(!region.is_drawable());
    }

    #[test]
    fn hit_testing() {
        let region = Region::split(&CANVAS, &Rect::new(400.0, 0.0, 400.0, 600.0));

        assert!(region.contains(400.0, 0.0));
        assert!(region.contains(799.0, 599.0));
        assert!(!region.contains(399.0, 10.0));
        assert!(!region.contains(800.0, 10.0));
    }

    #[test]
    fn scissor_rounding() {
        let region = Region::split(&CANVAS, &Rect::new(10.4, 20.6, 100.7, 50.2));
        let scissor = region.to_scissor();

        assert_eq!(scissor.x, 10);
        assert_eq!(scissor.width, 101);
        assert_eq!(scissor.height, 50);
        assert_eq!(scissor.y, (600.0_f64 - (20.6 + 50.2)).round() as i32);

        let hidden = Region::split(&CANVAS, &Rect::new(900.0, 0.0, 100.0, 100.0));
        assert_eq!(hidden.to_scissor().width, 0);
    }
}
