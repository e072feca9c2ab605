use crate::rect::Rect;

/// Source of on-screen rectangles for the draw surface and its views.
///
/// Both are queried every frame, so implementations may follow window resizes
/// or any other layout change. A `None` means the element is not there and the
/// frame skips whatever depends on it.
pub trait Layout {
    fn container(&self) -> Option<Rect>;
    fn view_rect(&self, view: &str) -> Option<Rect>;
}

/// Position of a view as fractions of the container size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Anchor {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Anchor {
    pub const FULL: Anchor = Anchor::new(0.0, 0.0, 1.0, 1.0);
    pub const LEFT_HALF: Anchor = Anchor::new(0.0, 0.0, 0.5, 1.0);
    pub const RIGHT_HALF: Anchor = Anchor::new(0.5, 0.0, 0.5, 1.0);

    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn resolve(&self, container: &Rect) -> Rect {
        Rect::new(
            container.left + self.left * container.width,
            container.top + self.top * container.height,
            self.width * container.width,
            self.height * container.height,
        )
    }
}

/// Views pinned to fixed fractions of a container that covers the whole window.
#[derive(Clone, Debug, Default)]
pub struct FixedLayout {
    container: Rect,
    views: Vec<(String, Anchor)>,
}

impl FixedLayout {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            container: Rect::from_size(width, height),
            views: Vec::new(),
        }
    }

    pub fn with_view(mut self, id: impl Into<String>, anchor: Anchor) -> Self {
        self.set_view(id, anchor);
        self
    }

    /// Adds the view or moves it if the id is already known.
    pub fn set_view(&mut self, id: impl Into<String>, anchor: Anchor) {
        let id = id.into();

        match self.views.iter_mut().find(|(v, _)| *v == id) {
            Some((_, a)) => *a = anchor,
            None => self.views.push((id, anchor)),
        }
    }

    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.container.width = width;
        self.container.height = height;
    }

    pub fn views(&self) -> impl Iterator<Item = (&str, &Anchor)> {
        self.views.iter().map(|(id, anchor)| (id.as_str(), anchor))
    }
}

impl Layout for FixedLayout {
    fn container(&self) -> Option<Rect> {
        Some(self.container)
    }

    fn view_rect(&self, view: &str) -> Option<Rect> {
        self.views
            .iter()
            .find(|(id, _)| id == view)
            .map(|(_, anchor)| anchor.resolve(&self.container))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_against_current_size() {
        let mut layout = FixedLayout::new(800.0, 600.0)
            .with_view("view1", Anchor::LEFT_HALF)
            .with_view("view2", Anchor::RIGHT_HALF);

        assert_eq!(
            layout.view_rect("view2"),
            Some(Rect::new(400.0, 0.0, 400.0, 600.0))
        );

        layout.set_container_size(1000.0, 500.0);

        assert_eq!(
            layout.view_rect("view1"),
            Some(Rect::new(0.0, 0.0, 500.0, 500.0))
        );
        assert_eq!(layout.container(), Some(Rect::from_size(1000.0, 500.0)));
        assert_eq!(layout.view_rect("view3"), None);
    }

    #[test]
    fn set_view_replaces() {
        let mut layout = FixedLayout::new(100.0, 100.0).with_view("main", Anchor::FULL);
        layout.set_view("main", Anchor::LEFT_HALF);

        assert_eq!(layout.views().count(), 1);
        assert_eq!(
            layout.view_rect("main"),
            Some(Rect::new(0.0, 0.0, 50.0, 100.0))
        );
    }
}
