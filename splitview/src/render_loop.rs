//! Per-frame driver for a group of cameras sharing one scene and one surface.
//!
//! The loop is either [`LoopState::Idle`] or [`LoopState::Scheduled`]. It is
//! scheduled once by [`RenderLoop::start`] and schedules itself again at the
//! end of every frame, so it only stops when the host stops delivering frame
//! callbacks.

use std::time::Duration;

use crate::camera::PerspectiveCamera;
use crate::color::Color;
use crate::layout::Layout;
use crate::region::Region;

/// The draw surface as seen by the loop.
pub trait Surface {
    /// Size the surface is shown at, in physical pixels.
    fn display_size(&self) -> (u32, u32);
    /// Size of the backing buffer, in physical pixels.
    fn buffer_size(&self) -> (u32, u32);
    fn resize_buffer(&mut self, width: u32, height: u32);
    /// Restricts the following draws to `region`, both clip and viewport.
    fn set_clip(&mut self, region: &Region);
    /// Asks for one frame callback on the next display refresh.
    fn request_frame(&mut self);
}

/// Anything that can be drawn through a camera into a region.
pub trait Drawable {
    #[allow(unused_variables)]
    /// Background for the following draws. Views without their own background
    /// never call this.
    fn set_background(&mut self, color: Color) {}

    fn draw(&mut self, camera: &PerspectiveCamera, region: &Region);
}

/// Time driven state.
pub trait Animate {
    /// `seconds` counts from the start of the loop, not from the last frame.
    fn advance(&mut self, seconds: f64);
}

#[derive(Clone, Debug)]
pub struct CameraBinding {
    pub view: String,
    pub camera: PerspectiveCamera,
    pub background: Option<Color>,
}

impl CameraBinding {
    pub fn new(view: impl Into<String>, camera: PerspectiveCamera) -> Self {
        Self {
            view: view.into(),
            camera,
            background: None,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}

/// Camera bindings drawn in insertion order.
#[derive(Clone, Debug, Default)]
pub struct ViewGroup {
    bindings: Vec<CameraBinding>,
}

impl ViewGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, binding: CameraBinding) {
        self.bindings.push(binding);
    }

    pub fn bindings(&self) -> &[CameraBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn camera_mut(&mut self, view: &str) -> Option<&mut PerspectiveCamera> {
        self.bindings
            .iter_mut()
            .find(|b| b.view == view)
            .map(|b| &mut b.camera)
    }

    /// Computes the current region of every binding, `None` for views the
    /// layout does not know.
    pub fn regions<L: Layout + ?Sized>(&self, layout: &L) -> Vec<(&str, Option<Region>)> {
        let container = layout.container();

        self.bindings
            .iter()
            .map(|b| {
                let region = container.and_then(|c| {
                    layout
                        .view_rect(&b.view)
                        .map(|rect| Region::split(&c, &rect))
                });

                (b.view.as_str(), region)
            })
            .collect()
    }

    /// Topmost drawable view under the point, given relative to the container.
    pub fn view_at<L: Layout + ?Sized>(&self, layout: &L, x: f64, y: f64) -> Option<(&str, Region)> {
        self.regions(layout)
            .into_iter()
            .rev()
            .find_map(|(view, region)| region.filter(|r| r.contains(x, y)).map(|r| (view, r)))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Scheduled,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub resized: bool,
    pub drawn: usize,
    pub skipped: usize,
}

pub struct RenderLoop {
    state: LoopState,
    started: Duration,
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            started: Duration::ZERO,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Schedules the first frame. `now` is the reference point for animation
    /// time. Does nothing if a frame is already scheduled.
    pub fn start<S: Surface + ?Sized>(&mut self, now: Duration, surface: &mut S) {
        if self.state == LoopState::Scheduled {
            return;
        }

        self.started = now;
        self.state = LoopState::Scheduled;
        surface.request_frame();
    }

    /// Runs one frame callback and schedules the next one.
    ///
    /// Returns `None` without touching anything when no frame was scheduled.
    pub fn frame<S, L, D>(
        &mut self,
        now: Duration,
        surface: &mut S,
        layout: &L,
        group: &mut ViewGroup,
        scene: &mut D,
    ) -> Option<FrameStats>
    where
        S: Surface + ?Sized,
        L: Layout + ?Sized,
        D: Drawable + Animate + ?Sized,
    {
        if self.state != LoopState::Scheduled {
            log::trace!("frame callback without a scheduled frame");
            return None;
        }
        self.state = LoopState::Idle;

        let mut stats = FrameStats {
            resized: resize_to_display_size(surface),
            ..Default::default()
        };

        let container = layout.container();

        for binding in &mut group.bindings {
            let region = match (container, layout.view_rect(&binding.view)) {
                (Some(c), Some(rect)) => Region::split(&c, &rect),
                _ => {
                    log::debug!("view {} is not laid out, skipping", binding.view);
                    stats.skipped += 1;
                    continue;
                }
            };

            let aspect = match region.aspect() {
                Some(aspect) if region.is_drawable() => aspect,
                _ => {
                    log::debug!("view {} has an empty region {:?}", binding.view, region);
                    stats.skipped += 1;
                    continue;
                }
            };

            binding.camera.set_aspect(aspect as f32);
            binding.camera.update_projection();

            surface.set_clip(&region);

            if let Some(color) = binding.background {
                scene.set_background(color);
            }

            scene.draw(&binding.camera, &region);
            stats.drawn += 1;
        }

        scene.advance(now.saturating_sub(self.started).as_secs_f64());

        self.frames += 1;
        log::trace!("frame {} {:?}", self.frames, stats);

        self.state = LoopState::Scheduled;
        surface.request_frame();

        Some(stats)
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Matches the backing buffer to the displayed size. Returns whether the
/// buffer was resized.
pub fn resize_to_display_size<S: Surface + ?Sized>(surface: &mut S) -> bool {
    let (width, height) = surface.display_size();

    if surface.buffer_size() == (width, height) {
        return false;
    }

    surface.resize_buffer(width, height);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Anchor, FixedLayout};
    use crate::rect::Rect;

    #[derive(Default)]
    struct MockSurface {
        display: (u32, u32),
        buffer: (u32, u32),
        resizes: usize,
        requests: usize,
        clips: Vec<Region>,
    }

    impl MockSurface {
        fn new(display: (u32, u32), buffer: (u32, u32)) -> Self {
            Self {
                display,
                buffer,
                ..Default::default()
            }
        }
    }

    impl Surface for MockSurface {
        fn display_size(&self) -> (u32, u32) {
            self.display
        }

        fn buffer_size(&self) -> (u32, u32) {
            self.buffer
        }

        fn resize_buffer(&mut self, width: u32, height: u32) {
            self.buffer = (width, height);
            self.resizes += 1;
        }

        fn set_clip(&mut self, region: &Region) {
            self.clips.push(*region);
        }

        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    #[derive(Default)]
    struct MockScene {
        draws: Vec<(f32, f32, Region)>,
        backgrounds: Vec<Color>,
        time: Option<f64>,
    }

    impl Drawable for MockScene {
        fn set_background(&mut self, color: Color) {
            self.backgrounds.push(color);
        }

        fn draw(&mut self, camera: &PerspectiveCamera, region: &Region) {
            self.draws.push((camera.fov, camera.aspect(), *region));
        }
    }

    impl Animate for MockScene {
        fn advance(&mut self, seconds: f64) {
            self.time = Some(seconds);
        }
    }

    struct NoContainer;

    impl Layout for NoContainer {
        fn container(&self) -> Option<Rect> {
            None
        }

        fn view_rect(&self, _view: &str) -> Option<Rect> {
            Some(Rect::from_size(10.0, 10.0))
        }
    }

    fn split_group() -> ViewGroup {
        let mut group = ViewGroup::new();
        group.push(CameraBinding::new(
            "view1",
            PerspectiveCamera::new(45.0, 2.0, 0.1, 100.0),
        ));
        group.push(
            CameraBinding::new("view2", PerspectiveCamera::new(60.0, 2.0, 0.1, 500.0))
                .with_background(Color::from_hex(0x000040)),
        );
        group
    }

    fn split_layout() -> FixedLayout {
        FixedLayout::new(800.0, 600.0)
            .with_view("view1", Anchor::LEFT_HALF)
            .with_view("view2", Anchor::RIGHT_HALF)
    }

    #[test]
    fn start_schedules_once() {
        let mut surface = MockSurface::new((800, 600), (800, 600));
        let mut render_loop = RenderLoop::new();
        assert_eq!(render_loop.state(), LoopState::Idle);

        render_loop.start(Duration::ZERO, &mut surface);
        render_loop.start(Duration::ZERO, &mut surface);

        assert_eq!(render_loop.state(), LoopState::Scheduled);
        assert_eq!(surface.requests, 1);
    }

    #[test]
    fn idle_frame_does_nothing() {
        let mut surface = MockSurface::new((800, 600), (300, 150));
        let mut scene = MockScene::default();
        let mut group = split_group();
        let mut render_loop = RenderLoop::new();

        let stats = render_loop.frame(
            Duration::from_secs(1),
            &mut surface,
            &split_layout(),
            &mut group,
            &mut scene,
        );

        assert_eq!(stats, None);
        assert_eq!(surface.resizes, 0);
        assert_eq!(surface.requests, 0);
        assert!(scene.draws.is_empty());
        assert_eq!(scene.time, None);
    }

    #[test]
    fn split_frame_draws_both_views() {
        let mut surface = MockSurface::new((800, 600), (800, 600));
        let mut scene = MockScene::default();
        let mut group = split_group();
        let mut render_loop = RenderLoop::new();

        render_loop.start(Duration::ZERO, &mut surface);
        let stats = render_loop
            .frame(
                Duration::from_millis(16),
                &mut surface,
                &split_layout(),
                &mut group,
                &mut scene,
            )
            .unwrap();

        assert_eq!(
            stats,
            FrameStats {
                resized: false,
                drawn: 2,
                skipped: 0
            }
        );

        // insertion order, each camera through its own half
        assert_eq!(scene.draws[0].0, 45.0);
        assert_eq!(scene.draws[1].0, 60.0);
        assert!((scene.draws[0].1 - 400.0 / 600.0).abs() < 1e-6);
        assert!((scene.draws[1].1 - 400.0 / 600.0).abs() < 1e-6);

        assert_eq!(surface.clips.len(), 2);
        assert_eq!(surface.clips[0].left, 0.0);
        assert_eq!(surface.clips[1].left, 400.0);
        assert_eq!(surface.clips[1].y_up, 0.0);
        assert_eq!(scene.draws[1].2, surface.clips[1]);

        assert_eq!(scene.backgrounds, vec![Color::from_hex(0x000040)]);
        assert!((group.bindings()[0].camera.aspect() - 400.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn reschedules_after_every_frame() {
        let mut surface = MockSurface::new((800, 600), (800, 600));
        let mut scene = MockScene::default();
        let mut group = split_group();
        let layout = split_layout();
        let mut render_loop = RenderLoop::new();

        render_loop.start(Duration::ZERO, &mut surface);

        for i in 1..=3 {
            render_loop.frame(
                Duration::from_millis(16 * i),
                &mut surface,
                &layout,
                &mut group,
                &mut scene,
            );
            assert_eq!(render_loop.state(), LoopState::Scheduled);
        }

        assert_eq!(surface.requests, 4);
        assert_eq!(render_loop.frames(), 3);
        assert_eq!(scene.draws.len(), 6);
    }

    #[test]
    fn resize_happens_once() {
        let mut surface = MockSurface::new((1024, 768), (300, 150));
        let mut scene = MockScene::default();
        let mut group = split_group();
        let layout = split_layout();
        let mut render_loop = RenderLoop::new();

        render_loop.start(Duration::ZERO, &mut surface);

        let first = render_loop
            .frame(Duration::ZERO, &mut surface, &layout, &mut group, &mut scene)
            .unwrap();
        let second = render_loop
            .frame(Duration::ZERO, &mut surface, &layout, &mut group, &mut scene)
            .unwrap();

        assert!(first.resized);
        assert!(!second.resized);
        assert_eq!(surface.resizes, 1);
        assert_eq!(surface.buffer, (1024, 768));
    }

    #[test]
    fn resize_helper() {
        let mut surface = MockSurface::new((640, 480), (640, 480));
        assert!(!resize_to_display_size(&mut surface));
        assert_eq!(surface.resizes, 0);

        surface.display = (641, 480);
        assert!(resize_to_display_size(&mut surface));
        assert!(!resize_to_display_size(&mut surface));
        assert_eq!(surface.resizes, 1);
    }

    #[test]
    fn off_screen_view_is_skipped() {
        let mut surface = MockSurface::new((800, 600), (800, 600));
        let mut scene = MockScene::default();
        let mut group = split_group();
        let layout = split_layout().with_view("view2", Anchor::new(1.125, 0.0, 0.125, 0.25));
        let mut render_loop = RenderLoop::new();

        render_loop.start(Duration::ZERO, &mut surface);
        let stats = render_loop
            .frame(Duration::ZERO, &mut surface, &layout, &mut group, &mut scene)
            .unwrap();

        assert_eq!(stats.drawn, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(surface.clips.len(), 1);
        // skipped camera keeps its previous aspect
        assert_eq!(group.bindings()[1].camera.aspect(), 2.0);
        assert!(scene.backgrounds.is_empty());
    }

    #[test]
    fn missing_elements_are_skipped() {
        let mut surface = MockSurface::new((800, 600), (800, 600));
        let mut scene = MockScene::default();
        let mut group = split_group();
        group.push(CameraBinding::new(
            "view3",
            PerspectiveCamera::new(75.0, 2.0, 0.1, 5.0),
        ));
        let mut render_loop = RenderLoop::new();

        render_loop.start(Duration::ZERO, &mut surface);
        let stats = render_loop
            .frame(
                Duration::ZERO,
                &mut surface,
                &split_layout(),
                &mut group,
                &mut scene,
            )
            .unwrap();
        assert_eq!((stats.drawn, stats.skipped), (2, 1));

        let stats = render_loop
            .frame(Duration::ZERO, &mut surface, &NoContainer, &mut group, &mut scene)
            .unwrap();
        assert_eq!((stats.drawn, stats.skipped), (0, 3));
        assert_eq!(render_loop.state(), LoopState::Scheduled);
    }

    #[test]
    fn zero_sized_container() {
        let mut surface = MockSurface::new((0, 0), (800, 600));
        let mut scene = MockScene::default();
        let mut group = split_group();
        let layout = FixedLayout::new(0.0, 0.0)
            .with_view("view1", Anchor::LEFT_HALF)
            .with_view("view2", Anchor::RIGHT_HALF);
        let mut render_loop = RenderLoop::new();

        render_loop.start(Duration::ZERO, &mut surface);
        let stats = render_loop
            .frame(Duration::ZERO, &mut surface, &layout, &mut group, &mut scene)
            .unwrap();

        assert_eq!(stats.drawn, 0);
        assert_eq!(stats.skipped, 2);
        assert!(scene.draws.is_empty());
    }

    #[test]
    fn animation_time_counts_from_start() {
        let mut surface = MockSurface::new((800, 600), (800, 600));
        let mut scene = MockScene::default();
        let mut group = ViewGroup::new();
        let mut render_loop = RenderLoop::new();

        render_loop.start(Duration::from_secs(1), &mut surface);
        render_loop.frame(
            Duration::from_millis(3500),
            &mut surface,
            &split_layout(),
            &mut group,
            &mut scene,
        );

        assert_eq!(scene.time, Some(2.5));
    }

    #[test]
    fn hit_testing_views() {
        let group = split_group();
        let layout = split_layout();

        assert_eq!(group.view_at(&layout, 100.0, 100.0).map(|v| v.0), Some("view1"));
        assert_eq!(group.view_at(&layout, 500.0, 100.0).map(|v| v.0), Some("view2"));
        assert!(group.view_at(&layout, 900.0, 100.0).is_none());

        let regions = group.regions(&layout);
        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|(_, r)| r.is_some()));
    }
}
