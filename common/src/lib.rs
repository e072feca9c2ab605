use splitview::controls::OrbitControls;
use splitview::layout::FixedLayout;
use splitview::render_loop::ViewGroup;
use splitview::scene::Scene;

pub mod image_out;
pub mod presets;
pub mod scene_loader;

/// Everything a host needs to run one demo.
pub struct Demo {
    pub scene: Scene,
    pub views: ViewGroup,
    pub layout: FixedLayout,
    /// Orbit controls by view id. Views without an entry stay fixed.
    pub controls: Vec<(String, OrbitControls)>,
}
