//! Per-frame update protocol: continuous input, physics, camera pose and
//! player motion, in that order, once per displayed frame.

use std::time::Duration;

use bevy::prelude::*;

use crate::ViewerSet;
use crate::camera::{CameraConfig, CameraPose, OrbitCamera};
use crate::controls::{ControlsConfig, ViewerControls, install_default_bindings};
use crate::input::{InputEvent, InputRouter};
use crate::player::{PlayerConfig, PlayerMotion};
use crate::sim::FallingBody;

/// Something stepped once per frame with the frame's elapsed seconds.
pub trait Simulation {
    /// Advances by `elapsed` seconds; implementations may substep internally.
    fn advance(&mut self, elapsed: f32);
}

impl Simulation for () {
    fn advance(&mut self, _elapsed: f32) {}
}

/// What the renderer needs from one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    /// Zero-based frame counter.
    pub frame: u64,
    /// Seconds since the previous tick.
    pub elapsed: f32,
    /// Camera pose after this tick's input.
    pub camera: CameraPose,
    /// Player ground-plane position after this tick's motion.
    pub player: Vec2,
}

/// Owns the input router and the controls it mutates.
#[derive(Resource)]
pub struct FrameLoop {
    router: InputRouter<ViewerControls>,
    controls: ViewerControls,
    last: Option<Duration>,
    frame: u64,
    latest: Option<FrameState>,
}

impl FrameLoop {
    /// Loop over an already configured router.
    pub fn new(router: InputRouter<ViewerControls>, controls: ViewerControls) -> Self {
        Self {
            router,
            controls,
            last: None,
            frame: 0,
            latest: None,
        }
    }

    /// Loop with the viewer's default bindings installed.
    pub fn with_default_bindings(
        camera: OrbitCamera,
        player: PlayerMotion,
        cfg: &ControlsConfig,
    ) -> Self {
        let mut router = InputRouter::new(cfg.drag_threshold);
        install_default_bindings(&mut router, cfg);
        Self::new(router, ViewerControls::new(camera, player))
    }

    /// Routes one input event with the controls as context.
    pub fn dispatch(&mut self, event: InputEvent) -> bool {
        self.router.dispatch(event, &mut self.controls)
    }

    /// Releases every latched key, firing their key-up bindings.
    pub fn release_all_keys(&mut self) {
        for key in self.router.pressed_keys() {
            self.router.dispatch(InputEvent::KeyUp(key), &mut self.controls);
        }
    }

    /// Ticks at timestamp `now`.
    ///
    /// The first tick has zero elapsed time; a timestamp earlier than the
    /// previous one also yields zero.
    pub fn tick(&mut self, now: Duration, sim: &mut impl Simulation) -> FrameState {
        let elapsed = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last = Some(now);
        self.tick_elapsed(elapsed.as_secs_f32(), sim)
    }

    /// Ticks with an explicit step in seconds.
    pub fn tick_elapsed(&mut self, elapsed: f32, sim: &mut impl Simulation) -> FrameState {
        let elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };

        self.router.tick(elapsed, &mut self.controls);
        sim.advance(elapsed);
        let camera = self.controls.camera.derive_pose();
        self.controls.player.advance(elapsed);

        let state = FrameState {
            frame: self.frame,
            elapsed,
            camera,
            player: self.controls.player.position(),
        };
        self.frame += 1;
        self.latest = Some(state);
        state
    }

    /// Result of the most recent tick.
    pub fn latest(&self) -> Option<FrameState> {
        self.latest
    }

    /// Number of ticks so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Current controls.
    pub fn controls(&self) -> &ViewerControls {
        &self.controls
    }

    /// Mutable controls, for consumers of pending requests.
    pub fn controls_mut(&mut self) -> &mut ViewerControls {
        &mut self.controls
    }

    /// The binding table, for adding or removing bindings at runtime.
    pub fn router_mut(&mut self) -> &mut InputRouter<ViewerControls> {
        &mut self.router
    }
}

/// Installs the [`FrameLoop`] and ticks it every frame.
///
/// Reads [`CameraConfig`] and [`PlayerConfig`] when present, so add it after
/// their plugins.
pub struct FramePlugin(pub ControlsConfig);

impl Plugin for FramePlugin {
    fn build(&self, app: &mut App) {
        let camera = app
            .world()
            .get_resource::<CameraConfig>()
            .map(CameraConfig::build_orbit)
            .unwrap_or_default();
        let player = app
            .world()
            .get_resource::<PlayerConfig>()
            .cloned()
            .unwrap_or_default()
            .build_motion();

        app.register_type::<ControlsConfig>()
            .insert_resource(self.0.clone())
            .insert_resource(FrameLoop::with_default_bindings(camera, player, &self.0))
            .add_systems(Update, drive_frame.in_set(ViewerSet::Tick));
    }
}

fn drive_frame(time: Res<Time>, mut frame_loop: ResMut<FrameLoop>, mut body: ResMut<FallingBody>) {
    frame_loop.tick(time.elapsed(), &mut *body);
}
