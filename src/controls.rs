//! Default viewer bindings and the mutable state they act on.

use bevy::prelude::*;

use crate::camera::OrbitCamera;
use crate::input::{InputRouter, PointerSample};
use crate::player::{MotionAxis, PlayerMotion};

/// Key and mouse mapping for the default bindings.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct ControlsConfig {
    /// Radians per tick the arrow keys orbit the camera while held.
    pub key_rotation_step: f32,
    /// Button whose drag pans the look-at point.
    pub pan_button: MouseButton,
    /// Button whose drag orbits the camera.
    pub rotate_button: MouseButton,
    /// Button whose click selects a tile.
    pub click_button: MouseButton,
    /// Pixels of travel after which a press+release no longer counts as a click.
    pub drag_threshold: Option<f32>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            key_rotation_step: 0.05,
            pan_button: MouseButton::Left,
            rotate_button: MouseButton::Right,
            click_button: MouseButton::Left,
            drag_threshold: None,
        }
    }
}

/// Everything input handlers are allowed to touch.
#[derive(Clone, Debug)]
pub struct ViewerControls {
    /// The orbit camera.
    pub camera: OrbitCamera,
    /// Player velocity intent and position.
    pub player: PlayerMotion,
    /// Arrow-key orbit direction: -1, 0 or +1.
    pub turn: f32,
    /// Last pointer sample seen, if any.
    pub pointer: Option<PointerSample>,
    /// Hover pick requested by a pointer move, consumed by the picker.
    pub pending_hover: Option<PointerSample>,
    /// Click pick requested by a click, consumed by the picker.
    pub pending_click: Option<PointerSample>,
}

impl ViewerControls {
    /// Fresh controls around `camera` and `player`.
    pub fn new(camera: OrbitCamera, player: PlayerMotion) -> Self {
        Self {
            camera,
            player,
            turn: 0.0,
            pointer: None,
            pending_hover: None,
            pending_click: None,
        }
    }

    /// Takes the pending hover request, leaving none.
    pub fn take_hover_request(&mut self) -> Option<PointerSample> {
        self.pending_hover.take()
    }

    /// Takes the pending click request, leaving none.
    pub fn take_click_request(&mut self) -> Option<PointerSample> {
        self.pending_click.take()
    }
}

fn movement_key(
    router: &mut InputRouter<ViewerControls>,
    key: KeyCode,
    axis: MotionAxis,
    value: f32,
) {
    router.on_key_down(key, move |ctx| ctx.player.set_axis(axis, value));
    router.on_key_up(key, move |ctx| ctx.player.set_axis(axis, 0.0));
}

fn turn_key(router: &mut InputRouter<ViewerControls>, key: KeyCode, value: f32) {
    router.on_key_down(key, move |ctx| ctx.turn = value);
    router.on_key_up(key, |ctx| ctx.turn = 0.0);
}

/// Registers the viewer's bindings on `router`.
///
/// - WASD: player velocity intent (W/S on y, A/D on x; release zeroes the axis).
/// - Arrow left/right: orbit by `key_rotation_step` every tick while held.
/// - Pan button drag: pan. Rotate button drag: orbit. Wheel: zoom.
/// - Pointer move: hover pick. Click button: click pick.
pub fn install_default_bindings(router: &mut InputRouter<ViewerControls>, cfg: &ControlsConfig) {
    movement_key(router, KeyCode::KeyW, MotionAxis::Y, 1.0);
    movement_key(router, KeyCode::KeyS, MotionAxis::Y, -1.0);
    movement_key(router, KeyCode::KeyA, MotionAxis::X, -1.0);
    movement_key(router, KeyCode::KeyD, MotionAxis::X, 1.0);

    turn_key(router, KeyCode::ArrowLeft, -1.0);
    turn_key(router, KeyCode::ArrowRight, 1.0);
    let step = cfg.key_rotation_step;
    router.on_tick(move |ctx, _| {
        if ctx.turn != 0.0 {
            ctx.camera.rotate_by(ctx.turn * step);
        }
    });

    router.on_drag(cfg.pan_button, |ctx, delta| ctx.camera.update_position(delta));
    router.on_drag(cfg.rotate_button, |ctx, delta| ctx.camera.update_rotation(delta));
    // Wheel away from the user moves closer
    router.on_scroll(|ctx, lines| ctx.camera.update_zoom(-lines));

    router.on_pointer_move(|ctx, sample| {
        ctx.pointer = Some(sample);
        ctx.pending_hover = Some(sample);
    });
    router.on_click(cfg.click_button, |ctx, sample| ctx.pending_click = Some(sample));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;

    fn setup() -> (InputRouter<ViewerControls>, ViewerControls) {
        let cfg = ControlsConfig::default();
        let mut router = InputRouter::new(cfg.drag_threshold);
        install_default_bindings(&mut router, &cfg);
        let controls = ViewerControls::new(OrbitCamera::default(), PlayerMotion::new(Vec2::ZERO, 2.0));
        (router, controls)
    }

    fn key(router: &mut InputRouter<ViewerControls>, ctx: &mut ViewerControls, code: KeyCode, down: bool) {
        let event = if down {
            InputEvent::KeyDown(code)
        } else {
            InputEvent::KeyUp(code)
        };
        router.dispatch(event, ctx);
    }

    fn at(x: f32, y: f32, viewport: Vec2) -> PointerSample {
        PointerSample {
            position: Vec2::new(x, y),
            viewport,
        }
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(at(x, y, Vec2::new(800.0, 600.0)))
    }

    fn click(router: &mut InputRouter<ViewerControls>, ctx: &mut ViewerControls, pointer: PointerSample) {
        let button = MouseButton::Left;
        router.dispatch(InputEvent::ButtonDown { button, pointer }, ctx);
        router.dispatch(InputEvent::ButtonUp { button, pointer }, ctx);
    }

    // ── movement ────────────────────────────────────────────────────

    #[test]
    fn wasd_sets_velocity_intent() {
        let (mut router, mut ctx) = setup();
        key(&mut router, &mut ctx, KeyCode::KeyW, true);
        key(&mut router, &mut ctx, KeyCode::KeyA, true);
        assert_eq!(ctx.player.velocity(), Vec2::new(-1.0, 1.0));
        key(&mut router, &mut ctx, KeyCode::KeyW, false);
        assert_eq!(ctx.player.velocity(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn releasing_either_opposite_key_stops_the_axis() {
        let (mut router, mut ctx) = setup();
        key(&mut router, &mut ctx, KeyCode::KeyD, true);
        key(&mut router, &mut ctx, KeyCode::KeyA, true);
        assert_eq!(ctx.player.velocity().x, -1.0);
        key(&mut router, &mut ctx, KeyCode::KeyA, false);
        assert!(router.is_pressed(KeyCode::KeyD));
        assert_eq!(ctx.player.velocity().x, 0.0);
    }

    // ── camera ──────────────────────────────────────────────────────

    #[test]
    fn arrow_keys_orbit_each_tick_while_held() {
        let (mut router, mut ctx) = setup();
        let start = ctx.camera.angle();
        key(&mut router, &mut ctx, KeyCode::ArrowRight, true);
        router.tick(0.016, &mut ctx);
        router.tick(0.016, &mut ctx);
        assert!((ctx.camera.angle() - (start + 0.1)).abs() < 1e-5);

        key(&mut router, &mut ctx, KeyCode::ArrowRight, false);
        router.tick(0.016, &mut ctx);
        assert!((ctx.camera.angle() - (start + 0.1)).abs() < 1e-5);
    }

    #[test]
    fn right_drag_rotates_and_wheel_zooms() {
        let (mut router, mut ctx) = setup();
        router.dispatch(moved(100.0, 100.0), &mut ctx);
        router.dispatch(
            InputEvent::ButtonDown {
                button: MouseButton::Right,
                pointer: at(100.0, 100.0, Vec2::new(800.0, 600.0)),
            },
            &mut ctx,
        );
        router.dispatch(moved(120.0, 100.0), &mut ctx);
        assert!((ctx.camera.angle() - 0.2).abs() < 1e-5);
        assert_eq!(ctx.camera.look_at(), Vec3::ZERO);

        router.dispatch(InputEvent::Scroll(2.0), &mut ctx);
        assert_eq!(ctx.camera.radius(), 8.0);
    }

    // ── picking requests ────────────────────────────────────────────

    #[test]
    fn pointer_move_requests_hover_once() {
        let (mut router, mut ctx) = setup();
        router.dispatch(moved(10.0, 20.0), &mut ctx);
        let request = ctx.take_hover_request();
        assert_eq!(request.map(|s| s.position), Some(Vec2::new(10.0, 20.0)));
        assert_eq!(ctx.take_hover_request(), None);
    }

    #[test]
    fn click_without_prior_move_keeps_its_viewport() {
        let (mut router, mut ctx) = setup();
        let pointer = at(40.0, 30.0, Vec2::new(800.0, 600.0));
        click(&mut router, &mut ctx, pointer);
        assert_eq!(ctx.take_click_request(), Some(pointer));
        assert_eq!(ctx.take_click_request(), None);
    }

    #[test]
    fn click_after_resize_uses_new_viewport() {
        let (mut router, mut ctx) = setup();
        router.dispatch(moved(40.0, 30.0), &mut ctx);
        let pointer = at(40.0, 30.0, Vec2::new(1280.0, 720.0));
        click(&mut router, &mut ctx, pointer);
        assert_eq!(
            ctx.take_click_request().map(|s| s.viewport),
            Some(Vec2::new(1280.0, 720.0))
        );
    }
}
