use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::math;

/// Pointer position together with the viewport size at event time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Cursor position, origin top-left, in logical pixels.
    pub position: Vec2,
    /// Window size when the event arrived.
    pub viewport: Vec2,
}

impl PointerSample {
    /// `false` when the position or viewport holds a NaN or infinity.
    pub fn is_finite(&self) -> bool {
        math::is_finite_vec2(self.position) && math::is_finite_vec2(self.viewport)
    }
}

/// Raw input as the router consumes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// A key went down (repeats are fine; the latch filters them).
    KeyDown(KeyCode),
    /// A key went up.
    KeyUp(KeyCode),
    /// A mouse button was pressed.
    ButtonDown {
        /// Which button.
        button: MouseButton,
        /// Cursor position and viewport at the press.
        pointer: PointerSample,
    },
    /// A mouse button was released.
    ButtonUp {
        /// Which button.
        button: MouseButton,
        /// Cursor position and viewport at the release.
        pointer: PointerSample,
    },
    /// The cursor moved.
    PointerMoved(PointerSample),
    /// Wheel scrolled by `lines` (positive = away from the user).
    Scroll(f32),
}

impl InputEvent {
    /// `false` when any coordinate or amount is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        match *self {
            Self::KeyDown(_) | Self::KeyUp(_) => true,
            Self::ButtonDown { pointer, .. }
            | Self::ButtonUp { pointer, .. }
            | Self::PointerMoved(pointer) => pointer.is_finite(),
            Self::Scroll(lines) => lines.is_finite(),
        }
    }
}

/// Handle returned by every registration, used to remove the binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

/// Transition a key binding reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    /// Released → pressed.
    Down,
    /// Pressed → released.
    Up,
}

/// Stage of a mouse-button drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// Button pressed.
    Start,
    /// Pointer moved while pressed.
    Move,
    /// Button released.
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Trigger {
    Key(KeyCode, KeyPhase),
    Drag(MouseButton, DragPhase),
    Click(MouseButton),
    PointerMove,
    Scroll,
    Continuous,
}

#[derive(Clone, Copy)]
enum Payload {
    Nothing,
    Vector(Vec2),
    Scalar(f32),
    Pointer(PointerSample),
}

type Handler<C> = Box<dyn FnMut(&mut C, Payload) + Send + Sync>;

struct Binding<C> {
    id: BindingId,
    trigger: Trigger,
    handler: Handler<C>,
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    button: MouseButton,
    last: Vec2,
    travelled: f32,
}

/// Typed binding table dispatching input to handlers over a shared context `C`.
///
/// Handlers for the same trigger fire in registration order. Keys latch so a
/// held key fires `Down` once; each mouse button runs an
/// `idle → dragging → idle` machine that reports incremental drag deltas and
/// synthesizes clicks on release.
pub struct InputRouter<C> {
    bindings: Vec<Binding<C>>,
    next_id: u64,
    pressed: HashSet<KeyCode>,
    drags: Vec<Drag>,
    drag_threshold: Option<f32>,
}

impl<C: 'static> Default for InputRouter<C> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<C: 'static> InputRouter<C> {
    /// Creates an empty router.
    ///
    /// With `drag_threshold: None` every press+release is a click, however far
    /// the pointer travelled; `Some(px)` drops clicks after more than `px` of travel.
    pub fn new(drag_threshold: Option<f32>) -> Self {
        Self {
            bindings: Vec::new(),
            next_id: 0,
            pressed: HashSet::new(),
            drags: Vec::new(),
            drag_threshold,
        }
    }

    // ── Registration ───────────────────────────────────────────────

    fn bind(&mut self, trigger: Trigger, handler: Handler<C>) -> BindingId {
        let id = BindingId(self.next_id);
        self.next_id += 1;
        self.bindings.push(Binding {
            id,
            trigger,
            handler,
        });
        id
    }

    /// Fires once when `key` goes from released to pressed.
    pub fn on_key_down<F>(&mut self, key: KeyCode, mut handler: F) -> BindingId
    where
        F: FnMut(&mut C) + Send + Sync + 'static,
    {
        self.bind(
            Trigger::Key(key, KeyPhase::Down),
            Box::new(move |ctx, _| handler(ctx)),
        )
    }

    /// Fires once when `key` goes from pressed to released.
    pub fn on_key_up<F>(&mut self, key: KeyCode, mut handler: F) -> BindingId
    where
        F: FnMut(&mut C) + Send + Sync + 'static,
    {
        self.bind(
            Trigger::Key(key, KeyPhase::Up),
            Box::new(move |ctx, _| handler(ctx)),
        )
    }

    /// Fires on press of `button` with the press position.
    pub fn on_drag_start<F>(&mut self, button: MouseButton, handler: F) -> BindingId
    where
        F: FnMut(&mut C, Vec2) + Send + Sync + 'static,
    {
        self.bind(Trigger::Drag(button, DragPhase::Start), vector(handler))
    }

    /// Fires on every pointer move while `button` is held, with the delta since the previous move.
    pub fn on_drag<F>(&mut self, button: MouseButton, handler: F) -> BindingId
    where
        F: FnMut(&mut C, Vec2) + Send + Sync + 'static,
    {
        self.bind(Trigger::Drag(button, DragPhase::Move), vector(handler))
    }

    /// Fires on release of `button` with the release position.
    pub fn on_drag_end<F>(&mut self, button: MouseButton, handler: F) -> BindingId
    where
        F: FnMut(&mut C, Vec2) + Send + Sync + 'static,
    {
        self.bind(Trigger::Drag(button, DragPhase::End), vector(handler))
    }

    /// Fires after a press+release of `button` that passes the click rule,
    /// with the release position and the viewport at release time.
    pub fn on_click<F>(&mut self, button: MouseButton, handler: F) -> BindingId
    where
        F: FnMut(&mut C, PointerSample) + Send + Sync + 'static,
    {
        self.bind(Trigger::Click(button), pointer(handler))
    }

    /// Fires on every pointer move, pressed or not.
    pub fn on_pointer_move<F>(&mut self, handler: F) -> BindingId
    where
        F: FnMut(&mut C, PointerSample) + Send + Sync + 'static,
    {
        self.bind(Trigger::PointerMove, pointer(handler))
    }

    /// Fires on wheel input with the scrolled line count.
    pub fn on_scroll<F>(&mut self, handler: F) -> BindingId
    where
        F: FnMut(&mut C, f32) + Send + Sync + 'static,
    {
        self.bind(Trigger::Scroll, scalar(handler))
    }

    /// Fires once per [`tick`](Self::tick) with the elapsed seconds, regardless of input state.
    pub fn on_tick<F>(&mut self, handler: F) -> BindingId
    where
        F: FnMut(&mut C, f32) + Send + Sync + 'static,
    {
        self.bind(Trigger::Continuous, scalar(handler))
    }

    /// Removes a binding. Returns `false` if it was already gone.
    pub fn remove(&mut self, id: BindingId) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| b.id != id);
        self.bindings.len() != before
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// `true` when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    // ── State ──────────────────────────────────────────────────────

    /// Whether `key` is currently latched down.
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Keys currently latched down, in no particular order.
    pub fn pressed_keys(&self) -> Vec<KeyCode> {
        self.pressed.iter().copied().collect()
    }

    /// Whether `button` is mid-drag.
    pub fn is_dragging(&self, button: MouseButton) -> bool {
        self.drags.iter().any(|d| d.button == button)
    }

    // ── Dispatch ───────────────────────────────────────────────────

    fn fire(&mut self, trigger: Trigger, payload: Payload, ctx: &mut C) {
        for binding in &mut self.bindings {
            if binding.trigger == trigger {
                (binding.handler)(ctx, payload);
            }
        }
    }

    /// Routes one event. Returns `false` if it was discarded as non-finite.
    pub fn dispatch(&mut self, event: InputEvent, ctx: &mut C) -> bool {
        if !event.is_finite() {
            debug!("discarding non-finite input {event:?}");
            return false;
        }
        match event {
            InputEvent::KeyDown(key) => {
                if self.pressed.insert(key) {
                    self.fire(Trigger::Key(key, KeyPhase::Down), Payload::Nothing, ctx);
                }
            }
            InputEvent::KeyUp(key) => {
                if self.pressed.remove(&key) {
                    self.fire(Trigger::Key(key, KeyPhase::Up), Payload::Nothing, ctx);
                }
            }
            InputEvent::ButtonDown { button, pointer } => {
                if !self.is_dragging(button) {
                    self.drags.push(Drag {
                        button,
                        last: pointer.position,
                        travelled: 0.0,
                    });
                    self.fire(
                        Trigger::Drag(button, DragPhase::Start),
                        Payload::Vector(pointer.position),
                        ctx,
                    );
                }
            }
            InputEvent::PointerMoved(sample) => {
                let mut moved = Vec::new();
                for drag in &mut self.drags {
                    let delta = sample.position - drag.last;
                    drag.last = sample.position;
                    drag.travelled += delta.length();
                    if delta != Vec2::ZERO {
                        moved.push((drag.button, delta));
                    }
                }
                for (button, delta) in moved {
                    self.fire(
                        Trigger::Drag(button, DragPhase::Move),
                        Payload::Vector(delta),
                        ctx,
                    );
                }
                self.fire(Trigger::PointerMove, Payload::Pointer(sample), ctx);
            }
            InputEvent::ButtonUp { button, pointer } => {
                let Some(index) = self.drags.iter().position(|d| d.button == button) else {
                    return true;
                };
                let drag = self.drags.remove(index);
                self.fire(
                    Trigger::Drag(button, DragPhase::End),
                    Payload::Vector(pointer.position),
                    ctx,
                );
                let is_click = self
                    .drag_threshold
                    .is_none_or(|threshold| drag.travelled <= threshold);
                if is_click {
                    self.fire(Trigger::Click(button), Payload::Pointer(pointer), ctx);
                }
            }
            InputEvent::Scroll(lines) => {
                self.fire(Trigger::Scroll, Payload::Scalar(lines), ctx);
            }
        }
        true
    }

    /// Runs every continuous handler once with `elapsed` seconds.
    pub fn tick(&mut self, elapsed: f32, ctx: &mut C) {
        if !elapsed.is_finite() {
            debug!("discarding non-finite tick {elapsed}");
            return;
        }
        self.fire(Trigger::Continuous, Payload::Scalar(elapsed), ctx);
    }
}

fn vector<C: 'static, F>(mut handler: F) -> Handler<C>
where
    F: FnMut(&mut C, Vec2) + Send + Sync + 'static,
{
    Box::new(move |ctx, payload| {
        if let Payload::Vector(v) = payload {
            handler(ctx, v);
        }
    })
}

fn pointer<C: 'static, F>(mut handler: F) -> Handler<C>
where
    F: FnMut(&mut C, PointerSample) + Send + Sync + 'static,
{
    Box::new(move |ctx, payload| {
        if let Payload::Pointer(sample) = payload {
            handler(ctx, sample);
        }
    })
}

fn scalar<C: 'static, F>(mut handler: F) -> Handler<C>
where
    F: FnMut(&mut C, f32) + Send + Sync + 'static,
{
    Box::new(move |ctx, payload| {
        if let Payload::Scalar(s) = payload {
            handler(ctx, s);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every handler call as a string.
    #[derive(Default)]
    struct Log(Vec<String>);

    fn push(ctx: &mut Log, entry: impl Into<String>) {
        ctx.0.push(entry.into());
    }

    fn sample(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(at(x, y))
    }

    fn at(x: f32, y: f32) -> PointerSample {
        PointerSample {
            position: Vec2::new(x, y),
            viewport: Vec2::new(800.0, 600.0),
        }
    }

    fn press(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::ButtonDown {
            button,
            pointer: at(x, y),
        }
    }

    fn release(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::ButtonUp {
            button,
            pointer: at(x, y),
        }
    }

    // ── keyboard ────────────────────────────────────────────────────

    #[test]
    fn key_down_latches() {
        let mut router = InputRouter::<Log>::default();
        router.on_key_down(KeyCode::KeyD, |ctx| push(ctx, "down"));
        let mut log = Log::default();

        router.dispatch(InputEvent::KeyDown(KeyCode::KeyD), &mut log);
        router.dispatch(InputEvent::KeyDown(KeyCode::KeyD), &mut log);
        assert_eq!(log.0, vec!["down"]);
        assert!(router.is_pressed(KeyCode::KeyD));
    }

    #[test]
    fn key_up_fires_only_after_down() {
        let mut router = InputRouter::<Log>::default();
        router.on_key_up(KeyCode::KeyA, |ctx| push(ctx, "up"));
        let mut log = Log::default();

        router.dispatch(InputEvent::KeyUp(KeyCode::KeyA), &mut log);
        assert!(log.0.is_empty());

        router.dispatch(InputEvent::KeyDown(KeyCode::KeyA), &mut log);
        router.dispatch(InputEvent::KeyUp(KeyCode::KeyA), &mut log);
        router.dispatch(InputEvent::KeyUp(KeyCode::KeyA), &mut log);
        assert_eq!(log.0, vec!["up"]);
        assert!(!router.is_pressed(KeyCode::KeyA));
    }

    #[test]
    fn shared_key_fires_in_registration_order() {
        let mut router = InputRouter::<Log>::default();
        router.on_key_down(KeyCode::Space, |ctx| push(ctx, "first"));
        router.on_key_down(KeyCode::Space, |ctx| push(ctx, "second"));
        router.on_key_down(KeyCode::KeyW, |ctx| push(ctx, "other"));
        let mut log = Log::default();

        router.dispatch(InputEvent::KeyDown(KeyCode::Space), &mut log);
        assert_eq!(log.0, vec!["first", "second"]);
    }

    #[test]
    fn keys_latch_independently() {
        let mut router = InputRouter::<Log>::default();
        router.on_key_down(KeyCode::KeyA, |ctx| push(ctx, "a"));
        router.on_key_down(KeyCode::KeyD, |ctx| push(ctx, "d"));
        let mut log = Log::default();

        router.dispatch(InputEvent::KeyDown(KeyCode::KeyA), &mut log);
        router.dispatch(InputEvent::KeyDown(KeyCode::KeyD), &mut log);
        router.dispatch(InputEvent::KeyDown(KeyCode::KeyA), &mut log);
        assert_eq!(log.0, vec!["a", "d"]);
    }

    // ── mouse ───────────────────────────────────────────────────────

    #[test]
    fn drag_reports_incremental_deltas() {
        let mut router = InputRouter::<Log>::default();
        router.on_drag_start(MouseButton::Left, |ctx, p| push(ctx, format!("start {} {}", p.x, p.y)));
        router.on_drag(MouseButton::Left, |ctx, d| push(ctx, format!("move {} {}", d.x, d.y)));
        router.on_drag_end(MouseButton::Left, |ctx, p| push(ctx, format!("end {} {}", p.x, p.y)));
        let mut log = Log::default();

        router.dispatch(press(MouseButton::Left, 10.0, 10.0), &mut log);
        assert!(router.is_dragging(MouseButton::Left));
        router.dispatch(sample(15.0, 10.0), &mut log);
        router.dispatch(sample(15.0, 18.0), &mut log);
        router.dispatch(release(MouseButton::Left, 15.0, 18.0), &mut log);

        assert_eq!(
            log.0,
            vec!["start 10 10", "move 5 0", "move 0 8", "end 15 18"]
        );
        assert!(!router.is_dragging(MouseButton::Left));
    }

    #[test]
    fn moves_without_press_do_not_drag() {
        let mut router = InputRouter::<Log>::default();
        router.on_drag(MouseButton::Right, |ctx, _| push(ctx, "drag"));
        router.on_pointer_move(|ctx, s| push(ctx, format!("ptr {}", s.position.x)));
        let mut log = Log::default();

        router.dispatch(sample(1.0, 1.0), &mut log);
        router.dispatch(sample(2.0, 1.0), &mut log);
        assert_eq!(log.0, vec!["ptr 1", "ptr 2"]);
    }

    #[test]
    fn buttons_drag_independently() {
        let mut router = InputRouter::<Log>::default();
        router.on_drag(MouseButton::Left, |ctx, _| push(ctx, "left"));
        router.on_drag(MouseButton::Right, |ctx, _| push(ctx, "right"));
        let mut log = Log::default();

        router.dispatch(press(MouseButton::Right, 0.0, 0.0), &mut log);
        router.dispatch(sample(3.0, 0.0), &mut log);
        assert_eq!(log.0, vec!["right"]);
    }

    #[test]
    fn click_fires_even_after_large_drag_by_default() {
        let mut router = InputRouter::<Log>::default();
        router.on_click(MouseButton::Left, |ctx, _| push(ctx, "click"));
        let mut log = Log::default();

        router.dispatch(press(MouseButton::Left, 0.0, 0.0), &mut log);
        router.dispatch(sample(300.0, 200.0), &mut log);
        router.dispatch(release(MouseButton::Left, 300.0, 200.0), &mut log);
        assert_eq!(log.0, vec!["click"]);
    }

    #[test]
    fn click_carries_release_viewport() {
        let mut router = InputRouter::<Log>::default();
        router.on_click(MouseButton::Left, |ctx, s| {
            push(ctx, format!("click {} {} {}x{}", s.position.x, s.position.y, s.viewport.x, s.viewport.y))
        });
        let mut log = Log::default();

        router.dispatch(press(MouseButton::Left, 5.0, 6.0), &mut log);
        router.dispatch(
            InputEvent::ButtonUp {
                button: MouseButton::Left,
                pointer: PointerSample {
                    position: Vec2::new(7.0, 8.0),
                    viewport: Vec2::new(1024.0, 768.0),
                },
            },
            &mut log,
        );
        assert_eq!(log.0, vec!["click 7 8 1024x768"]);
    }

    #[test]
    fn drag_threshold_suppresses_click() {
        let mut router = InputRouter::<Log>::new(Some(4.0));
        router.on_click(MouseButton::Left, |ctx, _| push(ctx, "click"));
        let mut log = Log::default();

        router.dispatch(press(MouseButton::Left, 0.0, 0.0), &mut log);
        router.dispatch(sample(3.0, 0.0), &mut log);
        router.dispatch(release(MouseButton::Left, 3.0, 0.0), &mut log);
        assert_eq!(log.0, vec!["click"]);

        router.dispatch(press(MouseButton::Left, 0.0, 0.0), &mut log);
        router.dispatch(sample(3.0, 0.0), &mut log);
        router.dispatch(sample(6.0, 0.0), &mut log);
        router.dispatch(release(MouseButton::Left, 6.0, 0.0), &mut log);
        assert_eq!(log.0, vec!["click"]);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut router = InputRouter::<Log>::default();
        router.on_click(MouseButton::Left, |ctx, _| push(ctx, "click"));
        router.on_drag_end(MouseButton::Left, |ctx, _| push(ctx, "end"));
        let mut log = Log::default();

        assert!(router.dispatch(release(MouseButton::Left, 0.0, 0.0), &mut log));
        assert!(log.0.is_empty());
    }

    #[test]
    fn scroll_passes_lines() {
        let mut router = InputRouter::<Log>::default();
        router.on_scroll(|ctx, lines| push(ctx, format!("scroll {lines}")));
        let mut log = Log::default();

        router.dispatch(InputEvent::Scroll(-2.0), &mut log);
        assert_eq!(log.0, vec!["scroll -2"]);
    }

    // ── boundary ────────────────────────────────────────────────────

    #[test]
    fn non_finite_input_is_discarded() {
        let mut router = InputRouter::<Log>::default();
        router.on_pointer_move(|ctx, _| push(ctx, "ptr"));
        router.on_scroll(|ctx, _| push(ctx, "scroll"));
        router.on_drag_start(MouseButton::Left, |ctx, _| push(ctx, "start"));
        let mut log = Log::default();

        assert!(!router.dispatch(sample(f32::NAN, 0.0), &mut log));
        assert!(!router.dispatch(InputEvent::Scroll(f32::INFINITY), &mut log));
        assert!(!router.dispatch(press(MouseButton::Left, 0.0, f32::NAN), &mut log));
        assert!(log.0.is_empty());
        assert!(!router.is_dragging(MouseButton::Left));
    }

    // ── continuous / removal ────────────────────────────────────────

    #[test]
    fn tick_passes_elapsed_to_every_continuous_handler() {
        let mut router = InputRouter::<Log>::default();
        router.on_tick(|ctx, dt| push(ctx, format!("a {dt}")));
        router.on_key_down(KeyCode::KeyW, |ctx| push(ctx, "key"));
        router.on_tick(|ctx, dt| push(ctx, format!("b {dt}")));
        let mut log = Log::default();

        router.tick(0.25, &mut log);
        assert_eq!(log.0, vec!["a 0.25", "b 0.25"]);
    }

    #[test]
    fn removed_binding_no_longer_fires() {
        let mut router = InputRouter::<Log>::default();
        let id = router.on_key_down(KeyCode::KeyQ, |ctx| push(ctx, "q"));
        router.on_key_down(KeyCode::KeyQ, |ctx| push(ctx, "kept"));
        assert!(router.remove(id));
        assert!(!router.remove(id));
        assert_eq!(router.len(), 1);

        let mut log = Log::default();
        router.dispatch(InputEvent::KeyDown(KeyCode::KeyQ), &mut log);
        assert_eq!(log.0, vec!["kept"]);
    }
}
