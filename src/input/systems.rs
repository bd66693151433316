use bevy::input::ButtonState;
use bevy::input::keyboard::{KeyboardFocusLost, KeyboardInput};
use bevy::input::mouse::{MouseButtonInput, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};

use super::router::{InputEvent, PointerSample};
use crate::frame::FrameLoop;

/// Pixels per scroll line for touchpads reporting pixel deltas.
const PIXELS_PER_LINE: f32 = 40.0;

/// Drains this frame's window input into the frame loop's router.
///
/// Message kinds arrive in separate queues, so a frame is replayed as:
/// keys, presses (at the cursor position from the previous frame), cursor
/// moves, wheel, releases.
#[allow(clippy::too_many_arguments)]
pub fn collect_input(
    mut frame_loop: ResMut<FrameLoop>,
    mut keyboard: MessageReader<KeyboardInput>,
    mut focus_lost: MessageReader<KeyboardFocusLost>,
    mut buttons: MessageReader<MouseButtonInput>,
    mut cursor: MessageReader<CursorMoved>,
    mut wheel: MessageReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut last_cursor: Local<Option<Vec2>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let viewport = window.size();

    for ev in keyboard.read() {
        let event = match ev.state {
            ButtonState::Pressed => InputEvent::KeyDown(ev.key_code),
            ButtonState::Released => InputEvent::KeyUp(ev.key_code),
        };
        frame_loop.dispatch(event);
    }
    if focus_lost.read().count() > 0 {
        frame_loop.release_all_keys();
    }

    let mut releases = Vec::new();
    let press_position = last_cursor
        .or_else(|| window.cursor_position())
        .unwrap_or(Vec2::ZERO);
    for ev in buttons.read() {
        match ev.state {
            ButtonState::Pressed => {
                frame_loop.dispatch(InputEvent::ButtonDown {
                    button: ev.button,
                    pointer: PointerSample {
                        position: press_position,
                        viewport,
                    },
                });
            }
            ButtonState::Released => releases.push(ev.button),
        }
    }

    for ev in cursor.read() {
        *last_cursor = Some(ev.position);
        frame_loop.dispatch(InputEvent::PointerMoved(PointerSample {
            position: ev.position,
            viewport,
        }));
    }

    for ev in wheel.read() {
        let lines = match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / PIXELS_PER_LINE,
        };
        frame_loop.dispatch(InputEvent::Scroll(lines));
    }

    let release_position = last_cursor.unwrap_or(press_position);
    for button in releases {
        frame_loop.dispatch(InputEvent::ButtonUp {
            button,
            pointer: PointerSample {
                position: release_position,
                viewport,
            },
        });
    }
}
