//! Input routing: a typed binding table fed from Bevy's window messages.
//!
//! [`InputRouter`] knows nothing about Bevy's ECS; the system in this module
//! translates keyboard, mouse and wheel messages into [`InputEvent`]s once per
//! frame, before the frame loop ticks.

mod router;
mod systems;

pub use router::{BindingId, DragPhase, InputEvent, InputRouter, KeyPhase, PointerSample};

use bevy::prelude::*;

use crate::ViewerSet;

/// Feeds window input into the frame loop.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, systems::collect_input.in_set(ViewerSet::Input));
    }
}
