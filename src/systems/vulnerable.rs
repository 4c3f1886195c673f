use bevy_ecs::event::EventWriter;
use bevy_ecs::system::{Query, ResMut};
use tracing::debug;

use crate::events::GameEvent;
use crate::systems::components::{GhostMode, PowerTimer};

/// Decrements the frightened countdown and, when it runs out, returns every still
/// frightened ghost to Normal. Eaten ghosts stay Eaten.
pub fn power_timer_system(
    mut timer: ResMut<PowerTimer>,
    mut ghosts: Query<&mut GhostMode>,
    mut events: EventWriter<GameEvent>,
) {
    if timer.remaining_ticks == 0 {
        return;
    }

    timer.remaining_ticks -= 1;
    if timer.remaining_ticks > 0 {
        return;
    }

    let mut calmed = 0;
    for mut mode in ghosts.iter_mut() {
        if *mode == GhostMode::Frightened {
            *mode = GhostMode::Normal;
            calmed += 1;
        }
    }
    debug!(calmed, "Frightened countdown expired");
    events.write(GameEvent::FrightenedEnded);
}
