//! Snapshot assembly: the store's live state rendered into the
//! serialized view structs, every float sanitized on the way out.

use skywatch_core::components::{
    DroneBehavior, Flags, Health, Ident, Kinematics, Nav, Stamps, TargetState,
};
use skywatch_core::constants::{SNAPSHOT_EVENT_COUNT, SNAPSHOT_MESSAGE_COUNT};
use skywatch_core::state::{DroneView, EntityView, GroupView, TargetView, WorldSnapshot};
use skywatch_core::types::{safe_float, Vec3View};

use crate::store::WorldStore;

/// Build a complete snapshot in one pass over the store.
pub(crate) fn build(store: &WorldStore) -> WorldSnapshot {
    let mut query = store.world.query::<(
        &Ident,
        &Kinematics,
        &Health,
        &Flags,
        &Nav,
        &Stamps,
        Option<&DroneBehavior>,
        Option<&TargetState>,
    )>();
    let mut entities: Vec<EntityView> = query
        .iter()
        .map(|(_, item)| {
            let sort_index = store.order_of(&item.0.id);
            entity_view(item, sort_index)
        })
        .collect();
    drop(query);
    entities.sort_by(|a, b| a.sort_index.cmp(&b.sort_index).then_with(|| a.id.cmp(&b.id)));

    let mut groups: Vec<GroupView> = store
        .groups
        .values()
        .map(|group| GroupView {
            id: group.id.clone(),
            name: group.name.clone(),
            // Stale membership never leaves the store.
            members: group
                .members
                .iter()
                .filter(|m| store.ids.contains_key(*m))
                .cloned()
                .collect(),
            created_at: safe_float(group.created_at),
            sort_index: store.group_order_of(&group.id),
        })
        .collect();
    groups.sort_by(|a, b| a.sort_index.cmp(&b.sort_index).then_with(|| a.id.cmp(&b.id)));

    WorldSnapshot {
        entities,
        groups,
        selected_entities: store.selection.clone(),
        simulation_running: store.clock.running,
        simulation_speed: safe_float(store.clock.speed),
        simulation_time: safe_float(store.clock.elapsed_secs),
        fps: safe_float(store.fps),
        stats: store.stats,
        recent_events: store.get_recent_events(SNAPSHOT_EVENT_COUNT),
        recent_messages: store.get_recent_messages(SNAPSHOT_MESSAGE_COUNT),
    }
}

/// Render one entity's components into its serialized view.
#[allow(clippy::type_complexity)]
pub(crate) fn entity_view(
    (ident, kin, health, flags, nav, stamps, drone, target): (
        &Ident,
        &Kinematics,
        &Health,
        &Flags,
        &Nav,
        &Stamps,
        Option<&DroneBehavior>,
        Option<&TargetState>,
    ),
    sort_index: usize,
) -> EntityView {
    let mode = match (drone, target) {
        (Some(d), _) => d.mode.as_str().to_string(),
        (_, Some(t)) => t.mode.as_str().to_string(),
        _ => String::new(),
    };

    EntityView {
        id: ident.id.clone(),
        kind: ident.kind,
        position: Vec3View::from(kin.position),
        heading: safe_float(kin.heading),
        velocity: Vec3View::from(kin.velocity),
        max_speed: safe_float(kin.max_speed),
        detection_radius: safe_float(kin.detection_radius),
        collision_radius: safe_float(kin.collision_radius),
        health: safe_float(health.value),
        detected: flags.detected,
        selected: flags.selected,
        destroyed: health.destroyed,
        target_position: Vec3View::from(nav.target_position),
        waypoints: nav.waypoints.iter().map(|w| Vec3View::from(*w)).collect(),
        mode,
        created_at: safe_float(stamps.created_at),
        updated_at: safe_float(stamps.updated_at),
        sort_index,
        drone: drone.map(|d| DroneView {
            target_entity_id: d.target_entity.clone(),
            teammate_entity_id: d.teammate_entity.clone(),
            follow_distance: safe_float(d.follow_distance),
            kamikaze_enabled: d.kamikaze_enabled,
            hunting_range: safe_float(d.hunting_range),
            turn_rate: safe_float(d.turn_rate),
            approach_threshold: safe_float(d.approach_threshold),
            patrol_radius: safe_float(d.patrol_radius),
            engagement_range: safe_float(d.engagement_range),
        }),
        target: target.map(|t| TargetView {
            observed_velocity: Vec3View::from(t.observed_velocity),
            last_seen: safe_float(t.last_seen),
            confidence: safe_float(t.confidence),
            role: t.role.as_str().to_string(),
            affiliation: t.affiliation.as_str().to_string(),
            is_moving: t.moving,
            is_targeted: t.targeted,
            patrol_speed: safe_float(t.patrol_speed),
            target_turn_rate: safe_float(t.turn_rate),
            target_approach_threshold: safe_float(t.approach_threshold),
            first_detected: safe_float(t.first_detected),
            detection_count: t.detection_count,
        }),
    }
}
