//! The authoritative world store.
//!
//! `WorldStore` exclusively owns the hecs ECS world plus everything the
//! snapshot surface reports: selection, groups, display ordering, the
//! event and chat ring buffers, the simulation clock, and cumulative
//! stats. All external reads and writes go through its methods; the
//! engine serializes access behind a single mutex so every snapshot
//! reflects one consistent instant.

use std::collections::{HashMap, HashSet, VecDeque};

use glam::DVec3;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};
use tracing::debug;

use skywatch_core::commands::SpawnRequest;
use skywatch_core::components::{
    drone_kinematics, target_kinematics, DroneBehavior, Flags, Health, Ident, Kinematics, Nav,
    Stamps, TargetState,
};
use skywatch_core::constants::*;
use skywatch_core::enums::{Affiliation, EntityKind, MessageKind, TargetRole};
use skywatch_core::errors::StoreError;
use skywatch_core::events::{ChatMessage, SimulationEvent};
use skywatch_core::state::WorldSnapshot;
use skywatch_core::types::{epoch_secs, SimClock, WorldStats};

use crate::systems::snapshot;

/// A named collection of entity ids. Membership may go stale when a
/// member is removed; snapshot views filter to live ids.
#[derive(Debug, Clone)]
pub struct EntityGroup {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
    pub created_at: f64,
}

pub struct WorldStore {
    pub(crate) world: World,
    /// Stable string id to ECS entity. The only way external references
    /// reach the world.
    pub(crate) ids: HashMap<String, hecs::Entity>,
    pub(crate) selection: Vec<String>,
    pub(crate) groups: HashMap<String, EntityGroup>,
    /// Persistent display indices, surviving entity removal so a respawn
    /// under the same id keeps its slot.
    entity_order: HashMap<String, usize>,
    group_order: HashMap<String, usize>,
    pub(crate) events: VecDeque<SimulationEvent>,
    pub(crate) messages: VecDeque<ChatMessage>,
    pub(crate) clock: SimClock,
    pub(crate) stats: WorldStats,
    pub(crate) fps: f64,
    frames_this_second: u32,
    last_fps_sample: Option<std::time::Instant>,
}

impl Default for WorldStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldStore {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            ids: HashMap::new(),
            selection: Vec::new(),
            groups: HashMap::new(),
            entity_order: HashMap::new(),
            group_order: HashMap::new(),
            events: VecDeque::new(),
            messages: VecDeque::new(),
            clock: SimClock::default(),
            stats: WorldStats::default(),
            fps: 0.0,
            frames_this_second: 0,
            last_fps_sample: None,
        }
    }

    // --- Entity lifecycle ---

    /// Create an entity from a spawn request. An absent id is generated
    /// from the RNG; a colliding id is an error.
    pub fn create_entity(
        &mut self,
        request: SpawnRequest,
        rng: &mut ChaCha8Rng,
    ) -> Result<String, StoreError> {
        let id = match request.id {
            Some(id) => id,
            None => format!("{}-{:08x}", request.kind.as_str(), rng.gen::<u32>()),
        };
        if self.ids.contains_key(&id) {
            return Err(StoreError::DuplicateEntity(id));
        }

        let now = epoch_secs();
        let props = request.props;

        let mut kin = match request.kind {
            EntityKind::Drone => drone_kinematics(request.position),
            EntityKind::Target => target_kinematics(request.position),
        };
        if let Some(max_speed) = props.max_speed {
            kin.max_speed = max_speed;
        }
        if let Some(radius) = props.detection_radius {
            kin.detection_radius = radius;
        }

        let ident = Ident {
            id: id.clone(),
            kind: request.kind,
        };
        // Steering target starts at the spawn point, so waypoint mode
        // pops its first waypoint on the first tick.
        let mut nav = Nav {
            target_position: request.position,
            waypoints: props.waypoints.into_iter().collect(),
        };
        let stamps = Stamps {
            created_at: now,
            updated_at: now,
        };

        let entity = match request.kind {
            EntityKind::Drone => {
                let mut behavior = DroneBehavior::default();
                if let Some(mode) = props.mode.as_deref() {
                    behavior.set_mode(mode);
                }
                if let Some(distance) = props.follow_distance {
                    behavior.set_follow_distance(distance);
                }
                if let Some(enabled) = props.kamikaze_enabled {
                    behavior.set_kamikaze_enabled(enabled);
                }
                behavior.target_entity = props.target_entity;
                behavior.teammate_entity = props.teammate_entity;
                self.world.spawn((
                    ident,
                    kin,
                    Health::default(),
                    Flags::default(),
                    nav,
                    stamps,
                    behavior,
                ))
            }
            EntityKind::Target => {
                let mut state = TargetState::default();
                if let Some(mode) = props.mode.as_deref() {
                    state.set_mode(mode);
                }
                if let Some(role) = props.role {
                    state.role = role;
                }
                if let Some(affiliation) = props.affiliation {
                    state.affiliation = affiliation;
                }
                if let Some(speed) = props.patrol_speed {
                    state.patrol_speed = speed;
                }
                // Ground unit: pin to the surface from the start.
                kin.position.z = 0.0;
                nav.target_position.z = 0.0;
                self.world.spawn((
                    ident,
                    kin,
                    Health::default(),
                    Flags::default(),
                    nav,
                    stamps,
                    state,
                ))
            }
        };

        self.ids.insert(id.clone(), entity);
        if !self.entity_order.contains_key(&id) {
            let next = self.entity_order.values().copied().max().map_or(0, |m| m + 1);
            self.entity_order.insert(id.clone(), next);
        }
        self.stats.entities_created += 1;
        self.log_event(
            "entity_created",
            Some(&id),
            json!({ "kind": request.kind.as_str() }),
        );
        Ok(id)
    }

    /// Remove an entity entirely. Evicts it from the selection; group
    /// membership is left to go stale and filtered at view time.
    pub fn remove_entity(&mut self, id: &str) -> bool {
        let Some(entity) = self.ids.remove(id) else {
            return false;
        };
        let _ = self.world.despawn(entity);
        self.selection.retain(|s| s != id);
        self.stats.entities_destroyed += 1;
        self.log_event("entity_removed", Some(id), Value::Null);
        true
    }

    pub fn entity_exists(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn entity_count(&self) -> usize {
        self.ids.len()
    }

    pub fn entity_count_by_kind(&self, kind: EntityKind) -> usize {
        self.world
            .query::<&Ident>()
            .iter()
            .filter(|(_, ident)| ident.kind == kind)
            .count()
    }

    /// Ids of entities within `radius` of `center`.
    pub fn find_entities_in_radius(&self, center: DVec3, radius: f64) -> Vec<String> {
        self.world
            .query::<(&Ident, &Kinematics)>()
            .iter()
            .filter(|(_, (_, kin))| kin.position.distance(center) <= radius)
            .map(|(_, (ident, _))| ident.id.clone())
            .collect()
    }

    pub fn get_entity(&self, id: &str) -> Option<skywatch_core::state::EntityView> {
        let entity = *self.ids.get(id)?;
        let mut query = self
            .world
            .query_one::<(
                &Ident,
                &Kinematics,
                &Health,
                &Flags,
                &Nav,
                &Stamps,
                Option<&DroneBehavior>,
                Option<&TargetState>,
            )>(entity)
            .ok()?;
        let item = query.get()?;
        Some(snapshot::entity_view(item, self.order_of(id)))
    }

    pub fn get_entities_by_type(&self, kind: EntityKind) -> Vec<skywatch_core::state::EntityView> {
        let mut query = self.world.query::<(
            &Ident,
            &Kinematics,
            &Health,
            &Flags,
            &Nav,
            &Stamps,
            Option<&DroneBehavior>,
            Option<&TargetState>,
        )>();
        let mut views: Vec<_> = query
            .iter()
            .filter(|(_, item)| item.0.kind == kind)
            .map(|(_, item)| {
                let sort_index = self.order_of(&item.0.id);
                snapshot::entity_view(item, sort_index)
            })
            .collect();
        drop(query);
        views.sort_by(|a, b| a.sort_index.cmp(&b.sort_index).then_with(|| a.id.cmp(&b.id)));
        views
    }

    // --- Selection ---

    /// Select an entity. Returns false for an unknown id and for an
    /// already-selected one; the no-op leaves the selection set and the
    /// event log untouched.
    pub fn select_entity(&mut self, id: &str) -> bool {
        let Some(&entity) = self.ids.get(id) else {
            return false;
        };
        if self.selection.iter().any(|s| s == id) {
            return false;
        }
        if let Ok(flags) = self.world.query_one_mut::<&mut Flags>(entity) {
            flags.selected = true;
        }
        self.selection.push(id.to_string());
        self.log_event("entity_selected", Some(id), Value::Null);
        true
    }

    /// Deselect an entity. Returns false for an unknown id and for a
    /// known id that was never selected.
    pub fn deselect_entity(&mut self, id: &str) -> bool {
        let Some(&entity) = self.ids.get(id) else {
            return false;
        };
        if !self.selection.iter().any(|s| s == id) {
            return false;
        }
        if let Ok(flags) = self.world.query_one_mut::<&mut Flags>(entity) {
            flags.selected = false;
        }
        self.selection.retain(|s| s != id);
        self.log_event("entity_deselected", Some(id), Value::Null);
        true
    }

    pub fn clear_selection(&mut self) {
        for (_, flags) in self.world.query_mut::<&mut Flags>() {
            flags.selected = false;
        }
        self.selection.clear();
        self.log_event("selection_cleared", None, Value::Null);
    }

    pub fn selected_entities(&self) -> &[String] {
        &self.selection
    }

    // --- Groups ---

    /// Create a group. Members are deduplicated and unknown ids silently
    /// dropped; a colliding group id is an error.
    pub fn create_group(
        &mut self,
        id: Option<String>,
        name: &str,
        members: &[String],
        rng: &mut ChaCha8Rng,
    ) -> Result<String, StoreError> {
        let id = match id {
            Some(id) => id,
            None => format!("group-{:08x}", rng.gen::<u32>()),
        };
        if self.groups.contains_key(&id) {
            return Err(StoreError::DuplicateGroup(id));
        }

        let members = self.sanitize_members(members);
        let group = EntityGroup {
            id: id.clone(),
            name: name.to_string(),
            members,
            created_at: epoch_secs(),
        };
        self.groups.insert(id.clone(), group);
        let next = self.group_order.values().copied().max().map_or(0, |m| m + 1);
        self.group_order.entry(id.clone()).or_insert(next);
        self.log_event("group_created", None, json!({ "group_id": id }));
        Ok(id)
    }

    pub fn update_group(
        &mut self,
        id: &str,
        name: Option<&str>,
        members: Option<&[String]>,
    ) -> Result<(), StoreError> {
        let members = members.map(|m| self.sanitize_members(m));
        let group = self
            .groups
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownGroup(id.to_string()))?;
        if let Some(name) = name {
            group.name = name.to_string();
        }
        if let Some(members) = members {
            group.members = members;
        }
        self.log_event("group_updated", None, json!({ "group_id": id }));
        Ok(())
    }

    pub fn delete_group(&mut self, id: &str) -> bool {
        if self.groups.remove(id).is_none() {
            return false;
        }
        self.group_order.remove(id);
        self.log_event("group_deleted", None, json!({ "group_id": id }));
        true
    }

    /// Prune dead member ids from every group, then drop any group left
    /// with no members at all. Returns the removed group ids.
    pub fn cleanup_empty_groups(&mut self) -> Vec<String> {
        let live: HashSet<&String> = self.ids.keys().collect();
        let mut empty = Vec::new();
        for group in self.groups.values_mut() {
            group.members.retain(|m| live.contains(m));
            if group.members.is_empty() {
                empty.push(group.id.clone());
            }
        }
        for id in &empty {
            self.groups.remove(id);
            self.group_order.remove(id);
            self.log_event("group_deleted", None, json!({ "group_id": id }));
        }
        empty
    }

    fn sanitize_members(&self, members: &[String]) -> Vec<String> {
        let mut seen = Vec::new();
        for member in members {
            if self.ids.contains_key(member) && !seen.contains(member) {
                seen.push(member.clone());
            }
        }
        seen
    }

    // --- Display ordering ---

    /// Persist a dense 0-based display order for the given entity ids.
    /// Indices survive entity removal; no compaction happens.
    pub fn set_entity_order(&mut self, ids: &[String]) {
        for (index, id) in ids.iter().enumerate() {
            self.entity_order.insert(id.clone(), index);
        }
    }

    pub fn set_group_order(&mut self, ids: &[String]) {
        for (index, id) in ids.iter().enumerate() {
            self.group_order.insert(id.clone(), index);
        }
    }

    pub(crate) fn order_of(&self, id: &str) -> usize {
        self.entity_order.get(id).copied().unwrap_or(0)
    }

    pub(crate) fn group_order_of(&self, id: &str) -> usize {
        self.group_order.get(id).copied().unwrap_or(0)
    }

    // --- Logs ---

    /// Append an event, evicting the oldest past capacity. Never fails.
    pub fn log_event(&mut self, event_type: &str, entity_id: Option<&str>, data: Value) {
        self.events.push_back(SimulationEvent::new(
            epoch_secs(),
            event_type,
            entity_id.map(str::to_string),
            data,
        ));
        while self.events.len() > MAX_EVENTS {
            self.events.pop_front();
        }
        self.stats.events_logged += 1;
    }

    pub fn add_chat_message(&mut self, sender: &str, message: &str, kind: MessageKind) {
        self.messages.push_back(ChatMessage {
            timestamp: epoch_secs(),
            sender: sender.to_string(),
            message: message.to_string(),
            message_type: kind,
        });
        while self.messages.len() > MAX_MESSAGES {
            self.messages.pop_front();
        }
        self.stats.messages_sent += 1;
    }

    /// Most recent `n` events, oldest first.
    pub fn get_recent_events(&self, n: usize) -> Vec<SimulationEvent> {
        let skip = self.events.len().saturating_sub(n);
        self.events.iter().skip(skip).cloned().collect()
    }

    pub fn get_recent_messages(&self, n: usize) -> Vec<ChatMessage> {
        let skip = self.messages.len().saturating_sub(n);
        self.messages.iter().skip(skip).cloned().collect()
    }

    // --- Clock ---

    /// Advance the simulation clock by one effective timestep and feed
    /// the steps-per-wall-second counter.
    pub fn update_clock(&mut self, dt: f64) {
        self.clock.advance(dt);
        self.frames_this_second += 1;
        let now = std::time::Instant::now();
        match self.last_fps_sample {
            None => self.last_fps_sample = Some(now),
            Some(since) => {
                let elapsed = now.duration_since(since).as_secs_f64();
                if elapsed >= 1.0 {
                    self.fps = self.frames_this_second as f64 / elapsed;
                    self.frames_this_second = 0;
                    self.last_fps_sample = Some(now);
                }
            }
        }
    }

    pub fn clock(&self) -> SimClock {
        self.clock
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.clock.set_speed(speed);
    }

    pub fn stats(&self) -> WorldStats {
        self.stats
    }

    // --- Snapshots ---

    /// Build a complete, self-contained snapshot of the current state.
    pub fn get_state_snapshot(&self) -> WorldSnapshot {
        snapshot::build(self)
    }

    /// Restore the store from a snapshot, all-or-nothing: the new world
    /// is built aside and swapped in only when every record validates.
    /// On failure live state is untouched and a `state_load_error` event
    /// is logged.
    pub fn load_state_snapshot(&mut self, snap: &WorldSnapshot) -> Result<(), StoreError> {
        match self.build_from_snapshot(snap) {
            Ok((world, ids, entity_order)) => {
                self.world = world;
                self.ids = ids;
                self.entity_order = entity_order;
                self.selection = snap
                    .selected_entities
                    .iter()
                    .filter(|id| self.ids.contains_key(*id))
                    .cloned()
                    .collect();
                self.groups = snap
                    .groups
                    .iter()
                    .map(|g| {
                        (
                            g.id.clone(),
                            EntityGroup {
                                id: g.id.clone(),
                                name: g.name.clone(),
                                members: g.members.clone(),
                                created_at: g.created_at,
                            },
                        )
                    })
                    .collect();
                self.group_order = snap
                    .groups
                    .iter()
                    .map(|g| (g.id.clone(), g.sort_index))
                    .collect();
                self.clock.set_speed(snap.simulation_speed);
                self.clock.elapsed_secs = snap.simulation_time;
                self.stats = snap.stats;
                self.log_event("state_loaded", None, json!({ "entities": snap.entities.len() }));
                Ok(())
            }
            Err(err) => {
                self.log_event("state_load_error", None, json!({ "error": err.to_string() }));
                Err(err)
            }
        }
    }

    #[allow(clippy::type_complexity)]
    fn build_from_snapshot(
        &self,
        snap: &WorldSnapshot,
    ) -> Result<(World, HashMap<String, hecs::Entity>, HashMap<String, usize>), StoreError> {
        let mut world = World::new();
        let mut ids = HashMap::new();
        let mut entity_order = HashMap::new();

        for view in &snap.entities {
            if ids.contains_key(&view.id) {
                return Err(StoreError::InvalidSnapshot(format!(
                    "duplicate entity id {}",
                    view.id
                )));
            }

            let ident = Ident {
                id: view.id.clone(),
                kind: view.kind,
            };
            let kin = Kinematics {
                position: view.position.to_vec3(),
                velocity: view.velocity.to_vec3(),
                heading: view.heading,
                max_speed: view.max_speed,
                detection_radius: view.detection_radius,
                collision_radius: view.collision_radius,
            };
            let health = Health {
                value: view.health,
                destroyed: view.destroyed,
                // Restored wrecks get a fresh retention window.
                destroyed_at: if view.destroyed { snap.simulation_time } else { -1.0 },
            };
            let flags = Flags {
                detected: view.detected,
                selected: view.selected,
            };
            let nav = Nav {
                target_position: view.target_position.to_vec3(),
                waypoints: view.waypoints.iter().map(|w| w.to_vec3()).collect(),
            };
            let stamps = Stamps {
                created_at: view.created_at,
                updated_at: view.updated_at,
            };

            let entity = match view.kind {
                EntityKind::Drone => {
                    let dv = view.drone.as_ref().ok_or_else(|| {
                        StoreError::InvalidSnapshot(format!("drone {} missing drone fields", view.id))
                    })?;
                    let mut behavior = DroneBehavior {
                        target_entity: dv.target_entity_id.clone(),
                        teammate_entity: dv.teammate_entity_id.clone(),
                        follow_distance: dv.follow_distance,
                        kamikaze_enabled: dv.kamikaze_enabled,
                        hunting_range: dv.hunting_range,
                        turn_rate: dv.turn_rate,
                        approach_threshold: dv.approach_threshold,
                        patrol_radius: dv.patrol_radius,
                        engagement_range: dv.engagement_range,
                        ..DroneBehavior::default()
                    };
                    if !behavior.set_mode(&view.mode) {
                        return Err(StoreError::InvalidSnapshot(format!(
                            "unknown drone mode {:?} on {}",
                            view.mode, view.id
                        )));
                    }
                    world.spawn((ident, kin, health, flags, nav, stamps, behavior))
                }
                EntityKind::Target => {
                    let tv = view.target.as_ref().ok_or_else(|| {
                        StoreError::InvalidSnapshot(format!(
                            "target {} missing target fields",
                            view.id
                        ))
                    })?;
                    let role = TargetRole::parse(&tv.role).ok_or_else(|| {
                        StoreError::InvalidSnapshot(format!("unknown role {:?}", tv.role))
                    })?;
                    let affiliation = Affiliation::parse(&tv.affiliation).ok_or_else(|| {
                        StoreError::InvalidSnapshot(format!(
                            "unknown affiliation {:?}",
                            tv.affiliation
                        ))
                    })?;
                    let mut state = TargetState {
                        observed_velocity: tv.observed_velocity.to_vec3(),
                        last_seen: tv.last_seen,
                        confidence: tv.confidence,
                        role,
                        affiliation,
                        moving: tv.is_moving,
                        targeted: tv.is_targeted,
                        patrol_speed: tv.patrol_speed,
                        turn_rate: tv.target_turn_rate,
                        approach_threshold: tv.target_approach_threshold,
                        first_detected: tv.first_detected,
                        detection_count: tv.detection_count,
                        ..TargetState::default()
                    };
                    if !state.set_mode(&view.mode) {
                        return Err(StoreError::InvalidSnapshot(format!(
                            "unknown target mode {:?} on {}",
                            view.mode, view.id
                        )));
                    }
                    world.spawn((ident, kin, health, flags, nav, stamps, state))
                }
            };
            ids.insert(view.id.clone(), entity);
            entity_order.insert(view.id.clone(), view.sort_index);
        }

        Ok((world, ids, entity_order))
    }

    /// Drop everything: entities, selection, groups, logs, clock, stats.
    /// The speed multiplier is the one setting that survives.
    pub fn clear_all_state(&mut self) {
        self.world = World::new();
        self.ids.clear();
        self.selection.clear();
        self.groups.clear();
        self.entity_order.clear();
        self.group_order.clear();
        self.events.clear();
        self.messages.clear();
        let speed = self.clock.speed;
        self.clock = SimClock::default();
        self.clock.speed = speed;
        self.stats = WorldStats::default();
        self.log_event("state_cleared", None, Value::Null);
    }

    // --- Direct per-entity commands ---

    /// Set a behavior mode by wire name. Unknown ids and invalid names
    /// for the entity's kind return false without side effects.
    pub fn set_mode(&mut self, id: &str, mode: &str) -> bool {
        let Some(&entity) = self.ids.get(id) else {
            return false;
        };
        let now = epoch_secs();
        if let Ok((behavior, stamps)) = self
            .world
            .query_one_mut::<(&mut DroneBehavior, &mut Stamps)>(entity)
        {
            if behavior.set_mode(mode) {
                stamps.updated_at = now;
                return true;
            }
            return false;
        }
        if let Ok((state, stamps)) = self
            .world
            .query_one_mut::<(&mut TargetState, &mut Stamps)>(entity)
        {
            if state.set_mode(mode) {
                stamps.updated_at = now;
                return true;
            }
        }
        false
    }

    pub fn add_waypoint(&mut self, id: &str, waypoint: DVec3) -> bool {
        self.with_nav(id, |nav| nav.add_waypoint(waypoint))
    }

    pub fn clear_waypoints(&mut self, id: &str) -> bool {
        self.with_nav(id, Nav::clear_waypoints)
    }

    pub fn set_target_position(&mut self, id: &str, position: DVec3) -> bool {
        self.with_nav(id, |nav| nav.target_position = position)
    }

    pub fn set_target_entity(&mut self, id: &str, target: Option<String>) -> bool {
        self.with_drone(id, |drone| drone.target_entity = target)
    }

    pub fn set_teammate_entity(&mut self, id: &str, teammate: Option<String>) -> bool {
        self.with_drone(id, |drone| drone.teammate_entity = teammate)
    }

    pub fn set_follow_distance(&mut self, id: &str, distance: f64) -> bool {
        self.with_drone(id, |drone| drone.set_follow_distance(distance))
    }

    pub fn set_kamikaze_enabled(&mut self, id: &str, enabled: bool) -> bool {
        self.with_drone(id, |drone| drone.set_kamikaze_enabled(enabled))
    }

    pub fn set_role(&mut self, id: &str, role: TargetRole) -> bool {
        self.with_target(id, |state| state.role = role)
    }

    pub fn set_affiliation(&mut self, id: &str, affiliation: Affiliation) -> bool {
        self.with_target(id, |state| state.affiliation = affiliation)
    }

    pub fn set_targeted(&mut self, id: &str, targeted: bool) -> bool {
        self.with_target(id, |state| state.targeted = targeted)
    }

    pub fn apply_damage(&mut self, id: &str, damage: f64) -> bool {
        let Some(&entity) = self.ids.get(id) else {
            return false;
        };
        let now = epoch_secs();
        let sim_time = self.clock.elapsed_secs;
        if let Ok((health, stamps)) = self
            .world
            .query_one_mut::<(&mut Health, &mut Stamps)>(entity)
        {
            let was_destroyed = health.destroyed;
            health.apply_damage(damage);
            stamps.updated_at = now;
            if health.destroyed && !was_destroyed {
                health.destroyed_at = sim_time;
                debug!(id, "entity destroyed");
            }
            return true;
        }
        false
    }

    pub fn heal(&mut self, id: &str, amount: f64) -> bool {
        let Some(&entity) = self.ids.get(id) else {
            return false;
        };
        let now = epoch_secs();
        if let Ok((health, stamps)) = self
            .world
            .query_one_mut::<(&mut Health, &mut Stamps)>(entity)
        {
            health.heal(amount);
            stamps.updated_at = now;
            return true;
        }
        false
    }

    fn with_nav(&mut self, id: &str, f: impl FnOnce(&mut Nav)) -> bool {
        let Some(&entity) = self.ids.get(id) else {
            return false;
        };
        let now = epoch_secs();
        if let Ok((nav, stamps)) = self.world.query_one_mut::<(&mut Nav, &mut Stamps)>(entity) {
            f(nav);
            stamps.updated_at = now;
            return true;
        }
        false
    }

    fn with_drone(&mut self, id: &str, f: impl FnOnce(&mut DroneBehavior)) -> bool {
        let Some(&entity) = self.ids.get(id) else {
            return false;
        };
        let now = epoch_secs();
        if let Ok((drone, stamps)) = self
            .world
            .query_one_mut::<(&mut DroneBehavior, &mut Stamps)>(entity)
        {
            f(drone);
            stamps.updated_at = now;
            return true;
        }
        false
    }

    fn with_target(&mut self, id: &str, f: impl FnOnce(&mut TargetState)) -> bool {
        let Some(&entity) = self.ids.get(id) else {
            return false;
        };
        let now = epoch_secs();
        if let Ok((state, stamps)) = self
            .world
            .query_one_mut::<(&mut TargetState, &mut Stamps)>(entity)
        {
            f(state);
            stamps.updated_at = now;
            return true;
        }
        false
    }
}
