//! Destroyed-entity cleanup: wrecks linger briefly so observers see the
//! destruction, then leave the world for good.

use skywatch_core::components::{Health, Ident};
use skywatch_core::constants::DESTROYED_RETENTION_SECS;

use crate::store::WorldStore;

/// Collect the ids of destroyed entities whose retention window has
/// expired. The caller routes them through the normal destroy queue so
/// removal bookkeeping stays in one place.
pub fn expired_wrecks(store: &mut WorldStore, sim_time: f64) -> Vec<String> {
    let mut expired = Vec::new();
    for (_, (ident, health)) in store.world.query_mut::<(&Ident, &Health)>() {
        if health.destroyed && sim_time - health.destroyed_at >= DESTROYED_RETENTION_SECS {
            expired.push(ident.id.clone());
        }
    }
    expired
}
