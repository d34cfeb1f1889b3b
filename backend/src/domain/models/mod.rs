//! Domain models: organisation-scoped records plus the enums they carry.

pub mod affiliate;
pub mod attendance;
pub mod child;
pub mod consent;
pub mod daily_update;
pub mod evidence;
pub mod guardian;
pub mod incident;
pub mod invoice;
pub mod organisation;
pub mod task;

use uuid::Uuid;

/// Generate a fresh entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
