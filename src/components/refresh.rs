//! Marker for entities whose children are re-scanned every frame.
//!
//! [`registry_update`](crate::systems::registry::registry_update) calls
//! [`refresh`](crate::systems::registry::refresh) on each entity carrying
//! [`AutoRefresh`], so children attached after the parent was flushed still
//! reach the render and input collaborators.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct AutoRefresh;
