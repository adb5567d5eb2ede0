//! Events published by the drag controller.
//!
//! Both carry [`EventPayload::Entity`](super::payload::EventPayload::Entity)
//! with the entity whose drag state changed. They are registered by
//! [`drag::setup`](crate::systems::drag::setup).

/// Published when an entity enters the dragging state.
pub const EVENT_START_DRAG: &str = "EventStartDrag";
/// Published when an entity leaves the dragging state.
pub const EVENT_STOP_DRAG: &str = "EventStopDrag";
