//! ECS components for managed entities.
//!
//! Every entity created by the
//! [`EntityRegistry`](crate::resources::registry::EntityRegistry) carries the
//! full set of state below; the tree relation uses bevy's own
//! `ChildOf`/`Children`.
//!
//! Submodules overview:
//! - [`chain`] – auxiliary prev/next links built when entities are added together
//! - [`color`] – RGBA color used for text styling
//! - [`draggable`] – drag offset, active-drag flag and drag eligibility
//! - [`menu`] – the menu record (container, cursor, selection, disabled items)
//! - [`mouse`] – per-frame hover/click/release flags from the input collaborator
//! - [`reference`] – diagnostic label
//! - [`refresh`] – marker for entities whose children are re-scanned each frame
//! - [`render`] – drawable handle, visibility and scale
//! - [`space`] – axis-aligned position and size
//! - [`zindex`] – rendering order hint and UI layers

pub mod chain;
pub mod color;
pub mod draggable;
pub mod menu;
pub mod mouse;
pub mod reference;
pub mod refresh;
pub mod render;
pub mod space;
pub mod zindex;
