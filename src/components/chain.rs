//! Processing chain links.
//!
//! A [`Chain`] is an auxiliary doubly-linked list built by
//! [`registry::add`](crate::systems::registry::add) over a parent and its
//! tree children (parent -> first child -> ... -> last child). It is separate
//! from the `ChildOf`/`Children` tree and owns nothing: both links are plain
//! identities resolved through the world.

use bevy_ecs::prelude::{Component, Entity};

#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Chain {
    pub prev: Option<Entity>,
    pub next: Option<Entity>,
}
