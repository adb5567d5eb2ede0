//! Core systems and the world-facing operations behind them.
//!
//! Each submodule pairs the operations a host calls directly (taking
//! `&mut World`) with the per-frame update step run by the schedule built in
//! [`crate::scene::update_schedule`].
//!
//! Submodules overview
//! - [`drag`] – drag-and-drop state machine over drag-eligible entities
//! - [`eventbus`] – register, listen, dispatch, enable/disable and remove events
//! - [`input`] – poll the input collaborator into [`crate::resources::input::InputState`]
//!   and per-entity [`crate::components::mouse::MouseState`]
//! - [`menu`] – menu widgets: construction, layout, selection and reactions
//! - [`registry`] – entity lifecycle: create, add/flush, remove, copy, refresh
//! - [`ui`] – texture/font loading and text entity helpers

pub mod drag;
pub mod eventbus;
pub mod input;
pub mod menu;
pub mod registry;
pub mod ui;
