//! ECS resources made available to systems.
//!
//! This module groups the long-lived state injected into the world and
//! accessed by the update systems and the world-facing operations.
//!
//! Overview
//! - `backend` – collaborator traits and the bridge resources holding them
//! - `config` – menu layout constants and window size, loadable from INI
//! - `eventbus` – named event records, payloads, counters and subscribers
//! - `headless` – in-memory collaborators for tests and the demo binary
//! - `input` – per-frame cursor position and diagnostic hotkeys
//! - `menus` – active menus keyed by name
//! - `registry` – live instance set, pending buffer and "already sent" set
pub mod backend;
pub mod config;
pub mod eventbus;
pub mod headless;
pub mod input;
pub mod menus;
pub mod registry;
