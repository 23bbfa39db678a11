//! Scene object registry and interaction pipeline for the browser 3D editor.
//!
//! This crate owns the editor state that sits between raw input and the
//! rendering engine: which primitives exist and which renderable each one is
//! bound to, what is selected or hovered, where a pointer lands in the world,
//! and which transform gizmo is attached. Drawing is delegated entirely to a
//! [`backend::RenderBackend`] implementation supplied by the host; the host
//! feeds [`input::InputEvent`]s into [`editor::EditorCore`] and reacts to the
//! returned [`editor::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`editor`] | Event dispatcher owning the editor context ([`editor::EditorCore`]) |
//! | [`registry`] | Id ↔ handle registry of scene objects |
//! | [`selection`] | Selected / hovered tracking and highlight bookkeeping |
//! | [`picking`] | Screen-point picking with ground-plane fallback |
//! | [`transform`] | Transform gizmo mode and attachment state machine |
//! | [`scene`] | Scene object records, primitive kinds and defaults |
//! | [`backend`] | Rendering collaborator contract and its value types |
//! | [`headless`] | In-memory backend that records every call |
//! | [`input`] | Input events, tools, and the touch gesture classifier |
//! | [`config`] | Editor configuration |
//! | [`consts`] | Shared numeric constants (thresholds, snaps, colors) |
//! | `web` | `wasm-bindgen` wrapper, behind the `web` feature |

pub mod backend;
pub mod config;
pub mod consts;
pub mod editor;
pub mod headless;
pub mod input;
pub mod picking;
pub mod registry;
pub mod scene;
pub mod selection;
pub mod transform;

#[cfg(feature = "web")]
pub mod web;
