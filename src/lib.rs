//! Isometric room rendering and furniture placement engine for the memory palace.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It projects
//! an `N×N` room grid and its two back walls into a rotatable, pannable
//! isometric scene, resolves pointer positions back into floor cells and wall
//! slots, validates and previews furniture placement, and draws the room with
//! a two-bucket painter's algorithm. The host JavaScript layer owns every
//! placement: it feeds snapshots in, wires DOM events to the engine, and
//! persists whatever [`engine::Action`]s come back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`catalog`] | Furniture catalog, placements, and room data types |
//! | [`config`] | Room configuration (house levels, tile and wall sizes) |
//! | [`camera`] | Pan/rotate camera and screen ⇄ scene conversion |
//! | [`iso`] | Grid ⇄ scene isometric projection and wall anchors |
//! | [`placement`] | Footprints and placement validation |
//! | [`hit`] | Floor, wall and placed-item hit-testing |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`scene`] | Depth-sorted draw list |
//! | [`primitive`] | Box faces, shading and sprite layout |
//! | [`render`] | Scene rendering to a `Canvas2D` context |
//! | [`consts`] | Shared constants (grid sizes, thresholds, colours) |

pub mod camera;
pub mod catalog;
pub mod config;
pub mod consts;
pub mod engine;
pub mod hit;
pub mod input;
pub mod iso;
pub mod placement;
pub mod primitive;
pub mod render;
pub mod scene;
