//! Tack Headless Host
//!
//! Runs the sticky boundary detector without a real UI toolkit:
//!
//! - [`HeadlessHost`] - an in-memory document with one scroll container that
//!   implements intersection observation and style reading
//! - [`Scene`] - stacks boundary sections described by a [`SceneSpec`],
//!   lays out their markers from the computed geometry and replays scroll
//!   positions, recording every transition
//!
//! # Example
//!
//! ```rust
//! use tack_headless::{Scene, SceneSpec};
//!
//! let spec = SceneSpec::from_toml(r#"
//!     leading_space = "670px"
//!
//!     [[section]]
//!     name = "header"
//!     height = "1000px"
//!     target = { margin_top = "20px", height = "100px" }
//! "#).unwrap();
//!
//! let mut scene = Scene::build(&spec).unwrap();
//! assert!(scene.scroll_to(600.0).is_empty());
//! assert_eq!(scene.scroll_to(660.0).len(), 1);
//! ```

mod error;
mod host;
mod scene;

pub use error::{Result, SceneError};
pub use host::HeadlessHost;
pub use scene::{
    FontSpec, GeometryReport, Scene, SceneEvent, SceneSection, SceneSpec, SectionSpec,
    TargetSpec, ViewportSpec,
};
