//! Map rendering contract.
//!
//! The coordinator never talks to a map library. Renderers turn a
//! [`NavigationSnapshot`](crate::navigation::NavigationSnapshot) into a
//! [`RenderPlan`], feed it through a [`LayerTracker`] to learn which layers
//! changed, and report user clicks back as [`MapEvent`]s.
//!
//! ```ignore
//! let mut tracker = LayerTracker::new();
//! let mut snapshots = coordinator.subscribe();
//! while snapshots.changed().await.is_ok() {
//!     let plan = RenderPlan::from_state(&snapshots.borrow_and_update().state);
//!     let changes = tracker.diff(&plan);
//!     renderer.apply(&plan, &changes);
//! }
//! ```

mod plan;
pub mod style;
mod tracker;

pub use plan::{
    Camera, Layer, LayerGeometry, LayerId, LayerRole, LayerVariant, RenderPlan, DEFAULT_CENTER,
    DEFAULT_ZOOM, LIVE_PADDING, TEST_PADDING,
};
pub use style::{LayerStyle, LineStyle, MarkerStyle};
pub use tracker::{LayerChanges, LayerTracker};

use crate::geo::Coordinate;

/// Something that draws render plans.
pub trait MapRenderer {
    /// Apply `changes` (removals first, then upserts) and move the camera.
    fn apply(&mut self, plan: &RenderPlan, changes: &LayerChanges);
}

/// User interaction reported by a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Click(Coordinate),
}
