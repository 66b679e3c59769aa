//! Node-graph editor canvas.
//!
//! Renders one workflow's graph on an HTML canvas with:
//! - Drag-and-drop node placement from the palette
//! - Edge drawing from output ports to input ports
//! - Node and edge delete controls
//! - Node dragging, panning, wheel zoom and fit-to-view
//! - Animated dashed edges in bezier, smooth-step or straight routing
//!
//! # Example
//!
//! ```ignore
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use workflow_canvas::{BrowserStorage, EditorSession, WorkflowCanvas, WorkflowRepository};
//!
//! let repo = WorkflowRepository::new(BrowserStorage::local(), "workflows");
//! let session = Rc::new(RefCell::new(EditorSession::open(repo, id)));
//!
//! view! { <WorkflowCanvas session=session /> }
//! ```

mod component;
pub mod controller;
mod edge_path;
mod render;
pub mod scale;
mod state;
pub mod theme;

pub use component::{SharedSession, WorkflowCanvas};
pub use controller::{CanvasController, Interaction, Mutation};
pub use state::{Gesture, Hit, ViewTransform};
pub use theme::Theme;
