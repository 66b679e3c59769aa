//! UI components: the overview list, the editor page and its canvas.

mod catalog_view;
mod editor_view;
mod palette_sidebar;
pub mod workflow_canvas;

pub use catalog_view::CatalogView;
pub use editor_view::EditorView;
pub use palette_sidebar::PaletteSidebar;
