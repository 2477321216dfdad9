//! Headless application core (state/action/effect).

pub mod action;
pub mod editor;
pub mod effect;
pub mod state;
pub mod store;

pub use action::Action;
pub use editor::{EditorState, OpenFile};
pub use effect::Effect;
pub use state::{AppState, ExplorerState};
pub use store::{DispatchResult, Store};
