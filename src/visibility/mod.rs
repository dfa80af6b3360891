//! Which locations, regions and paths the GM has revealed.

mod kind;
mod rules;
mod store;

pub use kind::VisibilityKind;
pub use rules::{PathGating, is_path_shown, should_path_be_visible};
pub use store::VisibilityStore;
