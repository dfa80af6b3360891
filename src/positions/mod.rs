//! Manual node placement: drag overrides, debounced saving and layout files.

mod debounce;
mod layout_file;
mod store;

pub use debounce::{Debouncer, Ticket};
pub use layout_file::{LAYOUT_VERSION, LayoutMetadata, SavedLayout};
pub use store::{NodePosition, POSITIONS_KEY, PositionStore, decode_positions, encode_positions};
