mod component;
mod render;
mod state;

pub use component::CampaignGraphCanvas;
pub use state::GraphView;
