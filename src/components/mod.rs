pub mod campaign_graph;
mod connectivity;
mod location_details;
mod notice;
mod path_legend;
mod visibility_panel;

pub use connectivity::ConnectivitySummary;
pub use location_details::LocationDetails;
pub use notice::NoticeBanner;
pub use path_legend::PathLegend;
pub use visibility_panel::VisibilityPanel;
