pub mod gm_map;
pub mod not_found;
pub mod player_map;
pub mod region_focus;
