pub mod dashboard;
pub mod heatmap;
pub mod panels;
pub mod pie;
pub mod plot;
