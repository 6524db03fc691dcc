//! Patch-panel route planning: the per-query panel graph, route search
//! and route rendering.

pub mod catalog;
pub mod constraints;
pub mod graph;
pub mod location;
pub mod panel;
pub mod present;
pub mod search;

pub use catalog::build_map;
pub use constraints::RouteConstraints;
pub use graph::DataCenterMap;
pub use panel::{Classification, InterfaceType};
pub use search::{Route, SearchLimits};
