pub mod dijkstra;
pub mod graph;
pub mod path;
pub mod path_selection;
pub mod yen;
