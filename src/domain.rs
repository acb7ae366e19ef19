pub mod evaluation;
pub mod experiment;
pub mod request;
pub mod routing;
pub mod schedule;
pub mod topology;
pub mod utils;
