pub mod fifo;
pub mod fifo_merge;
pub mod merge;
pub mod rrrn;
pub mod schedule;
pub mod scheduler;
pub mod scheduler_type;
