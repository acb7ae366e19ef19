pub mod decoherence;
pub mod failure;
