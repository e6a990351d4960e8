// Simulation Module
// Seeded synthetic price paths and volumes for execution studies

pub mod microprice;

pub use microprice::{microprice_path, microprice_path_with_rng, synthetic_volumes};
