pub mod crossover;
pub mod indicator;
pub mod mutation;
pub mod selection;

pub use crossover::{Crossover, CrossoverChildren, NPointCrossover, UniformCrossover};
pub use indicator::Indicator;
pub use mutation::BitFlipMutation;
pub use selection::KWayTournament;
