pub mod hypervolume;
mod wfg;

pub use hypervolume::{HypervolumeEngine, REMOVE_ABSENT};
pub use wfg::set_hypervolume;
