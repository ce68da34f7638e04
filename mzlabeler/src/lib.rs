mod args;
mod driver;

pub use args::*;
pub use driver::{MZLabeler, MZLabelerError, DEFAULT_CONFIG_FILE, ENV_PREFIX};
