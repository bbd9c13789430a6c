//! Configuration access for the topology builders.

mod loader;
mod view;

pub use loader::{load_config_tree, ConfigFileError};
pub use view::{ConfigTree, ConfigView};
