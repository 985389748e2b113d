pub mod backend;
pub mod plugin;
