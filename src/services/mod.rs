pub mod config_accessors;

pub use config_accessors::ConfigAccessors;
