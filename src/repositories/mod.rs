pub mod assets;
pub mod memory;
pub mod settings;
