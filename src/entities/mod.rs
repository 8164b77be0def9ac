pub mod assets;
pub mod settings;
