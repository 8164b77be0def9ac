pub mod config_cache;
pub mod logo;
pub mod settings_editor;
