pub mod api;
pub mod assets;
pub mod notifications;
pub mod settings;
