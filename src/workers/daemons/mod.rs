pub mod config_refresh;
