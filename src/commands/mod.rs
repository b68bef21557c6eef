pub mod app_command;
pub mod server_command;
