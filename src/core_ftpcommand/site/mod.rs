mod handler;

pub mod site_chmod;
pub mod site_clear;
pub mod site_loader;
pub mod site_mount;
pub mod site_passwd;

pub use handler::handle_site_command;
