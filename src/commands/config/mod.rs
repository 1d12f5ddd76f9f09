pub mod clear_cache;
pub mod get;
pub mod init;
pub mod list;
pub mod set;

pub use clear_cache::clear_cache_command;
pub use get::get_command;
pub use init::init_command;
pub use list::list_command;
pub use set::set_command;
