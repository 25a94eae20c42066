pub mod console;
pub mod server;

pub use console::ConsoleService;
pub use server::ServerService;
