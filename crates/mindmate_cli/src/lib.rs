pub mod controller;
pub mod render;
pub mod repl;

pub use controller::ConversationController;
