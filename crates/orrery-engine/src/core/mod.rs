pub mod body;
pub mod system;
pub mod time;
