pub mod hook;
pub mod listen;
pub mod status;
