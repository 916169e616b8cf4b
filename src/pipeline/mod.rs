pub mod aggregate;
pub mod cancel;
pub mod classify;
pub mod parse;
pub mod process;
