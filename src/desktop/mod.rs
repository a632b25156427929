//! Operating-system services the app hands work off to.

pub mod dialogs;
pub mod file_ops;

pub use dialogs::*;
pub use file_ops::*;
