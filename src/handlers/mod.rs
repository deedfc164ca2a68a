// Handler modules
pub mod check;

pub use check::{handle_check, handle_list_rules};
