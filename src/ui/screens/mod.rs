pub mod expenses;
pub mod main_menu;
pub mod profile;
pub mod sign_in;

pub use expenses::run_expense_list;
pub use main_menu::{run_main_menu, MenuContext};
pub use profile::run_profile;
pub use sign_in::run_sign_in;
