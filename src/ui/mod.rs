pub mod components;
pub mod navigation;
pub mod screens;
pub mod styles;

pub use components::TerminalGuard;
pub use navigation::{MenuAction, ScreenExit, UiRoute};
pub use screens::{run_expense_list, run_main_menu, run_profile, run_sign_in, MenuContext};
