/// Central routing types for the TUI screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiRoute {
    MainMenu,
    Expenses,
    Profile,
    SignIn,
}

impl UiRoute {
    /// Human readable label used by headers and logs.
    pub fn title(self) -> &'static str {
        match self {
            UiRoute::MainMenu => "Main Menu",
            UiRoute::Expenses => "My Expenses",
            UiRoute::Profile => "Profile",
            UiRoute::SignIn => "Sign In",
        }
    }
}

/// Navigation outcomes from the main menu screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Expenses,
    Profile,
    SignIn,
    SignOut,
    Exit,
}

/// How a workflow screen was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenExit {
    Back,
    SignIn,
}
