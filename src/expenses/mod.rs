pub mod query;
pub mod workflow;

pub use query::{derive_view, matches, ExpenseQuery, SortField, SortOrder};
pub use workflow::{ExpenseListWorkflow, MSG_DELETE_FAILED, MSG_DELETE_OK, MSG_FETCH_FAILED};
