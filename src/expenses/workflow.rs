use std::sync::Arc;

use crate::api::{Expense, ExpenseApi};
use crate::session::{current_token, TokenStore};
use crate::status::{Navigation, Status, MSG_TOKEN_MISSING};

use super::query::{derive_view, ExpenseQuery, SortField, SortOrder};

pub const MSG_FETCH_FAILED: &str = "Error fetching expenses";
pub const MSG_DELETE_FAILED: &str = "Failed to delete expense";
pub const MSG_DELETE_OK: &str = "Expense deleted successfully!";

/// State behind the expense list: the last fetched collection, the query, and the last outcome.
pub struct ExpenseListWorkflow {
    api: Arc<dyn ExpenseApi>,
    tokens: Arc<dyn TokenStore>,
    expenses: Vec<Expense>,
    query: ExpenseQuery,
    status: Option<Status>,
}

impl ExpenseListWorkflow {
    pub fn new(api: Arc<dyn ExpenseApi>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            expenses: Vec::new(),
            query: ExpenseQuery::default(),
            status: None,
        }
    }

    /// Fetch the signed-in user's expenses. Without a token nothing is requested.
    pub async fn activate(&mut self) -> Navigation {
        self.status = None;

        let Some(token) = current_token(self.tokens.as_ref()) else {
            log::warn!("No session token; redirecting to sign-in before fetching expenses");
            self.status = Some(Status::error(MSG_TOKEN_MISSING));
            return Navigation::Login;
        };

        log::debug!("Fetching expenses");
        match self.api.list_expenses(&token).await {
            Ok(expenses) => {
                log::info!("Fetched {} expenses", expenses.len());
                self.expenses = expenses;
            }
            Err(err) => {
                log::error!("Error fetching expenses: {}", err);
                self.status = Some(Status::error(MSG_FETCH_FAILED));
            }
        }
        Navigation::Stay
    }

    /// Delete one expense on the server, then drop it locally. Nothing changes before confirmation.
    pub async fn delete(&mut self, id: &str) -> Navigation {
        self.status = None;

        let Some(token) = current_token(self.tokens.as_ref()) else {
            log::warn!("No session token; redirecting to sign-in before deleting {}", id);
            self.status = Some(Status::error(MSG_TOKEN_MISSING));
            return Navigation::Login;
        };

        log::debug!("Deleting expense {}", id);
        match self.api.delete_expense(&token, id).await {
            Ok(()) => {
                self.expenses.retain(|expense| expense.id != id);
                self.status = Some(Status::success(MSG_DELETE_OK));
            }
            Err(err) => {
                log::error!("Failed to delete expense {}: {}", id, err);
                self.status = Some(Status::error(MSG_DELETE_FAILED));
            }
        }
        Navigation::Stay
    }

    pub fn visible(&self) -> Vec<&Expense> {
        derive_view(&self.expenses, &self.query)
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn query(&self) -> &ExpenseQuery {
        &self.query
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_sort_field(&mut self, field: SortField) {
        self.query.field = field;
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.query.order = order;
    }

    pub fn cycle_sort_field(&mut self) {
        self.query.field = self.query.field.next();
    }

    pub fn toggle_sort_order(&mut self) {
        self.query.order = self.query.order.toggle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Category, PictureUpdated, PictureUpload, UserDetails};
    use crate::error::{AppError, Result};
    use crate::session::MemoryTokenStore;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        expenses: Mutex<Vec<Expense>>,
        fail_list: bool,
        fail_delete: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn with(expenses: Vec<Expense>) -> Self {
            Self {
                expenses: Mutex::new(expenses),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExpenseApi for FakeApi {
        async fn list_expenses(&self, token: &str) -> Result<Vec<Expense>> {
            self.calls.lock().unwrap().push(format!("list:{token}"));
            if self.fail_list {
                return Err(AppError::message("boom"));
            }
            Ok(self.expenses.lock().unwrap().clone())
        }

        async fn delete_expense(&self, token: &str, id: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("delete:{token}:{id}"));
            if self.fail_delete {
                return Err(AppError::message("boom"));
            }
            self.expenses.lock().unwrap().retain(|e| e.id != id);
            Ok(())
        }

        async fn user_details(&self, _token: &str) -> Result<UserDetails> {
            unreachable!("not used by the list workflow")
        }

        async fn update_profile_picture(
            &self,
            _token: &str,
            _upload: PictureUpload,
        ) -> Result<PictureUpdated> {
            unreachable!("not used by the list workflow")
        }
    }

    fn expense(id: &str, title: &str, category: &str, amount: f64, date: &str) -> Expense {
        Expense {
            id: id.to_string(),
            title: title.to_string(),
            category: Category {
                id: None,
                name: category.to_string(),
            },
            amount,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense("1", "Coffee", "Food", 5.0, "2024-01-01"),
            expense("2", "Bus", "Transport", 2.0, "2024-01-02"),
            expense("3", "Rent", "Housing", 900.0, "2024-01-03"),
        ]
    }

    fn workflow(api: Arc<FakeApi>, token: Option<&str>) -> ExpenseListWorkflow {
        let store = match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::default(),
        };
        ExpenseListWorkflow::new(api, Arc::new(store))
    }

    #[tokio::test]
    async fn missing_token_redirects_without_network_call() {
        let api = Arc::new(FakeApi::with(sample()));
        let mut flow = workflow(Arc::clone(&api), None);

        assert_eq!(flow.activate().await, Navigation::Login);
        assert_eq!(flow.status(), Some(&Status::error(MSG_TOKEN_MISSING)));

        assert_eq!(flow.delete("1").await, Navigation::Login);
        assert_eq!(flow.status(), Some(&Status::error(MSG_TOKEN_MISSING)));

        assert!(api.calls().is_empty());
        assert!(flow.expenses().is_empty());
    }

    #[tokio::test]
    async fn activate_stores_list_and_sends_token() {
        let api = Arc::new(FakeApi::with(sample()));
        let mut flow = workflow(Arc::clone(&api), Some("tok"));

        assert_eq!(flow.activate().await, Navigation::Stay);
        assert_eq!(flow.status(), None);
        assert_eq!(flow.expenses().len(), 3);
        assert_eq!(api.calls(), vec!["list:tok".to_string()]);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_list() {
        let api = Arc::new(FakeApi::with(sample()));
        let mut flow = workflow(Arc::clone(&api), Some("tok"));
        flow.activate().await;

        let failing: Arc<dyn ExpenseApi> = Arc::new(FakeApi {
            fail_list: true,
            ..FakeApi::default()
        });
        flow.api = failing;
        assert_eq!(flow.activate().await, Navigation::Stay);

        assert_eq!(flow.status(), Some(&Status::error(MSG_FETCH_FAILED)));
        assert_eq!(flow.expenses().len(), 3);
    }

    #[tokio::test]
    async fn failed_first_fetch_leaves_empty_list() {
        let api = Arc::new(FakeApi {
            fail_list: true,
            ..FakeApi::default()
        });
        let mut flow = workflow(api, Some("tok"));

        flow.activate().await;
        assert!(flow.visible().is_empty());
        assert!(flow.status().unwrap().is_error());
    }

    #[tokio::test]
    async fn delete_removes_exactly_the_matching_entry() {
        let api = Arc::new(FakeApi::with(sample()));
        let mut flow = workflow(Arc::clone(&api), Some("tok"));
        flow.activate().await;
        let before: Vec<Expense> = flow.expenses().to_vec();

        assert_eq!(flow.delete("2").await, Navigation::Stay);

        assert_eq!(flow.status(), Some(&Status::success(MSG_DELETE_OK)));
        let expected: Vec<Expense> = before.into_iter().filter(|e| e.id != "2").collect();
        assert_eq!(flow.expenses(), expected.as_slice());
        assert!(api.calls().contains(&"delete:tok:2".to_string()));
    }

    #[tokio::test]
    async fn failed_delete_leaves_list_unchanged() {
        let api = Arc::new(FakeApi {
            expenses: Mutex::new(sample()),
            fail_delete: true,
            ..FakeApi::default()
        });
        let mut flow = workflow(api, Some("tok"));
        flow.activate().await;

        flow.delete("1").await;

        assert_eq!(flow.status(), Some(&Status::error(MSG_DELETE_FAILED)));
        assert_eq!(flow.expenses().len(), 3);
    }

    #[tokio::test]
    async fn status_resets_at_start_of_each_operation() {
        let api = Arc::new(FakeApi::with(sample()));
        let mut flow = workflow(api, Some("tok"));
        flow.activate().await;
        flow.delete("1").await;
        assert!(matches!(flow.status(), Some(Status::Success(_))));

        flow.activate().await;
        assert_eq!(flow.status(), None);
    }

    #[tokio::test]
    async fn view_follows_query_changes() {
        let api = Arc::new(FakeApi::with(sample()));
        let mut flow = workflow(api, Some("tok"));
        flow.activate().await;

        flow.set_search("E");
        let titles: Vec<&str> = flow.visible().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Coffee", "Rent"]);

        flow.set_sort_field(SortField::Amount);
        flow.toggle_sort_order();
        let titles: Vec<&str> = flow.visible().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Rent", "Coffee"]);

        flow.set_search("");
        flow.set_sort_order(SortOrder::Ascending);
        flow.cycle_sort_field();
        assert_eq!(flow.query().field, SortField::Date);
        let titles: Vec<&str> = flow.visible().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Coffee", "Bus", "Rent"]);
    }
}
