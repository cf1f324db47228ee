use std::sync::Arc;

use crate::api::ExpenseApi;
use crate::config::Config;
use crate::error::Result;
use crate::expenses::ExpenseListWorkflow;
use crate::profile::ProfileWorkflow;
use crate::session::{current_token, TokenStore};
use crate::status::{Navigation, Status, MSG_TOKEN_MISSING};
use crate::ui::{
    run_expense_list, run_main_menu, run_profile, run_sign_in, MenuAction, MenuContext,
    ScreenExit,
};

/// Coordinates the session, workflows, and TUI screens.
pub struct AppController {
    config: Config,
    api: Arc<dyn ExpenseApi>,
    tokens: Arc<dyn TokenStore>,
}

impl AppController {
    pub fn new(config: Config, api: Arc<dyn ExpenseApi>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            config,
            api,
            tokens,
        }
    }

    pub async fn run(self) -> Result<()> {
        let mut notice: Option<Status> = None;

        loop {
            let signed_in = current_token(self.tokens.as_ref()).is_some();
            let action = run_main_menu(&MenuContext {
                api_url: &self.config.api_url,
                signed_in,
                notice: notice.as_ref(),
            })?;
            notice = match action {
                MenuAction::Expenses => self.drive_expenses().await?,
                MenuAction::Profile => self.drive_profile().await?,
                MenuAction::SignIn => self.sign_in(None)?,
                MenuAction::SignOut => {
                    self.tokens.clear()?;
                    log::info!("Session token cleared");
                    Some(Status::success("Signed out"))
                }
                MenuAction::Exit => return Ok(()),
            };
        }
    }

    /// Run the expense list until the user leaves it. Redirects go through the sign-in prompt.
    async fn drive_expenses(&self) -> Result<Option<Status>> {
        let mut workflow = ExpenseListWorkflow::new(Arc::clone(&self.api), Arc::clone(&self.tokens));

        loop {
            if workflow.activate().await == Navigation::Login {
                if !self.prompt_after_redirect()? {
                    return Ok(workflow.status().cloned());
                }
                continue;
            }

            match run_expense_list(&mut workflow).await? {
                ScreenExit::Back => return Ok(None),
                ScreenExit::SignIn => {
                    if !self.prompt_after_redirect()? {
                        return Ok(workflow.status().cloned());
                    }
                }
            }
        }
    }

    async fn drive_profile(&self) -> Result<Option<Status>> {
        let mut workflow = ProfileWorkflow::new(
            Arc::clone(&self.api),
            Arc::clone(&self.tokens),
            self.config.default_avatar_url.clone(),
        );

        loop {
            if workflow.load().await == Navigation::Login {
                if !self.prompt_after_redirect()? {
                    return Ok(workflow.status().cloned());
                }
                continue;
            }

            match run_profile(&mut workflow).await? {
                ScreenExit::Back => return Ok(None),
                ScreenExit::SignIn => {
                    if !self.prompt_after_redirect()? {
                        return Ok(workflow.status().cloned());
                    }
                }
            }
        }
    }

    /// Returns true when a token was stored and the caller should retry.
    fn prompt_after_redirect(&self) -> Result<bool> {
        Ok(self.sign_in(Some(MSG_TOKEN_MISSING))?.is_some())
    }

    fn sign_in(&self, reason: Option<&str>) -> Result<Option<Status>> {
        match run_sign_in(reason)? {
            Some(token) => {
                self.tokens.save(&token)?;
                Ok(Some(Status::success("Signed in")))
            }
            None => Ok(None),
        }
    }
}
