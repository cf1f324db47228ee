mod cli;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use expense_cli::api::{Expense, HttpClient};
use expense_cli::config::Config;
use expense_cli::expenses::{ExpenseListWorkflow, ExpenseQuery};
use expense_cli::profile::ProfileWorkflow;
use expense_cli::records::{default_export_path, save_expenses_csv};
use expense_cli::session::{FileTokenStore, TokenStore};
use expense_cli::status::{Navigation, Status};
use expense_cli::utils::{format_amount, format_expense_date, truncate_to_width};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(api_url) = cli.api_url.clone() {
        config = config
            .with_api_url(api_url)
            .context("Invalid --api-url")?;
    }

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_path.clone()));

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            expense_cli::app::run(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::List {
            search,
            sort,
            order,
            export,
        } => {
            let api = Arc::new(HttpClient::new(&config)?);
            let mut workflow = ExpenseListWorkflow::new(api, tokens);
            workflow.set_search(search);
            workflow.set_sort_field(sort);
            workflow.set_sort_order(order);

            let nav = workflow.activate().await;
            if nav == Navigation::Stay && workflow.status().is_none() {
                let rows = workflow.visible();
                print_expenses(&rows, workflow.query());
                if let Some(target) = export {
                    let path = if target.is_dir() {
                        default_export_path(&target)
                    } else {
                        target
                    };
                    save_expenses_csv(&path, &rows)?;
                    println!("Exported {} expenses to {}", rows.len(), path.display());
                }
            }
            Ok(report(workflow.status(), nav))
        }
        Commands::Delete { id } => {
            let api = Arc::new(HttpClient::new(&config)?);
            let mut workflow = ExpenseListWorkflow::new(api, tokens);
            let nav = workflow.delete(&id).await;
            Ok(report(workflow.status(), nav))
        }
        Commands::Profile => {
            let api = Arc::new(HttpClient::new(&config)?);
            let mut workflow =
                ProfileWorkflow::new(api, tokens, config.default_avatar_url.clone());
            let nav = workflow.load().await;
            if let Some(details) = workflow.details() {
                println!("Name:    {}", details.name.as_deref().unwrap_or("-"));
                println!("Email:   {}", details.email.as_deref().unwrap_or("-"));
                println!("Picture: {}", workflow.picture_url().unwrap_or("-"));
            }
            Ok(report(workflow.status(), nav))
        }
        Commands::UploadPicture { path } => {
            let api = Arc::new(HttpClient::new(&config)?);
            let mut workflow =
                ProfileWorkflow::new(api, tokens, config.default_avatar_url.clone());
            let nav = workflow.upload(Some(Path::new(&path))).await;
            if nav == Navigation::Stay && workflow.status().is_some_and(|s| !s.is_error()) {
                if let Some(url) = workflow.picture_url() {
                    println!("Picture: {}", url);
                }
            }
            Ok(report(workflow.status(), nav))
        }
        Commands::Login { token } => {
            tokens.save(&token)?;
            println!("Signed in. Token stored in {}", config.token_path.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Logout => {
            tokens.clear()?;
            println!("Signed out.");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print the operation outcome and map it to the process exit code.
fn report(status: Option<&Status>, nav: Navigation) -> ExitCode {
    let Some(status) = status else {
        return ExitCode::SUCCESS;
    };
    if !status.is_error() {
        println!("{}", status.message());
        return ExitCode::SUCCESS;
    }

    eprintln!("{}", status.message());
    if nav == Navigation::Login {
        eprintln!("Sign in with `expense-cli login --token <TOKEN>`.");
    }
    ExitCode::FAILURE
}

fn print_expenses(rows: &[&Expense], query: &ExpenseQuery) {
    if rows.is_empty() {
        println!("No expenses available");
        return;
    }

    println!(
        "{:>4}  {:<32}  {:<11}  {:<20}  {:>12}",
        "Sl", "Title", "Date", "Category", "Amount"
    );
    for (i, expense) in rows.iter().enumerate() {
        println!(
            "{:>4}  {:<32}  {:<11}  {:<20}  {:>12}",
            i + 1,
            truncate_to_width(&expense.title, 32),
            format_expense_date(expense.date),
            truncate_to_width(expense.category_name(), 20),
            format_amount(expense.amount),
        );
    }
    println!(
        "{} expenses, sorted by {} {}",
        rows.len(),
        query.field,
        query.order.icon()
    );
}
