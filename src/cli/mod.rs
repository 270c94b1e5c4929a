use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::application::{AppError, DEFAULT_RECENT_LIMIT, LedgerService};
use crate::domain::{Amount, Expense, ExpenseId, format_amount};
use crate::io::Exporter;
use crate::storage::DEFAULT_STORE_PATH;

/// Spesa - Personal Expense Tracker
#[derive(Parser)]
#[command(name = "spesa")]
#[command(about = "Record, review and export personal expenses kept in a JSON file")]
#[command(version)]
pub struct Cli {
    /// Expense file path
    #[arg(short, long, global = true, env = "SPESA_FILE", default_value = DEFAULT_STORE_PATH)]
    pub file: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new expense
    Add {
        /// Amount spent (e.g., "42.50", or "-12.5" for a refund)
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// Category (defaults to "Other")
        #[arg(short, long, default_value = "")]
        category: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Free-form note
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Replace the fields of an existing expense
    Edit {
        /// Expense ID
        id: ExpenseId,

        /// Amount spent (e.g., "42.50", or "-12.5" for a refund)
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// Category (defaults to "Other")
        #[arg(short, long, default_value = "")]
        category: String,

        /// Date of the expense (YYYY-MM-DD, keeps the current date if omitted)
        #[arg(long)]
        date: Option<String>,

        /// Free-form note
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: ExpenseId,
    },

    /// Show a single expense
    Show {
        /// Expense ID
        id: ExpenseId,
    },

    /// List expenses, newest first
    List {
        /// Maximum number of expenses to show
        #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT, conflicts_with = "all")]
        limit: usize,

        /// Show every expense
        #[arg(long)]
        all: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show total, per-category and monthly totals
    Summary {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Export expenses to CSV or JSON
    Export {
        /// Export format
        #[arg(value_enum)]
        format: ExportFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl Cli {
    fn init_logging(&self) {
        let default_level = if self.verbose { "spesa=debug" } else { "spesa=warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
    }

    pub async fn run(self) -> Result<()> {
        self.init_logging();
        let service = LedgerService::open(&self.file);

        match self.command {
            Commands::Add {
                amount,
                category,
                date,
                note,
            } => {
                let expense = service
                    .add_expense(&amount, &category, date.as_deref(), &note)
                    .await
                    .map_err(user_facing)?;
                println!(
                    "Expense added: {} {} on {} ({})",
                    format_amount(expense.amount),
                    expense.category,
                    expense.date,
                    expense.id
                );
            }

            Commands::Edit {
                id,
                amount,
                category,
                date,
                note,
            } => {
                let expense = service
                    .edit_expense(id, &amount, &category, date.as_deref(), &note)
                    .await
                    .map_err(user_facing)?;
                println!(
                    "Expense updated: {} {} on {} ({})",
                    format_amount(expense.amount),
                    expense.category,
                    expense.date,
                    expense.id
                );
            }

            Commands::Delete { id } => {
                let expense = service.delete_expense(id).await.map_err(user_facing)?;
                println!(
                    "Expense deleted: {} {} on {} ({})",
                    format_amount(expense.amount),
                    expense.category,
                    expense.date,
                    expense.id
                );
            }

            Commands::Show { id } => {
                let expense = service.get_expense(id).await.map_err(user_facing)?;
                print_expense(&expense);
            }

            Commands::List { limit, all, format } => {
                run_list_command(&service, limit, all, format).await?;
            }

            Commands::Summary { format } => {
                run_summary_command(&service, format).await?;
            }

            Commands::Export { format, output } => {
                run_export_command(&service, format, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

/// Turn ledger errors into the messages a user is expected to act on.
fn user_facing(err: AppError) -> anyhow::Error {
    match err {
        AppError::InvalidAmount(detail) => {
            anyhow::anyhow!("Invalid amount. Please enter a number. ({})", detail)
        }
        AppError::ExpenseNotFound(id) => anyhow::anyhow!("Expense not found: {}", id),
        other => other.into(),
    }
}

async fn run_list_command(
    service: &LedgerService,
    limit: usize,
    all: bool,
    format: OutputFormat,
) -> Result<()> {
    if all {
        let expenses = service.list_expenses_by_date().await?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&expenses)?),
            OutputFormat::Table => {
                if expenses.is_empty() {
                    println!("No expenses found.");
                } else {
                    print_expense_table(&expenses);
                }
            }
        }
        return Ok(());
    }

    let overview = service.overview(limit).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&overview)?),
        OutputFormat::Table => {
            if overview.recent.is_empty() {
                println!("No expenses found.");
                return Ok(());
            }
            print_expense_table(&overview.recent);
            println!();
            print_category_totals(&overview.by_category);
            println!("{}", "=".repeat(44));
            println!("{:<25} {:>15}", "Total", format_amount(overview.total));
        }
    }

    Ok(())
}

async fn run_summary_command(service: &LedgerService, format: OutputFormat) -> Result<()> {
    let report = service.summary().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            println!("Expense Summary");
            println!();

            if !report.by_category.is_empty() {
                print_category_totals(&report.by_category);
                println!();
            }

            if !report.monthly.is_empty() {
                println!("By month:");
                for month in &report.monthly {
                    println!("  {:<23} {:>15}", month.month, format_amount(month.total));
                }
                println!();
            }

            println!("{}", "=".repeat(44));
            println!("{:<25} {:>15}", "Total", format_amount(report.total));
        }
    }

    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    format: ExportFormat,
    output: Option<&str>,
) -> Result<()> {
    // Render into memory first so a failed export never truncates an existing file
    let exporter = Exporter::new(service);
    let mut buf = Vec::new();
    let summary = match format {
        ExportFormat::Csv => {
            let count = exporter.export_csv(&mut buf).await?;
            format!("Exported {} expenses", count)
        }
        ExportFormat::Json => {
            let bytes = exporter.export_json(&mut buf).await?;
            format!("Exported expense file ({} bytes)", bytes)
        }
    };

    match output {
        Some(path) => {
            let mut writer = BufWriter::new(
                File::create(path).with_context(|| format!("Failed to create {}", path))?,
            );
            writer.write_all(&buf)?;
            writer.flush()?;
            eprintln!("{}", summary);
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&buf)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn print_expense(expense: &Expense) {
    println!("Expense: {}", expense.id);
    println!("  Date:     {}", expense.date);
    println!("  Amount:   {}", format_amount(expense.amount));
    println!("  Category: {}", expense.category);
    if !expense.note.is_empty() {
        println!("  Note:     {}", expense.note);
    }
}

fn print_expense_table(expenses: &[Expense]) {
    println!(
        "{:<15} {:<12} {:<15} {:>12}  {}",
        "ID", "DATE", "CATEGORY", "AMOUNT", "NOTE"
    );
    println!("{}", "-".repeat(80));
    for expense in expenses {
        println!(
            "{:<15} {:<12} {:<15} {:>12}  {}",
            expense.id,
            truncate(&expense.date, 12),
            truncate(&expense.category, 15),
            format_amount(expense.amount),
            truncate(&expense.note, 30)
        );
    }
}

fn print_category_totals(by_category: &BTreeMap<String, Amount>) {
    println!("By category:");
    for (category, amount) in by_category {
        println!(
            "  {:<23} {:>15}",
            truncate(category, 23),
            format_amount(*amount)
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
