//! Transaction display formatting
//!
//! Lists render as tables; single transactions render as a detail block.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Money, Transaction};

use super::report::truncate;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl TransactionRow {
    fn new(txn: &Transaction, symbol: &str, date_format: &str) -> Self {
        let marker = if txn.is_recurring() { " ↻" } else { "" };
        Self {
            id: txn.id.to_string(),
            date: txn.date.format(date_format).to_string(),
            description: format!("{}{}", truncate(&txn.description, 40), marker),
            category: txn.category_label().to_string(),
            amount: txn.amount.format_with_symbol(symbol),
        }
    }
}

/// Format transactions as a table with a total line
pub fn format_transaction_table(transactions: &[Transaction], symbol: &str, date_format: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|t| TransactionRow::new(t, symbol, date_format))
        .collect();
    let total: Money = transactions.iter().map(|t| t.amount).sum();

    format!(
        "{}\n{} transaction(s), total {}",
        Table::new(rows).with(Style::sharp()),
        transactions.len(),
        total.format_with_symbol(symbol)
    )
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:      {}\n", txn.amount.format_with_symbol(symbol)));
    output.push_str(&format!("Description: {}\n", txn.description));

    if txn.is_expense() {
        output.push_str(&format!("Category:    {}\n", txn.category_label()));
    }

    if let Some(recurring_id) = txn.recurring_id {
        output.push_str(&format!("Recurring:   {}\n", recurring_id));
    }

    output
}
