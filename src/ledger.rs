use serde::{Deserialize, Serialize};

use crate::campaigns::format_thousands;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub date: String,
    pub donor: String,
    pub event: String,
    pub amount: f64,
}

/// Read-only, paginated view over the transparency ledger.
pub struct Ledger {
    transactions: Vec<Transaction>,
    page_size: usize,
    page: usize,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>, page_size: usize) -> Self {
        Self {
            transactions,
            page_size: page_size.max(1),
            page: 0,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.transactions.len().div_ceil(self.page_size)
    }

    pub fn page(&self, page: usize) -> &[Transaction] {
        let start = (page * self.page_size).min(self.transactions.len());
        let end = (start + self.page_size).min(self.transactions.len());
        &self.transactions[start..end]
    }

    pub fn current(&self) -> &[Transaction] {
        self.page(self.page)
    }

    pub fn next(&mut self) -> &[Transaction] {
        let last = self.total_pages().saturating_sub(1);
        self.page = (self.page + 1).min(last);
        self.current()
    }

    pub fn prev(&mut self) -> &[Transaction] {
        self.page = self.page.saturating_sub(1);
        self.current()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    /// Plain-text table of the current page, one transaction per row.
    pub fn render_current(&self) -> String {
        let rows = self.current();
        let donor_w = rows.iter().map(|t| t.donor.chars().count()).max().unwrap_or(0).max(7);
        let event_w = rows.iter().map(|t| t.event.chars().count()).max().unwrap_or(0).max(6);

        let mut out = String::new();
        out.push_str(&format!(
            "{:<10}  {:<donor_w$}  {:<event_w$}  {:>18}\n",
            "Fecha", "Donante", "Evento", "Monto"
        ));
        for t in rows {
            out.push_str(&format!(
                "{:<10}  {:<donor_w$}  {:<event_w$}  {:>18}\n",
                t.date,
                t.donor,
                t.event,
                format_amount(t.amount)
            ));
        }
        if self.total_pages() > 1 {
            let mut footer = format!("Página {} de {}", self.page + 1, self.total_pages());
            if self.has_prev() {
                footer.push_str("  [PageUp: anterior]");
            }
            if self.has_next() {
                footer.push_str("  [PageDown: siguiente]");
            }
            out.push_str(&footer);
            out.push('\n');
        }
        out
    }
}

pub fn format_amount(amount: f64) -> String {
    format!("${}.00 MXN", format_thousands(amount))
}
