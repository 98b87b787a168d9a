// 📊 Summary - Income/expense totals over the whole ledger

use crate::ledger::{Kind, Transaction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
}

/// Fold every transaction into income/expense totals.
/// Recomputed from scratch on each call; nothing is cached.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;

    for tx in transactions {
        match tx.kind {
            Kind::Income => total_income += tx.amount,
            Kind::Expense => total_expenses += tx.amount,
        }
    }

    Summary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
    }
}
