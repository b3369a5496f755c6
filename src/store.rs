use std::collections::HashSet;

use chrono::{DateTime, Local};
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::db::{read_slot, write_slot, EXPENSES_SLOT};
use crate::error::{Result, SpendError};
use crate::exchange::parse_import;
use crate::models::{Expense, ExpenseDraft, ExpensePatch};

// ---------------------------------------------------------------------------
// Slot persistence
// ---------------------------------------------------------------------------

/// Read the persisted collection. Never fails: a missing, unreadable or
/// corrupt slot is an empty collection.
pub fn load_expenses(conn: &Connection) -> Vec<Expense> {
    let raw = match read_slot(conn, EXPENSES_SLOT) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "could not read expenses slot, starting empty");
            return Vec::new();
        }
    };
    match parse_import(&raw) {
        Ok(parsed) => {
            debug!(count = parsed.records.len(), skipped = parsed.skipped, "loaded expenses");
            parsed.records
        }
        Err(e) => {
            warn!(error = %e, "expenses slot is corrupt, starting empty");
            Vec::new()
        }
    }
}

pub fn save_expenses(conn: &Connection, expenses: &[Expense]) -> Result<()> {
    let json = serde_json::to_string(expenses)?;
    write_slot(conn, EXPENSES_SLOT, &json)?;
    debug!(count = expenses.len(), "saved expenses");
    Ok(())
}

// ---------------------------------------------------------------------------
// Pure collection operations
// ---------------------------------------------------------------------------

/// A fresh id: the wall-clock millisecond, bumped past the largest id already
/// in use so two records created in the same millisecond never collide.
///
/// Imported ids can sit at the top of the `i64` range; when nothing fits above
/// the largest one, the first free id at or below `now_millis` is used.
pub fn next_id(existing: &[Expense], now_millis: i64) -> Result<i64> {
    let taken: HashSet<i64> = existing.iter().map(|e| e.id).collect();
    match taken.iter().max() {
        Some(&max) if max >= now_millis => max
            .checked_add(1)
            .or_else(|| (i64::MIN..=now_millis).rev().find(|id| !taken.contains(id)))
            .ok_or_else(|| SpendError::Other("no free expense id left".to_string())),
        _ => Ok(now_millis),
    }
}

/// Append every incoming record whose id is not already present, then sort
/// the whole collection by transaction date, newest first. Records with an
/// unreadable date sort last. Returns how many records were added.
pub fn merge_records(existing: &mut Vec<Expense>, incoming: Vec<Expense>) -> usize {
    let mut seen: HashSet<i64> = existing.iter().map(|e| e.id).collect();
    let before = existing.len();
    for expense in incoming {
        if seen.insert(expense.id) {
            existing.push(expense);
        }
    }
    existing.sort_by(|a, b| b.day().cmp(&a.day()));
    existing.len() - before
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// In-memory expense collection bound to its persisted slot. Every mutation
/// is written back before the call returns.
pub struct ExpenseStore<'a> {
    conn: &'a Connection,
    expenses: Vec<Expense>,
}

impl<'a> ExpenseStore<'a> {
    pub fn open(conn: &'a Connection) -> Self {
        Self {
            conn,
            expenses: load_expenses(conn),
        }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn get(&self, id: i64) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Prepend a record. Refuses an id that is already taken.
    pub fn add(&mut self, expense: Expense) -> Result<()> {
        if self.get(expense.id).is_some() {
            return Err(SpendError::DuplicateId(expense.id));
        }
        info!(id = expense.id, amount = expense.amount, category = %expense.category, "adding expense");
        self.expenses.insert(0, expense);
        save_expenses(self.conn, &self.expenses)
    }

    /// Give a validated draft a fresh identity and add it.
    pub fn add_draft(&mut self, draft: ExpenseDraft, now: DateTime<Local>) -> Result<Expense> {
        let id = next_id(&self.expenses, now.timestamp_millis())?;
        let expense = draft.into_expense(id, now.to_rfc3339());
        self.add(expense.clone())?;
        Ok(expense)
    }

    /// Remove every record with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: i64) -> Result<bool> {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        let removed = self.expenses.len() != before;
        if removed {
            info!(id, "removed expense");
        }
        save_expenses(self.conn, &self.expenses)?;
        Ok(removed)
    }

    /// Edit a record in place. Returns false when `id` is unknown.
    pub fn update(&mut self, id: i64, patch: &ExpensePatch) -> Result<bool> {
        let Some(expense) = self.expenses.iter_mut().find(|e| e.id == id) else {
            return Ok(false);
        };
        patch.apply(expense);
        info!(id, "updated expense");
        save_expenses(self.conn, &self.expenses)?;
        Ok(true)
    }

    /// Merge an imported batch against the collection as it is now.
    pub fn merge_import(&mut self, incoming: Vec<Expense>) -> Result<usize> {
        let offered = incoming.len();
        let added = merge_records(&mut self.expenses, incoming);
        save_expenses(self.conn, &self.expenses)?;
        info!(offered, added, "merged import");
        Ok(added)
    }
}
