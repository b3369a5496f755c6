use std::collections::BTreeMap;

use crate::models::Expense;

pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
    pub pct: f64,
}

pub struct Summary {
    pub total: f64,
    pub count: usize,
    /// Only categories present in the input, largest total first.
    pub categories: Vec<CategoryTotal>,
}

/// Total, count and per-category breakdown of an already filtered set.
///
/// Amounts are summed at full precision; any rounding is left to display.
/// Categories with equal totals come out in tag order.
pub fn aggregate(records: &[&Expense]) -> Summary {
    let mut by_category: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    let mut total = 0.0;
    for e in records {
        total += e.amount;
        let entry = by_category.entry(e.category.as_str()).or_insert((0.0, 0));
        entry.0 += e.amount;
        entry.1 += 1;
    }

    let mut categories: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, (sum, count))| CategoryTotal {
            category: category.to_string(),
            total: sum,
            count,
            pct: if total != 0.0 && total.is_finite() { sum / total * 100.0 } else { 0.0 },
        })
        .collect();
    categories.sort_by(|a, b| b.total.total_cmp(&a.total));

    Summary {
        total,
        count: records.len(),
        categories,
    }
}
