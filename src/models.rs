use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SpendError};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Grocery,
    Travel,
    Bike,
    Rent,
    Investments,
    Lending,
    Entertainment,
    Utilities,
    Health,
    Shopping,
    Education,
    Other,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Self::Food,
        Self::Grocery,
        Self::Travel,
        Self::Bike,
        Self::Rent,
        Self::Investments,
        Self::Lending,
        Self::Entertainment,
        Self::Utilities,
        Self::Health,
        Self::Shopping,
        Self::Education,
        Self::Other,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Grocery => "grocery",
            Self::Travel => "travel",
            Self::Bike => "bike",
            Self::Rent => "rent",
            Self::Investments => "investments",
            Self::Lending => "lending",
            Self::Entertainment => "entertainment",
            Self::Utilities => "utilities",
            Self::Health => "health",
            Self::Shopping => "shopping",
            Self::Education => "education",
            Self::Other => "other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Food => "🍔",
            Self::Grocery => "🛒",
            Self::Travel => "✈️",
            Self::Bike => "🏍️",
            Self::Rent => "🏠",
            Self::Investments => "📈",
            Self::Lending => "💸",
            Self::Entertainment => "🎬",
            Self::Utilities => "💡",
            Self::Health => "🏥",
            Self::Shopping => "🛍️",
            Self::Education => "📚",
            Self::Other => "📦",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.tag() == tag)
    }
}

/// Icon for a raw category tag. Unrecognised tags get the `other` icon.
pub fn category_icon(tag: &str) -> &'static str {
    Category::from_tag(tag).unwrap_or(Category::Other).icon()
}

// ---------------------------------------------------------------------------
// Expense record
// ---------------------------------------------------------------------------

/// One stored expense, in the exact shape it is persisted and exported.
///
/// Records coming from imports are accepted leniently: anything other than
/// the `id` may be missing or mistyped and is carried through rather than
/// rejected. Keys this struct does not know about are kept in `extra` so a
/// save/load cycle never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(default = "missing_amount", deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Expense {
    /// Calendar day of the transaction. Accepts a bare `YYYY-MM-DD` or any
    /// timestamp that starts with one; the time part is ignored.
    pub fn day(&self) -> Option<NaiveDate> {
        let head = self.date.get(..10)?;
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }
}

fn missing_amount() -> f64 {
    f64::NAN
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let id = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_id)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    id.ok_or_else(|| serde::de::Error::custom(format!("expense id is not an integer: {value}")))
}

/// A whole float inside the `i64` range. Anything larger (including `u64`
/// values past `i64::MAX`) has no usable id rather than being clamped.
fn integral_id(f: f64) -> Option<i64> {
    // i64::MAX is not representable; 2^63 is the first float past it.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f)).then_some(f as i64)
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Raw input validation
// ---------------------------------------------------------------------------

fn parse_amount(raw: &str) -> Result<f64> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| SpendError::InvalidAmount(raw.to_string()))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(SpendError::InvalidAmount(raw.to_string()));
    }
    Ok(amount)
}

fn parse_category(raw: &str) -> Result<Category> {
    Category::from_tag(raw.trim()).ok_or_else(|| SpendError::UnknownCategory(raw.to_string()))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| SpendError::InvalidDate(raw.to_string()))
}

/// A validated expense that has not been assigned an identity yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
    pub description: String,
}

impl ExpenseDraft {
    /// Validate the raw text fields of an entry form. A missing date means
    /// `today`, a missing description means empty.
    pub fn from_raw(
        amount: &str,
        category: &str,
        date: Option<&str>,
        description: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self> {
        Ok(Self {
            amount: parse_amount(amount)?,
            category: parse_category(category)?,
            date: date.map(parse_date).transpose()?.unwrap_or(today),
            description: description.unwrap_or_default().to_string(),
        })
    }

    pub fn into_expense(self, id: i64, created_at: String) -> Expense {
        Expense {
            id,
            amount: self.amount,
            category: self.category.tag().to_string(),
            date: self.date.format("%Y-%m-%d").to_string(),
            description: self.description,
            created_at: Some(Value::String(created_at)),
            extra: Map::new(),
        }
    }
}

/// Field changes for an in-place edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl ExpensePatch {
    pub fn from_raw(
        amount: Option<&str>,
        category: Option<&str>,
        date: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            amount: amount.map(parse_amount).transpose()?,
            category: category.map(parse_category).transpose()?,
            date: date.map(parse_date).transpose()?,
            description: description.map(str::to_string),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, expense: &mut Expense) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category) = self.category {
            expense.category = category.tag().to_string();
        }
        if let Some(date) = self.date {
            expense.date = date.format("%Y-%m-%d").to_string();
        }
        if let Some(description) = &self.description {
            expense.description = description.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_category_tags_round_trip() {
        for cat in Category::ALL {
            assert_eq!(Category::from_tag(cat.tag()), Some(cat));
        }
        assert_eq!(Category::from_tag("yachts"), None);
    }

    #[test]
    fn test_unknown_category_icon_falls_back() {
        assert_eq!(category_icon("food"), "🍔");
        assert_eq!(category_icon("yachts"), "📦");
    }

    #[test]
    fn test_expense_json_shape() {
        let json = r#"{"id":1718000000000,"amount":50,"category":"food","date":"2024-06-15","description":"Lunch","createdAt":"2024-06-15T12:00:00.000Z"}"#;
        let exp: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(exp.id, 1718000000000);
        assert_eq!(exp.amount, 50.0);
        assert_eq!(exp.day(), Some(day("2024-06-15")));
        let back = serde_json::to_value(&exp).unwrap();
        assert_eq!(back["createdAt"], "2024-06-15T12:00:00.000Z");
        assert_eq!(back["description"], "Lunch");
    }

    #[test]
    fn test_lenient_fields_pass_through() {
        let json = r#"{"id":"42","amount":"12.5","category":"yachts","date":null,"note":"kept"}"#;
        let exp: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(exp.id, 42);
        assert_eq!(exp.amount, 12.5);
        assert_eq!(exp.category, "yachts");
        assert_eq!(exp.date, "");
        assert_eq!(exp.day(), None);
        assert_eq!(exp.extra["note"], "kept");
        let back = serde_json::to_value(&exp).unwrap();
        assert_eq!(back["note"], "kept");
    }

    #[test]
    fn test_missing_amount_is_nan() {
        let exp: Expense = serde_json::from_str(r#"{"id":1}"#).unwrap();
        assert!(exp.amount.is_nan());
    }

    #[test]
    fn test_id_is_required() {
        assert!(serde_json::from_str::<Expense>(r#"{"amount":5}"#).is_err());
        assert!(serde_json::from_str::<Expense>(r#"{"id":"abc"}"#).is_err());
        assert!(serde_json::from_str::<Expense>(r#"{"id":1.5}"#).is_err());
        assert!(serde_json::from_str::<Expense>(r#"{"id":1e19}"#).is_err());
        assert!(serde_json::from_str::<Expense>(r#"{"id":18446744073709551615}"#).is_err());
        assert!(serde_json::from_str::<Expense>(r#"{"id":"99999999999999999999"}"#).is_err());
        assert_eq!(serde_json::from_str::<Expense>(r#"{"id":4.0}"#).unwrap().id, 4);
        assert_eq!(
            serde_json::from_str::<Expense>(r#"{"id":9223372036854775807}"#).unwrap().id,
            i64::MAX
        );
    }

    #[test]
    fn test_day_ignores_time_part() {
        let exp: Expense =
            serde_json::from_str(r#"{"id":1,"date":"2024-06-15T23:30:00"}"#).unwrap();
        assert_eq!(exp.day(), Some(day("2024-06-15")));
    }

    #[test]
    fn test_draft_defaults() {
        let today = day("2024-06-15");
        let draft = ExpenseDraft::from_raw("49.99", "grocery", None, None, today).unwrap();
        assert_eq!(draft.date, today);
        assert_eq!(draft.description, "");
        let exp = draft.into_expense(7, "2024-06-15T09:00:00Z".to_string());
        assert_eq!(exp.category, "grocery");
        assert_eq!(exp.date, "2024-06-15");
    }

    #[test]
    fn test_draft_rejects_bad_input() {
        let today = day("2024-06-15");
        assert!(matches!(
            ExpenseDraft::from_raw("abc", "food", None, None, today),
            Err(SpendError::InvalidAmount(_))
        ));
        assert!(matches!(
            ExpenseDraft::from_raw("0", "food", None, None, today),
            Err(SpendError::InvalidAmount(_))
        ));
        assert!(matches!(
            ExpenseDraft::from_raw("-3", "food", None, None, today),
            Err(SpendError::InvalidAmount(_))
        ));
        assert!(matches!(
            ExpenseDraft::from_raw("NaN", "food", None, None, today),
            Err(SpendError::InvalidAmount(_))
        ));
        assert!(matches!(
            ExpenseDraft::from_raw("5", "yachts", None, None, today),
            Err(SpendError::UnknownCategory(_))
        ));
        assert!(matches!(
            ExpenseDraft::from_raw("5", "food", Some("15/06/2024"), None, today),
            Err(SpendError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_patch_applies_only_given_fields() {
        let mut exp = ExpenseDraft::from_raw("10", "food", Some("2024-06-01"), Some("Tea"), day("2024-06-15"))
            .unwrap()
            .into_expense(1, "t".to_string());
        let patch = ExpensePatch::from_raw(Some("12"), None, None, Some("Chai")).unwrap();
        patch.apply(&mut exp);
        assert_eq!(exp.amount, 12.0);
        assert_eq!(exp.category, "food");
        assert_eq!(exp.date, "2024-06-01");
        assert_eq!(exp.description, "Chai");
        assert!(ExpensePatch::default().is_empty());
        assert!(!patch.is_empty());
    }
}
