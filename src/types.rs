use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

//==============================================================================
// Fixed-point helpers
//==============================================================================

/// Monetary amount, always carried at exactly two decimal places.
pub type Money = Decimal;

/// Reconciliation tolerance between a declared total and its computed sum.
pub fn reconcile_epsilon() -> Decimal {
    Decimal::new(1, 2)
}

/// Round to cents and pin the scale so amounts print as `1234.50`.
pub fn money(value: Decimal) -> Money {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Convert a spreadsheet float into cents. Non-finite values yield `None`.
pub fn money_from_f64(value: f64) -> Option<Money> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).map(money)
}

/// `part / whole` at four decimal places; zero when `whole` is zero or the
/// ratio overflows.
pub fn share_of(part: Money, whole: Money) -> Decimal {
    if whole.is_zero() {
        let mut zero = Decimal::ZERO;
        zero.rescale(4);
        return zero;
    }
    let mut ratio = part
        .checked_div(whole)
        .map(|r| r.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO);
    ratio.rescale(4);
    ratio
}

//==============================================================================
// Cell values
//==============================================================================

/// What a field holds once normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    Monetary,
    Count,
    Text,
}

/// A cell as read from the workbook, before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum RawCellValue {
    Number(f64),
    /// Text that looks like a formatted amount, e.g. `$1,234.50` or `(250.00)`
    CurrencyText(String),
    Text(String),
    Blank,
}

impl RawCellValue {
    /// Classify a text cell. Whitespace-only text is blank.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return RawCellValue::Blank;
        }
        let has_digit = trimmed.chars().any(|c| c.is_ascii_digit());
        let currency_like = trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '$' | ',' | '.' | '-' | '(' | ')' | ' '));
        if has_digit && currency_like {
            RawCellValue::CurrencyText(trimmed.to_string())
        } else {
            RawCellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, RawCellValue::Blank)
    }
}

/// A typed field value after normalization
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    Money(Money),
    Count(u32),
    Text(String),
}

impl NormalizedValue {
    pub fn as_money(&self) -> Option<Money> {
        match self {
            NormalizedValue::Money(m) => Some(*m),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u32> {
        match self {
            NormalizedValue::Count(c) => Some(*c),
            _ => None,
        }
    }
}

//==============================================================================
// Notices
//==============================================================================

/// A declared total that disagrees with the sum of its children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalMismatch {
    pub category: String,
    pub declared: Money,
    pub computed: Money,
    /// `declared - computed`
    pub difference: Money,
}

impl TotalMismatch {
    pub fn new(category: impl Into<String>, declared: Money, computed: Money) -> Self {
        Self {
            category: category.into(),
            declared,
            computed,
            difference: money(declared - computed),
        }
    }
}

/// Non-fatal deviations surfaced next to the report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    DefaultedField {
        field: String,
        sheet: String,
        reason: String,
    },
    TotalMismatch(TotalMismatch),
}

impl Notice {
    pub fn defaulted(field: &str, sheet: &str, reason: impl Into<String>) -> Self {
        Notice::DefaultedField {
            field: field.to_string(),
            sheet: sheet.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Notice::TotalMismatch(_))
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::DefaultedField {
                field,
                sheet,
                reason,
            } => write!(f, "{field} ({sheet}) defaulted: {reason}"),
            Notice::TotalMismatch(m) => write!(
                f,
                "{} declared total {} differs from computed {} by {}",
                m.category, m.declared, m.computed, m.difference
            ),
        }
    }
}

//==============================================================================
// Budget tree
//==============================================================================

/// Leaf entry of the budget tree
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetLineItem {
    pub name: String,
    /// Layout field the amount was read from
    pub field: String,
    pub amount: Money,
    pub headcount: Option<u32>,
    /// Fraction of the parent amount
    pub share: Decimal,
}

/// Grouping node. `amount` is the declared total when one exists,
/// otherwise the computed sum of the children.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetCategory {
    pub name: String,
    pub children: Vec<BudgetNode>,
    pub computed_total: Money,
    pub declared_total: Option<Money>,
    pub amount: Money,
    pub share: Decimal,
    pub mismatch: Option<TotalMismatch>,
}

impl BudgetCategory {
    /// Direct child by name
    pub fn child(&self, name: &str) -> Option<&BudgetNode> {
        self.children.iter().find(|c| c.name() == name)
    }

    /// Walk nested categories by name, e.g. `["Undergraduate", "Chair Expenses"]`
    pub fn descend(&self, path: &[&str]) -> Option<&BudgetNode> {
        let (first, rest) = path.split_first()?;
        let node = self.child(first)?;
        if rest.is_empty() {
            return Some(node);
        }
        match node {
            BudgetNode::Category(c) => c.descend(rest),
            BudgetNode::Item(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BudgetNode {
    Item(BudgetLineItem),
    Category(BudgetCategory),
}

impl BudgetNode {
    pub fn name(&self) -> &str {
        match self {
            BudgetNode::Item(i) => &i.name,
            BudgetNode::Category(c) => &c.name,
        }
    }

    pub fn amount(&self) -> Money {
        match self {
            BudgetNode::Item(i) => i.amount,
            BudgetNode::Category(c) => c.amount,
        }
    }

    pub fn share(&self) -> Decimal {
        match self {
            BudgetNode::Item(i) => i.share,
            BudgetNode::Category(c) => c.share,
        }
    }

    pub(crate) fn set_share(&mut self, share: Decimal) {
        match self {
            BudgetNode::Item(i) => i.share = share,
            BudgetNode::Category(c) => c.share = share,
        }
    }

    pub fn as_category(&self) -> Option<&BudgetCategory> {
        match self {
            BudgetNode::Category(c) => Some(c),
            BudgetNode::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&BudgetLineItem> {
        match self {
            BudgetNode::Item(i) => Some(i),
            BudgetNode::Category(_) => None,
        }
    }
}

//==============================================================================
// Course listing
//==============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    /// Listing entry, usually the course code, e.g. `FNAR 2200`
    pub name: String,
    /// Course title, empty when the sheet has none
    pub title: String,
    pub category: String,
}

/// A distinct course with the number of sections listed for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSection {
    pub name: String,
    pub sections: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseGroup {
    pub category: String,
    /// Every listed row, in sheet order
    pub courses: Vec<CourseRecord>,
    /// Annotations such as `$200 / visit`
    pub notes: Vec<String>,
    /// Distinct courses in first-seen order
    pub sections: Vec<CourseSection>,
}

impl CourseGroup {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            courses: Vec::new(),
            notes: Vec::new(),
            sections: Vec::new(),
        }
    }

    pub fn total_sections(&self) -> u32 {
        self.sections.iter().map(|s| s.sections).sum()
    }
}

//==============================================================================
// Report root
//==============================================================================

/// One fiscal year's extracted budget. Built once by the aggregator and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetReport {
    pub fiscal_year: String,
    pub total_budget: Money,
    /// Sum of the top-level category amounts
    pub computed_total: Money,
    pub total_mismatch: Option<TotalMismatch>,
    pub categories: Vec<BudgetCategory>,
    pub course_groups: Vec<CourseGroup>,
    pub notices: Vec<Notice>,
}

impl BudgetReport {
    pub fn category(&self, name: &str) -> Option<&BudgetCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn course_group(&self, category: &str) -> Option<&CourseGroup> {
        self.course_groups.iter().find(|g| g.category == category)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &TotalMismatch> {
        self.notices.iter().filter_map(|n| match n {
            Notice::TotalMismatch(m) => Some(m),
            _ => None,
        })
    }

    pub fn defaulted_fields(&self) -> impl Iterator<Item = &str> {
        self.notices.iter().filter_map(|n| match n {
            Notice::DefaultedField { field, .. } => Some(field.as_str()),
            _ => None,
        })
    }
}
