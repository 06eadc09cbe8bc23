//! Builds the category tree from normalized fields and reconciles totals.

use crate::error::{BudgetError, BudgetResult};
use crate::layout::{Layout, SchemaNode};
use crate::types::{
    money, reconcile_epsilon, share_of, BudgetCategory, BudgetLineItem, BudgetNode, BudgetReport,
    CourseGroup, Money, Notice, NormalizedValue, TotalMismatch,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Name used for the report-level reconciliation
pub const TOTAL_BUDGET: &str = "Total Budget";

/// Normalized values by field key, plus the notices raised while reading them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFields {
    values: BTreeMap<String, NormalizedValue>,
    notices: Vec<Notice>,
}

impl NormalizedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: NormalizedValue, notice: Option<Notice>) {
        self.values.insert(key.into(), value);
        if let Some(n) = notice {
            self.notices.push(n);
        }
    }

    pub fn get(&self, key: &str) -> Option<&NormalizedValue> {
        self.values.get(key)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn money(&self, key: &str) -> BudgetResult<Money> {
        self.values
            .get(key)
            .and_then(NormalizedValue::as_money)
            .ok_or_else(|| BudgetError::UnknownField {
                field: key.to_string(),
            })
    }

    fn count(&self, key: &str) -> BudgetResult<u32> {
        self.values
            .get(key)
            .and_then(NormalizedValue::as_count)
            .ok_or_else(|| BudgetError::UnknownField {
                field: key.to_string(),
            })
    }
}

pub struct Aggregator<'a> {
    layout: &'a Layout,
}

impl<'a> Aggregator<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Assemble the report in schema order. Mismatched totals are flagged,
    /// never corrected: both the declared and computed figure are kept.
    pub fn aggregate(
        &self,
        fiscal_year: &str,
        fields: NormalizedFields,
        course_groups: Vec<CourseGroup>,
    ) -> BudgetResult<BudgetReport> {
        let mut notices = fields.notices.clone();

        let mut categories = Vec::with_capacity(self.layout.schema.len());
        for node in &self.layout.schema {
            match build_node(node, &fields, &mut notices)? {
                BudgetNode::Category(c) => categories.push(c),
                BudgetNode::Item(item) => {
                    return Err(BudgetError::Config(format!(
                        "top-level schema entry '{}' must be a category",
                        item.name
                    )))
                }
            }
        }

        let total_budget = fields.money(&self.layout.total_field)?;
        let computed_total = money(categories.iter().map(|c| c.amount).sum::<Decimal>());
        let total_mismatch = reconcile(TOTAL_BUDGET, total_budget, computed_total, &mut notices);

        for category in &mut categories {
            category.share = share_of(category.amount, total_budget);
        }

        info!(
            fiscal_year,
            total_budget = %total_budget,
            categories = categories.len(),
            notices = notices.len(),
            "aggregated budget report"
        );

        Ok(BudgetReport {
            fiscal_year: fiscal_year.to_string(),
            total_budget,
            computed_total,
            total_mismatch,
            categories,
            course_groups,
            notices,
        })
    }
}

fn build_node(
    node: &SchemaNode,
    fields: &NormalizedFields,
    notices: &mut Vec<Notice>,
) -> BudgetResult<BudgetNode> {
    match node {
        SchemaNode::Item {
            name,
            field,
            headcount,
        } => Ok(BudgetNode::Item(BudgetLineItem {
            name: name.clone(),
            field: field.clone(),
            amount: fields.money(field)?,
            headcount: headcount.as_deref().map(|h| fields.count(h)).transpose()?,
            share: Decimal::ZERO,
        })),
        SchemaNode::Category {
            name,
            declared,
            children,
        } => {
            let mut built = children
                .iter()
                .map(|child| build_node(child, fields, notices))
                .collect::<BudgetResult<Vec<_>>>()?;

            let computed_total = money(built.iter().map(BudgetNode::amount).sum::<Decimal>());
            let declared_total = declared.as_deref().map(|d| fields.money(d)).transpose()?;
            let (amount, mismatch) = match declared_total {
                Some(declared) => (
                    declared,
                    reconcile(name, declared, computed_total, notices),
                ),
                None => (computed_total, None),
            };

            for child in &mut built {
                let share = share_of(child.amount(), amount);
                child.set_share(share);
            }

            Ok(BudgetNode::Category(BudgetCategory {
                name: name.clone(),
                children: built,
                computed_total,
                declared_total,
                amount,
                share: Decimal::ZERO,
                mismatch,
            }))
        }
    }
}

/// Compare a declared total against a computed sum; record any gap
/// larger than a cent.
fn reconcile(
    name: &str,
    declared: Money,
    computed: Money,
    notices: &mut Vec<Notice>,
) -> Option<TotalMismatch> {
    if (declared - computed).abs() <= reconcile_epsilon() {
        return None;
    }
    let mismatch = TotalMismatch::new(name, declared, computed);
    warn!(
        category = name,
        declared = %declared,
        computed = %computed,
        difference = %mismatch.difference,
        "declared total does not match sum of children"
    );
    notices.push(Notice::TotalMismatch(mismatch.clone()));
    Some(mismatch)
}
