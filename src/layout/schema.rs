//! The fixed category tree the aggregator builds.

use serde::Deserialize;

/// A node of the category schema. Order of `children` is the output order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaNode {
    Item {
        name: String,
        field: String,
        #[serde(default)]
        headcount: Option<String>,
    },
    Category {
        name: String,
        /// Field holding the independently reported total, if the sheet has one
        #[serde(default)]
        declared: Option<String>,
        children: Vec<SchemaNode>,
    },
}

impl SchemaNode {
    pub fn item(name: &str, field: &str) -> Self {
        SchemaNode::Item {
            name: name.to_string(),
            field: field.to_string(),
            headcount: None,
        }
    }

    pub fn staffed(name: &str, field: &str, headcount: &str) -> Self {
        SchemaNode::Item {
            name: name.to_string(),
            field: field.to_string(),
            headcount: Some(headcount.to_string()),
        }
    }

    pub fn category(name: &str, declared: Option<&str>, children: Vec<SchemaNode>) -> Self {
        SchemaNode::Category {
            name: name.to_string(),
            declared: declared.map(str::to_string),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SchemaNode::Item { name, .. } | SchemaNode::Category { name, .. } => name,
        }
    }
}
