//! Category display formatting
//!
//! Formats the three category lists as a tree.

use crate::models::category::is_protected;
use crate::models::{Categories, CategoryKind};

/// Format one list as a tree under its label
pub fn format_category_list(kind: CategoryKind, names: &[String]) -> String {
    let mut output = format!("{}\n", kind.label());

    if names.is_empty() {
        output.push_str("  (no categories)\n");
        return output;
    }

    for (i, name) in names.iter().enumerate() {
        let prefix = if i == names.len() - 1 { "└── " } else { "├── " };
        let marker = if is_protected(kind, name) { " (reserved)" } else { "" };
        output.push_str(&format!("  {}{}{}\n", prefix, name, marker));
    }

    output
}

/// Format all three lists, separated by blank lines
pub fn format_category_tree(categories: &Categories) -> String {
    CategoryKind::ALL
        .iter()
        .map(|kind| format_category_list(*kind, categories.list(*kind)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VAULT_DEDUCTION;

    #[test]
    fn test_tree_marks_reserved() {
        let output = format_category_tree(&Categories::default());

        assert!(output.starts_with("Income\n  ├── Salary\n"));
        assert!(output.contains(&format!("{} (reserved)", VAULT_DEDUCTION)));
        assert!(output.contains("Vault\n"));
        assert!(output.contains("  └── Other\n"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(
            format_category_list(CategoryKind::Income, &[]),
            "Income\n  (no categories)\n"
        );
    }
}
