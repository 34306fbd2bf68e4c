//! Sort orders for issue queries.

use super::SortOrder;
use crate::domain::Issue;

/// Sort `issues` in place by `order`.
///
/// Uses a stable sort, so issues that compare equal keep their input order.
///
/// `PriorityHigh` compares the raw rank descending: `low` (3) comes first and
/// `urgent` (0) last. Callers wanting urgent-first should reverse the result.
pub fn sort_issues(issues: &mut [Issue], order: SortOrder) {
    match order {
        SortOrder::UpdatedDesc => issues.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortOrder::UpdatedAsc => issues.sort_by(|a, b| a.updated_at.cmp(&b.updated_at)),
        SortOrder::PriorityHigh => issues.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
        SortOrder::CreatedDesc => issues.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}
