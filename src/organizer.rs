//! Display ordering for todo lists
//!
//! The list view shows root todos with their children nested underneath.
//! Within any sibling group, incomplete todos sort before completed ones,
//! then by due date (undated last), then by creation time. Children whose
//! parent is missing are appended at the end as if they were roots.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::todos;

/// A root todo with its direct children, in display order
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TodoGroup {
    #[serde(flatten)]
    pub todo: todos::Model,
    pub children: Vec<todos::Model>,
}

/// Sort order for siblings: incomplete first, then due date with undated
/// last, then creation time
fn display_order(a: &todos::Model, b: &todos::Model) -> std::cmp::Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        })
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Arrange a flat list of todos into ordered root groups with nested
/// children. Orphaned children (parent not in the input) are promoted to
/// trailing roots so nothing is silently dropped.
pub fn organize(todos: Vec<todos::Model>) -> Vec<TodoGroup> {
    let (mut roots, mut children): (Vec<_>, Vec<_>) =
        todos.into_iter().partition(|t| t.is_root());

    roots.sort_by(display_order);

    let mut groups: Vec<TodoGroup> = roots
        .into_iter()
        .map(|todo| TodoGroup {
            todo,
            children: Vec::new(),
        })
        .collect();

    let root_ids: Vec<Uuid> = groups.iter().map(|g| g.todo.id).collect();
    let (attached, orphans): (Vec<_>, Vec<_>) = children
        .drain(..)
        .partition(|c| c.parent_id.map(|p| root_ids.contains(&p)).unwrap_or(false));

    for group in &mut groups {
        let mut own: Vec<todos::Model> = attached
            .iter()
            .filter(|c| c.parent_id == Some(group.todo.id))
            .cloned()
            .collect();
        own.sort_by(display_order);
        group.children = own;
    }

    let mut orphans = orphans;
    orphans.sort_by(display_order);
    groups.extend(orphans.into_iter().map(|todo| TodoGroup {
        todo,
        children: Vec::new(),
    }));

    groups
}

/// Bucket dated todos by due date for the calendar view. Undated todos are
/// excluded. Buckets and their contents follow `display_order`.
pub fn group_by_due_date(todos: Vec<todos::Model>) -> BTreeMap<NaiveDate, Vec<todos::Model>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<todos::Model>> = BTreeMap::new();
    for todo in todos {
        if let Some(date) = todo.due_date {
            buckets.entry(date).or_default().push(todo);
        }
    }
    for bucket in buckets.values_mut() {
        bucket.sort_by(display_order);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn todo(
        title: &str,
        completed: bool,
        due: Option<(i32, u32, u32)>,
        parent_id: Option<Uuid>,
        created_offset: i64,
    ) -> todos::Model {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
            + chrono::Duration::seconds(created_offset);
        todos::Model {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed,
            due_date: due.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            user_id: Uuid::new_v4(),
            parent_id,
            created_at: created,
            updated_at: created,
        }
    }

    fn titles(groups: &[TodoGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.todo.title.as_str()).collect()
    }

    #[test]
    fn incomplete_roots_sort_before_completed() {
        let done = todo("done", true, Some((2026, 3, 1)), None, 0);
        let open = todo("open", false, Some((2026, 3, 5)), None, 1);
        let groups = organize(vec![done, open]);
        assert_eq!(titles(&groups), vec!["open", "done"]);
    }

    #[test]
    fn due_date_orders_within_completion_state() {
        let later = todo("later", false, Some((2026, 3, 9)), None, 0);
        let sooner = todo("sooner", false, Some((2026, 3, 2)), None, 1);
        let undated = todo("undated", false, None, None, 2);
        let groups = organize(vec![undated.clone(), later, sooner]);
        assert_eq!(titles(&groups), vec!["sooner", "later", "undated"]);
    }

    #[test]
    fn created_at_breaks_ties() {
        let second = todo("second", false, Some((2026, 3, 2)), None, 10);
        let first = todo("first", false, Some((2026, 3, 2)), None, 0);
        let groups = organize(vec![second, first]);
        assert_eq!(titles(&groups), vec!["first", "second"]);
    }

    #[test]
    fn children_nest_under_their_root_in_order() {
        let root = todo("root", false, Some((2026, 3, 4)), None, 0);
        let child_done = todo("child done", true, Some((2026, 3, 2)), Some(root.id), 1);
        let child_open = todo("child open", false, Some((2026, 3, 3)), Some(root.id), 2);
        let other = todo("other root", false, Some((2026, 3, 1)), None, 3);

        let groups = organize(vec![child_done, root, other, child_open]);

        assert_eq!(titles(&groups), vec!["other root", "root"]);
        let nested: Vec<&str> = groups[1]
            .children
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(nested, vec!["child open", "child done"]);
        assert!(groups[0].children.is_empty());
    }

    #[test]
    fn orphaned_children_become_trailing_roots() {
        let root = todo("root", false, Some((2026, 3, 1)), None, 0);
        let orphan = todo("orphan", false, Some((2026, 3, 2)), Some(Uuid::new_v4()), 1);
        let groups = organize(vec![orphan, root]);
        assert_eq!(titles(&groups), vec!["root", "orphan"]);
    }

    #[test]
    fn ordering_is_independent_of_input_permutation() {
        let a = todo("a", false, Some((2026, 3, 1)), None, 0);
        let b = todo("b", false, Some((2026, 3, 2)), None, 1);
        let c = todo("c", true, None, None, 2);

        let forward = organize(vec![a.clone(), b.clone(), c.clone()]);
        let backward = organize(vec![c, b, a]);
        assert_eq!(titles(&forward), titles(&backward));
    }

    #[test]
    fn calendar_buckets_by_date_and_skips_undated() {
        let monday = todo("monday", false, Some((2026, 3, 2)), None, 0);
        let also_monday = todo("also monday", true, Some((2026, 3, 2)), None, 1);
        let friday = todo("friday", false, Some((2026, 3, 6)), None, 2);
        let undated = todo("undated", false, None, None, 3);

        let buckets = group_by_due_date(vec![friday, undated, also_monday, monday]);

        let dates: Vec<NaiveDate> = buckets.keys().copied().collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 6).unwrap(),
            ]
        );

        let monday_titles: Vec<&str> = buckets[&NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()]
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(monday_titles, vec!["monday", "also monday"]);
    }
}
