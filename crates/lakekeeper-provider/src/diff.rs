//! Assignment-set diffing.

use std::collections::BTreeSet;

/// Compute the additions and removals turning `state` into `plan`.
///
/// Duplicates within either input collapse; ordering is irrelevant. The
/// diff only ever concerns the tokens of a single `(object, principal)`
/// pair, so tokens held by other principals are untouched by
/// construction.
#[must_use]
pub fn diff_assignments(state: &[String], plan: &[String]) -> (Vec<String>, Vec<String>) {
    let state: BTreeSet<&str> = state.iter().map(String::as_str).collect();
    let plan: BTreeSet<&str> = plan.iter().map(String::as_str).collect();

    let added = plan
        .difference(&state)
        .map(ToString::to_string)
        .collect();
    let removed = state
        .difference(&plan)
        .map(ToString::to_string)
        .collect();
    (added, removed)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn set(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn grows_and_shrinks() {
        let (added, removed) = diff_assignments(
            &set(&["ownership"]),
            &set(&["ownership", "manage_grants", "create"]),
        );
        assert_eq!(added, set(&["create", "manage_grants"]));
        assert_eq!(removed, Vec::<String>::new());

        let (added, removed) =
            diff_assignments(&set(&["ownership", "manage_grants", "create"]), &[]);
        assert_eq!(added, Vec::<String>::new());
        assert_eq!(removed, set(&["create", "manage_grants", "ownership"]));
    }

    #[test]
    fn identical_sets_produce_no_work() {
        let (added, removed) =
            diff_assignments(&set(&["describe", "select"]), &set(&["select", "describe"]));
        assert!(added.is_empty());
        assert!(removed.is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        let (added, removed) = diff_assignments(
            &set(&["describe", "describe"]),
            &set(&["select", "select", "describe"]),
        );
        assert_eq!(added, set(&["select"]));
        assert!(removed.is_empty());
    }

    #[test]
    fn diff_algebra_holds() {
        // added ∩ state = ∅, removed ∩ plan = ∅, (state ∪ added) \ removed = plan
        let cases: &[(&[&str], &[&str])] = &[
            (&["a"], &["a", "b", "c"]),
            (&["a", "b"], &["c"]),
            (&[], &["x"]),
            (&["x"], &[]),
            (&["a", "b", "c"], &["b", "c", "d"]),
        ];
        for (state, plan) in cases {
            let state = set(state);
            let plan = set(plan);
            let (added, removed) = diff_assignments(&state, &plan);

            let state_set: BTreeSet<_> = state.iter().cloned().collect();
            let plan_set: BTreeSet<_> = plan.iter().cloned().collect();
            let added_set: BTreeSet<_> = added.iter().cloned().collect();
            let removed_set: BTreeSet<_> = removed.iter().cloned().collect();

            assert!(added_set.is_disjoint(&state_set));
            assert!(removed_set.is_disjoint(&plan_set));
            let reconstructed: BTreeSet<_> = state_set
                .union(&added_set)
                .filter(|t| !removed_set.contains(*t))
                .cloned()
                .collect();
            assert_eq!(reconstructed, plan_set);
        }
    }
}
