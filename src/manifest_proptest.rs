//! Property-based tests for manifest filtering.
//!
//! These tests use proptest to generate random manifests and subsets and
//! verify that filtering invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::manifest::{Manifest, ProjectRecord};
    use proptest::prelude::*;

    fn manifest_of(apps: &[String]) -> Manifest {
        Manifest::new(
            apps.iter()
                .map(|app| ProjectRecord::new(app.as_str(), format!("services/{}", app), "deployment.yaml"))
                .collect(),
        )
    }

    proptest! {
        /// Property: an empty subset selects every record
        #[test]
        fn empty_subset_selects_all(apps in prop::collection::vec("[a-z]{1,8}", 0..12)) {
            let manifest = manifest_of(&apps);
            let selected = manifest.filter(&[]);
            prop_assert_eq!(selected.len(), apps.len());
        }

        /// Property: filtering only returns records whose app is in the subset
        #[test]
        fn filter_keeps_only_requested(
            apps in prop::collection::vec("[a-z]{1,8}", 0..12),
            subset in prop::collection::vec("[a-z]{1,8}", 1..6),
        ) {
            let manifest = manifest_of(&apps);
            for record in manifest.filter(&subset) {
                prop_assert!(subset.contains(&record.app));
            }
        }

        /// Property: filtering preserves manifest order
        #[test]
        fn filter_preserves_order(
            apps in prop::collection::vec("[a-z]{1,8}", 0..12),
            subset in prop::collection::vec("[a-z]{1,8}", 1..6),
        ) {
            let manifest = manifest_of(&apps);
            let expected: Vec<&String> = apps.iter().filter(|a| subset.contains(a)).collect();
            let selected = manifest.filter(&subset);
            let actual: Vec<&String> = selected.iter().map(|r| &r.app).collect();
            prop_assert_eq!(actual, expected);
        }

        /// Property: yaml_files never yields blank entries
        #[test]
        fn yaml_files_have_no_blanks(yaml in "[a-z. |]{0,40}") {
            let record = ProjectRecord::new("svc", "services/svc", yaml);
            for file in record.yaml_files() {
                prop_assert!(!file.trim().is_empty());
                prop_assert_eq!(file.trim(), file.as_str());
            }
        }
    }
}
