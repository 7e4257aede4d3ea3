use std::collections::BTreeSet;

use loom_datasets::{
    is_dataset_name, ArtifactLocator, ArtifactRole, DatasetConfig, DatasetRegistry,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn resolve_is_deterministic(name in "[a-z0-9][a-z0-9-]{0,15}") {
        let locator = ArtifactLocator::new("data/datasets");
        prop_assert_eq!(locator.resolve(&name), locator.resolve(&name));
        prop_assert_eq!(
            ArtifactLocator::new("data/datasets").resolve(&name),
            locator.resolve(&name)
        );
    }

    #[test]
    fn distinct_names_give_distinct_sets(
        a in "[a-z0-9][a-z0-9-]{0,15}",
        b in "[a-z0-9][a-z0-9-]{0,15}",
    ) {
        prop_assume!(a != b);
        let locator = ArtifactLocator::default();
        let left = locator.resolve(&a);
        let right = locator.resolve(&b);
        prop_assert_ne!(&left, &right);
        for role in ArtifactRole::ALL {
            prop_assert_ne!(left.get(role), right.get(role));
        }
    }

    #[test]
    fn accepted_names_never_collide(
        a in "[a./\\\\-]{0,5}",
        b in "[a./\\\\-]{0,5}",
    ) {
        prop_assume!(a != b);
        let locator = ArtifactLocator::default();
        if let (Ok(left), Ok(right)) = (locator.try_resolve(&a), locator.try_resolve(&b)) {
            prop_assert_ne!(left, right);
        }
    }

    #[test]
    fn registry_accepts_exactly_resolvable_names(name in "[a./\\\\-]{0,5}") {
        let registry = DatasetRegistry::new([DatasetConfig::new(name.clone(), 1, 1)]);
        prop_assert_eq!(registry.is_ok(), is_dataset_name(&name));
        prop_assert_eq!(
            registry.is_ok(),
            ArtifactLocator::default().try_resolve(&name).is_ok()
        );
    }
}

#[test]
fn roles_map_to_distinct_paths() {
    let set = ArtifactLocator::default().resolve("dd-10-10");
    let paths: BTreeSet<_> = set.iter().map(|(_, path)| path.to_path_buf()).collect();
    assert_eq!(paths.len(), ArtifactRole::ALL.len());
}

#[test]
fn resolve_does_not_touch_the_filesystem() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("not-created");
    let set = ArtifactLocator::new(&root).resolve("dd-10-10");
    assert!(set.model.starts_with(&root));
    assert!(!root.exists());
}
