use mirror_fs::RelPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn joined_paths_stay_within_their_parent(
        parts in prop::collection::vec("[a-zA-Z0-9_-]{1,8}", 1..6),
        leaf in "[a-zA-Z0-9_.-]{1,12}",
    ) {
        prop_assume!(leaf != "." && leaf != "..");
        let parent = RelPath::parse(&parts.join("/")).unwrap();
        let child = parent.join(&leaf);

        prop_assert!(child.is_within(&parent));
        prop_assert_eq!(child.parent(), Some(parent.clone()));
        prop_assert_eq!(child.file_name(), leaf.as_str());
        prop_assert_eq!(child.as_str().split('/').count(), parts.len() + 1);
        let stripped = child.strip_prefix(&parent).unwrap();
        prop_assert_eq!(stripped.as_str(), leaf.as_str());
    }

    #[test]
    fn parse_is_idempotent(parts in prop::collection::vec("[a-z0-9]{1,6}", 1..5)) {
        let once = RelPath::parse(&parts.join("\\")).unwrap();
        let twice = RelPath::parse(once.as_str()).unwrap();

        prop_assert_eq!(once.as_str(), parts.join("/"));
        prop_assert_eq!(once, twice);
    }
}
