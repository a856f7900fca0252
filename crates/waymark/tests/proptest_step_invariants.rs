//! Property-based invariant tests for step helpers.
//!
//! 1. Generated ids have the version-4 layout with lowercase hex digits
//! 2. A normalized prefix is empty or ends in exactly the caller's dashes
//! 3. The arrow's static side is the opposite of the placement side
//! 4. Centering is required unless both attachment halves resolved

use proptest::prelude::*;
use waymark::{
    Alignment, ElementId, Placement, ResolvedAttachment, Side, normalize_prefix,
    should_center_step, static_side, uuid_from_seed,
};

fn placement_strategy() -> impl Strategy<Value = Placement> {
    let side = prop_oneof![
        Just(Side::Top),
        Just(Side::Right),
        Just(Side::Bottom),
        Just(Side::Left)
    ];
    let alignment = prop_oneof![
        Just(None),
        Just(Some(Alignment::Start)),
        Just(Some(Alignment::End))
    ];
    (side, alignment).prop_map(|(side, alignment)| match alignment {
        Some(a) => Placement::aligned(side, a),
        None => Placement::new(side),
    })
}

proptest! {
    #[test]
    fn uuid_layout(seed in any::<u64>()) {
        let id = uuid_from_seed(seed);
        let groups: Vec<&str> = id.split('-').collect();
        prop_assert_eq!(groups.iter().map(|g| g.len()).collect::<Vec<_>>(), vec![8, 4, 4, 4, 12]);
        prop_assert!(id.chars().all(|c| c == '-' || c.is_ascii_digit() || ('a'..='f').contains(&c)));
        prop_assert!(groups[2].starts_with('4'));
        prop_assert!(matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b')));
    }

    #[test]
    fn prefix_normalization(prefix in "[a-z-]{0,8}") {
        let normalized = normalize_prefix(Some(&prefix));
        if prefix.is_empty() {
            prop_assert_eq!(normalized, "");
        } else if prefix.ends_with('-') {
            prop_assert_eq!(normalized, prefix);
        } else {
            prop_assert_eq!(normalized, format!("{prefix}-"));
        }
    }

    #[test]
    fn static_side_opposes_placement(placement in placement_strategy()) {
        let side = static_side(placement);
        prop_assert_eq!(side, placement.side().opposite());
        prop_assert_ne!(side, placement.side());
        prop_assert_eq!(side.axis(), placement.side().axis());
        let token = placement.to_string();
        let parsed: Placement = token.parse().unwrap();
        prop_assert_eq!(static_side(parsed), side);
    }

    #[test]
    fn centering_predicate(
        element in proptest::option::of(0u32..64),
        on in proptest::option::of(placement_strategy()),
    ) {
        let resolved = ResolvedAttachment { element: element.map(ElementId::new), on };
        prop_assert_eq!(
            should_center_step(Some(&resolved)),
            element.is_none() || on.is_none()
        );
    }
}
