//! Algebraic properties of paths, sanitization, and rule combination

use pixrepo_path::{NamingRules, PathValidator, RepoPath, RuleTable, Sanitizer};
use proptest::prelude::*;

fn combined_rules() -> NamingRules {
    let tables: Vec<_> = RuleTable::ALL.iter().map(|t| t.rules()).collect();
    NamingRules::combine(&tables).unwrap()
}

fn rule_table() -> impl Strategy<Value = RuleTable> {
    prop::sample::select(RuleTable::ALL.to_vec())
}

proptest! {
    // canonical-string round trip over valid component lists
    #[test]
    fn path_string_round_trips(components in prop::collection::vec("[A-Za-z0-9 ._~:-]{1,12}", 0..6)) {
        let path = RepoPath::from_components(components).unwrap();
        prop_assert_eq!(RepoPath::from_string(&path.to_string()), path);
    }

    #[test]
    fn sanitize_is_idempotent(component in "\\PC{0,40}") {
        let sanitizer = Sanitizer::new(combined_rules());
        let once = sanitizer.apply(&component);
        prop_assert_eq!(sanitizer.apply(&once), once);
    }

    #[test]
    fn combine_is_commutative(a in rule_table(), b in rule_table()) {
        let (a, b) = (a.rules(), b.rules());
        let ab = NamingRules::combine([&a, &b]).unwrap();
        let ba = NamingRules::combine([&b, &a]).unwrap();
        prop_assert_eq!(ab, ba);
    }

    // the combined validator rejects the union of what either alone rejects
    #[test]
    fn combined_validator_rejects_union(
        a in rule_table(),
        b in rule_table(),
        component in "\\PC{1,20}",
    ) {
        let path = match RepoPath::from_components(vec![component]) {
            Ok(path) => path,
            Err(_) => return Ok(()), // separator or empty: not a valid component
        };
        let rejected_alone = PathValidator::new(a.rules()).validate(&path).is_err()
            || PathValidator::new(b.rules()).validate(&path).is_err();
        let combined = NamingRules::combine([&a.rules(), &b.rules()]).unwrap();
        if rejected_alone {
            prop_assert!(PathValidator::new(combined).validate(&path).is_err());
        }
    }
}
