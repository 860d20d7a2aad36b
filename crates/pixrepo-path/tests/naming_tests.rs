//! Table-driven sanitization and validation cases

use pixrepo_path::{NamingRules, PathValidator, RepoPath, RuleTable, Sanitizer};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn full_policy() -> NamingRules {
    let tables: Vec<_> = RuleTable::ALL.iter().map(|t| t.rules()).collect();
    NamingRules::combine(&tables).unwrap()
}

#[rstest]
#[case("CON", "CON_")]
#[case("lpt7", "lpt7_")]
#[case(".profile", "_.profile")]
#[case("-rf", "_-rf")]
#[case("$HOME", "_$HOME")]
#[case("draft~", "draft~_")]
#[case("report.", "report._")]
#[case("a<b>c", "a_b_c")]
#[case("tab\there", "tab_here")]
#[case("plain_name", "plain_name")]
fn test_sanitize_cases(#[case] raw: &str, #[case] expected: &str) {
    let sanitizer = Sanitizer::new(full_policy());
    assert_eq!(sanitizer.apply(raw), expected);
}

#[rstest]
#[case("2026-08/plate_7/field_001.tif", true)]
#[case("AUX/field_001.tif", false)]
#[case("plate/.hidden", false)]
#[case("plate/draft~", false)]
#[case("plate/pipe|name", false)]
fn test_validate_cases(#[case] path: &str, #[case] accepted: bool) {
    let validator = PathValidator::new(full_policy());
    let result = validator.validate(&RepoPath::from_string(path));
    assert_eq!(result.is_ok(), accepted, "unexpected verdict for {path:?}");
}
