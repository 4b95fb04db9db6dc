//! Integration tests for user-agent database correctness
//!
//! These tests verify end-to-end functionality from INI text to resolved
//! query results, including inheritance, error policy, reloads, and
//! cache behavior.

use browscap::{BrowscapError, UserAgentDatabase};
use std::io::Write;

const SAMPLE_INI: &str = "\
;;; sample browscap data
[GJK_Browscap_Version]
Version=4321
Released=Mon, 07 Aug 2006 23:00:00 GMT

[DefaultProperties]
Browser=\"Default Browser\"
Frames=true
Cookies=false
Platform=unknown

[Firefox]
Parent=DefaultProperties
Browser=Firefox
Cookies=true

[Mozilla/5.0*Firefox/1.5*]
Parent=Firefox
Version=1.5
Platform=Linux

[Mozilla*]
Parent=DefaultProperties
Browser=Mozilla

[Opera/9.*]
Parent=DefaultProperties
Browser=Opera
Version=9.0

[Wget*]
Parent=DefaultProperties
Browser=Wget
Version=1.10
Platform=Linux
";

fn loaded_db() -> UserAgentDatabase {
    let db = UserAgentDatabase::new();
    let raw = browscap::ini::parse_str(SAMPLE_INI).unwrap();
    db.load_sections(raw.sections, raw.leaf_ids);
    db
}

#[test]
fn test_query_resolves_inherited_properties() {
    let db = loaded_db();
    let props = db
        .query("Mozilla/5.0 (X11; U; Linux i686; de; rv:1.8.0.5) Gecko/20060731 Firefox/1.5.0.5")
        .unwrap();

    assert_eq!(props["browser"], "Firefox", "from the Firefox parent");
    assert_eq!(props["version"], "1.5", "leaf's own value");
    assert_eq!(props["platform"], "Linux", "leaf overrides DefaultProperties");
    assert_eq!(props["cookies"], "true", "Firefox overrides DefaultProperties");
    assert_eq!(props["frames"], "true", "inherited from the root");
}

#[test]
fn test_most_specific_pattern_selected() {
    let db = loaded_db();

    // Both [Mozilla*] and [Mozilla/5.0*Firefox/1.5*] match; the longer
    // identifier must win
    let props = db.query("Mozilla/5.0 Firefox/1.5").unwrap();
    assert_eq!(props["browser"], "Firefox");

    // Only [Mozilla*] matches this one
    let props = db.query("Mozilla/4.0 (compatible; MSIE 6.0)").unwrap();
    assert_eq!(props["browser"], "Mozilla");
}

#[test]
fn test_internal_sections_are_not_matchable() {
    let db = loaded_db();
    let agents = db.known_user_agents().unwrap();

    assert!(!agents.contains(&"Firefox".to_string()), "non-leaf");
    assert!(!agents.contains(&"DefaultProperties".to_string()), "non-leaf");
    assert!(!agents.contains(&"GJK_Browscap_Version".to_string()), "meta");
    assert!(agents.contains(&"Wget*".to_string()));
}

#[test]
fn test_lenient_and_strict_not_found() {
    let db = loaded_db();

    let lenient = db.query_lenient("totally-unknown-agent").unwrap();
    assert!(lenient.is_empty());

    let err = db.query("totally-unknown-agent").unwrap_err();
    assert_eq!(
        err,
        BrowscapError::UnknownUserAgent("totally-unknown-agent".to_string())
    );
}

#[test]
fn test_uninitialized_query_fails_regardless_of_mode() {
    let db = UserAgentDatabase::new();
    assert_eq!(db.query("x").unwrap_err(), BrowscapError::Uninitialized);
    assert_eq!(
        db.query_lenient("x").unwrap_err(),
        BrowscapError::Uninitialized
    );
}

#[test]
fn test_second_query_does_not_rescan() {
    let db = loaded_db();
    let ua = "Opera/9.00 (X11; Linux i686; U; en)";

    let first = db.query(ua).unwrap();
    let scans_after_first = db.stats().unwrap().scans;
    let second = db.query(ua).unwrap();
    let stats = db.stats().unwrap();

    assert_eq!(first, second, "cached result must be identical");
    assert_eq!(stats.scans, scans_after_first, "no rescan on cache hit");
    assert_eq!(stats.cache_hits, 1);
}

#[test]
fn test_cycle_in_ini_skips_only_those_leaves() {
    let ini = "\
[A*]
Parent=B*
Browser=A

[B*]
Parent=A*
Browser=B

[Wget*]
Browser=Wget
";
    let db = UserAgentDatabase::new();
    let raw = browscap::ini::parse_str(ini).unwrap();
    db.load_sections(raw.sections, raw.leaf_ids);

    // A* and B* reference each other so neither is a leaf... but neither is
    // ever dropped from the section map, so both stay internal. Wget* is
    // the only queryable entry either way.
    assert_eq!(db.query("Wget/1.10.2").unwrap()["browser"], "Wget");
    assert!(db.query("Anything").is_err());
}

#[test]
fn test_parent_cycle_among_leaves_does_not_hang() {
    use rustc_hash::FxHashSet;

    // Force A* and B* into the leaf set to exercise resolution of a cycle
    let raw = browscap::ini::parse_str(
        "[A*]\nParent=B*\n[B*]\nParent=A*\n[Wget*]\nBrowser=Wget\n",
    )
    .unwrap();
    let leaves: FxHashSet<String> =
        ["A*", "B*", "Wget*"].iter().map(|s| s.to_string()).collect();

    let db = UserAgentDatabase::new();
    db.load_sections(raw.sections, leaves);

    assert_eq!(db.len(), 1, "both cyclic leaves skipped");
    assert_eq!(db.query("Wget/1.10.2").unwrap()["browser"], "Wget");
}

#[test]
fn test_reload_fully_replaces_catalog() {
    let db = loaded_db();
    assert!(db.query("Wget/1.10.2").is_ok());

    let raw = browscap::ini::parse_str("[Curl*]\nBrowser=Curl\n").unwrap();
    db.load_sections(raw.sections, raw.leaf_ids);

    assert!(
        matches!(
            db.query("Wget/1.10.2"),
            Err(BrowscapError::UnknownUserAgent(_))
        ),
        "old-database pattern must be unmatchable after reload"
    );
    assert_eq!(db.query("Curl/7.0").unwrap()["browser"], "Curl");
}

#[test]
fn test_load_file_roundtrip_latin1() {
    // 0xE9 = é in Latin-1; the file is not valid UTF-8
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        b"[T\xE9l\xE9phone*]\nBrowser=\"T\xE9l\xE9phone\"\nVersion=1.0\n",
    )
    .unwrap();

    let db = UserAgentDatabase::new();
    db.load_file(file.path()).unwrap();

    let props = db.query("T\u{e9}l\u{e9}phone/1.0 (Mobile)").unwrap();
    assert_eq!(props["browser"], "T\u{e9}l\u{e9}phone");
    assert_eq!(props["version"], "1.0");
}

#[test]
fn test_load_missing_file() {
    let db = UserAgentDatabase::new();
    let err = db.load_file("/no/such/path/browscap.ini").unwrap_err();
    assert!(matches!(err, BrowscapError::Io(_)));
    assert!(!db.is_loaded());
}

#[test]
fn test_known_user_agents_is_a_snapshot() {
    let db = loaded_db();
    let mut agents = db.known_user_agents().unwrap();
    agents.clear();

    // Mutating the returned vec must not affect the database
    assert!(!db.known_user_agents().unwrap().is_empty());
}

#[test]
fn test_question_wildcard_in_version_pattern() {
    let ini = "[Mozilla/5.0*Firefox/1.?.*]\nBrowser=Firefox\n";
    let db = UserAgentDatabase::new();
    let raw = browscap::ini::parse_str(ini).unwrap();
    db.load_sections(raw.sections, raw.leaf_ids);

    assert!(db.query("Mozilla/5.0 (X11) Firefox/1.5.0.5").is_ok());
    assert!(db.query("Mozilla/4.0 Firefox/2.0").is_err());
}
