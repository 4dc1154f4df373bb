//! Seed parsing and validation.

use std::io::Write;

use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tempfile::NamedTempFile;

use super::*;

const USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn minimal() -> Value {
    json!({
        "version": 1,
        "domains": [{ "id": "IATA_CITY", "name": "IATA_CITY" }],
        "schemas": [{
            "id": "MARKET",
            "name": "Market",
            "tables": [{
                "id": "BOOKINGS_OND",
                "name": "BOOKINGS_OND",
                "heading": [{ "name": "BOARD_CITY", "domain": "IATA_CITY" }]
            }]
        }],
        "queries": [{
            "id": "q1",
            "statement": "SELECT a",
            "state": "finished",
            "heading": [{ "name": "a", "domain": "IATA_CITY" }]
        }],
        "accounts": [{
            "id": USER_ID,
            "username": "market",
            "passwordSha256": password_sha256("pw"),
            "role": "market"
        }],
        "grants": { "market": ["MARKET"] }
    })
}

fn with(mut seed: Value, pointer: &str, value: Value) -> Value {
    *seed.pointer_mut(pointer).expect("pointer exists") = value;
    seed
}

#[rstest]
fn minimal_seed_validates(minimal: Value) {
    let seed = CatalogueSeed::from_value(minimal).expect("valid seed");
    let summary = seed.summary();
    assert_eq!((summary.tables, summary.queries, summary.roles), (1, 1, 1));
    let states: Vec<_> = seed.query_ids().map(|(id, state)| (id.as_str(), state)).collect();
    assert_eq!(states, [("q1", "finished")]);
}

#[rstest]
fn rejects_unsupported_version(minimal: Value) {
    let err = CatalogueSeed::from_value(with(minimal, "/version", json!(2))).expect_err("version");
    assert_eq!(
        err,
        CatalogueSeedError::UnsupportedVersion {
            expected: 1,
            actual: 2
        }
    );
}

#[rstest]
#[case("/domains/1", json!({ "id": "IATA_CITY", "name": "again" }), "domain")]
#[case("/schemas/0/tables/1", json!({ "id": "BOOKINGS_OND", "name": "x", "heading": [{ "name": "c" }] }), "table")]
#[case("/queries/1", json!({ "id": "q1", "statement": "SELECT 1", "state": "created" }), "query")]
fn rejects_duplicate_ids(
    minimal: Value,
    #[case] pointer: &str,
    #[case] entry: Value,
    #[case] kind: &str,
) {
    let (parent, _) = pointer.rsplit_once('/').expect("array pointer");
    let mut seed = minimal;
    seed.pointer_mut(parent)
        .and_then(Value::as_array_mut)
        .expect("array")
        .push(entry);
    let err = CatalogueSeed::from_value(seed).expect_err("duplicate");
    assert!(matches!(err, CatalogueSeedError::Duplicate { kind: found, .. } if found == kind));
}

#[rstest]
#[case(json!([]))]
#[case(json!([{ "name": "a" }, { "name": "a" }]))]
#[case(json!([{ "name": "1,2" }]))]
fn rejects_invalid_headings(minimal: Value, #[case] heading: Value) {
    let err = CatalogueSeed::from_value(with(minimal, "/schemas/0/tables/0/heading", heading))
        .expect_err("invalid heading");
    assert!(matches!(err, CatalogueSeedError::Parse { .. }));
}

#[rstest]
fn rejects_dangling_domain_in_table(minimal: Value) {
    let seed = with(
        minimal,
        "/schemas/0/tables/0/heading/0/domain",
        json!("COUNTRY"),
    );
    let err = CatalogueSeed::from_value(seed).expect_err("dangling domain");
    assert_eq!(
        err,
        CatalogueSeedError::UnknownDomain {
            relation: "BOOKINGS_OND".to_owned(),
            column: "BOARD_CITY".to_owned(),
            domain: "COUNTRY".to_owned(),
        }
    );
}

#[rstest]
fn rejects_dangling_domain_in_query_result(minimal: Value) {
    let seed = with(minimal, "/queries/0/heading/0/domain", json!("COUNTRY"));
    let err = CatalogueSeed::from_value(seed).expect_err("dangling domain");
    assert!(matches!(err, CatalogueSeedError::UnknownDomain { relation, .. } if relation == "q1"));
}

#[rstest]
fn rejects_grants_of_unknown_schemas(minimal: Value) {
    let err = CatalogueSeed::from_value(with(minimal, "/grants/market", json!(["HR"])))
        .expect_err("unknown schema");
    assert_eq!(
        err,
        CatalogueSeedError::UnknownSchema {
            role: "market".to_owned(),
            schema: "HR".to_owned(),
        }
    );
}

#[rstest]
#[case("/queries/0/statement", json!("   "))]
#[case("/accounts/0/passwordSha256", json!("abc"))]
#[case("/accounts/0/id", json!("market"))]
#[case("/schemas/0/name", json!(""))]
fn rejects_invalid_values(minimal: Value, #[case] pointer: &str, #[case] value: Value) {
    let err = CatalogueSeed::from_value(with(minimal, pointer, value)).expect_err("invalid");
    assert!(matches!(err, CatalogueSeedError::Invalid { .. }), "{err}");
}

#[rstest]
fn account_checks_password_digest(minimal: Value) {
    let seed = CatalogueSeed::from_value(minimal).expect("valid seed");
    let account = seed.accounts.first().expect("account");
    assert!(account.password_matches("pw"));
    assert!(!account.password_matches("PW"));
}

#[rstest]
fn loads_seed_files(minimal: Value) {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(minimal.to_string().as_bytes()).expect("write seed");
    let seed = CatalogueSeed::from_file(file.path()).expect("seed file");
    assert_eq!(seed.summary().accounts, 1);
}

#[rstest]
fn reports_missing_files() {
    let err = CatalogueSeed::from_file(std::path::Path::new("/nonexistent/catalogue.json"))
        .expect_err("missing file");
    assert!(matches!(err, CatalogueSeedError::Io { .. }));
}

#[rstest]
fn reports_malformed_json() {
    let err = CatalogueSeed::from_json("{ not json").expect_err("malformed");
    assert!(matches!(err, CatalogueSeedError::Parse { .. }));
}
