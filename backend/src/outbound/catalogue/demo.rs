//! Built-in demonstration catalogue, served when no catalogue file is
//! configured.
//!
//! | Account  | Password        | Sees schema |
//! |----------|-----------------|-------------|
//! | `market` | `market-secret` | `MARKET`    |
//! | `hr`     | `hr-secret`     | `HR`        |

use serde_json::json;

use super::in_memory::InMemoryCatalogue;
use super::seed::{CatalogueSeed, CatalogueSeedError, SUPPORTED_VERSION, password_sha256};

/// User id of the `market` account.
pub const MARKET_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
/// Password of the `market` account.
pub const MARKET_PASSWORD: &str = "market-secret";
/// User id of the `hr` account.
pub const HR_USER_ID: &str = "9b2e4c1a-7f3d-4e8b-a6c5-1d0f2e3b4a59";
/// Password of the `hr` account.
pub const HR_PASSWORD: &str = "hr-secret";

/// The demonstration seed.
///
/// # Errors
///
/// Fails only if the built-in data stops validating.
pub fn demo_seed() -> Result<CatalogueSeed, CatalogueSeedError> {
    CatalogueSeed::from_value(json!({
        "version": SUPPORTED_VERSION,
        "domains": [
            { "id": "CURRENCY", "name": "CURRENCY", "description": "ISO 4217 currency code" },
            { "id": "EMPLOYEE_ID", "name": "EMPLOYEE_ID" },
            { "id": "IATA_CITY", "name": "IATA_CITY" }
        ],
        "schemas": [
            {
                "id": "MARKET",
                "name": "Market",
                "tables": [
                    {
                        "id": "BOOKINGS_OND",
                        "name": "BOOKINGS_OND",
                        "heading": [{ "name": "BOARD_CITY", "domain": "IATA_CITY" }]
                    },
                    {
                        "id": "FARES",
                        "name": "FARES",
                        "heading": [
                            { "name": "ORIGIN", "domain": "IATA_CITY" },
                            { "name": "AMOUNT" },
                            { "name": "CURRENCY", "domain": "CURRENCY" }
                        ]
                    }
                ]
            },
            {
                "id": "HR",
                "name": "Human resources",
                "tables": [
                    {
                        "id": "EMPLOYEES",
                        "name": "EMPLOYEES",
                        "heading": [
                            { "name": "EMPLOYEE_ID", "domain": "EMPLOYEE_ID" },
                            { "name": "BASE_CITY", "domain": "IATA_CITY" }
                        ]
                    }
                ]
            }
        ],
        "queries": [
            {
                "id": "q1",
                "statement": "SELECT a",
                "state": "finished",
                "heading": [{ "name": "a", "domain": "IATA_CITY" }]
            },
            { "id": "q2", "statement": "SELECT * FROM FARES", "state": "running" },
            { "id": "q3", "statement": "SELECT b", "state": "failed" }
        ],
        "accounts": [
            {
                "id": MARKET_USER_ID,
                "username": "market",
                "passwordSha256": password_sha256(MARKET_PASSWORD),
                "role": "market"
            },
            {
                "id": HR_USER_ID,
                "username": "hr",
                "passwordSha256": password_sha256(HR_PASSWORD),
                "role": "hr"
            }
        ],
        "grants": { "market": ["MARKET"], "hr": ["HR"] }
    }))
}

/// The demonstration catalogue.
///
/// # Errors
///
/// Fails only if the built-in data stops validating.
///
/// # Examples
/// ```
/// use sqlegalize::outbound::catalogue::demo_catalogue;
///
/// let catalogue = demo_catalogue().expect("demo catalogue");
/// assert!(catalogue.policy().roles().any(|role| role.as_str() == "market"));
/// ```
pub fn demo_catalogue() -> Result<InMemoryCatalogue, CatalogueSeedError> {
    demo_seed().map(InMemoryCatalogue::new)
}
