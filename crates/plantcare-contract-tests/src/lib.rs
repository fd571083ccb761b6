//! Schema and fixture locations for the API envelope contracts.

/// Contract directory at the workspace root.
pub const CONTRACTS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../contracts");

/// Path of `<name>.schema.json`.
pub fn schema_path(name: &str) -> String {
    format!("{CONTRACTS_DIR}/{name}.schema.json")
}

/// Path of `fixtures/<name>.valid.json`.
pub fn fixture_path(name: &str) -> String {
    format!("{CONTRACTS_DIR}/fixtures/{name}.valid.json")
}
