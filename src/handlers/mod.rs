// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no token) → Protected (principal resolved) → Elevated (resolved + role gate)

pub mod cookies;
pub mod elevated; // Tier 3: level and group management
pub mod protected; // Tier 2: any logged-in user
pub mod public; // Tier 1: registration and token acquisition

use uuid::Uuid;

use crate::error::ApiError;

/// Parse an id taken from the URL path.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request(format!("Invalid id '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_ids_must_be_uuids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert_eq!(parse_id("42").unwrap_err().status_code(), 400);
    }
}
