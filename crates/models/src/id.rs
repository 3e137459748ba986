//! Route parameters arrive as strings; the store keys documents by ObjectId.
//! The conversion is explicit and fallible so a malformed id surfaces as
//! [`ModelError::InvalidId`] instead of a driver exception.

use mongodb::bson::oid::ObjectId;

use crate::errors::ModelError;

pub fn parse_object_id(raw: &str) -> Result<ObjectId, ModelError> {
    ObjectId::parse_str(raw).map_err(|_| ModelError::InvalidId(raw.to_string()))
}

/// Fresh id for stores that do not generate their own.
pub fn new_id() -> String {
    ObjectId::new().to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_24_hex_chars() {
        let oid = parse_object_id("63756f8ad1c9a7a1b2c3d4e5").unwrap();
        assert_eq!(oid.to_hex(), "63756f8ad1c9a7a1b2c3d4e5");
    }

    #[test]
    fn rejects_malformed_ids() {
        for raw in ["", "S1", "63756f8ad1c9a7a1b2c3d4e", "zz756f8ad1c9a7a1b2c3d4e5", " 63756f8ad1c9a7a1b2c3d4e5"] {
            assert_eq!(parse_object_id(raw), Err(ModelError::InvalidId(raw.to_string())));
        }
    }

    #[test]
    fn generated_ids_parse_back() {
        let id = new_id();
        assert_eq!(parse_object_id(&id).unwrap().to_hex(), id);
    }
}
