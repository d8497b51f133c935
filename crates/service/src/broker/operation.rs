use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Opaque operation data handed to the platform after an async provision and
/// echoed back on `last_operation`. Nothing is persisted server-side.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationToken {
    #[serde(default)]
    pub release_name: String,
}

impl OperationToken {
    pub fn new(release_name: impl Into<String>) -> Self {
        Self { release_name: release_name.into() }
    }

    pub fn encode(&self) -> Result<String, ServiceError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(data: &str) -> Result<Self, ServiceError> {
        serde_json::from_str(data)
            .map_err(|e| ServiceError::Decode(format!("operation data {:?}: {}", data, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_form() {
        let token = OperationToken::new("wobbly-panda");
        assert_eq!(token.encode().unwrap(), r#"{"release_name":"wobbly-panda"}"#);
    }

    #[test]
    fn release_names_with_quotes_survive() {
        let token = OperationToken::new(r#"we"ird"#);
        assert_eq!(OperationToken::decode(&token.encode().unwrap()).unwrap(), token);
    }

    #[test]
    fn decode_accepts_hand_written_json() {
        let token = OperationToken::decode(r#"{"release_name": "r1"}"#).unwrap();
        assert_eq!(token.release_name, "r1");
        assert_eq!(OperationToken::decode("{}").unwrap().release_name, "");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(OperationToken::decode(""), Err(ServiceError::Decode(_))));
        assert!(matches!(OperationToken::decode("r1"), Err(ServiceError::Decode(_))));
    }
}
