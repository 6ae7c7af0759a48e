//! Unwrapping of the backend's `{success, error?, <payload>}` responses.

use super::{ApiError, Endpoint};
use serde::de::DeserializeOwned;
use serde_json::Value;

const UNKNOWN_ERROR: &str = "erro desconhecido";

/// Fail with the backend's own message unless the response reports success.
pub fn check_success(endpoint: &Endpoint, response: &Value) -> Result<(), ApiError> {
    let flag = response.get("success").and_then(Value::as_bool);
    let ok = match flag {
        Some(flag) => flag,
        None => !endpoint.requires_success_flag() && response.get("error").is_none(),
    };
    if ok {
        Ok(())
    } else {
        Err(ApiError::Backend {
            endpoint: endpoint.to_string(),
            message: error_message(response),
        })
    }
}

/// The `error` string of a response, if any
pub fn error_message(response: &Value) -> String {
    response
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_ERROR)
        .to_string()
}

/// Deserialize the payload of a successful response. The first non-null key
/// from [`Endpoint::payload_keys`] wins; endpoints without keys deserialize
/// the whole response.
pub fn payload<T: DeserializeOwned>(endpoint: &Endpoint, mut response: Value) -> Result<T, ApiError> {
    check_success(endpoint, &response)?;

    let keys = endpoint.payload_keys();
    let body = if keys.is_empty() {
        response
    } else {
        let found = keys
            .iter()
            .find(|key| response.get(**key).is_some_and(|v| !v.is_null()))
            .copied();
        match found {
            Some(key) => response[key].take(),
            None => {
                return Err(ApiError::Payload {
                    endpoint: endpoint.to_string(),
                    message: format!("missing {}", keys.join(" or ")),
                })
            }
        }
    };

    serde_json::from_value(body).map_err(|err| ApiError::Payload {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Installment, InstallmentBucket};
    use serde_json::json;

    #[test]
    fn payload_under_primary_or_data_key() {
        let endpoint = Endpoint::Installments(InstallmentBucket::Pending);
        let named = json!({"success": true, "installments": [{"external_reference": "A"}]});
        let data = json!({"success": true, "data": [{"external_reference": "B"}]});

        let named: Vec<Installment> = payload(&endpoint, named).unwrap();
        let data: Vec<Installment> = payload(&endpoint, data).unwrap();
        assert_eq!(named[0].external_reference, "A");
        assert_eq!(data[0].external_reference, "B");
    }

    #[test]
    fn success_false_surfaces_backend_error() {
        let endpoint = Endpoint::Process;
        let response = json!({"success": false, "error": "arquivo ausente"});
        let err = payload::<Value>(&endpoint, response).unwrap_err();
        assert!(matches!(err, ApiError::Backend { ref message, .. } if message == "arquivo ausente"));
    }

    #[test]
    fn missing_success_flag_is_a_failure() {
        let endpoint = Endpoint::Summary;
        let err = payload::<Value>(&endpoint, json!({"error": "Dados não processados"})).unwrap_err();
        assert!(err.to_string().contains("Dados não processados"));
    }

    #[test]
    fn status_needs_no_success_flag() {
        assert!(check_success(&Endpoint::Status, &json!({"processed": true})).is_ok());
        assert!(check_success(&Endpoint::Status, &json!({"error": "boom"})).is_err());
    }

    #[test]
    fn missing_payload_key_is_reported() {
        let endpoint = Endpoint::Transactions;
        let err = payload::<Value>(&endpoint, json!({"success": true})).unwrap_err();
        assert!(matches!(err, ApiError::Payload { .. }));
    }
}
