use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use super::{DecodeError, decode_json};
use crate::domain::UserInfo;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfoJsonResponse {
    account_type: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    registered: DateTime<FixedOffset>,
    status: String,
    user_id: i64,
}

pub fn decode_user_info_json_response(json: &str) -> Result<UserInfo, DecodeError> {
    let parsed: UserInfoJsonResponse = decode_json("user info", json)?;
    Ok(UserInfo {
        account_type: parsed.account_type,
        email: parsed.email,
        phone: parsed.phone,
        registered: parsed.registered,
        status: parsed.status,
        user_id: parsed.user_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_profile() {
        let json = r#"
        {
          "accountType": "INDIVIDUAL",
          "email": "user@example.com",
          "phone": "79990001122",
          "registered": "2019-05-04T11:22:33+03:00",
          "status": "ACTIVE",
          "userId": 1234567
        }
        "#;

        let info = decode_user_info_json_response(json).unwrap();
        assert_eq!(info.account_type, "INDIVIDUAL");
        assert_eq!(info.email, "user@example.com");
        assert_eq!(info.user_id, 1_234_567);
        assert_eq!(info.registered.to_rfc3339(), "2019-05-04T11:22:33+03:00");
    }

    #[test]
    fn mistyped_user_id_is_rejected() {
        let json = r#"
        {
          "accountType": "INDIVIDUAL",
          "registered": "2019-05-04T11:22:33+03:00",
          "status": "ACTIVE",
          "userId": "abc"
        }
        "#;

        let err = decode_user_info_json_response(json).unwrap_err();
        assert!(matches!(err, DecodeError::Json { context: "user info", .. }));
    }
}
