//! DTOs for the identity service wire format.
//!
//! Requests are lists of typed parameters. Responses wrap the real payload in
//! an `APIResponseText` envelope whose value is itself JSON-encoded text, so
//! decoding happens in two typed steps: envelope first, then payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ClientPassword;
use crate::domain::ports::{IdentityGatewayError, LoginRecord, SessionToken};

const STRING_PARAM: &str = "string";

/// One typed request parameter.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ParamDto<'a> {
    param_name: &'a str,
    param_value: &'a str,
    param_type: &'static str,
}

impl<'a> ParamDto<'a> {
    pub(super) fn string(name: &'a str, value: &'a str) -> Self {
        Self {
            param_name: name,
            param_value: value,
            param_type: STRING_PARAM,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EnvelopeDto {
    #[serde(rename = "APIResponseText")]
    api_response_text: Value,
}

/// Decode the outer envelope and return the nested payload.
///
/// The nested payload is normally a JSON string; an already-decoded object is
/// accepted as well.
pub(super) fn decode_envelope(body: &[u8]) -> Result<Value, IdentityGatewayError> {
    let envelope: EnvelopeDto = serde_json::from_slice(body)
        .map_err(|err| IdentityGatewayError::envelope(err.to_string()))?;
    match envelope.api_response_text {
        Value::String(text) => serde_json::from_str(&text)
            .map_err(|err| IdentityGatewayError::payload(err.to_string())),
        Value::Null => Err(IdentityGatewayError::envelope("APIResponseText is null")),
        other => Ok(other),
    }
}

#[derive(Debug, Deserialize)]
struct LoginPayloadDto {
    #[serde(rename = "Table", default)]
    table: Option<Vec<LoginRowDto>>,
}

#[derive(Debug, Deserialize)]
struct LoginRowDto {
    #[serde(rename = "compGuid", default)]
    comp_guid: Option<String>,
    #[serde(rename = "webPswd", default)]
    web_pswd: Option<String>,
    #[serde(default)]
    bid: Value,
    #[serde(default)]
    uid: Value,
}

/// Integers arrive as numbers or numeric strings; anything else reads as 0.
///
/// Only whole values count: `"5abc"` and `5.7` both read as 0.
fn lenient_int(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number.as_i64().unwrap_or(0),
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

pub(super) fn parse_login(payload: Value) -> Result<LoginRecord, IdentityGatewayError> {
    let decoded: LoginPayloadDto = serde_json::from_value(payload)
        .map_err(|err| IdentityGatewayError::payload(err.to_string()))?;
    let row = decoded
        .table
        .and_then(|rows| rows.into_iter().next())
        .ok_or_else(IdentityGatewayError::no_data)?;

    let comp_guid = row
        .comp_guid
        .filter(|guid| !guid.trim().is_empty())
        .ok_or_else(|| IdentityGatewayError::payload("login row has no compGuid"))?;
    let web_password = row
        .web_pswd
        .and_then(|password| ClientPassword::new(password).ok())
        .ok_or_else(|| IdentityGatewayError::payload("login row has no webPswd"))?;

    Ok(LoginRecord {
        comp_guid,
        web_password,
        bid: lenient_int(&row.bid),
        uid: lenient_int(&row.uid),
    })
}

#[derive(Debug, Default, Deserialize)]
struct TokenDto {
    #[serde(rename = "SessionToken", alias = "sessionToken", alias = "token", default)]
    session_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthPayloadDto {
    #[serde(flatten)]
    top_level: TokenDto,
    #[serde(rename = "Table", default)]
    table: Option<Vec<TokenDto>>,
}

/// Extract the session token from the top level or the first table row.
pub(super) fn parse_auth(payload: Value) -> Result<SessionToken, IdentityGatewayError> {
    let decoded: AuthPayloadDto = serde_json::from_value(payload)
        .map_err(|err| IdentityGatewayError::payload(err.to_string()))?;
    let from_table = decoded
        .table
        .and_then(|rows| rows.into_iter().next())
        .and_then(|row| row.session_token);
    decoded
        .top_level
        .session_token
        .or(from_table)
        .and_then(SessionToken::new)
        .ok_or_else(IdentityGatewayError::missing_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn wrapped(payload: Value) -> Vec<u8> {
        serde_json::to_vec(&json!({ "APIResponseText": payload.to_string() }))
            .expect("encode envelope")
    }

    #[rstest]
    fn params_serialise_as_typed_triples() {
        let params = [ParamDto::string("phone", "+972501234567")];
        assert_eq!(
            serde_json::to_value(params).expect("encode"),
            json!([{ "paramName": "phone", "paramValue": "+972501234567", "paramType": "string" }])
        );
    }

    #[rstest]
    fn envelope_text_is_decoded_a_second_time() {
        let payload = decode_envelope(&wrapped(json!({ "Table": [] }))).expect("decode");
        assert_eq!(payload, json!({ "Table": [] }));
    }

    #[rstest]
    #[case(b"not json".as_slice())]
    #[case(br#"{"Other": 1}"#.as_slice())]
    #[case(br#"{"APIResponseText": null}"#.as_slice())]
    fn malformed_envelopes_are_reported(#[case] body: &[u8]) {
        let error = decode_envelope(body).expect_err("bad envelope");
        assert!(matches!(error, IdentityGatewayError::Envelope { .. }));
    }

    #[rstest]
    fn malformed_nested_text_is_a_payload_error() {
        let body = br#"{"APIResponseText": "{not json"}"#;
        let error = decode_envelope(body).expect_err("bad payload");
        assert!(matches!(error, IdentityGatewayError::Payload { .. }));
    }

    #[rstest]
    #[case(json!("5"), 5)]
    #[case(json!(5), 5)]
    #[case(json!(" 12 "), 12)]
    #[case(json!("abc"), 0)]
    #[case(json!("5abc"), 0)]
    #[case(json!(null), 0)]
    #[case(json!(1.5), 0)]
    fn integers_are_read_leniently(#[case] raw: Value, #[case] expected: i64) {
        assert_eq!(lenient_int(&raw), expected);
    }

    #[rstest]
    fn login_takes_the_first_table_row() {
        let record = parse_login(json!({
            "Table": [
                { "compGuid": "C1", "webPswd": "p", "bid": "5", "uid": "9" },
                { "compGuid": "C2", "webPswd": "q", "bid": 1, "uid": 1 }
            ]
        }))
        .expect("login record");
        assert_eq!(record.comp_guid, "C1");
        assert_eq!(record.web_password.expose(), "p");
        assert_eq!((record.bid, record.uid), (5, 9));
    }

    #[rstest]
    #[case(json!({ "Table": [] }))]
    #[case(json!({ "Table": null }))]
    #[case(json!({}))]
    fn empty_tables_mean_no_data(#[case] payload: Value) {
        assert_eq!(parse_login(payload), Err(IdentityGatewayError::NoData));
    }

    #[rstest]
    fn login_rows_without_credentials_are_payload_errors() {
        let error = parse_login(json!({ "Table": [{ "compGuid": "C1" }] })).expect_err("no pswd");
        assert!(matches!(error, IdentityGatewayError::Payload { .. }));
    }

    #[rstest]
    #[case(json!({ "SessionToken": "abc" }))]
    #[case(json!({ "sessionToken": "abc" }))]
    #[case(json!({ "Table": [{ "SessionToken": "abc" }] }))]
    fn auth_token_is_found(#[case] payload: Value) {
        assert!(parse_auth(payload).is_ok());
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "SessionToken": "" }))]
    #[case(json!({ "Table": [] }))]
    fn absent_or_blank_tokens_are_missing(#[case] payload: Value) {
        assert_eq!(
            parse_auth(payload).map(|_| ()),
            Err(IdentityGatewayError::MissingToken)
        );
    }
}
