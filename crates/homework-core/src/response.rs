//! Shape checks for the `homework_statuses` response.

use serde_json::Value;

use crate::error::{Result, WatchError};

/// Key holding the list of homework records.
pub const HOMEWORKS_KEY: &str = "homeworks";

/// Key holding the server timestamp to use as the next cursor.
pub const CURRENT_DATE_KEY: &str = "current_date";

/// Check that the response is an object with a `homeworks` array.
///
/// Returns the records on success, newest first as the API orders them.
pub fn check_response(response: &Value) -> Result<&[Value]> {
    let object = response.as_object().ok_or(WatchError::TypeMismatch {
        what: "response",
        expected: "object",
    })?;

    let homeworks = object
        .get(HOMEWORKS_KEY)
        .ok_or_else(|| WatchError::MissingKey {
            what: "response",
            keys: vec![HOMEWORKS_KEY],
        })?;

    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or(WatchError::TypeMismatch {
            what: "homeworks",
            expected: "array",
        })
}

/// The `current_date` cursor, if the response carries an integral one.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get(CURRENT_DATE_KEY).and_then(Value::as_i64)
}
