//! Homework records and their review verdicts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, WatchError};

/// Review status reported by the Practicum API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeworkStatus {
    /// The reviewer accepted the work.
    Approved,
    /// A reviewer has picked the work up.
    Reviewing,
    /// The reviewer sent the work back with remarks.
    Rejected,
}

impl HomeworkStatus {
    /// Every known status.
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    /// The wire code for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// The fixed sentence shown to the student for this status.
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self> {
        HomeworkStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| WatchError::UnknownStatus {
                status: s.to_string(),
            })
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submission as returned under `homeworks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeworkRecord {
    /// Name of the submitted work.
    pub homework_name: String,
    /// Current review status.
    pub status: HomeworkStatus,
}

impl HomeworkRecord {
    /// Extract a record from one element of the `homeworks` array.
    ///
    /// Reports every missing key at once; a present key with a non-string
    /// value is a type mismatch, and an unrecognized status string is
    /// [`WatchError::UnknownStatus`].
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or(WatchError::TypeMismatch {
            what: "homework",
            expected: "object",
        })?;

        let missing: Vec<&'static str> = ["homework_name", "status"]
            .into_iter()
            .filter(|key| !object.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(WatchError::MissingKey {
                what: "homework",
                keys: missing,
            });
        }

        let homework_name = object["homework_name"]
            .as_str()
            .ok_or(WatchError::TypeMismatch {
                what: "homework_name",
                expected: "string",
            })?;
        let status = object["status"].as_str().ok_or(WatchError::TypeMismatch {
            what: "status",
            expected: "string",
        })?;

        Ok(Self {
            homework_name: homework_name.to_string(),
            status: status.parse()?,
        })
    }

    /// Human-readable notification text for this record.
    pub fn message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.homework_name,
            self.status.verdict()
        )
    }
}

/// Translate one homework record into the notification text.
pub fn parse_status(homework: &Value) -> Result<String> {
    HomeworkRecord::from_value(homework).map(|record| record.message())
}
