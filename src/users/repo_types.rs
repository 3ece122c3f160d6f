use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Row of `tbl_user`. Serialized with the column names as keys, hash included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub user_password: String, // Argon2 PHC string
}

/// Insert/overwrite payload; `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Key used to address a row. Path segments parse from plain decimal digits;
/// request bodies may carry any integer. Values beyond `i64` clamp to
/// `i64::MAX`, which no SERIAL row can hold, so they address nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self(i64::from(id))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid user id: {0:?}")]
pub struct InvalidUserId(pub String);

impl FromStr for UserId {
    type Err = InvalidUserId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidUserId(s.to_string()));
        }
        // digits only, so the sole parse failure left is overflow
        Ok(Self(s.parse::<i64>().unwrap_or(i64::MAX)))
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Signed(i64),
            Unsigned(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Signed(n) => Ok(Self(n)),
            Raw::Unsigned(n) => Ok(Self(i64::try_from(n).unwrap_or(i64::MAX))),
            Raw::Text(s) => {
                let s = s.trim();
                match s.strip_prefix('-') {
                    Some(digits) => digits
                        .parse::<UserId>()
                        .map(|id| Self(-id.0))
                        .map_err(|_| serde::de::Error::custom(InvalidUserId(s.to_string()))),
                    None => s.parse().map_err(serde::de::Error::custom),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_digits_only() {
        assert_eq!("42".parse::<UserId>().unwrap().get(), 42);
        assert_eq!("0".parse::<UserId>().unwrap().get(), 0);
        assert_eq!("3000000000".parse::<UserId>().unwrap().get(), 3_000_000_000);
        assert!("-1".parse::<UserId>().is_err());
        assert!("+1".parse::<UserId>().is_err());
        assert!("1.5".parse::<UserId>().is_err());
        assert!("abc".parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn oversized_digits_clamp_instead_of_failing() {
        let id: UserId = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(id.get(), i64::MAX);
    }

    #[test]
    fn deserializes_from_number_or_string() {
        let from_num: UserId = serde_json::from_str("7").unwrap();
        let from_str: UserId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(from_num, from_str);
        assert!(serde_json::from_str::<UserId>("\"x\"").is_err());
    }

    #[test]
    fn body_ids_accept_any_integer() {
        let negative: UserId = serde_json::from_str("-3").unwrap();
        assert_eq!(negative.get(), -3);
        let negative_text: UserId = serde_json::from_str("\"-3\"").unwrap();
        assert_eq!(negative_text.get(), -3);
        let wide: UserId = serde_json::from_str("3000000000").unwrap();
        assert_eq!(wide.get(), 3_000_000_000);
        let huge: UserId = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(huge.get(), i64::MAX);
    }

    #[test]
    fn user_serializes_with_column_names() {
        let user = User {
            user_id: 1,
            user_name: "Alice".into(),
            user_email: "a@x.com".into(),
            user_password: "$argon2id$...".into(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "user_id": 1,
                "user_name": "Alice",
                "user_email": "a@x.com",
                "user_password": "$argon2id$...",
            })
        );
    }
}
