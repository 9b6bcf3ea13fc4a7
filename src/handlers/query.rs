// src/handlers/query.rs
// DOCUMENTATION: Query-string extractor where the first occurrence of a key wins
// PURPOSE: A repeated key (?code=a&code=b) must not turn a redirect or a
// lenient lookup into a deserialize error

use crate::errors::ApiError;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::future::{ready, Ready};

/// Like `web::Query<T>`, but duplicate keys keep their first value
#[derive(Debug)]
pub struct FirstQuery<T>(pub T);

impl<T> FirstQuery<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for FirstQuery<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

/// Parse a raw query string into `T`, keeping the first value of each key
/// DOCUMENTATION: Every value stays a string, so `T` should use string fields
pub fn parse_first_wins<T: DeserializeOwned>(query_string: &str) -> Result<T, String> {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(query_string)
        .map_err(|e| e.to_string())?
        .into_inner();

    let mut map = Map::new();
    for (key, value) in pairs {
        map.entry(key).or_insert(Value::String(value));
    }

    serde_json::from_value(Value::Object(map)).map_err(|e| e.to_string())
}

impl<T: DeserializeOwned> FromRequest for FirstQuery<T> {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = parse_first_wins(req.query_string())
            .map(FirstQuery)
            .map_err(|e| {
                log::warn!("Unreadable query string on {}: {}", req.path(), e);
                ApiError::InvalidParameter(format!("Invalid query string: {}", e)).into()
            });

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Params {
        code: Option<String>,
        error: Option<String>,
    }

    #[test]
    fn test_repeated_key_keeps_first_value() {
        let params: Params = parse_first_wins("code=a&code=b").unwrap();
        assert_eq!(params.code.as_deref(), Some("a"));
        assert_eq!(params.error, None);
    }

    #[test]
    fn test_percent_decoding_and_unknown_keys() {
        let params: Params = parse_first_wins("error=access%20denied&state=xyz").unwrap();
        assert_eq!(params.error.as_deref(), Some("access denied"));
    }

    #[test]
    fn test_empty_query_string() {
        let params: Params = parse_first_wins("").unwrap();
        assert_eq!(params, Params { code: None, error: None });
    }
}
