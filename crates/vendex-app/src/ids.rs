// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! request_token {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

request_token!(FetchToken);
request_token!(MutationToken);

/// Business registration number; the primary key of an account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyNumber(String);

impl CompanyNumber {
    /// Surrounding whitespace is not part of the key.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{CompanyNumber, FetchToken};

    #[test]
    fn company_number_rejects_blank_values() {
        assert!(CompanyNumber::parse("").is_none());
        assert!(CompanyNumber::parse("   ").is_none());
        assert_eq!(
            CompanyNumber::parse("123-45-67890").map(|key| key.to_string()),
            Some("123-45-67890".to_owned())
        );
    }

    #[test]
    fn company_number_drops_surrounding_whitespace() {
        let key = CompanyNumber::parse(" 7 ").map(|key| key.as_str().to_owned());
        assert_eq!(key.as_deref(), Some("7"));
    }

    #[test]
    fn tokens_order_by_issue_sequence() {
        assert!(FetchToken::new(1) < FetchToken::new(2));
        assert_eq!(FetchToken::from(7).get(), 7);
    }
}
