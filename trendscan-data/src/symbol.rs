use derive_more::Display;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Identifier of an equity in the scan universe, eg/ `RELIANCE.NS`.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display)]
#[serde(transparent)]
pub struct Symbol(pub SmolStr);

impl Symbol {
    pub fn new<S>(symbol: S) -> Self
    where
        S: Into<SmolStr>,
    {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
