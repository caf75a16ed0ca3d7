//! Access to request parameters.

use std::collections::{BTreeMap, HashMap};

use crate::config::DslSettings;

/// A read-only view over request parameters.
pub trait ParamValues {
    /// The raw value of `key`, if present.
    fn get(&self, key: &str) -> Option<&str>;

    /// The value of `key`, treating blank values as absent.
    fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Split a list parameter. Blank or absent values yield an empty list.
    fn list(&self, key: &str, separator: &str) -> Vec<String> {
        self.get_non_blank(key)
            .map(|v| v.split(separator).map(str::to_string).collect())
            .unwrap_or_default()
    }
}

impl<P: ParamValues + ?Sized> ParamValues for &P {
    fn get(&self, key: &str) -> Option<&str> {
        (**self).get(key)
    }
}

impl ParamValues for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl ParamValues for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}

/// An owned parameter set, e.g. a decoded query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    /// Parse `key=value` pairs. The value may be empty (`filter_values=`).
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected key=value, got '{}'", pair))?;
            params.set(key.trim(), value);
        }
        Ok(params)
    }
}

impl ParamValues for Params {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// List separator for a request: `filter_separator`, else the configured one.
pub fn filter_separator(params: &dyn ParamValues, dsl: &DslSettings) -> String {
    params
        .get_non_blank("filter_separator")
        .unwrap_or(&dsl.separator)
        .to_string()
}

/// Argument separator for a request: `filter_args_separator`, else the configured one.
pub fn filter_args_separator(params: &dyn ParamValues, dsl: &DslSettings) -> String {
    params
        .get_non_blank("filter_args_separator")
        .unwrap_or(&dsl.args_separator)
        .to_string()
}
