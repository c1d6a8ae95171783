use std::collections::HashMap;

/// Read-only view of the variables `$NAME` words are expanded from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Snapshot of the process environment.
    pub fn new() -> Self {
        Environment {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Environment {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|v| v.as_str())
    }
}
