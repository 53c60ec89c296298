// src/params/mod.rs

//! Experiment parameters encoded in benchmark filenames.
//!
//! A run file is named like `alchemy,limits,b=1000,c=100,p=h2,i=3.csv`: the
//! stem is a comma separated token list where `key=value` tokens carry named
//! parameters and bare tokens are addressed by their position. Position 0 is
//! always the provider.

use indexmap::IndexMap;
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path};

/// One comma separated token of a filename stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare token, addressed by its index in the full token list.
    Positional { index: usize, value: String },
    /// `key=value` token, split on the first `=`.
    Keyed { key: String, value: String },
}

/// Split a stem into tokens. An empty stem has no tokens.
pub fn tokenize(stem: &str) -> Vec<Token> {
    if stem.is_empty() {
        return Vec::new();
    }

    stem.split(',')
        .enumerate()
        .map(|(index, tok)| match tok.split_once('=') {
            Some((key, value)) => Token::Keyed {
                key: key.to_string(),
                value: value.to_string(),
            },
            None => Token::Positional {
                index,
                value: tok.to_string(),
            },
        })
        .collect()
}

/// Strip directories and everything from the first `.` of the file name.
pub fn stem_of(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name,
    }
}

/// Decoded filename parameters.
///
/// Keyed parameters are last-wins: a repeated key replaces the earlier value
/// but keeps the position of its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedParams {
    by_position: BTreeMap<usize, String>,
    by_key: IndexMap<String, String>,
}

impl ParsedParams {
    pub fn parse(stem: &str) -> Self {
        let mut params = Self::default();
        for token in tokenize(stem) {
            match token {
                Token::Positional { index, value } => {
                    params.by_position.insert(index, value);
                }
                Token::Keyed { key, value } => {
                    params.by_key.insert(key, value);
                }
            }
        }
        params
    }

    pub fn from_path(path: &Path) -> Self {
        Self::parse(&stem_of(path))
    }

    pub fn position(&self, index: usize) -> Option<&str> {
        self.by_position.get(&index).map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    pub fn provider(&self) -> Option<&str> {
        self.position(0)
    }

    pub fn positional(&self) -> impl Iterator<Item = (usize, &str)> {
        self.by_position.iter().map(|(i, v)| (*i, v.as_str()))
    }

    pub fn keyed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_key.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Every parameter as `(name, value)`, positional entries first (named by
    /// their decimal index), then keyed entries in token order.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.positional()
            .map(|(i, v)| (i.to_string(), v.to_string()))
            .chain(self.keyed().map(|(k, v)| (k.to_string(), v.to_string())))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty() && self.by_key.is_empty()
    }
}

/// Address of a single filename parameter.
///
/// Deserializes from a YAML/JSON integer (position) or string (key).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ParamRef {
    Position(usize),
    Key(String),
}

impl ParamRef {
    pub fn key(key: &str) -> Self {
        ParamRef::Key(key.to_string())
    }

    pub fn resolve<'a>(&self, params: &'a ParsedParams) -> Option<&'a str> {
        match self {
            ParamRef::Position(i) => params.position(*i),
            ParamRef::Key(k) => params.get(k),
        }
    }
}
