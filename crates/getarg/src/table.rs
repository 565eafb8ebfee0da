use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

use crate::conf::ConfEntry;

/// Normalize a flag name to its canonical `-name` form.
///
/// Any run of leading dashes collapses to a single one, so `--name`, `-name`
/// and `name` all map to `-name`. Returns `None` when nothing is left after the
/// dashes (`-`, `--`).
pub fn canonical_name(raw: &str) -> Option<String> {
    let name = raw.trim_start_matches('-');
    if name.is_empty() {
        None
    } else {
        Some(format!("-{name}"))
    }
}

/// `-name` -> `-noname`. `key` must already be canonical.
fn negation_of(key: &str) -> String {
    format!("-no{}", &key[1..])
}

/// `-noname` -> `-name`, or `None` if `key` is not a negation.
fn positive_of(key: &str) -> Option<String> {
    key.strip_prefix("-no")
        .filter(|rest| !rest.is_empty())
        .map(|rest| format!("-{rest}"))
}

/// Boolean reading of a raw value: only the literal `0` is false.
fn interpret_bool(raw: Option<&str>) -> bool {
    raw != Some("0")
}

enum Token<'a> {
    Flag { key: String, value: Option<&'a str> },
    Positional(&'a str),
    Skip,
}

fn classify(token: &str) -> Token<'_> {
    if token == "-" || !token.starts_with('-') {
        return Token::Positional(token);
    }
    let (head, value) = match token.split_once('=') {
        Some((head, value)) => (head, Some(value)),
        None => (token, None),
    };
    match canonical_name(head) {
        Some(key) => Token::Flag { key, value },
        None => Token::Skip,
    }
}

/// Parsed flags, keyed by canonical name.
///
/// Built once and never mutated afterwards; share it by reference (it is
/// `Send + Sync`) rather than through a global.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentTable {
    /// Effective value per key, in first-insertion order. `None` = bare flag.
    values: IndexMap<String, Option<String>>,
    occurrences: HashMap<String, Vec<Option<String>>>,
    positionals: Vec<String>,
}

impl ArgumentTable {
    /// Parse a full token list. Element 0 is the program name and is skipped.
    ///
    /// Later occurrences of a flag overwrite earlier ones. Tokens that do not
    /// start with `-` (and a lone `-`) are kept as positionals.
    pub fn parse<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::builder().tokens(tokens).build()
    }

    /// Start a table that also takes config-file entries or soft defaults.
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// Boolean lookup with `-noX` negation.
    ///
    /// - `name` present in any form: bare is `true`, `0` is `false`, any
    ///   other value (including empty, `00` or `no`) is `true`. This wins over
    ///   a negation flag regardless of token order.
    /// - otherwise `-no<name>` present: the inverse of its own reading, so
    ///   `-noX` and `-noX=1` give `false` while `-noX=0` gives `true`.
    /// - otherwise `default`.
    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        let Some(key) = canonical_name(name) else {
            return default;
        };
        if let Some(raw) = self.values.get(&key) {
            return interpret_bool(raw.as_deref());
        }
        match self.values.get(&negation_of(&key)) {
            Some(raw) => !interpret_bool(raw.as_deref()),
            None => default,
        }
    }

    /// String lookup. A bare flag yields `""`, not `default`.
    pub fn get_string<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.raw(name) {
            Some(Some(value)) => value,
            Some(None) => "",
            None => default,
        }
    }

    /// Integer lookup. `default` only when absent; a bare flag or a value that
    /// is not a base-10 integer yields `0`.
    pub fn get_int(&self, name: &str, default: i64) -> i64 {
        match self.raw(name) {
            Some(Some(value)) => value.parse().unwrap_or(0),
            Some(None) => 0,
            None => default,
        }
    }

    /// Every occurrence of `name` in the order it was seen (bare = `None`).
    pub fn get_all(&self, name: &str) -> &[Option<String>] {
        canonical_name(name)
            .and_then(|key| self.occurrences.get(&key))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `name` itself is present. Negation flags are not consulted.
    pub fn is_set(&self, name: &str) -> bool {
        canonical_name(name).is_some_and(|key| self.values.contains_key(&key))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Effective `(name, value)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Non-flag tokens in order.
    pub fn positionals(&self) -> &[String] {
        self.positionals.as_slice()
    }

    /// Serializable view of the table.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            flags: self
                .iter()
                .map(|(name, value)| FlagEntry { name, value })
                .collect(),
            positionals: self.positionals(),
        }
    }

    fn raw(&self, name: &str) -> Option<Option<&str>> {
        let key = canonical_name(name)?;
        self.values.get(&key).map(|v| v.as_deref())
    }

    fn insert(&mut self, key: String, value: Option<String>) {
        self.occurrences
            .entry(key.clone())
            .or_default()
            .push(value.clone());
        self.values.insert(key, value);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagEntry<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot<'a> {
    pub flags: Vec<FlagEntry<'a>>,
    pub positionals: &'a [String],
}

/// Construction phase of an [`ArgumentTable`].
///
/// Steps apply in call order. The usual sequence is command-line tokens,
/// then config entries, then soft defaults, so each later source only fills
/// gaps left by the earlier ones.
#[derive(Debug, Default)]
pub struct TableBuilder {
    table: ArgumentTable,
}

impl TableBuilder {
    /// Parse command-line tokens (element 0 is skipped); later flags overwrite
    /// earlier ones.
    pub fn tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = 0usize;
        for token in tokens.into_iter().skip(1) {
            let token = token.as_ref();
            match classify(token) {
                Token::Flag { key, value } => {
                    tracing::trace!(%key, ?value, "flag");
                    self.table.insert(key, value.map(str::to_owned));
                    flags += 1;
                }
                Token::Positional(arg) => self.table.positionals.push(arg.to_owned()),
                Token::Skip => tracing::trace!(token, "skipping token without a flag name"),
            }
        }
        tracing::debug!(
            flags,
            positionals = self.table.positionals.len(),
            "parsed command-line tokens"
        );
        self
    }

    /// Merge config-file entries.
    ///
    /// An entry only takes effect when neither its key nor the opposite
    /// `-no` form is present yet, so the command line and earlier config
    /// lines win. A config `listen=1` therefore leaves a command-line
    /// `-nolisten` in charge. Every entry is still recorded for
    /// [`ArgumentTable::get_all`].
    pub fn config_entries<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = ConfEntry>,
    {
        let mut applied = 0usize;
        let mut shadowed = 0usize;
        for entry in entries {
            let Some(key) = canonical_name(&entry.name) else {
                continue;
            };
            self.table
                .occurrences
                .entry(key.clone())
                .or_default()
                .push(entry.value.clone());
            if self.is_decided(&key) {
                tracing::trace!(%key, "config entry shadowed");
                shadowed += 1;
                continue;
            }
            self.table.values.insert(key, entry.value);
            applied += 1;
        }
        tracing::debug!(applied, shadowed, "merged config entries");
        self
    }

    /// Chaining form of [`TableBuilder::soft_set`].
    pub fn with_soft_default(mut self, name: &str, value: impl Into<String>) -> Self {
        self.soft_set(name, value);
        self
    }

    /// Chaining form of [`TableBuilder::soft_set_bool`].
    pub fn with_soft_bool(mut self, name: &str, value: bool) -> Self {
        self.soft_set_bool(name, value);
        self
    }

    /// Set `name=value` unless `name` is already present. Returns whether the
    /// value was applied; use [`TableBuilder::with_soft_default`] when the
    /// outcome does not matter.
    pub fn soft_set(&mut self, name: &str, value: impl Into<String>) -> bool {
        let Some(key) = canonical_name(name) else {
            return false;
        };
        if self.table.values.contains_key(&key) {
            tracing::debug!(%key, "soft default skipped, flag already set");
            return false;
        }
        let value = value.into();
        tracing::debug!(%key, %value, "soft default applied");
        self.table.insert(key, Some(value));
        true
    }

    /// Soft-set a boolean as `1`/`0`. Skipped when either `name` or its
    /// opposite `-no` form is present, so a user's `-noX` keeps its meaning.
    pub fn soft_set_bool(&mut self, name: &str, value: bool) -> bool {
        let Some(key) = canonical_name(name) else {
            return false;
        };
        if self.is_decided(&key) {
            tracing::debug!(%key, "soft default skipped, flag or negation already set");
            return false;
        }
        self.soft_set(&key, if value { "1" } else { "0" })
    }

    /// The table as built so far, e.g. to find a `-conf` token before
    /// merging that file.
    pub fn peek(&self) -> &ArgumentTable {
        &self.table
    }

    pub fn build(self) -> ArgumentTable {
        self.table
    }

    /// `key` or its opposite (`-X` vs `-noX`) is already present.
    fn is_decided(&self, key: &str) -> bool {
        let values = &self.table.values;
        values.contains_key(key)
            || values.contains_key(&negation_of(key))
            || positive_of(key).is_some_and(|positive| values.contains_key(&positive))
    }
}
