//! Message lookup backed by an editable YAML file.
//!
//! The file is created from the defaults the first time the store is loaded.
//! Keys added to the defaults later are written to the file the first time
//! they are requested, so server owners can edit them afterwards.

use crate::error::{StoreError, StoreResult};
use crate::format::Arg;
use crate::keys::{find_duplicates, BUILTIN_KEYS};
use crate::sink::MessageSink;
use crate::template::{example_defaults, Defaults, Entry, Rendered, Template};
use indexmap::IndexMap;
use serde_yaml_ng::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

pub const DEFAULT_FILE_NAME: &str = "messages.yml";
pub const DEFAULT_PREFIX: &str = "§8[PLUGIN] §f";

type Entries = IndexMap<String, Entry>;

/// Logs a warning for every key constant that repeats an earlier one and
/// returns how many were found.
pub(crate) fn warn_duplicate_keys(keys: &[(&str, &str)]) -> usize {
    let duplicates = find_duplicates(keys);
    for (name, key) in &duplicates {
        warn!("Message key constant {} has duplicate key \"{}\"", name, key);
    }
    duplicates.len()
}

fn apply_prefix(prefix: Option<&str>, line: String) -> String {
    match prefix {
        Some(prefix) if !line.is_empty() => format!("{}{}", prefix, line),
        _ => line,
    }
}

fn parse_entries(contents: &str, path: &Path) -> StoreResult<Entries> {
    if contents.trim().is_empty() {
        return Ok(Entries::new());
    }
    let document: Value = serde_yaml_ng::from_str(contents).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let mapping = match document {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(Entries::new()),
        _ => {
            return Err(StoreError::NotAMapping {
                path: path.to_path_buf(),
            })
        }
    };

    let mut entries = Entries::with_capacity(mapping.len());
    for (key, value) in mapping {
        let key = match key {
            Value::String(key) => key,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                warn!(
                    "Skipping message with unsupported key {} in {}",
                    Entry::describe(&other),
                    path.display()
                );
                continue;
            }
        };
        let entry = serde_yaml_ng::from_value(value).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        entries.insert(key, entry);
    }
    Ok(entries)
}

enum Resolved {
    Found(Template),
    Missing,
    Malformed(String),
}

pub struct MessageStoreBuilder {
    data_dir: PathBuf,
    defaults: Defaults,
    prefix: Option<String>,
    file_name: String,
    key_constants: &'static [(&'static str, &'static str)],
}

impl MessageStoreBuilder {
    pub fn defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// `None` sends messages without a prefix.
    pub fn prefix(mut self, prefix: impl Into<Option<String>>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// The `(constant name, key)` table checked for duplicates on construction.
    pub fn key_constants(mut self, keys: &'static [(&'static str, &'static str)]) -> Self {
        self.key_constants = keys;
        self
    }

    pub fn finish(self) -> MessageStore {
        warn_duplicate_keys(self.key_constants);
        let config_file = self.data_dir.join(&self.file_name);
        MessageStore {
            data_dir: self.data_dir,
            file_name: self.file_name,
            config_file,
            defaults: self.defaults,
            prefix: self.prefix,
            config: None,
        }
    }
}

/// Stores the messages of one plugin.
///
/// [`MessageStore::load`] must be called before any message can be retrieved,
/// and again after the defaults or the file name are changed.
pub struct MessageStore {
    data_dir: PathBuf,
    file_name: String,
    config_file: PathBuf,
    defaults: Defaults,
    prefix: Option<String>,
    config: Option<Entries>,
}

impl MessageStore {
    /// A store using the bundled example messages and default prefix.
    pub fn new(data_dir: impl Into<PathBuf>) -> MessageStore {
        MessageStore::builder(data_dir).finish()
    }

    pub fn builder(data_dir: impl Into<PathBuf>) -> MessageStoreBuilder {
        MessageStoreBuilder {
            data_dir: data_dir.into(),
            defaults: example_defaults(),
            prefix: Some(DEFAULT_PREFIX.to_string()),
            file_name: DEFAULT_FILE_NAME.to_string(),
            key_constants: BUILTIN_KEYS,
        }
    }

    pub fn set_defaults(&mut self, defaults: Defaults) {
        self.defaults = defaults;
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Takes effect on the next message sent. `None` disables the prefix.
    pub fn set_prefix(&mut self, prefix: impl Into<Option<String>>) {
        self.prefix = prefix.into();
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Points the store at another file in the data directory. The file is not
    /// read until the next [`MessageStore::load`].
    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
        self.config_file = self.data_dir.join(&self.file_name);
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_path(&self) -> &Path {
        &self.config_file
    }

    pub fn is_loaded(&self) -> bool {
        self.config.is_some()
    }

    /// Reads the message file, creating it from the defaults if it does not exist.
    ///
    /// Messages from a previous load are discarded first. If creating the file
    /// fails after the defaults were applied, they stay usable in memory.
    pub fn load(&mut self) -> StoreResult<()> {
        self.config = None;

        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::io(&self.data_dir, e))?;
        }

        if !self.config_file.exists() {
            debug!(
                "Creating {} with {} default messages",
                self.config_file.display(),
                self.defaults.len()
            );
            let entries = self
                .defaults
                .iter()
                .map(|(key, template)| (key.clone(), Entry::from(template.clone())))
                .collect();
            self.config = Some(entries);
            self.save()
        } else {
            let contents = fs::read_to_string(&self.config_file)
                .map_err(|e| StoreError::io(&self.config_file, e))?;
            self.config = Some(parse_entries(&contents, &self.config_file)?);
            Ok(())
        }
    }

    fn save(&self) -> StoreResult<()> {
        let config = self.config.as_ref().ok_or(StoreError::NotLoaded)?;
        let yaml = serde_yaml_ng::to_string(config).map_err(|source| StoreError::Serialize {
            path: self.config_file.clone(),
            source,
        })?;
        fs::write(&self.config_file, yaml).map_err(|e| StoreError::io(&self.config_file, e))
    }

    fn resolve(&mut self, key: &str) -> StoreResult<Resolved> {
        let config = self.config.as_mut().ok_or(StoreError::NotLoaded)?;
        match config.get(key) {
            Some(Entry::Template(template)) => return Ok(Resolved::Found(template.clone())),
            Some(Entry::Other(value)) if !value.is_null() => {
                return Ok(Resolved::Malformed(Entry::describe(value)))
            }
            _ => {}
        }

        let Some(default) = self.defaults.get(key).cloned() else {
            return Ok(Resolved::Missing);
        };
        config.insert(key.to_string(), Entry::from(default.clone()));
        debug!("Seeding message \"{}\" from defaults", key);
        if let Err(err) = self.save() {
            error!("Failed to save default message \"{}\": {}", key, err);
        }
        Ok(Resolved::Found(default))
    }

    fn render(&mut self, key: &str, args: Option<&[Arg]>) -> StoreResult<Rendered> {
        match self.resolve(key)? {
            Resolved::Found(template) => {
                template
                    .render(args)
                    .map_err(|source| StoreError::Format {
                        key: key.to_string(),
                        source,
                    })
            }
            Resolved::Missing => Ok(Rendered::Missing),
            Resolved::Malformed(found) => Ok(Rendered::Malformed { found }),
        }
    }

    /// Gets a message with only its color codes translated.
    pub fn get(&mut self, key: &str) -> StoreResult<Rendered> {
        self.render(key, None)
    }

    /// Gets a message with `args` substituted into its format specifiers
    /// before color codes are translated.
    pub fn get_with(&mut self, key: &str, args: &[Arg]) -> StoreResult<Rendered> {
        self.render(key, Some(args))
    }

    fn deliver<S>(&self, key: &str, rendered: Rendered, sink: &mut S, prefixed: bool) -> StoreResult<()>
    where
        S: MessageSink + ?Sized,
    {
        let prefix = if prefixed { self.prefix() } else { None };
        match rendered {
            Rendered::Line(line) => sink.send_message(&apply_prefix(prefix, line)),
            Rendered::Lines(lines) => {
                let lines: Vec<String> = lines
                    .into_iter()
                    .map(|line| apply_prefix(prefix, line))
                    .collect();
                sink.send_messages(&lines);
            }
            Rendered::Missing => {
                return Err(StoreError::MissingKey {
                    key: key.to_string(),
                })
            }
            Rendered::Malformed { found } => {
                return Err(StoreError::Malformed {
                    key: key.to_string(),
                    found,
                })
            }
        }
        Ok(())
    }

    /// Sends a message with the prefix in front of every line.
    pub fn send<S: MessageSink + ?Sized>(&mut self, key: &str, sink: &mut S) -> StoreResult<()> {
        let rendered = self.get(key)?;
        self.deliver(key, rendered, sink, true)
    }

    pub fn send_with<S: MessageSink + ?Sized>(
        &mut self,
        key: &str,
        sink: &mut S,
        args: &[Arg],
    ) -> StoreResult<()> {
        let rendered = self.get_with(key, args)?;
        self.deliver(key, rendered, sink, true)
    }

    /// Sends a message without the prefix, for prompts and other replies that
    /// continue an exchange with the recipient.
    pub fn send_raw<S: MessageSink + ?Sized>(&mut self, key: &str, sink: &mut S) -> StoreResult<()> {
        let rendered = self.get(key)?;
        self.deliver(key, rendered, sink, false)
    }

    pub fn send_raw_with<S: MessageSink + ?Sized>(
        &mut self,
        key: &str,
        sink: &mut S,
        args: &[Arg],
    ) -> StoreResult<()> {
        let rendered = self.get_with(key, args)?;
        self.deliver(key, rendered, sink, false)
    }
}
