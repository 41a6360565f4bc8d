use crate::error::ConfigError;
use crate::template::COLOR_CHAR;
use messenger_text::translate_color_codes;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use toml_edit::{value, DocumentMut};

pub const CONFIG_FILE: &str = "Messenger.toml";

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String);

macro_rules! gen_config {
    (
        $( $(#[$meta:meta])* $name:ident: $type:ty = $default:expr ),*
    ) => {
        #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
        pub struct MessengerConfig {
            $(
                $(#[$meta])*
                pub $name: $type,
            )*
        }

        impl MessengerConfig {
            /// Reads `config_file`, writing back any missing settings with their
            /// defaults. Existing values and comments are left untouched.
            pub fn load(config_file: impl AsRef<Path>) -> Result<MessengerConfig, ConfigError> {
                let path = config_file.as_ref();
                let str = match fs::read_to_string(path) {
                    Ok(str) => str,
                    Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
                    Err(source) => {
                        return Err(ConfigError::Io { path: path.to_path_buf(), source })
                    }
                };
                let mut doc = str.parse::<DocumentMut>().map_err(|source| ConfigError::Syntax {
                    path: path.to_path_buf(),
                    source,
                })?;

                $(
                    <$type as ConfigSerializeDefault>::fix_config($default, stringify!($name), &mut doc);
                )*

                let patched = doc.to_string();
                if str != patched {
                    fs::write(path, &patched).map_err(|source| ConfigError::Io {
                        path: path.to_path_buf(),
                        source,
                    })?;
                }

                toml::from_str(&patched).map_err(|source| ConfigError::Invalid {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    };
}

gen_config! {
    /// Directory holding the message file.
    data_dir: String = "plugins/Messenger".to_string(),
    file_name: String = "messages.yml".to_string(),
    /// Written with `&` color codes. Leave empty for no prefix.
    prefix: String = "&8[PLUGIN] &f".to_string()
}

impl MessengerConfig {
    /// The prefix with color codes translated, or `None` if it is empty.
    pub fn translated_prefix(&self) -> Option<String> {
        if self.prefix.is_empty() {
            None
        } else {
            Some(translate_color_codes(COLOR_CHAR, &self.prefix))
        }
    }
}
