#![deny(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod format;
pub mod keys;
pub mod sink;
pub mod store;
pub mod template;

pub use error::{ConfigError, FormatError, StoreError, StoreResult};
pub use format::Arg;
pub use sink::{ConsoleSink, MessageSink};
pub use store::{MessageStore, MessageStoreBuilder};
pub use template::{Defaults, Rendered, Template};
