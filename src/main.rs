use anyhow::Context;
use messenger_core::config::{MessengerConfig, CONFIG_FILE};
use messenger_core::keys::{BUILTIN_KEYS, EXAMPLE_FORMAT};
use messenger_core::{args, ConsoleSink, MessageStore};
use tracing::{error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "messenger.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("MESSENGER_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stdout))
        .with_env_filter(env_filter)
        .init();

    let config = MessengerConfig::load(CONFIG_FILE)
        .with_context(|| format!("failed to load {}", CONFIG_FILE))?;

    let mut store = MessageStore::builder(&config.data_dir)
        .file_name(&config.file_name)
        .prefix(config.translated_prefix())
        .finish();
    match store.load() {
        Ok(()) => info!("Loaded messages from {}", store.file_path().display()),
        Err(err) => error!("{:#}", anyhow::Error::new(err)),
    }

    let mut console = ConsoleSink;
    for &(_, key) in BUILTIN_KEYS {
        let sent = if key == EXAMPLE_FORMAT {
            store.send_with(key, &mut console, &args!["console"])
        } else {
            store.send(key, &mut console)
        };
        if let Err(err) = sent {
            warn!("Could not send message \"{}\": {}", key, err);
        }
    }

    Ok(())
}
