use messenger_core::keys::{EXAMPLE, EXAMPLE_COLOR, EXAMPLE_FORMAT, EXAMPLE_LIST};
use messenger_core::{args, defaults};
use messenger_core::{MessageStore, Rendered, StoreError, Template};
use std::fs;
use tempfile::TempDir;

fn line(text: &str) -> Rendered {
    Rendered::Line(text.to_string())
}

fn lines(texts: &[&str]) -> Rendered {
    Rendered::Lines(texts.iter().map(|s| s.to_string()).collect())
}

fn loaded_store(dir: &TempDir) -> MessageStore {
    let mut store = MessageStore::new(dir.path().join("plugin"));
    store.load().unwrap();
    store
}

#[test]
fn get_before_load_fails() {
    let dir = TempDir::new().unwrap();
    let mut store = MessageStore::new(dir.path());
    assert!(!store.is_loaded());
    assert!(matches!(store.get(EXAMPLE), Err(StoreError::NotLoaded)));
    assert!(matches!(
        store.send(EXAMPLE, &mut Vec::<String>::new()),
        Err(StoreError::NotLoaded)
    ));
}

#[test]
fn first_load_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let store = loaded_store(&dir);
    assert!(store.is_loaded());

    let path = dir.path().join("plugin").join("messages.yml");
    assert_eq!(store.file_path(), path);
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("example-string: This is a string"));
    assert!(written.contains("- This is the first message"));
}

#[test]
fn file_values_win_over_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("messages.yml"), "example-string: '&aEdited'\n").unwrap();

    let mut store = MessageStore::new(dir.path());
    store.load().unwrap();
    assert_eq!(store.get(EXAMPLE).unwrap(), line("§aEdited"));
}

#[test]
fn missing_keys_are_seeded_and_persisted() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("messages.yml"), "other: kept\nexample-string:\n").unwrap();

    let mut store = MessageStore::new(dir.path());
    store.load().unwrap();
    assert_eq!(store.get(EXAMPLE_COLOR).unwrap(), line("This is a string with some §ccolor in it"));
    assert_eq!(store.get(EXAMPLE).unwrap(), line("This is a string"));

    let written = fs::read_to_string(dir.path().join("messages.yml")).unwrap();
    assert!(written.contains("other: kept"));
    assert!(written.contains("example-string-color:"));

    // The seeded value now comes from the file, even without defaults.
    let mut reloaded = MessageStore::builder(dir.path()).defaults(defaults! {}).finish();
    reloaded.load().unwrap();
    assert_eq!(
        reloaded.get(EXAMPLE_COLOR).unwrap(),
        line("This is a string with some §ccolor in it")
    );
}

#[test]
fn unknown_key_is_missing() {
    let dir = TempDir::new().unwrap();
    let mut store = loaded_store(&dir);
    assert!(store.get("no-such-key").unwrap().is_missing());

    let mut sink: Vec<String> = Vec::new();
    assert!(matches!(
        store.send("no-such-key", &mut sink),
        Err(StoreError::MissingKey { .. })
    ));
    assert!(sink.is_empty());
}

#[test]
fn malformed_entry_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("messages.yml"),
        "example-string: 42\nexample-string-list:\n  nested: true\n",
    )
    .unwrap();

    let mut store = MessageStore::new(dir.path());
    store.load().unwrap();
    assert_eq!(
        store.get(EXAMPLE).unwrap(),
        Rendered::Malformed {
            found: "number 42".to_string()
        }
    );
    assert!(matches!(
        store.send(EXAMPLE_LIST, &mut Vec::<String>::new()),
        Err(StoreError::Malformed { .. })
    ));
}

#[test]
fn broken_file_leaves_store_unloaded() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("messages.yml"), "key: [unclosed\n").unwrap();

    let mut store = MessageStore::new(dir.path());
    assert!(matches!(store.load(), Err(StoreError::Parse { .. })));
    assert!(!store.is_loaded());
    assert!(matches!(store.get(EXAMPLE), Err(StoreError::NotLoaded)));
}

#[test]
fn formats_arguments_before_colors() {
    let dir = TempDir::new().unwrap();
    let mut store = MessageStore::builder(dir.path())
        .defaults(defaults! {
            "items" => "&eHello %s, you have %d items",
        })
        .finish();
    store.load().unwrap();

    assert_eq!(
        store.get_with("items", &args!["Bob", 3]).unwrap(),
        line("§eHello Bob, you have 3 items")
    );
    assert_eq!(
        store.get_with(EXAMPLE_FORMAT, &args!["x"]).unwrap(),
        Rendered::Missing
    );
    assert!(matches!(
        store.get_with("items", &args!["Bob"]),
        Err(StoreError::Format { .. })
    ));
}

#[test]
fn send_prefixes_every_line() {
    let dir = TempDir::new().unwrap();
    let mut store = MessageStore::builder(dir.path())
        .defaults(defaults! {
            "list" => vec!["line1", "line2"],
        })
        .prefix("[X] ".to_string())
        .finish();
    store.load().unwrap();

    let mut sent: Vec<String> = Vec::new();
    store.send("list", &mut sent).unwrap();
    assert_eq!(sent, vec!["[X] line1", "[X] line2"]);

    let mut raw: Vec<String> = Vec::new();
    store.send_raw("list", &mut raw).unwrap();
    assert_eq!(raw, vec!["line1", "line2"]);
}

#[test]
fn send_with_arguments() {
    let dir = TempDir::new().unwrap();
    let mut store = loaded_store(&dir);

    let mut sent: Vec<String> = Vec::new();
    store.send_with(EXAMPLE_FORMAT, &mut sent, &args![7]).unwrap();
    assert_eq!(sent, vec!["§8[PLUGIN] §fThis is a string with some data in it: 7"]);

    let mut raw: Vec<String> = Vec::new();
    store.send_raw_with(EXAMPLE_FORMAT, &mut raw, &args!["raw"]).unwrap();
    assert_eq!(raw, vec!["This is a string with some data in it: raw"]);
}

#[test]
fn no_prefix_sends_what_get_returns() {
    let dir = TempDir::new().unwrap();
    let mut store = loaded_store(&dir);
    store.set_prefix(None);

    for key in [EXAMPLE, EXAMPLE_COLOR, EXAMPLE_LIST] {
        let expected: Vec<String> = store
            .get(key)
            .unwrap()
            .lines()
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        let mut sent: Vec<String> = Vec::new();
        store.send(key, &mut sent).unwrap();
        assert_eq!(sent, expected);
    }
}

#[test]
fn list_defaults_render_as_lines() {
    let dir = TempDir::new().unwrap();
    let mut store = loaded_store(&dir);
    assert_eq!(
        store.get(EXAMPLE_LIST).unwrap(),
        lines(&["This is the first message", "This is the second message"])
    );
}

#[test]
fn file_name_change_applies_on_next_load() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("messages.yml"), "greeting: old\n").unwrap();
    fs::write(dir.path().join("lang.yml"), "greeting: new\n").unwrap();

    let mut store = MessageStore::builder(dir.path())
        .defaults(defaults! { "farewell" => "bye" })
        .finish();
    store.load().unwrap();
    store.set_file_name("lang.yml");
    assert_eq!(store.file_name(), "lang.yml");
    assert_eq!(store.get("greeting").unwrap(), line("old"));

    store.load().unwrap();
    assert_eq!(store.get("greeting").unwrap(), line("new"));
    store.get("farewell").unwrap();

    let old = fs::read_to_string(dir.path().join("messages.yml")).unwrap();
    let new = fs::read_to_string(dir.path().join("lang.yml")).unwrap();
    assert!(!old.contains("farewell"));
    assert!(new.contains("farewell: bye"));
}

#[test]
fn defaults_can_be_replaced() {
    let dir = TempDir::new().unwrap();
    let mut store = MessageStore::new(dir.path());
    store.set_defaults(defaults! { "only" => Template::from("just me") });
    assert_eq!(store.defaults().len(), 1);
    store.load().unwrap();

    assert_eq!(store.get("only").unwrap(), line("just me"));
    assert!(store.get(EXAMPLE).unwrap().is_missing());
}
