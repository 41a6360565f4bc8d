use rustc_hash::FxHashSet;

macro_rules! message_keys {
    (
        $( $name:ident = $key:expr ),*
    ) => {
        $(
            pub const $name: &str = $key;
        )*

        /// Every built-in key constant as `(constant name, key)`.
        pub const BUILTIN_KEYS: &[(&str, &str)] = &[
            $(
                (stringify!($name), $name),
            )*
        ];
    };
}

// Keys for the bundled example messages. Add new constants here so they are
// covered by the duplicate scan.
message_keys! {
    EXAMPLE = "example-string",
    EXAMPLE_FORMAT = "example-string-format",
    EXAMPLE_COLOR = "example-string-color",
    EXAMPLE_LIST = "example-string-list"
}

/// Returns every entry whose key was already used by an earlier entry.
pub fn find_duplicates<'a>(keys: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    let mut seen = FxHashSet::default();
    keys.iter()
        .copied()
        .filter(|&(_, key)| !seen.insert(key))
        .collect()
}
