use std::fs;

/// Keys every shipped config section must define, with their TOML type.
const REQUIRED_KEYS: &[(&str, &str, &str)] = &[
    ("latex", "environment", "string"),
    ("latex", "standalone", "boolean"),
    ("html", "error_color", "string"),
    ("html", "standalone", "boolean"),
    ("html", "title", "string"),
];

fn main() {
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");
    let table = content
        .parse::<toml::Table>()
        .unwrap_or_else(|e| panic!("Invalid default_config.toml: {}", e));

    for (section, key, kind) in REQUIRED_KEYS {
        let value = table
            .get(*section)
            .and_then(|s| s.as_table())
            .and_then(|s| s.get(*key))
            .unwrap_or_else(|| panic!("default_config.toml is missing [{section}] {key}"));
        if value.type_str() != *kind {
            panic!(
                "default_config.toml: [{section}] {key} must be a {kind}, found {}",
                value.type_str()
            );
        }
    }

    let environment = table
        .get("latex")
        .and_then(|s| s.get("environment"))
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if environment.is_empty() || environment.contains(['{', '}', '\\']) {
        panic!("default_config.toml: [latex] environment must be a bare environment name");
    }
}
