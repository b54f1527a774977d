//! Tests for `ConfigStore` construction, lazy loading and dot-notation access.
//!
//! Invariants:
//! - Each test builds its own project in a temporary directory.
//! - Tests that write a `.env` file hold the global test lock and run serially.

use serde::Deserialize;
use serde_json::json;
use serial_test::serial;

use super::*;
use crate::constants::DOTENV_DISABLED_VAR;
use crate::loader::{EnvFilePolicy, RootMarker, TreeLayout, YamlEvaluator};
use crate::test_util::{Project, global_test_lock};

fn mail_project() -> Project {
    let project = Project::new();
    project
        .config("app.json", r#"{"name": "demo", "debug": false, "tags": ["a", "b"]}"#)
        .config("services/mail/smtp.json", r#"{"host": "x", "port": 25}"#)
        .config("database.json", r#"{"password": null}"#);
    project
}

#[test]
fn test_open_discovers_root_from_nested_start() {
    let project = mail_project();

    let store = ConfigStore::open(project.options()).unwrap();

    assert_eq!(
        store.root_path(),
        Some(project.path().canonicalize().unwrap().as_path())
    );
    assert_eq!(
        store.config_dir(),
        Some(project.path().canonicalize().unwrap().join("config"))
    );
}

#[test]
fn test_open_fails_without_root_when_required() {
    let temp = tempfile::TempDir::new().unwrap();

    let err = ConfigStore::open(
        StoreOptions::new()
            .with_start_dir(temp.path())
            .with_marker(RootMarker::new("rootconf-no-such-marker")),
    )
    .unwrap_err();

    assert!(matches!(err, ConfigError::RootNotFound { max_depth: 10, .. }));
}

#[test]
fn test_open_without_root_when_optional_is_empty() {
    let temp = tempfile::TempDir::new().unwrap();

    let store = ConfigStore::open(
        StoreOptions::new()
            .with_start_dir(temp.path())
            .with_marker(RootMarker::new("rootconf-no-such-marker"))
            .with_require_root(false),
    )
    .unwrap();

    assert!(store.root_path().is_none());
    assert!(store.all().is_empty());
    assert_eq!(store.get("app.name", "fallback"), json!("fallback"));
}

#[test]
fn test_lazy_policy_defers_tree_walk() {
    let project = mail_project();

    let store = ConfigStore::open(project.options()).unwrap();
    assert!(!store.is_loaded());

    assert_eq!(store.get("app.name", json!(null)), json!("demo"));
    assert!(store.is_loaded());
}

#[test]
fn test_eager_policy_loads_during_open() {
    let project = mail_project();

    let store =
        ConfigStore::open(project.options().with_load_policy(LoadPolicy::Eager)).unwrap();

    assert!(store.is_loaded());
    assert_eq!(store.all().len(), 3);
}

#[test]
fn test_eager_policy_surfaces_source_errors() {
    let project = Project::new();
    project.config("broken.json", "{");

    let err = ConfigStore::open(project.options().with_load_policy(LoadPolicy::Eager))
        .unwrap_err();

    assert!(matches!(err, ConfigError::SourceParse { .. }));
}

#[test]
fn test_lazy_policy_swallows_source_errors_on_read() {
    let project = Project::new();
    project.config("broken.json", "{");

    let store = ConfigStore::open(project.options()).unwrap();

    assert_eq!(store.get("broken", "fallback"), json!("fallback"));
    assert!(!store.has("broken"));
}

#[test]
fn test_ensure_loaded_surfaces_source_errors() {
    let project = Project::new();
    project.config("broken.json", "{");

    let store = ConfigStore::open(project.options()).unwrap();

    assert!(matches!(
        store.ensure_loaded(),
        Err(ConfigError::SourceParse { .. })
    ));
}

#[test]
fn test_ensure_loaded_after_failed_implicit_read_still_errors() {
    let project = Project::new();
    project.config("broken.json", "{");

    let store = ConfigStore::open(project.options()).unwrap();
    assert!(!store.has("broken"));
    assert!(!store.is_loaded());

    assert!(matches!(
        store.ensure_loaded(),
        Err(ConfigError::SourceParse { .. })
    ));
}

#[test]
fn test_failed_tree_is_retried_after_repair() {
    let project = Project::new();
    project.config("broken.json", "{");

    let mut store = ConfigStore::open(project.options()).unwrap();
    assert!(!store.set("broken", 1));
    assert!(matches!(
        store.set_or_fail("broken", 1),
        Err(ConfigError::SourceParse { .. })
    ));

    project.config("broken.json", r#"{"fixed": true}"#);

    assert_eq!(store.get("broken.fixed", json!(null)), json!(true));
    assert!(store.is_loaded());
}

#[test]
fn test_get_nested_directory_source() {
    let project = mail_project();
    let store = ConfigStore::open(project.options()).unwrap();

    assert_eq!(store.get("services.mail.smtp.host", json!(null)), json!("x"));
    assert_eq!(
        store.get("services.mail.smtp", json!(null)),
        json!({"host": "x", "port": 25})
    );
    assert!(!store.has("services.mail"));
    assert!(!store.has("services"));
}

#[test]
fn test_get_missing_returns_default_and_has_is_false() {
    let project = mail_project();
    let store = ConfigStore::open(project.options()).unwrap();

    for key in ["missing", "app.missing", "app.name.deeper", "services.mail.pop"] {
        assert_eq!(store.get(key, 42), json!(42), "key {key}");
        assert!(!store.has(key), "key {key}");
    }
}

#[test]
fn test_get_list_element_by_index() {
    let project = mail_project();
    let store = ConfigStore::open(project.options()).unwrap();

    assert_eq!(store.get("app.tags.1", json!(null)), json!("b"));
    assert!(!store.has("app.tags.2"));
}

#[test]
fn test_null_values_exist() {
    let project = mail_project();
    let store = ConfigStore::open(project.options()).unwrap();

    assert!(store.has("database.password"));
    assert_eq!(store.get("database.password", "default"), json!(null));
}

#[test]
fn test_get_as_deserializes_typed_values() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Smtp {
        host: String,
        port: u16,
    }

    let project = mail_project();
    let store = ConfigStore::open(project.options()).unwrap();

    let smtp: Option<Smtp> = store.get_as("services.mail.smtp").unwrap();
    assert_eq!(
        smtp,
        Some(Smtp {
            host: "x".to_string(),
            port: 25
        })
    );
    assert_eq!(store.get_as::<u16>("services.mail.missing").unwrap(), None);
    assert!(matches!(
        store.get_as::<u16>("app.name"),
        Err(ConfigError::Conversion { ref key, .. }) if key == "app.name"
    ));
}

#[test]
fn test_set_round_trip_and_refusal() {
    let project = mail_project();
    let mut store = ConfigStore::open(project.options()).unwrap();

    assert!(store.set("services.mail.smtp.port", 587));
    assert_eq!(store.get("services.mail.smtp.port", json!(null)), json!(587));

    assert!(!store.set("services.mail.smtp.user", "bob"));
    assert!(!store.has("services.mail.smtp.user"));

    assert!(store.set("app", json!({"name": "replaced"})));
    assert_eq!(store.get("app.name", json!(null)), json!("replaced"));
}

#[test]
fn test_set_or_fail_raises_key_not_found() {
    let project = mail_project();
    let mut store = ConfigStore::open(project.options()).unwrap();

    let err = store.set_or_fail("app.version", "1.0").unwrap_err();
    assert!(matches!(err, ConfigError::KeyNotFound(ref key) if key == "app.version"));

    store.set_or_fail("app.debug", true).unwrap();
    assert_eq!(store.get("app.debug", json!(null)), json!(true));
}

#[test]
fn test_set_before_first_read_loads_tree_first() {
    let project = mail_project();
    let mut store = ConfigStore::open(project.options()).unwrap();

    assert!(store.set("app.name", "early"));
    assert_eq!(store.get("app.name", json!(null)), json!("early"));
    assert_eq!(store.get("services.mail.smtp.host", json!(null)), json!("x"));
}

#[test]
fn test_reset_discards_runtime_overrides() {
    let project = mail_project();
    let mut store = ConfigStore::open(project.options()).unwrap();
    assert!(store.set("app.name", "override"));

    store.reset().unwrap();

    assert!(!store.is_loaded());
    assert_eq!(store.get("app.name", json!(null)), json!("demo"));
}

#[test]
fn test_flat_layout_and_yaml_evaluator() {
    let project = Project::new();
    project
        .config("app.yaml", "name: yaml-demo\n")
        .config("nested/mail.yaml", "host: x\n");

    let store = ConfigStore::open(
        project
            .options()
            .with_layout(TreeLayout::Flat)
            .with_evaluator(YamlEvaluator),
    )
    .unwrap();

    assert_eq!(store.get("app.name", json!(null)), json!("yaml-demo"));
    assert!(!store.has("nested.mail"));
}

#[test]
fn test_custom_config_dir() {
    let project = Project::new();
    project.write("settings/app.json", r#"{"name": "custom"}"#);

    let store = ConfigStore::open(project.options().with_config_dir("settings")).unwrap();

    assert_eq!(store.get("app.name", json!(null)), json!("custom"));
}

#[test]
fn test_from_mapping_needs_no_filesystem() {
    let items = match json!({"a": {"b": 1}}) {
        ConfigValue::Object(map) => map,
        _ => unreachable!(),
    };

    let store = ConfigStore::from_mapping(items);

    assert!(store.root_path().is_none());
    assert_eq!(store.get("a.b", json!(null)), json!(1));
}

#[test]
fn test_reset_restores_in_memory_mapping() {
    let items = match json!({"a": {"b": 1}}) {
        ConfigValue::Object(map) => map,
        _ => unreachable!(),
    };
    let mut store = ConfigStore::from_mapping(items);
    assert!(store.set("a.b", 2));

    store.reset().unwrap();

    assert!(store.root_path().is_none());
    assert_eq!(store.get("a.b", json!(null)), json!(1));
}

#[test]
fn test_load_from_root_whole_file_under_stem() {
    let project = mail_project();
    project.write("services.json", r#"{"queue": {"driver": "sync"}}"#);
    let mut store = ConfigStore::open(project.options()).unwrap();

    let value = store.load_from_root("services.json", None, json!(null)).unwrap();

    assert_eq!(value, json!({"queue": {"driver": "sync"}}));
    assert_eq!(store.get("services.queue.driver", json!(null)), json!("sync"));
}

#[test]
fn test_load_from_root_appends_extension_and_resolves_key() {
    let project = mail_project();
    project.write("cache.json", r#"{"driver": "redis", "ttl": 60}"#);
    let mut store = ConfigStore::open(project.options()).unwrap();

    let ttl = store.load_from_root("cache", Some("cache.ttl"), 0).unwrap();
    let missing = store
        .load_from_root("cache", Some("cache.prefix"), "none")
        .unwrap();

    assert_eq!(ttl, json!(60));
    assert_eq!(missing, json!("none"));
}

#[test]
fn test_load_from_root_unwraps_redundant_nesting() {
    let project = mail_project();
    project.write("db.json", r#"{"database": {"host": "db.local"}}"#);
    let mut store = ConfigStore::open(project.options()).unwrap();

    let host = store
        .load_from_root("db.json", Some("database.host"), json!(null))
        .unwrap();

    assert_eq!(host, json!("db.local"));
    assert_eq!(store.get("database", json!(null)), json!({"host": "db.local"}));
}

#[test]
fn test_load_from_root_does_not_reload_present_key() {
    let project = mail_project();
    project.write("app.json", r#"{"name": "from-root"}"#);
    let mut store = ConfigStore::open(project.options()).unwrap();

    let name = store
        .load_from_root("app.json", Some("app.name"), json!(null))
        .unwrap();

    assert_eq!(name, json!("demo"));
}

#[test]
fn test_load_from_root_missing_file_returns_default() {
    let project = mail_project();
    let mut store = ConfigStore::open(project.options()).unwrap();

    assert_eq!(
        store
            .load_from_root("absent", Some("absent.x"), "fallback")
            .unwrap(),
        json!("fallback")
    );
    assert_eq!(
        store.load_from_root("absent.json", None, json!(null)).unwrap(),
        json!(null)
    );
    assert!(!store.has("absent"));
}

#[test]
fn test_load_from_root_without_root_returns_default() {
    let mut store = ConfigStore::from_mapping(ConfigMapping::new());

    assert_eq!(
        store
            .load_from_root("app.json", Some("app.name"), "fallback")
            .unwrap(),
        json!("fallback")
    );
}

#[test]
fn test_load_from_root_unparseable_file_is_an_error() {
    let project = mail_project();
    project.write("broken.json", "{");
    let mut store = ConfigStore::open(project.options()).unwrap();

    assert!(matches!(
        store.load_from_root("broken.json", None, json!(null)),
        Err(ConfigError::SourceParse { .. })
    ));
}

#[test]
fn test_set_from_root_missing_file() {
    let project = mail_project();
    let mut store = ConfigStore::open(project.options()).unwrap();

    assert!(
        !store
            .set_from_root("cache.json", "cache.driver", "redis", false)
            .unwrap()
    );
    assert!(!store.has("cache"));

    assert!(
        store
            .set_from_root("cache.json", "cache.redis.port", 6379, true)
            .unwrap()
    );
    assert_eq!(store.get("cache.redis.port", json!(null)), json!(6379));
    assert_eq!(store.get("cache", json!(null)), json!({"redis": {"port": 6379}}));
}

#[test]
fn test_set_from_root_creates_paths() {
    let project = mail_project();
    project.write("queue.json", r#"{"driver": "sync"}"#);
    let mut store = ConfigStore::open(project.options()).unwrap();

    assert!(
        store
            .set_from_root("queue.json", "queue.redis.port", 6379, true)
            .unwrap()
    );

    assert_eq!(store.get("queue.driver", json!(null)), json!("sync"));
    assert_eq!(store.get("queue.redis.port", json!(null)), json!(6379));
}

#[test]
fn test_set_from_root_without_create_path_requires_existing_key() {
    let project = mail_project();
    project.write("queue.json", r#"{"driver": "sync"}"#);
    let mut store = ConfigStore::open(project.options()).unwrap();

    assert!(
        !store
            .set_from_root("queue.json", "queue.redis.port", 6379, false)
            .unwrap()
    );
    assert!(!store.has("queue.redis"));

    assert!(
        store
            .set_from_root("queue.json", "queue.driver", "redis", false)
            .unwrap()
    );
    assert_eq!(store.get("queue.driver", json!(null)), json!("redis"));
}

#[test]
#[serial]
fn test_open_loads_env_file_from_root() {
    let _lock = global_test_lock().lock().unwrap();
    let project = mail_project();
    project.write(".env", "ROOTCONF_TEST_STORE_ENV=from-file\n");

    temp_env::with_vars(
        [
            (DOTENV_DISABLED_VAR, None::<&str>),
            ("ROOTCONF_TEST_STORE_ENV", None),
        ],
        || {
            ConfigStore::open(project.options()).unwrap();
            assert_eq!(
                std::env::var("ROOTCONF_TEST_STORE_ENV").unwrap(),
                "from-file"
            );
        },
    );
}

#[test]
#[serial]
fn test_open_strict_env_policy_requires_file() {
    let _lock = global_test_lock().lock().unwrap();
    let project = mail_project();

    temp_env::with_var_unset(DOTENV_DISABLED_VAR, || {
        let err = ConfigStore::open(project.options().with_env_policy(EnvFilePolicy::Strict))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvFileNotFound { .. }));
    });
}
