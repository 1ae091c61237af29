use monimport_pipeline::{FileEncoding, ImportConfig, ImportError, OutputMode};
use monimport_types::{EntityKind, Tag};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

#[test]
fn default_config() {
    let cfg = ImportConfig::default();
    assert_eq!(cfg.uri, "http://localhost/glpi/plugins/webservices/xmlrpc.php");
    assert_eq!(cfg.login_name, "shinken");
    assert_eq!(cfg.login_password, "shinken");
    assert!(cfg.tag.is_empty());
    assert!(cfg.tags.is_empty());
    assert_eq!(cfg.mode, OutputMode::Bundle);
    assert_eq!(cfg.target_directory, PathBuf::from("/tmp/monimport"));
    assert_eq!(cfg.encoding, FileEncoding::Utf8);
    assert_eq!(cfg.timeout_secs, 60);
    assert!(cfg.strip.is_empty());
}

#[test]
fn empty_document_is_default() {
    assert_eq!(ImportConfig::from_toml_str("").unwrap(), ImportConfig::default());
}

#[test]
fn full_document() {
    let cfg = ImportConfig::from_toml_str(
        r#"
        uri = "https://cmdb.example.org/xmlrpc.php"
        login_name = "importer"
        login_password = "secret"
        tags = "siteA, siteB"
        mode = "files"
        target_directory = "/etc/monitoring/import"
        encoding = "latin1"
        timeout_secs = 15

        [strip]
        hosts = ["_ITEMSID", "_ITEMTYPE"]
        servicestemplates = ["_httpstink"]
        "#,
    )
    .unwrap();

    assert_eq!(cfg.uri, "https://cmdb.example.org/xmlrpc.php");
    assert_eq!(cfg.mode, OutputMode::Files);
    assert_eq!(cfg.encoding, FileEncoding::Latin1);
    assert_eq!(cfg.timeout_secs, 15);
    assert_eq!(cfg.strip.fields_for(EntityKind::Hosts), ["_ITEMSID", "_ITEMTYPE"]);
    assert_eq!(cfg.strip.fields_for(EntityKind::ServiceTemplates), ["_httpstink"]);
    assert_eq!(cfg.root_tags(), vec![Tag::from("siteA"), Tag::from("siteB")]);

    let endpoint = cfg.endpoint();
    assert_eq!(endpoint.uri, cfg.uri);
    assert_eq!(endpoint.timeout_secs, 15);
}

#[test]
fn unknown_mode_is_config_error() {
    let result = ImportConfig::from_toml_str("mode = \"stdout\"");
    assert!(matches!(result, Err(ImportError::Config(_))));
}

#[test]
fn unknown_strip_kind_is_config_error() {
    let result = ImportConfig::from_toml_str("[strip]\nrealms = [\"x\"]");
    assert!(matches!(result, Err(ImportError::Config(_))));
}

#[test]
fn root_tags_precedence() {
    let both = ImportConfig {
        tag: "legacy".into(),
        tags: "new".into(),
        ..Default::default()
    };
    assert_eq!(both.root_tags(), vec![Tag::from("new")]);

    let legacy_only = ImportConfig {
        tag: "legacy".into(),
        ..Default::default()
    };
    assert_eq!(legacy_only.root_tags(), vec![Tag::from("legacy")]);
}

#[test]
fn output_mode_from_str() {
    assert_eq!(OutputMode::from_str("files").unwrap(), OutputMode::Files);
    assert_eq!(OutputMode::from_str(" bundle ").unwrap(), OutputMode::Bundle);
    assert!(OutputMode::from_str("both").is_err());
    assert_eq!(OutputMode::Files.to_string(), "files");
}

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "tags = \"siteA\"").unwrap();
    let cfg = ImportConfig::load(file.path()).unwrap();
    assert_eq!(cfg.root_tags(), vec![Tag::from("siteA")]);
}

#[test]
fn load_missing_file_is_config_error() {
    let result = ImportConfig::load(std::path::Path::new("/nonexistent/monimport.toml"));
    assert!(matches!(result, Err(ImportError::Config(msg)) if msg.contains("cannot read")));
}
