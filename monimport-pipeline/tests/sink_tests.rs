use monimport_pipeline::{FileEncoding, FileSink, ImportError, RemoteFile};
use monimport_types::Tag;
use serde_json::json;
use tempfile::TempDir;

// ── Encoding ──────────────────────────────────────────────────────

#[test]
fn utf8_keeps_every_character() {
    let bytes = FileEncoding::Utf8.encode("caf\u{e9} \u{20ac}1");
    assert_eq!(bytes, "caf\u{e9} \u{20ac}1".as_bytes());
}

#[test]
fn latin1_drops_unrepresentable_characters() {
    let bytes = FileEncoding::Latin1.encode("caf\u{e9} \u{20ac}1");
    assert_eq!(bytes, vec![b'c', b'a', b'f', 0xe9, b' ', b'1']);
}

#[test]
fn non_text_content_is_an_encoding_error() {
    let result = FileEncoding::Utf8.encode_value(&json!({"nested": true}));
    assert!(matches!(result, Err(ImportError::Encoding(msg)) if msg.contains("struct")));
}

#[test]
fn encoding_deserializes_lowercase() {
    let encoding: FileEncoding = serde_json::from_str("\"latin1\"").unwrap();
    assert_eq!(encoding, FileEncoding::Latin1);
    assert_eq!(FileEncoding::default(), FileEncoding::Utf8);
}

// ── Paths ─────────────────────────────────────────────────────────

#[test]
fn target_path_is_tag_dash_name() {
    let sink = FileSink::new("/etc/monitoring", FileEncoding::Utf8);
    assert_eq!(
        sink.target_path(&Tag::from("siteA"), "hosts.cfg").unwrap(),
        std::path::PathBuf::from("/etc/monitoring/siteA-hosts.cfg")
    );
}

#[test]
fn target_path_rejects_names_leaving_the_directory() {
    let sink = FileSink::new("/etc/monitoring", FileEncoding::Utf8);

    for (tag, name) in [
        ("../evil", "hosts.cfg"),
        ("siteA", "../hosts.cfg"),
        ("siteA", "/etc/passwd"),
        ("site\\A", "hosts.cfg"),
        ("..", "hosts.cfg"),
        ("siteA", ".."),
        ("siteA", ""),
        ("siteA", "hosts\0.cfg"),
    ] {
        let result = sink.target_path(&Tag::new(tag), name);
        assert!(
            matches!(result, Err(ImportError::Storage(_))),
            "{tag:?} / {name:?} gave {result:?}"
        );
    }
}

#[test]
fn target_path_allows_dots_inside_names() {
    let sink = FileSink::new("/etc/monitoring", FileEncoding::Utf8);
    assert_eq!(
        sink.target_path(&Tag::from("site.A"), "..hosts.cfg").unwrap(),
        std::path::PathBuf::from("/etc/monitoring/site.A-..hosts.cfg")
    );
}

// ── Writing ───────────────────────────────────────────────────────

#[tokio::test]
async fn prepare_creates_missing_directory() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("nested").join("out");
    let sink = FileSink::new(&target, FileEncoding::Utf8);

    sink.prepare().await;
    assert!(target.is_dir());

    // Second call on an existing directory is a no-op.
    sink.prepare().await;
    assert!(target.is_dir());
}

#[tokio::test]
async fn writes_each_file_under_tag_prefix() {
    let temp = TempDir::new().unwrap();
    let mut sink = FileSink::new(temp.path(), FileEncoding::Utf8);
    let tag = Tag::from("siteA");

    let summary = sink
        .write_files(
            &tag,
            &[
                RemoteFile::text("hosts.cfg", "define host {}\n"),
                RemoteFile::text("commands.cfg", "define command {}\n"),
            ],
        )
        .await;

    assert_eq!(summary.written.len(), 2);
    assert!(summary.skipped.is_empty());
    assert!(summary.failed.is_empty());
    let hosts = std::fs::read_to_string(temp.path().join("siteA-hosts.cfg")).unwrap();
    assert_eq!(hosts, "define host {}\n");
    assert!(sink.has_written(&temp.path().join("siteA-commands.cfg")));
}

#[tokio::test]
async fn same_path_twice_in_a_run_is_written_once() {
    let temp = TempDir::new().unwrap();
    let mut sink = FileSink::new(temp.path(), FileEncoding::Utf8);
    let tag = Tag::from("siteA");

    let first = sink
        .write_files(&tag, &[RemoteFile::text("hosts.cfg", "first")])
        .await;
    let second = sink
        .write_files(&tag, &[RemoteFile::text("hosts.cfg", "second")])
        .await;

    assert_eq!(first.written.len(), 1);
    assert_eq!(second.written.len(), 0);
    assert_eq!(second.skipped, vec![temp.path().join("siteA-hosts.cfg")]);
    let content = std::fs::read_to_string(temp.path().join("siteA-hosts.cfg")).unwrap();
    assert_eq!(content, "first");
}

#[tokio::test]
async fn same_file_name_under_other_tag_is_a_distinct_path() {
    let temp = TempDir::new().unwrap();
    let mut sink = FileSink::new(temp.path(), FileEncoding::Utf8);

    sink.write_files(&Tag::from("a"), &[RemoteFile::text("x.cfg", "a")]).await;
    let summary = sink.write_files(&Tag::from("b"), &[RemoteFile::text("x.cfg", "b")]).await;

    assert_eq!(summary.written, vec![temp.path().join("b-x.cfg")]);
}

#[tokio::test]
async fn existing_file_from_previous_run_is_overwritten() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("siteA-hosts.cfg");
    std::fs::write(&path, "stale content that is longer").unwrap();

    let mut sink = FileSink::new(temp.path(), FileEncoding::Utf8);
    sink.write_files(&Tag::from("siteA"), &[RemoteFile::text("hosts.cfg", "fresh")])
        .await;

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh");
}

#[tokio::test]
async fn failures_do_not_stop_remaining_files() {
    let temp = TempDir::new().unwrap();
    let mut sink = FileSink::new(temp.path(), FileEncoding::Utf8);

    let summary = sink
        .write_files(
            &Tag::from("siteA"),
            &[
                RemoteFile {
                    name: "bad.cfg".to_string(),
                    content: json!(["not", "text"]),
                },
                RemoteFile::text("sub/missing-dir.cfg", "x"),
                RemoteFile::text("good.cfg", "ok"),
            ],
        )
        .await;

    assert_eq!(summary.failed.len(), 2);
    assert_eq!(summary.written, vec![temp.path().join("siteA-good.cfg")]);
    assert!(!temp.path().join("siteA-bad.cfg").exists());
}

#[tokio::test]
async fn failed_path_is_not_marked_written() {
    let temp = TempDir::new().unwrap();
    let mut sink = FileSink::new(temp.path(), FileEncoding::Utf8);
    let tag = Tag::from("siteA");

    sink.write_files(&tag, &[RemoteFile { name: "f.cfg".into(), content: json!(1) }])
        .await;
    let retry = sink.write_files(&tag, &[RemoteFile::text("f.cfg", "now text")]).await;

    assert_eq!(retry.written.len(), 1);
}

#[tokio::test]
async fn writes_into_missing_directory_fail_individually() {
    let temp = TempDir::new().unwrap();
    let mut sink = FileSink::new(temp.path().join("never-created"), FileEncoding::Utf8);

    let summary = sink
        .write_files(&Tag::from("t"), &[RemoteFile::text("a.cfg", "a"), RemoteFile::text("b.cfg", "b")])
        .await;

    assert_eq!(summary.failed.len(), 2);
    assert!(summary.written.is_empty());
}

#[tokio::test]
async fn traversing_tag_is_refused_and_writes_nothing_outside() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    std::fs::create_dir(&target).unwrap();
    let mut sink = FileSink::new(&target, FileEncoding::Utf8);

    let summary = sink
        .write_files(&Tag::new("../evil"), &[RemoteFile::text("hosts.cfg", "x")])
        .await;

    assert!(summary.written.is_empty());
    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].1.contains("cannot be used in a file name"));
    assert!(!temp.path().join("evil-hosts.cfg").exists());
}

#[tokio::test]
async fn traversing_file_name_fails_alone() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    std::fs::create_dir(&target).unwrap();
    let mut sink = FileSink::new(&target, FileEncoding::Utf8);

    let summary = sink
        .write_files(
            &Tag::from("siteA"),
            &[
                RemoteFile::text("../../escape.cfg", "x"),
                RemoteFile::text("hosts.cfg", "ok"),
            ],
        )
        .await;

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.written, vec![target.join("siteA-hosts.cfg")]);
    assert!(!temp.path().join("escape.cfg").exists());
}

#[tokio::test]
async fn accented_text_is_written_intact() {
    let temp = TempDir::new().unwrap();
    let mut utf8 = FileSink::new(temp.path().join("u"), FileEncoding::Utf8);
    let mut latin1 = FileSink::new(temp.path().join("l"), FileEncoding::Latin1);
    utf8.prepare().await;
    latin1.prepare().await;
    let files = [RemoteFile::text("hosts.cfg", "alias caf\u{e9}\n")];

    utf8.write_files(&Tag::from("t"), &files).await;
    latin1.write_files(&Tag::from("t"), &files).await;

    assert_eq!(
        std::fs::read(temp.path().join("u").join("t-hosts.cfg")).unwrap(),
        "alias caf\u{e9}\n".as_bytes()
    );
    assert_eq!(
        std::fs::read(temp.path().join("l").join("t-hosts.cfg")).unwrap(),
        b"alias caf\xe9\n".to_vec()
    );
}
