use email_harvest::{
    CsvNormalizer, Dispatcher, DocumentExtractor, StringPreference, failure_report_path, report,
    scan_tree,
};
use std::fs;
use std::io::Write;
use std::path::Path;

fn dispatcher_with_temp(temp: &Path) -> Dispatcher {
    Dispatcher::new(
        Box::new(DocumentExtractor),
        Box::new(CsvNormalizer),
        temp.to_path_buf(),
        StringPreference::default(),
    )
}

#[test]
fn test_text_file_found_binary_skipped() {
    let tree = tempfile::tempdir().unwrap();
    let temp = tempfile::tempdir().unwrap();
    fs::write(tree.path().join("a.txt"), "contact: Jane.Doe@Example.com").unwrap();
    fs::write(tree.path().join("b.exe"), [0x4du8, 0x5a, 0x00, 0x01, 0xff]).unwrap();

    let outcome = scan_tree(tree.path(), &dispatcher_with_temp(temp.path()));

    assert_eq!(outcome.addresses, vec!["jane.doe@example.com"]);
    assert!(outcome.unprocessed.is_empty());

    let out = tempfile::tempdir().unwrap();
    let outfile = out.path().join("emails_out.txt");
    report(&outcome, tree.path(), &outfile).unwrap();

    assert_eq!(
        fs::read_to_string(&outfile).unwrap(),
        "jane.doe@example.com\n"
    );
    // The skipped binary must appear in neither report
    assert!(!failure_report_path(&outfile).exists());
}

#[test]
fn test_corrupt_msg_goes_to_failure_report() {
    let tree = tempfile::tempdir().unwrap();
    let temp = tempfile::tempdir().unwrap();
    fs::write(tree.path().join("c.msg"), b"not a compound file at all").unwrap();

    let outcome = scan_tree(tree.path(), &dispatcher_with_temp(temp.path()));

    assert!(outcome.addresses.is_empty());
    assert_eq!(outcome.unprocessed.len(), 1);
    assert!(outcome.unprocessed[0].ends_with("c.msg"));

    let out = tempfile::tempdir().unwrap();
    let outfile = out.path().join("emails_out.txt");
    report(&outcome, tree.path(), &outfile).unwrap();

    // No addresses: the output file stays unwritten, the failure report not
    assert!(!outfile.exists());
    let failures = fs::read_to_string(failure_report_path(&outfile)).unwrap();
    assert!(failures.trim_end().ends_with("c.msg"));
}

#[test]
fn test_duplicate_on_one_line_recorded_once() {
    let tree = tempfile::tempdir().unwrap();
    let temp = tempfile::tempdir().unwrap();
    fs::write(tree.path().join("dupes.txt"), "x@y.com and x@y.com").unwrap();

    let outcome = scan_tree(tree.path(), &dispatcher_with_temp(temp.path()));

    assert_eq!(outcome.addresses, vec!["x@y.com"]);
}

#[test]
fn test_addresses_deduplicate_across_files_case_insensitively() {
    let tree = tempfile::tempdir().unwrap();
    let temp = tempfile::tempdir().unwrap();
    fs::write(tree.path().join("one.txt"), "dup@example.com").unwrap();
    fs::write(tree.path().join("two.log"), "DUP@Example.COM").unwrap();
    fs::write(tree.path().join("three.txt"), "other@example.com").unwrap();

    let outcome = scan_tree(tree.path(), &dispatcher_with_temp(temp.path()));

    assert_eq!(outcome.addresses.len(), 2);
    assert!(outcome.addresses.contains(&"dup@example.com".to_string()));
    assert!(outcome.addresses.contains(&"other@example.com".to_string()));
}

#[test]
fn test_msg_document_end_to_end() {
    let tree = tempfile::tempdir().unwrap();
    let temp = tempfile::tempdir().unwrap();

    let path = tree.path().join("note.msg");
    let mut comp = cfb::create(&path).unwrap();
    for (name, bytes) in [
        ("__substg1.0_0C1F001E", b"Sender@Example.com".to_vec()),
        (
            "__substg1.0_1000001F",
            "reach me at Hidden@Example.com"
                .encode_utf16()
                .flat_map(u16::to_le_bytes)
                .collect(),
        ),
    ] {
        let mut stream = comp.create_stream(name).unwrap();
        stream.write_all(&bytes).unwrap();
    }
    comp.flush().unwrap();
    drop(comp);

    let outcome = scan_tree(tree.path(), &dispatcher_with_temp(temp.path()));

    assert!(outcome.unprocessed.is_empty());
    assert!(outcome.addresses.contains(&"sender@example.com".to_string()));
    assert!(outcome.addresses.contains(&"hidden@example.com".to_string()));
}

#[test]
fn test_unsupported_binary_content_is_recorded_as_failure() {
    let tree = tempfile::tempdir().unwrap();
    let temp = tempfile::tempdir().unwrap();
    // Unknown extension with binary content reaches the generic extractor
    // and fails its text sniff
    fs::write(tree.path().join("blob.dat"), [0u8, 159, 146, 150, 0, 1]).unwrap();

    let outcome = scan_tree(tree.path(), &dispatcher_with_temp(temp.path()));

    assert!(outcome.addresses.is_empty());
    assert_eq!(outcome.unprocessed.len(), 1);
}

#[test]
fn test_report_appends_to_existing_outfile() {
    let tree = tempfile::tempdir().unwrap();
    let temp = tempfile::tempdir().unwrap();
    fs::write(tree.path().join("a.txt"), "new@example.com").unwrap();

    let outcome = scan_tree(tree.path(), &dispatcher_with_temp(temp.path()));

    let out = tempfile::tempdir().unwrap();
    let outfile = out.path().join("emails_out.txt");
    fs::write(&outfile, "old@example.com\n").unwrap();
    report(&outcome, tree.path(), &outfile).unwrap();

    assert_eq!(
        fs::read_to_string(&outfile).unwrap(),
        "old@example.com\nnew@example.com\n"
    );
}
