use std::error::Error;
use std::io::Write;

use jsondoc::document::{Document, DocumentError, ErrorKind, ParseSource, ParserSettings};

type TestResult = Result<(), Box<dyn Error>>;

fn new_parsed(json: &str) -> Result<Document, DocumentError> {
    let mut document = Document::new();
    let parsed = document.parse(ParseSource::Text(json.to_owned()))?;
    assert!(parsed, "For input: {json:?}");
    Ok(document)
}

#[test]
fn typed_access() -> TestResult {
    let document = new_parsed(r#"{"a": "42", "b": ["x", "y"], "c": {"d": "true"}}"#)?;

    assert_eq!(42, document.get_member::<i32>("a")?);
    assert_eq!(
        vec!["x".to_owned(), "y".to_owned()],
        document.get_array_member::<String>("b")?
    );
    assert_eq!(
        true,
        document.get_document("c")?.get_member::<bool>("d")?
    );

    assert_eq!(
        ErrorKind::MemberNotFound,
        document.get_member::<i32>("missing").unwrap_err().kind
    );
    assert_eq!(
        ErrorKind::NotAnArray,
        document.get_array_member::<String>("a").unwrap_err().kind
    );
    Ok(())
}

#[test]
fn file_source_matches_text_source() -> TestResult {
    // More members than fit into a single read chunk, so the file is
    // consumed across several reads
    let mut json = String::from("{\n");
    for i in 0..200 {
        json.push_str(&format!("    \"member_{i:03}\": \"{i}\",\n"));
    }
    json.push_str("    \"last\": \"done\"\n}\n");
    assert!(json.len() > 1024);

    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(json.as_bytes())?;
    file.flush()?;

    let mut from_file = Document::new();
    assert_eq!(
        true,
        from_file.parse(ParseSource::File(file.path().to_path_buf()))?
    );
    let from_text = new_parsed(&json)?;

    assert_eq!("done", from_file.get_member::<String>("last")?);
    for i in 0..200 {
        let key = format!("member_{i:03}");
        assert_eq!(
            from_text.get_member::<i64>(&key)?,
            from_file.get_member::<i64>(&key)?
        );
    }
    assert_eq!(
        from_text.members()?.count(),
        from_file.members()?.count()
    );
    Ok(())
}

#[test]
fn file_source_with_comments() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(b"{\n  // annotated configuration\n  \"mode\": \"fast\"\n}\n")?;
    file.flush()?;

    let mut document = Document::new();
    assert_eq!(
        true,
        document.parse(ParseSource::File(file.path().to_path_buf()))?
    );
    assert_eq!("fast", document.get_member::<String>("mode")?);
    Ok(())
}

#[test]
fn missing_file_is_recoverable() {
    let mut document = Document::new();
    let result = document.parse(ParseSource::File(
        "/nonexistent/jsondoc-integration-test.json".into(),
    ));
    assert_eq!(ErrorKind::Precondition, result.unwrap_err().kind);
    assert_eq!(false, document.is_parsed());

    // The same document instance can still be used afterwards
    let parsed = document
        .parse(ParseSource::Text(r#"{"a": "1"}"#.to_owned()))
        .unwrap();
    assert_eq!(true, parsed);
    assert_eq!(1, document.get_member::<i32>("a").unwrap());
}

#[test]
fn malformed_file_is_recoverable() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(br#"{"a": "1""#)?;
    file.flush()?;

    let mut document = Document::new();
    assert_eq!(
        false,
        document.parse(ParseSource::File(file.path().to_path_buf()))?
    );
    assert_eq!(false, document.is_parsed());
    Ok(())
}

#[test]
fn strict_settings_reject_comments() -> TestResult {
    let json = "{\n  \"a\": \"1\" // note\n}";

    let mut strict = Document::new_custom(ParserSettings {
        allow_comments: false,
    });
    assert_eq!(false, strict.parse(ParseSource::Text(json.to_owned()))?);

    let mut tolerant = Document::new();
    assert_eq!(true, tolerant.parse(ParseSource::Text(json.to_owned()))?);
    Ok(())
}

#[test]
fn nested_documents_share_the_tree() -> TestResult {
    let servers = {
        let document = new_parsed(
            r#"{
                "servers": [
                    {"host": "alpha", "port": "8001"},
                    {"host": "beta", "port": "8002"}
                ]
            }"#,
        )?;
        document.get_array_member::<Document>("servers")?
        // top-level document dropped here; the tree stays alive
    };

    assert_eq!(2, servers.len());
    assert_eq!("alpha", servers[0].get_member::<String>("host")?);
    assert_eq!(8002, servers[1].get_member::<i32>("port")?);
    Ok(())
}

#[test]
fn full_document_traversal() -> TestResult {
    let document = new_parsed(
        r#"{
            "timeout": "30",
            "retries": "3",
            "limit": "100"
        }"#,
    )?;

    // Treat the object as an ordered mapping of arbitrary keys to typed values
    let mut total: i64 = 0;
    let mut names = Vec::new();
    for member in document.members()? {
        names.push(member.name().to_owned());
        total += member.value::<i64>()?;
    }
    assert_eq!(vec!["timeout", "retries", "limit"], names);
    assert_eq!(133, total);
    Ok(())
}
