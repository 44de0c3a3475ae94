mod support;

use nexdeploy_core::Error;
use nexdeploy_core::commands::{SearchCommand, SearchCommandOptions, SearchReport};
use nexdeploy_core::search::{Extraction, FileCountReport, SearchOptions};

use support::write_file;

const DOC: &str = r#"<TypeDefinition>
  <Services>
    <Service prefixid="Base" url="../base/form/"/>
    <Service prefixid="Lib" url="../lib/"/>
  </Services>
</TypeDefinition>
"#;

fn options(keyword: &str) -> SearchOptions {
    SearchOptions {
        keyword: keyword.to_string(),
        ..SearchOptions::default()
    }
}

#[test]
fn searches_document_in_directory() {
    let tmp = tempfile::tempdir().expect("tempdir should succeed");
    write_file(&tmp.path().join("typedefinition.xml"), DOC);

    let report = SearchCommand::new(SearchCommandOptions::new(tmp.path(), options("../lib/")))
        .execute()
        .expect("search should succeed");

    assert_eq!(report.exit_code(), 0);
    match report {
        SearchReport::Matches(outcome) => assert_eq!(
            outcome.output,
            vec![r#"4: <Service prefixid="Lib" url="../lib/"/>"#]
        ),
        other => panic!("expected matches, got {other:?}"),
    }
}

#[test]
fn xml_path_searches_its_directory() {
    let tmp = tempfile::tempdir().expect("tempdir should succeed");
    write_file(&tmp.path().join("typedefinition.xml"), DOC);

    let mut search = options("prefixid");
    search.extraction = Extraction::pair("prefixid,url").expect("two names");
    let report = SearchCommand::new(SearchCommandOptions::new(
        tmp.path().join("other.xml"),
        search,
    ))
    .execute()
    .expect("search should succeed");

    match report {
        SearchReport::Matches(outcome) => {
            assert_eq!(outcome.output, vec!["Base,../base/form/", "Lib,../lib/"])
        }
        other => panic!("expected matches, got {other:?}"),
    }
}

#[test]
fn no_hit_exits_one() {
    let tmp = tempfile::tempdir().expect("tempdir should succeed");
    write_file(&tmp.path().join("typedefinition.xml"), DOC);

    let report = SearchCommand::new(SearchCommandOptions::new(tmp.path(), options("absent")))
        .execute()
        .expect("search should succeed");
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn missing_document_exits_two() {
    let tmp = tempfile::tempdir().expect("tempdir should succeed");
    let err = SearchCommand::new(SearchCommandOptions::new(tmp.path(), options("x")))
        .execute()
        .unwrap_err();
    assert!(matches!(err, Error::DocumentNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn directory_keyword_writes_file_count() {
    let tmp = tempfile::tempdir().expect("tempdir should succeed");
    write_file(&tmp.path().join("typedefinition.xml"), DOC);
    write_file(&tmp.path().join("lib/a.xjs"), "");
    write_file(&tmp.path().join("lib/b.xjs"), "");
    write_file(&tmp.path().join("lib/nested/c.xjs"), "");
    let output = tmp.path().join("reports/file_count.json");

    let report = SearchCommand::new(
        SearchCommandOptions::new(tmp.path(), options("lib")).with_count_output(&output),
    )
    .execute()
    .expect("count should succeed");

    assert_eq!(report.exit_code(), 0);
    let written: FileCountReport =
        serde_json::from_str(&std::fs::read_to_string(&output).expect("report written"))
            .expect("report is valid JSON");
    assert_eq!(written.file_count, 2);
    assert_eq!(written.path, tmp.path().join("lib").to_string_lossy());
}
