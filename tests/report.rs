use camino::Utf8PathBuf;

use genbank_harvester::chart;
use genbank_harvester::domain::SequenceRecord;
use genbank_harvester::report;

fn record(accession: &str, length: u64, description: &str) -> SequenceRecord {
    SequenceRecord {
        accession: accession.to_string(),
        length,
        description: description.to_string(),
    }
}

fn sample_records() -> Vec<SequenceRecord> {
    (0..10)
        .map(|i| {
            record(
                &format!("SEQ{i:04}.1"),
                500 + i * 37,
                &format!("Homo sapiens test transcript {i}."),
            )
        })
        .collect()
}

#[test]
fn csv_has_header_and_one_row_per_record_in_fetch_order() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("report.csv")).unwrap();

    report::write_csv(&sample_records(), &path).unwrap();

    let content = std::fs::read_to_string(path.as_std_path()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "Accession Number,Sequence Length,Description");
    assert_eq!(lines[1], "SEQ0000.1,500,Homo sapiens test transcript 0.");
    assert_eq!(lines[10], "SEQ0009.1,833,Homo sapiens test transcript 9.");
}

#[test]
fn csv_quotes_descriptions_with_commas() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("report.csv")).unwrap();
    let records = vec![record("X1.1", 42, "mRNA, complete cds")];

    report::write_csv(&records, &path).unwrap();

    let content = std::fs::read_to_string(path.as_std_path()).unwrap();
    assert_eq!(content.lines().nth(1), Some("X1.1,42,\"mRNA, complete cds\""));
}

#[test]
fn chart_png_is_written() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("plot.png")).unwrap();

    chart::render_length_chart(&sample_records(), &path).unwrap();

    let png = std::fs::read(path.as_std_path()).unwrap();
    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn chart_write_is_independent_of_report_write() {
    let temp = tempfile::tempdir().unwrap();
    let records = sample_records();

    let bad_csv = Utf8PathBuf::from_path_buf(temp.path().join("missing/report.csv")).unwrap();
    assert!(report::write_csv(&records, &bad_csv).is_err());

    let png = Utf8PathBuf::from_path_buf(temp.path().join("plot.png")).unwrap();
    chart::render_length_chart(&records, &png).unwrap();
    assert!(png.as_std_path().exists());
}
