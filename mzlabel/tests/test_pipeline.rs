use std::io;

use mzlabel::io::ASSIGNMENT_TABLE_HEADER;
use mzlabel::prelude::*;
use mzlabel::{
    AssignmentTableWriter, LabelFinder, LabelFinderError, LabelingParameters, PeakListReader,
    PipelineSummary, Spectrum,
};

fn read_spectrum(path: &str) -> Result<Spectrum, LabelFinderError> {
    PeakListReader::open_path(path)?
        .with_skip_lines(2)
        .read_spectrum()
}

fn run(labeled_path: &str) -> Result<(Vec<String>, PipelineSummary), LabelFinderError> {
    let background = read_spectrum("./tests/data/background.txt")?;
    let labeled = read_spectrum(labeled_path)?;
    let finder = LabelFinder::new(LabelingParameters::default())?;
    let result = finder.find_labels(background, labeled);

    let mut writer = AssignmentTableWriter::new(Vec::new());
    writer.write_assignments(&result.assignments)?;
    let text = String::from_utf8(writer.into_inner())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok((text.lines().map(|s| s.to_string()).collect(), result.summary))
}

#[test_log::test]
fn test_text_files() -> Result<(), LabelFinderError> {
    let (lines, summary) = run("./tests/data/labeled.txt")?;
    assert_eq!(
        lines,
        vec![
            ASSIGNMENT_TABLE_HEADER,
            "350.1234\t350.1234\t0\t19000.0\t20000.0",
            "350.1234\t352.1301\t2\t900.0\t20000.0",
            "500.0\t500.0\t0\t900.0\t1000.0",
            "500.0\t501.0034\t1\t50.0\t1000.0",
            "500.0\t502.0067\t2\t40.0\t1000.0",
        ]
    );
    assert_eq!(
        summary,
        PipelineSummary {
            background_peaks: 5,
            labeled_peaks: 8,
            natural_isotopes_removed: 2,
            common_peaks_removed: 2,
            raw_assignments: 5,
            monoisotopes_restored: 2,
            accepted_assignments: 5,
            accepted_anchors: 2,
        }
    );
    Ok(())
}

#[test_log::test]
fn test_gzipped_input() -> Result<(), LabelFinderError> {
    let (plain, _) = run("./tests/data/labeled.txt")?;
    let (compressed, _) = run("./tests/data/labeled.txt.gz")?;
    assert_eq!(plain, compressed);
    Ok(())
}

#[test]
fn test_missing_file() {
    let err = read_spectrum("./tests/data/not_real.txt").unwrap_err();
    match err {
        LabelFinderError::IOError(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
        e => panic!("Unexpected error {e}"),
    }
}
