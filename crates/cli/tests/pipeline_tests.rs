// Pipeline tests: reference folder + as-built folder in, relabelled files out.

use std::fs;
use std::path::Path;

use pointfix_cli::batch::{load_reference, process_file, run_batch, BatchOptions, FileStatus};
use pointfix_matcher::MatchConfig;
use tempfile::tempdir;

const HEADER: &str = "Point_Name\tEasting\tNorthing\tElevation\tPoint_Code\n";

fn options(output: &Path, matching: MatchConfig) -> BatchOptions {
    BatchOptions {
        matching,
        output_dir: output.to_path_buf(),
        asbuilt_extension: "pts".into(),
        output_extension: "pts".into(),
        crs: "EPSG:2157".into(),
        fail_fast: false,
    }
}

#[test]
fn rows_keep_count_and_order() {
    let dir = tempdir().unwrap();
    let (design, asbuilt, out) = (dir.path().join("d"), dir.path().join("a"), dir.path().join("o"));
    fs::create_dir(&design).unwrap();
    fs::create_dir(&asbuilt).unwrap();

    fs::write(
        design.join("manholes.csv"),
        "MH1,715000.0,734000.0,50.0,MH\nMH2,715010.0,734000.0,50.5,MH\n",
    )
    .unwrap();
    fs::write(
        asbuilt.join("day1.pts"),
        "1\t715010.0\t734000.0\t50.4\tX\n\
         2\t715005.0\t734000.0\t50.2\tX\n\
         3\t715000.0\t734000.0\t49.9\tX\n\
         4\t715010.0\t734000.0\t50.4\tX\n",
    )
    .unwrap();

    let reference = load_reference(&design, "csv").unwrap();
    let opts = options(&out, MatchConfig::coincident());
    let report = run_batch(&asbuilt, &reference, &opts).unwrap();
    assert_eq!(report.files[0].status, FileStatus::Written);

    let text = fs::read_to_string(out.join("day1.pts")).unwrap();
    assert_eq!(
        text,
        format!(
            "{HEADER}\
             MH2\t715010.0\t734000.0\t50.5\tMH\n\
             \t\t\t\t\n\
             MH1\t715000.0\t734000.0\t50.0\tMH\n\
             MH2\t715010.0\t734000.0\t50.5\tMH\n"
        )
    );
}

#[test]
fn rerun_is_byte_identical() {
    let dir = tempdir().unwrap();
    let (design, asbuilt, out) = (dir.path().join("d"), dir.path().join("a"), dir.path().join("o"));
    fs::create_dir(&design).unwrap();
    fs::create_dir(&asbuilt).unwrap();

    fs::write(design.join("a.csv"), "P1,1.5,2.25,3.125,A\nDUP,9,9,1,B\n").unwrap();
    fs::write(design.join("b.csv"), "DUP2,9,9,2,C\n").unwrap();
    fs::write(asbuilt.join("s.pts"), "X\t1.5\t2.25\t0\tZ\nY\t9\t9\t0\tZ\nZ\t0\t0\t0\tZ\n").unwrap();

    let reference = load_reference(&design, "csv").unwrap();
    let opts = options(&out, MatchConfig::coincident());

    run_batch(&asbuilt, &reference, &opts).unwrap();
    let first = fs::read(out.join("s.pts")).unwrap();

    let reloaded = load_reference(&design, "csv").unwrap();
    let report = run_batch(&asbuilt, &reloaded, &opts).unwrap();
    let second = fs::read(out.join("s.pts")).unwrap();

    assert_eq!(first, second);
    assert_eq!(report.totals.ambiguous, 1);

    let text = String::from_utf8(second).unwrap();
    assert!(text.contains("DUP\t9.0\t9.0\t1.0\tB\n"), "{text}");
    assert!(!text.contains("DUP2"));
}

#[test]
fn empty_reference_blanks_every_row() {
    let dir = tempdir().unwrap();
    let (design, asbuilt, out) = (dir.path().join("d"), dir.path().join("a"), dir.path().join("o"));
    fs::create_dir(&design).unwrap();
    fs::create_dir(&asbuilt).unwrap();
    fs::write(asbuilt.join("s.pts"), "X1\t1\t1\t1\tZ\nX2\t2\t2\t2\tZ\n").unwrap();

    let reference = load_reference(&design, "csv").unwrap();
    assert!(reference.set.is_empty());
    let opts = options(&out, MatchConfig::coincident());
    let report = run_batch(&asbuilt, &reference, &opts).unwrap();

    assert_eq!(report.totals.unmatched, 2);
    assert_eq!(
        fs::read_to_string(out.join("s.pts")).unwrap(),
        format!("{HEADER}\t\t\t\t\n\t\t\t\t\n")
    );
}

#[test]
fn windows_1252_reference_is_written_as_utf8() {
    let dir = tempdir().unwrap();
    let (design, asbuilt, out) = (dir.path().join("d"), dir.path().join("a"), dir.path().join("o"));
    fs::create_dir(&design).unwrap();
    fs::create_dir(&asbuilt).unwrap();

    // "Caf\xe9" is Café in Windows-1252
    fs::write(design.join("d.csv"), b"Caf\xe9,1,2,3,K\xf6\n").unwrap();
    fs::write(asbuilt.join("s.pts"), "X\t1\t2\t0\tZ\n").unwrap();

    let reference = load_reference(&design, "csv").unwrap();
    run_batch(&asbuilt, &reference, &options(&out, MatchConfig::coincident())).unwrap();

    let text = fs::read_to_string(out.join("s.pts")).unwrap();
    assert!(text.ends_with("Café\t1.0\t2.0\t3.0\tKö\n"), "{text}");
}

#[test]
fn one_reference_set_serves_many_files() {
    let dir = tempdir().unwrap();
    let (design, asbuilt, out) = (dir.path().join("d"), dir.path().join("a"), dir.path().join("o"));
    fs::create_dir(&design).unwrap();
    fs::create_dir(&asbuilt).unwrap();
    fs::write(design.join("d.csv"), "P1,0,0,0,A\nP2,5,5,0,B\n").unwrap();
    for (name, x) in [("a.pts", 0), ("b.pts", 5), ("c.pts", 7)] {
        fs::write(asbuilt.join(name), format!("S\t{x}\t{x}\t0\tZ\n")).unwrap();
    }

    let reference = load_reference(&design, "csv").unwrap();
    let opts = options(&out, MatchConfig::coincident());
    let report = run_batch(&asbuilt, &reference, &opts).unwrap();

    let inputs: Vec<String> = report
        .files
        .iter()
        .map(|f| f.input.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(inputs, vec!["a.pts", "b.pts", "c.pts"]);
    assert_eq!(report.totals.matched, 2);
    assert_eq!(report.totals.unmatched, 1);

    // Single-file path agrees with the batch.
    let single = process_file(&asbuilt.join("b.pts"), &reference.set, &opts).unwrap();
    assert_eq!(single.summary.unwrap().matched, 1);
}

#[test]
fn custom_output_extension() {
    let dir = tempdir().unwrap();
    let (design, asbuilt, out) = (dir.path().join("d"), dir.path().join("a"), dir.path().join("o"));
    fs::create_dir(&design).unwrap();
    fs::create_dir(&asbuilt).unwrap();
    fs::write(asbuilt.join("s.PTS"), "X\t1\t1\t1\tZ\n").unwrap();

    let reference = load_reference(&design, "csv").unwrap();
    let mut opts = options(&out, MatchConfig::coincident());
    opts.output_extension = "txt".into();
    run_batch(&asbuilt, &reference, &opts).unwrap();

    assert!(out.join("s.txt").is_file());
}
