use std::fs;
use std::io::Write;
use std::path::Path;

use camino::Utf8PathBuf;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use gene_seq_fetch::extract::extract_sequence_files;

fn write_archive(path: &Path, entries: &[(&str, &str)]) {
    let file = fs::File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, contents) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
    }
    writer.finish().unwrap();
}

fn dest(root: &Path) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(root.join("BRCA1_data")).unwrap()
}

#[test]
fn keeps_only_sequence_files() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("ncbi_genes.zip");
    write_archive(
        &zip_path,
        &[("a/b/seq.fasta", ">s\nACGT\n"), ("x.txt", "nope"), ("dir/", "")],
    );
    let target = dest(temp.path());

    let extracted = extract_sequence_files(&zip_path, &target).unwrap();

    assert_eq!(extracted.len(), 1);
    assert_eq!(extracted[0].name, "seq.fasta");
    let names: Vec<_> = fs::read_dir(target.as_std_path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["seq.fasta"]);
    assert_eq!(
        fs::read(target.join("seq.fasta").as_std_path()).unwrap(),
        b">s\nACGT\n"
    );
}

#[test]
fn same_basename_last_write_wins() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("dup.zip");
    write_archive(&zip_path, &[("p1/g.fa", ">first\n"), ("p2/g.fa", ">second\n")]);
    let target = dest(temp.path());

    extract_sequence_files(&zip_path, &target).unwrap();

    assert_eq!(fs::read_dir(target.as_std_path()).unwrap().count(), 1);
    assert_eq!(
        fs::read(target.join("g.fa").as_std_path()).unwrap(),
        b">second\n"
    );
}

#[test]
fn no_matches_is_not_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("empty.zip");
    write_archive(
        &zip_path,
        &[("ncbi_dataset/data/data_report.jsonl", "{}"), ("README.md", "hi")],
    );
    let target = dest(temp.path());

    let extracted = extract_sequence_files(&zip_path, &target).unwrap();

    assert!(extracted.is_empty());
    assert!(target.as_std_path().is_dir());
}

#[test]
fn ncbi_dataset_layout_is_flattened() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("ncbi.zip");
    write_archive(
        &zip_path,
        &[
            ("ncbi_dataset/", ""),
            ("ncbi_dataset/data/", ""),
            ("ncbi_dataset/data/gene.fna", ">g\nACGT\n"),
            ("ncbi_dataset/data/rna.fna", ">r\nACGU\n"),
            ("ncbi_dataset/data/protein.faa", ">p\nMK\n"),
            ("ncbi_dataset/data/data_report.jsonl", "{}"),
        ],
    );
    let target = dest(temp.path());

    let extracted = extract_sequence_files(&zip_path, &target).unwrap();
    let names: Vec<_> = extracted.iter().map(|file| file.name.as_str()).collect();

    assert_eq!(names, vec!["gene.fna", "rna.fna", "protein.faa"]);
    assert_eq!(extracted[2].bytes, 6);
}

#[test]
fn rerun_is_idempotent() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("again.zip");
    write_archive(&zip_path, &[("d/gene.fna", ">g\nACGT\n")]);
    let target = dest(temp.path());

    let first = extract_sequence_files(&zip_path, &target).unwrap();
    let second = extract_sequence_files(&zip_path, &target).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        fs::read(target.join("gene.fna").as_std_path()).unwrap(),
        b">g\nACGT\n"
    );
}

#[test]
fn not_a_zip_reports_archive_error() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("broken.zip");
    fs::write(&zip_path, b"<html>error</html>").unwrap();

    let err = extract_sequence_files(&zip_path, &dest(temp.path())).unwrap_err();
    assert!(matches!(err, gene_seq_fetch::error::GeneSeqError::Archive(_)));
}

#[test]
fn backslash_is_part_of_the_file_name() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("win.zip");
    write_archive(&zip_path, &[("d\\x.fa", ">x\n")]);
    let target = dest(temp.path());

    let extracted = extract_sequence_files(&zip_path, &target).unwrap();

    assert_eq!(extracted[0].name, "d\\x.fa");
    assert!(target.join("d\\x.fa").as_std_path().is_file());
}
