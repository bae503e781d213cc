use super::*;
use crate::console::ConsoleUi;
use crate::models::RenameProposal;
use crate::providers::GenerationError;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io::{self, Cursor};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{duplex, BufReader};

struct StubFs {
    files: HashSet<PathBuf>,
    mime_type: String,
    fail_rename: bool,
    reads: Cell<u32>,
    renames: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl StubFs {
    fn with_files(files: &[&str], mime_type: &str) -> Self {
        Self {
            files: files.iter().map(PathBuf::from).collect(),
            mime_type: mime_type.to_string(),
            fail_rename: false,
            reads: Cell::new(0),
            renames: RefCell::new(Vec::new()),
        }
    }
}

impl FileSystem for StubFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn detect_mime_type(&self, _path: &Path) -> io::Result<String> {
        Ok(self.mime_type.clone())
    }

    fn read(&self, _path: &Path) -> io::Result<Vec<u8>> {
        self.reads.set(self.reads.get() + 1);
        Ok(b"%PDF-1.7 quarterly report".to_vec())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if self.fail_rename {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.renames
            .borrow_mut()
            .push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }
}

struct StubGenerator {
    response: Option<(&'static str, &'static str)>,
    calls: Cell<u32>,
    seen_extension: RefCell<Option<String>>,
}

impl StubGenerator {
    fn proposing(filename: &'static str, reasoning: &'static str) -> Self {
        Self {
            response: Some((filename, reasoning)),
            calls: Cell::new(0),
            seen_extension: RefCell::new(None),
        }
    }

    fn failing() -> Self {
        Self {
            response: None,
            calls: Cell::new(0),
            seen_extension: RefCell::new(None),
        }
    }
}

impl NameGenerator for StubGenerator {
    async fn generate(&self, request: &RenameRequest) -> Result<RenameProposal, GenerationError> {
        self.calls.set(self.calls.get() + 1);
        *self.seen_extension.borrow_mut() = Some(request.extension.clone());
        match self.response {
            Some((filename, reasoning)) => Ok(RenameProposal {
                filename: filename.to_string(),
                reasoning: reasoning.to_string(),
            }),
            None => Err(GenerationError::EmptyFilename),
        }
    }
}

/// A model call that never answers.
#[derive(Default)]
struct StalledGenerator {
    calls: Cell<u32>,
}

impl NameGenerator for StalledGenerator {
    async fn generate(&self, _request: &RenameRequest) -> Result<RenameProposal, GenerationError> {
        self.calls.set(self.calls.get() + 1);
        future::pending().await
    }
}

type TestUi = ConsoleUi<Cursor<Vec<u8>>, Vec<u8>>;

fn console(input: &str) -> TestUi {
    ConsoleUi::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

fn output(ui: &TestUi) -> String {
    String::from_utf8_lossy(ui.writer()).to_string()
}

const SCAN: &str = "inbox/scan_0001.pdf";

#[tokio::test]
async fn test_dry_run_proposes_without_renaming() {
    let fs = StubFs::with_files(&[SCAN], "application/pdf");
    let generator = StubGenerator::proposing("2024-01-01_Report.pdf", "test");
    let mut ui = console("");

    let mut pipeline = RenamePipeline::new(&fs, &generator, &mut ui, true);
    let outcome = pipeline.run(Path::new(SCAN)).await.unwrap();
    assert_eq!(pipeline.stage(), Stage::Done);

    match outcome {
        RenameOutcome::DryRun { proposed } => assert_eq!(proposed, "2024-01-01_report.pdf"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(fs.renames.borrow().is_empty());

    drop(pipeline);
    let text = output(&ui);
    assert!(text.contains("scan_0001.pdf"));
    assert!(text.contains("2024-01-01_report.pdf"));
    assert!(text.contains("Dry-run"));
    assert!(!text.contains("[y/N]"));
}

#[tokio::test]
async fn test_confirmed_rename_targets_same_directory() {
    let fs = StubFs::with_files(&[SCAN], "application/pdf");
    let generator = StubGenerator::proposing("2024-01-01_Report.pdf", "quarterly numbers");
    let mut ui = console("y\n");

    let outcome = RenamePipeline::new(&fs, &generator, &mut ui, false)
        .run(Path::new(SCAN))
        .await
        .unwrap();

    let expected = PathBuf::from("inbox/2024-01-01_report.pdf");
    assert_eq!(
        outcome,
        RenameOutcome::Renamed {
            from: PathBuf::from(SCAN),
            to: expected.clone(),
        }
    );
    assert_eq!(
        fs.renames.borrow().as_slice(),
        &[(PathBuf::from(SCAN), expected)]
    );
    assert!(output(&ui).contains("Success"));
}

#[tokio::test]
async fn test_declined_confirmation_leaves_file_alone() {
    for answer in ["n\n", "\n", "YES\n"] {
        let fs = StubFs::with_files(&[SCAN], "application/pdf");
        let generator = StubGenerator::proposing("2024-01-01_Report.pdf", "test");
        let mut ui = console(answer);

        let outcome = RenamePipeline::new(&fs, &generator, &mut ui, false)
            .run(Path::new(SCAN))
            .await
            .unwrap();

        assert!(
            matches!(outcome, RenameOutcome::Cancelled { .. }),
            "answer {answer:?}"
        );
        assert!(fs.renames.borrow().is_empty());
        assert!(output(&ui).contains("Cancelled"));
    }
}

#[tokio::test]
async fn test_collision_gets_numeric_suffix() {
    let fs = StubFs::with_files(
        &[
            SCAN,
            "inbox/2024-01-01_report.pdf",
            "inbox/2024-01-01_report-1.pdf",
        ],
        "application/pdf",
    );
    let generator = StubGenerator::proposing("2024-01-01_Report.pdf", "test");
    let mut ui = console("");

    let outcome = RenamePipeline::new(&fs, &generator, &mut ui, true)
        .run(Path::new(SCAN))
        .await
        .unwrap();

    match outcome {
        RenameOutcome::DryRun { proposed } => assert_eq!(proposed, "2024-01-01_report-2.pdf"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_file_stops_before_anything_else() {
    let fs = StubFs::with_files(&[], "application/pdf");
    let generator = StubGenerator::proposing("x.pdf", "test");
    let mut ui = console("y\n");

    let mut pipeline = RenamePipeline::new(&fs, &generator, &mut ui, false);
    let err = pipeline.run(Path::new(SCAN)).await.unwrap_err();

    assert!(matches!(err, RenameError::NotFound(ref p) if p == Path::new(SCAN)));
    assert_eq!(pipeline.stage(), Stage::Aborted);
    assert_eq!(generator.calls.get(), 0);
    assert_eq!(fs.reads.get(), 0);
}

#[tokio::test]
async fn test_unsupported_type_is_rejected_before_reading() {
    let fs = StubFs::with_files(&[SCAN], "application/zip");
    let generator = StubGenerator::proposing("x.pdf", "test");
    let mut ui = console("y\n");

    let err = RenamePipeline::new(&fs, &generator, &mut ui, false)
        .run(Path::new(SCAN))
        .await
        .unwrap_err();

    assert!(matches!(err, RenameError::UnsupportedType(_)));
    assert_eq!(fs.reads.get(), 0);
    assert_eq!(generator.calls.get(), 0);
    assert!(output(&ui).contains("application/zip"));
}

#[tokio::test]
async fn test_generation_failure_is_terminal() {
    let fs = StubFs::with_files(&[SCAN], "application/pdf");
    let generator = StubGenerator::failing();
    let mut ui = console("y\n");

    let err = RenamePipeline::new(&fs, &generator, &mut ui, false)
        .run(Path::new(SCAN))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RenameError::Generation(GenerationError::EmptyFilename)
    ));
    assert_eq!(generator.calls.get(), 1);
    assert!(fs.renames.borrow().is_empty());
}

#[tokio::test]
async fn test_rename_failure_is_surfaced() {
    let mut fs = StubFs::with_files(&[SCAN], "application/pdf");
    fs.fail_rename = true;
    let generator = StubGenerator::proposing("2024-01-01_Report.pdf", "test");
    let mut ui = console("y\n");

    let err = RenamePipeline::new(&fs, &generator, &mut ui, false)
        .run(Path::new(SCAN))
        .await
        .unwrap_err();

    match err {
        RenameError::Rename { from, to, source } => {
            assert_eq!(from, PathBuf::from(SCAN));
            assert_eq!(to, PathBuf::from("inbox/2024-01-01_report.pdf"));
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_closed_stdin_is_an_input_error() {
    let fs = StubFs::with_files(&[SCAN], "application/pdf");
    let generator = StubGenerator::proposing("2024-01-01_Report.pdf", "test");
    let mut ui = console("");

    let err = RenamePipeline::new(&fs, &generator, &mut ui, false)
        .run(Path::new(SCAN))
        .await
        .unwrap_err();

    assert!(matches!(err, RenameError::Input(_)));
    assert!(fs.renames.borrow().is_empty());
}

#[tokio::test]
async fn test_generator_receives_current_extension() {
    let fs = StubFs::with_files(&[SCAN], "application/pdf; version=1.7");
    let generator = StubGenerator::proposing("2024-01-01_Report.pdf", "test");
    let mut ui = console("");

    RenamePipeline::new(&fs, &generator, &mut ui, true)
        .run(Path::new(SCAN))
        .await
        .unwrap();

    assert_eq!(generator.seen_extension.borrow().as_deref(), Some(".pdf"));
}

#[tokio::test]
async fn test_interrupt_during_generation_aborts() {
    let fs = StubFs::with_files(&[SCAN], "application/pdf");
    let generator = StalledGenerator::default();
    let mut ui = console("y\n");

    let mut pipeline =
        RenamePipeline::new(&fs, &generator, &mut ui, false).with_interrupt(async {});
    let err = pipeline.run(Path::new(SCAN)).await.unwrap_err();

    assert!(matches!(err, RenameError::Interrupted));
    assert_eq!(pipeline.stage(), Stage::Aborted);
    assert_eq!(generator.calls.get(), 1);
    assert!(fs.renames.borrow().is_empty());
}

#[tokio::test]
async fn test_interrupt_at_prompt_aborts() {
    let fs = StubFs::with_files(&[SCAN], "application/pdf");
    let generator = StubGenerator::proposing("2024-01-01_Report.pdf", "test");
    // The other end stays open and silent, so the prompt waits for a line.
    let (_stdin, reader) = duplex(64);
    let mut ui = ConsoleUi::new(BufReader::new(reader), Vec::new());

    {
        let mut pipeline = RenamePipeline::new(&fs, &generator, &mut ui, false)
            .with_interrupt(tokio::time::sleep(Duration::from_millis(50)));
        let err = pipeline.run(Path::new(SCAN)).await.unwrap_err();

        assert!(matches!(err, RenameError::Interrupted));
        assert_eq!(pipeline.stage(), Stage::Aborted);
    }

    assert_eq!(generator.calls.get(), 1);
    assert!(fs.renames.borrow().is_empty());
    assert!(String::from_utf8_lossy(ui.writer()).contains("[y/N]"));
}

#[test]
fn test_stage_names() {
    assert_eq!(Stage::ResolvingCollision.to_string(), "resolving-collision");
    assert_eq!(Stage::DryRunSkipped.to_string(), "dry-run-skipped");
}
