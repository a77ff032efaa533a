use std::collections::HashMap;
use std::fs;
use std::path::Path;

use coco_dets_rs::{
    AssetDir, CocoDetection, CorpusScanner, Detector, DetectorListener, DetectorOutput,
    OutputLocation, OutputWriteError, RawDetection, RawDetectionBuilder, ResultWriter,
    ScanConfig, ScanError, SharedBatch, read_batches, run_evaluation,
};
use image::{DynamicImage, RgbImage};

/// Replays canned detections per image id.
struct ScriptedDetector {
    script: HashMap<u64, Vec<RawDetection>>,
}

impl Detector for ScriptedDetector {
    type Error = String;

    fn detect(
        &mut self,
        image: &DynamicImage,
        _rotation_degrees: i32,
        image_id: u64,
    ) -> Result<DetectorOutput, Self::Error> {
        Ok(DetectorOutput {
            detections: self.script.get(&image_id).cloned(),
            inference_time_ms: 5,
            image_height: image.height(),
            image_width: image.width(),
            image_id,
        })
    }
}

fn write_corpus(root: &Path, corpus: &str, names: &[&str]) {
    let dir = root.join(corpus);
    fs::create_dir_all(&dir).unwrap();
    for name in names {
        RgbImage::new(64, 48)
            .save_with_format(dir.join(name), image::ImageFormat::Png)
            .unwrap();
    }
}

fn scripted() -> ScriptedDetector {
    let mut script = HashMap::new();
    script.insert(139, vec![]);
    script.insert(
        285,
        vec![
            RawDetectionBuilder::new()
                .tlbr(-5.0, 10.0, 50.0, 60.0)
                .category(2, 0.9)
                .category(0, 0.95)
                .build(),
        ],
    );
    script.insert(
        397133,
        vec![
            RawDetectionBuilder::new()
                .tlbr(1.0, 2.0, 3.0, 4.0)
                .category(17, 0.6)
                .build(),
            RawDetectionBuilder::new()
                .tlbr(10.0, 10.0, 20.0, 30.0)
                .category(61, 0.55)
                .build(),
        ],
    );
    ScriptedDetector { script }
}

#[test]
fn test_scan_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let assets_root = dir.path().join("assets");
    write_corpus(
        &assets_root,
        "val2017_500",
        &["000000000139.jpg", "000000000285.jpg", "000000397133.jpg"],
    );
    let assets = AssetDir::new(&assets_root);
    let mut scanner =
        CorpusScanner::new(assets.clone(), assets, scripted(), ScanConfig::default());
    let location = OutputLocation::new(Some(dir.path().join("external")), dir.path().join("private"));

    let outcome = run_evaluation(&mut scanner, &location).unwrap();

    let report = &outcome.report;
    assert_eq!(report.submitted, 3);
    assert!(report.failures.is_empty());
    assert_eq!(report.batch.len(), 3);
    assert_eq!(
        report.batch.as_slice()[0],
        CocoDetection {
            image_id: 285,
            category_id: 1,
            bbox: [0.0, 10.0, 55.0, 50.0],
            score: 0.95,
        }
    );

    assert!(outcome.detections_path.starts_with(dir.path().join("external")));
    let text = fs::read_to_string(&outcome.detections_path).unwrap();
    let written: Vec<CocoDetection> = serde_json::from_str(&text).unwrap();
    assert_eq!(written, report.batch.as_slice());
    let ids: Vec<u64> = written.iter().map(|d| d.image_id).collect();
    assert_eq!(ids, vec![285, 397133, 397133]);
    let categories: Vec<u32> = written.iter().map(|d| d.category_id).collect();
    assert_eq!(categories, vec![1, 18, 62]);

    let timings_path = outcome.timings.as_ref().unwrap();
    assert_eq!(timings_path.parent(), outcome.detections_path.parent());
    let timings = fs::read_to_string(timings_path).unwrap();
    assert_eq!(
        timings,
        "image_id,total_ms\n139,5\n285,5\n397133,5\n"
    );
}

#[test]
fn test_missing_corpus_writes_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let assets = AssetDir::new(dir.path().join("assets"));
    let mut scanner =
        CorpusScanner::new(assets.clone(), assets, scripted(), ScanConfig::default());
    let location = OutputLocation::new(None, dir.path().join("private"));

    let outcome = run_evaluation(&mut scanner, &location).unwrap();

    assert!(outcome.report.batch.is_empty());
    assert!(outcome.report.failures.is_empty());
    assert_eq!(fs::read_to_string(&outcome.detections_path).unwrap(), "[]\n");
    assert_eq!(read_batches(&outcome.detections_path).unwrap().len(), 1);
}

#[test]
fn test_failed_export_keeps_report() {
    let dir = tempfile::tempdir().unwrap();
    let assets_root = dir.path().join("assets");
    write_corpus(
        &assets_root,
        "val2017_500",
        &["000000000139.jpg", "000000000285.jpg", "000000397133.jpg"],
    );
    let assets = AssetDir::new(&assets_root);
    let mut scanner =
        CorpusScanner::new(assets.clone(), assets, scripted(), ScanConfig::default());
    let blocker = dir.path().join("file");
    fs::write(&blocker, b"").unwrap();
    let unusable = OutputLocation::new(None, blocker.join("sub"));

    let err = run_evaluation(&mut scanner, &unusable).unwrap_err();

    assert!(matches!(err.source, OutputWriteError::NoDirectory { .. }));
    assert_eq!(err.report.submitted, 3);
    assert_eq!(err.report.batch.len(), 3);
    assert_eq!(err.report.timings.len(), 3);

    // The batch can be written later without rescanning.
    let retry = OutputLocation::new(None, dir.path().join("private"));
    let writer = ResultWriter::create_at(&retry, 1700000000000).unwrap();
    writer.append(&err.report.batch).unwrap();
    let batches = read_batches(writer.path()).unwrap();
    assert_eq!(batches, vec![err.report.batch.clone()]);
}

#[test]
fn test_bad_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let assets_root = dir.path().join("assets");
    write_corpus(&assets_root, "mini", &["000000000285.jpg"]);
    fs::write(assets_root.join("mini/000000000001.jpg"), b"truncated").unwrap();
    fs::write(assets_root.join("mini/README"), b"not an image").unwrap();

    let assets = AssetDir::new(&assets_root);
    let config = ScanConfig {
        corpus: "mini".to_string(),
        ..ScanConfig::default()
    };
    let mut scanner = CorpusScanner::new(assets.clone(), assets, scripted(), config);

    let report = scanner.scan();

    assert_eq!(report.listed, 3);
    assert_eq!(report.submitted, 1);
    assert_eq!(report.batch.len(), 1);
    assert_eq!(report.failures.len(), 2);
    assert!(matches!(report.failures[0], ScanError::ImageLoad(_)));
    assert!(matches!(report.failures[1], ScanError::ImageId(_)));
}

/// Delivers results from a worker thread, the way callback-based detector
/// runtimes do.
struct ThreadedDetector {
    sink: SharedBatch,
}

impl ThreadedDetector {
    fn submit(&self, image_id: u64) -> std::thread::JoinHandle<()> {
        let mut sink = self.sink.clone();
        std::thread::spawn(move || {
            sink.on_results(DetectorOutput {
                detections: Some(vec![
                    RawDetectionBuilder::new()
                        .tlwh(0.0, 0.0, 8.0, 8.0)
                        .category(0, 0.8)
                        .build(),
                ]),
                inference_time_ms: 1,
                image_height: 8,
                image_width: 8,
                image_id,
            });
        })
    }
}

#[test]
fn test_threaded_notifications() {
    let detector = ThreadedDetector {
        sink: SharedBatch::new(),
    };

    let handles: Vec<_> = (1..=16).map(|id| detector.submit(id)).collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let batch = detector.sink.take();
    assert_eq!(batch.len(), 16);
    let mut ids: Vec<u64> = batch.iter().map(|d| d.image_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=16).collect::<Vec<_>>());
}
