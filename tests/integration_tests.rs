use std::path::Path;
use tarucca_processor::{
    BatchProcessor, BatchSummary, LocalStorage, ProcessingStatus, ProcessorError, Settings,
};
use tempfile::TempDir;

const HEADER: &str = "timestamp,voltage,current,temperature,power\n";

fn write_input(root: &Path, name: &str, rows: &str) {
    let dir = root.join("incoming");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(name), format!("{}{}", HEADER, rows)).unwrap();
}

fn settings() -> Settings {
    Settings {
        incoming_dir: "incoming".to_string(),
        output_dir: "processed".to_string(),
        ..Settings::default()
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn test_end_to_end_batch() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_input(
        root,
        "panel_a.csv",
        "2024-01-15T10:00:00,24.0,8.0,30.0,200\n\
         2024-01-15T10:05:00,25.0,8.5,31.0,210\n\
         2024-01-15T11:00:00,26.0,9.0,33.0,400\n",
    );
    write_input(
        root,
        "panel_b.csv",
        "2024-01-15T10:00:00,24.0,8.0,30.0,200\n\
         2024-01-15T10:05:00,ERROR,8.0,30.0,200\n\
         2024-01-15T10:10:00,24.0,15.0,30.0,200\n",
    );
    write_input(
        root,
        "broken.csv",
        "2024-01-15T10:00:00,5.0,8.0,30.0,200\n\
         2024-01-15T10:05:00,24.0,8.0,95.0,200\n",
    );
    std::fs::write(root.join("incoming/readme.txt"), "not sensor data").unwrap();

    let processor = BatchProcessor::new(LocalStorage::new(root), settings());
    let summary = processor.run().await.unwrap();

    let names: Vec<&str> = summary.results.iter().map(|r| r.input_file.as_str()).collect();
    assert_eq!(names, vec!["broken.csv", "panel_a.csv", "panel_b.csv"]);
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.success_count(), 2);
    assert_eq!(summary.failure_count(), 1);

    let broken = &summary.results[0];
    assert_eq!(broken.status, ProcessingStatus::Error);
    assert_eq!(broken.error.as_deref(), Some("All records invalid"));
    assert_eq!(broken.records_invalid, 2);
    assert!(!root.join("processed/broken_processed.json").exists());

    let panel_b = &summary.results[2];
    assert_eq!(panel_b.records_processed, 1);
    assert_eq!(panel_b.records_invalid, 2);

    let output = root.join("processed/panel_a_processed.json");
    let raw = std::fs::read_to_string(&output).unwrap();
    assert!(raw.contains("\n    \"metrics\": {\n        \"voltage\""));

    let json = read_json(&output);
    assert_eq!(json["input_file"], "panel_a.csv");
    assert_eq!(json["output_file"], "panel_a_processed.json");
    assert_eq!(json["status"], "success");
    assert_eq!(json["records_processed"], 3);
    assert_eq!(json["records_invalid"], 0);
    assert!(json.get("error").is_none());
    assert_eq!(json["metrics"]["voltage"]["avg"], 25.0);
    assert_eq!(json["metrics"]["voltage"]["std"], 1.0);
    assert_eq!(json["metrics"]["current"]["max"], 9.0);
    assert_eq!(json["metrics"]["temperature"]["min"], 30.0);
    assert_eq!(json["metrics"]["peak_power_hour"], "2024-01-15T11:00:00");

    let energy = json["metrics"]["total_energy_kwh"].as_f64().unwrap();
    assert!((energy - 810.0 * 5.0 / 60.0 / 1000.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_concurrent_batch_keeps_file_order() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for i in 0..6 {
        write_input(
            root,
            &format!("site_{}.csv", i),
            "2024-03-01T12:00:00,24.0,8.0,30.0,500\n",
        );
    }

    let config = Settings {
        concurrency: 3,
        ..settings()
    };
    let processor = BatchProcessor::new(LocalStorage::new(root), config);
    let summary = processor.run().await.unwrap();

    let names: Vec<String> = summary.results.iter().map(|r| r.input_file.clone()).collect();
    let expected: Vec<String> = (0..6).map(|i| format!("site_{}.csv", i)).collect();
    assert_eq!(names, expected);
    assert!(summary.all_succeeded());

    for i in 0..6 {
        assert!(root
            .join(format!("processed/site_{}_processed.json", i))
            .exists());
    }
}

#[tokio::test]
async fn test_one_hour_at_one_kilowatt_is_one_kwh() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let rows: String = (0..12)
        .map(|i| format!("2024-01-15T10:{:02}:00,24.0,8.0,30.0,1000\n", i * 5))
        .collect();
    write_input(root, "hour.csv", &rows);

    let processor = BatchProcessor::new(LocalStorage::new(root), settings());
    let report = processor.process_file("incoming/hour.csv").await;

    let metrics = report.metrics.unwrap();
    assert!((metrics.total_energy_kwh - 1.0).abs() < 1e-9);
    assert_eq!(metrics.voltage.std, 0.0);
}

#[tokio::test]
async fn test_missing_incoming_directory() {
    let temp_dir = TempDir::new().unwrap();
    let processor = BatchProcessor::new(LocalStorage::new(temp_dir.path()), settings());

    let err = processor.run().await.unwrap_err();
    assert!(matches!(err, ProcessorError::IncomingDirMissing { .. }));
    assert_eq!(err.to_string(), "Directory incoming does not exist");
}

#[tokio::test]
async fn test_empty_incoming_directory() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("incoming")).unwrap();

    let processor = BatchProcessor::new(LocalStorage::new(temp_dir.path()), settings());
    assert!(processor.discover().await.unwrap().is_empty());

    let summary = processor.run().await.unwrap();
    assert_eq!(summary.total(), 0);
    assert!(summary.all_succeeded());
}

#[tokio::test]
async fn test_missing_input_file_report() {
    let temp_dir = TempDir::new().unwrap();
    let processor = BatchProcessor::new(LocalStorage::new(temp_dir.path()), settings());

    let report = processor.process_file("incoming/vanished.csv").await;
    assert_eq!(report.input_file, "vanished.csv");
    assert_eq!(report.status, ProcessingStatus::Error);
    assert_eq!(report.error.as_deref(), Some("Input file does not exist"));
    assert!(report.output_file.is_none());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["metrics"], serde_json::json!({}));
}

#[tokio::test]
async fn test_offset_and_reduced_precision_timestamps() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_input(
        root,
        "offset.csv",
        "2024-01-15T10:00:00+00:00,24.0,8.0,30.0,300\n",
    );
    write_input(
        root,
        "reduced.csv",
        "2024-01-15T10,24,8,30,100\n\
         20240115T103000,24,8,30,150\n",
    );

    let processor = BatchProcessor::new(LocalStorage::new(root), settings());
    let summary = processor.run().await.unwrap();
    assert!(summary.all_succeeded());

    let offset = summary.results[0].metrics.as_ref().unwrap();
    assert_eq!(offset.peak_power_hour, "2024-01-15T10:00:00+00:00");

    let reduced = &summary.results[1];
    assert_eq!(reduced.records_processed, 2);
    assert_eq!(reduced.records_invalid, 0);
    assert_eq!(
        reduced.metrics.as_ref().unwrap().peak_power_hour,
        "2024-01-15T10:00:00"
    );
}

#[tokio::test]
async fn test_write_summary() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_input(root, "one.csv", "2024-01-15T10:00:00,24.0,8.0,30.0,300\n");

    let processor = BatchProcessor::new(LocalStorage::new(root), settings());
    let summary = processor.run().await.unwrap();
    assert_eq!(summary.exit_code(), 0);

    processor
        .write_summary(&summary, "reports/summary.json")
        .await
        .unwrap();
    let json = read_json(&root.join("reports/summary.json"));
    assert_eq!(json["results"][0]["input_file"], "one.csv");
}

#[tokio::test]
async fn test_summary_write_failure_is_a_system_error() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::create_dir_all(root.join("reports/summary.json")).unwrap();

    let processor = BatchProcessor::new(LocalStorage::new(root), settings());
    let err = processor
        .write_summary(&BatchSummary::default(), "reports/summary.json")
        .await
        .unwrap_err();

    assert!(matches!(err, ProcessorError::IoError(_)));
    assert_eq!(err.exit_code(), 3);
}
