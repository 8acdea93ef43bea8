use clap::Parser;
use std::io::Write;
use tarucca_processor::domain::model::BatchSummary;
use tarucca_processor::utils::{console, logger, validation::Validate};
use tarucca_processor::{BatchProcessor, CliConfig, LocalStorage, ProcessorError};

fn print_lines(lines: &[String]) {
    let mut stdout = std::io::stdout().lock();
    for line in lines {
        let _ = writeln!(stdout, "{}", line);
    }
    let _ = stdout.flush();
}

fn fail(e: &ProcessorError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();
    let resolved = cli.resolve();

    // 初始化日誌
    let log_level = resolved.as_ref().ok().and_then(|s| s.log_level.clone());
    logger::init_logger(cli.verbose, cli.log_format(), log_level.as_deref());

    let settings = match resolved {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };

    // 驗證配置
    if let Err(e) = settings.validate() {
        fail(&e);
    }
    tracing::debug!("Effective settings: {:?}", settings);

    if settings.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let processor =
        BatchProcessor::new(LocalStorage::default(), settings.clone()).with_monitoring(settings.monitor);

    let files = match processor.discover().await {
        Ok(files) => files,
        Err(e @ ProcessorError::IncomingDirMissing { .. }) => {
            print_lines(&[format!("❌ Error: {}", e)]);
            std::process::exit(e.exit_code());
        }
        Err(e) => fail(&e),
    };

    if files.is_empty() {
        print_lines(&[
            format!("⚠️  No CSV files found in {}", settings.incoming_dir),
            "   Add sensor exports (timestamp,voltage,current,temperature,power) and re-run"
                .to_string(),
        ]);
        return;
    }

    print_lines(&console::banner(files.len()));

    // 逐一處理時即時輸出；並行時處理完再統一輸出
    let summary = if settings.concurrency <= 1 {
        let mut results = Vec::with_capacity(files.len());
        for path in &files {
            let report = processor.process_file(path).await;
            let mut lines = vec![console::processing_line(&report.input_file)];
            lines.extend(console::file_result(&report));
            lines.push(String::new());
            print_lines(&lines);
            results.push(report);
        }
        BatchSummary { results }
    } else {
        let summary = processor.process_files(&files).await;
        for report in &summary.results {
            let mut lines = vec![console::processing_line(&report.input_file)];
            lines.extend(console::file_result(report));
            lines.push(String::new());
            print_lines(&lines);
        }
        summary
    };

    print_lines(&console::summary(&summary));

    if let Some(path) = &cli.summary {
        if let Err(e) = processor.write_summary(&summary, path).await {
            fail(&e);
        }
    }

    tracing::info!(
        "Finished: {}/{} files succeeded",
        summary.success_count(),
        summary.total()
    );

    std::process::exit(summary.exit_code());
}
