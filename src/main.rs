use anyhow::Result;
use clap::Parser;
use deadlock_report::catalog::DetectorCatalog;
use deadlock_report::cli::{Cli, Command, OutputFormat};
use deadlock_report::pipeline::Analyzer;
use deadlock_report::report::{rule, RenderedReport, ReportKind};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initialize tracing to stderr; warnings are always shown, `--debug` shows everything
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_saved(path: Option<&PathBuf>) {
    if let Some(path) = path {
        println!("\n✅ Results saved to: {}", path.display());
    }
}

/// Run a single report and print it in the requested format
fn run_report(analyzer: &Analyzer, kind: ReportKind, format: OutputFormat) -> Result<()> {
    let rendered = analyzer.run(kind)?;
    let saved = analyzer.write(&rendered)?;

    match format {
        OutputFormat::Text => {
            print!("{}", rendered.console);
            print_saved(saved.as_ref());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rendered.json)?);
        }
    }

    Ok(())
}

/// Run every report in-process; one failing report does not stop the others
fn run_all(analyzer: &Analyzer, format: OutputFormat) -> Result<()> {
    let text = format == OutputFormat::Text;
    let bar = rule(80);
    let mut outcomes: Vec<(ReportKind, bool)> = Vec::new();
    let mut combined = serde_json::Map::new();

    if text {
        println!("🚀 Running Complete Test Suite Analysis");
    }

    for kind in ReportKind::ALL {
        if text {
            println!("\n{}\nRunning: {}\n{}", bar, kind.title(), bar);
        }

        let outcome = analyzer.run(kind).and_then(|rendered: RenderedReport| {
            let saved = analyzer.write(&rendered)?;
            Ok((rendered, saved))
        });

        match outcome {
            Ok((rendered, saved)) => {
                if text {
                    print!("{}", rendered.console);
                    print_saved(saved.as_ref());
                    println!("✅ {} completed successfully", kind.title());
                } else {
                    combined.insert(kind.name().to_string(), rendered.json);
                }
                outcomes.push((kind, true));
            }
            Err(e) => {
                tracing::error!("{} failed: {}", kind.title(), e);
                if text {
                    println!("❌ {} failed: {}", kind.title(), e);
                }
                outcomes.push((kind, false));
            }
        }
    }

    let failed = outcomes.iter().filter(|(_, ok)| !ok).count();

    if text {
        println!("\n{}\nANALYSIS SUMMARY\n{}", bar, bar);
        for (kind, ok) in &outcomes {
            let status = if *ok { "✅ PASS" } else { "❌ FAIL" };
            println!("{}: {}", status, kind.title());
        }
        println!("{}", bar);

        if failed == 0 {
            println!("\n✅ All analyses completed successfully!");
            if analyzer.config().write_markdown {
                println!("\nGenerated reports:");
                for kind in ReportKind::ALL {
                    println!("  - {}", kind.file_name());
                }
            }
        } else {
            println!("\n⚠️  Some analyses failed. Check output above for details.");
        }
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::Object(combined))?
        );
    }

    if failed > 0 {
        anyhow::bail!("{} of {} analyses failed", failed, outcomes.len());
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let catalog = match &args.catalog {
        Some(path) => DetectorCatalog::from_toml_file(path)?,
        None => DetectorCatalog::default(),
    };

    let config = args.analysis_config();
    let analyzer = Analyzer::new(&config, &catalog)?;

    match args.command {
        Command::Detection => run_report(&analyzer, ReportKind::Detection, args.format),
        Command::Compare => run_report(&analyzer, ReportKind::Comparison, args.format),
        Command::VerifyFp => run_report(&analyzer, ReportKind::FalsePositive, args.format),
        Command::All => run_all(&analyzer, args.format),
    }
}
