use lect::config::{load_config, write_config, LectConfig, Overrides};
use lect::export::{DirectorySink, Sink, StdoutSink};
use lect::ui::{self, Icons};
use lect::{AnnotationGraph, Annotations, Settings};
use owo_colors::OwoColorize;
use std::path::Path;
use std::time::Instant;

pub fn resolve_settings(config_path: &Path, overrides: Overrides) -> anyhow::Result<Settings> {
    let config = load_config(Some(config_path))?;
    if config.is_none() {
        tracing::debug!("No configuration at {}, using flags only", config_path.display());
    }
    Ok(Settings::resolve(config.as_ref(), overrides)?)
}

pub fn run_build(settings: &Settings, stdout: bool, pretty: bool) -> anyhow::Result<()> {
    let started = Instant::now();

    if stdout {
        let document = lect::generate(settings)?;
        StdoutSink::new(pretty).accept(&document)?;
        return Ok(());
    }

    let Some(output) = settings.output.as_deref() else {
        return Err(lect::Error::Config(
            "No output directory given (use --output, `output` in lect.toml, or --stdout)".to_string(),
        )
        .into());
    };

    ui::header(&format!("Building annotation graph ({})", settings.language.name()));
    let annotations = extract(settings)?;
    validate(settings, &annotations)?;

    ui::phase("Preprocessing");
    let document = settings.preprocessor().preprocess(&annotations);
    DirectorySink::new(output).accept(&document)?;

    ui::success(&format!("Wrote {}", output.display()));
    ui::timing(started.elapsed());
    Ok(())
}

pub fn run_check(settings: &Settings, list: bool) -> anyhow::Result<()> {
    let started = Instant::now();

    ui::header(&format!("Checking annotations ({})", settings.language.name()));
    let annotations = extract(settings)?;
    validate(settings, &annotations)?;

    if list {
        ui::section("Annotations");
        for a in &annotations.text_annotations {
            ui::annotation_row(&a.id, &a.title, None);
        }
        for a in &annotations.code_annotations {
            ui::annotation_row(&a.id, &a.title, Some(&format!("{}:{}", a.file, a.line + 1)));
        }
        println!();
    }

    ui::stats(&AnnotationGraph::from_annotations(&annotations).stats());
    ui::success("All checks passed");
    ui::timing(started.elapsed());
    Ok(())
}

pub fn run_init(path: &Path, force: bool) -> anyhow::Result<()> {
    write_config(path, &LectConfig::starter(), force)?;
    ui::success(&format!("Created {}", path.display()));
    ui::summary_row("Next:", "edit the paths, then run `lect check`");
    Ok(())
}

pub fn run_languages() -> anyhow::Result<()> {
    let registry = lect::adapter::default_registry()?;
    ui::section("Supported languages");
    for language in registry.languages() {
        let aliases = if language.aliases().is_empty() {
            String::new()
        } else {
            ui::dim(&format!(" ({})", language.aliases().join(", ")))
        };
        println!(
            "  {} {}{}  {}",
            Icons::PACKAGE,
            language.name().bold(),
            aliases,
            language
                .extensions()
                .iter()
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(" ")
        );
    }
    Ok(())
}

/// Print an error, with a hint for integrity failures
pub fn report_failure(err: &anyhow::Error) {
    ui::error(&err.to_string());
    if let Some(lect::Error::Integrity(integrity)) = err.downcast_ref::<lect::Error>() {
        ui::failure_detail(integrity);
    }
}

fn extract(settings: &Settings) -> anyhow::Result<Annotations> {
    ui::phase("Extracting");
    let annotations = lect::collect(settings)?;
    ui::summary_row("Text:", &annotations.text_annotations.len().to_string());
    ui::summary_row("Code:", &annotations.code_annotations.len().to_string());
    Ok(annotations)
}

fn validate(settings: &Settings, annotations: &Annotations) -> anyhow::Result<()> {
    ui::phase("Validating");
    let pipeline = settings.pipeline();
    pipeline.run(annotations).map_err(lect::Error::from)?;
    ui::summary_row("Checks:", &pipeline.names().join(", "));
    Ok(())
}
