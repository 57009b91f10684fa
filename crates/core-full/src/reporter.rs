//! Terminal status block, redrawn in place after every build.

use buildlib_core::config::constants::COMPILER_PACKAGE;
use buildlib_core::{ProjectLayout, StatsReport};
use console::{Term, measure_text_width, strip_ansi_codes, style};
use std::io;
use std::sync::Mutex;

const COLUMN_GAP: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versions {
    pub build_lib: String,
    pub typescript: String,
}

impl Versions {
    /// The compiler version comes from the project's installed package
    pub fn detect(layout: &ProjectLayout, build_lib: &str) -> Self {
        let manifest = layout
            .base()
            .join("node_modules")
            .join(COMPILER_PACKAGE)
            .join("package.json");
        let typescript = std::fs::read_to_string(manifest)
            .ok()
            .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
            .and_then(|package| package.get("version")?.as_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());
        Self {
            build_lib: build_lib.to_string(),
            typescript,
        }
    }
}

/// Lay `items` out top-to-bottom in as many columns as fit in `width`
pub fn columns(items: &[String], width: usize) -> String {
    if items.is_empty() {
        return String::new();
    }

    let cell = items
        .iter()
        .map(|item| measure_text_width(item))
        .max()
        .unwrap_or(0)
        + COLUMN_GAP;
    let column_count = (width / cell).max(1);
    let rows = items.len().div_ceil(column_count);

    (0..rows)
        .map(|row| {
            let cells: Vec<&String> = (0..column_count)
                .filter_map(|column| items.get(column * rows + row))
                .collect();
            let mut line = String::new();
            for (index, item) in cells.iter().enumerate() {
                line.push_str(item);
                if index + 1 < cells.len() {
                    let pad = cell - measure_text_width(item);
                    line.push_str(&" ".repeat(pad));
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The full status block for `stats`
pub fn render(stats: &StatsReport, versions: &Versions, running_message: &str, width: usize) -> String {
    let assets: Vec<String> = stats
        .assets
        .iter()
        .map(|asset| {
            let size = format!("({:.2}kb)", asset.size as f64 / 1000.0);
            format!("{} {}", asset.name, style(size).yellow())
        })
        .collect();

    let mut error_section = String::new();
    let mut sign_off = style("The build completed successfully.").green().to_string();
    if !stats.errors.is_empty() {
        sign_off = style("The build completed with errors.").red().to_string();
        let messages: Vec<String> = stats
            .errors
            .iter()
            .map(|error| strip_ansi_codes(&error.message).into_owned())
            .collect();
        error_section = format!(
            "\n{}\n{}\n",
            style("errors:").yellow(),
            style(messages.join("\n")).red()
        );
    }
    if !running_message.is_empty() {
        sign_off = format!("{sign_off}\n\n{running_message}");
    }

    let output_url = format!(
        "file:///{}",
        stats
            .output_path
            .display()
            .to_string()
            .trim_start_matches('/')
    );

    format!(
        "\n{info} build-lib: {}\n{info} typescript: {}\n{} errors: {}\n{}\n{}\n{}\n{}\n\n{}\n",
        versions.build_lib,
        versions.typescript,
        style("✖").red(),
        stats.errors.len(),
        error_section,
        style("assets:").yellow(),
        columns(&assets, width),
        style(format!("output at: {}", style(output_url).cyan().underlined())).yellow(),
        sign_off,
        info = style("ℹ").blue(),
    )
}

/// Writes the status block to stdout, replacing the previous one
pub struct StatusReporter {
    term: Term,
    versions: Versions,
    rendered_lines: Mutex<usize>,
}

impl StatusReporter {
    pub fn new(versions: Versions) -> Self {
        Self {
            term: Term::stdout(),
            versions,
            rendered_lines: Mutex::new(0),
        }
    }

    pub fn versions(&self) -> &Versions {
        &self.versions
    }

    pub fn report(&self, stats: &StatsReport, running_message: &str) -> io::Result<()> {
        let mut rendered_lines = self
            .rendered_lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if *rendered_lines > 0 && self.term.is_term() {
            self.term.clear_last_lines(*rendered_lines)?;
        }

        let width = self.term.size().1 as usize;
        let block = render(stats, &self.versions, running_message, width);
        for line in block.lines() {
            self.term.write_line(line)?;
        }
        *rendered_lines = block.lines().count();
        Ok(())
    }
}
