// Command implementations. Each returns Result<(), CliError>; `main` maps
// the error to an exit code.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use platelunch_config::Settings;
use platelunch_dedup::{
    classify, DuplicateAnnotation, ExactGroup, Session, SessionSummary, Step, StepReport,
};
use platelunch_io::{ColumnLayout, ColumnNames, ExportResult, ExportStyle, LoadOptions, SaveOptions, Table};
use serde::Serialize;

use crate::error::CliError;
use crate::menu::{self, MenuExit};

/// Flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub settings: Settings,
    pub quiet: bool,
}

impl Context {
    fn input(&self, input: Option<PathBuf>) -> PathBuf {
        input.unwrap_or_else(|| self.settings.files.input.clone())
    }

    fn output(&self, output: Option<PathBuf>) -> PathBuf {
        output.unwrap_or_else(|| self.settings.files.output.clone())
    }

    fn load_options(&self) -> LoadOptions {
        let cols = &self.settings.columns;
        LoadOptions {
            columns: ColumnNames {
                name: cols.name.clone(),
                phone: cols.phone.clone(),
                link: cols.link.clone(),
            },
            sheet: self.settings.files.sheet.clone(),
        }
    }

    fn save_options(&self) -> Result<SaveOptions, CliError> {
        let highlight = &self.settings.highlight;
        Ok(SaveOptions {
            link_header: self.settings.columns.link.clone(),
            style: ExportStyle {
                highlight_fill: highlight.fill_rgb().map_err(CliError::config)?,
                highlight_bold: highlight.bold,
                link_text: highlight.link_text.clone(),
            },
        })
    }

    fn load(&self, path: &Path) -> Result<Table, CliError> {
        if !path.exists() {
            return Err(CliError::load(platelunch_io::SheetError::Open {
                path: path.display().to_string(),
                message: "no such file".into(),
            })
            .with_hint("pass the sheet as an argument or set [files] input in the settings file"));
        }
        let (table, _stats) = platelunch_io::load(path, &self.load_options()).map_err(CliError::load)?;
        Ok(table)
    }

    fn save(
        &self,
        layout: &ColumnLayout,
        session: &Session,
        path: &Path,
    ) -> Result<ExportResult, CliError> {
        platelunch_io::save(
            layout,
            session.records().to_vec(),
            session.partial(),
            &self.save_options()?,
            path,
        )
        .map_err(CliError::save)
    }
}

// ============================================================================
// run
// ============================================================================

#[derive(Serialize)]
struct RunReport<'a> {
    input: String,
    output: String,
    steps: &'a [StepReport],
    summary: SessionSummary,
    partial: &'a [DuplicateAnnotation],
    rows_highlighted: usize,
}

/// Parse `--steps dedup,links,phones`. Empty means every step.
pub fn parse_steps(values: &[String]) -> Result<Vec<Step>, CliError> {
    if values.is_empty() {
        return Ok(Step::ALL.to_vec());
    }
    values
        .iter()
        .flat_map(|v| v.split(','))
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            Step::parse(v).ok_or_else(|| {
                CliError::usage(format!("unknown step '{}'", v.trim()))
                    .with_hint("steps are: dedup, links, phones")
            })
        })
        .collect()
}

pub fn cmd_run(
    ctx: &Context,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    steps: Vec<Step>,
    json: bool,
) -> Result<(), CliError> {
    let input = ctx.input(input);
    let output = ctx.output(output);
    if steps.is_empty() {
        return Err(CliError::usage("no steps to run"));
    }

    let Table { layout, records } = ctx.load(&input)?;
    let mut session = Session::new(records, ctx.settings.links.clone());

    for step in steps {
        let report = session.apply(step);
        if !ctx.quiet && !json {
            eprintln!("{report}");
        }
    }

    let written = ctx.save(&layout, &session, &output)?;

    if json {
        let report = RunReport {
            input: input.display().to_string(),
            output: output.display().to_string(),
            steps: session.reports(),
            summary: session.summary(),
            partial: session.partial(),
            rows_highlighted: written.rows_highlighted,
        };
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(format!("JSON serialization: {e}")))?;
        println!("{text}");
    } else if !ctx.quiet {
        eprintln!("✔ Output written to {}", output.display());
    }
    Ok(())
}

// ============================================================================
// inspect
// ============================================================================

#[derive(Serialize)]
struct InspectReport {
    input: String,
    records: usize,
    unique: usize,
    exact_count: usize,
    removed: usize,
    exact_groups: Vec<ExactGroup>,
    partial: Vec<DuplicateAnnotation>,
}

pub fn cmd_inspect(ctx: &Context, input: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let input = ctx.input(input);
    let table = ctx.load(&input)?;
    let records = table.records.len();
    let result = classify(table.records);

    let report = InspectReport {
        input: input.display().to_string(),
        records,
        unique: result.records.len(),
        exact_count: result.exact_count,
        removed: result.removed(),
        partial: result.partial,
        exact_groups: result.exact_groups,
    };

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(format!("JSON serialization: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_inspect(&mut out, &report)?;
    Ok(())
}

fn write_inspect<W: Write>(out: &mut W, report: &InspectReport) -> io::Result<()> {
    writeln!(
        out,
        "{}: {} records, {} unique",
        report.input, report.records, report.unique
    )?;
    writeln!(
        out,
        "exact duplicates: {} records in {} groups ({} would be removed)",
        report.exact_count,
        report.exact_groups.len(),
        report.removed
    )?;
    for group in &report.exact_groups {
        let rows: Vec<String> = group.rows.iter().map(|r| format!("#{}", r + 1)).collect();
        writeln!(out, "  {} | {}  (records {})", group.name, group.phone, rows.join(", "))?;
    }
    writeln!(out, "partial duplicates: {}", report.partial.len())?;
    for a in &report.partial {
        writeln!(out, "  {} | {}", a.name, a.phone)?;
    }
    Ok(())
}

// ============================================================================
// config
// ============================================================================

pub fn cmd_config(
    ctx: &Context,
    config_path: Option<PathBuf>,
    init: bool,
    force: bool,
    path_only: bool,
) -> Result<(), CliError> {
    let path = config_path.unwrap_or_else(Settings::config_path);

    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    if init {
        if path.exists() && !force {
            return Err(CliError::usage(format!("{} already exists", path.display()))
                .with_hint("pass --force to overwrite it"));
        }
        Settings::default().save_to(&path).map_err(CliError::config)?;
        if !ctx.quiet {
            eprintln!("✔ Wrote default settings to {}", path.display());
        }
        return Ok(());
    }

    let text = ctx.settings.to_toml().map_err(CliError::config)?;
    print!("{text}");
    Ok(())
}

// ============================================================================
// interactive menu
// ============================================================================

pub fn cmd_menu(ctx: &Context, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<(), CliError> {
    let input = ctx.input(input);
    let output = ctx.output(output);

    menu::clear_screen()?;
    let Table { layout, records } = ctx.load(&input)?;
    let mut session = Session::new(records, ctx.settings.links.clone());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let exit = run_menu(ctx, &layout, &mut session, stdin.lock(), &mut out, &output)?;
    if exit == MenuExit::Closed {
        tracing::info!("menu closed without export");
    }
    Ok(())
}

fn run_menu<R: BufRead, W: Write>(
    ctx: &Context,
    layout: &ColumnLayout,
    session: &mut Session,
    input: R,
    out: &mut W,
    output: &Path,
) -> Result<MenuExit, CliError> {
    menu::run(session, input, out, output, |session| {
        ctx.save(layout, session, output)?;
        Ok(output.to_path_buf())
    })
}
