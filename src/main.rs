//! # Library PC manager
//!
//! Command-line front end over the `library_pc` library.
//!
//! ```bash
//! library-pc student add -i 101 -n "A" -c "FYBSC CS" -t 999
//! library-pc pc add PC1
//! library-pc assign 101 PC1
//! library-pc unassign 101
//! library-pc history --pc PC1 --export ./pc1-history
//! ```
//!
use std::process::exit;

use anyhow::Context;
use clap::Parser;
use cli::{
    Command, ConfigCommand, History, ImportStudents, Opts, PcCommand, StudentCommand,
};
use serde::Serialize;

use library_pc::api::{ApiError, ApiResult, HistoryApi};
use library_pc::config::AppConfig;
use library_pc::domain::types::format_timestamp;
use library_pc::i18n::{self, t, t_with_args};
use library_pc::importer::ImportReport;
use library_pc::{logging, AppState};

mod cli;

fn main() -> anyhow::Result<()> {
    let opts: Opts = Opts::parse();

    let level = opts.verbosity.map(|l| l.to_string());
    if opts.json {
        logging::init_json(level.as_deref());
    } else {
        logging::init(level.as_deref());
    }

    let config = AppConfig::from_env().with_overrides(opts.db.clone(), opts.locale.clone());
    i18n::apply_config(&config);

    let state = AppState::new(&config)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("无法初始化数据库 {}", config.db_path))?;

    if let Err(err) = run(&opts, &state) {
        report_error(&err, opts.json);
        exit(1);
    }
    Ok(())
}

fn run(opts: &Opts, state: &AppState) -> ApiResult<()> {
    let out = Output { json: opts.json };

    match &opts.cmd {
        Command::Student(student) => match &student.cmd {
            StudentCommand::Add(add) => {
                let s = state
                    .student_api
                    .add(&add.id, &add.name, &add.course, &add.contact)?;
                out.notice(&s, &t_with_args("student.added", &[("id", &s.student_id)]));
            }
            StudentCommand::List => {
                let students = state.student_api.list_all()?;
                out.table(
                    &students,
                    &["Student ID", "Name", "Course", "Contact"],
                    students
                        .iter()
                        .map(|s| vec![s.student_id.clone(), s.name.clone(), s.course.clone(), s.contact.clone()])
                        .collect(),
                );
            }
            StudentCommand::Get { student_id } => {
                let s = state.student_api.get(student_id)?;
                out.table(
                    &s,
                    &["Student ID", "Name", "Course", "Contact"],
                    vec![vec![s.student_id.clone(), s.name.clone(), s.course.clone(), s.contact.clone()]],
                );
            }
            StudentCommand::Import(ImportStudents { path, mode }) => {
                let report = state
                    .import_api
                    .import_file(path, mode.map(Into::into))?;
                print_import_report(&out, &report);
            }
            StudentCommand::Preview { path } => {
                let sheet = state.import_api.preview(path)?;
                let headers: Vec<&str> = sheet.headers.iter().map(String::as_str).collect();
                out.table(
                    &sheet,
                    &headers,
                    sheet.rows.iter().map(|r| r.cells.clone()).collect(),
                );
                if !out.json {
                    println!(
                        "{}",
                        t_with_args("student.preview", &[("rows", &sheet.rows.len().to_string())])
                    );
                }
            }
        },

        Command::Pc(pc) => match &pc.cmd {
            PcCommand::Add { pc_id } => {
                let c = state.computer_api.add(pc_id)?;
                out.notice(&c, &t_with_args("pc.added", &[("id", &c.pc_id)]));
            }
            PcCommand::Remove { pc_id } => {
                state.computer_api.remove(pc_id)?;
                out.notice(&pc_id, &t_with_args("pc.removed", &[("id", pc_id.trim())]));
            }
            PcCommand::List { vacant: true } => {
                let ids = state.computer_api.list_vacant()?;
                let text = if ids.is_empty() {
                    t("pc.none_vacant")
                } else {
                    t_with_args("pc.vacant", &[("ids", &ids.join(", "))])
                };
                out.notice(&ids, &text);
            }
            PcCommand::List { vacant: false } => {
                let computers = state.computer_api.list_all()?;
                out.table(
                    &computers,
                    &["PC ID", "Status", "Student ID"],
                    computers
                        .iter()
                        .map(|c| {
                            vec![
                                c.pc_id.clone(),
                                c.status.to_string(),
                                c.assigned_student_id.clone().unwrap_or_default(),
                            ]
                        })
                        .collect(),
                );
            }
            PcCommand::Get { pc_id } => {
                let c = state.computer_api.get(pc_id)?;
                out.table(
                    &c,
                    &["PC ID", "Status", "Student ID"],
                    vec![vec![
                        c.pc_id.clone(),
                        c.status.to_string(),
                        c.assigned_student_id.clone().unwrap_or_default(),
                    ]],
                );
            }
        },

        Command::Assign(assign) => {
            let r = state
                .reservation_api
                .assign(&assign.student_id, &assign.pc_id)?;
            out.notice(
                &r,
                &t_with_args(
                    "reservation.assigned",
                    &[("student", &r.student_id), ("pc", &r.pc_id)],
                ),
            );
        }

        Command::Unassign(unassign) => {
            let r = state.reservation_api.unassign(&unassign.student_id)?;
            let duration = r
                .duration()
                .map(|d| library_pc::domain::types::format_duration(&d))
                .unwrap_or_default();
            out.notice(
                &r,
                &t_with_args(
                    "reservation.unassigned",
                    &[("student", &r.student_id), ("pc", &r.pc_id), ("duration", &duration)],
                ),
            );
        }

        Command::Active => {
            let active = state.reservation_api.list_active()?;
            if active.is_empty() && !out.json {
                println!("{}", t("reservation.none_active"));
            } else {
                out.table(
                    &active,
                    &["Student ID", "Name", "PC ID", "Entry Time"],
                    active
                        .iter()
                        .map(|a| {
                            vec![
                                a.student_id.clone(),
                                a.name.clone(),
                                a.pc_id.clone(),
                                format_timestamp(&a.entry_time),
                            ]
                        })
                        .collect(),
                );
            }
        }

        Command::History(history) => run_history(&out, state, history)?,

        Command::Config(config) => match &config.cmd {
            ConfigCommand::List => {
                let all = state.config_manager.list_all()?;
                out.table(
                    &all,
                    &["Key", "Value"],
                    all.iter().map(|(k, v)| vec![k.clone(), v.clone()]).collect(),
                );
            }
            ConfigCommand::Set { key, value } => {
                state.config_manager.set(key.trim(), value.trim())?;
                out.notice(&key, &t_with_args("config.updated", &[("key", key.trim())]));
            }
            ConfigCommand::Courses { courses } => {
                state.config_manager.set_course_options(courses)?;
                let stored = state.config_manager.course_options()?;
                out.notice(
                    &stored,
                    &t_with_args(
                        "config.updated",
                        &[("key", library_pc::config::config_keys::COURSE_OPTIONS)],
                    ),
                );
            }
        },
    }
    Ok(())
}

fn run_history(out: &Output, state: &AppState, history: &History) -> ApiResult<()> {
    let filter = HistoryApi::build_filter(
        history.date.as_deref(),
        history.student.as_deref(),
        history.pc.as_deref(),
    )?;
    let rows = state.history_api.query(&filter)?;

    if let Some(destination) = &history.export {
        let summary = state.history_api.export(&rows, destination)?;
        let path = summary.path.display().to_string();
        out.notice(
            &summary,
            &t_with_args(
                "export.success",
                &[("rows", &summary.rows_written.to_string()), ("path", &path)],
            ),
        );
        return Ok(());
    }

    if rows.is_empty() && !out.json {
        println!("{}", t("history.empty"));
        return Ok(());
    }
    out.table(
        &rows,
        &library_pc::exporter::EXPORT_COLUMNS,
        rows.iter().map(|r| r.to_cells().to_vec()).collect(),
    );
    Ok(())
}

fn print_import_report(out: &Output, report: &ImportReport) {
    out.notice(
        report,
        &t_with_args(
            "student.imported",
            &[
                ("imported", &report.imported.to_string()),
                ("skipped", &report.skipped.len().to_string()),
            ],
        ),
    );
    if !out.json {
        for issue in &report.skipped {
            println!(
                "  {}",
                t_with_args(
                    "student.row_issue",
                    &[("row", &issue.row_number.to_string()), ("message", &issue.message)],
                )
            );
        }
    }
}

fn report_error(err: &ApiError, json: bool) {
    let response = err.to_response();
    if json {
        match serde_json::to_string_pretty(&response) {
            Ok(s) => eprintln!("{}", s),
            Err(_) => eprintln!("{}", err),
        }
        return;
    }

    eprintln!("{} [{}]: {}", t("common.error"), response.code, response.message);
    if let ApiError::ImportRejected { issues, .. } = err {
        for issue in issues {
            eprintln!(
                "  {}",
                t_with_args(
                    "student.row_issue",
                    &[("row", &issue.row_number.to_string()), ("message", &issue.message)],
                )
            );
        }
    }
}

// ==========================================
// 输出（文本表格或 JSON）
// ==========================================
struct Output {
    json: bool,
}

impl Output {
    fn print_json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => tracing::error!("JSON 序列化失败: {}", e),
        }
    }

    fn notice<T: Serialize + ?Sized>(&self, value: &T, text: &str) {
        if self.json {
            self.print_json(value);
        } else {
            println!("{}", text);
        }
    }

    fn table<T: Serialize + ?Sized>(&self, value: &T, headers: &[&str], rows: Vec<Vec<String>>) {
        if self.json {
            self.print_json(value);
            return;
        }
        if rows.is_empty() {
            println!("{}", t("common.empty"));
            return;
        }

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<width$}", c, width = *w))
                .collect::<Vec<_>>()
                .join("  ")
        };
        let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        println!("{}", line(&header_cells).trim_end());
        println!(
            "{}",
            widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
        );
        for row in &rows {
            println!("{}", line(row).trim_end());
        }
    }
}
