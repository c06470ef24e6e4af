use std::fmt::{self, Formatter};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use library_pc::importer::ImportMode;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub(crate) enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub(crate) enum ImportModeArg {
    /// Reject the whole file when any row is invalid
    AllOrNothing,
    /// Import the valid rows and report the rest
    BestEffort,
}

impl From<ImportModeArg> for ImportMode {
    fn from(arg: ImportModeArg) -> Self {
        match arg {
            ImportModeArg::AllOrNothing => ImportMode::AllOrNothing,
            ImportModeArg::BestEffort => ImportMode::BestEffort,
        }
    }
}

#[derive(Parser)]
/// Library PC manager - register students and PCs, assign PCs and review usage history
///
/// Timestamps are local time, `YYYY-MM-DD HH:MM:SS`. Dates use `YYYY-MM-DD`.
#[command(author, version, about)] // Read from Cargo.toml
pub(crate) struct Opts {
    #[command(subcommand)]
    pub cmd: Command,

    /// Database file (defaults to LIBRARY_PC_DB_PATH or the user data directory)
    #[arg(global = true, long)]
    pub db: Option<String>,

    /// Notice language: zh-CN or en (defaults to LIBRARY_PC_LOCALE)
    #[arg(global = true, long)]
    pub locale: Option<String>,

    /// Print results and errors as JSON
    #[arg(global = true, long)]
    pub json: bool,

    #[arg(global = true, short, long)]
    pub verbosity: Option<LogLevel>,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Student registry
    Student(Student),
    /// PC inventory
    Pc(Pc),
    /// Assign a vacant PC to a student
    Assign(Assign),
    /// Close the student's open session and free the PC
    Unassign(Unassign),
    /// List PCs currently assigned, earliest first
    Active,
    /// Query usage history, optionally exporting the rows shown
    History(History),
    /// Persistent settings
    Config(Config),
}

#[derive(Args)]
pub(crate) struct Student {
    #[command(subcommand)]
    pub cmd: StudentCommand,
}

#[derive(Subcommand)]
pub(crate) enum StudentCommand {
    /// Register a student
    Add(AddStudent),
    /// List every student in registration order
    List,
    /// Show one student
    Get { student_id: String },
    /// Register students from a .xlsx/.xls/.csv file (student_id, name, course, contact)
    Import(ImportStudents),
    /// Show the rows of a spreadsheet without importing
    Preview { path: PathBuf },
}

#[derive(Args)]
pub(crate) struct AddStudent {
    #[arg(short, long)]
    pub id: String,
    #[arg(short, long)]
    pub name: String,
    #[arg(short, long)]
    pub course: String,
    #[arg(short = 't', long)]
    pub contact: String,
}

#[derive(Args)]
pub(crate) struct ImportStudents {
    pub path: PathBuf,
    /// Defaults to the `import.default_mode` setting
    #[arg(short, long)]
    pub mode: Option<ImportModeArg>,
}

#[derive(Args)]
pub(crate) struct Pc {
    #[command(subcommand)]
    pub cmd: PcCommand,
}

#[derive(Subcommand)]
pub(crate) enum PcCommand {
    /// Add a vacant PC
    Add { pc_id: String },
    /// Remove a vacant PC
    Remove { pc_id: String },
    /// List PCs with their status
    List {
        /// Only vacant PCs
        #[arg(long)]
        vacant: bool,
    },
    /// Show one PC
    Get { pc_id: String },
}

#[derive(Args)]
pub(crate) struct Assign {
    pub student_id: String,
    pub pc_id: String,
}

#[derive(Args)]
pub(crate) struct Unassign {
    pub student_id: String,
}

#[derive(Args)]
pub(crate) struct History {
    /// Entry date, YYYY-MM-DD
    #[arg(short, long)]
    pub date: Option<String>,
    #[arg(short, long)]
    pub student: Option<String>,
    #[arg(short, long)]
    pub pc: Option<String>,
    /// Write the rows to this file (.xlsx unless it ends in .csv; .xlsx is appended when missing)
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct Config {
    #[command(subcommand)]
    pub cmd: ConfigCommand,
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommand {
    /// List stored settings
    List,
    /// Store a setting
    Set { key: String, value: String },
    /// Replace the course list offered at registration
    Courses {
        #[arg(required = true, num_args(1..))]
        courses: Vec<String>,
    },
}
