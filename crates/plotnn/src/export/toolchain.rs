//! Discovery and invocation of external executables.

use std::{
    env,
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::Command,
};

use log::{debug, warn};

use super::Error;

/// Lines of tool output kept in a [`Error::ToolFailed`].
const OUTPUT_TAIL_LINES: usize = 20;

/// Finds executables in a list of directories, normally `PATH`.
#[derive(Debug, Clone, Default)]
pub struct Toolchain {
    search_paths: Vec<PathBuf>,
}

impl Toolchain {
    /// Creates a toolchain searching the directories of the `PATH` variable.
    pub fn from_env() -> Self {
        let search_paths = env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();
        Self { search_paths }
    }

    /// Creates a toolchain searching only the given directories.
    pub fn with_search_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the full path of `program`, if one of the search directories
    /// holds an executable with that name.
    pub fn find(&self, program: &str) -> Option<PathBuf> {
        let file_name = executable_name(program);
        self.search_paths
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| is_executable(candidate))
    }

    /// Returns the first of `candidates` that can be found, with its path.
    pub fn find_first(&self, candidates: &[&'static str]) -> Option<(&'static str, PathBuf)> {
        candidates
            .iter()
            .find_map(|&name| self.find(name).map(|path| (name, path)))
    }
}

#[cfg(windows)]
fn executable_name(program: &str) -> OsString {
    let mut name = OsString::from(program);
    if Path::new(program).extension().is_none() {
        name.push(".exe");
    }
    name
}

#[cfg(not(windows))]
fn executable_name(program: &str) -> OsString {
    OsString::from(program)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// A fully described external command.
///
/// Invocations are plain data until [`Invocation::run`] is called, so the
/// exact command line can be inspected and tested without the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    env: Vec<(OsString, OsString)>,
    must_succeed: bool,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            must_succeed: true,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Lets the command exit with a failure status without failing the run.
    pub fn allow_failure(mut self) -> Self {
        self.must_succeed = false;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn environment(&self) -> &[(OsString, OsString)] {
        &self.env
    }

    pub fn must_succeed(&self) -> bool {
        self.must_succeed
    }

    /// Short name of the program for messages.
    pub fn tool_name(&self) -> String {
        self.program
            .file_stem()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Runs the command to completion, capturing its output.
    pub fn run(&self) -> Result<(), Error> {
        let tool = self.tool_name();
        debug!(tool, args:? = self.args; "Running external tool");

        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command.envs(self.env.iter().map(|(k, v)| (k, v)));

        let output = command.output()?;
        if output.status.success() {
            return Ok(());
        }

        let captured = output_tail(&output.stdout, &output.stderr);
        if self.must_succeed {
            return Err(Error::ToolFailed {
                tool,
                status: output.status.to_string(),
                output: captured,
            });
        }

        warn!(tool, status = output.status.to_string(); "External tool failed, continuing");
        Ok(())
    }
}

/// The last lines of a tool's stdout followed by its stderr.
fn output_tail(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = stdout
        .lines()
        .chain(stderr.lines())
        .filter(|line| !line.trim().is_empty())
        .collect();
    let start = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
    lines[start..].join("\n")
}
