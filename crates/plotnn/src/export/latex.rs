//! Compiling documents to PDF with a LaTeX engine.

use std::{
    env,
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Deserialize;

use super::{Error, Invocation, Toolchain, ensure_parent};
use crate::render::TexDocument;

/// Name of the document inside the build directory.
const JOB_NAME: &str = "diagram";

/// A LaTeX engine able to produce PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatexEngine {
    Latexmk,
    Pdflatex,
}

impl LatexEngine {
    /// Engines in discovery order.
    pub const ALL: [LatexEngine; 2] = [Self::Latexmk, Self::Pdflatex];

    pub fn program(self) -> &'static str {
        match self {
            Self::Latexmk => "latexmk",
            Self::Pdflatex => "pdflatex",
        }
    }
}

/// Runs a LaTeX engine over a document in a scratch directory.
#[derive(Debug, Clone)]
pub struct LatexCompiler {
    toolchain: Toolchain,
    engine: Option<LatexEngine>,
}

impl LatexCompiler {
    /// Creates a compiler; `engine` pins the engine instead of discovering one.
    pub fn new(toolchain: Toolchain, engine: Option<LatexEngine>) -> Self {
        Self { toolchain, engine }
    }

    /// Finds the engine to use and its executable.
    pub fn resolve(&self) -> Result<(LatexEngine, PathBuf), Error> {
        let candidates: Vec<LatexEngine> = match self.engine {
            Some(engine) => vec![engine],
            None => LatexEngine::ALL.to_vec(),
        };

        candidates
            .iter()
            .find_map(|&engine| {
                self.toolchain
                    .find(engine.program())
                    .map(|path| (engine, path))
            })
            .ok_or_else(|| Error::ToolNotFound {
                purpose: "LaTeX compiler",
                candidates: candidates.iter().map(|e| e.program()).collect(),
            })
    }

    /// Builds the commands that turn `diagram.tex` in `workdir` into
    /// `diagram.pdf`.
    ///
    /// `pdflatex` runs twice; only the second pass has to succeed.
    pub fn plan(
        engine: LatexEngine,
        program: &Path,
        workdir: &Path,
        style_dir: Option<&Path>,
    ) -> Result<Vec<Invocation>, Error> {
        let tex_file = format!("{JOB_NAME}.tex");
        let mut base = Invocation::new(program).current_dir(workdir);
        if let Some(dir) = style_dir {
            // The trailing empty entry keeps the engine's default search path.
            let texinputs = env::join_paths([dir.as_os_str(), OsStr::new("")])
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
            base = base.env("TEXINPUTS", texinputs);
        }

        let invocations = match engine {
            LatexEngine::Latexmk => vec![
                base.args(["-pdf", "-interaction=nonstopmode", "-silent"])
                    .arg(&tex_file),
            ],
            LatexEngine::Pdflatex => {
                let pass = base
                    .args(["-interaction=nonstopmode", "-no-shell-escape"])
                    .arg(&tex_file);
                vec![pass.clone().allow_failure(), pass]
            }
        };
        Ok(invocations)
    }

    /// Compiles `document` and copies the PDF to `output`.
    pub fn compile(&self, document: &TexDocument, output: &Path) -> Result<PathBuf, Error> {
        let (engine, program) = self.resolve()?;
        debug!(
            engine = engine.program(),
            program = program.display().to_string();
            "LaTeX engine selected"
        );

        let build_dir = tempfile::tempdir()?;
        let workdir = build_dir.path();
        fs::write(workdir.join(format!("{JOB_NAME}.tex")), document.text())?;
        document.styles().materialize(workdir)?;

        let style_dir = document.styles().search_dir(workdir);
        for invocation in Self::plan(engine, &program, workdir, style_dir.as_deref())? {
            invocation.run()?;
        }

        let produced = workdir.join(format!("{JOB_NAME}.pdf"));
        if !produced.is_file() {
            return Err(Error::MissingOutput {
                tool: engine.program().to_string(),
                path: produced,
            });
        }

        ensure_parent(output)?;
        fs::copy(&produced, output)?;
        info!(path = output.display().to_string(); "PDF generated");
        Ok(output.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arguments(invocation: &Invocation) -> Vec<String> {
        invocation
            .arguments()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_latexmk_plan() {
        let plan = LatexCompiler::plan(
            LatexEngine::Latexmk,
            Path::new("/usr/bin/latexmk"),
            Path::new("/tmp/build"),
            None,
        )
        .unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(
            arguments(&plan[0]),
            ["-pdf", "-interaction=nonstopmode", "-silent", "diagram.tex"]
        );
        assert_eq!(plan[0].working_dir(), Some(Path::new("/tmp/build")));
        assert!(plan[0].environment().is_empty());
        assert!(plan[0].must_succeed());
    }

    #[test]
    fn test_pdflatex_plan_runs_twice() {
        let plan = LatexCompiler::plan(
            LatexEngine::Pdflatex,
            Path::new("pdflatex"),
            Path::new("/tmp/build"),
            Some(Path::new("/tmp/build/layers")),
        )
        .unwrap();

        assert_eq!(plan.len(), 2);
        assert!(!plan[0].must_succeed());
        assert!(plan[1].must_succeed());
        assert_eq!(
            arguments(&plan[1]),
            ["-interaction=nonstopmode", "-no-shell-escape", "diagram.tex"]
        );

        let (key, value) = &plan[1].environment()[0];
        assert_eq!(key, "TEXINPUTS");
        assert!(value.to_string_lossy().starts_with("/tmp/build/layers"));
    }

    #[test]
    fn test_missing_engine() {
        let empty = Toolchain::with_search_paths(Vec::<PathBuf>::new());

        let err = LatexCompiler::new(empty.clone(), None).resolve().unwrap_err();
        assert!(matches!(
            err,
            Error::ToolNotFound { ref candidates, .. } if candidates == &["latexmk", "pdflatex"]
        ));

        let err = LatexCompiler::new(empty, Some(LatexEngine::Pdflatex))
            .resolve()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ToolNotFound { ref candidates, .. } if candidates == &["pdflatex"]
        ));
    }
}
