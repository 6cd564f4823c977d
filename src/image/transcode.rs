//! The seam between conversion logic and the program doing pixel work.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::debug;
use crate::utils::exec::{Cmd, FilterRule};

/// Writes `output` from `input` using tool-specific `args`.
///
/// Implementations report failure through the `Result`; callers still verify
/// that `output` exists and is non-empty.
pub trait Transcoder {
    fn transcode(&self, input: &Path, args: &[String], output: &Path) -> Result<()>;
}

/// ImageMagick 7 prints this on every call through the legacy `convert` name.
const MAGICK_FILTER: FilterRule = FilterRule::new(&["WARNING: The convert command is deprecated"]);

/// Runs `<program> <input> <args...> <output>`.
#[derive(Debug, Clone)]
pub struct MagickTranscoder {
    program: PathBuf,
}

impl MagickTranscoder {
    /// Look `program` up on `PATH`.
    pub fn locate(program: &str) -> Result<Self> {
        let program = which::which(program).with_context(|| {
            format!("`{program}` not found, install ImageMagick or set converter.program")
        })?;
        Ok(Self { program })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Transcoder for MagickTranscoder {
    fn transcode(&self, input: &Path, args: &[String], output: &Path) -> Result<()> {
        let cmd = Cmd::new(&self.program)
            .arg(input)
            .args(args)
            .arg(output)
            .filter(&MAGICK_FILTER);
        debug!("convert"; "{}", cmd.display());
        cmd.run()?;
        Ok(())
    }
}

#[cfg(test)]
pub mod fake {
    //! In-process transcoder for tests.

    use super::*;
    use parking_lot::Mutex;
    use std::fs;

    /// One recorded `transcode` call.
    #[derive(Debug, Clone)]
    pub struct Call {
        pub input: PathBuf,
        pub args: Vec<String>,
        pub output: PathBuf,
    }

    /// What the fake writes for each call.
    #[derive(Debug, Clone, Copy)]
    pub enum Behavior {
        /// Copy the first `n` bytes of the input.
        Truncate(usize),
        /// Copy the input unchanged.
        Copy,
        /// Write nothing and succeed.
        NoOutput,
        /// Write an empty file and succeed.
        Empty,
        /// Leave a partial file behind and fail.
        Fail,
    }

    pub struct FakeTranscoder {
        behavior: Behavior,
        /// Argument that switches a call to `Fail` when present.
        fail_on: Option<String>,
        pub calls: Mutex<Vec<Call>>,
    }

    impl FakeTranscoder {
        pub fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                fail_on: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing_on(mut self, arg: &str) -> Self {
            self.fail_on = Some(arg.to_string());
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    impl Transcoder for FakeTranscoder {
        fn transcode(&self, input: &Path, args: &[String], output: &Path) -> Result<()> {
            self.calls.lock().push(Call {
                input: input.to_path_buf(),
                args: args.to_vec(),
                output: output.to_path_buf(),
            });

            let behavior = match &self.fail_on {
                Some(arg) if args.contains(arg) => Behavior::Fail,
                _ => self.behavior,
            };

            let data = fs::read(input)?;
            match behavior {
                Behavior::Truncate(n) => fs::write(output, &data[..n.min(data.len())])?,
                Behavior::Copy => fs::write(output, &data)?,
                Behavior::NoOutput => {}
                Behavior::Empty => fs::write(output, b"")?,
                Behavior::Fail => {
                    fs::write(output, b"partial")?;
                    anyhow::bail!("fake transcoder failed");
                }
            }
            Ok(())
        }
    }
}
