//! Cached conversion of one file into the generated tree.
//!
//! A destination that already exists is never rebuilt, which makes a second
//! run over an unchanged tree free. Output is written to a `.partial` sibling
//! and renamed into place only after the converter succeeded and produced a
//! non-empty file, so an existing destination is always a finished one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{Transcoder, Variant};
use crate::debug;
use crate::utils::path::{Mirror, Target};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("source `{0}` does not exist")]
    MissingSource(PathBuf),

    #[error("cannot create directory `{0}`")]
    CreateDir(PathBuf, #[source] io::Error),

    #[error("converting `{input}` to `{output}` failed: {message}")]
    Transcode {
        input: PathBuf,
        output: PathBuf,
        message: String,
    },

    #[error("converter produced no file for `{0}`")]
    MissingOutput(PathBuf),

    #[error("converter produced an empty file for `{0}`")]
    EmptyOutput(PathBuf),

    #[error("cannot write `{0}`")]
    Io(PathBuf, #[source] io::Error),
}

/// Result of a successful [`Converter`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// The converter ran and wrote this file.
    Converted(PathBuf),
    /// The file already existed; nothing ran.
    Skipped(PathBuf),
}

impl Conversion {
    pub fn path(&self) -> &Path {
        match self {
            Self::Converted(path) | Self::Skipped(path) => path,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, Self::Converted(_))
    }
}

/// Turns sources into derived files under the mirrored tree.
///
/// Mirroring applies to the relative part of a [`Target`] only; outputs are
/// joined back onto its base.
pub struct Converter<'a> {
    transcoder: &'a dyn Transcoder,
    mirror: Mirror,
}

impl<'a> Converter<'a> {
    pub fn new(transcoder: &'a dyn Transcoder, mirror: Mirror) -> Self {
        Self { transcoder, mirror }
    }

    /// Where `variant` of `source` is written.
    pub fn destination(&self, source: &Target, variant: &Variant) -> PathBuf {
        source
            .base()
            .join(self.mirror.derived(source.rel(), &variant.suffix))
    }

    /// Where the copy of `source` is written; equal to the source itself
    /// outside the mirrored tree.
    pub fn copy_destination(&self, source: &Target) -> PathBuf {
        source.base().join(self.mirror.map(source.rel()))
    }

    /// Produce `variant` of `source` unless it already exists.
    pub fn convert(&self, source: &Target, variant: &Variant) -> Result<Conversion, ConvertError> {
        let input = source.path();
        let output = self.destination(source, variant);
        ensure_parent(&output)?;

        if output.exists() {
            debug!("skip"; "destination exists, skipping {}", output.display());
            return Ok(Conversion::Skipped(output));
        }
        if !input.is_file() {
            return Err(ConvertError::MissingSource(input));
        }

        let partial = partial_path(&output);
        remove_if_exists(&partial);

        if let Err(err) = self.run_checked(&input, &variant.args, &partial, &output) {
            remove_if_exists(&partial);
            return Err(err);
        }

        move_file(&partial, &output).map_err(|err| ConvertError::Io(output.clone(), err))?;
        Ok(Conversion::Converted(output))
    }

    /// Copy `source` to its mirrored path unless something is already there.
    ///
    /// A source outside the mirrored tree maps onto itself and is skipped.
    pub fn copy_original(&self, source: &Target) -> Result<Conversion, ConvertError> {
        let input = source.path();
        let output = self.copy_destination(source);
        if output.exists() {
            return Ok(Conversion::Skipped(output));
        }
        if !input.is_file() {
            return Err(ConvertError::MissingSource(input));
        }
        ensure_parent(&output)?;

        let partial = partial_path(&output);
        fs::copy(&input, &partial)
            .and_then(|_| move_file(&partial, &output))
            .map_err(|err| {
                remove_if_exists(&partial);
                ConvertError::Io(output.clone(), err)
            })?;
        Ok(Conversion::Converted(output))
    }

    fn run_checked(
        &self,
        input: &Path,
        args: &[String],
        partial: &Path,
        output: &Path,
    ) -> Result<(), ConvertError> {
        self.transcoder
            .transcode(input, args, partial)
            .map_err(|err| ConvertError::Transcode {
                input: input.to_path_buf(),
                output: output.to_path_buf(),
                message: format!("{err:#}"),
            })?;

        match fs::metadata(partial) {
            Ok(meta) if meta.len() == 0 => Err(ConvertError::EmptyOutput(output.to_path_buf())),
            Ok(_) => Ok(()),
            Err(_) => Err(ConvertError::MissingOutput(output.to_path_buf())),
        }
    }
}

/// Temporary sibling that keeps the real extension, since the converter
/// picks the output format from it: `photo-768.webp` → `photo-768.partial.webp`.
fn partial_path(output: &Path) -> PathBuf {
    let stem = output.file_stem().unwrap_or_default().to_string_lossy();
    match output.extension() {
        Some(ext) => output.with_file_name(format!("{stem}.partial.{}", ext.to_string_lossy())),
        None => output.with_file_name(format!("{stem}.partial")),
    }
}

fn ensure_parent(path: &Path) -> Result<(), ConvertError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|err| ConvertError::CreateDir(dir.to_path_buf(), err))
        }
        _ => Ok(()),
    }
}

pub(crate) fn remove_if_exists(path: &Path) {
    if let Err(err) = fs::remove_file(path)
        && err.kind() != io::ErrorKind::NotFound
    {
        debug!("convert"; "cannot remove {}: {}", path.display(), err);
    }
}

/// Rename `from` onto `to`, falling back to copy + remove across filesystems.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::transcode::fake::{Behavior, FakeTranscoder};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Target) {
        let dir = TempDir::new().unwrap();
        let source = Target::new(dir.path(), "assets/fullsize/x/photo.png");
        fs::create_dir_all(source.path().parent().unwrap()).unwrap();
        fs::write(source.path(), [7u8; 100]).unwrap();
        (dir, source)
    }

    fn webp_768() -> Variant {
        Variant {
            args: vec!["-resize".into(), "768x>".into()],
            suffix: "-768.webp".into(),
        }
    }

    fn mirror() -> Mirror {
        Mirror::new("fullsize", "generated")
    }

    #[test]
    fn test_convert_writes_mirrored_destination() {
        let (dir, source) = setup();
        let fake = FakeTranscoder::new(Behavior::Truncate(10));
        let converter = Converter::new(&fake, mirror());

        let result = converter.convert(&source, &webp_768()).unwrap();
        let expected = dir.path().join("assets/generated/x/photo-768.webp");

        assert_eq!(result, Conversion::Converted(expected.clone()));
        assert_eq!(fs::read(&expected).unwrap().len(), 10);
        assert!(!dir.path().join("assets/generated/x/photo-768.partial.webp").exists());

        let calls = fake.calls.lock();
        assert_eq!(calls[0].input, source.path());
        assert_eq!(calls[0].args, vec!["-resize", "768x>"]);
        assert_eq!(calls[0].output.file_name().unwrap(), "photo-768.partial.webp");
    }

    #[test]
    fn test_convert_skips_existing_destination() {
        let (dir, source) = setup();
        let existing = dir.path().join("assets/generated/x/photo-768.webp");
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, b"cached").unwrap();

        let fake = FakeTranscoder::new(Behavior::Copy);
        let converter = Converter::new(&fake, mirror());

        let result = converter.convert(&source, &webp_768()).unwrap();
        assert_eq!(result, Conversion::Skipped(existing.clone()));
        assert!(!result.is_converted());
        assert_eq!(fake.call_count(), 0);
        assert_eq!(fs::read(&existing).unwrap(), b"cached");
    }

    #[test]
    fn test_failed_transcode_leaves_nothing() {
        let (dir, source) = setup();
        let fake = FakeTranscoder::new(Behavior::Fail);
        let converter = Converter::new(&fake, mirror());

        let err = converter.convert(&source, &webp_768()).unwrap_err();
        assert!(matches!(err, ConvertError::Transcode { .. }));

        let generated = dir.path().join("assets/generated/x");
        assert_eq!(fs::read_dir(generated).unwrap().count(), 0);
    }

    #[test]
    fn test_empty_and_missing_output_are_errors() {
        let (_dir, source) = setup();

        let empty = FakeTranscoder::new(Behavior::Empty);
        let err = Converter::new(&empty, mirror())
            .convert(&source, &webp_768())
            .unwrap_err();
        assert!(matches!(err, ConvertError::EmptyOutput(_)));

        let none = FakeTranscoder::new(Behavior::NoOutput);
        let err = Converter::new(&none, mirror())
            .convert(&source, &webp_768())
            .unwrap_err();
        assert!(matches!(err, ConvertError::MissingOutput(_)));
    }

    #[test]
    fn test_missing_source() {
        let dir = TempDir::new().unwrap();
        let fake = FakeTranscoder::new(Behavior::Copy);
        let converter = Converter::new(&fake, mirror());

        let err = converter
            .convert(&Target::new(dir.path(), "assets/fullsize/gone.png"), &webp_768())
            .unwrap_err();
        assert!(matches!(err, ConvertError::MissingSource(_)));
        assert_eq!(fake.call_count(), 0);
    }

    #[test]
    fn test_copy_original() {
        let (dir, source) = setup();
        let fake = FakeTranscoder::new(Behavior::Copy);
        let converter = Converter::new(&fake, mirror());

        let copied = converter.copy_original(&source).unwrap();
        let expected = dir.path().join("assets/generated/x/photo.png");
        assert_eq!(copied, Conversion::Converted(expected.clone()));
        assert_eq!(fs::read(&expected).unwrap(), fs::read(source.path()).unwrap());

        let again = converter.copy_original(&source).unwrap();
        assert_eq!(again, Conversion::Skipped(expected));
    }

    #[test]
    fn test_copy_original_outside_tree_is_noop() {
        let dir = TempDir::new().unwrap();
        let source = Target::new(dir.path(), "photo.png");
        fs::write(source.path(), b"x").unwrap();

        let fake = FakeTranscoder::new(Behavior::Copy);
        let result = Converter::new(&fake, mirror()).copy_original(&source).unwrap();
        assert_eq!(result, Conversion::Skipped(source.path()));
    }

    #[test]
    fn test_mirror_ignores_directories_above_base() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("fullsize/site");
        let source = Target::new(&base, "assets/fullsize/x/photo.png");
        fs::create_dir_all(source.path().parent().unwrap()).unwrap();
        fs::write(source.path(), [7u8; 100]).unwrap();

        let fake = FakeTranscoder::new(Behavior::Truncate(10));
        let converter = Converter::new(&fake, mirror());
        let result = converter.convert(&source, &webp_768()).unwrap();

        assert_eq!(
            result.path(),
            base.join("assets/generated/x/photo-768.webp")
        );
        assert!(!dir.path().join("generated").exists());
        assert_eq!(
            converter.copy_destination(&source),
            base.join("assets/generated/x/photo.png")
        );
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("a/photo-768@2x.webp")),
            PathBuf::from("a/photo-768@2x.partial.webp")
        );
        assert_eq!(partial_path(Path::new("a/raw")), PathBuf::from("a/raw.partial"));
    }

    #[test]
    fn test_move_file() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a");
        let to = dir.path().join("b");
        fs::write(&from, b"data").unwrap();
        move_file(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"data");
    }
}
