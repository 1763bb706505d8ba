use clap::ValueEnum;
use log::debug;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use super::Error;

/// Image formats Graphviz is asked to produce.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Portable Network Graphics
    #[default]
    Png,
    /// Scalable Vector Graphics
    Svg,
    /// Portable Document Format
    Pdf,
}

impl Format {
    /// Graphviz output type and file extension.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Svg => "svg",
            Format::Pdf => "pdf",
        }
    }
}

/// `<source>.<format>`, the file Graphviz writes for `source`.
pub fn image_path(source: &Path, format: Format) -> PathBuf {
    let mut name = OsString::from(source.as_os_str());
    name.push(".");
    name.push(format.as_str());
    PathBuf::from(name)
}

/// Renders the DOT file at `source` with the `dot` executable.
pub fn render(source: &Path, format: Format) -> Result<PathBuf, Error> {
    let dot = which::which("dot").map_err(|_| Error::GraphvizNotFound)?;
    let image = image_path(source, format);

    debug!("{} -T{} {}", dot.display(), format.as_str(), source.display());
    let output = Command::new(&dot)
        .arg(format!("-T{}", format.as_str()))
        .arg("-o")
        .arg(&image)
        .arg(source)
        .output()
        .map_err(|source| Error::Io {
            path: dot.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(Error::GraphvizFailed {
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(image)
}
