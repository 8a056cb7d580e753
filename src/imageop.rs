//! Applying a plan to image files.
//!
//! [`ImageMagick`] shells out to `convert`. The argument lists are built by
//! pure functions ([`convert_args`], [`draw_args`]) so they can be printed
//! for a dry run or tested without ImageMagick installed.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::FaceCropError;
use crate::geometry::PixelRect;
use crate::planner::Resize;
use crate::region::DetectedRegion;

/// Stroke color for regions that carry none.
pub const DEFAULT_REGION_COLOR: &str = "red";

/// Something that can crop/resize an image and draw region overlays.
pub trait ImageOperation {
    /// Writes `source` to `dest` after the optional crop and resize.
    fn apply(
        &self,
        source: &Path,
        crop: Option<&PixelRect>,
        resize: Option<&Resize>,
        dest: &Path,
    ) -> Result<PathBuf, FaceCropError>;

    /// Writes a copy of `source` with every region outlined.
    fn draw_regions(
        &self,
        source: &Path,
        regions: &[DetectedRegion],
        dest: &Path,
    ) -> Result<PathBuf, FaceCropError>;
}

/// Arguments for `convert <src> [-crop ...] [-resize ...] [-crop ...] <dest>`.
pub fn convert_args(
    source: &Path,
    crop: Option<&PixelRect>,
    resize: Option<&Resize>,
    dest: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![source.into()];

    if let Some(crop) = crop {
        push_crop(&mut args, crop);
    }
    if let Some(resize) = resize {
        args.push("-resize".into());
        args.push(resize.scale.to_string().into());
        if let Some(crop) = &resize.crop {
            push_crop(&mut args, crop);
        }
    }

    args.push(dest.into());
    args
}

fn push_crop(args: &mut Vec<OsString>, crop: &PixelRect) {
    args.push("-crop".into());
    args.push(crop.to_string().into());
    args.push("+repage".into());
}

/// Arguments for the region overlay: one stroked rectangle per region.
pub fn draw_args(source: &Path, regions: &[DetectedRegion], dest: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![source.into(), "-fill".into(), "none".into()];

    for region in regions.iter().filter(|region| region.rect.is_finite()) {
        let color = region.color.as_deref().unwrap_or(DEFAULT_REGION_COLOR);
        let rect = &region.rect;
        args.push("-stroke".into());
        args.push(color.into());
        args.push("-draw".into());
        args.push(
            format!(
                "rectangle {},{} {},{}",
                rect.xmin().trunc(),
                rect.ymin().trunc(),
                rect.xmax().trunc(),
                rect.ymax().trunc()
            )
            .into(),
        );
    }

    args.push(dest.into());
    args
}

/// Renders a command line for display, quoting arguments with spaces.
pub fn render_command(program: &OsStr, args: &[OsString]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(OsString::as_os_str))
        .map(|arg| {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("\"{arg}\"")
            } else {
                arg.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// ImageMagick's `convert` (or a compatible program).
#[derive(Debug, Clone)]
pub struct ImageMagick {
    program: OsString,
}

impl Default for ImageMagick {
    fn default() -> Self {
        Self::new("convert")
    }
}

impl ImageMagick {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    fn run(&self, args: &[OsString], dest: &Path) -> Result<PathBuf, FaceCropError> {
        tracing::debug!(command = %render_command(&self.program, args), "running image operation");

        let output = Command::new(&self.program).args(args).output()?;
        if !output.status.success() {
            return Err(FaceCropError::ImageOperationFailed {
                program: self.program.to_string_lossy().into_owned(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(dest.to_path_buf())
    }
}

impl ImageOperation for ImageMagick {
    fn apply(
        &self,
        source: &Path,
        crop: Option<&PixelRect>,
        resize: Option<&Resize>,
        dest: &Path,
    ) -> Result<PathBuf, FaceCropError> {
        self.run(&convert_args(source, crop, resize, dest), dest)
    }

    fn draw_regions(
        &self,
        source: &Path,
        regions: &[DetectedRegion],
        dest: &Path,
    ) -> Result<PathBuf, FaceCropError> {
        self.run(&draw_args(source, regions, dest), dest)
    }
}

/// `<dir>/<stem>.debug.<ext>` next to `dest`.
pub fn debug_path(dest: &Path) -> PathBuf {
    let stem = dest.file_stem().unwrap_or_default();
    let mut name = OsString::from(stem);
    name.push(".debug");
    if let Some(ext) = dest.extension() {
        name.push(".");
        name.push(ext);
    }
    dest.with_file_name(name)
}
