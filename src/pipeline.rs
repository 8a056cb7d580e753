//! The end-to-end pipeline: detect, aggregate, plan.

use std::path::Path;

use serde::Serialize;

use crate::config::Config;
use crate::detect::{DetectorSet, Registry};
use crate::error::FaceCropError;
use crate::geometry::{PixelRect, Size, TargetGeometry};
use crate::planner::{
    crop_plan, plan_geometry, transformation_to, validate_max_scale_out, CropPlan, PlanGeometry,
    PlanningContext, Resize,
};
use crate::region::{aggregate, Aggregate, DetectedRegion};

/// Reads the pixel dimensions of an image without decoding it.
pub fn read_source_size(path: &Path) -> Result<Size, FaceCropError> {
    let size = imagesize::size(path).map_err(|source| FaceCropError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let width: u32 = size.width.try_into().map_err(|_| {
        FaceCropError::InvalidGeometry(format!(
            "{}: image width {} does not fit in u32",
            path.display(),
            size.width
        ))
    })?;
    let height: u32 = size.height.try_into().map_err(|_| {
        FaceCropError::InvalidGeometry(format!(
            "{}: image height {} does not fit in u32",
            path.display(),
            size.height
        ))
    })?;

    if width == 0 || height == 0 {
        return Err(FaceCropError::InvalidGeometry(format!(
            "{}: image has zero size ({width}x{height})",
            path.display()
        )));
    }

    Ok(Size::from((width, height)))
}

/// What the pipeline decided for one image.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Regions were found and a crop was planned around them.
    Planned {
        source: Size,
        regions: Vec<DetectedRegion>,
        aggregate: Aggregate,
        geometry: PlanGeometry,
        plan: CropPlan,
    },
    /// No usable region; the default transformation applies to the whole
    /// image.
    Default {
        source: Size,
        regions: Vec<DetectedRegion>,
        #[serde(skip_serializing_if = "Option::is_none")]
        resize: Option<Resize>,
    },
}

impl Outcome {
    pub fn source(&self) -> Size {
        match self {
            Outcome::Planned { source, .. } | Outcome::Default { source, .. } => *source,
        }
    }

    /// Every region the detectors reported, including unusable ones.
    pub fn regions(&self) -> &[DetectedRegion] {
        match self {
            Outcome::Planned { regions, .. } | Outcome::Default { regions, .. } => regions,
        }
    }

    /// The primary crop in whole pixels, if any.
    pub fn crop(&self) -> Option<PixelRect> {
        match self {
            Outcome::Planned { plan, .. } => Some(plan.crop_pixels()),
            Outcome::Default { .. } => None,
        }
    }

    pub fn resize(&self) -> Option<&Resize> {
        match self {
            Outcome::Planned { plan, .. } => plan.resize.as_ref(),
            Outcome::Default { resize, .. } => resize.as_ref(),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Outcome::Default { .. })
    }
}

/// Plans the crop for already-detected regions.
///
/// Never fails: with no usable region the outcome is
/// [`Outcome::Default`].
pub fn plan_regions(
    regions: Vec<DetectedRegion>,
    source: Size,
    target: &TargetGeometry,
    max_scale_out: f64,
) -> Outcome {
    let Some(aggregate) = aggregate(&regions, source) else {
        tracing::info!("no regions found, using default transformation");
        return default_outcome(regions, source, target);
    };

    let ctx = PlanningContext::new(source, &aggregate, target.aspect(), max_scale_out);
    let geometry = plan_geometry(&ctx);
    let plan = crop_plan(&geometry, target);

    Outcome::Planned {
        source,
        regions,
        aggregate,
        geometry,
        plan,
    }
}

fn default_outcome(regions: Vec<DetectedRegion>, source: Size, target: &TargetGeometry) -> Outcome {
    let resize = if source == target.size() {
        None
    } else {
        Some(transformation_to(source, target))
    };
    Outcome::Default {
        source,
        regions,
        resize,
    }
}

/// A configured pipeline.
pub struct FaceCrop {
    detectors: DetectorSet,
    max_scale_out: f64,
    debug: bool,
}

impl FaceCrop {
    /// Builds the pipeline from a configuration.
    ///
    /// The configuration is validated and every detector is constructed
    /// here, so a bad setup fails before any image is read.
    pub fn new(config: &Config, registry: &Registry) -> Result<Self, FaceCropError> {
        config.validate()?;
        let detectors = DetectorSet::from_specs(registry, &config.detectors)?;
        Ok(Self {
            detectors,
            max_scale_out: config.max_scale_out,
            debug: config.debug,
        })
    }

    /// Builds the pipeline around detectors constructed elsewhere.
    pub fn with_detectors(detectors: DetectorSet, max_scale_out: f64) -> Result<Self, FaceCropError> {
        Ok(Self {
            detectors,
            max_scale_out: validate_max_scale_out(max_scale_out)?,
            debug: false,
        })
    }

    pub fn max_scale_out(&self) -> f64 {
        self.max_scale_out
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Reads the image size, runs the detectors and plans the crop.
    pub fn process(&self, image: &Path, target: &TargetGeometry) -> Result<Outcome, FaceCropError> {
        let source = read_source_size(image)?;
        Ok(self.process_with_size(image, source, target))
    }

    /// Like [`FaceCrop::process`] for a source size that is already known.
    pub fn process_with_size(&self, image: &Path, source: Size, target: &TargetGeometry) -> Outcome {
        let regions = self.detectors.detect(image);
        tracing::debug!(
            image = %image.display(),
            detectors = self.detectors.len(),
            regions = regions.len(),
            "detection finished"
        );
        plan_regions(regions, source, target, self.max_scale_out)
    }
}
