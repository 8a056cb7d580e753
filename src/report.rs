//! Human-readable and JSON reports of a pipeline outcome.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::geometry::{Rect, TargetGeometry};
use crate::pipeline::Outcome;
use crate::planner::Resize;

/// The outcome for one image, with the request that produced it.
#[derive(Clone, Debug, Serialize)]
pub struct PlanReport {
    pub image: PathBuf,
    pub target: TargetGeometry,
    pub outcome: Outcome,
}

impl PlanReport {
    pub fn new(image: impl Into<PathBuf>, target: TargetGeometry, outcome: Outcome) -> Self {
        Self {
            image: image.into(),
            target,
            outcome,
        }
    }
}

struct Corners<'a>(&'a Rect);

impl fmt::Display for Corners<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rect = self.0;
        write!(
            f,
            "{:.2},{:.2} {:.2},{:.2} ({:.2}x{:.2})",
            rect.xmin(),
            rect.ymin(),
            rect.xmax(),
            rect.ymax(),
            rect.width(),
            rect.height()
        )
    }
}

fn write_resize(f: &mut fmt::Formatter<'_>, resize: Option<&Resize>) -> fmt::Result {
    match resize {
        Some(resize) => {
            writeln!(f, "  resize: {}", resize.scale)?;
            if let Some(crop) = &resize.crop {
                writeln!(f, "  crop after resize: {crop}")?;
            }
            Ok(())
        }
        None => writeln!(f, "  resize: none"),
    }
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self.outcome.source();
        writeln!(
            f,
            "{}: {}x{} -> {}",
            self.image.display(),
            source.width,
            source.height,
            self.target
        )?;

        let regions = self.outcome.regions();
        writeln!(f, "  regions: {}", regions.len())?;
        for region in regions {
            write!(f, "    {}", Corners(&region.rect))?;
            if let Some(label) = &region.label {
                write!(f, " {label}")?;
            }
            if let Some(color) = &region.color {
                write!(f, " [{color}]")?;
            }
            writeln!(f)?;
        }

        match &self.outcome {
            Outcome::Planned {
                aggregate,
                geometry,
                plan,
                ..
            } => {
                let budget = &aggregate.budget;
                writeln!(f, "  bounding box: {}", Corners(&aggregate.bounding_box))?;
                writeln!(
                    f,
                    "  budgets: top {:.2}, bottom {:.2}, left {:.2}, right {:.2}",
                    budget.top, budget.bottom, budget.left, budget.right
                )?;
                writeln!(f, "  padded: {}", Corners(&geometry.padded))?;
                writeln!(f, "  scale-out: {:.2}", geometry.scale_out())?;
                writeln!(f, "  crop: {}", plan.crop_pixels())?;
                write_resize(f, plan.resize.as_ref())
            }
            Outcome::Default { resize, .. } => {
                writeln!(f, "  no usable regions; default transformation")?;
                write_resize(f, resize.as_ref())
            }
        }
    }
}
