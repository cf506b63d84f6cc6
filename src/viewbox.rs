use svgr::ViewBox;
use tracing::debug;

use crate::error::RenderError;

/// Requested output rectangle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub width: u32,
    pub height: u32,
}

impl Target {
    pub fn new(width: u32, height: u32) -> Self {
	Target { width, height }
    }
}

/// Multipliers from viewBox units to pixels, strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub scale: ScaleFactors,
}

/// Maps the viewBox onto `target`.
///
/// The logical size is the viewBox width and height minus its origin.
/// With `keep_aspect` both axes share the smaller of the two ratios, so the
/// output may come out narrower or shorter than the target.
pub fn resolve(view_box: Option<&ViewBox>, target: Target, keep_aspect: bool) -> Result<Resolution, RenderError> {
    let vb = *view_box.ok_or(RenderError::MissingViewBox)?;

    if target.width == 0 || target.height == 0 {
	return Err(RenderError::EmptyTarget { width: target.width, height: target.height });
    }

    let logical_width = vb.width - vb.x;
    let logical_height = vb.height - vb.y;

    if logical_width == 0.0 || logical_height == 0.0 {
	return Err(RenderError::DivideByZero(vb));
    }
    if !(logical_width > 0.0 && logical_height > 0.0) || !logical_width.is_finite() || !logical_height.is_finite() {
	return Err(RenderError::InvalidViewBox(vb));
    }

    let target_width = f64::from(target.width);
    let target_height = f64::from(target.height);

    let scale = if keep_aspect {
	let s = (target_width / logical_width).min(target_height / logical_height);
	ScaleFactors { x: s, y: s }
    } else {
	ScaleFactors {
	    x: target_width / logical_width,
	    y: target_height / logical_height,
	}
    };
    // subnormal sizes pass the checks above but overflow the ratio
    if !(scale.x.is_finite() && scale.y.is_finite() && scale.x > 0.0 && scale.y > 0.0) {
	return Err(RenderError::InvalidViewBox(vb));
    }

    let resolution = Resolution {
	width: (logical_width * scale.x).round() as u32,
	height: (logical_height * scale.y).round() as u32,
	scale,
    };
    debug!(?vb, ?target, keep_aspect, ?resolution, "resolved viewBox");

    Ok(resolution)
}
