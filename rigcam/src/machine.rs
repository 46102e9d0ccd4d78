//! Positioning seam between the camera tool and the rig's motion
//! controller.

use crate::labware::Well;
use crate::{CameraError, RigcamResult};

/// Motion-control interface the camera drives before each capture.
///
/// The rig implements this; the camera never commands motion directly.
/// Implementations should surface controller failures as
/// [`CameraError::Machine`].
pub trait MotionControl {
    /// Raise the tool to a safe travel height before any XY move.
    fn safe_z_movement(&mut self) -> RigcamResult<()>;

    /// Move the carriage to deck coordinates. With `wait` set, the call
    /// blocks until the controller reports the move complete.
    fn move_to(&mut self, x: f64, y: f64, wait: bool) -> RigcamResult<()>;
}

impl<M: MotionControl + ?Sized> MotionControl for &mut M {
    fn safe_z_movement(&mut self) -> RigcamResult<()> {
        (**self).safe_z_movement()
    }

    fn move_to(&mut self, x: f64, y: f64, wait: bool) -> RigcamResult<()> {
        (**self).move_to(x, y, wait)
    }
}

/// Resolve a capture target to deck coordinates.
///
/// Exactly one of `well` or `location` must be supplied; the chosen
/// source's coordinates are returned unchanged.
///
/// # Errors
/// Returns [`CameraError::InvalidTarget`] if both or neither source is
/// given.
pub fn resolve_target(
    well: Option<&Well>,
    location: Option<(f64, f64, f64)>,
) -> RigcamResult<(f64, f64, f64)> {
    match (well, location) {
        (Some(_), Some(_)) => Err(CameraError::InvalidTarget(
            "Specify only one of well or x,y,z location".to_owned(),
        )),
        (Some(well), None) => Ok((well.x, well.y, well.z)),
        (None, Some(location)) => Ok(location),
        (None, None) => Err(CameraError::InvalidTarget(
            "Specify a well or an x,y,z location".to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_target_well() {
        let well = Well::new("A1", 12.5, 48.0, 3.2);
        let result = resolve_target(Some(&well), None);
        assert_eq!(result.unwrap(), (12.5, 48.0, 3.2));
    }

    #[test]
    fn test_resolve_target_location() {
        let result = resolve_target(None, Some((100.0, 200.0, 10.0)));
        assert_eq!(result.unwrap(), (100.0, 200.0, 10.0));
    }

    #[test]
    fn test_resolve_target_both() {
        let well = Well::new("A1", 12.5, 48.0, 3.2);
        let result = resolve_target(Some(&well), Some((100.0, 200.0, 10.0)));
        assert!(matches!(result, Err(CameraError::InvalidTarget(_))));
    }

    #[test]
    fn test_resolve_target_neither() {
        let result = resolve_target(None, None);
        assert!(matches!(result, Err(CameraError::InvalidTarget(_))));
    }
}
