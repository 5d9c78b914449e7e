//! Longitude normalization to the (-180, 180] convention.

use ndarray::Axis;
use tracing::debug;

use lwt_common::{CoordAxis, LwtError, PressureField, Result};

/// Rewrite a 0..360 longitude axis into (-180, 180], reordering the field.
///
/// When the last longitude exceeds 180, every value above 180 is shifted by
/// -360 and the field is reordered along the longitude dimension so the axis
/// ascends again. Otherwise the field is returned unchanged. The axis keeps
/// its name. Normalizing an already normalized field is a no-op.
pub fn normalize_longitudes(field: &PressureField, lon_name: &str) -> Result<PressureField> {
    let lon = field.longitude();
    if lon.name() != lon_name {
        return Err(LwtError::axis_not_found(lon_name, lon.name()));
    }

    let Some((axis, order)) = normalize_longitude_axis(lon)? else {
        return Ok(field.clone());
    };

    debug!(
        axis = lon_name,
        from = lon.first(),
        to = lon.last(),
        new_first = axis.first(),
        new_last = axis.last(),
        "Normalized longitude axis"
    );

    let data = field.data().select(Axis(3), &order);
    let coords = field.coords().with_axes(field.latitude().clone(), axis);
    PressureField::new(data, coords)
}

/// Shift a longitude axis whose last value exceeds 180 into (-180, 180].
///
/// Returns the ascending shifted axis together with, for each of its
/// positions, the index of the source value. `None` when the axis needs no
/// shift.
pub fn normalize_longitude_axis(lon: &CoordAxis) -> Result<Option<(CoordAxis, Vec<usize>)>> {
    if lon.last() <= 180.0 {
        return Ok(None);
    }

    let adjusted: Vec<f64> = lon
        .values()
        .iter()
        .map(|&v| if v > 180.0 { v - 360.0 } else { v })
        .collect();

    let mut order: Vec<usize> = (0..adjusted.len()).collect();
    order.sort_by(|&a, &b| adjusted[a].total_cmp(&adjusted[b]));

    let values = order.iter().map(|&i| adjusted[i]).collect();
    let axis = CoordAxis::new(lon.name(), values)?;
    Ok(Some((axis, order)))
}
