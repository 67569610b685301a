//! Neighborhood offset search order.
use crate::coord::Coord;
use crate::error::ResynthError;

/// Builds the full list of `(dx, dy)` offsets usable between a corpus and an
/// output canvas of the given dimensions, sorted by ascending squared
/// distance from the origin.
///
/// The first element is always `(0, 0)`. Offsets are bounded by the smaller
/// of the two images along each axis so a neighborhood never straddles more
/// than one copy of the corpus.
pub fn sorted_offsets(
    corpus_dims: (u32, u32),
    data_dims: (u32, u32),
) -> Result<Vec<Coord>, ResynthError> {
    let width = corpus_dims.0.min(data_dims.0) as i32;
    let height = corpus_dims.1.min(data_dims.1) as i32;

    let mut offsets = Vec::new();
    if width == 0 || height == 0 {
        return Ok(offsets);
    }

    let count = (2 * width as usize - 1) * (2 * height as usize - 1);
    offsets.try_reserve_exact(count)?;
    for y in -(height - 1)..height {
        for x in -(width - 1)..width {
            offsets.push(Coord::new(x, y));
        }
    }

    // `sort_by_key` is a stable sort, so ties at equal squared distance keep
    // the row-major enumeration order above: deterministic, if arbitrary.
    offsets.sort_by_key(Coord::sq_mag);

    Ok(offsets)
}
