//! The core synthesis loop: for each output position, collect committed
//! neighbors, propose candidates by coherence and by random probe, and
//! commit the best-scoring one.
use crate::coord::Coord;
use crate::error::{overflow_panic, ResynthError};
use crate::params::Parameters;
use crate::state::{Neighbor, State, Status};
use crate::visit::build_visitation;

/// Runs the full visitation order against `state`, filling every output
/// position.
///
/// The visitation array is walked from its last index to its first: the
/// polishing tail (appended at the end, see [`crate::visit`]) therefore
/// runs first, while the canvas is empty, and the once-through shuffled
/// pass runs last, once the tail has given every position a rough initial
/// guess to propagate from.
pub fn synthesize(state: &mut State, params: &Parameters) -> Result<(), ResynthError> {
    let visit = build_visitation(
        state.data.width(),
        state.data.height(),
        params.magic(),
        &mut state.rng,
    )?;

    log::trace!(
        "synthesizing {}x{} from {}x{} corpus, {} iterations, seed-derived rng",
        state.data.width(),
        state.data.height(),
        state.corpus.width(),
        state.corpus.height(),
        visit.len()
    );

    for i in (0..visit.len()).rev() {
        let position = visit[i];
        run_iteration(state, params, position, i as i32);
    }

    log::trace!("synthesis complete");
    Ok(())
}

fn run_iteration(state: &mut State, params: &Parameters, position: Coord, iter: i32) {
    // Step 1: mark visited. `has_source` is left untouched; the zero
    // offset scanned below always lands on `position` itself, which has no
    // committed source yet, but scoring skips the zero-offset neighbor so
    // this never reads stale data.
    let idx = state.status_index(position);
    state.status[idx].has_value = true;

    collect_neighbors(state, params, position);

    let mut best_cost = i64::from(i32::MAX);
    let mut best_point = Coord::new(0, 0);

    // Step 3: coherence candidates, one per collected neighbor.
    for j in 0..state.neighbors.len() {
        if best_cost == 0 {
            break;
        }
        let neighbor = state.neighbors[j];
        if !neighbor.has_source {
            continue;
        }
        let candidate = neighbor.source - neighbor.offset;
        if !state.corpus.contains(candidate) {
            continue;
        }
        let tried_idx = state.tried_index(candidate);
        if state.tried[tried_idx] == iter {
            continue;
        }
        try_point(state, position, candidate, &mut best_cost, &mut best_point);
        state.tried[tried_idx] = iter;
    }

    // Random probes always run, regardless of how many coherence
    // candidates existed; the first iteration has no committed neighbors
    // at all, so this is the only source of candidates early on. Probes
    // deliberately bypass the `tried` grid (see module docs on reference
    // fidelity) so reproducing reference outputs means not "optimizing"
    // this away.
    let corpus_area = state.corpus.area();
    for _ in 0..params.tries() {
        if best_cost == 0 {
            break;
        }
        let r = state.rng.range(0, (corpus_area - 1) as i32) as u32;
        let candidate = Coord::new(
            (r % state.corpus.width()) as i32,
            (r / state.corpus.width()) as i32,
        );
        try_point(state, position, candidate, &mut best_cost, &mut best_point);
    }

    // Step 4: commit.
    let channels = state.corpus.channels() as usize;
    let mut pixel = [0u8; 4];
    pixel[..channels].copy_from_slice(state.corpus.at_coord(best_point));
    state.data.at_coord_mut(position)[..channels].copy_from_slice(&pixel[..channels]);

    let idx = state.status_index(position);
    state.status[idx] = Status {
        has_value: true,
        has_source: true,
        source: best_point,
    };
}

/// Walks `sorted_offsets` from `position`, collecting up to `neighbors`
/// already-committed output pixels into `state.neighbors`.
///
/// The first entry is always the zero offset, landing back on `position`
/// itself — it has just been marked `has_value` in step 1, before its own
/// source is known, so it is collected but carries no usable source or
/// pixel value (see [`run_iteration`]'s scoring loop, which skips it).
fn collect_neighbors(state: &mut State, params: &Parameters, position: Coord) {
    state.neighbors.clear();
    let cap = params.neighbors() as usize;
    if cap == 0 {
        return;
    }

    for &offset in &state.sorted_offsets {
        let Some(point) = wrap_or_clip(
            position + offset,
            state.data.width(),
            state.data.height(),
            params.h_tile(),
            params.v_tile(),
        ) else {
            continue;
        };

        let idx = state.status_index(point);
        let status = state.status[idx];
        if !status.has_value {
            continue;
        }

        let channels = state.data.channels() as usize;
        let mut value = [0u8; 4];
        value[..channels].copy_from_slice(state.data.at_coord(point));

        state.neighbors.push(Neighbor {
            offset,
            has_source: status.has_source,
            source: status.source,
            value,
        });

        if state.neighbors.len() >= cap {
            break;
        }
    }
}

/// Wraps or clips `point` against a `width x height` canvas per axis.
///
/// Matches the reference `wrap_or_clip`: an out-of-range coordinate wraps
/// by a single image-length step if the matching tile flag is set, or
/// fails the lookup outright otherwise. Offsets never exceed one image
/// dimension in magnitude (see [`crate::offsets::sorted_offsets`]), so one
/// wrap step per axis always suffices.
fn wrap_or_clip(mut point: Coord, width: u32, height: u32, h_tile: bool, v_tile: bool) -> Option<Coord> {
    let width = width as i32;
    let height = height as i32;

    if point.x < 0 {
        if h_tile {
            point.x += width;
        } else {
            return None;
        }
    }
    if point.x >= width {
        if h_tile {
            point.x -= width;
        } else {
            return None;
        }
    }
    if point.y < 0 {
        if v_tile {
            point.y += height;
        } else {
            return None;
        }
    }
    if point.y >= height {
        if v_tile {
            point.y -= height;
        } else {
            return None;
        }
    }

    // still out of bounds after one wrap step: offsets are bounded by the
    // canvas dimensions, so this can only happen for a zero-size axis.
    if point.x < 0 || point.x >= width || point.y < 0 || point.y >= height {
        return None;
    }

    Some(point)
}

/// Scores `candidate` as a fill for `position` against the neighbors
/// already collected in `state.neighbors`, updating `best_cost`/`best_point`
/// if it beats the current best.
///
/// Per-neighbor contributions accumulate in `i64` even though the
/// documented worst case (`channels * neighbors * 65536`, at most ~1.5e8)
/// fits comfortably in `i32`; the wider accumulator removes any doubt and
/// the overflow check below is purely a belt-and-suspenders diagnostic for
/// a parameter or data bug, matching the reference's debug-build
/// `__builtin_add_overflow` guard.
fn try_point(
    state: &State,
    position: Coord,
    candidate: Coord,
    best_cost: &mut i64,
    best_point: &mut Coord,
) {
    let channels = state.corpus.channels() as usize;
    let mut sum: i64 = 0;

    for (j, neighbor) in state.neighbors.iter().enumerate() {
        let q = candidate + neighbor.offset;
        let diff: i64 = if !state.corpus.contains(q) {
            i64::from(state.diff_table.edge_penalty()) * channels as i64
        } else if j > 0 {
            let corpus_pixel = state.corpus.at_coord(q);
            let mut acc = 0i64;
            for k in 0..channels {
                let delta = i32::from(neighbor.value[k]) - i32::from(corpus_pixel[k]);
                acc += i64::from(state.diff_table.cost(delta));
            }
            acc
        } else {
            0
        };

        let Some(next) = sum.checked_add(diff) else {
            overflow_panic(position, candidate);
        };
        sum = next;

        if sum >= *best_cost {
            return;
        }
    }

    *best_cost = sum;
    *best_point = candidate;
}
