//! Synthesis tunables.

/// Tunable parameters for a resynthesis run.
///
/// Every setter clamps into its documented domain rather than rejecting an
/// out-of-range value; an out-of-range parameter is a caller mistake, not a
/// fatal condition, and a silently clamped value at `debug` log level is
/// easier to live with than yet another `Result` a caller has to thread
/// through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    h_tile: bool,
    v_tile: bool,
    autism: f64,
    neighbors: u32,
    tries: u32,
    magic: u8,
    seed: u64,
}

impl Parameters {
    /// Maximum value accepted by [`Parameters::set_neighbors`].
    pub const MAX_NEIGHBORS: u32 = 1105;
    /// Maximum value accepted by [`Parameters::set_tries`].
    pub const MAX_TRIES: u32 = 65536;

    /// Creates a parameter set with the documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether neighbor lookups wrap horizontally.
    pub fn set_h_tile(&mut self, h_tile: bool) -> &mut Self {
        self.h_tile = h_tile;
        self
    }

    /// Sets whether neighbor lookups wrap vertically.
    pub fn set_v_tile(&mut self, v_tile: bool) -> &mut Self {
        self.v_tile = v_tile;
        self
    }

    /// Sets the outlier sensitivity, clamped to `[0, 1]`.
    ///
    /// Smaller values tolerate larger per-channel deviations between a
    /// candidate and its neighborhood; `0` degenerates to exact matching.
    pub fn set_autism(&mut self, autism: f64) -> &mut Self {
        let clamped = autism.clamp(0.0, 1.0);
        if clamped != autism {
            log::debug!("autism {autism} clamped to {clamped}");
        }
        self.autism = clamped;
        self
    }

    /// Sets the maximum neighborhood size per iteration, clamped to
    /// `[0, MAX_NEIGHBORS]`.
    pub fn set_neighbors(&mut self, neighbors: u32) -> &mut Self {
        let clamped = neighbors.min(Self::MAX_NEIGHBORS);
        if clamped != neighbors {
            log::debug!("neighbors {neighbors} clamped to {clamped}");
        }
        self.neighbors = clamped;
        self
    }

    /// Sets the number of random corpus probes per iteration, clamped to
    /// `[0, MAX_TRIES]`.
    pub fn set_tries(&mut self, tries: u32) -> &mut Self {
        let clamped = tries.min(Self::MAX_TRIES);
        if clamped != tries {
            log::debug!("tries {tries} clamped to {clamped}");
        }
        self.tries = clamped;
        self
    }

    /// Sets the geometric polishing-tail decay factor (over 256).
    ///
    /// `0` disables polishing. The domain `[0, 255]` is already the full
    /// range of `u8`, so there is nothing to clamp.
    pub fn set_magic(&mut self, magic: u8) -> &mut Self {
        self.magic = magic;
        self
    }

    /// Sets the PRNG seed. `0` means "derive one from the wall clock at run
    /// time", matching the reference CLI's `time(0)` default.
    pub fn set_seed(&mut self, seed: u64) -> &mut Self {
        self.seed = seed;
        self
    }

    /// Whether neighbor lookups wrap horizontally.
    #[inline]
    #[must_use]
    pub fn h_tile(&self) -> bool {
        self.h_tile
    }

    /// Whether neighbor lookups wrap vertically.
    #[inline]
    #[must_use]
    pub fn v_tile(&self) -> bool {
        self.v_tile
    }

    /// Outlier sensitivity in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn autism(&self) -> f64 {
        self.autism
    }

    /// Maximum neighborhood size per iteration.
    #[inline]
    #[must_use]
    pub fn neighbors(&self) -> u32 {
        self.neighbors
    }

    /// Number of random corpus probes per iteration.
    #[inline]
    #[must_use]
    pub fn tries(&self) -> u32 {
        self.tries
    }

    /// Geometric polishing-tail decay factor.
    #[inline]
    #[must_use]
    pub fn magic(&self) -> u8 {
        self.magic
    }

    /// The configured PRNG seed (`0` meaning "derive from wall clock").
    #[inline]
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            h_tile: false,
            v_tile: false,
            autism: 32.0 / 256.0,
            neighbors: 29,
            tries: 192,
            magic: 192,
            seed: 0,
        }
    }
}
