use clap::Parser;

#[derive(Debug, Parser)]
#[clap(version, about, long_about = None)]
pub struct Opt {
    /// Input image files to resynthesize. Each gets its own output.
    pub input: Vec<std::path::PathBuf>,

    /// Output file. Only valid with a single input file; otherwise each
    /// input is written to `<basename>.resynth.png`.
    #[clap(short, long)]
    pub output: Option<std::path::PathBuf>,

    /// Sensitivity to outliers. Range: [0,256].
    #[clap(short, long, default_value_t = 32)]
    pub autism: u32,

    /// Points to sample from the neighborhood each iteration. Range: [0,1024].
    #[clap(short = 'N', long, default_value_t = 29)]
    pub neighbors: u32,

    /// Random candidate points added each iteration. Range: [0,65536].
    #[clap(short = 'M', long, default_value_t = 192)]
    pub tries: u32,

    /// Geometric decay constant for the polishing pass. Range: [0,255].
    #[clap(short, long, default_value_t = 192)]
    pub magic: u8,

    /// Output size multiplier; negative values set an explicit edge length.
    /// Range: [-8192,32].
    #[clap(short, long, default_value_t = 1)]
    pub scale: i32,

    /// Initial RNG value. Default: 0, meaning derive one from the wall clock.
    #[clap(short = 'S', long, default_value_t = 0)]
    pub seed: u64,

    /// Wrap neighborhood lookups horizontally.
    #[clap(short = 'H', long)]
    pub h_tile: bool,

    /// Wrap neighborhood lookups vertically.
    #[clap(short = 'T', long)]
    pub v_tile: bool,

    /// Print per-file dimensions and timing.
    ///
    /// Uses lowercase `-v` rather than the spec's `-V`: clap reserves `-V`
    /// for its own auto-generated `--version` short flag, the same reason
    /// `-h`/`-H` is taken by `--help` above.
    #[clap(short = 'v', long)]
    pub verbose: bool,
}
