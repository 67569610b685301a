mod args;
mod utils;

use crate::args::Opt;
use crate::utils::{default_output_path, save_image};

use clap::Parser;
use resynth::{synthesize, Image, Parameters};

fn main() {
    let opt = Opt::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if opt.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    if opt.output.is_some() && opt.input.len() != 1 {
        eprintln!("resynth: --output only makes sense with exactly one input file");
        std::process::exit(1);
    }

    let mut failures: i32 = 0;
    for input in &opt.input {
        if let Err(err) = process_one(&opt, input) {
            eprintln!("resynth: {input}: {err}", input = input.display());
            failures += 1;
        }
    }

    if failures > 0 {
        log::error!("{failures} of {} file(s) failed to write", opt.input.len());
    }

    // Exit codes above 125 collide with shell/signal-reserved range (126-255
    // are "command not found"/"permission denied"/128+signal by convention),
    // so clamp the negated failure count instead of handing the shell an
    // exit status it would misinterpret.
    std::process::exit(-failures.min(125));
}

fn process_one(opt: &Opt, input: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let t0 = std::time::Instant::now();

    let decoded = image::open(input)?.into_rgb8();
    let (width, height) = decoded.dimensions();
    let corpus = Image::from_pixels(width, height, 3, decoded.into_raw())?;

    let mut params = Parameters::new();
    params
        .set_autism(f64::from(opt.autism) / 256.0)
        .set_neighbors(opt.neighbors)
        .set_tries(opt.tries)
        .set_magic(opt.magic)
        .set_seed(opt.seed)
        .set_h_tile(opt.h_tile)
        .set_v_tile(opt.v_tile);

    let result = synthesize(corpus, opt.scale, &params)?;

    let output_path = opt
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(input));
    save_image(
        &output_path,
        result.pixels(),
        result.width(),
        result.height(),
        result.channels(),
    )?;

    if opt.verbose {
        println!(
            "{} -> {} ({}x{}, {:?})",
            input.display(),
            output_path.display(),
            result.width(),
            result.height(),
            t0.elapsed()
        );
    }

    Ok(())
}
