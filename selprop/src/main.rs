use clap::{Parser, ValueEnum};
use log::{error, info};
use rayon::prelude::*;
use selprop_lib::selprop_generate::selprop;
use selprop_lib::{FallbackScope, ResolveError, ResolveOptions};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    /// The last fallback given for a selector applies to all its properties.
    Selector,
    /// Each (selector, property) pair keeps its own fallback.
    Property,
}

impl From<ScopeArg> for FallbackScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Selector => FallbackScope::Selector,
            ScopeArg::Property => FallbackScope::Property,
        }
    }
}

#[derive(Parser)]
#[command(name = "selprop")]
#[command(about = "Resolve ref(<selector>, <property>[, <fallback>]) values in CSS")]
struct Args {
    /// Input stylesheets.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file for a single input, or output directory for several.
    /// Prints to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How far a fallback literal reaches.
    #[arg(long, value_enum, default_value = "selector")]
    fallback_scope: ScopeArg,
}

fn main() {
    env_logger::init();

    // parse the args given in terminal
    let args: Args = Args::parse();
    let options = ResolveOptions::new().with_fallback_scope(args.fallback_scope.into());

    // every stylesheet gets its own resolution run
    let results: Vec<(PathBuf, Result<String, ResolveError>)> = args
        .inputs
        .par_iter()
        .map(|input| (input.clone(), transform_file(input, &options)))
        .collect();

    let several = args.inputs.len() > 1;
    let mut failed = false;
    for (input, result) in results {
        let written = result.and_then(|css| write_output(&input, &css, args.output.as_deref(), several));
        if let Err(e) = written {
            error!("{}: {}", input.display(), e);
            eprintln!("Error processing {}: {}", input.display(), e);
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn transform_file(input: &Path, options: &ResolveOptions) -> Result<String, ResolveError> {
    let css_content = fs::read_to_string(input)?;
    info!("transforming {}", input.display());
    selprop::transform(&css_content, options)
}

fn write_output(
    input: &Path,
    css: &str,
    output: Option<&Path>,
    several: bool,
) -> Result<(), ResolveError> {
    match output {
        None => {
            if several {
                println!("/* {} */", input.display());
            }
            print!("{}", css);
        }
        Some(dir) if several => {
            fs::create_dir_all(dir)?;
            let name = input.file_name().unwrap_or(input.as_os_str());
            fs::write(dir.join(name), css)?;
        }
        Some(file) => fs::write(file, css)?,
    }
    Ok(())
}
