// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use colored::Colorize;
use go_extract::cli::Args;
use go_extract::{execute, init_logging, prompt, Destination, ExtractOptions};

fn run(args: Args) -> anyhow::Result<()> {
    let base = match &args.config {
        Some(path) => {
            let base_dir = path.parent().unwrap_or_else(|| std::path::Path::new(""));
            ExtractOptions::from_file(path)?.rebase(base_dir)
        }
        None => ExtractOptions::default(),
    };
    let mut options = args.apply(base);

    init_logging(options.verbosity_level, args.log_config.log_file.as_deref())?;
    log::debug!("go-extract version: {}", env!("CARGO_PKG_VERSION"));

    if options.function.is_none() {
        let stdin = std::io::stdin();
        prompt::ask(&mut stdin.lock(), &mut std::io::stdout(), &mut options)?;
    }
    log::debug!("options: {:?}", options);

    match execute(&options, args.output_config.stdout)? {
        Destination::File(path) => {
            println!("Extraction completed. Code written to '{}'.", path.display())
        }
        Destination::Stdout => (),
    }
    Ok(())
}

fn main() {
    #[cfg(windows)]
    let _ = colored::control::set_virtual_terminal(true);

    let args = Args::parse();
    match run(args) {
        Ok(_) => (),
        Err(err) => {
            let err = format!("{:?}", err);
            println!("{}", err.bold().red());
            std::process::exit(1);
        }
    }
}
