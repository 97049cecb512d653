//! minicon CLI - preference-ranked query rewriting using views.

use std::io::stdout;

use minicon_pref::cli::{parse_args, run_logged, USAGE};

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return;
    }

    let result = run_logged(&args, &mut stdout().lock());
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
