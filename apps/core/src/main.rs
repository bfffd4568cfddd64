use clap::Parser;

fn main() {
    let cli = tabhop_core::runtime::Cli::parse();
    let options = match tabhop_core::runtime::resolve_options(cli) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[tabhop-core] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = tabhop_core::runtime::run_with_options(options) {
        eprintln!("[tabhop-core] runtime failed: {error}");
        std::process::exit(1);
    }
}
