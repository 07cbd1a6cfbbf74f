use crate::cmd::ExtractArgs;
use crate::indexer::extension::extension_of;
use crate::parsers::ParserRegistry;

pub fn run(args: &ExtractArgs) {
    if !args.file.is_file() {
        eprintln!("error: '{}' is not a file", args.file.display());
        std::process::exit(1);
    }

    let registry = ParserRegistry::with_defaults();
    let ext = extension_of(&args.file);
    if !registry.supports(&ext) {
        let shown = if ext.is_empty() { "extensionless" } else { ext.as_str() };
        eprintln!(
            "error: no parser for {} files (available: {})",
            shown,
            registry.extensions().join(" ")
        );
        std::process::exit(1);
    }

    let text = registry.parse(&args.file);
    if text.is_empty() {
        eprintln!("warning: no text extracted from '{}'", args.file.display());
        std::process::exit(1);
    }
    print!("{}", text);
    if !text.ends_with('\n') {
        println!();
    }
}
