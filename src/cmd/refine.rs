use std::io::{self, BufRead};

use crate::cmd::RefineArgs;
use crate::searcher::refine::{refine_paths, suggest_keywords, DEFAULT_SUGGESTIONS};

pub fn run(args: &RefineArgs) {
    let paths = if args.paths.is_empty() {
        match read_stdin_paths() {
            Ok(p) => p,
            Err(err) => {
                eprintln!("error: cannot read paths from stdin: {}", err);
                std::process::exit(1);
            }
        }
    } else {
        args.paths.clone()
    };

    let kept = refine_paths(&paths, &args.keywords);
    for path in &kept {
        println!("{}", path);
    }

    if args.suggest {
        let suggestions = suggest_keywords(&kept, DEFAULT_SUGGESTIONS);
        if !suggestions.is_empty() {
            eprintln!("suggestions: {}", suggestions.join(", "));
        }
    }

    let word = if kept.len() == 1 { "path" } else { "paths" };
    eprintln!("{} of {} {} kept", kept.len(), paths.len(), word);
    if kept.is_empty() {
        std::process::exit(1);
    }
}

fn read_stdin_paths() -> io::Result<Vec<String>> {
    let mut paths = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(trimmed.to_string());
        }
    }
    Ok(paths)
}
