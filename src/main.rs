use std::process::ExitCode;

use zyg::ast::Mode;
use zyg::Ast;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: zyg <file.zig | file.zon>");
        return ExitCode::FAILURE;
    };
    let source = match std::fs::read(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mode = if path.ends_with(".zon") {
        Mode::Zon
    } else {
        Mode::Zig
    };

    let tree = Ast::parse(&source, mode);
    for error in &tree.errors {
        eprintln!("{}", error.display(&path, &tree));
    }
    if !tree.errors.is_empty() {
        return ExitCode::FAILURE;
    }
    println!(
        "{path}: {} tokens, {} nodes",
        tree.token_tags.len(),
        tree.nodes.len()
    );
    ExitCode::SUCCESS
}
