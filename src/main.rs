//! CLI tool to validate TCL files and emit their AST as JSON.

use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: tclscan <command> [files...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  validate  Check TCL file(s) for structural errors");
        eprintln!("  json      Print the AST of each file as compact JSON");
        eprintln!("  pretty    Print the AST of each file as indented JSON");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  tclscan validate app.tcl");
        eprintln!("  tclscan json app.tcl");
        eprintln!("  tclscan pretty app.tcl");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    let files = &args[2..];

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        let root = tclscan_rs::parse(&content, path);

        match command {
            "validate" => {
                if root.had_error {
                    for error in &root.errors {
                        if let tclscan_rs::AstNode::Error(e) = error {
                            let line = e.range.start.line;
                            let column = e.range.start.column;
                            eprintln!("{path}:{line}:{column}: {}", e.message);
                        }
                    }
                    had_error = true;
                } else {
                    let commands = root.children.len();
                    let comments = root.comments.len();
                    eprintln!("{path}: valid ({commands} command(s), {comments} comment(s))");
                }
            }
            "json" => match tclscan_rs::to_json(&root) {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    eprintln!("{path}: {e}");
                    had_error = true;
                }
            },
            "pretty" => match tclscan_rs::to_json_pretty(&root) {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    eprintln!("{path}: {e}");
                    had_error = true;
                }
            },
            _ => {
                eprintln!("Unknown command: {command}");
                return ExitCode::from(2);
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
