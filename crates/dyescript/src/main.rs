//! DyeScript - compile DyeScript sources into CSS
//!
//! Usage: dyescript [OPTIONS] <FILE>

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use dyescript_compiler::{compile, Compilation, CompileOptions, OutputStyle, Runtime};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    input: Option<String>,
    output: Option<String>,
    style: OutputStyle,
    strict: bool,
    dump_store: bool,
}

enum Command {
    Help,
    Version,
    Compile(Args),
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let argv: Vec<String> = env::args().collect();
    let program = argv.first().map(String::as_str).unwrap_or("dyescript");

    let command = match parse_args(&argv[1.min(argv.len())..]) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(program);
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Help => {
            print_usage(program);
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("DyeScript {} (language {})", VERSION, Runtime::VERSION);
            ExitCode::SUCCESS
        }
        Command::Compile(args) => match run(&args) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn parse_args(argv: &[String]) -> Result<Command, String> {
    let mut args = Args::default();
    let mut iter = argv.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--min" | "-m" => args.style = OutputStyle::Minified,
            "--pretty" => args.style = OutputStyle::Pretty,
            "--strict" => args.strict = true,
            "--dump-store" => args.dump_store = true,
            "--output" | "-o" => {
                let path = iter.next().ok_or_else(|| format!("{} needs a path", arg))?;
                args.output = Some(path.clone());
            }
            flag if flag.starts_with('-') && flag != "-" => {
                return Err(format!("Unknown option '{}'", flag));
            }
            path => {
                if args.input.is_some() {
                    return Err(format!("Unexpected argument '{}'", path));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if args.input.is_none() {
        return Err("No input file given".to_string());
    }
    Ok(Command::Compile(args))
}

fn print_usage(program: &str) {
    println!(
        r#"DyeScript {} - compile DyeScript sources into CSS

USAGE:
    {} [OPTIONS] <FILE>

OPTIONS:
    -h, --help            Print this help message
    -V, --version         Print version information
    -o, --output <PATH>   Write CSS to PATH instead of stdout
    -m, --min             Always emit minified CSS
    --pretty              Never emit minified CSS, even for !dyegest sources
    --strict              Warn about unresolved variables
    --dump-store          Print the compiled store as JSON instead of CSS

Use '-' as FILE to read from stdin.

EXAMPLES:
    {} theme.dye
    {} --min -o theme.css theme.dye

"#,
        VERSION, program, program, program
    );
}

/// Name diagnostics use for an input path
fn display_name(input: &str) -> String {
    if input == "-" {
        "<stdin>".to_string()
    } else {
        input.to_string()
    }
}

fn read_source(input: &str) -> Result<String, Box<dyn std::error::Error>> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input).map_err(|e| format!("Failed to read {}: {}", input, e))?)
    }
}

/// Compile a source and render the text to emit (CSS, or the store as JSON)
fn render(source: &str, args: &Args) -> Result<(Compilation, String), Box<dyn std::error::Error>> {
    let options = CompileOptions {
        file_name: display_name(args.input.as_deref().unwrap_or("-")),
        strict: args.strict,
        output: args.style,
    };
    let compilation = compile(source, &options)?;

    let text = if args.dump_store {
        serde_json::to_string_pretty(&compilation.store)?
    } else {
        compilation.css.clone()
    };
    Ok((compilation, text))
}

/// Compile one input; returns whether it compiled without errors
fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let source = read_source(args.input.as_deref().unwrap_or("-"))?;
    let (compilation, text) = render(&source, args)?;

    for diagnostic in &compilation.diagnostics {
        eprintln!("{}", diagnostic);
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &text).map_err(|e| format!("Failed to write {}: {}", path, e))?;
            log::info!("Wrote {} bytes to {}", text.len(), path);
        }
        None => println!("{}", text),
    }

    Ok(!compilation.has_errors())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_compile_args() {
        let command = parse_args(&args(&["--min", "--strict", "-o", "out.css", "theme.dye"])).unwrap();
        let Command::Compile(parsed) = command else {
            panic!("Expected compile command");
        };
        assert_eq!(parsed.input.as_deref(), Some("theme.dye"));
        assert_eq!(parsed.output.as_deref(), Some("out.css"));
        assert_eq!(parsed.style, OutputStyle::Minified);
        assert!(parsed.strict);
        assert!(!parsed.dump_store);
    }

    #[test]
    fn test_parse_stdin_and_flags() {
        assert!(matches!(parse_args(&args(&["-h"])), Ok(Command::Help)));
        assert!(matches!(parse_args(&args(&["--version"])), Ok(Command::Version)));
        assert!(matches!(parse_args(&args(&["-"])), Ok(Command::Compile(_))));
    }

    fn compile_args(list: &[&str]) -> Args {
        match parse_args(&args(list)).unwrap() {
            Command::Compile(parsed) => parsed,
            _ => panic!("Expected compile command"),
        }
    }

    #[test]
    fn test_render_css() {
        let (compilation, text) = render("$ .box color red\n", &compile_args(&["--min", "a.dye"])).unwrap();
        assert_eq!(text, ".box{color:red}");
        assert!(compilation.diagnostics.is_empty());
    }

    #[test]
    fn test_render_stdin_diagnostics() {
        let (compilation, text) = render("$ghost p\n", &compile_args(&["-"])).unwrap();
        assert_eq!(text, "");
        assert_eq!(compilation.diagnostics.len(), 1);
        assert_eq!(compilation.diagnostics[0].file, "<stdin>");
        assert_eq!(display_name("theme.dye"), "theme.dye");
    }

    #[test]
    fn test_render_dump_store() {
        let source = "# theme\n@ primary red\n$ a color &primary\n";
        let (_, text) = render(source, &compile_args(&["--dump-store", "-"])).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["styles"]["a"]["color"][0], "red");
        assert_eq!(json["scopes"]["collections"]["theme"]["values"]["primary"], "red");
        assert_eq!(json["scopes"]["stack"][1]["collection"], "theme");
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["--bogus", "a.dye"])).is_err());
        assert!(parse_args(&args(&["a.dye", "b.dye"])).is_err());
        assert!(parse_args(&args(&["a.dye", "-o"])).is_err());
    }
}
