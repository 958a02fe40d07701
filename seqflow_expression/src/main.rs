use seqflow_expression::{
    logging, ExpressionElement, ExpressionParser, OperatorCatalog, OperatorSet, ScopeFn,
};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    if let Err(error) = logging::init_global_logging() {
        eprintln!("Failed to initialize logging: {}", error);
        return ExitCode::FAILURE;
    }

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <expression> [options]", args[0]);
        eprintln!("       {} --help", args[0]);
        return ExitCode::FAILURE;
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return ExitCode::SUCCESS;
    }

    let expression = &args[1];
    let options = match parse_options(&args[2..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            return ExitCode::FAILURE;
        }
    };

    let operator_set = match &options.operator_file {
        Some(path) => match OperatorSet::load(path) {
            Ok(set) => set,
            Err(error) => {
                eprintln!("Error: {}", error);
                return ExitCode::FAILURE;
            }
        },
        None => OperatorSet::standard(),
    };

    let catalog = match OperatorCatalog::from_operator_set(&operator_set) {
        Ok(catalog) => Arc::new(catalog),
        Err(error) => {
            eprintln!("Error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let mut parser = ExpressionParser::new(catalog);

    if !options.quiet && !parser.is_expression(expression) {
        eprintln!("Note: no operator characters in input; treating as a plain value");
    }

    let result = match &options.variables {
        Some(variables) => {
            let scope = ScopeFn(|name: &str| variables.iter().any(|v| v == name));
            parser.parse_in_scope(expression, &scope)
        }
        None => parser.parse(expression),
    };

    match result {
        Ok(tree) => {
            if options.json {
                match serde_json::to_string_pretty(&tree) {
                    Ok(rendered) => println!("{}", rendered),
                    Err(error) => {
                        eprintln!("Error: failed to render tree as JSON: {}", error);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print_tree(&tree);
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Error [{}]: {}", error.error_code(), error);
            ExitCode::FAILURE
        }
    }
}

struct CliOptions {
    operator_file: Option<String>,
    variables: Option<Vec<String>>,
    json: bool,
    quiet: bool,
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        operator_file: None,
        variables: None,
        json: false,
        quiet: false,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--operators" => {
                let path = iter
                    .next()
                    .ok_or_else(|| "--operators requires a file path".to_string())?;
                options.operator_file = Some(path.clone());
            }
            "--variables" => {
                let names = iter
                    .next()
                    .ok_or_else(|| "--variables requires a comma-separated list".to_string())?;
                options.variables = Some(
                    names
                        .split(',')
                        .map(|name| name.trim().to_string())
                        .filter(|name| !name.is_empty())
                        .collect(),
                );
            }
            "--json" => options.json = true,
            "--quiet" => options.quiet = true,
            other => return Err(format!("unknown option '{}'", other)),
        }
    }
    Ok(options)
}

fn print_tree(tree: &ExpressionElement) {
    match tree {
        ExpressionElement::Expression { node } => println!("{}", node),
        other => println!("{}", other),
    }
}

fn print_help(program_name: &str) {
    println!("SeqFlow expression compiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Compiles expression text into an operator tree");
    println!();
    println!("USAGE:");
    println!("    {} <expression> [options]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help                Show this help message");
    println!("    --operators <file>    Load operators from a TOML operator set");
    println!("    --variables <a,b,c>   Check variable leaves against this scope");
    println!("    --json                Print the tree as JSON");
    println!("    --quiet               Suppress informational notes");
    println!();
    println!("EXAMPLES:");
    println!("    {} '1+2*3'", program_name);
    println!("    {} 'speed*2>=10' --variables speed --json", program_name);
    println!("    {} 'a&&b' --operators operators.toml", program_name);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_parsing() {
        let args: Vec<String> = vec![
            "--operators".to_string(),
            "ops.toml".to_string(),
            "--variables".to_string(),
            "a, b".to_string(),
            "--json".to_string(),
        ];
        let options = parse_options(&args).expect("parses");
        assert_eq!(options.operator_file.as_deref(), Some("ops.toml"));
        assert_eq!(
            options.variables,
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert!(options.json);
        assert!(!options.quiet);
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let args = vec!["--bogus".to_string()];
        assert!(parse_options(&args).is_err());
    }
}
