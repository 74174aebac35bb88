use std::{env, panic, process, sync::Arc};

use faultpage::{
    ErrorsConfig, Errors, HttpException, Level, OutputFormat, TracingHandler,
    config::TemplateConfig,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber, fmt::format, util::SubscriberInitExt};

fn main() {
    let mut args: Vec<String> = env::args().collect();
    let display = args.iter().any(|arg| arg == "--display");
    let json = args.iter().any(|arg| arg == "--json");
    let text = args.iter().any(|arg| arg == "--text");
    if display {
        args.retain(|arg| arg != "--display");
    }
    if json {
        args.retain(|arg| arg != "--json");
    }
    if text {
        args.retain(|arg| arg != "--text");
    }
    let Some(config_path) = extract_value(&mut args, "--config") else {
        return;
    };
    let Some(protocol) = extract_value(&mut args, "--protocol") else {
        return;
    };
    let Some(hidden_404) = extract_value(&mut args, "--hidden-404") else {
        return;
    };

    if args.len() < 2 {
        print_help();
        return;
    }
    if matches!(args[1].as_str(), "-h" | "--help" | "help") {
        print_help();
        return;
    }

    init_tracing();

    let config = match config_path {
        Some(path) => ErrorsConfig::load(&path),
        None => Ok(ErrorsConfig::default()),
    }
    .and_then(ErrorsConfig::apply_env);
    let mut config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(2);
        }
    };
    if display {
        config.display_errors = true;
    }
    if json {
        config.format = OutputFormat::Json;
    } else if text {
        config.format = OutputFormat::Text;
    }
    if let Some(protocol) = protocol {
        config.protocol = protocol;
    }
    if let Some(path) = hidden_404 {
        config
            .hidden_templates
            .insert(404, TemplateConfig::File(path.into()));
    }

    let errors = Arc::new(config.build_errors());
    errors.add_handler(TracingHandler);
    let _guard = errors.install();

    run_scenario(&errors, &args[2..], args[1].as_str());
}

fn run_scenario(errors: &Errors, rest: &[String], scenario: &str) {
    match scenario {
        "ok" => {
            println!("ok");
        }
        "warning" => errors.raise(Level::WARNING, message(rest, 0)),
        "notice" => errors.raise(Level::NOTICE, message(rest, 0)),
        "deprecated" => errors.raise(Level::DEPRECATED, message(rest, 0)),
        "raise" => {
            let Some(level) = rest.first().and_then(|name| parse_level(name)) else {
                eprintln!("Usage: faultpage raise <LEVEL> <message>");
                process::exit(2);
            };
            errors.raise(level, message(rest, 1));
        }
        "panic" => {
            panic!("{}", message(rest, 0));
        }
        "http" => {
            let Some(code) = rest.first().and_then(|code| code.parse::<u16>().ok()) else {
                eprintln!("Usage: faultpage http <code> <phrase> <message>");
                process::exit(2);
            };
            let phrase = rest.get(1).cloned().unwrap_or_default();
            let exception = HttpException::new(message(rest, 2)).with_status(code, phrase);
            panic::panic_any(exception);
        }
        "fatal" => {
            let Some(level) = rest.first().and_then(|name| parse_level(name)) else {
                eprintln!("Usage: faultpage fatal <LEVEL> <message>");
                process::exit(2);
            };
            // Reported by the shutdown guard when `main` returns.
            errors.record_fatal(level, message(rest, 1), file!(), line!());
        }
        other => {
            eprintln!("Error: unknown scenario `{}`", other);
            print_help();
            process::exit(2);
        }
    }
}

fn message(rest: &[String], from: usize) -> String {
    rest.get(from..).map(|words| words.join(" ")).unwrap_or_default()
}

fn parse_level(name: &str) -> Option<Level> {
    if let Ok(bits) = name.parse::<u32>() {
        return Some(Level::from_bits(bits));
    }
    Level::from_name(name.strip_prefix("E_").unwrap_or(name))
}

fn extract_value(args: &mut Vec<String>, flag: &str) -> Option<Option<String>> {
    let mut value = None;
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag {
            if i + 1 >= args.len() {
                eprintln!("Usage: faultpage {} <value> <scenario>", flag);
                return None;
            }
            value = Some(args.remove(i + 1));
            args.remove(i);
            continue;
        }
        i += 1;
    }
    Some(value)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = FmtSubscriber::builder()
        .event_format(format().compact())
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .finish()
        .try_init();
}

fn print_help() {
    println!(
        "\
faultpage

Usage:
  faultpage [flags] ok
  faultpage [flags] warning <message>
  faultpage [flags] notice <message>
  faultpage [flags] deprecated <message>
  faultpage [flags] raise <LEVEL> <message>
  faultpage [flags] fatal <LEVEL> <message>
  faultpage [flags] panic <message>
  faultpage [flags] http <code> <phrase> <message>

Flags:
  --display            Show fault detail (rich page)
  --json               Render faults as JSON
  --text               Render faults as plain text
  --config <file>      Load an ErrorsConfig JSON file
  --protocol <proto>   Status line protocol (default HTTP/1.1)
  --hidden-404 <file>  Hidden page used for 404 faults

Environment:
  FAULTPAGE_DISPLAY, FAULTPAGE_REPORTING, FAULTPAGE_FORMAT override the
  config file; RUST_LOG filters log output on stderr."
    );
}
