//! `meshview [model.obj] [--options file.toml]`
//!
//! Opens a window with a fly camera (WASD/arrows to move, mouse to look,
//! scroll to zoom, F for wireframe, Escape to quit). Without a model the
//! built-in box and floor are shown.

use std::path::PathBuf;

use meshview::options::Options;
use meshview::Viewer;

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct Args {
    model: Option<PathBuf>,
    options: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--options" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--options needs a file".to_owned())?;
                parsed.options = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => {
                return Err(format!("unknown flag: {flag}"));
            }
            _ if parsed.model.is_some() => {
                return Err(format!("unexpected argument: {arg}"));
            }
            _ => parsed.model = Some(PathBuf::from(arg)),
        }
    }
    Ok(parsed)
}

fn main() {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            log::error!("Usage: meshview [model.obj] [--options file.toml]");
            std::process::exit(2);
        }
    };

    let options = match &args.options {
        Some(path) => match Options::load(path) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    let mut builder = Viewer::builder().with_options(options);
    if let Some(model) = args.model {
        builder = builder.with_model(model);
    }

    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn model_and_options_in_any_order() {
        let expected = Args {
            model: Some(PathBuf::from("rock.obj")),
            options: Some(PathBuf::from("belt.toml")),
        };
        assert_eq!(args(&["rock.obj", "--options", "belt.toml"]), Ok(expected));
        assert_eq!(
            args(&["--options", "belt.toml", "rock.obj"]).map(|a| a.model),
            Ok(Some(PathBuf::from("rock.obj")))
        );
        assert_eq!(args(&[]), Ok(Args::default()));
    }

    #[test]
    fn bad_command_lines_are_rejected() {
        assert!(args(&["--options"]).is_err());
        assert!(args(&["--fast"]).is_err());
        assert!(args(&["a.obj", "b.obj"]).is_err());
    }
}
