use clap::Args;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use textkit::log_status;
use textkit::utils::io;

pub type CmdResult<T> = textkit::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

/// Text input shared by every transform command.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Input text; `@path` reads a file, `-` reads stdin (default when piped)
    #[arg(value_name = "INPUT", allow_hyphen_values = true)]
    pub input: Option<String>,
}

impl InputArgs {
    pub fn read(&self) -> textkit::Result<String> {
        read_input(self.input.as_deref())
    }
}

/// Where the result text goes besides the JSON envelope.
#[derive(Args, Debug, Default)]
pub struct DeliveryArgs {
    /// Write the result text to a file
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Copy the result text to the system clipboard
    #[arg(long)]
    pub copy: bool,

    /// Print the result text verbatim instead of the JSON envelope
    #[arg(long)]
    pub raw: bool,
}

/// What happened to the result text after it was computed.
#[derive(Debug, Default, Serialize)]
pub struct Delivery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub copied: bool,
}

/// Command outputs that can be printed verbatim in `--raw` mode.
pub(crate) trait RawText {
    fn raw_text(&self) -> &str;
}

// ============================================================================
// Input / delivery (CLI layer)
// ============================================================================

/// Read input from a literal, a file (@path), or stdin (- or omitted).
pub(crate) fn read_input(spec: Option<&str>) -> textkit::Result<String> {
    match spec {
        Some(spec) if spec.trim() == "-" => read_stdin(true),
        Some(spec) if spec.starts_with('@') => {
            let path = &spec[1..];
            if path.trim().is_empty() {
                return Err(textkit::Error::validation_invalid_argument(
                    "input",
                    "Invalid input '@' (missing file path)",
                    None,
                    None,
                ));
            }
            io::read_file(Path::new(path), &format!("read {}", path))
        }
        Some(spec) => Ok(spec.to_string()),
        None => read_stdin(false),
    }
}

fn read_stdin(explicit: bool) -> textkit::Result<String> {
    if crate::tty::is_stdin_tty() {
        if explicit {
            return Err(textkit::Error::validation_invalid_argument(
                "input",
                "Cannot read input from stdin when stdin is a TTY",
                None,
                None,
            ));
        }
        return Err(textkit::Error::validation_missing_argument(vec![
            "INPUT".to_string(),
        ])
        .with_hint("Pass text as an argument, @path for a file, or pipe it on stdin"));
    }

    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf).map_err(|e| {
        textkit::Error::internal_io(e.to_string(), Some("read stdin".to_string()))
    })?;
    Ok(buf)
}

/// Save and/or copy the result text. Runs after the result is computed so a
/// clipboard failure never hides a successful file write.
pub(crate) fn deliver(text: &str, args: &DeliveryArgs) -> textkit::Result<Delivery> {
    let mut delivery = Delivery::default();

    if let Some(path) = &args.output {
        io::write_file_atomic(path, text.as_bytes(), &format!("write {}", path.display()))?;
        log_status!("output", "Saved to {}", path.display());
        delivery.saved_to = Some(path.display().to_string());
    }

    if args.copy {
        textkit::clipboard::copy_text(text)
            .map_err(|err| keep_result_on_failure(err, text, &delivery))?;
        delivery.copied = true;
    }

    Ok(delivery)
}

/// A failed copy still hands back the computed text (and any saved path)
/// in the error details.
fn keep_result_on_failure(
    mut err: textkit::Error,
    text: &str,
    delivery: &Delivery,
) -> textkit::Error {
    if let Some(details) = err.details.as_object_mut() {
        details.insert("output".to_string(), serde_json::Value::from(text));
        if let Some(saved_to) = &delivery.saved_to {
            details.insert("savedTo".to_string(), serde_json::Value::from(saved_to.as_str()));
        }
    }
    err
}

pub mod audit;
pub mod base64;
pub mod case;
pub mod config;
pub mod convert;
pub mod email;
pub mod error;
pub mod spaces;
pub mod url;

/// Whether the command asked for verbatim text output.
pub(crate) fn wants_raw(command: &crate::Commands) -> bool {
    match command {
        crate::Commands::Convert(args) => args.delivery().raw,
        crate::Commands::Case(args) => args.delivery.raw,
        crate::Commands::Spaces(args) => args.delivery.raw,
        crate::Commands::Emails(args) => args.delivery.raw,
        crate::Commands::Base64(args) => args.delivery().raw,
        crate::Commands::Url(args) => args.delivery().raw,
        crate::Commands::Audit(args) => args.is_text_format(),
        _ => false,
    }
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

/// Dispatch a command and keep only its verbatim text.
macro_rules! dispatch_raw {
    ($args:expr, $global:expr, $module:ident) => {
        $module::run($args, $global).map(|(out, code)| (out.raw_text().to_string(), code))
    };
}

pub(crate) fn run_raw(
    command: crate::Commands,
    global: &GlobalArgs,
) -> textkit::Result<(String, i32)> {
    match command {
        crate::Commands::Convert(args) => dispatch_raw!(args, global, convert),
        crate::Commands::Case(args) => dispatch_raw!(args, global, case),
        crate::Commands::Spaces(args) => dispatch_raw!(args, global, spaces),
        crate::Commands::Emails(args) => dispatch_raw!(args, global, email),
        crate::Commands::Base64(args) => dispatch_raw!(args, global, base64),
        crate::Commands::Url(args) => dispatch_raw!(args, global, url),
        crate::Commands::Audit(args) => dispatch_raw!(args, global, audit),
        _ => Err(textkit::Error::validation_invalid_argument(
            "raw",
            "Command does not support raw output",
            None,
            None,
        )),
    }
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (textkit::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Convert(args) => dispatch!(args, global, convert),
        crate::Commands::Case(args) => dispatch!(args, global, case),
        crate::Commands::Spaces(args) => dispatch!(args, global, spaces),
        crate::Commands::Emails(args) => dispatch!(args, global, email),
        crate::Commands::Base64(args) => dispatch!(args, global, base64),
        crate::Commands::Url(args) => dispatch!(args, global, url),
        crate::Commands::Audit(args) => dispatch!(args, global, audit),
        crate::Commands::Config(args) => dispatch!(args, global, config),
        crate::Commands::Error(args) => dispatch!(args, global, error),
    }
}

/// Commands read textkit.json through `TEXTKIT_CONFIG`; tests that depend
/// on it hold this guard so they never see each other's files.
#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;
    use std::sync::{Mutex, MutexGuard};

    static CONFIG_ENV_LOCK: Mutex<()> = Mutex::new(());

    pub(crate) struct ConfigGuard {
        _lock: MutexGuard<'static, ()>,
    }

    impl Drop for ConfigGuard {
        fn drop(&mut self) {
            std::env::remove_var("TEXTKIT_CONFIG");
        }
    }

    pub(crate) fn use_config_file(path: &Path) -> ConfigGuard {
        let lock = CONFIG_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("TEXTKIT_CONFIG", path);
        ConfigGuard { _lock: lock }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn literal_input_is_returned_as_is() {
        assert_eq!(read_input(Some("hello world")).unwrap(), "hello world");
    }

    #[test]
    fn at_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        fs::write(&path, "from file").unwrap();
        let spec = format!("@{}", path.display());
        assert_eq!(read_input(Some(&spec)).unwrap(), "from file");
    }

    #[test]
    fn bare_at_is_rejected() {
        let err = read_input(Some("@")).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn deliver_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let args = DeliveryArgs {
            output: Some(path.clone()),
            ..Default::default()
        };
        let delivery = deliver("result", &args).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "result");
        assert_eq!(delivery.saved_to, Some(path.display().to_string()));
        assert!(!delivery.copied);
    }

    #[test]
    fn clipboard_failure_keeps_the_result() {
        let delivery = Delivery {
            saved_to: Some("out.txt".to_string()),
            copied: false,
        };
        let err = keep_result_on_failure(
            textkit::Error::clipboard_unavailable("no display"),
            "COMPUTED RESULT",
            &delivery,
        );
        assert_eq!(err.code.as_str(), "clipboard.unavailable");
        assert_eq!(err.details["output"], "COMPUTED RESULT");
        assert_eq!(err.details["savedTo"], "out.txt");
        assert_eq!(err.details["error"], "no display");
    }
}
