use std::ffi::OsString;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::process::ExitCode;

use batch_hash::{Backend, Dispatcher, Input};
use clap::{Arg, ArgAction, Command};

const PROGRAM_NAME: &str = "lanehash-caps";

/// Inputs hashed by the self-test; deliberately not a multiple of any lane
/// count so every backend also exercises dummy-lane padding.
const SELF_TEST_INPUTS: usize = 67;

const SHA256_OF_ZEROS: &str = "66687aadf862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f2925";
const RIPEMD160_OF_ZEROS: &str = "d1a70126ff7a149ca6f9b638db084480440ff842";

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Options {
    backend: Option<Backend>,
    self_test: bool,
}

fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Report CPU vector capabilities and verify every usable hashing backend.")
        .arg(
            Arg::new("backend")
                .long("backend")
                .value_name("NAME")
                .help("Pin a backend instead of detecting one: scalar, sse2, neon, avx2 or avx512.")
                .value_parser(clap::value_parser!(Backend)),
        )
        .arg(
            Arg::new("no-self-test")
                .long("no-self-test")
                .help("Only print the capability report.")
                .action(ArgAction::SetTrue),
        )
}

pub(crate) fn parse_args<I, S>(arguments: I) -> Result<Options, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let matches = clap_command().try_get_matches_from(arguments)?;
    Ok(Options {
        backend: matches.get_one::<Backend>("backend").copied(),
        self_test: !matches.get_flag("no-self-test"),
    })
}

/// Parses `args`, prints the capability report to `stdout` and returns the
/// process exit status.
///
/// Exit status is 0 when every backend passes the self-test, 1 when a
/// backend mismatches or the requested backend is unusable, and 2 on a
/// command-line error.
#[must_use]
pub fn run_with<I, Out, ErrOut>(args: I, stdout: &mut Out, stderr: &mut ErrOut) -> ExitCode
where
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
    Out: Write,
    ErrOut: Write,
{
    let options = match parse_args(args) {
        Ok(options) => options,
        Err(error) => {
            let rendered = error.render().to_string();
            if error.use_stderr() {
                let _ = write!(stderr, "{rendered}");
                return ExitCode::from(2);
            }
            let _ = write!(stdout, "{rendered}");
            return ExitCode::SUCCESS;
        }
    };

    let dispatcher = match options.backend {
        Some(backend) => match Dispatcher::with_backend(backend) {
            Ok(dispatcher) => dispatcher,
            Err(error) => {
                let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
                return ExitCode::FAILURE;
            }
        },
        None => *batch_hash::global(),
    };

    match report(&dispatcher, options.self_test, stdout) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: self-test failed");
            ExitCode::FAILURE
        }
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: failed to write report: {error}");
            ExitCode::FAILURE
        }
    }
}

fn report<W: Write>(dispatcher: &Dispatcher, self_test: bool, out: &mut W) -> io::Result<bool> {
    writeln!(out, "{}", caps::detect())?;
    writeln!(
        out,
        "Selected backend: {} ({} lanes)",
        dispatcher.backend(),
        dispatcher.lanes()
    )?;

    let available = Dispatcher::available();
    let names: Vec<&str> = available.iter().map(|backend| backend.name()).collect();
    writeln!(out, "Available backends: {}", names.join(", "))?;

    if !self_test {
        return Ok(true);
    }

    writeln!(out, "Self-test ({SELF_TEST_INPUTS} inputs):")?;
    let inputs = self_test_inputs();
    let scalar = Dispatcher::scalar();
    let expected = (
        scalar.sha256_many(&inputs),
        scalar.ripemd160_many(&inputs),
        scalar.hash160_many(&inputs),
    );

    let mut passed = true;
    for backend in available {
        let ok = match backend {
            Backend::Scalar => scalar_matches_known_vectors(),
            _ => Dispatcher::with_backend(backend).is_ok_and(|candidate| {
                candidate.sha256_many(&inputs) == expected.0
                    && candidate.ripemd160_many(&inputs) == expected.1
                    && candidate.hash160_many(&inputs) == expected.2
            }),
        };
        passed &= ok;
        writeln!(out, "  {backend}: {}", if ok { "ok" } else { "MISMATCH" })?;
    }
    Ok(passed)
}

fn scalar_matches_known_vectors() -> bool {
    let zeros: Input = [0; 32];
    hex(&batch_hash::digest_sha256(&zeros)) == SHA256_OF_ZEROS
        && hex(&batch_hash::digest_ripemd160(&zeros)) == RIPEMD160_OF_ZEROS
}

fn self_test_inputs() -> Vec<Input> {
    (0..SELF_TEST_INPUTS)
        .map(|index| std::array::from_fn(|offset| (index * 131 + offset * 7) as u8))
        .collect()
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> (ExitCode, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let exit = run_with(args.iter().copied(), &mut stdout, &mut stderr);
        (
            exit,
            String::from_utf8(stdout).expect("stdout is UTF-8"),
            String::from_utf8(stderr).expect("stderr is UTF-8"),
        )
    }

    #[test]
    fn parses_backend_and_flags() {
        let options = parse_args(["lanehash-caps", "--backend", "SCALAR", "--no-self-test"]).unwrap();
        assert_eq!(
            options,
            Options {
                backend: Some(Backend::Scalar),
                self_test: false,
            }
        );
        assert!(parse_args(["lanehash-caps", "--backend", "mmx"]).is_err());
    }

    #[test]
    fn default_run_reports_and_self_tests() {
        let (exit, stdout, stderr) = run(&["lanehash-caps"]);
        assert_eq!(exit, ExitCode::SUCCESS, "{stderr}");
        assert!(stdout.starts_with("CPU features detected:"));
        assert!(stdout.contains("Selected backend:"));
        assert!(stdout.contains("  scalar: ok"));
        assert!(!stdout.contains("MISMATCH"));
    }

    #[test]
    fn pinned_scalar_backend_is_reported() {
        let (exit, stdout, _) = run(&["lanehash-caps", "--backend", "scalar", "--no-self-test"]);
        assert_eq!(exit, ExitCode::SUCCESS);
        assert!(stdout.contains("Selected backend: scalar (1 lanes)"));
        assert!(!stdout.contains("Self-test"));
    }

    #[test]
    fn help_goes_to_stdout() {
        let (exit, stdout, stderr) = run(&["lanehash-caps", "--help"]);
        assert_eq!(exit, ExitCode::SUCCESS);
        assert!(stdout.contains("Usage:"));
        assert!(stderr.is_empty());
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        let (exit, stdout, stderr) = run(&["lanehash-caps", "--definitely-invalid-option"]);
        assert_eq!(exit, ExitCode::from(2));
        assert!(stdout.is_empty());
        assert!(!stderr.is_empty());
    }

    #[test]
    fn known_vectors_hold_for_scalar() {
        assert!(scalar_matches_known_vectors());
    }
}
