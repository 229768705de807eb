//! Splitting trailing arguments into package patterns and `go test` flags
//!
//! `go test` accepts flags and packages in any order. A flag that takes a
//! value consumes the next argument unless written as `-flag=value`, so the
//! split has to know which flags take values. Unknown flags are treated as
//! booleans. Everything after `-args` belongs to the test binary and is
//! forwarded untouched.

use crate::error::{CliError, CliResult};

/// Flags of `go test` and `go build` that take a separate value
const VALUE_FLAGS: &[&str] = &[
    // build flags
    "C",
    "asmflags",
    "buildmode",
    "compiler",
    "covermode",
    "coverpkg",
    "exec",
    "gccgoflags",
    "gcflags",
    "installsuffix",
    "ldflags",
    "mod",
    "modfile",
    "o",
    "overlay",
    "p",
    "pgo",
    "pkgdir",
    "tags",
    "toolexec",
    "vet",
    // test flags
    "bench",
    "benchtime",
    "blockprofile",
    "blockprofilerate",
    "count",
    "coverprofile",
    "cpu",
    "cpuprofile",
    "fuzz",
    "fuzzcachedir",
    "fuzzminimizetime",
    "fuzztime",
    "list",
    "memprofile",
    "memprofilerate",
    "mutexprofile",
    "mutexprofilefraction",
    "outputdir",
    "parallel",
    "run",
    "shuffle",
    "skip",
    "timeout",
    "trace",
];

/// Flags covrun sets itself
const RESERVED_FLAGS: &[&str] = &["coverprofile"];

/// Package patterns and flags, in their original relative order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitArgs {
    /// Package patterns handed to both `go list` and `go test`
    pub packages: Vec<String>,
    /// Flags handed to `go test` only
    pub flags: Vec<String>,
}

/// Bare flag name: no leading dashes, no `=value`, no `test.` prefix
fn flag_name(arg: &str) -> Option<(&str, bool)> {
    let body = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'))?;
    if body.is_empty() {
        return None;
    }
    let (name, inline_value) = body
        .split_once('=')
        .map_or((body, false), |(name, _)| (name, true));
    let name = name.strip_prefix("test.").unwrap_or(name);
    Some((name, inline_value))
}

/// Split `args` into package patterns and `go test` flags
///
/// # Errors
///
/// Returns [`CliError::InvalidArgument`] if a flag covrun controls is given,
/// or a value-taking flag is missing its value.
pub fn split(args: &[String]) -> CliResult<SplitArgs> {
    let mut split = SplitArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "-args" || arg == "--args" {
            split.flags.push(arg.clone());
            split.flags.extend(iter.by_ref().cloned());
            break;
        }

        let Some((name, inline_value)) = flag_name(arg) else {
            split.packages.push(arg.clone());
            continue;
        };

        if RESERVED_FLAGS.contains(&name) {
            return Err(CliError::invalid_argument(format!(
                "-{name} is set by covrun and cannot be passed through"
            )));
        }

        split.flags.push(arg.clone());
        if !inline_value && VALUE_FLAGS.contains(&name) {
            let value = iter.next().ok_or_else(|| {
                CliError::invalid_argument(format!("flag needs an argument: {arg}"))
            })?;
            split.flags.push(value.clone());
        }
    }

    Ok(split)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    mod split_tests {
        use super::*;

        #[test]
        fn test_packages_only() {
            let split = split(&args(&["./...", "example.com/a"])).unwrap();
            assert_eq!(split.packages, args(&["./...", "example.com/a"]));
            assert!(split.flags.is_empty());
        }

        #[test]
        fn test_empty() {
            assert_eq!(split(&[]).unwrap(), SplitArgs::default());
        }

        #[test]
        fn test_bool_flags_do_not_consume() {
            let split = split(&args(&["-v", "-race", "./a"])).unwrap();
            assert_eq!(split.flags, args(&["-v", "-race"]));
            assert_eq!(split.packages, args(&["./a"]));
        }

        #[test]
        fn test_value_flag_consumes_next() {
            let split = split(&args(&["-run", "TestX", "./a", "-count", "1"])).unwrap();
            assert_eq!(split.flags, args(&["-run", "TestX", "-count", "1"]));
            assert_eq!(split.packages, args(&["./a"]));
        }

        #[test]
        fn test_inline_value() {
            let split = split(&args(&["-run=TestX", "./a"])).unwrap();
            assert_eq!(split.flags, args(&["-run=TestX"]));
            assert_eq!(split.packages, args(&["./a"]));
        }

        #[test]
        fn test_double_dash_and_test_prefix() {
            let split = split(&args(&["--timeout", "30s", "-test.run", "X", "./a"])).unwrap();
            assert_eq!(split.flags, args(&["--timeout", "30s", "-test.run", "X"]));
            assert_eq!(split.packages, args(&["./a"]));
        }

        #[test]
        fn test_args_forwards_the_rest() {
            let split = split(&args(&["./a", "-args", "-custom", "pkg-like"])).unwrap();
            assert_eq!(split.packages, args(&["./a"]));
            assert_eq!(split.flags, args(&["-args", "-custom", "pkg-like"]));
        }

        #[test]
        fn test_unknown_flag_is_boolean() {
            let split = split(&args(&["-shiny", "./a"])).unwrap();
            assert_eq!(split.flags, args(&["-shiny"]));
            assert_eq!(split.packages, args(&["./a"]));
        }

        #[test]
        fn test_coverprofile_rejected() {
            for form in [
                args(&["-coverprofile", "x.out"]),
                args(&["-coverprofile=x.out"]),
                args(&["-test.coverprofile=x.out"]),
            ] {
                let err = split(&form).unwrap_err();
                assert!(matches!(err, CliError::InvalidArgument { .. }));
                assert!(err.to_string().contains("coverprofile"));
            }
        }

        #[test]
        fn test_missing_value() {
            let err = split(&args(&["./a", "-run"])).unwrap_err();
            assert!(err.to_string().contains("flag needs an argument: -run"));
        }

        #[test]
        fn test_lone_dash_is_a_package() {
            let split = split(&args(&["-"])).unwrap();
            assert_eq!(split.packages, args(&["-"]));
        }
    }
}
