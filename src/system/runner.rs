//! Subprocess seam for host effects.
//!
//! Every OS interaction goes through [`CommandRunner`] so the effect
//! modules can be exercised with a scripted runner on any host.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use crate::error::EffectError;

/// Captured result of one finished command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `-1` when the process was killed by a signal.
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

pub trait CommandRunner {
    /// Run `program` with `args` to completion, feeding `stdin` if given.
    fn run(
        &mut self,
        program: &str,
        args: &[&str],
        stdin: Option<&str>,
    ) -> Result<CommandOutput, EffectError>;
}

/// Runs real processes with `std::process::Command`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &mut self,
        program: &str,
        args: &[&str],
        stdin: Option<&str>,
    ) -> Result<CommandOutput, EffectError> {
        let spawn_error = |source| EffectError::Spawn {
            command: command_line(program, args),
            source,
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            match pipe.write_all(input.as_bytes()) {
                Ok(()) => {}
                // The child quit without reading everything; its exit status says why.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(e.into());
                }
            }
            // Pipe dropped here so the child sees EOF.
        }

        let output = child.wait_with_output()?;
        Ok(CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        })
    }
}

/// Human-readable command line for logs and errors.
pub fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Run a command and return its stdout, failing on a non-zero exit.
pub fn run_checked<R: CommandRunner + ?Sized>(
    runner: &mut R,
    program: &str,
    args: &[&str],
) -> Result<String, EffectError> {
    run_checked_with_input(runner, program, args, None)
}

pub fn run_checked_with_input<R: CommandRunner + ?Sized>(
    runner: &mut R,
    program: &str,
    args: &[&str],
    stdin: Option<&str>,
) -> Result<String, EffectError> {
    let output = runner.run(program, args, stdin)?;
    if output.success() {
        Ok(output.stdout)
    } else {
        Err(EffectError::CommandFailed {
            command: command_line(program, args),
            status: output.status,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::*;

    /// One recorded invocation.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Call {
        pub line: String,
        pub stdin: Option<String>,
    }

    /// Replays canned outputs keyed by command-line prefix and records
    /// every call. Unmatched commands succeed with empty output.
    #[derive(Default)]
    pub struct ScriptedRunner {
        rules: Vec<(String, CommandOutput)>,
        pub calls: Vec<Call>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, prefix: &str, stdout: &str) -> Self {
            self.rules.push((
                prefix.to_owned(),
                CommandOutput {
                    status: 0,
                    stdout: stdout.to_owned(),
                    stderr: String::new(),
                },
            ));
            self
        }

        pub fn fail(mut self, prefix: &str, status: i32, stderr: &str) -> Self {
            self.rules.push((
                prefix.to_owned(),
                CommandOutput {
                    status,
                    stdout: String::new(),
                    stderr: stderr.to_owned(),
                },
            ));
            self
        }

        pub fn lines(&self) -> Vec<&str> {
            self.calls.iter().map(|c| c.line.as_str()).collect()
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(
            &mut self,
            program: &str,
            args: &[&str],
            stdin: Option<&str>,
        ) -> Result<CommandOutput, EffectError> {
            let line = command_line(program, args);
            self.calls.push(Call {
                line: line.clone(),
                stdin: stdin.map(str::to_owned),
            });
            Ok(self
                .rules
                .iter()
                .find(|(prefix, _)| line.starts_with(prefix.as_str()))
                .map(|(_, out)| out.clone())
                .unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::scripted::ScriptedRunner;
    use super::*;

    #[test]
    fn command_line_joins_arguments() {
        assert_eq!(command_line("sudo", &["mount", "/dev/sda1"]), "sudo mount /dev/sda1");
        assert_eq!(command_line("reboot", &[]), "reboot");
    }

    #[test]
    fn run_checked_surfaces_exit_status() {
        let mut runner = ScriptedRunner::new().fail("sudo mount", 32, "wrong fs type");
        let err = run_checked(&mut runner, "sudo", &["mount", "/dev/sda1", "/mnt/usb0"])
            .unwrap_err();
        match err {
            EffectError::CommandFailed {
                command,
                status,
                stderr,
            } => {
                assert_eq!(command, "sudo mount /dev/sda1 /mnt/usb0");
                assert_eq!(status, 32);
                assert_eq!(stderr, "wrong fs type");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn run_checked_returns_stdout() {
        let mut runner = ScriptedRunner::new().respond("ip", "output");
        assert_eq!(run_checked(&mut runner, "ip", &["addr"]).unwrap(), "output");
    }

    #[test]
    fn child_exiting_before_reading_stdin_reports_its_status() {
        let input = "x".repeat(1 << 20);
        let err = run_checked_with_input(
            &mut SystemRunner,
            "sh",
            &["-c", "echo denied >&2; exit 3"],
            Some(input.as_str()),
        )
        .unwrap_err();
        match err {
            EffectError::CommandFailed { status, stderr, .. } => {
                assert_eq!(status, 3);
                assert_eq!(stderr, "denied");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stdin_reaches_the_child() {
        let out = run_checked_with_input(&mut SystemRunner, "cat", &[], Some("fstab line\n")).unwrap();
        assert_eq!(out, "fstab line\n");
    }

    #[test]
    fn system_runner_reports_missing_binary() {
        let mut runner = SystemRunner;
        let err = runner
            .run("jellybox-definitely-not-a-binary", &[], None)
            .unwrap_err();
        assert!(matches!(err, EffectError::Spawn { .. }));
    }
}
