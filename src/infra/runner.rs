//! External command execution with a persistent transcript
//!
//! Every command run through [`LoggedRunner`] is appended to the log file
//! with a dated header, and its merged stdout/stderr is streamed line by
//! line to both the log and the console while the process runs.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use crate::config::defaults::LOG_RULE;
use crate::error::CommandError;

/// Something that can execute a command line and record it in a log
pub trait Runner {
    /// Run `command` (program followed by its arguments), failing on nonzero exit
    fn run(&mut self, command: &[String], log: &Path) -> Result<(), CommandError>;
}

/// Runs commands as subprocesses, teeing their output to a log file
#[derive(Debug, Clone)]
pub struct LoggedRunner {
    echo: bool,
}

impl LoggedRunner {
    /// `echo` controls whether subprocess output is copied to stdout
    pub fn new(echo: bool) -> Self {
        Self { echo }
    }
}

impl Default for LoggedRunner {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Runner for LoggedRunner {
    fn run(&mut self, command: &[String], log: &Path) -> Result<(), CommandError> {
        let rendered = render_command(command);
        if self.echo {
            println!("INFO: Running \"{rendered}\"");
        } else {
            tracing::info!("Running \"{rendered}\"");
        }
        tracing::debug!("Logging to {}", log.display());

        let log_err = |e: io::Error| CommandError::Log {
            log: log.to_path_buf(),
            error: e.to_string(),
        };

        let mut logfile = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log)
            .map_err(log_err)?;
        write_header(&mut logfile, &rendered).map_err(log_err)?;

        let success = stream_command(command, &rendered, &mut logfile, self.echo)?;
        drop(logfile);

        if success {
            return Ok(());
        }

        match fs::read_to_string(log) {
            Ok(transcript) if self.echo => println!("{transcript}"),
            Ok(transcript) => eprintln!("{transcript}"),
            Err(e) => tracing::warn!("Could not read back {}: {e}", log.display()),
        }

        Err(CommandError::Failed {
            command: rendered,
            log: absolute(log),
        })
    }
}

fn write_header(logfile: &mut File, rendered: &str) -> io::Result<()> {
    writeln!(logfile, "{LOG_RULE}")?;
    writeln!(
        logfile,
        "log date: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    )?;
    writeln!(logfile, "{LOG_RULE}")?;
    writeln!(logfile)?;
    writeln!(logfile, "{rendered}")
}

/// Spawn the command and copy its output until it exits
///
/// Returns whether the process exited successfully.
fn stream_command(
    command: &[String],
    rendered: &str,
    logfile: &mut File,
    echo: bool,
) -> Result<bool, CommandError> {
    let spawn_err = |e: io::Error| CommandError::Spawn {
        command: rendered.to_string(),
        error: e.to_string(),
    };

    let (program, args) = command.split_first().ok_or_else(|| CommandError::Spawn {
        command: rendered.to_string(),
        error: "empty command line".to_string(),
    })?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_err)?;

    let (tx, rx) = mpsc::channel();
    let mut pumps = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        pumps.push(pump_lines(stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        pumps.push(pump_lines(stderr, tx.clone()));
    }
    drop(tx);

    let mut console = io::stdout();
    let mut echo = echo;
    for line in rx {
        if let Err(e) = logfile.write_all(line.as_bytes()) {
            tracing::warn!("Failed to write log line: {e}");
        }
        if echo {
            if let Err(e) = console
                .write_all(line.as_bytes())
                .and_then(|()| console.flush())
            {
                // The log still gets every line.
                tracing::warn!("Stopped echoing '{rendered}' to the console: {e}");
                echo = false;
            }
        }
    }

    for pump in pumps {
        if pump.join().is_err() {
            tracing::warn!("Output reader for '{rendered}' panicked; the log may be incomplete");
        }
    }

    let status = child.wait().map_err(spawn_err)?;
    tracing::debug!("'{rendered}' exited with {status}");
    Ok(status.success())
}

/// Forward lines from `source` until EOF; output is decoded lossily
fn pump_lines<R: Read + Send + 'static>(source: R, tx: Sender<String>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(source);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Err(e) => {
                    tracing::debug!("Stopped reading command output: {e}");
                    break;
                }
                Ok(_) => {
                    if tx.send(String::from_utf8_lossy(&buf).into_owned()).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

/// Join a command line for display, quoting arguments that contain spaces
pub fn render_command(command: &[String]) -> String {
    command
        .iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("\"{arg}\"")
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
