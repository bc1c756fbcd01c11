//! Engine adapter that runs an external partitioner process.
//!
//! The document is written to the child's stdin; the child must print element
//! JSON (see [`crate::unstructured`]) on stdout and exit successfully.

use std::ffi::OsString;
use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use super::LayoutEngine;
use super::params::PartitionParams;
use crate::element::Chunk;
use crate::error::{ChunkError, Result};
use crate::unstructured::parse_chunks;

/// Runs `program [args..] <partition flags>` once per document.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandEngine {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument placed before the partition flags.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn command(&self, params: &PartitionParams) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .args(params.to_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl LayoutEngine for CommandEngine {
    fn partition(&self, document: &[u8], params: &PartitionParams) -> Result<Vec<Chunk>> {
        let program = self.program.to_string_lossy();
        debug!(program = %program, bytes = document.len(), "spawning partitioner");

        let mut child = self.command(params).spawn().map_err(|e| {
            ChunkError::UpstreamParsing(format!("failed to execute {program}: {e}"))
        })?;
        let mut stdin = child.stdin.take().ok_or_else(|| {
            ChunkError::UpstreamParsing(format!("{program}: stdin not captured"))
        })?;

        // Feed stdin from a separate thread so a child that streams output
        // before draining its input cannot deadlock us.
        let output = std::thread::scope(|scope| {
            let writer = scope.spawn(move || {
                let res = stdin.write_all(document);
                drop(stdin);
                res
            });
            let output = child.wait_with_output();
            let write_res = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (output, write_res)
        });

        let output = match output {
            (Ok(output), _) if !output.status.success() => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(ChunkError::UpstreamParsing(format!(
                    "{program} failed ({}): {}",
                    output.status,
                    stderr.trim()
                )));
            }
            (Ok(output), Ok(())) => output,
            // A successful child that stopped reading early closes the pipe;
            // its output is still authoritative.
            (Ok(output), Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => output,
            (Ok(_), Err(e)) => {
                return Err(ChunkError::UpstreamParsing(format!(
                    "failed to write document to {program}: {e}"
                )));
            }
            (Err(e), _) => {
                return Err(ChunkError::UpstreamParsing(format!(
                    "failed to wait for {program}: {e}"
                )));
            }
        };

        debug!(bytes = output.stdout.len(), "partitioner finished");
        parse_chunks(&output.stdout)
    }
}
