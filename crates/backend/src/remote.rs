// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The remote execution backend (spec.md §4.3): an interactive SSH session
//! plus its SFTP subchannel, driven through `ssh2`.

use crate::backend::{BackendError, DirEntryAttr, ExecutionBackend, OutputHandler};
use async_trait::async_trait;
use chrono::Utc;
use ssh2::Session;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::block_in_place;

/// An SSH/SFTP-backed execution session against one remote host.
///
/// `ssh2` is a synchronous, blocking API. Every method that touches the
/// session or the SFTP subchannel runs its blocking body inside
/// `block_in_place` rather than `spawn_blocking`, because the closures
/// borrow `&mut self` and `spawn_blocking` would require them to be
/// `'static`.
pub struct RemoteBackend {
    hostname: String,
    port: u16,
    username: String,
    session: Option<Session>,
    cwd: PathBuf,
}

impl RemoteBackend {
    pub fn new(hostname: impl Into<String>, port: u16, username: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            username: username.into(),
            session: None,
            cwd: PathBuf::from("."),
        }
    }

    fn session(&self) -> Result<&Session, BackendError> {
        self.session.as_ref().ok_or(BackendError::NotConnected)
    }

    fn remote_path(&self, filename: &str) -> PathBuf {
        self.cwd.join(filename)
    }
}

#[async_trait]
impl ExecutionBackend for RemoteBackend {
    /// Password auth is attempted first when a password is supplied,
    /// falling back to public-key auth (spec.md §4.3). When no key path is
    /// given, the default `~/.ssh/id_rsa.pub` is tried before giving up,
    /// matching the original's `_start_client` expansion of
    /// `public_key_filename`. Host keys are trusted on first use: no pinned
    /// known-hosts check is performed, matching the original's lack of
    /// host-key verification.
    async fn connect(
        &mut self,
        password: Option<&str>,
        public_key_path: Option<&Path>,
    ) -> Result<(), BackendError> {
        let hostname = self.hostname.clone();
        let port = self.port;
        let username = self.username.clone();
        let password = password.map(str::to_string);
        let public_key_path = resolve_public_key_path(public_key_path);

        tracing::info!(hostname = %hostname, port, username = %username, "connecting");

        let session = block_in_place(move || -> Result<Session, BackendError> {
            let tcp = TcpStream::connect((hostname.as_str(), port))?;
            let mut session = Session::new().map_err(BackendError::Ssh)?;
            session.set_tcp_stream(tcp);
            session.handshake().map_err(BackendError::Ssh)?;

            if let Some(password) = password {
                session
                    .userauth_password(&username, &password)
                    .map_err(|_| BackendError::IncorrectPassword)?;
            } else if let Some(public_key_path) = public_key_path {
                session
                    .userauth_pubkey_file(&username, None, &public_key_path, None)
                    .map_err(|_| BackendError::IncorrectPublicKey)?;
            } else {
                return Err(BackendError::MissingCredential);
            }

            if !session.authenticated() {
                return Err(BackendError::IncorrectPassword);
            }
            Ok(session)
        });

        let session = match session {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "authentication error");
                return Err(e);
            }
        };

        self.session = Some(session);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.session = None;
        Ok(())
    }

    /// Walks `dir` from the root, `mkdir`-ing each segment that is absent
    /// (spec.md §4.2, §4.3: "create the directory and any missing
    /// parents"). `libssh2`'s `mkdir` is single-level, not `-p`, so a
    /// segment has to be created before the next one can be entered.
    async fn chdir(&mut self, dir: &Path) -> Result<(), BackendError> {
        let target = self.cwd.join(dir);
        let session = self.session()?.clone();
        let walk_target = target.clone();
        block_in_place(move || -> Result<(), BackendError> {
            let sftp = session.sftp().map_err(BackendError::Ssh)?;
            let mut current = PathBuf::new();
            for segment in walk_target.components() {
                current.push(segment);
                if sftp.stat(&current).is_err() {
                    sftp.mkdir(&current, 0o755).map_err(BackendError::Ssh)?;
                }
            }
            Ok(())
        })?;
        self.cwd = target;
        Ok(())
    }

    async fn write_file(&mut self, filename: &str, contents: &[u8]) -> Result<(), BackendError> {
        let session = self.session()?.clone();
        let path = self.remote_path(filename);
        let contents = contents.to_vec();
        block_in_place(move || -> Result<(), BackendError> {
            let sftp = session.sftp().map_err(BackendError::Ssh)?;
            let mut file = sftp.create(&path).map_err(BackendError::Ssh)?;
            file.write_all(&contents)?;
            Ok(())
        })
    }

    async fn read_file(&mut self, filename: &str) -> Result<Vec<u8>, BackendError> {
        let session = self.session()?.clone();
        let path = self.remote_path(filename);
        block_in_place(move || -> Result<Vec<u8>, BackendError> {
            let sftp = session.sftp().map_err(BackendError::Ssh)?;
            let mut file = sftp.open(&path).map_err(BackendError::Ssh)?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            Ok(buf)
        })
    }

    async fn listdir_attr(&mut self) -> Result<Vec<DirEntryAttr>, BackendError> {
        let session = self.session()?.clone();
        let path = self.cwd.clone();
        block_in_place(move || -> Result<Vec<DirEntryAttr>, BackendError> {
            let sftp = session.sftp().map_err(BackendError::Ssh)?;
            let entries = sftp.readdir(&path).map_err(BackendError::Ssh)?;
            Ok(entries
                .into_iter()
                .map(|(path, stat)| DirEntryAttr {
                    filename: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    mtime_seconds: stat.mtime.unwrap_or(0) as i64,
                })
                .collect())
        })
    }

    /// Composes `cd <workdir> && [timeout <secs>s] <argv...>` as a single
    /// POSIX-quoted shell line and runs it over an exec channel, polling
    /// stdout, then stderr, then exit status in that fixed order on each
    /// pass until the channel reports EOF (spec.md §4.3).
    async fn exec_command(
        &mut self,
        argv: &[String],
        workdir: &Path,
        timeout: Option<Duration>,
        on_stdout: OutputHandler<'_>,
        on_stderr: OutputHandler<'_>,
    ) -> Result<bool, BackendError> {
        let session = self.session()?.clone();
        let cwd = self.cwd.join(workdir);
        let line = compose_command_line(&cwd, argv, timeout);

        let mut channel = block_in_place(|| session.channel_session())
            .map_err(BackendError::Ssh)?;
        block_in_place(|| channel.exec(&line)).map_err(BackendError::Ssh)?;

        let mut stdout_buf = [0u8; 1024];
        let mut stderr_buf = [0u8; 1024];
        loop {
            let stdout_read = block_in_place(|| channel.read(&mut stdout_buf));
            match stdout_read {
                Ok(0) => {}
                Ok(n) => emit_chunk(&stdout_buf[..n], on_stdout),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                Err(e) => return Err(BackendError::Io(e)),
            }

            let stderr_read = block_in_place(|| channel.stderr().read(&mut stderr_buf));
            match stderr_read {
                Ok(0) => {}
                Ok(n) => emit_chunk(&stderr_buf[..n], on_stderr),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                Err(e) => return Err(BackendError::Io(e)),
            }

            if block_in_place(|| channel.eof()) {
                break;
            }
        }

        block_in_place(|| channel.wait_close()).map_err(BackendError::Ssh)?;
        let status = block_in_place(|| channel.exit_status()).map_err(BackendError::Ssh)?;
        Ok(status == 0)
    }

    async fn deploy_key(&mut self, public_key_path: &Path) -> Result<(), BackendError> {
        let key = crate::keys::read_public_key(public_key_path)?;
        let script = crate::keys::deploy_script(&key);
        self.run_script(&script).await
    }

    /// Uploads a `sed`-based removal script to a unique `/tmp` path and runs
    /// it with `bash` (spec.md §4.8), matching the original's
    /// `django-remote-submission-<uuid>` temp-file mechanism rather than
    /// filtering `authorized_keys` inline over the exec channel.
    async fn delete_key(&mut self, public_key_path: &Path) -> Result<(), BackendError> {
        let key = crate::keys::read_public_key(public_key_path)?;
        let body = crate::keys::delete_script_body(&key);
        let remote_path = crate::keys::unique_script_path();

        self.write_file(&remote_path, body.as_bytes()).await?;
        self.run_script(&format!("bash {}", shell_escape(&remote_path)))
            .await
    }
}

impl RemoteBackend {
    async fn run_script(&mut self, script: &str) -> Result<(), BackendError> {
        let session = self.session()?.clone();
        let mut channel = block_in_place(|| session.channel_session())
            .map_err(BackendError::Ssh)?;
        block_in_place(|| channel.exec(script)).map_err(BackendError::Ssh)?;
        block_in_place(|| channel.wait_close()).map_err(BackendError::Ssh)?;
        let status = block_in_place(|| channel.exit_status()).map_err(BackendError::Ssh)?;
        if status == 0 {
            Ok(())
        } else {
            Err(BackendError::Io(std::io::Error::other(format!(
                "key script exited with status {status}"
            ))))
        }
    }
}

/// Resolves the public-key path `connect` should try: the caller's
/// explicit choice if given, otherwise `default_public_key_path()` when a
/// file actually exists there, otherwise `None` (spec.md §4.3's
/// authentication fallback, matching the original's `_start_client`
/// expansion of `public_key_filename`).
fn resolve_public_key_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = crate::backend::default_public_key_path();
            default.is_file().then_some(default)
        }
    }
}

fn compose_command_line(workdir: &Path, argv: &[String], timeout: Option<Duration>) -> String {
    let mut parts = vec![
        "cd".to_string(),
        shell_escape(&workdir.to_string_lossy()),
        "&&".to_string(),
    ];
    if let Some(timeout) = timeout {
        parts.push("timeout".to_string());
        parts.push(format!("{}s", timeout.as_secs()));
    }
    parts.extend(argv.iter().map(|a| shell_escape(a)));
    parts.join(" ")
}

fn shell_escape(value: &str) -> String {
    shell_escape::escape(value.into()).into_owned()
}

/// Decodes one raw read as UTF-8 and hands it to the handler verbatim — no
/// line-splitting, no newline-stripping (spec.md §4.3: "decode UTF-8,
/// deliver to `on_stdout(now, chunk)`"). Downstream consumers (the log
/// ingestion buffer) rely on chunks carrying their original framing so
/// that `TOTAL`'s in-order concatenation reproduces the exact output text
/// (spec.md §8 property 4).
fn emit_chunk(bytes: &[u8], on_chunk: &mut dyn FnMut(chrono::DateTime<Utc>, &str)) {
    let text = String::from_utf8_lossy(bytes);
    on_chunk(Utc::now(), &text);
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
