use std::time::Duration;

use chrono::NaiveDateTime;
use log::{info, warn};
use suppaftp::{FtpStream, Mode};

use crate::error::{PipelineError, PipelineResult};

const SESSION_TIMEOUT: Duration = Duration::from_secs(30);
const OUTER_RETRY_ATTEMPTS: u32 = 3;
const OUTER_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// A stateful FTP mirror session: the TNDS FTP server drops idle
/// connections, so every remote operation is preceded by a `NOOP` liveness
/// probe and a silent reconnect if that probe fails.
pub struct MirrorSession {
    host: String,
    username: String,
    password: String,
    stream: FtpStream,
}

impl MirrorSession {
    pub fn connect(host: &str, username: &str, password: &str) -> PipelineResult<Self> {
        let mut stream = FtpStream::connect_timeout(host, SESSION_TIMEOUT)
            .map_err(|why| PipelineError::FtpDropped(why.to_string()))?;
        stream.set_mode(Mode::Passive);
        stream
            .login(username, password)
            .map_err(|why| PipelineError::FtpDropped(why.to_string()))?;

        Ok(Self {
            host: host.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            stream,
        })
    }

    fn ensure_alive(&mut self) -> PipelineResult<()> {
        if self.stream.noop().is_ok() {
            return Ok(());
        }
        warn!("ftp session to {} went stale, reconnecting", self.host);
        *self = Self::connect(&self.host, &self.username, &self.password)?;
        Ok(())
    }

    /// Returns the server's modification time for `path`, or `None` if the
    /// server does not support `MDTM` for it.
    pub fn modified_at(&mut self, path: &str) -> PipelineResult<Option<NaiveDateTime>> {
        self.ensure_alive()?;
        match self.stream.mdtm(path) {
            Ok(time) => Ok(Some(time)),
            Err(_) => Ok(None),
        }
    }

    /// Whether the remote file at `path` is newer than `local_mtime` - or
    /// has no recorded local mtime to compare against at all.
    pub fn is_newer_than(
        &mut self,
        path: &str,
        local_mtime: Option<NaiveDateTime>,
    ) -> PipelineResult<bool> {
        let remote_mtime = self.modified_at(path)?;
        Ok(match (remote_mtime, local_mtime) {
            (Some(remote), Some(local)) => remote > local,
            _ => true,
        })
    }

    pub fn download(&mut self, path: &str) -> PipelineResult<Vec<u8>> {
        self.ensure_alive()?;
        let cursor = self
            .stream
            .retr_as_buffer(path)
            .map_err(|why| PipelineError::FtpDropped(why.to_string()))?;
        Ok(cursor.into_inner())
    }

    pub fn list(&mut self, path: &str) -> PipelineResult<Vec<String>> {
        self.ensure_alive()?;
        self.stream
            .nlst(Some(path))
            .map_err(|why| PipelineError::FtpDropped(why.to_string()))
    }
}

/// Retries a transient FTP operation up to [`OUTER_RETRY_ATTEMPTS`] times,
/// sleeping [`OUTER_RETRY_INTERVAL`] between attempts.
pub fn with_retry<T>(
    mut operation: impl FnMut() -> PipelineResult<T>,
) -> PipelineResult<T> {
    let mut last_error = None;
    for attempt in 1..=OUTER_RETRY_ATTEMPTS {
        match operation() {
            Ok(value) => return Ok(value),
            Err(why) => {
                warn!("ftp attempt {attempt}/{OUTER_RETRY_ATTEMPTS} failed: {why}");
                last_error = Some(why);
                std::thread::sleep(OUTER_RETRY_INTERVAL);
            }
        }
    }
    info!("ftp operation exhausted all retries");
    Err(last_error.expect("loop runs at least once"))
}
