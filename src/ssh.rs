use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ssh2::{CheckResult, KnownHostFileKind, Session};

use crate::transfer::RemoteCopy;

pub(crate) const SSH_PORT: u16 = 22;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default)]
pub(crate) struct ConnectOptions {
    /// Known-hosts file to verify the server key against.
    pub(crate) known_hosts: Option<PathBuf>,
    /// Skip host-key verification entirely.
    pub(crate) accept_any_host_key: bool,
}

pub(crate) struct ScpSession {
    session: Session,
    closed: bool,
}

impl ScpSession {
    pub(crate) fn connect(
        host: &str,
        user: &str,
        password: &str,
        options: &ConnectOptions,
    ) -> Result<Self> {
        let tcp = connect_tcp(host)?;

        let mut session = Session::new().context("create session")?;
        session.set_timeout(CONNECT_TIMEOUT.as_millis() as u32);
        session.set_tcp_stream(tcp);
        session.handshake().context("ssh handshake")?;

        if !options.accept_any_host_key {
            verify_host_key(&session, host, options.known_hosts.as_deref())?;
        }

        session
            .userauth_password(user, password)
            .context("password auth")?;
        if !session.authenticated() {
            anyhow::bail!("Authentication failed");
        }
        // Transfers block for as long as the copy takes.
        session.set_timeout(0);

        Ok(Self {
            session,
            closed: false,
        })
    }

    pub(crate) fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.session
            .disconnect(None, "transfer finished", None)
            .ok();
    }
}

impl Drop for ScpSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl RemoteCopy for ScpSession {
    fn upload(
        &mut self,
        local: &mut dyn Read,
        size: u64,
        remote_path: &str,
        mode: i32,
    ) -> Result<()> {
        let mut channel = self
            .session
            .scp_send(Path::new(remote_path), mode, size, None)
            .with_context(|| format!("start upload to {remote_path}"))?;
        io::copy(local, &mut channel).context("write remote file")?;
        channel.send_eof().context("send eof")?;
        channel.wait_eof().context("wait eof")?;
        channel.close().context("close channel")?;
        channel.wait_close().context("wait close")?;
        Ok(())
    }

    fn download(&mut self, remote_path: &str, local: &mut dyn Write) -> Result<u64> {
        let (mut channel, stat) = self
            .session
            .scp_recv(Path::new(remote_path))
            .with_context(|| format!("start download of {remote_path}"))?;
        let copied = io::copy(&mut Read::by_ref(&mut channel).take(stat.size()), local)
            .context("read remote file")?;
        if copied < stat.size() {
            anyhow::bail!("remote file truncated after {copied} of {} bytes", stat.size());
        }
        channel.send_eof().ok();
        channel.wait_eof().ok();
        channel.close().ok();
        channel.wait_close().ok();
        Ok(copied)
    }

    fn download_dir(&mut self, remote_dir: &str, local_dir: &Path) -> Result<u64> {
        let sftp = self.session.sftp().context("open sftp")?;
        download_dir(&sftp, remote_dir, local_dir)
    }
}

fn connect_tcp(host: &str) -> Result<TcpStream> {
    let address = format!("{host}:{SSH_PORT}");
    let mut last_err = None;
    for addr in address.to_socket_addrs().context("resolve address")? {
        match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = Some(err),
        }
    }
    let err = last_err.unwrap_or_else(|| io::Error::other("no address resolved"));
    Err(anyhow::anyhow!("connect tcp failed: {err}"))
}

fn verify_host_key(session: &Session, host: &str, known_hosts: Option<&Path>) -> Result<()> {
    let path = match known_hosts {
        Some(path) => path.to_path_buf(),
        None => default_known_hosts().context("locate known_hosts")?,
    };
    let mut hosts = session.known_hosts().context("init known hosts")?;
    hosts
        .read_file(&path, KnownHostFileKind::OpenSSH)
        .with_context(|| format!("read {}", path.display()))?;
    let (key, _) = session
        .host_key()
        .ok_or_else(|| anyhow::anyhow!("server sent no host key"))?;
    match hosts.check_port(host, SSH_PORT, key) {
        CheckResult::Match => Ok(()),
        CheckResult::NotFound => anyhow::bail!(
            "host key for {host} not found in {} (use --accept-any-host-key to skip)",
            path.display()
        ),
        CheckResult::Mismatch => {
            anyhow::bail!("host key for {host} does not match {}", path.display())
        }
        CheckResult::Failure => anyhow::bail!("host key check failed for {host}"),
    }
}

fn default_known_hosts() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("no home directory"))?;
    Ok(home.join(".ssh").join("known_hosts"))
}

fn download_dir(sftp: &ssh2::Sftp, remote_dir: &str, local_dir: &Path) -> Result<u64> {
    fs::create_dir_all(local_dir)
        .with_context(|| format!("create local dir {}", local_dir.display()))?;
    let mut total = 0u64;
    for (path, stat) in sftp
        .readdir(Path::new(remote_dir))
        .with_context(|| format!("read remote dir {remote_dir}"))?
    {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("/"));
        if name == "." || name == ".." {
            continue;
        }
        let remote_path = crate::model::join_remote(remote_dir, &name);
        let local_path = local_dir.join(&name);
        if stat.is_dir() {
            total = total.saturating_add(download_dir(sftp, &remote_path, &local_path)?);
        } else {
            let mut remote = sftp
                .open(Path::new(&remote_path))
                .with_context(|| format!("open remote file {remote_path}"))?;
            let mut local = File::create(&local_path)
                .with_context(|| format!("create local file {}", local_path.display()))?;
            let copied = io::copy(&mut remote, &mut local)
                .with_context(|| format!("copy {remote_path}"))?;
            total = total.saturating_add(copied);
        }
    }
    Ok(total)
}
