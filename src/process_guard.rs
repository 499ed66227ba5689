//! Lifetime management for generator and installer processes
//!
//! A scaffold run shells out to `npx`, `npm`, `pip` and friends. If headstart
//! is interrupted, those children must not keep writing into a half-built
//! project directory.
//!
//! - Every child gets its own process group, so signalling the group reaches
//!   the tools it spawned in turn (`npx` -> `node` -> `npm`)
//! - Live children are tracked in a process-wide [`ChildRegistry`]
//! - SIGINT/SIGTERM/SIGHUP and [`ProcessGuard`] drop terminate the registry:
//!   SIGTERM first, SIGKILL once the grace period runs out
//! - On Linux the child also gets `PR_SET_PDEATHSIG`, covering a parent crash

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::collections::HashSet;
use std::process::Command;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

static CHILD_REGISTRY: OnceLock<Arc<Mutex<ChildRegistry>>> = OnceLock::new();

/// Grace period on normal shutdown
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Grace period after an interrupt; the user is waiting
pub const SIGNAL_GRACE: Duration = Duration::from_secs(3);

/// Process group leaders of running children
#[derive(Debug, Default)]
pub struct ChildRegistry {
    pids: HashSet<u32>,
    terminating: bool,
}

impl ChildRegistry {
    /// The registry shared by the whole process
    pub fn global() -> Arc<Mutex<ChildRegistry>> {
        CHILD_REGISTRY
            .get_or_init(|| Arc::new(Mutex::new(ChildRegistry::default())))
            .clone()
    }

    pub fn register(&mut self, pid: u32) {
        self.pids.insert(pid);
        debug!(pid, "Child registered");
    }

    pub fn unregister(&mut self, pid: u32) {
        if self.pids.remove(&pid) {
            debug!(pid, "Child unregistered");
        }
    }

    pub fn count(&self) -> usize {
        self.pids.len()
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.pids.contains(&pid)
    }

    /// SIGTERM every tracked group, wait up to `grace`, then SIGKILL.
    ///
    /// Runs at most once per registry.
    pub fn terminate_all(&mut self, grace: Duration) {
        if self.terminating {
            debug!("Termination already in progress");
            return;
        }
        self.terminating = true;

        let pids: Vec<u32> = self.pids.drain().collect();
        if pids.is_empty() {
            return;
        }
        info!(count = pids.len(), "Terminating child processes");

        for &pid in &pids {
            signal_group_or_process(pid, Signal::SIGTERM);
        }

        let deadline = Instant::now() + grace;
        while Instant::now() < deadline {
            if !pids.iter().any(|&pid| is_process_alive(pid)) {
                debug!("All children exited after SIGTERM");
                return;
            }
            std::thread::sleep(Duration::from_millis(100));
        }

        for &pid in pids.iter().filter(|&&pid| is_process_alive(pid)) {
            warn!(pid, "Child ignored SIGTERM, sending SIGKILL");
            signal_group_or_process(pid, Signal::SIGKILL);
        }
    }
}

/// Signal the whole group led by `pid`, falling back to the process itself.
fn signal_group_or_process(pid: u32, sig: Signal) {
    let raw = pid as i32;
    if let Err(group_err) = signal::kill(Pid::from_raw(-raw), sig) {
        debug!(pid, %group_err, "Group signal failed, signalling process");
        if let Err(e) = signal::kill(Pid::from_raw(raw), sig) {
            debug!(pid, %e, "Process already gone");
        }
    }
}

/// Running, or at least not a zombie
fn is_process_alive(pid: u32) -> bool {
    if signal::kill(Pid::from_raw(pid as i32), None).is_err() {
        return false;
    }

    // Third field of /proc/<pid>/stat is the state letter
    match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Ok(stat) => !matches!(stat.split_whitespace().nth(2), Some("Z" | "X")),
        Err(_) => true,
    }
}

/// Keeps a child in the global registry for as long as it is alive.
///
/// Dropping the handle unregisters the PID.
#[derive(Debug)]
pub struct RegisteredChild {
    pid: u32,
}

impl RegisteredChild {
    pub fn register(pid: u32) -> Self {
        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.register(pid);
        }
        Self { pid }
    }
}

impl Drop for RegisteredChild {
    fn drop(&mut self) {
        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.unregister(self.pid);
        }
    }
}

/// Terminates whatever is still registered when it goes out of scope.
///
/// Held by `main` for the duration of a run.
pub struct ProcessGuard {
    registry: Arc<Mutex<ChildRegistry>>,
}

impl ProcessGuard {
    pub fn new() -> Self {
        Self {
            registry: ChildRegistry::global(),
        }
    }
}

impl Default for ProcessGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if let Ok(mut registry) = self.registry.lock() {
            registry.terminate_all(SHUTDOWN_GRACE);
        }
    }
}

/// Install SIGINT/SIGTERM/SIGHUP handling.
///
/// A background thread waits for the signal, terminates registered
/// children and exits with `128 + signal`. Call once, early in `main`.
pub fn init_signal_handlers() -> std::io::Result<()> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;

    std::thread::Builder::new()
        .name("signal-handler".into())
        .spawn(move || {
            if let Some(sig) = signals.forever().next() {
                let name = match sig {
                    SIGINT => "SIGINT",
                    SIGTERM => "SIGTERM",
                    _ => "SIGHUP",
                };
                warn!(signal = name, "Interrupted, stopping child processes");
                eprintln!("\nInterrupted. Stopping running commands...");

                if let Ok(mut registry) = ChildRegistry::global().lock() {
                    registry.terminate_all(SIGNAL_GRACE);
                }
                std::process::exit(128 + sig);
            }
        })?;

    Ok(())
}

/// Process-group setup for spawned commands
pub trait CommandProcessGroup {
    /// Run the command as leader of a fresh process group.
    fn in_new_process_group(&mut self) -> &mut Self;
}

impl CommandProcessGroup for Command {
    fn in_new_process_group(&mut self) -> &mut Self {
        use std::os::unix::process::CommandExt;

        self.process_group(0);

        #[cfg(target_os = "linux")]
        {
            use nix::libc;
            // SAFETY: prctl is async-signal-safe and touches no parent state
            unsafe {
                self.pre_exec(|| {
                    if libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM) == -1 {
                        return Err(std::io::Error::last_os_error());
                    }
                    Ok(())
                });
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};

    /// Reap `pid` or observe that it is gone
    fn wait_for_exit(pid: u32, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            match waitpid(Pid::from_raw(pid as i32), Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => return true,
                Err(nix::errno::Errno::ECHILD) if !is_process_alive(pid) => return true,
                _ => {}
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_register_unregister() {
        let mut registry = ChildRegistry::default();
        registry.register(1234);
        registry.register(5678);
        assert_eq!(registry.count(), 2);
        assert!(registry.contains(1234));

        registry.unregister(1234);
        assert_eq!(registry.count(), 1);
        assert!(!registry.contains(1234));
    }

    #[test]
    fn test_registered_child_unregisters_on_drop() {
        // fake pid, never signalled
        let pid = 4_000_001;
        {
            let _child = RegisteredChild::register(pid);
            assert!(ChildRegistry::global().lock().unwrap().contains(pid));
        }
        assert!(!ChildRegistry::global().lock().unwrap().contains(pid));
    }

    #[test]
    fn test_terminate_all_kills_process_group() {
        let child = Command::new("sh")
            .args(["-c", "sleep 60"])
            .in_new_process_group()
            .spawn()
            .unwrap();
        let pid = child.id();

        let mut registry = ChildRegistry::default();
        registry.register(pid);
        assert!(is_process_alive(pid));

        registry.terminate_all(Duration::from_millis(500));

        assert!(wait_for_exit(pid, Duration::from_secs(2)));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_terminate_all_runs_once() {
        let mut registry = ChildRegistry::default();
        registry.terminate_all(Duration::from_millis(10));
        assert!(registry.terminating);

        // a pid added afterwards is left alone
        registry.register(4_000_002);
        registry.terminate_all(Duration::from_millis(10));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_terminate_all_tolerates_reaped_child() {
        let mut child = Command::new("sh").args(["-c", "exit 0"]).spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();

        let mut registry = ChildRegistry::default();
        registry.register(pid);
        registry.terminate_all(Duration::from_millis(100));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_is_process_alive_nonexistent() {
        assert!(!is_process_alive(999_999));
    }
}
