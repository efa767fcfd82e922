//! Table of Linux signal names accepted by the Kill command.

pub const DEFAULT_KILL_SIGNAL: &str = "SIGKILL";

const LINUX_SIGNALS: &[&str] = &[
    "SIGHUP",
    "SIGINT",
    "SIGQUIT",
    "SIGILL",
    "SIGTRAP",
    "SIGIOT",
    "SIGBUS",
    "SIGFPE",
    "SIGKILL",
    "SIGUSR1",
    "SIGSEGV",
    "SIGUSR2",
    "SIGPIPE",
    "SIGALRM",
    "SIGTERM",
    "SIGSTKFLT",
    "SIGCHLD",
    "SIGCONT",
    "SIGSTOP",
    "SIGTSTP",
    "SIGTTIN",
    "SIGTTOU",
    "SIGURG",
    "SIGXCPU",
    "SIGXFSZ",
    "SIGVTALRM",
    "SIGPROF",
    "SIGWINCH",
    "SIGIO",
    "SIGPWR",
];

pub fn is_valid_signal(name: &str) -> bool {
    LINUX_SIGNALS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_signals() {
        assert!(is_valid_signal("SIGKILL"));
        assert!(is_valid_signal("SIGPWR"));
    }

    #[test]
    fn rejects_unknown_signals() {
        assert!(!is_valid_signal("SIGBANANA"));
        assert!(!is_valid_signal(""));
    }
}
