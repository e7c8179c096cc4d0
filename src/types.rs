use serde::Deserialize;

/// Environment variable the supervisor sets in the child's environment.
pub const ROLE_ENV_VAR: &str = "RELAUNCH_CHILD";

/// Value written into [`ROLE_ENV_VAR`] for spawned children.
pub const ROLE_ENV_VALUE: &str = "1";

/// Which side of the process boundary this invocation is on.
///
/// Derived once at startup from [`ROLE_ENV_VAR`] and then passed around as
/// plain configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// First invocation, started by the operator.
    TopLevel,
    /// A runner spawned by a supervisor.
    SupervisedChild,
}

impl Role {
    /// Decide the role from the raw value of [`ROLE_ENV_VAR`], if any.
    ///
    /// Any non-empty value other than `0` / `false` counts as set.
    pub fn from_marker(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if !v.is_empty() && v != "0" && v != "false" => Role::SupervisedChild,
            _ => Role::TopLevel,
        }
    }

    /// Read the role marker from the process environment.
    pub fn from_env() -> Self {
        Self::from_marker(std::env::var(ROLE_ENV_VAR).ok().as_deref())
    }
}

/// What this invocation is going to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Invoke the entrypoint once, in this process.
    Direct,
    /// Supervise a child and restart it on source changes.
    Supervise,
}

impl RunMode {
    /// `--no-reload` wins over `--reload`; a spawned child always runs directly.
    pub fn decide(role: Role, reload: bool, no_reload: bool) -> Self {
        match role {
            Role::SupervisedChild => RunMode::Direct,
            Role::TopLevel if reload && !no_reload => RunMode::Supervise,
            Role::TopLevel => RunMode::Direct,
        }
    }
}

/// How a watched file is stamped in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDetection {
    /// Last-modified time (default).
    Mtime,
    /// blake3 digest of the file contents.
    Hash,
}

impl Default for ChangeDetection {
    fn default() -> Self {
        ChangeDetection::Mtime
    }
}
