//! Per-process instance identity.
//!
//! Each running instance picks a random (name, color) pair once at startup
//! and stamps it onto every activity record it writes. This is purely an
//! attribution label for the status view so multiple replicas can be told
//! apart; it is not a correctness-bearing identifier.

use rand::Rng;

/// Fixed display palette instances draw their color from.
pub const INSTANCE_COLORS: [&str; 10] = [
    "#6666ff", "#66b266", "#ffc966", "#ff6666", "#b266b2", "#26acff", "#31e8ee", "#c1e06c",
    "#f49c4c", "#f787ce",
];

/// Process-lifetime (name, color) attribution label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceIdentity {
    name: String,
    color: &'static str,
}

impl InstanceIdentity {
    /// Randomly generate an identity for the given service role
    /// (e.g. `"sender"`, `"receiver"`).
    pub fn generate(service: &str) -> Self {
        let mut rng = rand::thread_rng();
        let color = INSTANCE_COLORS[rng.gen_range(0..INSTANCE_COLORS.len())];
        let name = format!("{service}-{:x}", rng.gen_range(0..0x7fff_ffffu32));
        Self { name, color }
    }

    /// Fixed identity, for tests and tooling.
    pub fn fixed(name: impl Into<String>, color: &'static str) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &'static str {
        self.color
    }
}
