use std::env;
use tracing::warn;

/// Scheduling policy knobs left open by the observed system behavior.
///
/// Defaults match what the system does today: a rejected session keeps
/// its slot blocked, and already-decided sessions may be re-decided.
#[derive(Debug, Clone, Copy)]
pub struct SchedulingPolicy {
    /// When true, sessions in the `rejected` state stop counting as
    /// slot holders, so the slot becomes bookable again.
    pub release_rejected_slots: bool,
    /// When true, re-deciding an already accepted/rejected session
    /// fails instead of silently overwriting the decision.
    pub strict_redecision: bool,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            release_rejected_slots: false,
            strict_redecision: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub scheduling: SchedulingPolicy,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("PORT is not a valid port number, using 3000");
                3000
            }),
            Err(_) => 3000,
        };

        Self {
            port,
            scheduling: SchedulingPolicy {
                release_rejected_slots: env_flag("RELEASE_REJECTED_SLOTS", false),
                strict_redecision: env_flag("STRICT_REDECISION", false),
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            scheduling: SchedulingPolicy::default(),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => {
                warn!("{} has unrecognized value {:?}, using {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}
