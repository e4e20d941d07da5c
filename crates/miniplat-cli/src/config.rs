use serde::Deserialize;

pub const HOST_CONFIG_PATH: &str = "miniplat-host.toml";

/// Host loop settings, loaded from `miniplat-host.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Stop after this many ticks. 0 runs until quit or Ctrl-C.
    pub max_ticks: u64,
    /// Log a HUD line every N ticks while playing.
    pub hud_every: u64,
    /// Drive the game with the scripted autopilot.
    pub autopilot: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_ticks: 3_600,
            hud_every: 60,
            autopilot: true,
        }
    }
}

impl HostConfig {
    /// Load `miniplat-host.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string(HOST_CONFIG_PATH) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {HOST_CONFIG_PATH}: {e}, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        };

        if let Ok(ticks) = std::env::var("MINIPLAT_MAX_TICKS")
            && let Ok(ticks) = ticks.parse()
        {
            config.max_ticks = ticks;
        }
        config.validate();
        config
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn validate(&mut self) {
        if self.hud_every == 0 {
            tracing::warn!("hud_every must be > 0, using 60");
            self.hud_every = 60;
        }
    }
}
