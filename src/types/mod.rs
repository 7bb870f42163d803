//! Core data types for the Pomodoro timer.
//!
//! This module defines the data structures used for:
//! - Phase kinds and the validated timer configuration
//! - The mutable timer state owned by the engine
//! - Phase-transition records emitted to the presentation layer
//! - IPC request/response serialization

mod error;

use serde::{Deserialize, Serialize};

pub use error::ConfigurationError;

// ============================================================================
// PhaseKind
// ============================================================================

/// The kind of timed interval currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// Focused work interval
    #[default]
    Work,
    /// Short break between work phases
    ShortBreak,
    /// Long break inserted after a full cycle of work phases
    LongBreak,
}

impl PhaseKind {
    /// Returns the wire representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Work => "work",
            PhaseKind::ShortBreak => "short_break",
            PhaseKind::LongBreak => "long_break",
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PhaseKind::Work => "Work",
            PhaseKind::ShortBreak => "Short break",
            PhaseKind::LongBreak => "Long break",
        }
    }

    /// Returns true for either break kind.
    pub fn is_break(&self) -> bool {
        matches!(self, PhaseKind::ShortBreak | PhaseKind::LongBreak)
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Configuration
// ============================================================================

fn default_work_minutes() -> u32 {
    25
}

fn default_short_break_minutes() -> u32 {
    5
}

fn default_long_break_minutes() -> u32 {
    15
}

fn default_long_break_every() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

/// Timer configuration, checked once at construction and reload boundaries.
///
/// Field names match the persisted settings file exactly. Fields missing from
/// a file take their documented default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Work duration in minutes
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    /// Short break duration in minutes
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    /// Long break duration in minutes
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    /// Completed work phases per long break
    #[serde(default = "default_long_break_every")]
    pub long_break_every: u32,
    /// Whether the next phase starts counting immediately
    #[serde(default = "default_true")]
    pub auto_start_next: bool,
    /// Whether completion cues are audible
    #[serde(default = "default_true")]
    pub sound_on: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_every: default_long_break_every(),
            auto_start_next: true,
            sound_on: true,
        }
    }
}

impl Configuration {
    /// Returns the configuration with the specified work duration.
    #[must_use]
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = minutes;
        self
    }

    /// Returns the configuration with the specified short break duration.
    #[must_use]
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_minutes = minutes;
        self
    }

    /// Returns the configuration with the specified long break duration.
    #[must_use]
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = minutes;
        self
    }

    /// Returns the configuration with the specified long break cadence.
    #[must_use]
    pub fn with_long_break_every(mut self, every: u32) -> Self {
        self.long_break_every = every;
        self
    }

    /// Returns the configuration with the specified auto-start policy.
    #[must_use]
    pub fn with_auto_start_next(mut self, auto_start: bool) -> Self {
        self.auto_start_next = auto_start;
        self
    }

    /// Returns the configuration with sound cues switched on or off.
    #[must_use]
    pub fn with_sound_on(mut self, sound_on: bool) -> Self {
        self.sound_on = sound_on;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if any duration or the long break cadence
    /// is zero.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let durations = [
            ("work_minutes", self.work_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
        ];
        for (field, minutes) in durations {
            if minutes == 0 {
                return Err(ConfigurationError::NonPositiveDuration { field });
            }
        }
        if self.long_break_every == 0 {
            return Err(ConfigurationError::NonPositiveCadence);
        }
        Ok(())
    }

    /// Returns the full duration of a phase in seconds.
    pub fn seconds_for(&self, phase: PhaseKind) -> u32 {
        let minutes = match phase {
            PhaseKind::Work => self.work_minutes,
            PhaseKind::ShortBreak => self.short_break_minutes,
            PhaseKind::LongBreak => self.long_break_minutes,
        };
        minutes.saturating_mul(60)
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// The mutable core entity, owned by the engine.
///
/// Invariant: `0 <= remaining_seconds <= total_seconds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Current phase
    pub phase: PhaseKind,
    /// Duration of the current phase instance
    pub total_seconds: u32,
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// True while counting down
    pub running: bool,
    /// Work phases completed naturally this session
    pub completed_work_count: u32,
    /// Work phases completed within the current long-break cycle
    pub cycle_position: u32,
}

impl TimerState {
    /// Creates the initial state: a Work phase awaiting start, counts zeroed.
    pub fn initial(config: &Configuration) -> Self {
        let total_seconds = config.seconds_for(PhaseKind::Work);
        Self {
            phase: PhaseKind::Work,
            total_seconds,
            remaining_seconds: total_seconds,
            running: false,
            completed_work_count: 0,
            cycle_position: 0,
        }
    }

    /// Returns true when the current phase has not consumed any time and is
    /// not counting.
    pub fn is_awaiting_start(&self) -> bool {
        !self.running && self.remaining_seconds == self.total_seconds
    }

    /// Returns the elapsed fraction of the current phase in 0..=1000.
    pub fn progress_permille(&self) -> u32 {
        if self.total_seconds == 0 {
            return 0;
        }
        let done = u64::from(self.total_seconds.saturating_sub(self.remaining_seconds));
        (done * 1000 / u64::from(self.total_seconds)) as u32
    }
}

// ============================================================================
// PhaseTransition
// ============================================================================

/// Record of one `advance_phase` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTransition {
    /// Phase that just ended
    pub previous_phase: PhaseKind,
    /// Phase that is now current
    pub new_phase: PhaseKind,
    /// True if the previous phase ticked down to zero, false if skipped
    pub completed_naturally: bool,
    /// Work completions after the transition
    pub completed_work_count: u32,
    /// Cycle position after the transition
    pub cycle_position: u32,
}

/// Formats seconds as zero-padded `MM:SS`.
///
/// Minutes are not wrapped into hours.
pub fn format_mmss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

// ============================================================================
// IPC Types
// ============================================================================

/// IPC request from client to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum IpcRequest {
    /// Start or resume counting
    Start,
    /// Freeze the countdown
    Pause,
    /// Abandon the current phase
    Skip,
    /// Re-arm the current phase
    Reset,
    /// Return to the initial session state
    ResetAll,
    /// Query the current status
    Status,
    /// Replace the configuration
    Reload {
        /// New configuration
        config: Configuration,
    },
}

impl IpcRequest {
    /// Returns the command name used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            IpcRequest::Start => "start",
            IpcRequest::Pause => "pause",
            IpcRequest::Skip => "skip",
            IpcRequest::Reset => "reset",
            IpcRequest::ResetAll => "reset_all",
            IpcRequest::Status => "status",
            IpcRequest::Reload { .. } => "reload",
        }
    }
}

/// Response data for IPC responses.
///
/// The snapshot uses camelCase keys; the configuration keeps the settings
/// file field names so `reload` and `status` carry the same record as disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    /// Timer snapshot after the command
    pub state: TimerState,
    /// Active configuration
    pub config: Configuration,
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }

    /// Returns true if the daemon rejected the request.
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // PhaseKind Tests
    // ------------------------------------------------------------------------

    mod phase_kind_tests {
        use super::*;

        #[test]
        fn test_default_is_work() {
            assert_eq!(PhaseKind::default(), PhaseKind::Work);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(PhaseKind::Work.as_str(), "work");
            assert_eq!(PhaseKind::ShortBreak.as_str(), "short_break");
            assert_eq!(PhaseKind::LongBreak.as_str(), "long_break");
        }

        #[test]
        fn test_is_break() {
            assert!(!PhaseKind::Work.is_break());
            assert!(PhaseKind::ShortBreak.is_break());
            assert!(PhaseKind::LongBreak.is_break());
        }

        #[test]
        fn test_serialize_matches_as_str() {
            for phase in [PhaseKind::Work, PhaseKind::ShortBreak, PhaseKind::LongBreak] {
                let json = serde_json::to_string(&phase).unwrap();
                assert_eq!(json, format!("\"{}\"", phase.as_str()));
            }
        }

        #[test]
        fn test_display_uses_label() {
            assert_eq!(PhaseKind::LongBreak.to_string(), "Long break");
        }
    }

    // ------------------------------------------------------------------------
    // Configuration Tests
    // ------------------------------------------------------------------------

    mod configuration_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = Configuration::default();
            assert_eq!(config.work_minutes, 25);
            assert_eq!(config.short_break_minutes, 5);
            assert_eq!(config.long_break_minutes, 15);
            assert_eq!(config.long_break_every, 4);
            assert!(config.auto_start_next);
            assert!(config.sound_on);
        }

        #[test]
        fn test_builder_pattern() {
            let config = Configuration::default()
                .with_work_minutes(50)
                .with_short_break_minutes(10)
                .with_long_break_minutes(30)
                .with_long_break_every(3)
                .with_auto_start_next(false)
                .with_sound_on(false);

            assert_eq!(config.work_minutes, 50);
            assert_eq!(config.short_break_minutes, 10);
            assert_eq!(config.long_break_minutes, 30);
            assert_eq!(config.long_break_every, 3);
            assert!(!config.auto_start_next);
            assert!(!config.sound_on);
        }

        #[test]
        fn test_validate_default_is_ok() {
            assert!(Configuration::default().validate().is_ok());
        }

        #[test]
        fn test_validate_minimum_values() {
            let config = Configuration::default()
                .with_work_minutes(1)
                .with_short_break_minutes(1)
                .with_long_break_minutes(1)
                .with_long_break_every(1);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_validate_zero_work() {
            let config = Configuration::default().with_work_minutes(0);
            assert_eq!(
                config.validate(),
                Err(ConfigurationError::NonPositiveDuration {
                    field: "work_minutes"
                })
            );
        }

        #[test]
        fn test_validate_zero_short_break() {
            let config = Configuration::default().with_short_break_minutes(0);
            assert_eq!(
                config.validate().unwrap_err().field(),
                "short_break_minutes"
            );
        }

        #[test]
        fn test_validate_zero_long_break() {
            let config = Configuration::default().with_long_break_minutes(0);
            assert_eq!(config.validate().unwrap_err().field(), "long_break_minutes");
        }

        #[test]
        fn test_validate_zero_cadence() {
            let config = Configuration::default().with_long_break_every(0);
            assert_eq!(
                config.validate(),
                Err(ConfigurationError::NonPositiveCadence)
            );
        }

        #[test]
        fn test_seconds_for() {
            let config = Configuration::default();
            assert_eq!(config.seconds_for(PhaseKind::Work), 1500);
            assert_eq!(config.seconds_for(PhaseKind::ShortBreak), 300);
            assert_eq!(config.seconds_for(PhaseKind::LongBreak), 900);
        }

        #[test]
        fn test_seconds_for_saturates() {
            let config = Configuration::default().with_work_minutes(u32::MAX);
            assert_eq!(config.seconds_for(PhaseKind::Work), u32::MAX);
        }

        #[test]
        fn test_deserialize_fills_missing_fields() {
            let json = r#"{"work_minutes": 40, "sound_on": false}"#;
            let config: Configuration = serde_json::from_str(json).unwrap();

            assert_eq!(config.work_minutes, 40);
            assert!(!config.sound_on);
            assert_eq!(config.short_break_minutes, 5);
            assert_eq!(config.long_break_every, 4);
            assert!(config.auto_start_next);
        }

        #[test]
        fn test_serialize_uses_settings_field_names() {
            let json = serde_json::to_string(&Configuration::default()).unwrap();
            assert!(json.contains("\"work_minutes\":25"));
            assert!(json.contains("\"short_break_minutes\":5"));
            assert!(json.contains("\"long_break_minutes\":15"));
            assert!(json.contains("\"long_break_every\":4"));
            assert!(json.contains("\"auto_start_next\":true"));
            assert!(json.contains("\"sound_on\":true"));
        }
    }

    // ------------------------------------------------------------------------
    // TimerState Tests
    // ------------------------------------------------------------------------

    mod timer_state_tests {
        use super::*;

        #[test]
        fn test_initial_state() {
            let state = TimerState::initial(&Configuration::default());

            assert_eq!(state.phase, PhaseKind::Work);
            assert_eq!(state.total_seconds, 1500);
            assert_eq!(state.remaining_seconds, 1500);
            assert!(!state.running);
            assert_eq!(state.completed_work_count, 0);
            assert_eq!(state.cycle_position, 0);
            assert!(state.is_awaiting_start());
        }

        #[test]
        fn test_not_awaiting_start_when_running() {
            let mut state = TimerState::initial(&Configuration::default());
            state.running = true;
            assert!(!state.is_awaiting_start());
        }

        #[test]
        fn test_not_awaiting_start_when_partially_elapsed() {
            let mut state = TimerState::initial(&Configuration::default());
            state.remaining_seconds = 1000;
            assert!(!state.is_awaiting_start());
        }

        #[test]
        fn test_progress_permille() {
            let mut state = TimerState::initial(&Configuration::default());
            assert_eq!(state.progress_permille(), 0);

            state.remaining_seconds = 750;
            assert_eq!(state.progress_permille(), 500);

            state.remaining_seconds = 0;
            assert_eq!(state.progress_permille(), 1000);
        }

        #[test]
        fn test_progress_permille_zero_total() {
            let mut state = TimerState::initial(&Configuration::default());
            state.total_seconds = 0;
            state.remaining_seconds = 0;
            assert_eq!(state.progress_permille(), 0);
        }

        #[test]
        fn test_serialize_camel_case() {
            let state = TimerState::initial(&Configuration::default());
            let json = serde_json::to_string(&state).unwrap();

            assert!(json.contains("\"phase\":\"work\""));
            assert!(json.contains("\"remainingSeconds\":1500"));
            assert!(json.contains("\"completedWorkCount\":0"));
            assert!(json.contains("\"cyclePosition\":0"));
        }
    }

    // ------------------------------------------------------------------------
    // Formatting Tests
    // ------------------------------------------------------------------------

    mod format_tests {
        use super::*;

        #[test]
        fn test_format_mmss() {
            assert_eq!(format_mmss(0), "00:00");
            assert_eq!(format_mmss(59), "00:59");
            assert_eq!(format_mmss(307), "05:07");
            assert_eq!(format_mmss(1500), "25:00");
            assert_eq!(format_mmss(120 * 60 + 1), "120:01");
        }
    }

    // ------------------------------------------------------------------------
    // IPC Types Tests
    // ------------------------------------------------------------------------

    mod ipc_tests {
        use super::*;

        #[test]
        fn test_simple_requests_serialize() {
            let cases = [
                (IpcRequest::Start, r#"{"command":"start"}"#),
                (IpcRequest::Pause, r#"{"command":"pause"}"#),
                (IpcRequest::Skip, r#"{"command":"skip"}"#),
                (IpcRequest::Reset, r#"{"command":"reset"}"#),
                (IpcRequest::ResetAll, r#"{"command":"reset_all"}"#),
                (IpcRequest::Status, r#"{"command":"status"}"#),
            ];

            for (request, expected) in cases {
                assert_eq!(serde_json::to_string(&request).unwrap(), expected);
            }
        }

        #[test]
        fn test_request_name_matches_tag() {
            let request = IpcRequest::Reload {
                config: Configuration::default(),
            };
            let json = serde_json::to_string(&request).unwrap();
            assert!(json.contains(&format!("\"command\":\"{}\"", request.name())));
        }

        #[test]
        fn test_reload_request_deserialize() {
            let json = r#"{"command":"reload","config":{"work_minutes":30,"long_break_every":2}}"#;
            let request: IpcRequest = serde_json::from_str(json).unwrap();

            match request {
                IpcRequest::Reload { config } => {
                    assert_eq!(config.work_minutes, 30);
                    assert_eq!(config.long_break_every, 2);
                    assert_eq!(config.short_break_minutes, 5);
                }
                _ => panic!("Expected Reload request"),
            }
        }

        #[test]
        fn test_unknown_command_is_rejected() {
            let result: Result<IpcRequest, _> = serde_json::from_str(r#"{"command":"explode"}"#);
            assert!(result.is_err());
        }

        #[test]
        fn test_ipc_response_success() {
            let config = Configuration::default();
            let data = ResponseData {
                state: TimerState::initial(&config),
                config,
            };
            let response = IpcResponse::success("ok", Some(data.clone()));

            assert_eq!(response.status, "success");
            assert!(!response.is_error());
            assert_eq!(response.data, Some(data));
        }

        #[test]
        fn test_ipc_response_error_omits_data() {
            let response = IpcResponse::error("bad configuration");
            assert!(response.is_error());

            let json = serde_json::to_string(&response).unwrap();
            assert!(json.contains("\"status\":\"error\""));
            assert!(!json.contains("data"));
        }

        #[test]
        fn test_response_data_key_names() {
            let config = Configuration::default();
            let data = ResponseData {
                state: TimerState::initial(&config),
                config,
            };
            let json = serde_json::to_value(&data).unwrap();

            // Snapshot keys are camelCase, configuration keys match the settings file
            assert_eq!(json["state"]["remainingSeconds"], 1500);
            assert_eq!(json["state"]["completedWorkCount"], 0);
            assert_eq!(json["config"]["work_minutes"], 25);
            assert_eq!(json["config"]["long_break_every"], 4);
            assert!(json["config"].get("workMinutes").is_none());
        }
    }
}
