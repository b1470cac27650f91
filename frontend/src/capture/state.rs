use crate::capture::protocol::{
    extract_marked_features, FrameOutcome, FrameProcessed, GenerateResponse,
};
use std::rc::Rc;
use yew::prelude::*;

pub const WAITING_FOR_PREDICTIONS: &str = "Waiting for predictions...";
pub const UNEXPECTED_RESPONSE: &str = "Unexpected response from server.";

/// What the capture page shows. Timer and camera handles live outside the
/// reducer; this is only the displayable part of a capture session.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureState {
    pub recording: bool,
    pub features: Vec<String>,
    pub label: String,
    pub status: String,
    pub user_input: String,
    pub non_manual_features: Vec<String>,
    pub rewritten_sentence: String,
    pub generating: bool,
    pub inputs_disabled: bool,
}

impl Default for CaptureState {
    fn default() -> Self {
        Self {
            recording: false,
            features: Vec::new(),
            label: String::new(),
            status: WAITING_FOR_PREDICTIONS.to_string(),
            user_input: String::new(),
            non_manual_features: Vec::new(),
            rewritten_sentence: String::new(),
            generating: false,
            inputs_disabled: true,
        }
    }
}

pub enum CaptureAction {
    Started,
    CameraFailed,
    Stopped,
    FrameProcessed(FrameProcessed),
    UserInput(String),
    GenerateStarted,
    Generated(GenerateResponse),
    GenerateFinished,
}

impl CaptureState {
    pub fn apply(&mut self, action: CaptureAction) {
        match action {
            CaptureAction::Started => self.recording = true,
            CaptureAction::CameraFailed => self.recording = false,
            CaptureAction::Stopped => {
                self.recording = false;
                self.inputs_disabled = false;
            }
            CaptureAction::FrameProcessed(reply) => {
                if let Some(lines) = reply.feature_lines() {
                    self.features = lines;
                }
                match reply.outcome() {
                    FrameOutcome::Error(error) => self.status = format!("Error: {error}"),
                    FrameOutcome::Label(label) => {
                        self.status = label.clone();
                        self.label = label;
                    }
                    FrameOutcome::Unexpected => self.status = UNEXPECTED_RESPONSE.to_string(),
                }
            }
            CaptureAction::UserInput(text) => self.user_input = text,
            CaptureAction::GenerateStarted => self.generating = true,
            CaptureAction::Generated(response) => {
                self.non_manual_features = extract_marked_features(&response.non_manual_features);
                self.rewritten_sentence = response.rewritten_sentence;
            }
            CaptureAction::GenerateFinished => self.generating = false,
        }
    }

    pub fn can_generate(&self) -> bool {
        !self.generating && !self.label.is_empty() && !self.user_input.is_empty()
    }
}

impl Reducible for CaptureState {
    type Action = CaptureAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        next.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(json: &str) -> FrameProcessed {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn fresh_session_waits_with_inputs_locked() {
        let state = CaptureState::default();
        assert_eq!(state.status, WAITING_FOR_PREDICTIONS);
        assert!(state.inputs_disabled);
        assert!(!state.can_generate());
    }

    #[test]
    fn latest_reply_wins() {
        let mut state = CaptureState::default();
        state.apply(CaptureAction::Started);

        state.apply(CaptureAction::FrameProcessed(reply(
            r#"{"features":[{"smile":0.9}],"predictions":{"label":"happy"}}"#,
        )));
        state.apply(CaptureAction::FrameProcessed(reply(
            r#"{"features":[{"brow":0.1}],"predictions":{"label":"sad"}}"#,
        )));

        assert_eq!(state.label, "sad");
        assert_eq!(state.status, "sad");
        assert_eq!(state.features, ["brow: 0.1"]);
    }

    #[test]
    fn error_reply_keeps_the_last_label() {
        let mut state = CaptureState::default();
        state.apply(CaptureAction::FrameProcessed(reply(r#"{"predictions":{"label":"happy"}}"#)));
        state.apply(CaptureAction::FrameProcessed(reply(r#"{"error":"no face"}"#)));

        assert_eq!(state.label, "happy");
        assert_eq!(state.status, "Error: no face");
    }

    #[test]
    fn reply_without_features_keeps_previous_features() {
        let mut state = CaptureState::default();
        state.apply(CaptureAction::FrameProcessed(reply(r#"{"features":[{"a":1}]}"#)));
        state.apply(CaptureAction::FrameProcessed(reply("{}")));

        assert_eq!(state.features, ["a: 1"]);
        assert_eq!(state.status, UNEXPECTED_RESPONSE);
    }

    #[test]
    fn loosely_shaped_replies_still_update_the_label() {
        let mut state = CaptureState::default();
        state.apply(CaptureAction::FrameProcessed(reply(
            r#"{"features":[[0.5]],"predictions":{"label":"happy"}}"#,
        )));
        assert_eq!(state.label, "happy");
        assert_eq!(state.features, ["0: 0.5"]);

        state.apply(CaptureAction::FrameProcessed(reply(
            r#"{"predictions":{"label":null},"error":null}"#,
        )));
        assert_eq!(state.label, "");
        assert!(!state.can_generate());
    }

    #[test]
    fn late_reply_after_stop_is_still_shown() {
        let mut state = CaptureState::default();
        state.apply(CaptureAction::Started);
        state.apply(CaptureAction::Stopped);
        state.apply(CaptureAction::FrameProcessed(reply(r#"{"predictions":{"label":"anger"}}"#)));

        assert!(!state.recording);
        assert_eq!(state.label, "anger");
    }

    #[test]
    fn stopping_unlocks_text_entry() {
        let mut state = CaptureState::default();
        state.apply(CaptureAction::Started);
        assert!(state.recording);
        state.apply(CaptureAction::Stopped);
        assert!(!state.recording);
        assert!(!state.inputs_disabled);
    }

    #[test]
    fn camera_failure_ends_recording_without_unlocking() {
        let mut state = CaptureState::default();
        state.apply(CaptureAction::Started);
        state.apply(CaptureAction::CameraFailed);
        assert!(!state.recording);
        assert!(state.inputs_disabled);
    }

    #[test]
    fn generation_needs_label_and_text_and_no_call_in_flight() {
        let mut state = CaptureState::default();
        state.apply(CaptureAction::UserInput("I am going home".into()));
        assert!(!state.can_generate());

        state.apply(CaptureAction::FrameProcessed(reply(r#"{"predictions":{"label":"happy"}}"#)));
        assert!(state.can_generate());

        state.apply(CaptureAction::GenerateStarted);
        assert!(!state.can_generate());

        state.apply(CaptureAction::Generated(GenerateResponse {
            non_manual_features: vec!["intro".into(), "* Raised eyebrows".into()],
            rewritten_sentence: "Home, I go!".into(),
        }));
        state.apply(CaptureAction::GenerateFinished);

        assert_eq!(state.non_manual_features, ["Raised eyebrows"]);
        assert_eq!(state.rewritten_sentence, "Home, I go!");
        assert!(state.can_generate());
    }
}
