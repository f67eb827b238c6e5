//! Mock operator answering prompts by their text.
//!
//! Unlike a scripted queue, the operator answers whichever prompt it is
//! shown, so tests do not depend on the order the rig asks in.

use specimen_rig::input::{InputError, InputProvider, Prompt};
use specimen_rig::sensors::Axis;

/// Answers a rig would get from an operator watching one specimen.
#[derive(Debug, Clone)]
pub struct MockOperator {
    /// Polls per detection window, in height/length/depth order
    pub windows: [f64; 3],
    /// Camera height and length
    pub camera: (f64, f64),
    /// Cancel the first prompt containing this text
    pub cancel_on: Option<String>,
    /// Prompts shown so far
    pub prompts: Vec<String>,
}

impl Default for MockOperator {
    fn default() -> Self {
        Self {
            // 9.5 / 19.0 / 2.0 at the nominal speed
            windows: [191.0, 381.0, 41.0],
            camera: (10.0, 20.0),
            cancel_on: None,
            prompts: Vec::new(),
        }
    }
}

impl MockOperator {
    pub fn cancelling(text: &str) -> Self {
        Self {
            cancel_on: Some(text.to_string()),
            ..Default::default()
        }
    }

    fn answer(&self, text: &str) -> Option<f64> {
        for (idx, axis) in Axis::ALL.iter().enumerate() {
            if *text == Prompt::window(*axis).text {
                return Some(self.windows[idx]);
            }
        }
        match text {
            "Camera height" => Some(self.camera.0),
            "Camera length" => Some(self.camera.1),
            _ => None,
        }
    }
}

impl InputProvider for MockOperator {
    fn request(&mut self, prompt: &Prompt) -> Result<Option<f64>, InputError> {
        self.prompts.push(prompt.text.clone());

        if let Some(cancel) = &self.cancel_on {
            if prompt.text.contains(cancel.as_str()) {
                self.cancel_on = None;
                return Ok(None);
            }
        }

        self.answer(&prompt.text)
            .map(Some)
            .ok_or_else(|| InputError::Exhausted(prompt.text.clone()))
    }
}

#[test]
fn test_mock_operator_answers_by_prompt() {
    let mut operator = MockOperator::default();

    let depth = operator.request(&Prompt::window(Axis::Depth)).unwrap();
    assert_eq!(depth, Some(41.0));

    let unknown = Prompt {
        text: "Patient age".to_string(),
        min: 0.0,
        max: 120.0,
        whole: true,
    };
    assert!(operator.request(&unknown).is_err());
    assert_eq!(operator.prompts.len(), 2);
}
