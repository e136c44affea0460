//! Static application data

use crate::types::Label;

pub const APP_NAME: &str = "SpamGuard AI";

/// Example message offered as a quick input
#[derive(Debug, Clone, Copy)]
pub struct SampleMessage {
    pub text: &'static str,
    pub expected: Label,
}

pub const SAMPLE_MESSAGES: [SampleMessage; 4] = [
    SampleMessage {
        text: "Congratulations! You've won a $1000 Walmart gift card. Go to http://bit.ly/12345 to claim now.",
        expected: Label::Spam,
    },
    SampleMessage {
        text: "Hey mom, I'll be home for dinner around 6pm. Love you!",
        expected: Label::Ham,
    },
    SampleMessage {
        text: "URGENT! Your mobile number has been awarded with a £2000 prize GUARANTEED. Call 09061790121 from land line.",
        expected: Label::Spam,
    },
    SampleMessage {
        text: "Are we still on for the meeting tomorrow at 10?",
        expected: Label::Ham,
    },
];

/// Description of the backend model shown in the about panel
#[derive(Debug, Clone, Copy)]
pub struct ModelInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub framework: &'static str,
    pub dataset: &'static str,
    pub balance_method: &'static str,
    pub accuracy: &'static str,
}

pub const MODEL_INFO: ModelInfo = ModelInfo {
    name: "LSTM_Spam_Detector_v2.h5",
    version: "2.1.0",
    framework: "Keras/TensorFlow",
    dataset: "SMS Spam Collection (UCI)",
    balance_method: "SMOTE (Synthetic Minority Over-sampling Technique)",
    accuracy: "98.4%",
};

/// Look up a sample by its 1-based position
pub fn sample(number: usize) -> Option<&'static SampleMessage> {
    number.checked_sub(1).and_then(|idx| SAMPLE_MESSAGES.get(idx))
}
