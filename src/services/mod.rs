//! Per-service clients.
//!
//! Each client is a plain struct around a [`ServiceCore`](crate::service::ServiceCore)
//! plus the endpoint table for that service.

pub mod authorization;
pub mod discovery;
pub mod natural_language_classifier;
pub mod speech_to_text;
pub mod tone_analyzer;
pub mod visual_recognition;

pub use authorization::AuthorizationV1;
pub use discovery::DiscoveryV1;
pub use natural_language_classifier::NaturalLanguageClassifierV1;
pub use speech_to_text::SpeechToTextV1;
pub use tone_analyzer::ToneAnalyzerV3;
pub use visual_recognition::VisualRecognitionV3;
