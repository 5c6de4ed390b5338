//! Text-to-speech for Vox.
//!
//! [`SpeechAdapter`] turns the loosely-typed request parameters into a
//! [`SynthesisRequest`] and hands it to a [`SpeechSynthesizer`].

pub mod adapter;
pub mod google_tts;
pub mod types;

pub use adapter::SpeechAdapter;
pub use google_tts::GoogleTtsClient;
pub use types::{AudioEncoding, SpeechSynthesizer, SynthesisRequest, VoiceGender};
