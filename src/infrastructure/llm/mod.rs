mod groq;

pub use groq::GroqCompletion;
