use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Content hash of a corpus.
///
/// Lets a persisted selection be matched back to the exact corpus it was
/// computed from. Each sentence is hashed followed by a newline, so
/// `["a b", "c"]` and `["a", "b c"]` fingerprint differently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorpusFingerprint(String);

impl CorpusFingerprint {
    pub fn from_sentences<S: AsRef<str>>(sentences: &[S]) -> Self {
        let mut hasher = Sha256::new();
        for sentence in sentences {
            hasher.update(sentence.as_ref().as_bytes());
            hasher.update(b"\n");
        }

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        CorpusFingerprint(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
