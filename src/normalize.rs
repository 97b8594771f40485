//! Traditional-to-simplified Chinese script normalization.
//!
//! The converter is picked once at startup and injected into the request
//! handler. Built without the `t2s` feature the service still runs, it just
//! returns transcripts in whatever script the model produced.

#[derive(Debug, Clone, Copy)]
pub enum ScriptNormalizer {
    /// Maps traditional characters to their simplified equivalents.
    #[cfg(feature = "t2s")]
    Simplified,
    /// Passthrough.
    Identity,
}

impl ScriptNormalizer {
    /// The strongest normalizer this build supports. `ZIMU_DISABLE_T2S`
    /// forces the passthrough variant.
    pub fn detect() -> Self {
        if std::env::var_os("ZIMU_DISABLE_T2S").is_some() {
            return ScriptNormalizer::Identity;
        }
        #[cfg(feature = "t2s")]
        {
            ScriptNormalizer::Simplified
        }
        #[cfg(not(feature = "t2s"))]
        {
            log::warn!(
                "built without the t2s feature, transcripts will not be converted to simplified Chinese"
            );
            ScriptNormalizer::Identity
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        match self {
            #[cfg(feature = "t2s")]
            ScriptNormalizer::Simplified => zhconv::zhconv(text, zhconv::Variant::ZhHans),
            ScriptNormalizer::Identity => text.to_string(),
        }
    }
}
