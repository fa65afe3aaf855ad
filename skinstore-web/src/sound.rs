//! Sound cues for carousel scrolling and button clicks.

/// Asset played for every cue.
pub const CLICK_SOUND: &str = "/click-sound.mp3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Scroll,
    Click,
}

impl Cue {
    #[must_use]
    pub const fn asset(self) -> &'static str {
        match self {
            Self::Scroll | Self::Click => CLICK_SOUND,
        }
    }
}

/// Play a cue. Autoplay restrictions and missing audio support are ignored.
#[cfg(target_arch = "wasm32")]
pub fn play(cue: Cue) {
    if let Ok(audio) = web_sys::HtmlAudioElement::new_with_src(cue.asset()) {
        // play() rejects until the user has interacted with the page
        if let Ok(promise) = audio.play() {
            wasm_bindgen_futures::spawn_local(async move {
                let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
            });
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub const fn play(cue: Cue) {
    let _ = cue;
}
