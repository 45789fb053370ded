//! Audio file classification by extension.

/// Recognized audio extensions, lower-case and without the dot.
pub const AUDIO_EXTENSIONS: [&str; 4] = ["mp3", "wav", "ogg", "mp4"];

/// Returns the extension of the final segment of `name`, without the dot.
///
/// A bare dotfile such as `.mp3` counts as having the extension `mp3`.
fn extension(name: &str) -> Option<&str> {
    let base = name.rsplit('/').next().unwrap_or(name);
    base.rfind('.').map(|i| &base[i + 1..])
}

/// Returns true if `name` ends in a recognized audio extension, ignoring case.
#[must_use]
pub fn is_audio_file(name: &str) -> bool {
    extension(name).is_some_and(|ext| {
        AUDIO_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// Returns the MIME type served for an audio file.
#[must_use]
pub fn content_type(name: &str) -> &'static str {
    match extension(name).map(str::to_ascii_lowercase).as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("mp4") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("song.mp3", true)]
    #[case("song.MP3", true)]
    #[case("song.Mp3", true)]
    #[case("audio.wav", true)]
    #[case("music.ogg", true)]
    #[case("video.mp4", true)]
    #[case("readme.txt", false)]
    #[case("file", false)]
    #[case("my.song.mp3", true)]
    #[case("", false)]
    #[case(".mp3", true)]
    #[case("document.pdf", false)]
    #[case("Song Name.mp3", true)]
    #[case("太極樂隊 - 歌曲.mp3", true)]
    #[case("關正傑 - 中文歌名.mp3", true)]
    #[case("Artist.mp3/cover.jpg", false)]
    #[case("Artist/track.ogg", true)]
    fn test_is_audio_file(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_audio_file(name), expected, "is_audio_file({name:?})");
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("A/song.MP3"), "audio/mpeg");
        assert_eq!(content_type("b.ogg"), "audio/ogg");
        assert_eq!(content_type("c.txt"), "application/octet-stream");
    }

    fn mixed_case(ext: &str, mask: u8) -> String {
        ext.chars()
            .enumerate()
            .map(|(i, c)| {
                if mask & (1 << i) == 0 {
                    c
                } else {
                    c.to_ascii_uppercase()
                }
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_extension_case_does_not_matter(
            stem in "[a-zA-Z0-9 _-]{1,16}",
            idx in 0usize..AUDIO_EXTENSIONS.len(),
            mask in 0u8..8,
        ) {
            let name = format!("{stem}.{}", mixed_case(AUDIO_EXTENSIONS[idx], mask));
            prop_assert!(is_audio_file(&name));
        }

        #[test]
        fn prop_accepts_iff_known_extension(stem in "[a-z]{1,8}", ext in "[a-zA-Z0-9]{1,4}") {
            let name = format!("{stem}.{ext}");
            let known = AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str());
            prop_assert_eq!(is_audio_file(&name), known);
        }
    }
}
