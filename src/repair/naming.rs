use std::path::Path;

const WAV_SUFFIX: &str = ".wav";

/// True for names like `song.wav.locked`: one trailing extension on top of `.wav`.
///
/// A bare `.wav.enc` counts too; its stem `.wav` still ends in `.wav`.
pub fn is_double_extension_wav(file_name: &str) -> bool {
    match strip_extension(file_name) {
        Some(stem) => ends_with_wav(stem),
        None => false,
    }
}

/// Output file name for a damaged input: `track.wav.enc` -> `track.wav`.
///
/// The input's own extension is dropped, then a remaining `.wav` (any case),
/// and `.wav` is appended.
pub fn repaired_file_name(input: &Path) -> Option<String> {
    let name = input.file_name()?.to_string_lossy();
    let stem = strip_extension(&name).unwrap_or(&name);
    let base = if ends_with_wav(stem) {
        &stem[..stem.len() - WAV_SUFFIX.len()]
    } else {
        stem
    };
    Some(format!("{}{}", base, WAV_SUFFIX))
}

/// Everything before the last `.`, or `None` when the name has no dot
fn strip_extension(name: &str) -> Option<&str> {
    name.rfind('.').map(|dot| &name[..dot])
}

fn ends_with_wav(name: &str) -> bool {
    name.len() >= WAV_SUFFIX.len()
        && name
            .get(name.len() - WAV_SUFFIX.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(WAV_SUFFIX))
}
