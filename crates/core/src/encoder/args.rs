//! Command lines for the external codec tools.

use std::ffi::{OsStr, OsString};
use std::path::Path;

/// `flac -f -<level> -V <input> -o <output>`
pub fn flac_encode(level: u8, input: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-f".into(),
        format!("-{level}").into(),
        "-V".into(),
        input.into(),
        "-o".into(),
        output.into(),
    ]
}

/// `ffmpeg -loglevel fatal -i <source> -c:a flac -compression_level 0`, less the output.
fn ffmpeg_flac_intermediate(source: &Path) -> Vec<OsString> {
    vec![
        "-loglevel".into(),
        "fatal".into(),
        "-i".into(),
        source.into(),
        "-c:a".into(),
        "flac".into(),
        "-compression_level".into(),
        "0".into(),
    ]
}

/// Intermediate written to a file.
pub fn ffmpeg_to_file(source: &Path, intermediate: &Path) -> Vec<OsString> {
    let mut args = ffmpeg_flac_intermediate(source);
    args.push(intermediate.into());
    args
}

/// Intermediate streamed to stdout.
pub fn ffmpeg_to_stdout(source: &Path) -> Vec<OsString> {
    let mut args = ffmpeg_flac_intermediate(source);
    args.extend(["-f", "flac", "-"].map(OsString::from));
    args
}

/// `metaflac --remove-all <file>`
pub fn metaflac_remove_all(file: &Path) -> Vec<OsString> {
    vec!["--remove-all".into(), file.into()]
}

/// `ffprobe <source> -show_entries stream=channels -select_streams a -of compact=p=0:nk=1 -v 0`
pub fn ffprobe_channels(source: &Path) -> Vec<OsString> {
    vec![
        source.into(),
        "-show_entries".into(),
        "stream=channels".into(),
        "-select_streams".into(),
        "a".into(),
        "-of".into(),
        "compact=p=0:nk=1".into(),
        "-v".into(),
        "0".into(),
    ]
}

/// `opusenc <input> --bitrate <kbps> <output>`; `input` is `-` for stdin.
pub fn opusenc_encode(input: &OsStr, bitrate: u32, output: &Path) -> Vec<OsString> {
    vec![
        input.into(),
        "--bitrate".into(),
        bitrate.to_string().into(),
        output.into(),
    ]
}
